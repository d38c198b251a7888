//! The one typed, non-panicking error this crate surfaces.

use std::fmt;

use crate::system;

/// Reports which system(s) panicked during a [`crate::world::World::run_schedule_parallel`]
/// call.
///
/// Every other documented failure mode in this crate is either a compile-time rejection,
/// a silent `None`/no-op, or an unrecoverable panic; this is the sole exception, so an
/// embedder can log which system misbehaved instead of only learning that *something*
/// did.
#[derive(Debug)]
pub struct ScheduleError {
    /// The first system observed to panic, in batch-dispatch order.
    pub first: system::Id,
    /// Every system that panicked during the run, including `first`.
    pub panicked: Vec<system::Id>,
}

impl fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} system(s) panicked during parallel schedule execution (first: {:?})",
            self.panicked.len(),
            self.first
        )
    }
}

impl std::error::Error for ScheduleError {}
