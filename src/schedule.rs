//! A named, insertion-ordered set of system ids.

use std::collections::HashSet;

use crate::system;

/// A unit of execution: an insertion-ordered collection of [`system::Id`]s.
///
/// The source models a schedule as an unordered set, leaving serial iteration order
/// nondeterministic across runs. This crate commits to an insertion-ordered vector plus
/// a membership set, so `run_schedule` always walks systems in the order they were added
/// deterministic for a fixed program, matching the resolved open question in the
/// design notes.
#[derive(Debug, Default)]
pub struct Schedule {
    order: Vec<system::Id>,
    members: HashSet<system::Id>,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `id`, idempotently: inserting the same id twice leaves it present once,
    /// at its original position.
    pub(crate) fn insert(&mut self, id: system::Id) {
        if self.members.insert(id) {
            self.order.push(id);
        }
    }

    /// Remove `id`. A no-op if `id` was never a member.
    pub(crate) fn remove(&mut self, id: system::Id) {
        if self.members.remove(&id) {
            self.order.retain(|member| *member != id);
        }
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = system::Id> + '_ {
        self.order.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
