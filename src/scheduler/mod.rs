//! Conflict-graph batching and dispatch for [`crate::world::World::run_schedule_parallel`].

mod pool;

pub(crate) use pool::WorkerPool;

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex};

use crate::error::ScheduleError;
use crate::schedule::Schedule;
use crate::system;
use crate::world::World;

/// Greedy first-fit batching: walk the schedule in insertion order, placing each system
/// in the first existing batch none of whose members conflict with it, else opening a
/// new batch. No secondary heuristic (sorting by access-set size, etc.) is applied, so
/// batch assignment is reproducible from schedule order alone.
fn plan(table: &system::Table, schedule: &Schedule) -> Vec<Vec<system::Id>> {
    let mut batches: Vec<Vec<system::Id>> = Vec::new();

    for id in schedule.iter() {
        let access = table.access(id);
        let slot = batches
            .iter_mut()
            .find(|batch| batch.iter().all(|member| !table.access(*member).conflicts_with(access)));

        match slot {
            Some(batch) => batch.push(id),
            None => batches.push(vec![id]),
        }
    }

    if log::log_enabled!(log::Level::Trace) {
        for (index, batch) in batches.iter().enumerate() {
            log::trace!("batch {index}: {batch:?}");
        }
    }

    batches
}

/// Raw pointers bundled so a worker-pool closure (which must be `Send + 'static`) can
/// carry them across the thread boundary. Safety is established by the caller of
/// `dispatch_batch`: every task spawned from a given call completes, and the call blocks
/// on that completion, before the borrows these pointers were taken from end.
struct BatchPtrs {
    table: *const system::Table,
    world: *const World,
}

unsafe impl Send for BatchPtrs {}
impl Clone for BatchPtrs {
    fn clone(&self) -> Self {
        BatchPtrs {
            table: self.table,
            world: self.world,
        }
    }
}

/// Dispatch one batch to the pool, block until every member has run exactly once, and
/// return the ids of any that panicked.
///
/// Mirrors the source's `runScheduleParallel`: a shared atomic counter decremented by
/// each task on completion, with the orchestrating thread waiting on a condition
/// variable until it reaches zero.
fn dispatch_batch(
    pool: &WorkerPool,
    table: &system::Table,
    world: &World,
    batch: &[system::Id],
) -> Vec<system::Id> {
    let remaining = Arc::new((Mutex::new(batch.len()), Condvar::new()));
    let panicked: Arc<Mutex<Vec<system::Id>>> = Arc::new(Mutex::new(Vec::new()));
    let ptrs = BatchPtrs {
        table: table as *const system::Table,
        world: world as *const World,
    };

    for &id in batch {
        let remaining = Arc::clone(&remaining);
        let panicked = Arc::clone(&panicked);
        let ptrs = ptrs.clone();

        pool.execute(move || {
            // Safety: see `BatchPtrs` doc comment. This function does not return until
            // every task here has run, so `table`/`world` are still borrowed for as long
            // as these raw pointers are live.
            let table = unsafe { &*ptrs.table };
            let world = unsafe { &*ptrs.world };

            if panic::catch_unwind(AssertUnwindSafe(|| table.run(id, world))).is_err() {
                panicked.lock().unwrap().push(id);
            }

            let (count, signal) = &*remaining;
            let mut count = count.lock().unwrap();
            *count -= 1;
            if *count == 0 {
                signal.notify_one();
            }
        });
    }

    let (count, signal) = &*remaining;
    let mut count = count.lock().unwrap();
    while *count > 0 {
        count = signal.wait(count).unwrap();
    }
    drop(count);

    Arc::try_unwrap(panicked)
        .expect("no task retains its Arc<Mutex<Vec<_>>> clone past batch completion")
        .into_inner()
        .unwrap()
}

/// Run every system in `schedule`, in insertion order, on the calling thread.
pub(crate) fn run_schedule(world: &World, table: &system::Table, schedule: &Schedule) {
    for id in schedule.iter() {
        table.run(id, world);
    }
}

/// Plan conflict-free batches for `schedule` and run them, one batch at a time, across
/// `pool`. Returns `Err` naming every system that panicked, if any did.
pub(crate) fn run_schedule_parallel(
    world: &World,
    table: &system::Table,
    schedule: &Schedule,
    pool: &WorkerPool,
) -> Result<(), ScheduleError> {
    let batches = plan(table, schedule);
    let mut panicked = Vec::new();

    for batch in &batches {
        let mut batch_panicked = dispatch_batch(pool, table, world, batch);
        for &id in &batch_panicked {
            log::warn!("system {id:?} panicked during a parallel schedule run");
        }
        panicked.append(&mut batch_panicked);
    }

    match panicked.first().copied() {
        Some(first) => Err(ScheduleError { first, panicked }),
        None => Ok(()),
    }
}
