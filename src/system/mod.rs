//! System registration: turning a query + callback into a world-scoped record the
//! scheduler can batch and dispatch.

use crate::query::{Access, Data};
use crate::world::World;

/// A system identifier.
///
/// Unlike [`crate::component::Id`] or [`crate::resource::Id`], this is **not** deduped by
/// type. Every `add_system` call allocates a fresh id, even if two systems share the
/// same query type. (The source's per-type-tuple `static` counter collided exactly here:
/// two systems with the same callback signature landed on the same id.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(u32);

impl Id {
    #[inline]
    pub(crate) const fn new(id: u32) -> Self {
        Self(id)
    }

    #[inline]
    pub(crate) fn index(&self) -> usize {
        self.0 as usize
    }
}

struct Record {
    access: Access,
    callback: Box<dyn Fn(&World) + Send + Sync>,
}

/// World-owned table of every system ever registered, keyed by a monotonically
/// allocated [`Id`]. Systems are never removed from this table; `remove_system` only
/// drops a system's id from a [`crate::schedule::Schedule`]'s membership set, since a
/// system record may be shared across schedules.
#[derive(Default)]
pub(crate) struct Table {
    records: Vec<Record>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `fn` against query `Q`, deriving its access set from `world` and
    /// wrapping it as a `World::for_each::<Q>` invocation. Returns the freshly
    /// allocated id.
    ///
    /// Convenience wrapper over [`Table::push`] for callers that hold `world` and
    /// `self` as independent bindings (tests, mainly). `World::add_system` cannot use
    /// this directly since it would need to borrow `self.systems` mutably and `self`
    /// immutably at once, so it calls `Data::access` then `push` itself instead.
    pub fn register<Q, F>(&mut self, world: &World, f: F) -> Id
    where
        Q: Data + 'static,
        F: Fn(crate::query::View<'_, '_>, crate::entity::Entity, Q::Item<'_>) + Send + Sync + 'static,
    {
        let access = Q::access(world);
        self.push::<Q, F>(access, f)
    }

    /// Append a system record with an already-derived `access` set. Returns the freshly
    /// allocated id.
    pub(crate) fn push<Q, F>(&mut self, access: Access, f: F) -> Id
    where
        Q: Data + 'static,
        F: Fn(crate::query::View<'_, '_>, crate::entity::Entity, Q::Item<'_>) + Send + Sync + 'static,
    {
        let callback = move |world: &World| {
            Q::for_each(world, |view, entity, item| f(view, entity, item));
        };
        let id = Id::new(self.records.len() as u32);
        log::debug!("registered system {id:?}, access = {access:?}");
        self.records.push(Record {
            access,
            callback: Box::new(callback),
        });
        id
    }

    pub fn access(&self, id: Id) -> &Access {
        &self.records[id.index()].access
    }

    pub fn run(&self, id: Id, world: &World) {
        (self.records[id.index()].callback)(world);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}
