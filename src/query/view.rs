//! The opaque handle passed to every query callback.

use super::{Term, TypeKey};
use crate::entity::Entity;
use crate::world::World;

/// A view scoped to the current query's declared terms.
///
/// Lets a callback opportunistically fetch another slot of the *same* query for an
/// arbitrary entity (typically the driving entity itself, or a neighbor looked up via a
/// component value) without re-running the whole query. Fetching a type the query did
/// not declare fails fast. See [`View::get`].
pub struct View<'w, 'k> {
    world: &'w World,
    declared: &'k [TypeKey],
}

impl<'w, 'k> View<'w, 'k> {
    pub(crate) fn new(world: &'w World, declared: &'k [TypeKey]) -> Self {
        Self { world, declared }
    }

    /// Fetch slot `T` for `entity`.
    ///
    /// # Panics
    ///
    /// Panics if `T` was not one of the access qualifiers in the query this view was
    /// created for. It is the one runtime check the type system cannot perform for us,
    /// since the view has already erased which concrete tuple produced it.
    pub fn get<T: Term>(&self, entity: Entity) -> T::Value<'w> {
        assert!(
            self.declared.contains(&T::type_key()),
            "attempted to access a type not present in this query's declared terms"
        );
        // Safety: `T` was declared by the very query this view belongs to, so the
        // scheduler/for_each caller's access validation covers it exactly as it covers
        // the slots fetched directly by the query loop.
        unsafe { T::fetch(self.world, entity) }
    }
}
