//! Resource (singleton) storage for the ECS.
//!
//! A resource is a world-scoped singleton of a user-defined type, at most one value
//! per type, accessed directly rather than through an entity query. Use
//! `#[derive(Unique)]` on types meant to be inserted with
//! [`World::insert_resource`](crate::world::World::insert_resource).

use std::any::Any;

/// Marker trait for singleton types storable via [`World::insert_resource`](crate::world::World::insert_resource).
///
/// Named `Unique` (one instance per world, ever) rather than `Resource` to avoid
/// colliding with the query-side `Res`/`ResMut` access-qualifier names.
pub trait Unique: 'static + Send + Sync {}

/// A resource identifier: a dense, world-scoped integer assigned the first time a
/// resource type `T` is inserted or queried for.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(u32);

impl Id {
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for Id {
    #[inline]
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

/// Indexed-by-[`Id`] table of boxed singleton values, one slot per registered resource
/// type. A slot holds `None` until the first [`Table::insert`].
#[derive(Default)]
pub(crate) struct Table {
    slots: Vec<Option<Box<dyn Any + Send + Sync>>>,
}

impl Table {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    pub fn insert<T: Unique>(&mut self, id: Id, value: T) {
        if id.index() >= self.slots.len() {
            self.slots.resize_with(id.index() + 1, || None);
        }
        self.slots[id.index()] = Some(Box::new(value));
    }

    pub fn get<T: Unique>(&self, id: Id) -> Option<&T> {
        self.slots
            .get(id.index())?
            .as_ref()
            .and_then(|boxed| boxed.downcast_ref::<T>())
    }

    pub fn get_mut<T: Unique>(&mut self, id: Id) -> Option<&mut T> {
        self.slots
            .get_mut(id.index())?
            .as_mut()
            .and_then(|boxed| boxed.downcast_mut::<T>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct GameTime {
        elapsed: f32,
    }
    impl Unique for GameTime {}

    #[test]
    fn insert_then_get_round_trips() {
        // Given
        let mut table = Table::new();

        // When
        table.insert(Id::new(0), GameTime { elapsed: 1.5 });

        // Then
        assert_eq!(table.get::<GameTime>(Id::new(0)).unwrap().elapsed, 1.5);
    }

    #[test]
    fn insert_overwrites_previous_value() {
        // Given
        let mut table = Table::new();
        table.insert(Id::new(0), GameTime { elapsed: 1.0 });

        // When
        table.insert(Id::new(0), GameTime { elapsed: 2.0 });

        // Then
        assert_eq!(table.get::<GameTime>(Id::new(0)).unwrap().elapsed, 2.0);
    }

    #[test]
    fn get_before_insert_is_none() {
        // Given
        let table = Table::new();

        // Then
        assert!(table.get::<GameTime>(Id::new(0)).is_none());
    }

    #[test]
    fn get_mut_allows_in_place_update() {
        // Given
        let mut table = Table::new();
        table.insert(Id::new(0), GameTime { elapsed: 0.0 });

        // When
        table.get_mut::<GameTime>(Id::new(0)).unwrap().elapsed += 1.0;

        // Then
        assert_eq!(table.get::<GameTime>(Id::new(0)).unwrap().elapsed, 1.0);
    }
}
