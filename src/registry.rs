//! A monotonic type-id registry, parameterized over the id newtype it hands out.
//!
//! Both the component registry and the resource registry are instances of this same
//! mechanism, each with its own id space: registering a type as a component and
//! registering it as a resource allocate from two unrelated counters, so `Position`
//! could validly be component id 3 and, if also ever inserted as a resource, resource
//! id 0. The two categories never compare ids against each other.
//!
//! # Thread Safety
//!
//! Lock-free reads via `DashMap`; the rare "first use of a new type" path takes the
//! map's internal shard lock only for the duration of the insert.

use std::any::TypeId as StdTypeId;
use std::sync::atomic::{AtomicU32, Ordering};

use dashmap::DashMap;

/// Hands out a stable integer id, of caller-chosen newtype `Id`, the first time a given
/// `'static` type is seen. Subsequent lookups for the same type return the same id.
pub(crate) struct TypeRegistry<Id> {
    ids: DashMap<StdTypeId, Id>,
    next: AtomicU32,
}

impl<Id> Default for TypeRegistry<Id> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Id> TypeRegistry<Id> {
    pub fn new() -> Self {
        Self {
            ids: DashMap::new(),
            next: AtomicU32::new(0),
        }
    }

    /// Number of distinct types registered so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.next.load(Ordering::Relaxed) as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<Id: Copy + From<u32>> TypeRegistry<Id> {
    /// Get the id already assigned to `T`, if any.
    #[inline]
    pub fn get<T: 'static>(&self) -> Option<Id> {
        self.ids.get(&StdTypeId::of::<T>()).map(|entry| *entry.value())
    }

    /// Get `T`'s id, allocating the next one on first use.
    pub fn get_or_register<T: 'static>(&self) -> Id {
        let std_id = StdTypeId::of::<T>();

        if let Some(id) = self.ids.get(&std_id) {
            return *id.value();
        }

        match self.ids.entry(std_id) {
            dashmap::Entry::Occupied(existing) => *existing.get(),
            dashmap::Entry::Vacant(vacant) => {
                let raw = self.next.fetch_add(1, Ordering::Relaxed);
                let id = Id::from(raw);
                vacant.insert(id);
                log::debug!(
                    "registered new type '{}' as id {}",
                    std::any::type_name::<T>(),
                    raw
                );
                id
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Copy, Clone, PartialEq, Eq, Debug)]
    struct Id(u32);
    impl From<u32> for Id {
        fn from(value: u32) -> Self {
            Id(value)
        }
    }

    struct Position;
    struct Velocity;

    #[test]
    fn first_use_allocates_an_id() {
        // Given
        let registry = TypeRegistry::<Id>::new();

        // When
        let id = registry.get_or_register::<Position>();

        // Then
        assert_eq!(registry.get::<Position>(), Some(id));
    }

    #[test]
    fn repeated_registration_returns_the_same_id() {
        // Given
        let registry = TypeRegistry::<Id>::new();

        // When
        let first = registry.get_or_register::<Position>();
        let second = registry.get_or_register::<Position>();

        // Then
        assert_eq!(first, second);
    }

    #[test]
    fn distinct_types_get_distinct_ids() {
        // Given
        let registry = TypeRegistry::<Id>::new();

        // When
        let pos = registry.get_or_register::<Position>();
        let vel = registry.get_or_register::<Velocity>();

        // Then
        assert_ne!(pos, vel);
    }

    #[test]
    fn concurrent_registration_of_the_same_type_converges_on_one_id() {
        // Given
        use std::sync::Arc;
        use std::thread;

        let registry = Arc::new(TypeRegistry::<Id>::new());

        // When
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || registry.get_or_register::<Position>())
            })
            .collect();
        let ids: Vec<Id> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        // Then
        assert!(ids.iter().all(|&id| id == ids[0]));
    }
}
