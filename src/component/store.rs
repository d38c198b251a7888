//! The sparse/dense table backing a single component type.

use crate::entity::{Entity, NO_ENTITY};

/// A sparse/dense store for one component type `T`.
///
/// `dense` and `dense_entities` are parallel, hole-free arrays: `dense[i]` is the
/// component value owned by `dense_entities[i]`. `sparse` is indexed by entity id and
/// either holds [`NO_ENTITY`] or an index into `dense`.
///
/// Removal is swap-pop: the last element takes the removed slot's place, keeping
/// `dense` contiguous at the cost of reordering it. Callers that need stable ordering
/// should not rely on `dense` index stability across a `remove` call.
///
/// # Invariants
///
/// After every call to [`insert`](Store::insert) or [`remove`](Store::remove):
/// - `dense.len() == dense_entities.len()`
/// - for every `i < dense.len()`: `sparse[dense_entities[i].index()] == i`
/// - for every entity `e` with `sparse[e.index()] != NO_ENTITY`: `dense_entities[sparse[e.index()]] == e`
pub struct Store<T> {
    dense: Vec<T>,
    dense_entities: Vec<Entity>,
    sparse: Vec<u64>,
}

impl<T> Default for Store<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Store<T> {
    pub fn new() -> Self {
        Self {
            dense: Vec::new(),
            dense_entities: Vec::new(),
            sparse: Vec::new(),
        }
    }

    /// Attach `value` to `e`. No-op if `e` already has a value in this store.
    pub fn insert(&mut self, e: Entity, value: T) {
        if self.has(e) {
            return;
        }

        self.dense.push(value);
        self.dense_entities.push(e);
        let index = self.dense.len() - 1;

        if e.index() >= self.sparse.len() {
            self.sparse.resize(e.index() + 1, NO_ENTITY);
        }
        self.sparse[e.index()] = index as u64;
    }

    /// Detach `e`'s value, if any, via swap-pop. No-op if `e` has no value here.
    pub fn remove(&mut self, e: Entity) {
        let Some(index) = self.dense_index(e) else {
            return;
        };

        self.dense.swap_remove(index);
        self.dense_entities.swap_remove(index);

        if index < self.dense_entities.len() {
            // The element that used to be last now lives at `index`.
            self.sparse[self.dense_entities[index].index()] = index as u64;
        }

        self.sparse[e.index()] = NO_ENTITY;
    }

    /// Immutable access to `e`'s value, if present.
    #[inline]
    pub fn get(&self, e: Entity) -> Option<&T> {
        self.dense_index(e).map(|i| &self.dense[i])
    }

    /// Mutable access to `e`'s value, if present.
    #[inline]
    pub fn get_mut(&mut self, e: Entity) -> Option<&mut T> {
        self.dense_index(e).map(|i| &mut self.dense[i])
    }

    /// Whether `e` currently has a value in this store.
    #[inline]
    pub fn has(&self, e: Entity) -> bool {
        self.dense_index(e).is_some()
    }

    /// Number of values currently stored (the length of the dense array).
    #[inline]
    pub fn len(&self) -> usize {
        self.dense.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    /// The dense, hole-free array of owning entities, parallel to the component values.
    #[inline]
    pub fn dense_entities(&self) -> &[Entity] {
        &self.dense_entities
    }

    #[inline]
    fn dense_index(&self, e: Entity) -> Option<usize> {
        let raw = *self.sparse.get(e.index())?;
        if raw == NO_ENTITY {
            None
        } else {
            Some(raw as usize)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Allocator;

    #[test]
    fn insert_then_get_round_trips() {
        // Given
        let mut allocator = Allocator::new();
        let mut store = Store::new();
        let e = allocator.alloc();

        // When
        store.insert(e, 7);

        // Then
        assert_eq!(store.get(e), Some(&7));
        assert!(store.has(e));
    }

    #[test]
    fn insert_twice_is_a_no_op() {
        // Given
        let mut allocator = Allocator::new();
        let mut store = Store::new();
        let e = allocator.alloc();

        // When
        store.insert(e, 1);
        store.insert(e, 2);

        // Then
        assert_eq!(store.get(e), Some(&1));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn remove_clears_presence() {
        // Given
        let mut allocator = Allocator::new();
        let mut store = Store::new();
        let e = allocator.alloc();
        store.insert(e, 42);

        // When
        store.remove(e);

        // Then
        assert_eq!(store.get(e), None);
        assert!(!store.has(e));
    }

    #[test]
    fn remove_absent_entity_is_a_no_op() {
        // Given
        let mut allocator = Allocator::new();
        let mut store: Store<i32> = Store::new();
        let e = allocator.alloc();

        // When / Then (must not panic)
        store.remove(e);
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn swap_pop_preserves_remaining_entities_and_values() {
        // Given
        let mut allocator = Allocator::new();
        let mut store = Store::new();
        let e0 = allocator.alloc();
        let e1 = allocator.alloc();
        let e2 = allocator.alloc();
        store.insert(e0, 0);
        store.insert(e1, 1);
        store.insert(e2, 2);

        // When
        store.remove(e0);

        // Then
        assert_eq!(store.get(e0), None);
        assert_eq!(store.get(e1), Some(&1));
        assert_eq!(store.get(e2), Some(&2));
        assert_eq!(store.len(), 2);

        // The invariant that matters is index consistency, not which element moved.
        for (i, &owner) in store.dense_entities().iter().enumerate() {
            assert_eq!(store.dense_index(owner), Some(i));
        }
    }

    #[test]
    fn removing_last_element_still_clears_its_sparse_slot() {
        // Given
        let mut allocator = Allocator::new();
        let mut store = Store::new();
        let e0 = allocator.alloc();
        let e1 = allocator.alloc();
        store.insert(e0, 0);
        store.insert(e1, 1);

        // When
        store.remove(e1);

        // Then
        assert_eq!(store.get(e1), None);
        assert_eq!(store.get(e0), Some(&0));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn get_on_entity_beyond_sparse_len_is_none() {
        // Given
        let mut allocator = Allocator::new();
        let store: Store<i32> = Store::new();
        let e = allocator.alloc();

        // Then
        assert_eq!(store.get(e), None);
        assert!(!store.has(e));
    }
}
