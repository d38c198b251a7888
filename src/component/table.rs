//! Indexed-by-[`Id`](super::Id) table of type-erased, lazily-created component stores.

use std::any::Any;

use super::{Component, Id, Store};

/// One slot per registered component type, holding that type's [`Store`] once at least
/// one value of it has ever been inserted (or the store was otherwise created on first
/// access. An empty store and a never-touched type are indistinguishable from the
/// query engine's point of view; both report a dense length of zero).
#[derive(Default)]
pub(crate) struct Table {
    slots: Vec<Option<Box<dyn Any + Send + Sync>>>,
}

impl Table {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Get this component type's store, if it has ever been created.
    pub fn get<T: Component>(&self, id: Id) -> Option<&Store<T>> {
        self.slots
            .get(id.index())?
            .as_ref()
            .map(|boxed| downcast_store::<T>(boxed))
    }

    /// Get or lazily create this component type's store.
    pub fn get_or_create_mut<T: Component>(&mut self, id: Id) -> &mut Store<T> {
        if id.index() >= self.slots.len() {
            self.slots.resize_with(id.index() + 1, || None);
        }
        let slot = &mut self.slots[id.index()];
        if slot.is_none() {
            *slot = Some(Box::new(Store::<T>::new()));
        }
        downcast_store_mut::<T>(slot.as_mut().expect("slot just populated"))
    }

    /// Get this component type's store for mutation, if it has ever been created.
    pub fn get_mut<T: Component>(&mut self, id: Id) -> Option<&mut Store<T>> {
        self.slots
            .get_mut(id.index())?
            .as_mut()
            .map(|boxed| downcast_store_mut::<T>(boxed))
    }
}

fn downcast_store<T: Component>(boxed: &Box<dyn Any + Send + Sync>) -> &Store<T> {
    boxed
        .downcast_ref::<Store<T>>()
        .expect("component::Id always maps to the store of the type it was registered for")
}

fn downcast_store_mut<T: Component>(boxed: &mut Box<dyn Any + Send + Sync>) -> &mut Store<T> {
    boxed
        .downcast_mut::<Store<T>>()
        .expect("component::Id always maps to the store of the type it was registered for")
}
