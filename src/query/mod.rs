//! Typed queries over component and resource storage.
//!
//! A query is a heterogeneous tuple of **access qualifiers**:
//!
//! - [`Read<T>`]: read-only access to component `T`.
//! - [`Write<T>`]: mutable access to component `T`.
//! - [`Res<T>`]: read-only access to resource `T`.
//! - [`ResMut<T>`]: mutable access to resource `T`.
//!
//! These four names are the only legal query slot types; the [`Term`] trait is sealed so
//! user code cannot implement it for anything else, which is what makes
//! `World::for_each::<(Read<Position>, Write<Velocity>)>(...)` a compile error if you
//! write `&Position` by mistake instead of `Read<Position>`.
//!
//! ```rust,ignore
//! use sparse_ecs::query::{Read, Write};
//!
//! world.for_each::<(Read<Position>, Write<Velocity>), _>(|_view, _entity, (pos, vel)| {
//!     vel.dx += pos.x * 0.0;
//! });
//! ```

mod access;
mod param;
mod view;

pub use access::Access;
pub use view::View;

use std::marker::PhantomData;

use crate::entity::Entity;
use crate::world::World;

/// Read-only access to component `T` within a query.
pub struct Read<T>(PhantomData<fn() -> T>);

/// Mutable access to component `T` within a query.
pub struct Write<T>(PhantomData<fn() -> T>);

/// Read-only access to resource `T` within a query.
pub struct Res<T>(PhantomData<fn() -> T>);

/// Mutable access to resource `T` within a query.
pub struct ResMut<T>(PhantomData<fn() -> T>);

mod sealed {
    pub trait Sealed {}
    impl<T> Sealed for super::Read<T> {}
    impl<T> Sealed for super::Write<T> {}
    impl<T> Sealed for super::Res<T> {}
    impl<T> Sealed for super::ResMut<T> {}
}

/// A single identity a query term can reference: either a component type or a resource
/// type, each tracked in its own id space. Used by [`View`] to reject access to a type
/// not present in the declared query.
#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) enum TypeKey {
    Component(std::any::TypeId),
    Resource(std::any::TypeId),
}

/// One slot of a query: `Read<T>`, `Write<T>`, `Res<T>`, or `ResMut<T>`.
///
/// Sealed. The four types above are the only implementors. See module docs.
pub trait Term: sealed::Sealed {
    /// The type handed to the callback for this slot.
    type Value<'w>;

    /// This slot's identity, for view containment checks and access-set derivation.
    fn type_key() -> TypeKey;

    /// Record this slot's read/write access in `access`, registering the underlying
    /// type with the world if this is its first use.
    fn record_access(world: &World, access: &mut Access);

    /// For component slots: the slot's own store's dense entity list, used as a
    /// candidate driving sequence. `None` for resource slots, which are not
    /// entity-indexed and never drive iteration.
    fn dense_entities(world: &World) -> Option<&[Entity]>;

    /// Presence test used to gate non-driving component slots. Always `true` for
    /// resource slots (a resource has no notion of per-entity presence).
    fn has(world: &World, entity: Entity) -> bool;

    /// Fetch this slot's value for `entity`.
    ///
    /// # Safety
    ///
    /// The caller must ensure no two terms in the same query alias the same
    /// component or resource type with conflicting mutability (e.g. `Read<T>` and
    /// `Write<T>` together), and that no other code holds a live reference into the
    /// same store or resource slot for the duration of the returned value.
    unsafe fn fetch<'w>(world: &'w World, entity: Entity) -> Self::Value<'w>;
}

impl<T: crate::component::Component> Term for Read<T> {
    type Value<'w> = &'w T;

    fn type_key() -> TypeKey {
        TypeKey::Component(std::any::TypeId::of::<T>())
    }

    fn record_access(world: &World, access: &mut Access) {
        let id = world.component_id::<T>();
        access.read_component(id);
    }

    fn dense_entities(world: &World) -> Option<&[Entity]> {
        Some(world.component_dense_entities::<T>())
    }

    fn has(world: &World, entity: Entity) -> bool {
        world.has_component::<T>(entity)
    }

    unsafe fn fetch<'w>(world: &'w World, entity: Entity) -> Self::Value<'w> {
        world
            .get_component::<T>(entity)
            .expect("presence already checked by the driving/has gate")
    }
}

impl<T: crate::component::Component> Term for Write<T> {
    type Value<'w> = &'w mut T;

    fn type_key() -> TypeKey {
        TypeKey::Component(std::any::TypeId::of::<T>())
    }

    fn record_access(world: &World, access: &mut Access) {
        let id = world.component_id::<T>();
        access.write_component(id);
    }

    fn dense_entities(world: &World) -> Option<&[Entity]> {
        Some(world.component_dense_entities::<T>())
    }

    fn has(world: &World, entity: Entity) -> bool {
        world.has_component::<T>(entity)
    }

    unsafe fn fetch<'w>(world: &'w World, entity: Entity) -> Self::Value<'w> {
        // Safety: forwarded to the caller's obligations on `Term::fetch`.
        unsafe { world.get_component_mut_unchecked::<T>(entity) }
            .expect("presence already checked by the driving/has gate")
    }
}

impl<T: crate::resource::Unique> Term for Res<T> {
    type Value<'w> = &'w T;

    fn type_key() -> TypeKey {
        TypeKey::Resource(std::any::TypeId::of::<T>())
    }

    fn record_access(world: &World, access: &mut Access) {
        let id = world.resource_id::<T>();
        access.read_resource(id);
    }

    fn dense_entities(_world: &World) -> Option<&[Entity]> {
        None
    }

    fn has(_world: &World, _entity: Entity) -> bool {
        true
    }

    unsafe fn fetch<'w>(world: &'w World, _entity: Entity) -> Self::Value<'w> {
        world
            .get_resource::<T>()
            .expect("Res<T> fetched before T was ever inserted as a resource")
    }
}

impl<T: crate::resource::Unique> Term for ResMut<T> {
    type Value<'w> = &'w mut T;

    fn type_key() -> TypeKey {
        TypeKey::Resource(std::any::TypeId::of::<T>())
    }

    fn record_access(world: &World, access: &mut Access) {
        let id = world.resource_id::<T>();
        access.write_resource(id);
    }

    fn dense_entities(_world: &World) -> Option<&[Entity]> {
        None
    }

    fn has(_world: &World, _entity: Entity) -> bool {
        true
    }

    unsafe fn fetch<'w>(world: &'w World, _entity: Entity) -> Self::Value<'w> {
        // Safety: forwarded to the caller's obligations on `Term::fetch`.
        unsafe { world.get_resource_mut_unchecked::<T>() }
            .expect("ResMut<T> fetched before T was ever inserted as a resource")
    }
}

pub use param::Data;
