//! The aggregate owning every store, the entity allocator, the system table, and the
//! worker pool, the one type embedding code actually talks to.

use crate::component::{self, Component};
use crate::entity::{self, Entity};
use crate::error::ScheduleError;
use crate::query::{self, Data};
use crate::registry::TypeRegistry;
use crate::resource::{self, Unique};
use crate::schedule::Schedule;
use crate::scheduler::{self, WorkerPool};
use crate::system;

/// Owns all entity, component, resource, and system state for one simulation.
///
/// Worlds do not share state: creating a second `World` starts a fresh entity counter,
/// fresh component/resource type ids, and a fresh worker pool. Nothing here is a
/// process-global, so multiple worlds may coexist in the same process.
pub struct World {
    entities: entity::Allocator,
    component_ids: TypeRegistry<component::Id>,
    components: component::Table,
    resource_ids: TypeRegistry<resource::Id>,
    resources: resource::Table,
    systems: system::Table,
    pool: WorkerPool,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// Create a world whose worker pool is sized to the host's available parallelism.
    pub fn new() -> Self {
        Self::with_worker_pool_size(
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        )
    }

    /// Create a world with an explicitly sized worker pool, overriding the
    /// available-parallelism default, the one runtime-tunable knob this crate exposes.
    pub fn with_worker_pool_size(size: usize) -> Self {
        World {
            entities: entity::Allocator::new(),
            component_ids: TypeRegistry::new(),
            components: component::Table::new(),
            resource_ids: TypeRegistry::new(),
            resources: resource::Table::new(),
            systems: system::Table::new(),
            pool: WorkerPool::new(size),
        }
    }

    // ---------------------------------------------------------------- entities

    /// Allocate a fresh entity. Ids are strictly increasing and never reused.
    pub fn create_entity(&mut self) -> Entity {
        self.entities.alloc()
    }

    // --------------------------------------------------------------- components

    /// Attach `value` as entity `e`'s `T`. A no-op if `e` already has a `T`.
    pub fn add_component<T: Component>(&mut self, e: Entity, value: T) {
        let id = self.component_ids.get_or_register::<T>();
        self.components.get_or_create_mut::<T>(id).insert(e, value);
    }

    /// Detach entity `e`'s `T`, if any. A no-op if `e` has no `T`, or `T` was never used
    /// in this world.
    pub fn remove_component<T: Component>(&mut self, e: Entity) {
        if let Some(id) = self.component_ids.get::<T>() {
            if let Some(store) = self.components.get_mut::<T>(id) {
                store.remove(e);
            }
        }
    }

    /// Read-only access to entity `e`'s `T`, if present.
    pub fn get_component<T: Component>(&self, e: Entity) -> Option<&T> {
        let id = self.component_ids.get::<T>()?;
        self.components.get::<T>(id)?.get(e)
    }

    /// Mutable access to entity `e`'s `T`, if present.
    pub fn get_component_mut<T: Component>(&mut self, e: Entity) -> Option<&mut T> {
        let id = self.component_ids.get::<T>()?;
        self.components.get_mut::<T>(id)?.get_mut(e)
    }

    pub(crate) fn component_id<T: Component>(&self) -> component::Id {
        self.component_ids.get_or_register::<T>()
    }

    pub(crate) fn has_component<T: Component>(&self, e: Entity) -> bool {
        match self.component_ids.get::<T>() {
            Some(id) => self.components.get::<T>(id).is_some_and(|store| store.has(e)),
            None => false,
        }
    }

    /// `T`'s dense entity list, or an empty slice if `T` has never been used. A missing
    /// store is indistinguishable from an empty one to the query engine.
    pub(crate) fn component_dense_entities<T: Component>(&self) -> &[Entity] {
        match self.component_ids.get::<T>() {
            Some(id) => self.components.get::<T>(id).map_or(&[], |store| store.dense_entities()),
            None => &[],
        }
    }

    /// # Safety
    ///
    /// The caller (a [`query::Term`] impl) must ensure this is the only live mutable
    /// access to entity `e`'s `T` for as long as the returned reference is used, and
    /// that no other slot in the same query aliases `T` with conflicting mutability.
    /// This is the split-borrow each [`Data::for_each`] call relies on to let `Write<T>`
    /// and `ResMut<T>` slots mutate through a shared `&World`.
    pub(crate) unsafe fn get_component_mut_unchecked<T: Component>(&self, e: Entity) -> Option<&mut T> {
        let id = self.component_ids.get::<T>()?;
        let components = &self.components as *const component::Table as *mut component::Table;
        // Safety: forwarded to the caller, per this method's own safety doc.
        unsafe { (*components).get_mut::<T>(id) }.and_then(|store| store.get_mut(e))
    }

    // ---------------------------------------------------------------- resources

    /// Insert or overwrite the singleton value of type `T`.
    pub fn insert_resource<T: Unique>(&mut self, value: T) {
        let id = self.resource_ids.get_or_register::<T>();
        self.resources.insert(id, value);
    }

    /// Read-only access to the singleton value of type `T`, if ever inserted.
    pub fn get_resource<T: Unique>(&self) -> Option<&T> {
        let id = self.resource_ids.get::<T>()?;
        self.resources.get::<T>(id)
    }

    /// Mutable access to the singleton value of type `T`, if ever inserted.
    pub fn get_resource_mut<T: Unique>(&mut self) -> Option<&mut T> {
        let id = self.resource_ids.get::<T>()?;
        self.resources.get_mut::<T>(id)
    }

    pub(crate) fn resource_id<T: Unique>(&self) -> resource::Id {
        self.resource_ids.get_or_register::<T>()
    }

    /// # Safety
    ///
    /// Same obligation as [`World::get_component_mut_unchecked`], over the resource
    /// table instead of a component store.
    pub(crate) unsafe fn get_resource_mut_unchecked<T: Unique>(&self) -> Option<&mut T> {
        let id = self.resource_ids.get::<T>()?;
        let resources = &self.resources as *const resource::Table as *mut resource::Table;
        // Safety: forwarded to the caller, per this method's own safety doc.
        unsafe { (*resources).get_mut::<T>(id) }
    }

    // ------------------------------------------------------------------ queries

    /// Run `Q`'s smallest-store-driven iteration once, invoking `f` per matching entity.
    ///
    /// Takes `&self`, not `&mut self`: see [`Data::for_each`]'s own doc comment for why
    /// that's sound. Calling this from inside another `for_each`/system callback over a
    /// conflicting `Q` is a violation of this crate's concurrency model (undefined, per
    /// the mid-iteration-mutation design note), not something this method checks.
    pub fn for_each<Q, F>(&self, f: F)
    where
        Q: Data,
        F: FnMut(query::View<'_, '_>, Entity, Q::Item<'_>),
    {
        Q::for_each(self, f);
    }

    // ------------------------------------------------------------------- systems

    /// Register `f` as a system over query `Q`, deriving its access set and inserting
    /// the freshly allocated [`system::Id`] into `schedule`.
    ///
    /// The id is never deduplicated by `Q` or by `f`'s type. Two systems declared with
    /// an identical query still get distinct ids (see [`system::Id`]'s doc comment).
    pub fn add_system<Q, F>(&mut self, schedule: &mut Schedule, f: F) -> system::Id
    where
        Q: Data + 'static,
        F: Fn(query::View<'_, '_>, Entity, Q::Item<'_>) + Send + Sync + 'static,
    {
        let access = Q::access(self);
        let id = self.systems.push::<Q, F>(access, f);
        schedule.insert(id);
        id
    }

    /// Remove `id` from `schedule`. A no-op if `id` is not a member. The system record
    /// itself stays in the world's table, since another schedule may still reference it.
    pub fn remove_system(&mut self, schedule: &mut Schedule, id: system::Id) {
        schedule.remove(id);
    }

    /// Run every system in `schedule`, in insertion order, on the calling thread.
    pub fn run_schedule(&self, schedule: &Schedule) {
        scheduler::run_schedule(self, &self.systems, schedule);
    }

    /// Plan conflict-free batches over `schedule` and run them across the worker pool,
    /// one batch at a time. Blocks until every system has executed exactly once.
    pub fn run_schedule_parallel(&self, schedule: &Schedule) -> Result<(), ScheduleError> {
        scheduler::run_schedule_parallel(self, &self.systems, schedule, &self.pool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{Read, Write};

    struct Position {
        x: f32,
    }
    impl Component for Position {}

    struct Velocity {
        dx: f32,
    }
    impl Component for Velocity {}

    struct GameTime {
        elapsed: f32,
    }
    impl Unique for GameTime {}

    #[test]
    fn scenario_basic_add_remove() {
        // Given
        let mut world = World::new();
        let e0 = world.create_entity();

        // When
        world.add_component(e0, Position { x: 7.0 });

        // Then
        assert_eq!(world.get_component::<Position>(e0).unwrap().x, 7.0);

        // When
        world.remove_component::<Position>(e0);

        // Then
        assert!(world.get_component::<Position>(e0).is_none());
    }

    #[test]
    fn scenario_empty_store_tolerance() {
        // Given
        let world = World::new();

        // When
        let mut count = 0;
        world.for_each::<Read<Position>, _>(|_view, _entity, _pos| count += 1);

        // Then
        assert_eq!(count, 0);
    }

    #[test]
    fn create_entity_ids_are_strictly_increasing() {
        // Given
        let mut world = World::new();

        // When
        let e0 = world.create_entity();
        let e1 = world.create_entity();
        let e2 = world.create_entity();

        // Then
        assert!(e0.id() < e1.id());
        assert!(e1.id() < e2.id());
    }

    #[test]
    fn resources_round_trip_and_overwrite() {
        // Given
        let mut world = World::new();

        // When
        world.insert_resource(GameTime { elapsed: 1.0 });

        // Then
        assert_eq!(world.get_resource::<GameTime>().unwrap().elapsed, 1.0);

        // When
        world.insert_resource(GameTime { elapsed: 2.0 });

        // Then
        assert_eq!(world.get_resource::<GameTime>().unwrap().elapsed, 2.0);
    }

    #[test]
    fn view_rejects_a_type_outside_the_declared_query() {
        // Given
        let mut world = World::new();
        let e = world.create_entity();
        world.add_component(e, Position { x: 0.0 });
        world.add_component(e, Velocity { dx: 1.0 });

        // Then
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            world.for_each::<Read<Position>, _>(|view, entity, _pos| {
                let _ = view.get::<Read<Velocity>>(entity);
            });
        }));
        assert!(result.is_err());
    }

    #[test]
    fn serial_and_parallel_schedules_agree_on_a_conflict_free_integrator() {
        // Given
        let mut serial_world = World::new();
        let mut parallel_world = World::new();
        for _ in 0..1000 {
            let e1 = serial_world.create_entity();
            serial_world.add_component(e1, Position { x: 0.0 });
            serial_world.add_component(e1, Velocity { dx: 1.0 });

            let e2 = parallel_world.create_entity();
            parallel_world.add_component(e2, Position { x: 0.0 });
            parallel_world.add_component(e2, Velocity { dx: 1.0 });
        }

        let mut serial_schedule = Schedule::new();
        serial_world.add_system::<(Write<Position>, Read<Velocity>), _>(
            &mut serial_schedule,
            |_view, _entity, (pos, vel)| pos.x += vel.dx,
        );

        let mut parallel_schedule = Schedule::new();
        parallel_world.add_system::<(Write<Position>, Read<Velocity>), _>(
            &mut parallel_schedule,
            |_view, _entity, (pos, vel)| pos.x += vel.dx,
        );

        // When
        serial_world.run_schedule(&serial_schedule);
        parallel_world.run_schedule_parallel(&parallel_schedule).unwrap();

        // Then
        let mut serial_positions = Vec::new();
        serial_world.for_each::<Read<Position>, _>(|_view, _entity, pos| serial_positions.push(pos.x));
        let mut parallel_positions = Vec::new();
        parallel_world.for_each::<Read<Position>, _>(|_view, _entity, pos| parallel_positions.push(pos.x));

        assert!(serial_positions.iter().all(|&x| x == 1.0));
        assert!(parallel_positions.iter().all(|&x| x == 1.0));
    }
}
