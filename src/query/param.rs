//! `Data`: a whole query (one or more [`Term`] slots) and the smallest-store-driven
//! iteration algorithm that walks it.

use super::{Access, Term, View};
use crate::entity::Entity;
use crate::world::World;

/// A complete query: either a single [`Term`] or a tuple of them.
///
/// Implemented for `T: Term` directly (single-slot queries like `Read<Position>`) and
/// for tuples `(A, B, ...)` of up to 26 terms.
pub trait Data {
    /// The value handed to the callback: `T::Value<'w>` for a single term, or a tuple
    /// of each member's `Value<'w>` otherwise.
    type Item<'w>;

    /// The combined read/write access of every slot in this query.
    fn access(world: &World) -> Access;

    /// Run the smallest-store-driven iteration, invoking `f` once per matching entity.
    ///
    /// Takes `&World`, not `&mut World`: mutation through `Write<T>`/`ResMut<T>` slots
    /// happens via the unsafe pointer-cast methods on `World` (see
    /// `World::get_component_mut_unchecked`), the same split-borrow pattern used
    /// throughout this module. This is what lets a [`crate::scheduler`] batch run
    /// several systems' `for_each` calls concurrently against one shared `&World`.
    fn for_each(world: &World, f: impl FnMut(View<'_, '_>, Entity, Self::Item<'_>));
}

impl<T: Term> Data for T {
    type Item<'w> = T::Value<'w>;

    fn access(world: &World) -> Access {
        let mut access = Access::new();
        T::record_access(world, &mut access);
        access
    }

    fn for_each(world: &World, mut f: impl FnMut(View<'_, '_>, Entity, Self::Item<'_>)) {
        let declared = [T::type_key()];
        let Some(driving) = T::dense_entities(world) else {
            panic!("a query must declare at least one Read<T>/Write<T> component slot to drive iteration");
        };

        for &entity in driving {
            let view = View::new(world, &declared);
            // Safety: the sole slot's access was recorded via `access()` above; see the
            // tuple impl's safety note for the concurrency precondition this relies on.
            let item = unsafe { T::fetch(world, entity) };
            f(view, entity, item);
        }
    }
}

macro_rules! impl_data_for_tuple {
    ($($name:ident),+) => {
        #[allow(non_snake_case)]
        impl<$($name: Term),+> Data for ($($name,)+) {
            type Item<'w> = ($($name::Value<'w>,)+);

            fn access(world: &World) -> Access {
                let mut access = Access::new();
                $($name::record_access(world, &mut access);)+
                access
            }

            fn for_each(world: &World, mut f: impl FnMut(View<'_, '_>, Entity, Self::Item<'_>)) {
                let declared = [$($name::type_key()),+];

                // Pick the component slot with the smallest dense store as the driver;
                // ties go to the earliest slot in query order. Resource slots (which
                // report `None`) never drive iteration.
                let mut driving: Option<&[Entity]> = None;
                $(
                    if let Some(slice) = $name::dense_entities(world) {
                        driving = Some(match driving {
                            None => slice,
                            Some(current) if slice.len() < current.len() => slice,
                            Some(current) => current,
                        });
                    }
                )+
                let Some(driving) = driving else {
                    panic!("a query must declare at least one Read<T>/Write<T> component slot to drive iteration");
                };

                for &entity in driving {
                    let mut matched = true;
                    $(
                        if matched && !$name::has(world, entity) {
                            matched = false;
                        }
                    )+
                    if !matched {
                        continue;
                    }

                    let view = View::new(world, &declared);
                    // Safety: every slot's access was recorded via `access()` and, for
                    // systems run through a `Schedule`, validated conflict-free against
                    // every other system in the same batch before this call runs; for
                    // ad-hoc `World::for_each` calls the caller holds `&mut World`
                    // exclusively for the duration. No two slots here may alias the
                    // same component or resource type with conflicting mutability.
                    let item = unsafe { ($($name::fetch(world, entity),)+) };
                    f(view, entity, item);
                }
            }
        }
    };
}

crate::all_tuples!(impl_data_for_tuple);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Component;
    use crate::query::{Read, Write};

    struct A(u32);
    impl Component for A {}
    struct B(u32);
    impl Component for B {}

    #[test]
    fn single_term_query_drives_over_that_components_store() {
        // Given
        let mut world = World::new();
        let e0 = world.create_entity();
        let e1 = world.create_entity();
        world.add_component(e0, A(1));
        world.add_component(e1, A(2));

        // When
        let mut seen = Vec::new();
        <Read<A> as Data>::for_each(&mut world, |_view, entity, value| {
            seen.push((entity, value.0));
        });

        // Then
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn two_term_query_is_driven_by_the_smaller_store() {
        // Given
        let mut world = World::new();
        let mut many = Vec::new();
        for _ in 0..1000 {
            let e = world.create_entity();
            world.add_component(e, A(0));
            many.push(e);
        }
        for &e in &many[0..10] {
            world.add_component(e, B(0));
        }

        // When
        let mut count = 0;
        <(Read<A>, Read<B>) as Data>::for_each(&mut world, |_view, _entity, _item| {
            count += 1;
        });

        // Then
        assert_eq!(count, 10);
    }

    #[test]
    fn query_over_never_inserted_component_yields_nothing() {
        // Given
        struct Unused(u32);
        impl Component for Unused {}
        let mut world = World::new();

        // When
        let mut count = 0;
        <Read<Unused> as Data>::for_each(&mut world, |_view, _entity, _item| {
            count += 1;
        });

        // Then
        assert_eq!(count, 0);
    }

    #[test]
    fn write_slot_mutates_the_underlying_component() {
        // Given
        let mut world = World::new();
        let e = world.create_entity();
        world.add_component(e, A(1));

        // When
        <Write<A> as Data>::for_each(&mut world, |_view, _entity, value| {
            value.0 += 41;
        });

        // Then
        assert_eq!(world.get_component::<A>(e).unwrap().0, 42);
    }
}
