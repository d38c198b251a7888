//! A tour of the public surface: entities, components, resources, ad-hoc queries, and
//! a schedule run both serially and in parallel.

use sparse_ecs::query::{Read, Res, ResMut, Write};
use sparse_ecs::schedule::Schedule;
use sparse_ecs::world::World;
use sparse_ecs::{Component, Unique};

#[derive(Component, Debug)]
struct Position {
    x: f32,
    y: f32,
}

#[derive(Component, Debug)]
struct Velocity {
    dx: f32,
    dy: f32,
}

#[derive(Component, Debug)]
struct Name(&'static str);

#[derive(Unique, Debug)]
struct GameTime {
    elapsed: f32,
}

fn main() {
    let mut world = World::new();

    let player = world.create_entity();
    world.add_component(player, Position { x: 0.0, y: 0.0 });
    world.add_component(player, Velocity { dx: 1.0, dy: 0.5 });
    world.add_component(player, Name("player"));

    for i in 0..9 {
        let npc = world.create_entity();
        world.add_component(npc, Position { x: i as f32, y: 0.0 });
        world.add_component(npc, Velocity { dx: 0.0, dy: 0.0 });
    }

    world.insert_resource(GameTime { elapsed: 0.0 });

    println!("entities carrying both Position and Velocity:");
    world.for_each::<(Read<Position>, Read<Velocity>), _>(|_view, entity, (pos, vel)| {
        println!("  {entity:?}: pos=({:.1}, {:.1}) vel=({:.1}, {:.1})", pos.x, pos.y, vel.dx, vel.dy);
    });

    // Register the integrator once and run it from a schedule — the same query can be
    // driven ad hoc via `for_each` or scheduled and batched for parallel dispatch.
    let mut schedule = Schedule::new();
    world.add_system::<(Write<Position>, Read<Velocity>, ResMut<GameTime>), _>(
        &mut schedule,
        |_view, _entity, (pos, vel, time)| {
            pos.x += vel.dx;
            pos.y += vel.dy;
            time.elapsed += 1.0;
        },
    );

    world.run_schedule(&schedule);
    println!("\nafter one serial tick, GameTime.elapsed = {:?}", world.get_resource::<GameTime>().unwrap());

    // A second, independent system with a disjoint write set can run in the same
    // parallel batch as the first — neither touches the other's component or resource
    // types, so the scheduler places them together rather than serializing them.
    let mut parallel_schedule = Schedule::new();
    world.add_system::<(Write<Position>, Read<Velocity>), _>(&mut parallel_schedule, |_view, _entity, (pos, vel)| {
        pos.x += vel.dx;
        pos.y += vel.dy;
    });
    world.add_system::<(Read<Name>, Res<GameTime>), _>(&mut parallel_schedule, |_view, entity, (name, time)| {
        log::debug!("{entity:?} ({}) observed at elapsed={}", name.0, time.elapsed);
    });

    world
        .run_schedule_parallel(&parallel_schedule)
        .expect("neither system in this schedule panics");

    println!("after one parallel tick, player is now at:");
    if let Some(pos) = world.get_component::<Position>(player) {
        println!("  ({:.1}, {:.1})", pos.x, pos.y);
    }
}
