//! A sparse-set entity-component-system runtime.
//!
//! Entities are opaque ids; components live in per-type sparse/dense stores ([`component`]);
//! resources are world-scoped singletons ([`resource`]); queries ([`query`]) walk the
//! smallest relevant store; systems ([`system`]) bundle a query and a callback with a
//! derived access set, and a [`schedule::Schedule`] of them can run serially or across a
//! worker pool with automatic conflict avoidance ([`scheduler`]).
//!
//! ```rust,ignore
//! use sparse_ecs::query::{Read, Write};
//! use sparse_ecs::world::World;
//!
//! let mut world = World::new();
//! let e = world.create_entity();
//! world.add_component(e, Position { x: 0.0 });
//! world.add_component(e, Velocity { dx: 1.0 });
//!
//! world.for_each::<(Write<Position>, Read<Velocity>), _>(|_view, _entity, (pos, vel)| {
//!     pos.x += vel.dx;
//! });
//! ```

// Lets the derive macros in `sparse_ecs_macros` refer to `::sparse_ecs::...` and resolve
// correctly both from within this crate's own tests and from downstream crates.
extern crate self as sparse_ecs;

pub mod component;
pub mod entity;
pub mod error;
pub mod query;
pub mod resource;
pub mod schedule;
pub mod system;
pub(crate) mod registry;
pub(crate) mod scheduler;
pub(crate) mod util;
pub mod world;

pub use sparse_ecs_macros::{Component, Unique};

// TODO: Evaluate if we want to re-export certain items at this level
