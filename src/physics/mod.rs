//! Scene access for ropes, backed by `rapier`.
//!
//! Ropes only talk to the [`RopeScene`] traits. [`PhysicsScene`] is the stock
//! implementation that keeps transforms, colliders and rigid bodies.

pub mod scene;
pub mod simulator;

pub use scene::*;
pub use simulator::*;
