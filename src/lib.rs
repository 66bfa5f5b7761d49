//! Real-time Verlet ropes.
//!
//! A rope is a chain of point masses held together by distance constraints. It
//! collides with the scene, can carry attachments, tears in two when stretched too
//! far and renders as a smoothed polyline or tube mesh.
//!
//! ```rust
//! use nalgebra::Vector3;
//! use verlet_rope::physics::{PhysicsScene, TransformProvider};
//! use verlet_rope::rope::{RopeConfig, VerletRope};
//! use verlet_rope::world::RopeWorld;
//!
//! let mut scene = PhysicsScene::default();
//! let a = scene.new_transform(Vector3::new(0.0, 5.0, 0.0));
//! let b = scene.new_transform(Vector3::new(2.0, 5.0, 0.0));
//!
//! let config = RopeConfig::builder()
//!     .point_a(a)
//!     .point_b(b)
//!     .rope_length(3.0)
//!     .check_collisions(false)
//!     .build();
//!
//! let mut world = RopeWorld::new();
//! let id = world.insert(VerletRope::new(a, config, &scene));
//!
//! for _ in 0..60 {
//!     world.fixed_update(1.0 / 60.0, &mut scene);
//! }
//!
//! let rope = world.get(id).unwrap();
//! assert_eq!(rope.nodes()[0].position, scene.position(a).unwrap());
//! ```

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod physics;
pub mod rendering;
pub mod rope;
pub mod utils;
pub mod world;

pub use rope::{RopeConfig, VerletRope};
pub use world::{RopeId, RopeWorld};

pub use ::log;
pub use ::nalgebra;
pub use ::rapier3d;
