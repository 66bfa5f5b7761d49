//! The Verlet rope itself.
//!
//! A [`VerletRope`] is a chain of [`RopeNode`]s kept at a fixed segment length by
//! an iterative constraint solver. Every fixed tick it integrates, relaxes its
//! segments while pushing nodes out of colliders, and may tear into two ropes.

pub mod attachment;
pub mod collision;
pub mod config;
pub mod constraints;
pub mod error;
pub mod integrator;
pub mod node;
pub mod tension;
pub mod topology;
pub mod verlet_rope;

pub use attachment::{Attachment, AttachmentSource};
pub use config::RopeConfig;
pub use error::RopeError;
pub use node::RopeNode;
pub use tension::TensionStats;
pub use verlet_rope::VerletRope;
