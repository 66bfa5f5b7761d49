//! Turning rope nodes into drawable geometry.

pub mod geometry;
pub mod smoothing;
pub mod tube;

pub use geometry::*;
pub use smoothing::smooth_points;
pub use tube::TubeMeshBuilder;
