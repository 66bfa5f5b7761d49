use crate::physics::{BodyId, NodeShape, TransformId};
use crate::rope::error::RopeError::*;
use crate::rope::error::*;
use bon::Builder;
use nalgebra::Vector3;
use snafu::ensure;

pub const MIN_NODE_COUNT: usize = 2;
pub const MIN_ROPE_LENGTH: f32 = 0.01;
pub const MIN_ROPE_SIDES: u32 = 2;
pub const MAX_ROPE_SIDES: u32 = 20;
pub const MAX_SMOOTHING_ITERATIONS: u32 = 4;
pub const MAX_ROPE_WIDTH: f32 = 5.0;

/// Tunables of a [`VerletRope`](crate::rope::VerletRope).
///
/// ```rust
/// use verlet_rope::rope::RopeConfig;
///
/// let config = RopeConfig::builder()
///     .node_count(20)
///     .rope_length(4.0)
///     .constraint_iterations(30)
///     .build();
///
/// assert_eq!(config.node_count, 20);
/// assert!(config.allow_tearing);
/// ```
#[derive(Debug, Clone, Builder)]
pub struct RopeConfig {
    // Design
    #[builder(default = 15)]
    pub node_count: usize,
    #[builder(default = 1.0)]
    pub rope_length: f32,

    // Position
    pub point_a: Option<TransformId>,
    pub point_b: Option<TransformId>,
    #[builder(default = true)]
    pub lock_point_a: bool,
    #[builder(default = true)]
    pub lock_point_b: bool,

    // Attachments
    #[builder(default = false)]
    pub lerp_attach_point: bool,
    #[builder(default = true)]
    pub detach_on_break: bool,
    #[builder(default = false)]
    pub slide_attachments: bool,

    // Simulation
    #[builder(default = 50)]
    pub constraint_iterations: u32,
    #[builder(default = 0.15)]
    pub gravity_multiplier: f32,
    #[builder(default = Vector3::zeros())]
    pub external_force: Vector3<f32>,
    #[builder(default = true)]
    pub allow_tearing: bool,
    #[builder(default = 0.5)]
    pub tear_tension: f32,
    #[builder(default = 1.0)]
    pub tear_cooldown: f32,

    // Rigid body pulling
    #[builder(default = false)]
    pub pull_bodies: bool,
    pub point_a_body: Option<BodyId>,
    pub point_b_body: Option<BodyId>,
    #[builder(default = 0.1)]
    pub tension_threshold: f32,
    #[builder(default = 100.0)]
    pub pull_force: f32,

    // Collisions
    pub node_shape: Option<NodeShape>,
    #[builder(default = true)]
    pub check_collisions: bool,
    #[builder(default = 1.0)]
    pub collision_padding: f32,

    // Debugging
    #[builder(default = false)]
    pub report_tension: bool,

    // Rendering
    #[builder(default = 0.1)]
    pub rope_width: f32,
    #[builder(default = 0)]
    pub smoothing_iterations: u32,
    #[builder(default = false)]
    pub draw_mesh: bool,
    #[builder(default = 8)]
    pub rope_sides: u32,
}

impl Default for RopeConfig {
    fn default() -> Self {
        RopeConfig::builder().build()
    }
}

impl RopeConfig {
    #[inline]
    pub fn segment_length(&self) -> f32 {
        self.rope_length / self.node_count as f32
    }

    pub fn collision_radius(&self) -> f32 {
        let radius = self.rope_width * 0.5;
        radius + radius * self.collision_padding
    }

    pub fn collisions_active(&self) -> bool {
        self.check_collisions && self.node_shape.is_some()
    }

    /// Reports the first misconfiguration without touching anything.
    pub fn try_validate(&self) -> Result<(), RopeError> {
        ensure!(self.point_a.is_some() || self.point_b.is_some(), NoAnchorsErr);
        ensure!(self.point_a.is_some(), MissingPointAErr);
        ensure!(!self.lock_point_b || self.point_b.is_some(), LockedPointBUnassignedErr);
        ensure!(
            !self.check_collisions || self.node_shape.is_some(),
            NoNodeShapeErr
        );
        ensure!(
            self.node_count >= MIN_NODE_COUNT,
            TooFewNodesErr {
                count: self.node_count
            }
        );
        ensure!(
            (MIN_ROPE_SIDES..=MAX_ROPE_SIDES).contains(&self.rope_sides),
            RopeSidesOutOfRangeErr {
                sides: self.rope_sides,
                clamped: self.rope_sides.clamp(MIN_ROPE_SIDES, MAX_ROPE_SIDES),
            }
        );
        Ok(())
    }

    /// Corrects every misconfiguration to its nearest safe default.
    ///
    /// `owner` becomes the sole anchor when neither anchor is assigned.
    /// Returns what had to be corrected.
    pub fn sanitize(&mut self, owner: TransformId) -> Vec<RopeError> {
        let mut corrected = Vec::new();

        if self.point_a.is_none() && self.point_b.is_none() {
            self.point_a = Some(owner);
            corrected.push(NoAnchors);
        } else if self.point_a.is_none() {
            self.point_a = self.point_b.take();
            corrected.push(MissingPointA);
        }

        if self.point_b.is_none() && self.lock_point_b {
            self.lock_point_b = false;
            corrected.push(LockedPointBUnassigned);
        }

        if self.check_collisions && self.node_shape.is_none() {
            self.check_collisions = false;
            corrected.push(NoNodeShape);
        }

        if self.node_count < MIN_NODE_COUNT {
            corrected.push(TooFewNodes {
                count: self.node_count,
            });
            self.node_count = MIN_NODE_COUNT;
        }

        let sides = self.rope_sides.clamp(MIN_ROPE_SIDES, MAX_ROPE_SIDES);
        if sides != self.rope_sides {
            corrected.push(RopeSidesOutOfRange {
                sides: self.rope_sides,
                clamped: sides,
            });
            self.rope_sides = sides;
        }

        self.rope_length = self.rope_length.max(MIN_ROPE_LENGTH);
        self.constraint_iterations = self.constraint_iterations.max(1);
        self.tear_tension = self.tear_tension.max(0.01);
        self.collision_padding = self.collision_padding.clamp(-1.0, 1.0);
        self.rope_width = self.rope_width.clamp(0.0, MAX_ROPE_WIDTH);
        self.smoothing_iterations = self.smoothing_iterations.min(MAX_SMOOTHING_ITERATIONS);

        corrected
    }
}
