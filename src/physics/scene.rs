//! Host-facing interfaces the rope consumes.
//!
//! The rope never owns anything in the scene. It reads anchor and attachment
//! positions through [`TransformProvider`], resolves penetrations through
//! [`CollisionProvider`] and pulls bodies through [`ForceReceiver`].

use nalgebra::Vector3;
use slotmap::new_key_type;
use smallvec::SmallVec;

new_key_type! {
    /// A scene transform the rope can anchor to or drive.
    pub struct TransformId;

    /// A rigid body that can receive rope pulling forces.
    pub struct BodyId;
}

/// Opaque collider handle, handed out by the [`CollisionProvider`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ColliderId(pub u64);

/// The shape every rope node collides with.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum NodeShape {
    Sphere { radius: f32 },
}

impl NodeShape {
    pub fn with_radius(self, radius: f32) -> Self {
        match self {
            NodeShape::Sphere { .. } => NodeShape::Sphere { radius },
        }
    }

    pub fn radius(&self) -> f32 {
        match self {
            NodeShape::Sphere { radius } => *radius,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ColliderOverlap {
    pub collider: ColliderId,
    pub is_trigger: bool,
}

/// Minimum translation that separates a node from a collider.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Penetration {
    pub direction: Vector3<f32>,
    pub depth: f32,
}

pub type Overlaps = SmallVec<[ColliderOverlap; 8]>;

pub trait TransformProvider {
    fn position(&self, id: TransformId) -> Option<Vector3<f32>>;
    fn set_position(&mut self, id: TransformId, position: Vector3<f32>);
}

pub trait CollisionProvider {
    fn overlap_sphere(&self, center: &Vector3<f32>, radius: f32) -> Overlaps;

    fn compute_penetration(
        &self,
        shape: &NodeShape,
        position: &Vector3<f32>,
        collider: ColliderId,
    ) -> Option<Penetration>;
}

pub trait ForceReceiver {
    fn add_force_at_position(&mut self, body: BodyId, force: Vector3<f32>, position: Vector3<f32>);
}

/// Everything a rope needs from the scene it lives in.
pub trait RopeScene: TransformProvider + CollisionProvider + ForceReceiver {
    fn gravity(&self) -> Vector3<f32>;
}
