use nalgebra::Vector3;

/// A point mass of the rope. Velocity is implicit: `position - previous_position`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RopeNode {
    pub position: Vector3<f32>,
    pub previous_position: Vector3<f32>,
}

impl RopeNode {
    /// A node at rest.
    pub fn new(position: Vector3<f32>) -> Self {
        RopeNode {
            position,
            previous_position: position,
        }
    }

    pub fn with_previous(position: Vector3<f32>, previous_position: Vector3<f32>) -> Self {
        RopeNode {
            position,
            previous_position,
        }
    }

    #[inline]
    pub fn velocity(&self) -> Vector3<f32> {
        self.position - self.previous_position
    }

    /// Interpolates position and previous position, keeping the implicit velocity blended too.
    pub fn lerp(&self, other: &RopeNode, t: f32) -> RopeNode {
        RopeNode {
            position: self.position.lerp(&other.position, t),
            previous_position: self.previous_position.lerp(&other.previous_position, t),
        }
    }
}
