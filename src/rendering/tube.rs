use crate::rendering::geometry::{RopeMesh, RopeVertex};
use crate::utils::math::{VECTOR3_RIGHT, VECTOR3_UP, safe_normalize};
use nalgebra::Vector3;
use std::f32::consts::TAU;

/// Builds a closed tube around a polyline.
///
/// Every point gets a ring of `sides + 1` vertices, the last one duplicating the
/// first so the seam can carry its own texture coordinate later. Consecutive rings
/// are joined with two triangles per side.
#[derive(Debug, Clone)]
pub struct TubeMeshBuilder {
    points: Vec<Vector3<f32>>,
    sides: u32,
    width: f32,
}

impl TubeMeshBuilder {
    pub fn new(points: Vec<Vector3<f32>>) -> Self {
        TubeMeshBuilder {
            points,
            sides: 8,
            width: 0.1,
        }
    }

    pub fn with_sides(mut self, sides: u32) -> Self {
        self.sides = sides.max(2);
        self
    }

    pub fn with_width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    pub fn build(self) -> RopeMesh {
        let ring = self.sides as usize + 1;
        let mut vertices = Vec::with_capacity(self.points.len() * ring);

        let mut forward = VECTOR3_RIGHT;
        for i in 0..self.points.len() {
            let prev = self.points[i.saturating_sub(1)];
            let next = self.points[(i + 1).min(self.points.len() - 1)];
            forward = safe_normalize(next - prev).unwrap_or(forward);

            let (right, up) = ring_frame(&forward);
            for side in 0..=self.sides {
                let angle = TAU * side as f32 / self.sides as f32;
                let normal = up * angle.cos() + right * angle.sin();
                vertices.push(RopeVertex::new(
                    self.points[i] + normal * (self.width * 0.5),
                    normal,
                ));
            }
        }

        RopeMesh {
            vertices,
            indices: self.indices(),
        }
    }

    fn indices(&self) -> Vec<u32> {
        let ring = self.sides + 1;
        let segments = self.points.len().saturating_sub(1) as u32;
        let mut indices = Vec::with_capacity(segments as usize * self.sides as usize * 6);

        for segment in 0..segments {
            for side in 0..self.sides {
                let top_left = segment * ring + side;
                let top_right = (segment + 1) * ring + side;
                let bottom_left = top_left + 1;
                let bottom_right = top_right + 1;

                indices.extend_from_slice(&[top_left, bottom_left, top_right]);
                indices.extend_from_slice(&[top_right, bottom_left, bottom_right]);
            }
        }

        // Flip the winding so the outside faces front
        indices.reverse();
        indices
    }
}

impl From<TubeMeshBuilder> for RopeMesh {
    fn from(builder: TubeMeshBuilder) -> Self {
        builder.build()
    }
}

/// Right and up axes of the ring plane perpendicular to `forward`.
fn ring_frame(forward: &Vector3<f32>) -> (Vector3<f32>, Vector3<f32>) {
    let reference = if forward.dot(&VECTOR3_UP).abs() > 1.0 - 1e-6 {
        VECTOR3_RIGHT
    } else {
        VECTOR3_UP
    };

    let right = safe_normalize(reference.cross(forward)).unwrap_or(VECTOR3_RIGHT);
    let up = forward.cross(&right);
    (right, up)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn horizontal(count: usize) -> Vec<Vector3<f32>> {
        (0..count)
            .map(|i| Vector3::new(i as f32, 0.0, 0.0))
            .collect()
    }

    #[test]
    fn counts_follow_sides_and_points() {
        let mesh = TubeMeshBuilder::new(horizontal(5)).with_sides(6).build();

        assert_eq!(mesh.vertices.len(), 7 * 5);
        assert_eq!(mesh.triangle_count(), 2 * 6 * 4);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
    }

    #[test]
    fn ring_lies_at_half_width() {
        let mesh = TubeMeshBuilder::new(horizontal(2))
            .with_sides(4)
            .with_width(0.5)
            .build();

        for vertex in &mesh.vertices[..5] {
            assert!((vertex.position.norm() - 0.25).abs() < 1e-5);
            assert!(vertex.position.x.abs() < 1e-5);
        }
        assert!((mesh.vertices[0].position - mesh.vertices[4].position).norm() < 1e-5);
    }

    #[test]
    fn winding_is_reversed() {
        let mesh = TubeMeshBuilder::new(horizontal(2)).with_sides(2).build();
        let ring = 3;

        // last emitted triangle of the last quad comes out first
        assert_eq!(&mesh.indices[..3], &[ring + 2, 2, ring + 1]);
    }

    #[test]
    fn vertical_rope_has_no_nan() {
        let points = vec![Vector3::new(0.0, 2.0, 0.0), Vector3::zeros()];
        let mesh = TubeMeshBuilder::new(points).build();

        assert!(
            mesh.vertices
                .iter()
                .all(|v| v.position.iter().all(|c| c.is_finite()))
        );
    }

    #[test]
    fn single_point_has_no_triangles() {
        let mesh: RopeMesh = TubeMeshBuilder::new(horizontal(1)).into();
        assert_eq!(mesh.vertices.len(), 9);
        assert!(mesh.indices.is_empty());
    }
}
