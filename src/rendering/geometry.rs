use crate::utils::sizes::{F32X3_SIZE, VEC3_SIZE};
use nalgebra::Vector3;
use static_assertions::const_assert_eq;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct RopeVertex {
    pub position: Vector3<f32>,
    pub normal: Vector3<f32>,
}

const_assert_eq!(VEC3_SIZE, F32X3_SIZE);
const_assert_eq!(size_of::<RopeVertex>(), VEC3_SIZE * 2);

impl RopeVertex {
    pub const fn new(position: Vector3<f32>, normal: Vector3<f32>) -> Self {
        RopeVertex { position, normal }
    }
}

/// Triangle list of a rope tube. Every three indices form one triangle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RopeMesh {
    pub vertices: Vec<RopeVertex>,
    pub indices: Vec<u32>,
}

impl RopeMesh {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Raw vertex bytes, ready for a GPU upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

/// What a rope looks like this frame.
#[derive(Debug, Clone, PartialEq)]
pub enum RopeGeometry {
    /// A polyline of constant width.
    Line { points: Vec<Vector3<f32>>, width: f32 },
    Mesh(RopeMesh),
}

impl RopeGeometry {
    pub fn submit<G: GeometrySink + ?Sized>(&self, sink: &mut G) {
        match self {
            RopeGeometry::Line { points, width } => sink.line(points, *width),
            RopeGeometry::Mesh(mesh) => sink.mesh(&mesh.vertices, &mesh.indices),
        }
    }
}

/// A host renderer rope geometry is pushed to.
pub trait GeometrySink {
    fn line(&mut self, points: &[Vector3<f32>], width: f32);
    fn mesh(&mut self, vertices: &[RopeVertex], indices: &[u32]);
}
