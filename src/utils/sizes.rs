use nalgebra::Vector3;

pub const VEC3_SIZE: usize = size_of::<Vector3<f32>>();
pub const F32X3_SIZE: usize = size_of::<[f32; 3]>();
