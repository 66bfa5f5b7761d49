use nalgebra::Vector3;
use num_traits::Float;

pub const VECTOR3_UP: Vector3<f32> = Vector3::new(0.0, 1.0, 0.0);
pub const VECTOR3_DOWN: Vector3<f32> = Vector3::new(0.0, -1.0, 0.0);
pub const VECTOR3_RIGHT: Vector3<f32> = Vector3::new(1.0, 0.0, 0.0);

pub trait FloatMathExt {
    fn lerp(self, other: Self, t: Self) -> Self;

    /// Where `self` lies between `a` and `b`, clamped to `[0, 1]`.
    ///
    /// Returns `0` when `a == b`.
    fn inverse_lerp(self, a: Self, b: Self) -> Self;
}

impl<T: Float> FloatMathExt for T {
    fn lerp(self, other: Self, t: Self) -> Self {
        self * (T::one() - t) + other * t
    }

    fn inverse_lerp(self, a: Self, b: Self) -> Self {
        if a == b {
            return T::zero();
        }
        ((self - a) / (b - a)).max(T::zero()).min(T::one())
    }
}

/// Splits a fractional index into its floor index and the remainder toward the next index.
pub fn split_fraction(value: f32) -> (usize, f32) {
    let floor = value.max(0.0).floor();
    (floor as usize, value - floor)
}

/// Normalizes `v`, returning `None` for (near) zero-length vectors instead of NaNs.
pub fn safe_normalize(v: Vector3<f32>) -> Option<Vector3<f32>> {
    v.try_normalize(f32::EPSILON)
}
