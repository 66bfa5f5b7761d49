pub mod math;
pub mod sizes;

pub use math::*;
