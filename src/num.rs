//! Utilities for numerics.

/// Linearly interpolates between `a` and `b`.
///
/// `t = 0.0` returns `a`, `t = 1.0` returns `b`.
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
