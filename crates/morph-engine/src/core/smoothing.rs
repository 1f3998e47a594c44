// core/smoothing.rs
//
// Interpolation helpers shared by the animators.
// No dependencies on particles or batches, just math.

use std::f32::consts::{PI, TAU};
use glam::Vec3;

/// Linear interpolation between two values.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Linear interpolation between two Vec3 values.
#[inline]
pub fn lerp_vec3(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a + (b - a) * t
}

/// Per-frame blend factor for exponential-style approach at `rate` per second.
///
/// This is the first-order `rate * dt` approximation of `1 - exp(-rate * dt)`,
/// clamped to [0, 1]: a zero delta leaves the value untouched and a huge
/// delta after a stall lands exactly on the target instead of overshooting.
#[inline]
pub fn blend_factor(rate: f32, dt: f32) -> f32 {
    let k = rate * dt;
    if k.is_nan() {
        return 0.0;
    }
    k.clamp(0.0, 1.0)
}

/// Component-wise interpolation of Euler angles.
///
/// Each axis is blended independently. This is not a spherical interpolation
/// and only looks right while the angular gap is small.
#[inline]
pub fn lerp_euler(current: Vec3, target: Vec3, t: f32) -> Vec3 {
    lerp_vec3(current, target, t)
}

/// Wrap an angle into [-π, π].
#[inline]
pub fn wrap_angle(a: f32) -> f32 {
    (a + PI).rem_euclid(TAU) - PI
}
