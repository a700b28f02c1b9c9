//! Smoothing and filter primitives
//!
//! Pure numeric helpers shared by the simulator and the stabilizer.
//! Nothing here knows about frames, ticks, or rendering.

use glam::Quat;

use crate::valid_dt;

/// Linear interpolation from `start` toward `target` by `factor` (unclamped)
#[inline]
pub fn lerp(start: f32, target: f32, factor: f32) -> f32 {
    start + (target - start) * factor
}

/// Frame-rate independent smoothing fraction: `1 - exp(-rate * dt)`
///
/// Returns 0 for a non-positive rate or an invalid `dt`, so callers can feed
/// the result straight into an interpolation without special-casing.
#[inline]
pub fn exp_factor(rate: f32, dt: f32) -> f32 {
    if !valid_dt(dt) || rate <= 0.0 || !rate.is_finite() {
        return 0.0;
    }
    1.0 - (-rate * dt).exp()
}

/// Move `current` toward `target` with exponential catch-up at `rate` per second
#[inline]
pub fn approach(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    lerp(current, target, exp_factor(rate, dt))
}

/// Shortest angle between two orientations, in degrees
#[inline]
pub fn angle_between_degrees(a: Quat, b: Quat) -> f32 {
    // q and -q are the same rotation; abs() picks the short way round
    let dot = a.normalize().dot(b.normalize()).abs().min(1.0);
    (2.0 * dot.acos()).to_degrees()
}

/// Spherical interpolation from `start` toward `target` by `factor` in [0, 1]
#[inline]
pub fn slerp(start: Quat, target: Quat, factor: f32) -> Quat {
    let t = factor.clamp(0.0, 1.0);
    if t <= 0.0 {
        return start;
    }
    if t >= 1.0 {
        return target;
    }
    start.slerp(target, t).normalize()
}
