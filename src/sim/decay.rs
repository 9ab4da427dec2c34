//! Warp intensity curve
//!
//! `w(t) = 0.5^t`: 1 at t=0, halves every second, never reaches 0.
//! Stretch and step are both derived from it once per frame.

/// Decay base (intensity halves every second)
pub const DECAY_BASE: f32 = 0.5;

/// Warp intensity remaining at `elapsed` seconds.
///
/// Floored at `f32::MIN_POSITIVE` so an underflowed power (t > ~126) still
/// reports a positive value.
#[inline]
pub fn decay(elapsed: f32) -> f32 {
    DECAY_BASE.powf(elapsed).max(f32::MIN_POSITIVE)
}

/// `value` limited to `[lo, hi]`. Same result as `f32::clamp` for ordered
/// bounds; never panics, and `hi` wins if the bounds are out of order.
#[inline]
pub(crate) fn bounded(value: f32, lo: f32, hi: f32) -> f32 {
    value.max(lo).min(hi)
}

/// Stretch along the travel axis: the decayed maximum, clamped to `[1, max_scale]`.
///
/// A `max_scale` below 1 (rejected by `WarpConfig::validate`) yields `max_scale`.
#[inline]
pub fn warp_stretch(intensity: f32, max_scale: f32) -> f32 {
    bounded(intensity * max_scale, 1.0, max_scale)
}

/// Distance traveled this frame.
///
/// The intensity is clamped into `[delta, delta * max_speed]`, so once the
/// intensity drops below `delta` the step is exactly `delta`. Out-of-order
/// bounds (negative `delta`, `max_speed < 1`) resolve to `delta * max_speed`.
#[inline]
pub fn warp_step(intensity: f32, delta: f32, max_speed: f32) -> f32 {
    bounded(intensity, delta, delta * max_speed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decay_at_zero_is_one() {
        assert_eq!(decay(0.0), 1.0);
    }

    #[test]
    fn test_decay_halves_each_second() {
        assert!((decay(1.0) - 0.5).abs() < 1e-6);
        assert!((decay(2.0) - 0.25).abs() < 1e-6);
        assert!((decay(10.0) - 1.0 / 1024.0).abs() < 1e-9);
    }

    #[test]
    fn test_decay_never_zero() {
        assert!(decay(50.0) > 0.0);
        assert!(decay(500.0) > 0.0);
        assert!(decay(f32::MAX) > 0.0);
    }

    #[test]
    fn test_stretch_full_at_start_floor_later() {
        assert_eq!(warp_stretch(decay(0.0), 50.0), 50.0);
        assert_eq!(warp_stretch(decay(50.0), 50.0), 1.0);
        // Partially decayed: 50 * 0.25
        assert!((warp_stretch(decay(2.0), 50.0) - 12.5).abs() < 1e-4);
    }

    #[test]
    fn test_step_ceiling_early() {
        let delta = 0.016;
        assert!((warp_step(decay(0.0), delta, 2.0) - 0.032).abs() < 1e-7);
    }

    #[test]
    fn test_step_floor_is_delta_late() {
        let delta = 0.016;
        assert_eq!(warp_step(decay(50.0), delta, 2.0), delta);
    }

    #[test]
    fn test_step_paused_host() {
        // delta == 0 collapses both bounds
        assert_eq!(warp_step(decay(0.0), 0.0, 2.0), 0.0);
        assert_eq!(warp_step(decay(3.0), 0.0, 2.0), 0.0);
    }

    #[test]
    fn test_out_of_order_bounds_do_not_panic() {
        assert_eq!(warp_step(0.5, -1.0, 2.0), -2.0);
        assert_eq!(warp_step(0.5, 0.016, 0.5), 0.008);
        assert_eq!(warp_stretch(1.0, 0.5), 0.5);
        assert!(warp_step(0.5, f32::NAN, 2.0).is_finite());
        assert!(warp_stretch(1.0, f32::NAN).is_finite());
    }

    #[test]
    fn test_step_between_bounds() {
        // decay(6) = 1/64 ≈ 0.0156, between delta=0.01 and 0.02
        let d = decay(6.0);
        assert_eq!(warp_step(d, 0.01, 2.0), d);
    }
}
