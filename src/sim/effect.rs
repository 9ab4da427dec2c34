//! Screen-space distortion offset
//!
//! The post-process stage shifts colour channels by `offset`; it tracks the
//! same warp intensity that drives the particles.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::decay::bounded;
use super::gate::WarpPhase;

/// What the distortion offset follows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DistortionSource {
    /// `clamp(decay * base, 0, base)` every frame
    #[default]
    Decay,
    /// Full `base` while warping, zero once settled (needs a gate)
    Phase,
}

/// Uniform block handed to the post-process shader (16 bytes)
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct DistortionUniform {
    /// (ox, oy); both components are always equal
    pub offset: [f32; 2],
    _pad: [f32; 2],
}

impl DistortionUniform {
    pub fn from_offset(offset: f32) -> Self {
        Self {
            offset: [offset, offset],
            _pad: [0.0; 2],
        }
    }

    pub fn offset(&self) -> Vec2 {
        Vec2::from_array(self.offset)
    }
}

/// Decay-driven offset, clamped to `[0, base]`
///
/// Never panics: a negative `base_offset` yields `base_offset` and a NaN one
/// yields 0 (both rejected by `WarpConfig::validate`).
#[inline]
pub fn distortion_offset(intensity: f32, base_offset: f32) -> f32 {
    bounded(intensity * base_offset, 0.0, base_offset)
}

/// Offset for this frame
pub fn bridge(
    source: DistortionSource,
    intensity: f32,
    base_offset: f32,
    phase: Option<WarpPhase>,
) -> DistortionUniform {
    let offset = match source {
        DistortionSource::Decay => distortion_offset(intensity, base_offset),
        DistortionSource::Phase => match phase {
            Some(WarpPhase::Settled) => 0.0,
            _ => base_offset,
        },
    };
    DistortionUniform::from_offset(offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::decay::decay;

    #[test]
    fn test_offset_full_at_start() {
        let u = bridge(DistortionSource::Decay, decay(0.0), 0.007, None);
        assert_eq!(u.offset, [0.007, 0.007]);
    }

    #[test]
    fn test_offset_tracks_decay() {
        for t in [0.5_f32, 1.0, 3.0, 10.0, 50.0] {
            let u = bridge(DistortionSource::Decay, decay(t), 0.007, None);
            let expected = (decay(t) * 0.007).clamp(0.0, 0.007);
            assert_eq!(u.offset[0], expected);
            assert_eq!(u.offset[0], u.offset[1]);
        }
    }

    #[test]
    fn test_offset_zero_base() {
        let u = bridge(DistortionSource::Decay, 1.0, 0.0, None);
        assert_eq!(u.offset(), Vec2::ZERO);
    }

    #[test]
    fn test_offset_unvalidated_base_does_not_panic() {
        assert_eq!(distortion_offset(1.0, f32::NAN), 0.0);
        assert_eq!(distortion_offset(0.5, -0.01), -0.01);
    }

    #[test]
    fn test_phase_source() {
        let warping = bridge(DistortionSource::Phase, 1e-9, 0.01, Some(WarpPhase::Warping));
        assert_eq!(warping.offset, [0.01, 0.01]);
        let settled = bridge(DistortionSource::Phase, 1.0, 0.01, Some(WarpPhase::Settled));
        assert_eq!(settled.offset, [0.0, 0.0]);
    }

    #[test]
    fn test_uniform_size() {
        assert_eq!(std::mem::size_of::<DistortionUniform>(), 16);
    }
}
