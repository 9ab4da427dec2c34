//! Per-frame particle pass
//!
//! Every particle moves by the same step, takes the same stretch, and gets a
//! colour from its new depth. Particles leaving the travel volume are put
//! back on the opposite plane in the same pass, so they never render at a
//! stale colour or scale.

use glam::Vec3;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::decay::{decay, warp_step, warp_stretch};
use super::field::ParticleField;
use super::state::{FrameScratch, InstanceColor, InstanceTransform, Particle};
use crate::settings::{TravelDirection, WarpConfig};

/// Grey level for depth `z`: fully lit in front of z=0, fading linearly to
/// black at z = -z_half.
#[inline]
pub fn fade(z: f32, z_half: f32) -> f32 {
    if z > 0.0 {
        1.0
    } else {
        (1.0 - z / -z_half).clamp(0.0, 1.0)
    }
}

/// Fill `scratch` with this frame's shared values
pub fn prepare(
    scratch: &mut FrameScratch,
    config: &WarpConfig,
    seed: u64,
    elapsed: f32,
    delta: f32,
    frame: u64,
    stretch_enabled: bool,
) {
    let intensity = decay(elapsed);

    scratch.frame = frame;
    scratch.intensity = intensity;
    scratch.stretch = if stretch_enabled {
        warp_stretch(intensity, config.max_scale_factor)
    } else {
        1.0
    };
    scratch.step = warp_step(intensity, delta, config.max_speed_factor);
    scratch.z_half = config.z_half();
    scratch.xy_bounds = config.xy_bounds;
    scratch.direction = config.direction;
    scratch.scatter_seed = config.scatter_on_recycle.then_some(seed);
}

/// Move, recycle, stretch and recolour one particle. Returns true if recycled.
#[inline]
pub fn advance(particle: &mut Particle, index: usize, scratch: &FrameScratch) -> bool {
    let z_half = scratch.z_half;
    let mut z = particle.position.z + scratch.direction.sign() * scratch.step;

    let recycled = match scratch.direction {
        TravelDirection::Toward if z < -z_half => {
            z = z_half;
            true
        }
        TravelDirection::Away if z > z_half => {
            z = -z_half;
            true
        }
        _ => false,
    };
    particle.position.z = z;

    if recycled {
        if let Some(seed) = scratch.scatter_seed {
            let (u, v) = scatter(seed, index, scratch.frame);
            particle.position.x = (u - 0.5) * scratch.xy_bounds;
            particle.position.y = (v - 0.5) * scratch.xy_bounds;
        }
    }

    particle.scale = Vec3::new(1.0, 1.0, scratch.stretch);
    particle.color = Vec3::splat(fade(z, z_half));
    recycled
}

#[inline]
fn write_one(
    index: usize,
    particle: &mut Particle,
    transform: &mut InstanceTransform,
    color: &mut InstanceColor,
    scratch: &FrameScratch,
) -> usize {
    let recycled = advance(particle, index, scratch);
    *transform = particle.transform();
    *color = particle.instance_color();
    recycled as usize
}

/// Run the pass over the whole field; marks the mirrors dirty once at the end.
///
/// Returns the number of particles recycled this frame.
pub fn animate(field: &mut ParticleField, scratch: &FrameScratch) -> usize {
    let (particles, transforms, colors) = field.buffers_mut();

    #[cfg(not(feature = "parallel"))]
    let recycled = {
        let mut count = 0;
        for (i, ((p, t), c)) in particles
            .iter_mut()
            .zip(transforms.iter_mut())
            .zip(colors.iter_mut())
            .enumerate()
        {
            count += write_one(i, p, t, c, scratch);
        }
        count
    };

    #[cfg(feature = "parallel")]
    let recycled = particles
        .par_iter_mut()
        .zip(transforms.par_iter_mut())
        .zip(colors.par_iter_mut())
        .enumerate()
        .map(|(i, ((p, t), c))| write_one(i, p, t, c, scratch))
        .sum::<usize>();

    field.mark_dirty();
    recycled
}

/// Stateless (seed, index, frame) -> two uniforms in [0, 1).
///
/// SplitMix64 finalizer; keeps recycling off the RNG so the pass stays
/// order-independent.
fn scatter(seed: u64, index: usize, frame: u64) -> (f32, f32) {
    let mut h = seed
        ^ (index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ frame.wrapping_mul(0xC2B2_AE3D_27D4_EB4F);
    h = (h ^ (h >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    h = (h ^ (h >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    h ^= h >> 31;

    // 24 bits each, exact in f32
    let u = (h >> 40) as f32 / (1u64 << 24) as f32;
    let v = ((h >> 8) & 0xFF_FFFF) as f32 / (1u64 << 24) as f32;
    (u, v)
}
