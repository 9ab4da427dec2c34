//! Particle field
//!
//! Owns the particle buffer plus the transform/colour mirrors the host
//! uploads. The mirrors are rewritten in the same pass as the particles and
//! flagged dirty once the whole pass is done.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::animator::fade;
use super::state::{InstanceColor, InstanceTransform, Particle};
use crate::error::{Result, WarpError};

/// Particle buffer with host-facing mirrors
#[derive(Debug, Clone)]
pub struct ParticleField {
    particles: Vec<Particle>,
    transforms: Vec<InstanceTransform>,
    colors: Vec<InstanceColor>,
    xy_bounds: f32,
    z_bounds: f32,
    seed: u64,
    dirty: bool,
}

impl ParticleField {
    /// Scatter `count` particles uniformly in the spawn box.
    ///
    /// Same seed, same field.
    pub fn initialize(count: usize, xy_bounds: f32, z_bounds: f32, seed: u64) -> Result<Self> {
        if count == 0 {
            return Err(WarpError::InvalidConfiguration(
                "count must be positive".into(),
            ));
        }
        if !z_bounds.is_finite() || z_bounds <= 0.0 {
            return Err(WarpError::InvalidConfiguration(format!(
                "z_bounds must be positive, got {}",
                z_bounds
            )));
        }
        if !xy_bounds.is_finite() || xy_bounds < 0.0 {
            return Err(WarpError::InvalidConfiguration(format!(
                "xy_bounds must be non-negative, got {}",
                xy_bounds
            )));
        }

        let mut rng = Pcg32::seed_from_u64(seed);
        let xy_half = xy_bounds / 2.0;
        let z_half = z_bounds / 2.0;

        let particles: Vec<Particle> = (0..count)
            .map(|_| {
                let x = rng.random_range(-xy_half..=xy_half);
                let y = rng.random_range(-xy_half..=xy_half);
                let z = rng.random_range(-z_half..=z_half);
                let mut particle = Particle::at(Vec3::new(x, y, z));
                particle.color = Vec3::splat(fade(z, z_half));
                particle
            })
            .collect();

        let transforms = particles.iter().map(Particle::transform).collect();
        let colors = particles.iter().map(Particle::instance_color).collect();

        Ok(Self {
            particles,
            transforms,
            colors,
            xy_bounds,
            z_bounds,
            seed,
            dirty: true,
        })
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn xy_bounds(&self) -> f32 {
        self.xy_bounds
    }

    pub fn z_bounds(&self) -> f32 {
        self.z_bounds
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn transforms(&self) -> &[InstanceTransform] {
        &self.transforms
    }

    pub fn colors(&self) -> &[InstanceColor] {
        &self.colors
    }

    pub fn get(&self, index: usize) -> Result<Particle> {
        self.particles
            .get(index)
            .copied()
            .ok_or(WarpError::IndexOutOfRange {
                index,
                count: self.particles.len(),
            })
    }

    /// Replace one particle and its mirror entries
    pub fn set(&mut self, index: usize, particle: Particle) -> Result<()> {
        let count = self.particles.len();
        let slot = self
            .particles
            .get_mut(index)
            .ok_or(WarpError::IndexOutOfRange { index, count })?;
        *slot = particle;
        self.transforms[index] = particle.transform();
        self.colors[index] = particle.instance_color();
        self.dirty = true;
        Ok(())
    }

    /// Mirrors changed since the last upload
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_uploaded(&mut self) {
        self.dirty = false;
    }

    /// Split borrow for the per-frame pass
    pub(crate) fn buffers_mut(
        &mut self,
    ) -> (&mut [Particle], &mut [InstanceTransform], &mut [InstanceColor]) {
        (&mut self.particles, &mut self.transforms, &mut self.colors)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}
