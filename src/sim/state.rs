//! Particle and engine state
//!
//! `WarpState` is the single owner of everything the per-frame update
//! touches. Scratch values are reused across frames, never reallocated.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::effect::{DistortionUniform, bridge};
use super::field::ParticleField;
use super::gate::{GateEvent, WarpPhase, WarpPhaseGate};
use crate::error::{Result, WarpError};
use crate::settings::{TravelDirection, WarpConfig};

/// One star. Only `position.z` moves continuously; x/y are fixed unless
/// re-scattered on recycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub position: Vec3,
    /// (1, 1, stretch)
    pub scale: Vec3,
    /// Monochrome, each channel in [0, 1]
    pub color: Vec3,
}

impl Particle {
    /// Unstretched, fully lit particle at `position`
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            scale: Vec3::ONE,
            color: Vec3::ONE,
        }
    }

    /// Grey level (all channels are equal)
    #[inline]
    pub fn brightness(&self) -> f32 {
        self.color.x
    }

    /// Column-major model matrix: translation + non-uniform scale, no rotation
    #[inline]
    pub fn transform(&self) -> InstanceTransform {
        InstanceTransform {
            model: Mat4::from_scale_rotation_translation(self.scale, Quat::IDENTITY, self.position)
                .to_cols_array_2d(),
        }
    }

    #[inline]
    pub fn instance_color(&self) -> InstanceColor {
        InstanceColor {
            rgb: self.color.to_array(),
        }
    }
}

// ============================================================================
// HOST BUFFER ELEMENTS (uploaded as-is)
// ============================================================================

/// Per-instance 4x4 transform, column-major
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct InstanceTransform {
    pub model: [[f32; 4]; 4],
}

impl InstanceTransform {
    /// Translation column
    pub fn translation(&self) -> Vec3 {
        let [x, y, z, _] = self.model[3];
        Vec3::new(x, y, z)
    }

    /// Diagonal scale (valid because there is no rotation)
    pub fn scale(&self) -> Vec3 {
        Vec3::new(self.model[0][0], self.model[1][1], self.model[2][2])
    }
}

/// Per-instance colour
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct InstanceColor {
    pub rgb: [f32; 3],
}

/// Per-frame values shared by every particle in the pass.
///
/// Filled once by `animator::prepare`, then only read inside the loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameScratch {
    pub frame: u64,
    /// `decay(elapsed)`
    pub intensity: f32,
    /// scale.z for this frame
    pub stretch: f32,
    /// Distance traveled this frame
    pub step: f32,
    pub z_half: f32,
    pub xy_bounds: f32,
    pub direction: TravelDirection,
    /// Field seed when recycled particles get new x/y
    pub scatter_seed: Option<u64>,
}

impl Default for FrameScratch {
    fn default() -> Self {
        Self {
            frame: 0,
            intensity: 1.0,
            stretch: 1.0,
            step: 0.0,
            z_half: 0.0,
            xy_bounds: 0.0,
            direction: TravelDirection::Toward,
            scatter_seed: None,
        }
    }
}

/// Borrowed view of everything the host uploads after a tick
#[derive(Debug, Clone, Copy)]
pub struct FrameSnapshot<'a> {
    pub transforms: &'a [InstanceTransform],
    pub colors: &'a [InstanceColor],
    pub distortion: DistortionUniform,
    /// Set after a full pass; cleared by `WarpState::mark_uploaded`
    pub dirty: bool,
}

/// Complete engine state
#[derive(Debug, Clone)]
pub struct WarpState {
    pub(crate) config: WarpConfig,
    /// `None` until `initialize`
    pub(crate) field: Option<ParticleField>,
    pub(crate) gate: Option<WarpPhaseGate>,
    pub(crate) distortion: DistortionUniform,
    pub(crate) scratch: FrameScratch,
    /// Frames ticked since `initialize`
    pub(crate) frame: u64,
    /// Last host clock reading
    pub(crate) elapsed: f32,
    /// Gate events not yet drained by the host
    pub(crate) events: Vec<GateEvent>,
}

impl WarpState {
    /// Validate the config and build an engine with no field yet
    pub fn new(config: WarpConfig) -> Result<Self> {
        config.validate()?;
        let gate = config.gate.as_ref().map(WarpPhaseGate::new);
        let distortion = bridge(
            config.distortion,
            super::decay::decay(0.0),
            config.base_offset,
            gate.as_ref().map(|g| g.phase()),
        );

        Ok(Self {
            config,
            field: None,
            gate,
            distortion,
            scratch: FrameScratch::default(),
            frame: 0,
            elapsed: 0.0,
            events: Vec::new(),
        })
    }

    /// Allocate the particle field; resets the clock-derived state.
    ///
    /// Can be called again to restart the run with a new seed.
    pub fn initialize(&mut self, seed: u64) -> Result<()> {
        let field = ParticleField::initialize(
            self.config.count,
            self.config.xy_bounds,
            self.config.z_bounds,
            seed,
        )?;

        self.field = Some(field);
        self.gate = self.config.gate.as_ref().map(WarpPhaseGate::new);
        self.distortion = bridge(
            self.config.distortion,
            super::decay::decay(0.0),
            self.config.base_offset,
            self.phase(),
        );
        self.scratch = FrameScratch::default();
        self.frame = 0;
        self.elapsed = 0.0;
        self.events.clear();

        log::info!(
            "Warp field initialized: {} particles, seed {}",
            self.config.count,
            seed
        );
        Ok(())
    }

    pub fn config(&self) -> &WarpConfig {
        &self.config
    }

    pub fn is_initialized(&self) -> bool {
        self.field.is_some()
    }

    pub fn field(&self) -> Result<&ParticleField> {
        self.field.as_ref().ok_or(WarpError::NotInitialized)
    }

    pub fn field_mut(&mut self) -> Result<&mut ParticleField> {
        self.field.as_mut().ok_or(WarpError::NotInitialized)
    }

    /// Frames ticked since `initialize`
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Scalars computed for the most recent frame
    pub fn scratch(&self) -> &FrameScratch {
        &self.scratch
    }

    pub fn distortion(&self) -> DistortionUniform {
        self.distortion
    }

    /// Gate phase, `None` when no gate is configured
    pub fn phase(&self) -> Option<WarpPhase> {
        self.gate.as_ref().map(|g| g.phase())
    }

    /// Whether the host should show bloom (always off without a gate)
    pub fn bloom_enabled(&self) -> bool {
        self.gate.as_ref().is_some_and(|g| g.bloom_enabled())
    }

    pub fn gate(&self) -> Option<&WarpPhaseGate> {
        self.gate.as_ref()
    }

    /// Take pending gate events (each fires at most once per run)
    pub fn drain_events(&mut self) -> Vec<GateEvent> {
        std::mem::take(&mut self.events)
    }

    /// Everything the host needs to upload for the current frame
    pub fn snapshot(&self) -> Result<FrameSnapshot<'_>> {
        let field = self.field()?;
        Ok(FrameSnapshot {
            transforms: field.transforms(),
            colors: field.colors(),
            distortion: self.distortion,
            dirty: field.is_dirty(),
        })
    }

    /// Host acknowledges the upload; no-op before `initialize`
    pub fn mark_uploaded(&mut self) {
        if let Some(field) = self.field.as_mut() {
            field.mark_uploaded();
        }
    }
}
