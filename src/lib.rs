//! Warp Field - a warp-speed starfield particle core
//!
//! Core modules:
//! - `sim`: Deterministic per-frame particle update (decay curve, field, animator, phase gate)
//! - `renderer`: WebGPU instance-buffer layouts and dirty-buffer upload
//! - `platform`: Browser host bindings
//! - `settings`: Engine configuration and presets
//! - `error`: Error taxonomy shared by every fallible call

pub mod error;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::{Result, WarpError};
pub use settings::{GateConfig, QualityPreset, TravelDirection, WarpConfig};

/// Engine configuration defaults
pub mod consts {
    /// Number of particles in the field
    pub const COUNT: usize = 500;
    /// Width/height of the XY spawn square (particles span ±XY_BOUNDS/2)
    pub const XY_BOUNDS: f32 = 40.0;
    /// Depth of the travel volume (particles span ±Z_BOUNDS/2)
    pub const Z_BOUNDS: f32 = 20.0;
    /// Ceiling on per-frame travel, as a multiple of the frame delta
    pub const MAX_SPEED_FACTOR: f32 = 2.0;
    /// Maximum stretch along the travel axis
    pub const MAX_SCALE_FACTOR: f32 = 50.0;
    /// Distortion offset at full warp intensity
    pub const BASE_OFFSET: f32 = 0.007;

    /// Gate: signal level at which the warp settles
    pub const VELOCITY_FLOOR: f32 = 1.0;
    /// Gate: signal level at which bloom switches on early
    pub const VELOCITY_CEILING: f32 = 4.0;
    /// Gate: initial value of the decaying velocity signal
    pub const VELOCITY_SCALE: f32 = 10.0;
}
