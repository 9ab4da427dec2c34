//! Deterministic warp simulation
//!
//! Everything that decides where a star is, how stretched it is, and how
//! bright it is lives here. This module must stay pure:
//! - Host-supplied clock only (elapsed + delta)
//! - Seeded RNG, used only at initialization
//! - Stable iteration order (by particle index)
//! - No rendering or platform dependencies

pub mod animator;
pub mod decay;
pub mod effect;
pub mod field;
pub mod gate;
pub mod state;
pub mod tick;

pub use animator::{advance, animate, fade, prepare};
pub use decay::{decay, warp_step, warp_stretch};
pub use effect::{DistortionSource, DistortionUniform, bridge, distortion_offset};
pub use field::ParticleField;
pub use gate::{GateEvent, VelocityCurve, WarpPhase, WarpPhaseGate};
pub use state::{
    FrameScratch, FrameSnapshot, InstanceColor, InstanceTransform, Particle, WarpState,
};
pub use tick::{FrameReport, tick};
