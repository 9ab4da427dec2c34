//! WebGPU hand-off
//!
//! Buffer layouts and upload for the host's instanced star pipeline. Shaders
//! and post-process compositing belong to the host.

pub mod layout;
pub mod upload;

pub use layout::{COLOR_LOCATION, TRANSFORM_LOCATION};
pub use upload::{GpuMirror, instance_upload_needed};
