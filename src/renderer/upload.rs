//! GPU mirror of the warp state
//!
//! Host-side helper for native wgpu hosts. The host owns the device and
//! pipeline; this only owns the three buffers the core feeds and copies into
//! them once per frame.

use wgpu::util::DeviceExt;

use crate::error::{Result, WarpError};
use crate::sim::{FrameSnapshot, WarpState};

/// Check a snapshot against buffers sized for `capacity` particles.
///
/// Returns whether the instance buffers need writing this frame.
pub fn instance_upload_needed(capacity: usize, snap: &FrameSnapshot<'_>) -> Result<bool> {
    if snap.transforms.len() != capacity || snap.colors.len() != capacity {
        return Err(WarpError::InvalidConfiguration(format!(
            "GPU mirror sized for {} particles, field has {}",
            capacity,
            snap.transforms.len()
        )));
    }
    Ok(snap.dirty)
}

/// Instance + uniform buffers sized for one field
pub struct GpuMirror {
    pub transform_buffer: wgpu::Buffer,
    pub color_buffer: wgpu::Buffer,
    pub distortion_buffer: wgpu::Buffer,
    /// Particle count the buffers were sized for
    pub capacity: usize,
}

impl GpuMirror {
    /// Create buffers pre-filled with the field's current contents
    pub fn new(device: &wgpu::Device, state: &WarpState) -> Result<Self> {
        let snap = state.snapshot()?;

        let transform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Warp Transform Buffer"),
            contents: bytemuck::cast_slice(snap.transforms),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });
        let color_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Warp Color Buffer"),
            contents: bytemuck::cast_slice(snap.colors),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });
        let distortion_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Warp Distortion Uniform"),
            contents: bytemuck::bytes_of(&snap.distortion),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        Ok(Self {
            transform_buffer,
            color_buffer,
            distortion_buffer,
            capacity: snap.transforms.len(),
        })
    }

    /// Copy this frame's results. The uniform is written every frame; the
    /// instance buffers only when the last pass left them dirty.
    ///
    /// Returns whether the instance buffers were written.
    pub fn sync(&self, queue: &wgpu::Queue, state: &mut WarpState) -> Result<bool> {
        let written = {
            let snap = state.snapshot()?;
            let dirty = instance_upload_needed(self.capacity, &snap)?;

            queue.write_buffer(&self.distortion_buffer, 0, bytemuck::bytes_of(&snap.distortion));
            if dirty {
                queue.write_buffer(&self.transform_buffer, 0, bytemuck::cast_slice(snap.transforms));
                queue.write_buffer(&self.color_buffer, 0, bytemuck::cast_slice(snap.colors));
            }
            dirty
        };

        if written {
            state.mark_uploaded();
        }
        Ok(written)
    }
}
