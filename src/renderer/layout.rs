//! Instance buffer layouts for the host's star pipeline
//!
//! Locations 0-1 are left to the host's mesh vertex buffer.

use crate::sim::{InstanceColor, InstanceTransform};

/// First shader location used by the per-instance model matrix
pub const TRANSFORM_LOCATION: u32 = 2;
/// Shader location of the per-instance colour
pub const COLOR_LOCATION: u32 = 6;

const COLUMN: wgpu::BufferAddress = std::mem::size_of::<[f32; 4]>() as wgpu::BufferAddress;

static TRANSFORM_ATTRIBUTES: [wgpu::VertexAttribute; 4] = [
    wgpu::VertexAttribute {
        offset: 0,
        shader_location: TRANSFORM_LOCATION,
        format: wgpu::VertexFormat::Float32x4,
    },
    wgpu::VertexAttribute {
        offset: COLUMN,
        shader_location: TRANSFORM_LOCATION + 1,
        format: wgpu::VertexFormat::Float32x4,
    },
    wgpu::VertexAttribute {
        offset: COLUMN * 2,
        shader_location: TRANSFORM_LOCATION + 2,
        format: wgpu::VertexFormat::Float32x4,
    },
    wgpu::VertexAttribute {
        offset: COLUMN * 3,
        shader_location: TRANSFORM_LOCATION + 3,
        format: wgpu::VertexFormat::Float32x4,
    },
];

static COLOR_ATTRIBUTES: [wgpu::VertexAttribute; 1] = [wgpu::VertexAttribute {
    offset: 0,
    shader_location: COLOR_LOCATION,
    format: wgpu::VertexFormat::Float32x3,
}];

impl InstanceTransform {
    /// One mat4x4 per instance, as four vec4 columns
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceTransform>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &TRANSFORM_ATTRIBUTES,
        }
    }
}

impl InstanceColor {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceColor>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &COLOR_ATTRIBUTES,
        }
    }
}
