use bytemuck::{Pod, Zeroable};

/// Registry name of the uniform declaration chunk.
pub const UNIFORMS_CHUNK: &str = "frameloop_uniforms";

/// WGSL declaration matching [`FrameUniforms`], bound at group 0, binding 0.
pub const UNIFORMS_WGSL: &str = "\
struct FrameUniforms {
    screen: vec2<f32>,
    pointer: vec2<f32>,
    time: f32,
    dt: f32,
    _pad: vec2<f32>,
};

@group(0) @binding(0) var<uniform> frame: FrameUniforms;
";

/// Per-frame values mirrored to shading code.
///
/// Layout matches [`UNIFORMS_WGSL`]; 32 bytes, 16-byte aligned.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct FrameUniforms {
    /// Surface size in logical pixels.
    pub screen: [f32; 2],
    /// Normalized pointer position.
    pub pointer: [f32; 2],
    /// Seconds since start.
    pub time: f32,
    /// Seconds since the previous frame.
    pub dt: f32,
    pub _pad: [f32; 2],
}
