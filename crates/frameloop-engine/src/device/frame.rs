/// Swapchain texture acquired for one render.
///
/// Must be submitted before the next acquisition.
pub(super) struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}
