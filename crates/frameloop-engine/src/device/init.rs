/// Initialization parameters for [`GpuSurface`](super::GpuSurface).
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Prefer an sRGB swapchain format when the surface offers one.
    pub prefer_srgb: bool,

    /// FIFO is vsync-aligned, which is what the frame scheduler assumes.
    pub present_mode: wgpu::PresentMode,

    /// Preferred alpha mode; ignored if the surface does not support it.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    pub required_limits: wgpu::Limits,

    /// Hint for swapchain depth; support depends on platform/backend.
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
        }
    }
}
