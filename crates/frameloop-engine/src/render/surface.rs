use crate::scene::{Camera, Scene};

use super::uniforms::FrameUniforms;

/// Logical size of a render surface.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Render target driven by the application.
pub trait RenderSurface {
    /// Logical size as last set through `set_size`.
    fn size(&self) -> SurfaceSize;

    /// Device pixels per logical pixel for the backing buffer.
    fn set_pixel_ratio(&mut self, ratio: f64);

    /// Resizes the backing buffer to `width`x`height` logical pixels.
    ///
    /// `update_style` asks the backend to also resize whatever presents the
    /// buffer (a canvas element, a child window) to the logical size.
    fn set_size(&mut self, width: u32, height: u32, update_style: bool);

    /// Receives the uniform block before each render.
    fn sync_uniforms(&mut self, uniforms: &FrameUniforms) {
        let _ = uniforms;
    }

    fn render(&mut self, scene: &Scene, camera: &dyn Camera);
}
