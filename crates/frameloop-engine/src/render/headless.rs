use crate::scene::{Camera, Scene};

use super::surface::{RenderSurface, SurfaceSize};
use super::uniforms::FrameUniforms;

/// Surface that draws nothing and records what it was asked to do.
#[derive(Debug)]
pub struct HeadlessSurface {
    size: SurfaceSize,
    pixel_ratio: f64,
    styled: bool,
    renders: u64,
    last_camera_aspect: Option<f32>,
    last_uniforms: Option<FrameUniforms>,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self {
            size: SurfaceSize::default(),
            pixel_ratio: 1.0,
            styled: false,
            renders: 0,
            last_camera_aspect: None,
            last_uniforms: None,
        }
    }

    pub fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    /// Whether the last `set_size` asked for the presenting element to follow.
    pub fn styled(&self) -> bool {
        self.styled
    }

    pub fn render_count(&self) -> u64 {
        self.renders
    }

    /// Aspect of the camera used by the most recent render.
    pub fn last_camera_aspect(&self) -> Option<f32> {
        self.last_camera_aspect
    }

    pub fn last_uniforms(&self) -> Option<FrameUniforms> {
        self.last_uniforms
    }
}

impl Default for HeadlessSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderSurface for HeadlessSurface {
    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn set_pixel_ratio(&mut self, ratio: f64) {
        self.pixel_ratio = ratio;
    }

    fn set_size(&mut self, width: u32, height: u32, update_style: bool) {
        self.size = SurfaceSize::new(width, height);
        self.styled = update_style;
    }

    fn sync_uniforms(&mut self, uniforms: &FrameUniforms) {
        self.last_uniforms = Some(*uniforms);
    }

    fn render(&mut self, _scene: &Scene, camera: &dyn Camera) {
        self.renders += 1;
        self.last_camera_aspect = Some(camera.aspect());
    }
}
