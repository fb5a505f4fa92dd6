/// Window dimensions sampled from the platform at resize time.
///
/// `width`/`height` are logical pixels; `pixel_density` maps them to physical
/// pixels on the backing buffer.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub pixel_density: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { width: 0, height: 0, pixel_density: 1.0 }
    }
}

impl Viewport {
    #[inline]
    pub const fn new(width: u32, height: u32, pixel_density: f64) -> Self {
        Self { width, height, pixel_density }
    }

    /// True when both dimensions are non-zero (a minimized window reports 0x0).
    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Width over height, or `None` for a degenerate viewport.
    #[inline]
    pub fn aspect(self) -> Option<f32> {
        self.is_valid().then(|| self.width as f32 / self.height as f32)
    }

    /// Physical backing-buffer size, rounded to whole pixels.
    pub fn physical_size(self) -> (u32, u32) {
        let scale = |v: u32| (v as f64 * self.pixel_density).round().max(0.0) as u32;
        (scale(self.width), scale(self.height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_of_landscape_viewport() {
        assert_eq!(Viewport::new(800, 600, 1.0).aspect(), Some(800.0 / 600.0));
    }

    #[test]
    fn degenerate_viewport_has_no_aspect() {
        assert_eq!(Viewport::new(800, 0, 1.0).aspect(), None);
        assert!(!Viewport::new(0, 600, 1.0).is_valid());
    }

    #[test]
    fn physical_size_scales_by_density() {
        assert_eq!(Viewport::new(800, 600, 2.0).physical_size(), (1600, 1200));
        assert_eq!(Viewport::new(101, 51, 1.5).physical_size(), (152, 77));
    }
}
