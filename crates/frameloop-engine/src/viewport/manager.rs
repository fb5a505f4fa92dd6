use std::cell::RefCell;
use std::rc::Rc;

use crate::coords::Viewport;
use crate::platform::PlatformEventSource;
use crate::render::RenderSurface;
use crate::scene::{same_node, Camera, NodeRef, PerspectiveCamera};

/// Applies window dimensions to the render surface and the default camera.
///
/// Dimensions are always re-read from the platform; the raw resize event is
/// only a signal that they may have changed.
#[derive(Debug, Default)]
pub struct ViewportManager {
    current: Viewport,
}

impl ViewportManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Viewport applied by the most recent resize.
    pub fn current(&self) -> Viewport {
        self.current
    }

    /// Samples the platform and resizes `surface`.
    ///
    /// `default_camera` gets its aspect updated and projection recomputed only
    /// while it is the scene's active camera (`active`). A camera the client
    /// substituted is left untouched.
    pub fn apply<S, R>(
        &mut self,
        platform: &S,
        surface: &mut R,
        active: Option<&NodeRef>,
        default_camera: &Rc<RefCell<PerspectiveCamera>>,
    ) -> Viewport
    where
        S: PlatformEventSource + ?Sized,
        R: RenderSurface + ?Sized,
    {
        let (width, height) = platform.window_size();
        let viewport = Viewport::new(width, height, sanitize_density(platform.pixel_density()));

        surface.set_pixel_ratio(viewport.pixel_density);
        surface.set_size(viewport.width, viewport.height, true);

        let default_is_active = active.is_some_and(|node| same_node(node, default_camera));
        if default_is_active {
            match viewport.aspect() {
                Some(aspect) => {
                    let mut camera = default_camera.borrow_mut();
                    camera.set_aspect(aspect);
                    camera.update_projection();
                }
                None => log::debug!("degenerate viewport {width}x{height}; camera aspect kept"),
            }
        }

        log::trace!(
            "viewport resized to {}x{} @{}x",
            viewport.width,
            viewport.height,
            viewport.pixel_density
        );

        self.current = viewport;
        viewport
    }
}

fn sanitize_density(density: f64) -> f64 {
    if density.is_finite() && density > 0.0 {
        density
    } else {
        1.0
    }
}
