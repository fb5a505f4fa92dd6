use super::SceneObject;

/// Column-major 4x4 matrix.
pub type Mat4 = [[f32; 4]; 4];

/// Camera capability used by the render path.
pub trait Camera {
    fn aspect(&self) -> f32;
    fn set_aspect(&mut self, aspect: f32);

    /// Recomputes the projection from the current parameters.
    fn update_projection(&mut self);

    /// Projection as of the last `update_projection`.
    fn projection(&self) -> Mat4;
}

/// Right-handed perspective camera with a `[0, 1]` depth range.
///
/// Parameter changes take effect on the next `update_projection` call.
#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveCamera {
    /// Vertical field of view, in degrees.
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    projection: Mat4,
}

impl PerspectiveCamera {
    pub fn new(fov_y: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            fov_y,
            aspect,
            near,
            far,
            projection: [[0.0; 4]; 4],
        };
        camera.update_projection();
        camera
    }
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::new(45.0, 1.0, 0.1, 1000.0)
    }
}

impl Camera for PerspectiveCamera {
    fn aspect(&self) -> f32 {
        self.aspect
    }

    fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    fn update_projection(&mut self) {
        let f = 1.0 / (self.fov_y.to_radians() * 0.5).tan();
        let range = self.near - self.far;

        self.projection = [
            [f / self.aspect, 0.0, 0.0, 0.0],
            [0.0, f, 0.0, 0.0],
            [0.0, 0.0, self.far / range, -1.0],
            [0.0, 0.0, self.near * self.far / range, 0.0],
        ];
    }

    fn projection(&self) -> Mat4 {
        self.projection
    }
}

impl SceneObject for PerspectiveCamera {
    fn as_camera(&self) -> Option<&dyn Camera> {
        Some(self)
    }
}
