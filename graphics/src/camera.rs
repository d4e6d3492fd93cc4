//! Perspective camera used to sort and draw a batch.

use starmesh_core::math::{Mat4, Vec3, look_at_rh, perspective_rh};

/// A perspective camera.
///
/// `fov_y` is the vertical field of view in degrees. Matrices are computed
/// on demand from the public fields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    /// Unit view direction.
    pub direction: Vec3,
    pub up: Vec3,
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
    pub viewport_width: f32,
    pub viewport_height: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(67.0, 1.0, 1.0)
    }
}

impl Camera {
    /// Camera at the origin looking down -Z.
    pub fn new(fov_y: f32, viewport_width: f32, viewport_height: f32) -> Self {
        Self {
            position: Vec3::zeros(),
            direction: -Vec3::z(),
            up: Vec3::y(),
            fov_y,
            near: 0.1,
            far: 1000.0,
            viewport_width,
            viewport_height,
        }
    }

    #[must_use]
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    #[must_use]
    pub fn with_clip(mut self, near: f32, far: f32) -> Self {
        self.near = near;
        self.far = far;
        self
    }

    /// Point the camera at `target`. Does nothing if `target` is the
    /// camera position.
    pub fn look_at(&mut self, target: Vec3) {
        if let Some(dir) = (target - self.position).try_normalize(f32::EPSILON) {
            self.direction = dir;
        }
    }

    pub fn aspect(&self) -> f32 {
        if self.viewport_height > 0.0 {
            self.viewport_width / self.viewport_height
        } else {
            1.0
        }
    }

    pub fn view(&self) -> Mat4 {
        look_at_rh(&self.position, &(self.position + self.direction), &self.up)
    }

    pub fn projection(&self) -> Mat4 {
        perspective_rh(self.fov_y.to_radians(), self.aspect(), self.near, self.far)
    }

    /// Projection times view.
    pub fn combined(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// Squared distance from the camera to `point`.
    pub fn distance_squared(&self, point: &Vec3) -> f32 {
        (point - self.position).norm_squared()
    }
}
