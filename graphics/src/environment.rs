//! Lighting environment attached to renderables.

use starmesh_core::color::Color;
use starmesh_core::math::Vec3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub color: Color,
    /// Direction the light travels in.
    pub direction: Vec3,
}

/// Ambient color plus directional lights, shared by every renderable
/// submitted with it.
#[derive(Debug, Clone, PartialEq)]
pub struct Environment {
    pub ambient: Color,
    pub directional_lights: Vec<DirectionalLight>,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            ambient: Color::BLACK,
            directional_lights: Vec::new(),
        }
    }
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_ambient(mut self, ambient: Color) -> Self {
        self.ambient = ambient;
        self
    }

    #[must_use]
    pub fn with_directional_light(mut self, color: Color, direction: Vec3) -> Self {
        self.directional_lights.push(DirectionalLight {
            color,
            direction: direction.try_normalize(f32::EPSILON).unwrap_or(-Vec3::y()),
        });
        self
    }
}
