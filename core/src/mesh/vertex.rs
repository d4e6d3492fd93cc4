//! Per-vertex input record.

use crate::color::Color;
use crate::math::{Vec2, Vec3};

/// Attribute values for one vertex.
///
/// Every field is optional. A field the builder's layout declares but the
/// record leaves unset is written as zeros (or the builder's default color);
/// fields the layout does not declare are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VertexInfo {
    pub position: Option<Vec3>,
    pub normal: Option<Vec3>,
    pub tangent: Option<Vec3>,
    pub binormal: Option<Vec3>,
    pub color: Option<Color>,
    pub uv: Option<Vec2>,
}

impl VertexInfo {
    /// An empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for the common position / normal / uv triple.
    pub fn pnu(position: Vec3, normal: Vec3, uv: Vec2) -> Self {
        Self {
            position: Some(position),
            normal: Some(normal),
            uv: Some(uv),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = Some(position);
        self
    }

    #[must_use]
    pub fn with_normal(mut self, normal: Vec3) -> Self {
        self.normal = Some(normal);
        self
    }

    #[must_use]
    pub fn with_tangent(mut self, tangent: Vec3) -> Self {
        self.tangent = Some(tangent);
        self
    }

    #[must_use]
    pub fn with_binormal(mut self, binormal: Vec3) -> Self {
        self.binormal = Some(binormal);
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    #[must_use]
    pub fn with_uv(mut self, uv: Vec2) -> Self {
        self.uv = Some(uv);
        self
    }

    /// Interpolate every field set on both records; fields set on only one
    /// side are dropped.
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        fn mix<T, F: Fn(&T, &T) -> T>(a: Option<T>, b: Option<T>, f: F) -> Option<T> {
            match (a, b) {
                (Some(a), Some(b)) => Some(f(&a, &b)),
                _ => None,
            }
        }
        Self {
            position: mix(self.position, other.position, |a, b| a.lerp(b, t)),
            normal: mix(self.normal, other.normal, |a, b| a.lerp(b, t)),
            tangent: mix(self.tangent, other.tangent, |a, b| a.lerp(b, t)),
            binormal: mix(self.binormal, other.binormal, |a, b| a.lerp(b, t)),
            color: mix(self.color, other.color, |a, b| {
                Color::new(
                    a.r + (b.r - a.r) * t,
                    a.g + (b.g - a.g) * t,
                    a.b + (b.b - a.b) * t,
                    a.a + (b.a - a.a) * t,
                )
            }),
            uv: mix(self.uv, other.uv, |a, b| a.lerp(b, t)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_midpoint() {
        let a = VertexInfo::pnu(Vec3::zeros(), Vec3::y(), Vec2::new(0.0, 0.0))
            .with_color(Color::BLACK);
        let b = VertexInfo::pnu(Vec3::new(2.0, 4.0, 6.0), Vec3::y(), Vec2::new(1.0, 1.0))
            .with_color(Color::WHITE);
        let m = a.lerp(&b, 0.5);
        assert_eq!(m.position, Some(Vec3::new(1.0, 2.0, 3.0)));
        assert_eq!(m.uv, Some(Vec2::new(0.5, 0.5)));
        assert_eq!(m.color, Some(Color::new(0.5, 0.5, 0.5, 1.0)));
    }

    #[test]
    fn test_lerp_drops_one_sided_fields() {
        let a = VertexInfo::new().with_position(Vec3::zeros()).with_tangent(Vec3::x());
        let b = VertexInfo::new().with_position(Vec3::x());
        let m = a.lerp(&b, 0.25);
        assert_eq!(m.position, Some(Vec3::new(0.25, 0.0, 0.0)));
        assert_eq!(m.tangent, None);
    }
}
