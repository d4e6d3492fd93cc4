//! Circles, ellipses and elliptical rings.

use crate::error::MeshResult;
use crate::math::{Vec2, Vec3};
use crate::mesh::sink::{VertexSink, check_divisions, require_topology};
use crate::mesh::{PrimitiveTopology, VertexInfo};

/// A flat ellipse, optionally hollowed out by an inner ellipse.
///
/// - `inner_width` or `inner_height` `<= 0`: triangle fan around the center.
/// - inner size equal to the outer size: closed outline, line topology only.
/// - otherwise: a band of quads between the inner and outer rims.
///
/// Angles are in degrees. The center vertex is always emitted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipse {
    pub width: f32,
    pub height: f32,
    pub inner_width: f32,
    pub inner_height: f32,
    pub divisions: u32,
    pub center: Vec3,
    pub normal: Vec3,
    /// In-plane axis scaled by `width`; derived from `normal` when `None`.
    pub tangent: Option<Vec3>,
    /// In-plane axis scaled by `height`; derived from `normal` when `None`.
    pub binormal: Option<Vec3>,
    pub angle_from: f32,
    pub angle_to: f32,
}

impl Ellipse {
    /// Full filled ellipse in the XZ plane facing +Y.
    pub fn new(width: f32, height: f32, divisions: u32) -> Self {
        Self {
            width,
            height,
            inner_width: 0.0,
            inner_height: 0.0,
            divisions,
            center: Vec3::zeros(),
            normal: Vec3::y(),
            tangent: None,
            binormal: None,
            angle_from: 0.0,
            angle_to: 360.0,
        }
    }

    /// Full filled circle.
    pub fn circle(radius: f32, divisions: u32) -> Self {
        Self::new(radius * 2.0, radius * 2.0, divisions)
    }

    #[must_use]
    pub fn with_inner(mut self, inner_width: f32, inner_height: f32) -> Self {
        self.inner_width = inner_width;
        self.inner_height = inner_height;
        self
    }

    #[must_use]
    pub fn with_center(mut self, center: Vec3) -> Self {
        self.center = center;
        self
    }

    #[must_use]
    pub fn with_normal(mut self, normal: Vec3) -> Self {
        self.normal = normal;
        self
    }

    #[must_use]
    pub fn with_basis(mut self, tangent: Vec3, binormal: Vec3) -> Self {
        self.tangent = Some(tangent);
        self.binormal = Some(binormal);
        self
    }

    #[must_use]
    pub fn with_angles(mut self, angle_from: f32, angle_to: f32) -> Self {
        self.angle_from = angle_from;
        self.angle_to = angle_to;
        self
    }

    /// In-plane axes, derived from the normal when not set explicitly.
    fn basis(&self) -> (Vec3, Vec3) {
        if let (Some(t), Some(b)) = (self.tangent, self.binormal) {
            return (t, b);
        }
        let n = self.normal;
        let mut t = n.cross(&Vec3::z());
        let alt = n.cross(&Vec3::y());
        if alt.norm_squared() > t.norm_squared() {
            t = alt;
        }
        let t = t.normalize();
        let b = t.cross(&n).normalize();
        (t, b)
    }

    fn is_filled(&self) -> bool {
        self.inner_width <= 0.0 || self.inner_height <= 0.0
    }

    fn is_outline(&self) -> bool {
        self.inner_width == self.width && self.inner_height == self.height
    }
}

/// Emit an [`Ellipse`].
pub fn ellipse<S: VertexSink + ?Sized>(sink: &mut S, e: &Ellipse) -> MeshResult<()> {
    check_divisions("divisions", e.divisions, 1, u32::MAX)?;
    let div = e.divisions as usize;
    if e.is_filled() {
        sink.reserve_vertices(div + 2)?;
        sink.ensure_triangle_indices(div);
    } else if e.is_outline() {
        require_topology(sink.topology(), PrimitiveTopology::LineList, "LineList")?;
        sink.reserve_vertices(div + 2)?;
        sink.ensure_indices(2 * div);
    } else {
        sink.reserve_vertices(2 * (div + 1) + 1)?;
        sink.ensure_rectangle_indices(div);
    }

    let (tangent, binormal) = e.basis();
    let ao = e.angle_from.to_radians();
    let step = (e.angle_to - e.angle_from).to_radians() / e.divisions as f32;
    let sx_ex = tangent * (e.width * 0.5);
    let sy_ex = binormal * (e.height * 0.5);
    let sx_in = tangent * (e.inner_width * 0.5);
    let sy_in = binormal * (e.inner_height * 0.5);
    let us = 0.5 * (e.inner_width / e.width);
    let vs = 0.5 * (e.inner_height / e.height);

    let center = sink.vertex(&VertexInfo::pnu(e.center, e.normal, Vec2::new(0.5, 0.5)))?;

    let (mut i2, mut i3, mut i4) = (0, 0, 0);
    for i in 0..=e.divisions {
        let angle = ao + step * i as f32;
        let (y, x) = angle.sin_cos();
        let outer = VertexInfo::pnu(
            e.center + sx_ex * x + sy_ex * y,
            e.normal,
            Vec2::new(0.5 + 0.5 * x, 0.5 + 0.5 * y),
        );
        let mut i1 = sink.vertex(&outer)?;
        if e.is_filled() {
            if i != 0 {
                sink.triangle(i1, i2, center)?;
            }
            i2 = i1;
        } else if e.is_outline() {
            if i != 0 {
                sink.line(i1, i2)?;
            }
            i2 = i1;
        } else {
            let inner = VertexInfo::pnu(
                e.center + sx_in * x + sy_in * y,
                e.normal,
                Vec2::new(0.5 + us * x, 0.5 + vs * y),
            );
            i2 = i1;
            i1 = sink.vertex(&inner)?;
            if i != 0 {
                sink.rect(i1, i2, i4, i3)?;
            }
            i4 = i2;
            i3 = i1;
        }
    }
    Ok(())
}
