//! Parametric latitude/longitude spheres.

use crate::error::{MeshError, MeshResult};
use crate::math::{Mat4, Vec2, Vec3, normal_matrix, transform_point, transform_vector};
use crate::mesh::VertexInfo;
use crate::mesh::sink::{VertexSink, check_divisions};

/// An ellipsoid tessellated over a `(u, v)` angle grid.
///
/// `u` runs around the Y axis, `v` from the north pole (0 degrees) to the
/// south pole (180 degrees). Restricting either range yields partial shells
/// such as domes. Every vertex carries a tangent along `u` and a binormal
/// along `v`, so tangent-space shading works on partial shells too.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UvSphere {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    pub divisions_u: u32,
    pub divisions_v: u32,
    pub flip_normals: bool,
    pub angle_u_from: f32,
    pub angle_u_to: f32,
    pub angle_v_from: f32,
    pub angle_v_to: f32,
    /// Applied to positions; directions use its inverse-transpose.
    pub transform: Option<Mat4>,
}

impl UvSphere {
    pub fn new(width: f32, height: f32, depth: f32, divisions_u: u32, divisions_v: u32) -> Self {
        Self {
            width,
            height,
            depth,
            divisions_u,
            divisions_v,
            flip_normals: false,
            angle_u_from: 0.0,
            angle_u_to: 360.0,
            angle_v_from: 0.0,
            angle_v_to: 180.0,
            transform: None,
        }
    }

    #[must_use]
    pub fn with_flip_normals(mut self, flip: bool) -> Self {
        self.flip_normals = flip;
        self
    }

    #[must_use]
    pub fn with_angles_u(mut self, from: f32, to: f32) -> Self {
        self.angle_u_from = from;
        self.angle_u_to = to;
        self
    }

    #[must_use]
    pub fn with_angles_v(mut self, from: f32, to: f32) -> Self {
        self.angle_v_from = from;
        self.angle_v_to = to;
        self
    }

    #[must_use]
    pub fn with_transform(mut self, transform: Mat4) -> Self {
        self.transform = Some(transform);
        self
    }
}

/// Emit a [`UvSphere`].
pub fn uv_sphere<S: VertexSink + ?Sized>(sink: &mut S, sphere: &UvSphere) -> MeshResult<()> {
    check_divisions("divisions_u", sphere.divisions_u, 1, u32::MAX)?;
    check_divisions("divisions_v", sphere.divisions_v, 1, u32::MAX)?;

    let transform = sphere.transform.unwrap_or_else(Mat4::identity);
    let directions = normal_matrix(&transform).ok_or(MeshError::SingularTransform)?;

    let hw = sphere.width * 0.5;
    let hh = sphere.height * 0.5;
    let hd = sphere.depth * 0.5;
    let auo = sphere.angle_u_from.to_radians();
    let step_u = (sphere.angle_u_to - sphere.angle_u_from).to_radians() / sphere.divisions_u as f32;
    let avo = sphere.angle_v_from.to_radians();
    let step_v = (sphere.angle_v_to - sphere.angle_v_from).to_radians() / sphere.divisions_v as f32;
    let us = 1.0 / sphere.divisions_u as f32;
    let vs = 1.0 / sphere.divisions_v as f32;
    let sign = if sphere.flip_normals { -1.0 } else { 1.0 };
    let row = sphere.divisions_u + 1;

    let (du, dv) = (sphere.divisions_u as usize, sphere.divisions_v as usize);
    sink.reserve_vertices((du + 1) * (dv + 1))?;
    sink.ensure_rectangle_indices(du * dv);

    for iv in 0..=sphere.divisions_v {
        let angle_v = avo + step_v * iv as f32;
        let (sin_v, cos_v) = angle_v.sin_cos();
        let v = vs * iv as f32;
        for iu in 0..=sphere.divisions_u {
            let angle_u = auo + step_u * iu as f32;
            let (sin_u, cos_u) = angle_u.sin_cos();
            let u = 1.0 - us * iu as f32;

            let local = Vec3::new(cos_u * hw * sin_v, cos_v * hh, sin_u * hd * sin_v);
            let radial = Vec3::new(cos_u * sin_v, cos_v, sin_u * sin_v);
            let tangent = Vec3::new(-sin_u, 0.0, cos_u);
            let binormal = Vec3::new(cos_u * cos_v, -sin_v, sin_u * cos_v);

            let info = VertexInfo::pnu(
                transform_point(&transform, &local),
                transform_vector(&directions, &radial).normalize() * sign,
                Vec2::new(u, v),
            )
            .with_tangent(transform_vector(&transform, &tangent).normalize())
            .with_binormal(transform_vector(&transform, &binormal).normalize());

            let idx = sink.vertex(&info)?;
            if iv > 0 && iu > 0 {
                if sphere.flip_normals {
                    sink.rect(idx, idx - row, idx - row - 1, idx - 1)?;
                } else {
                    sink.rect(idx, idx - 1, idx - row - 1, idx - row)?;
                }
            }
        }
    }
    Ok(())
}
