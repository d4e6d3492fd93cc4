//! Flat annuli in the XZ plane, used for planetary ring systems.

use crate::error::{MeshError, MeshResult};
use crate::math::{Mat4, Vec2, Vec3, normal_matrix, transform_point, transform_vector};
use crate::mesh::VertexInfo;
use crate::mesh::sink::{VertexSink, check_divisions};

/// Annulus between `inner_radius` and `outer_radius` around the origin.
///
/// The face points up (+Y), or down with `flip_normals`. Texture `u` runs
/// along the angle and `v` from the inner (0) to the outer (1) rim, so a
/// radial ring texture maps onto `v`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ring {
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub divisions: u32,
    pub flip_normals: bool,
    pub angle_from: f32,
    pub angle_to: f32,
    pub transform: Option<Mat4>,
}

impl Ring {
    pub fn new(inner_radius: f32, outer_radius: f32, divisions: u32) -> Self {
        Self {
            inner_radius,
            outer_radius,
            divisions,
            flip_normals: false,
            angle_from: 0.0,
            angle_to: 360.0,
            transform: None,
        }
    }

    #[must_use]
    pub fn with_flip_normals(mut self, flip: bool) -> Self {
        self.flip_normals = flip;
        self
    }

    #[must_use]
    pub fn with_angles(mut self, angle_from: f32, angle_to: f32) -> Self {
        self.angle_from = angle_from;
        self.angle_to = angle_to;
        self
    }

    #[must_use]
    pub fn with_transform(mut self, transform: Mat4) -> Self {
        self.transform = Some(transform);
        self
    }
}

/// Emit a [`Ring`].
pub fn ring<S: VertexSink + ?Sized>(sink: &mut S, r: &Ring) -> MeshResult<()> {
    check_divisions("divisions", r.divisions, 1, u32::MAX)?;
    if r.outer_radius <= r.inner_radius {
        return Err(MeshError::DegenerateGeometry(
            "ring outer radius must exceed its inner radius",
        ));
    }

    let transform = r.transform.unwrap_or_else(Mat4::identity);
    let directions = normal_matrix(&transform).ok_or(MeshError::SingularTransform)?;
    let up = if r.flip_normals { -Vec3::y() } else { Vec3::y() };
    let normal = transform_vector(&directions, &up).normalize();

    let div = r.divisions as usize;
    sink.reserve_vertices(2 * (div + 1))?;
    sink.ensure_rectangle_indices(div);

    let ao = r.angle_from.to_radians();
    let step = (r.angle_to - r.angle_from).to_radians() / r.divisions as f32;
    let mut previous: Option<(u32, u32)> = None;
    for i in 0..=r.divisions {
        let (sin, cos) = (ao + step * i as f32).sin_cos();
        let dir = Vec3::new(cos, 0.0, sin);
        let u = i as f32 / r.divisions as f32;
        let inner = sink.vertex(&VertexInfo::pnu(
            transform_point(&transform, &(dir * r.inner_radius)),
            normal,
            Vec2::new(u, 0.0),
        ))?;
        let outer = sink.vertex(&VertexInfo::pnu(
            transform_point(&transform, &(dir * r.outer_radius)),
            normal,
            Vec2::new(u, 1.0),
        ))?;
        if let Some((prev_inner, prev_outer)) = previous {
            if r.flip_normals {
                sink.rect(prev_inner, prev_outer, outer, inner)?;
            } else {
                sink.rect(prev_inner, inner, outer, prev_outer)?;
            }
        }
        previous = Some((inner, outer));
    }
    Ok(())
}
