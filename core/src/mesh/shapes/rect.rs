//! Rectangles, subdivided patches and boxes.

use crate::error::MeshResult;
use crate::math::{Mat4, Vec2, Vec3, transform_point};
use crate::mesh::layout::VertexAttributeSemantic;
use crate::mesh::sink::{VertexSink, check_divisions};
use crate::mesh::{PrimitiveTopology, VertexInfo};

/// The eight corners of a box, named `cXYZ` with `0` on the low side of an
/// axis and `1` on the high side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxCorners<T> {
    pub c000: T,
    pub c010: T,
    pub c100: T,
    pub c110: T,
    pub c001: T,
    pub c011: T,
    pub c101: T,
    pub c111: T,
}

impl BoxCorners<Vec3> {
    /// Corners of the unit cube centered at the origin, mapped through `transform`.
    pub fn unit(transform: &Mat4) -> Self {
        let c = |x: f32, y: f32, z: f32| transform_point(transform, &Vec3::new(x, y, z));
        Self {
            c000: c(-0.5, -0.5, -0.5),
            c010: c(-0.5, 0.5, -0.5),
            c100: c(0.5, -0.5, -0.5),
            c110: c(0.5, 0.5, -0.5),
            c001: c(-0.5, -0.5, 0.5),
            c011: c(-0.5, 0.5, 0.5),
            c101: c(0.5, -0.5, 0.5),
            c111: c(0.5, 0.5, 0.5),
        }
    }
}

/// Emit four new vertices and connect them as a quad.
pub fn rect_vertices<S: VertexSink + ?Sized>(
    sink: &mut S,
    c00: &VertexInfo,
    c10: &VertexInfo,
    c11: &VertexInfo,
    c01: &VertexInfo,
) -> MeshResult<()> {
    sink.reserve_vertices(4)?;
    let i00 = sink.vertex(c00)?;
    let i10 = sink.vertex(c10)?;
    let i11 = sink.vertex(c11)?;
    let i01 = sink.vertex(c01)?;
    sink.rect(i00, i10, i11, i01)
}

/// Corner records of a flat quad carrying the sink's UV range.
fn corner_infos<S: VertexSink + ?Sized>(
    sink: &S,
    corners: [Vec3; 4],
    normal: Vec3,
) -> [VertexInfo; 4] {
    let r = sink.uv_range();
    let [c00, c10, c11, c01] = corners;
    [
        VertexInfo::pnu(c00, normal, Vec2::new(r.u, r.v2)),
        VertexInfo::pnu(c10, normal, Vec2::new(r.u2, r.v2)),
        VertexInfo::pnu(c11, normal, Vec2::new(r.u2, r.v)),
        VertexInfo::pnu(c01, normal, Vec2::new(r.u, r.v)),
    ]
}

/// Emit a flat quad from corner positions and a shared normal.
pub fn rect<S: VertexSink + ?Sized>(
    sink: &mut S,
    c00: Vec3,
    c10: Vec3,
    c11: Vec3,
    c01: Vec3,
    normal: Vec3,
) -> MeshResult<()> {
    let [a, b, c, d] = corner_infos(sink, [c00, c10, c11, c01], normal);
    rect_vertices(sink, &a, &b, &c, &d)
}

/// Subdivide the quad spanned by four corner records into a
/// `divisions_u` x `divisions_v` grid of quads.
///
/// Grid vertices are bilinear interpolations of the corners; both division
/// counts must be at least one.
pub fn patch_vertices<S: VertexSink + ?Sized>(
    sink: &mut S,
    c00: &VertexInfo,
    c10: &VertexInfo,
    c11: &VertexInfo,
    c01: &VertexInfo,
    divisions_u: u32,
    divisions_v: u32,
) -> MeshResult<()> {
    check_divisions("divisions_u", divisions_u, 1, u32::MAX)?;
    check_divisions("divisions_v", divisions_v, 1, u32::MAX)?;

    let (du, dv) = (divisions_u as usize, divisions_v as usize);
    sink.reserve_vertices((du + 1) * (dv + 1))?;
    sink.ensure_rectangle_indices(du * dv);

    for u in 0..=divisions_u {
        let alpha_u = u as f32 / divisions_u as f32;
        let low = c00.lerp(c10, alpha_u);
        let high = c01.lerp(c11, alpha_u);
        for v in 0..=divisions_v {
            let idx = sink.vertex(&low.lerp(&high, v as f32 / divisions_v as f32))?;
            if u > 0 && v > 0 {
                sink.rect(
                    idx - divisions_v - 2,
                    idx - 1,
                    idx,
                    idx - divisions_v - 1,
                )?;
            }
        }
    }
    Ok(())
}

/// Subdivided flat quad from corner positions and a shared normal.
pub fn patch<S: VertexSink + ?Sized>(
    sink: &mut S,
    corners: [Vec3; 4],
    normal: Vec3,
    divisions_u: u32,
    divisions_v: u32,
) -> MeshResult<()> {
    let [a, b, c, d] = corner_infos(sink, corners, normal);
    patch_vertices(sink, &a, &b, &c, &d, divisions_u, divisions_v)
}

/// Emit a box sharing its eight corner vertices.
///
/// Triangles produce 36 indices, lines the 12 edges (24 indices) and points
/// the 8 corners. `flip` reverses the winding so the faces point inwards.
pub fn box_vertices<S: VertexSink + ?Sized>(
    sink: &mut S,
    corners: &BoxCorners<VertexInfo>,
    flip: bool,
) -> MeshResult<()> {
    sink.reserve_vertices(8)?;
    let i000 = sink.vertex(&corners.c000)?;
    let i100 = sink.vertex(&corners.c100)?;
    let i110 = sink.vertex(&corners.c110)?;
    let i010 = sink.vertex(&corners.c010)?;
    let i001 = sink.vertex(&corners.c001)?;
    let i101 = sink.vertex(&corners.c101)?;
    let i111 = sink.vertex(&corners.c111)?;
    let i011 = sink.vertex(&corners.c011)?;

    let caps = |sink: &mut S| -> MeshResult<()> {
        if flip {
            sink.rect(i000, i010, i110, i100)?;
            sink.rect(i101, i111, i011, i001)
        } else {
            sink.rect(i000, i100, i110, i010)?;
            sink.rect(i101, i001, i011, i111)
        }
    };

    match sink.topology() {
        PrimitiveTopology::LineList => {
            sink.ensure_indices(24);
            caps(sink)?;
            sink.index(&[i000, i001, i010, i011, i110, i111, i100, i101])
        }
        PrimitiveTopology::PointList => {
            sink.ensure_rectangle_indices(2);
            caps(sink)
        }
        PrimitiveTopology::TriangleList => {
            sink.ensure_rectangle_indices(6);
            caps(sink)?;
            if flip {
                sink.rect(i000, i001, i011, i010)?;
                sink.rect(i101, i100, i110, i111)?;
                sink.rect(i101, i001, i000, i100)?;
                sink.rect(i110, i010, i011, i111)
            } else {
                sink.rect(i000, i010, i011, i001)?;
                sink.rect(i101, i111, i110, i100)?;
                sink.rect(i101, i100, i000, i001)?;
                sink.rect(i110, i111, i011, i010)
            }
        }
    }
}

/// Emit a box from corner positions.
///
/// Without normals or UVs in the layout the eight corners are shared. Otherwise
/// each face gets its own four vertices with a face normal derived from the
/// face midpoints.
pub fn box_corners<S: VertexSink + ?Sized>(
    sink: &mut S,
    c: &BoxCorners<Vec3>,
    flip: bool,
) -> MeshResult<()> {
    if !sink.has(VertexAttributeSemantic::Normal) && !sink.has(VertexAttributeSemantic::TexCoord0)
    {
        let info = |p: Vec3| VertexInfo::new().with_position(p);
        let corners = BoxCorners {
            c000: info(c.c000),
            c010: info(c.c010),
            c100: info(c.c100),
            c110: info(c.c110),
            c001: info(c.c001),
            c011: info(c.c011),
            c101: info(c.c101),
            c111: info(c.c111),
        };
        return box_vertices(sink, &corners, flip);
    }

    sink.reserve_vertices(24)?;
    sink.ensure_rectangle_indices(6);
    let sign = if flip { -1.0 } else { 1.0 };
    let face_normal = |a: Vec3, b: Vec3, c: Vec3, d: Vec3| {
        (a.lerp(&b, 0.5) - c.lerp(&d, 0.5)).normalize() * sign
    };

    // -z / +z
    let n = face_normal(c.c000, c.c110, c.c001, c.c111);
    if flip {
        rect(sink, c.c000, c.c100, c.c110, c.c010, n)?;
        rect(sink, c.c011, c.c111, c.c101, c.c001, -n)?;
    } else {
        rect(sink, c.c000, c.c010, c.c110, c.c100, n)?;
        rect(sink, c.c011, c.c001, c.c101, c.c111, -n)?;
    }

    // -y / +y
    let n = face_normal(c.c000, c.c101, c.c010, c.c111);
    if flip {
        rect(sink, c.c001, c.c101, c.c100, c.c000, n)?;
        rect(sink, c.c010, c.c110, c.c111, c.c011, -n)?;
    } else {
        rect(sink, c.c001, c.c000, c.c100, c.c101, n)?;
        rect(sink, c.c010, c.c011, c.c111, c.c110, -n)?;
    }

    // -x / +x
    let n = face_normal(c.c000, c.c011, c.c100, c.c111);
    if flip {
        rect(sink, c.c001, c.c000, c.c010, c.c011, n)?;
        rect(sink, c.c100, c.c101, c.c111, c.c110, -n)
    } else {
        rect(sink, c.c001, c.c011, c.c010, c.c000, n)?;
        rect(sink, c.c100, c.c110, c.c111, c.c101, -n)
    }
}

/// Unit cube mapped through `transform`.
pub fn box_transformed<S: VertexSink + ?Sized>(
    sink: &mut S,
    transform: &Mat4,
    flip: bool,
) -> MeshResult<()> {
    box_corners(sink, &BoxCorners::unit(transform), flip)
}

/// Axis-aligned box of the given size centered at the origin.
pub fn box_sized<S: VertexSink + ?Sized>(
    sink: &mut S,
    width: f32,
    height: f32,
    depth: f32,
    flip: bool,
) -> MeshResult<()> {
    let scale = Mat4::new_nonuniform_scaling(&Vec3::new(width, height, depth));
    box_transformed(sink, &scale, flip)
}

/// Axis-aligned box of the given size centered at `center`.
pub fn box_at<S: VertexSink + ?Sized>(
    sink: &mut S,
    center: Vec3,
    width: f32,
    height: f32,
    depth: f32,
) -> MeshResult<()> {
    let transform = Mat4::new_translation(&center)
        * Mat4::new_nonuniform_scaling(&Vec3::new(width, height, depth));
    box_transformed(sink, &transform, false)
}
