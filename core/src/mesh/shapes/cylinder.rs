//! Cylinders, cones and capsules.

use crate::error::{MeshError, MeshResult};
use crate::math::{Vec2, Vec3, mat4_from_translation};
use crate::mesh::VertexInfo;
use crate::mesh::scratch::ScratchArena;
use crate::mesh::sink::{VertexSink, check_divisions};

use super::ellipse::{Ellipse, ellipse};
use super::uv_sphere::{UvSphere, uv_sphere};

/// An elliptic cylinder along the Y axis, centered at the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cylinder {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    pub divisions: u32,
    /// Start angle in degrees.
    pub angle_from: f32,
    /// End angle in degrees.
    pub angle_to: f32,
    /// Emit the top and bottom caps.
    pub close: bool,
    /// Wind the side faces inwards.
    pub flip_normals: bool,
}

impl Cylinder {
    /// Full closed cylinder.
    pub fn new(width: f32, height: f32, depth: f32, divisions: u32) -> Self {
        Self {
            width,
            height,
            depth,
            divisions,
            angle_from: 0.0,
            angle_to: 360.0,
            close: true,
            flip_normals: false,
        }
    }

    #[must_use]
    pub fn with_angles(mut self, angle_from: f32, angle_to: f32) -> Self {
        self.angle_from = angle_from;
        self.angle_to = angle_to;
        self
    }

    #[must_use]
    pub fn with_close(mut self, close: bool) -> Self {
        self.close = close;
        self
    }

    #[must_use]
    pub fn with_flip_normals(mut self, flip: bool) -> Self {
        self.flip_normals = flip;
        self
    }
}

/// Side vertex on the rim at `angle`, with its outward radial normal.
fn rim(angle: f32, hw: f32, hd: f32, y: f32, uv: Vec2) -> VertexInfo {
    let (sin, cos) = angle.sin_cos();
    let radial = Vec3::new(cos * hw, 0.0, sin * hd);
    VertexInfo::pnu(
        Vec3::new(radial.x, y, radial.z),
        radial.normalize(),
        uv,
    )
}

/// Bottom cap, seen from below.
fn bottom_cap<S: VertexSink + ?Sized>(
    sink: &mut S,
    width: f32,
    depth: f32,
    hh: f32,
    divisions: u32,
    angle_from: f32,
    angle_to: f32,
) -> MeshResult<()> {
    let cap = Ellipse::new(width, depth, divisions)
        .with_center(Vec3::new(0.0, -hh, 0.0))
        .with_normal(-Vec3::y())
        .with_basis(-Vec3::x(), Vec3::z())
        .with_angles(180.0 - angle_to, 180.0 - angle_from);
    ellipse(sink, &cap)
}

/// Emit a [`Cylinder`].
pub fn cylinder<S: VertexSink + ?Sized>(sink: &mut S, c: &Cylinder) -> MeshResult<()> {
    check_divisions("divisions", c.divisions, 1, u32::MAX)?;
    let hw = c.width * 0.5;
    let hh = c.height * 0.5;
    let hd = c.depth * 0.5;
    let ao = c.angle_from.to_radians();
    let step = (c.angle_to - c.angle_from).to_radians() / c.divisions as f32;
    let us = 1.0 / c.divisions as f32;

    let div = c.divisions as usize;
    sink.reserve_vertices(2 * (div + 1))?;
    sink.ensure_rectangle_indices(div);

    let (mut i3, mut i4) = (0, 0);
    for i in 0..=c.divisions {
        let angle = ao + step * i as f32;
        let u = 1.0 - us * i as f32;
        let i2 = sink.vertex(&rim(angle, hw, hd, -hh, Vec2::new(u, 1.0)))?;
        let i1 = sink.vertex(&rim(angle, hw, hd, hh, Vec2::new(u, 0.0)))?;
        if i != 0 {
            if c.flip_normals {
                sink.rect(i3, i4, i2, i1)?;
            } else {
                sink.rect(i3, i1, i2, i4)?;
            }
        }
        i4 = i2;
        i3 = i1;
    }

    if c.close {
        let top = Ellipse::new(c.width, c.depth, c.divisions)
            .with_center(Vec3::new(0.0, hh, 0.0))
            .with_normal(Vec3::y())
            .with_basis(Vec3::x(), Vec3::z())
            .with_angles(c.angle_from, c.angle_to);
        ellipse(sink, &top)?;
        bottom_cap(sink, c.width, c.depth, hh, c.divisions, c.angle_from, c.angle_to)?;
    }
    Ok(())
}

/// An elliptic cone along the Y axis with its apex at `+height / 2`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cone {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    pub divisions: u32,
    pub angle_from: f32,
    pub angle_to: f32,
}

impl Cone {
    pub fn new(width: f32, height: f32, depth: f32, divisions: u32) -> Self {
        Self {
            width,
            height,
            depth,
            divisions,
            angle_from: 0.0,
            angle_to: 360.0,
        }
    }

    #[must_use]
    pub fn with_angles(mut self, angle_from: f32, angle_to: f32) -> Self {
        self.angle_from = angle_from;
        self.angle_to = angle_to;
        self
    }
}

/// Emit a [`Cone`] with its base cap.
pub fn cone<S: VertexSink + ?Sized>(sink: &mut S, c: &Cone) -> MeshResult<()> {
    check_divisions("divisions", c.divisions, 1, u32::MAX)?;
    let hw = c.width * 0.5;
    let hh = c.height * 0.5;
    let hd = c.depth * 0.5;
    let ao = c.angle_from.to_radians();
    let step = (c.angle_to - c.angle_from).to_radians() / c.divisions as f32;
    let us = 1.0 / c.divisions as f32;

    let div = c.divisions as usize;
    sink.reserve_vertices(div + 2)?;
    sink.ensure_triangle_indices(div);

    let apex = sink.vertex(&VertexInfo::pnu(
        Vec3::new(0.0, hh, 0.0),
        Vec3::y(),
        Vec2::new(0.5, 0.0),
    ))?;
    let mut i2 = 0;
    for i in 0..=c.divisions {
        let angle = ao + step * i as f32;
        let u = 1.0 - us * i as f32;
        let i1 = sink.vertex(&rim(angle, hw, hd, -hh, Vec2::new(u, 1.0)))?;
        if i != 0 {
            sink.triangle(apex, i1, i2)?;
        }
        i2 = i1;
    }
    bottom_cap(sink, c.width, c.depth, hh, c.divisions, c.angle_from, c.angle_to)
}

/// Emit a capsule: an open cylinder capped by two hemispheres.
///
/// Fails with [`MeshError::CapsuleTooShort`] when `height < 2 * radius`.
pub fn capsule<S: VertexSink + ?Sized>(
    sink: &mut S,
    scratch: &mut ScratchArena,
    radius: f32,
    height: f32,
    divisions: u32,
) -> MeshResult<()> {
    if height < 2.0 * radius {
        return Err(MeshError::CapsuleTooShort { radius, height });
    }
    check_divisions("divisions", divisions, 1, u32::MAX)?;
    let ring = divisions as usize + 1;
    sink.reserve_vertices(2 * ring + 2 * ring * ring)?;

    let d = 2.0 * radius;
    let mut scope = scratch.scope();
    let top = scope.alloc_mat4(mat4_from_translation(Vec3::new(0.0, 0.5 * (height - d), 0.0)));
    let bottom = scope.alloc_mat4(mat4_from_translation(Vec3::new(0.0, -0.5 * (height - d), 0.0)));

    cylinder(
        sink,
        &Cylinder::new(d, height - d, d, divisions).with_close(false),
    )?;
    let hemisphere = UvSphere::new(d, d, d, divisions, divisions);
    uv_sphere(
        sink,
        &hemisphere
            .with_transform(scope.mat4(top))
            .with_angles_v(0.0, 90.0),
    )?;
    uv_sphere(
        sink,
        &hemisphere
            .with_transform(scope.mat4(bottom))
            .with_angles_v(90.0, 180.0),
    )
}
