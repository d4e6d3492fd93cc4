//! Arrows: a cylindrical stem topped by a conical cap.

use crate::error::{MeshError, MeshResult};
use crate::math::{Mat4, Vec3, mat4_from_basis};
use crate::mesh::scratch::ScratchArena;
use crate::mesh::sink::VertexSink;

use super::cylinder::{Cone, Cylinder, cone, cylinder};

/// Arrow from `begin` to `end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arrow {
    pub begin: Vec3,
    pub end: Vec3,
    /// Cap height as a fraction of the arrow length.
    pub cap_length: f32,
    /// Stem diameter as a fraction of the cap diameter.
    pub stem_thickness: f32,
    pub divisions: u32,
}

impl Arrow {
    pub fn new(begin: Vec3, end: Vec3) -> Self {
        Self {
            begin,
            end,
            cap_length: 0.1,
            stem_thickness: 0.1,
            divisions: 5,
        }
    }

    #[must_use]
    pub fn with_cap_length(mut self, cap_length: f32) -> Self {
        self.cap_length = cap_length;
        self
    }

    #[must_use]
    pub fn with_stem_thickness(mut self, stem_thickness: f32) -> Self {
        self.stem_thickness = stem_thickness;
        self
    }

    #[must_use]
    pub fn with_divisions(mut self, divisions: u32) -> Self {
        self.divisions = divisions;
        self
    }
}

/// Emit an [`Arrow`].
///
/// The cap's base diameter is `2 * height * sqrt(1/3)`, so the arrow keeps
/// its proportions at any length. The cap base sits on the end of the stem
/// and its apex on `end`. Stem and cap are built along +Y and mapped
/// onto the arrow direction through the sink's vertex transform, composed
/// after the caller's own transform. The caller's transform, enabled or not,
/// is restored before returning, also on error.
pub fn arrow<S: VertexSink + ?Sized>(
    sink: &mut S,
    scratch: &mut ScratchArena,
    a: &Arrow,
) -> MeshResult<()> {
    let length = (a.end - a.begin).norm();
    if length <= f32::EPSILON {
        return Err(MeshError::DegenerateGeometry("arrow has zero length"));
    }
    let cone_height = length * a.cap_length;
    let cone_diameter = 2.0 * cone_height * (1.0f32 / 3.0).sqrt();
    let stem_length = length - cone_height;
    let stem_diameter = cone_diameter * a.stem_thickness;

    let mut scope = scratch.scope();
    let up = scope.alloc_vec3((a.end - a.begin) / length);
    let forward = {
        let up = scope.vec3(up);
        let mut f = up.cross(&Vec3::z());
        if f.norm_squared() == 0.0 {
            f = Vec3::x();
        }
        scope.alloc_vec3(f.cross(&up).normalize())
    };
    let left = scope.alloc_vec3(scope.vec3(up).cross(&scope.vec3(forward)).normalize());

    let (stored, enabled) = sink.stored_vertex_transform();
    let base = if enabled { stored } else { Mat4::identity() };
    let local = scope.alloc_mat4(mat4_from_basis(
        scope.vec3(left),
        scope.vec3(up),
        scope.vec3(forward),
        a.begin + scope.vec3(up) * (stem_length * 0.5),
    ));

    let result = (|| {
        sink.set_vertex_transform(Some(base * scope.mat4(local)))?;
        cylinder(
            sink,
            &Cylinder::new(stem_diameter, stem_length, stem_diameter, a.divisions),
        )?;

        let mut cap = scope.mat4(local);
        cap.fixed_view_mut::<3, 1>(0, 3)
            .copy_from(&(a.begin + scope.vec3(up) * (stem_length + cone_height * 0.5)));
        *scope.mat4_mut(local) = cap;
        sink.set_vertex_transform(Some(base * cap))?;
        cone(
            sink,
            &Cone::new(cone_diameter, cone_height, cone_diameter, a.divisions),
        )
    })();

    sink.restore_vertex_transform(stored, enabled)?;
    result
}
