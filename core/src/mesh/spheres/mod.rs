//! Subdivision sphere generators.
//!
//! [`IcoSphere`] and [`OctahedronSphere`] start from a regular polyhedron and
//! split every face into four, `divisions` times. Edge midpoints go through a
//! cache keyed by the unordered endpoint pair, so two faces sharing an edge
//! share its midpoint and the vertex count follows a closed form:
//!
//! | seed        | faces        | vertices         |
//! |-------------|--------------|------------------|
//! | icosahedron | `20 * 4^n`   | `10 * 4^n + 2`   |
//! | octahedron  | `8 * 4^n`    | `4 * 4^n + 2`    |
//!
//! Generation is pure: the cache lives for one `create` call and identical
//! inputs always produce identical ordering.
//!
//! The result is a [`SphereGeometry`] with separate normal/tangent/binormal
//! tables so hard-edged spheres can use one normal per face.
//! [`emit_faces`] flattens a window of faces into a [`VertexSink`].

mod icosphere;
mod octahedron;

use std::collections::HashMap;
use std::f32::consts::PI;

use crate::error::MeshResult;
use crate::math::{Vec2, Vec3, any_perpendicular};
use crate::mesh::VertexInfo;
use crate::mesh::sink::{VertexSink, check_divisions};

pub use icosphere::IcoSphere;
pub use octahedron::OctahedronSphere;

/// A triangle of a [`SphereGeometry`].
///
/// Each corner indexes the position (and UV) table through `v` and the
/// direction tables through `n`, `t` and `b`. Indices are 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Face {
    pub v: [u32; 3],
    pub n: [u32; 3],
    pub t: [u32; 3],
    pub b: [u32; 3],
}

/// Indexed output of a sphere generator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SphereGeometry {
    /// Positions, scaled to the radius.
    pub vertices: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub tangents: Vec<Vec3>,
    pub binormals: Vec<Vec3>,
    /// One UV per position.
    pub uvs: Vec<Vec2>,
    pub faces: Vec<Face>,
}

impl SphereGeometry {
    /// Vertex record for corner `corner` of `face`.
    pub fn corner(&self, face: &Face, corner: usize) -> VertexInfo {
        let v = face.v[corner] as usize;
        VertexInfo {
            position: Some(self.vertices[v]),
            normal: Some(self.normals[face.n[corner] as usize]),
            tangent: Some(self.tangents[face.t[corner] as usize]),
            binormal: Some(self.binormals[face.b[corner] as usize]),
            color: None,
            uv: Some(self.uvs[v]),
        }
    }
}

/// Unordered edge between two vertex indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct EdgeKey {
    lo: u32,
    hi: u32,
}

static_assertions::assert_eq_size!(EdgeKey, u64);

impl EdgeKey {
    fn new(a: u32, b: u32) -> Self {
        Self {
            lo: a.min(b),
            hi: a.max(b),
        }
    }
}

/// Unit-sphere vertices plus the edge midpoint cache of one generation run.
struct Subdivider {
    points: Vec<Vec3>,
    midpoints: HashMap<EdgeKey, u32>,
}

impl Subdivider {
    fn midpoint(&mut self, a: u32, b: u32) -> u32 {
        let points = &mut self.points;
        *self.midpoints.entry(EdgeKey::new(a, b)).or_insert_with(|| {
            let p = (points[a as usize] + points[b as usize]) * 0.5;
            points.push(p.normalize());
            (points.len() - 1) as u32
        })
    }

    fn subdivide(&mut self, faces: &[[u32; 3]]) -> Vec<[u32; 3]> {
        let mut out = Vec::with_capacity(faces.len() * 4);
        for &[v1, v2, v3] in faces {
            let a = self.midpoint(v1, v2);
            let b = self.midpoint(v2, v3);
            let c = self.midpoint(v3, v1);
            out.push([v1, a, c]);
            out.push([v2, b, a]);
            out.push([v3, c, b]);
            out.push([a, b, c]);
        }
        out
    }
}

/// A polyhedron that can be refined into a sphere.
pub trait SubdivisionSphere {
    /// Name used in logs and errors.
    const NAME: &'static str;
    /// Largest accepted subdivision level.
    const MAX_DIVISIONS: u32;

    /// Seed vertices (any length, normalized by the generator) and
    /// outward-wound faces.
    fn seed() -> (Vec<Vec3>, Vec<[u32; 3]>);

    /// Number of faces produced at `divisions`.
    fn face_count(divisions: u32) -> usize {
        Self::seed().1.len() << (2 * divisions)
    }

    /// Generate the sphere.
    ///
    /// `flip_normals` reverses every face and points normals inwards.
    /// `hard_edges` gives each face its own normal computed from its
    /// subdivided corners; otherwise normals are the smooth radial direction.
    fn create(
        radius: f32,
        divisions: u32,
        flip_normals: bool,
        hard_edges: bool,
    ) -> MeshResult<SphereGeometry> {
        crate::profile_scope!("sphere_create");
        check_divisions("divisions", divisions, 0, Self::MAX_DIVISIONS)?;

        let (seed_points, seed_faces) = Self::seed();
        let mut faces: Vec<[u32; 3]> = seed_faces
            .into_iter()
            .map(|[a, b, c]| if flip_normals { [a, c, b] } else { [a, b, c] })
            .collect();
        let mut sub = Subdivider {
            points: seed_points.iter().map(|p| p.normalize()).collect(),
            midpoints: HashMap::new(),
        };
        for level in 0..divisions {
            faces = sub.subdivide(&faces);
            log::trace!(
                "{} level {}: {} faces, {} vertices",
                Self::NAME,
                level + 1,
                faces.len(),
                sub.points.len()
            );
        }

        let geometry = build_geometry(&sub.points, &faces, radius, flip_normals, hard_edges);
        log::debug!(
            "{} r={} divisions={}: {} faces, {} vertices",
            Self::NAME,
            radius,
            divisions,
            geometry.faces.len(),
            geometry.vertices.len()
        );
        Ok(geometry)
    }
}

/// Spherical UV of a unit direction, with the two poles pinned.
fn sphere_uv(p: &Vec3) -> Vec2 {
    if p.y.abs() <= f32::EPSILON && p.z.abs() <= f32::EPSILON {
        return if p.x > 0.0 {
            Vec2::new(0.5, 0.0)
        } else {
            Vec2::new(0.5, 1.0)
        };
    }
    Vec2::new(
        0.5 + p.z.atan2(p.y) / (2.0 * PI),
        0.5 - p.x.clamp(-1.0, 1.0).asin() / PI,
    )
}

fn build_geometry(
    unit: &[Vec3],
    faces: &[[u32; 3]],
    radius: f32,
    flip_normals: bool,
    hard_edges: bool,
) -> SphereGeometry {
    let vertices: Vec<Vec3> = unit.iter().map(|p| p * radius).collect();
    let uvs = unit.iter().map(sphere_uv).collect();

    if hard_edges {
        let mut normals = Vec::with_capacity(faces.len());
        let mut tangents = Vec::with_capacity(faces.len());
        let mut binormals = Vec::with_capacity(faces.len());
        let mut out = Vec::with_capacity(faces.len());
        for (i, &v) in faces.iter().enumerate() {
            let [p0, p1, p2] = v.map(|i| vertices[i as usize]);
            // Winding already reflects `flip_normals`.
            let n = (p1 - p0).cross(&(p2 - p0)).normalize();
            let t = (p1 - p0).normalize();
            normals.push(n);
            tangents.push(t);
            binormals.push(n.cross(&t));
            let f = i as u32;
            out.push(Face {
                v,
                n: [f; 3],
                t: [f; 3],
                b: [f; 3],
            });
        }
        return SphereGeometry {
            vertices,
            normals,
            tangents,
            binormals,
            uvs,
            faces: out,
        };
    }

    let sign = if flip_normals { -1.0 } else { 1.0 };
    let normals: Vec<Vec3> = unit.iter().map(|p| p * sign).collect();
    let tangents: Vec<Vec3> = unit
        .iter()
        .map(|p| {
            let t = Vec3::new(0.0, -p.z, p.y);
            if t.norm_squared() <= f32::EPSILON {
                any_perpendicular(p)
            } else {
                t.normalize()
            }
        })
        .collect();
    let binormals = normals
        .iter()
        .zip(&tangents)
        .map(|(n, t)| n.cross(t))
        .collect();
    SphereGeometry {
        vertices,
        normals,
        tangents,
        binormals,
        uvs,
        faces: faces
            .iter()
            .map(|&v| Face { v, n: v, t: v, b: v })
            .collect(),
    }
}

/// Flatten faces `start_face..start_face + face_count` into `sink`.
///
/// Every corner becomes its own vertex, so hard-edge normals survive; the
/// window is clamped to the available faces.
pub fn emit_faces<S: VertexSink + ?Sized>(
    sink: &mut S,
    geometry: &SphereGeometry,
    start_face: usize,
    face_count: usize,
) -> MeshResult<()> {
    let end = start_face.saturating_add(face_count).min(geometry.faces.len());
    let window = geometry.faces.get(start_face..end).unwrap_or(&[]);
    sink.reserve_vertices(window.len() * 3)?;
    sink.ensure_triangle_indices(window.len());
    for face in window {
        let a = sink.vertex(&geometry.corner(face, 0))?;
        let b = sink.vertex(&geometry.corner(face, 1))?;
        let c = sink.vertex(&geometry.corner(face, 2))?;
        sink.triangle(a, b, c)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 20, 12)]
    #[case(1, 80, 42)]
    #[case(2, 320, 162)]
    #[case(3, 1280, 642)]
    fn test_icosphere_counts(#[case] divisions: u32, #[case] faces: usize, #[case] vertices: usize) {
        let g = IcoSphere::create(1.0, divisions, false, false).unwrap();
        assert_eq!(g.faces.len(), faces);
        assert_eq!(g.vertices.len(), vertices);
        assert_eq!(IcoSphere::face_count(divisions), faces);
    }

    #[rstest]
    #[case(0, 8, 6)]
    #[case(1, 32, 18)]
    #[case(2, 128, 66)]
    fn test_octahedron_counts(#[case] divisions: u32, #[case] faces: usize, #[case] vertices: usize) {
        let g = OctahedronSphere::create(1.0, divisions, false, false).unwrap();
        assert_eq!(g.faces.len(), faces);
        assert_eq!(g.vertices.len(), vertices);
    }

    #[test]
    fn test_division_limits() {
        assert!(OctahedronSphere::create(1.0, 6, false, false).is_ok());
        assert_eq!(
            OctahedronSphere::create(1.0, 7, false, false),
            Err(crate::error::MeshError::InvalidDivisions {
                name: "divisions",
                value: 7,
                min: 0,
                max: 6,
            })
        );
        assert!(IcoSphere::create(1.0, 11, false, false).is_err());
    }

    #[test]
    fn test_vertices_on_radius() {
        let g = IcoSphere::create(2.5, 2, false, false).unwrap();
        for v in &g.vertices {
            assert!((v.norm() - 2.5).abs() < 1e-4);
        }
    }

    #[test]
    fn test_deterministic() {
        let a = OctahedronSphere::create(1.0, 3, true, true).unwrap();
        let b = OctahedronSphere::create(1.0, 3, true, true).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_edge_key_is_unordered() {
        assert_eq!(EdgeKey::new(3, 9), EdgeKey::new(9, 3));
        assert_ne!(EdgeKey::new(3, 9), EdgeKey::new(3, 8));
    }

    fn outward(g: &SphereGeometry) -> impl Iterator<Item = f32> + '_ {
        g.faces.iter().map(|f| {
            let [a, b, c] = f.v.map(|i| g.vertices[i as usize]);
            let centroid = (a + b + c) / 3.0;
            (b - a).cross(&(c - a)).dot(&centroid)
        })
    }

    #[rstest]
    #[case(false)]
    #[case(true)]
    fn test_winding(#[case] flip: bool) {
        let g = IcoSphere::create(1.0, 1, flip, false).unwrap();
        assert!(outward(&g).all(|d| if flip { d < 0.0 } else { d > 0.0 }));
        let o = OctahedronSphere::create(1.0, 1, flip, false).unwrap();
        assert!(outward(&o).all(|d| if flip { d < 0.0 } else { d > 0.0 }));
    }

    #[test]
    fn test_smooth_normals_follow_flip() {
        let g = IcoSphere::create(3.0, 0, true, false).unwrap();
        for (v, n) in g.vertices.iter().zip(&g.normals) {
            assert!(v.normalize().dot(n) < -0.999);
        }
    }

    #[test]
    fn test_hard_edges_use_subdivided_face_normal() {
        let g = OctahedronSphere::create(1.0, 2, false, true).unwrap();
        assert_eq!(g.normals.len(), g.faces.len());
        for face in &g.faces {
            let [a, b, c] = face.v.map(|i| g.vertices[i as usize]);
            let n = g.normals[face.n[0] as usize];
            assert!(n.dot(&(b - a)).abs() < 1e-5);
            assert!(n.dot(&(c - a)).abs() < 1e-5);
            assert!(n.dot(&a) > 0.0);
            assert_eq!(face.n, face.t);
        }
    }

    #[test]
    fn test_pole_uvs() {
        assert_eq!(sphere_uv(&Vec3::x()), Vec2::new(0.5, 0.0));
        assert_eq!(sphere_uv(&-Vec3::x()), Vec2::new(0.5, 1.0));
        let equator = sphere_uv(&Vec3::y());
        assert!((equator.x - 0.5).abs() < 1e-6);
        assert!((equator.y - 0.5).abs() < 1e-6);
    }
}
