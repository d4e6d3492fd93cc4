//! Geometry access for one assembler part.

use crate::color::Color;
use crate::error::MeshResult;
use crate::math::{Mat4, Vec3};
use crate::mesh::shapes::{Arrow, Cone, Cylinder, Ellipse, Ring, UvSphere};
use crate::mesh::{MeshBuilder, PrimitiveTopology, VertexInfo, VertexLayout, VertexSink};
use crate::texture::TextureRegion;

/// Writes geometry into the part opened by
/// [`ModelBuilder::part`](super::ModelBuilder::part).
///
/// The mesh builder underneath is shared with other parts and owned by the
/// assembler, so its lifecycle (`begin`, `part`, `end`) is not reachable
/// from here.
#[derive(Debug)]
pub struct PartBuilder<'a> {
    builder: &'a mut MeshBuilder,
}

impl<'a> PartBuilder<'a> {
    pub(crate) fn new(builder: &'a mut MeshBuilder) -> Self {
        Self { builder }
    }

    /// Index of the most recently written vertex in the shared mesh.
    pub fn last_index(&self) -> Option<u32> {
        self.builder.last_index()
    }

    pub fn set_color(&mut self, color: Option<Color>) {
        self.builder.set_color(color);
    }

    pub fn color(&self) -> Option<Color> {
        self.builder.color()
    }

    pub fn set_uv_range(&mut self, u1: f32, v1: f32, u2: f32, v2: f32) {
        self.builder.set_uv_range(u1, v1, u2, v2);
    }

    pub fn set_uv_range_region(&mut self, region: TextureRegion) {
        self.builder.set_uv_range_region(region);
    }

    pub fn set_vertex_transform_enabled(&mut self, enabled: bool) {
        self.builder.set_vertex_transform_enabled(enabled);
    }

    pub fn is_vertex_transform_enabled(&self) -> bool {
        self.builder.is_vertex_transform_enabled()
    }

    pub fn vertices(&mut self, values: &[f32]) -> MeshResult<Option<u32>> {
        self.builder.vertices(values)
    }

    pub fn ensure_capacity(&mut self, vertices: usize, indices: usize) {
        self.builder.ensure_capacity(vertices, indices);
    }

    pub fn ensure_triangles(&mut self, vertices: usize, triangles: usize) {
        self.builder.ensure_triangles(vertices, triangles);
    }

    pub fn ensure_rectangles(&mut self, vertices: usize, rectangles: usize) {
        self.builder.ensure_rectangles(vertices, rectangles);
    }

    // Shape shorthands, see the methods of the same name on `MeshBuilder`.

    pub fn rect_normal(&mut self, c00: Vec3, c10: Vec3, c11: Vec3, c01: Vec3, normal: Vec3) -> MeshResult<()> {
        self.builder.rect_normal(c00, c10, c11, c01, normal)
    }

    pub fn patch(&mut self, corners: [Vec3; 4], normal: Vec3, divisions_u: u32, divisions_v: u32) -> MeshResult<()> {
        self.builder.patch(corners, normal, divisions_u, divisions_v)
    }

    pub fn box_sized(&mut self, width: f32, height: f32, depth: f32) -> MeshResult<()> {
        self.builder.box_sized(width, height, depth)
    }

    pub fn box_transformed(&mut self, transform: &Mat4, flip: bool) -> MeshResult<()> {
        self.builder.box_transformed(transform, flip)
    }

    pub fn circle(&mut self, radius: f32, divisions: u32, center: Vec3, normal: Vec3) -> MeshResult<()> {
        self.builder.circle(radius, divisions, center, normal)
    }

    pub fn ellipse(&mut self, ellipse: &Ellipse) -> MeshResult<()> {
        self.builder.ellipse(ellipse)
    }

    pub fn cylinder(&mut self, cylinder: &Cylinder) -> MeshResult<()> {
        self.builder.cylinder(cylinder)
    }

    pub fn cone(&mut self, cone: &Cone) -> MeshResult<()> {
        self.builder.cone(cone)
    }

    pub fn sphere(&mut self, sphere: &UvSphere) -> MeshResult<()> {
        self.builder.sphere(sphere)
    }

    pub fn capsule(&mut self, radius: f32, height: f32, divisions: u32) -> MeshResult<()> {
        self.builder.capsule(radius, height, divisions)
    }

    pub fn arrow(&mut self, arrow: &Arrow) -> MeshResult<()> {
        self.builder.arrow(arrow)
    }

    pub fn ring(&mut self, ring: &Ring) -> MeshResult<()> {
        self.builder.ring(ring)
    }

    pub fn icosphere(
        &mut self,
        radius: f32,
        divisions: u32,
        flip_normals: bool,
        hard_edges: bool,
        start_face: usize,
        face_count: usize,
    ) -> MeshResult<()> {
        self.builder
            .icosphere(radius, divisions, flip_normals, hard_edges, start_face, face_count)
    }

    pub fn octahedron_sphere(
        &mut self,
        radius: f32,
        divisions: u32,
        flip_normals: bool,
        hard_edges: bool,
        start_face: usize,
        face_count: usize,
    ) -> MeshResult<()> {
        self.builder
            .octahedron_sphere(radius, divisions, flip_normals, hard_edges, start_face, face_count)
    }
}

impl VertexSink for PartBuilder<'_> {
    fn layout(&self) -> &VertexLayout {
        self.builder.layout()
    }

    fn topology(&self) -> PrimitiveTopology {
        self.builder.topology()
    }

    fn vertex(&mut self, info: &VertexInfo) -> MeshResult<u32> {
        self.builder.vertex(info)
    }

    fn index(&mut self, indices: &[u32]) -> MeshResult<()> {
        self.builder.index(indices)
    }

    fn ensure_vertices(&mut self, count: usize) {
        self.builder.ensure_vertices(count);
    }

    fn ensure_indices(&mut self, count: usize) {
        self.builder.ensure_indices(count);
    }

    fn reserve_vertices(&mut self, count: usize) -> MeshResult<()> {
        self.builder.reserve_vertices(count)
    }

    fn uv_range(&self) -> TextureRegion {
        self.builder.uv_range()
    }

    fn vertex_transform(&self) -> Option<Mat4> {
        self.builder.vertex_transform()
    }

    fn set_vertex_transform(&mut self, transform: Option<Mat4>) -> MeshResult<()> {
        self.builder.set_vertex_transform(transform)
    }

    fn stored_vertex_transform(&self) -> (Mat4, bool) {
        self.builder.stored_vertex_transform()
    }
}
