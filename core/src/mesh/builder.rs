//! Incremental mesh builder with 32-bit indices.
//!
//! [`MeshBuilder`] accumulates interleaved vertices and indices under one
//! [`VertexLayout`] and splits the index buffer into named [`MeshPart`]s.
//!
//! # Example
//!
//! ```
//! use starmesh_core::mesh::{MeshBuilder, PrimitiveTopology, VertexLayout};
//!
//! let mut builder = MeshBuilder::new();
//! builder.begin(VertexLayout::position_only(), PrimitiveTopology::TriangleList)?;
//! builder.part("cube", PrimitiveTopology::TriangleList)?;
//! builder.box_sized(1.0, 2.0, 3.0)?;
//! let built = builder.end()?;
//!
//! assert_eq!(built.mesh.vertex_count(), 8);
//! assert_eq!(built.mesh.index_count(), 36);
//! assert_eq!(built.parts[0].id, "cube");
//! # Ok::<(), starmesh_core::error::MeshError>(())
//! ```

use std::sync::Arc;

use crate::color::Color;
use crate::error::{MeshError, MeshResult};
use crate::math::{Mat4, Vec3, normal_matrix, transform_point, transform_vector};
use crate::texture::TextureRegion;

use super::data::{Mesh, MeshPart, PrimitiveTopology};
use super::layout::{VertexAttributeSemantic, VertexLayout, VertexUsage};
use super::scratch::ScratchArena;
use super::shapes::{self, Arrow, Cone, Cylinder, Ellipse, Ring, UvSphere};
use super::sink::VertexSink;
use super::spheres::{self, IcoSphere, OctahedronSphere, SubdivisionSphere};
use super::vertex::VertexInfo;

/// Mesh builder configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuilderConfig {
    /// Vertex ceiling of one mesh. Defaults to the full 32-bit index range.
    pub max_vertices: u32,
    /// Floats reserved for vertices on `begin`.
    pub initial_vertex_capacity: usize,
    /// Indices reserved on `begin`.
    pub initial_index_capacity: usize,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            max_vertices: u32::MAX,
            initial_vertex_capacity: 0,
            initial_index_capacity: 0,
        }
    }
}

impl BuilderConfig {
    #[must_use]
    pub fn with_max_vertices(mut self, max_vertices: u32) -> Self {
        self.max_vertices = max_vertices;
        self
    }

    #[must_use]
    pub fn with_initial_capacity(mut self, vertex_floats: usize, indices: usize) -> Self {
        self.initial_vertex_capacity = vertex_floats;
        self.initial_index_capacity = indices;
        self
    }
}

/// Handle to a part opened with [`MeshBuilder::part`].
///
/// Handles index [`BuiltMesh::parts`] once the mesh is finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PartHandle(pub usize);

/// Output of [`MeshBuilder::end`].
#[derive(Debug, Clone)]
pub struct BuiltMesh {
    pub mesh: Arc<Mesh>,
    /// Parts in the order they were opened.
    pub parts: Vec<Arc<MeshPart>>,
}

impl BuiltMesh {
    pub fn part(&self, handle: PartHandle) -> Option<&Arc<MeshPart>> {
        self.parts.get(handle.0)
    }
}

#[derive(Debug, Clone)]
struct PartDraft {
    id: String,
    topology: PrimitiveTopology,
    offset: usize,
    size: usize,
}

/// Float offsets of each attribute inside one vertex record.
#[derive(Debug, Clone, Copy, Default)]
struct Offsets {
    position: usize,
    normal: Option<usize>,
    tangent: Option<usize>,
    binormal: Option<usize>,
    color: Option<usize>,
    color_packed: Option<usize>,
    uv: Option<usize>,
}

impl Offsets {
    fn of(layout: &VertexLayout) -> Option<Self> {
        use VertexAttributeSemantic::*;
        Some(Self {
            position: layout.offset_of(Position)?,
            normal: layout.offset_of(Normal),
            tangent: layout.offset_of(Tangent),
            binormal: layout.offset_of(Binormal),
            color: layout.offset_of(ColorUnpacked),
            color_packed: layout.offset_of(ColorPacked),
            uv: layout.offset_of(TexCoord0),
        })
    }
}

#[derive(Debug, Clone, Copy)]
struct VertexTransform {
    position: Mat4,
    direction: Mat4,
    enabled: bool,
}

impl Default for VertexTransform {
    fn default() -> Self {
        Self {
            position: Mat4::identity(),
            direction: Mat4::identity(),
            enabled: false,
        }
    }
}

/// Builds [`Mesh`]es with 32-bit indices.
///
/// Lifecycle: [`begin`](Self::begin), any number of [`part`](Self::part)
/// and geometry calls, then [`end`](Self::end), which returns the mesh and
/// resets the builder for reuse. Geometry goes through the [`VertexSink`]
/// implementation; the shape methods here are shorthands for the emitters
/// in [`shapes`] and [`spheres`].
#[derive(Debug)]
pub struct MeshBuilder {
    config: BuilderConfig,
    building: bool,
    layout: Arc<VertexLayout>,
    offsets: Offsets,
    topology: PrimitiveTopology,
    vertices: Vec<f32>,
    indices: Vec<u32>,
    parts: Vec<PartDraft>,
    current_part: Option<usize>,
    record: Vec<f32>,
    color: Option<Color>,
    uv_range: TextureRegion,
    transform: VertexTransform,
    scratch: ScratchArena,
}

impl Default for MeshBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MeshBuilder {
    pub fn new() -> Self {
        Self::with_config(BuilderConfig::default())
    }

    pub fn with_config(config: BuilderConfig) -> Self {
        Self {
            config,
            building: false,
            layout: Arc::new(VertexLayout::new()),
            offsets: Offsets::default(),
            topology: PrimitiveTopology::default(),
            vertices: Vec::new(),
            indices: Vec::new(),
            parts: Vec::new(),
            current_part: None,
            record: Vec::new(),
            color: None,
            uv_range: TextureRegion::FULL,
            transform: VertexTransform::default(),
            scratch: ScratchArena::new(),
        }
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Start building a mesh with `layout`.
    ///
    /// Fails if a mesh is already being built or the layout is invalid or
    /// has no position.
    pub fn begin(&mut self, layout: Arc<VertexLayout>, topology: PrimitiveTopology) -> MeshResult<()> {
        if self.building {
            return Err(MeshError::AlreadyBuilding);
        }
        layout.validate().map_err(MeshError::InvalidLayout)?;
        let offsets = Offsets::of(&layout).ok_or(MeshError::MissingPosition)?;

        self.vertices.clear();
        self.indices.clear();
        self.parts.clear();
        self.current_part = None;
        self.vertices.reserve(self.config.initial_vertex_capacity);
        self.indices.reserve(self.config.initial_index_capacity);
        self.record.clear();
        self.record.resize(layout.stride(), 0.0);
        self.offsets = offsets;
        self.layout = layout;
        self.topology = topology;
        self.color = None;
        self.building = true;
        log::trace!("mesh builder begin, stride {}", self.layout.stride());
        Ok(())
    }

    /// [`begin`](Self::begin) with a layout built from a usage mask.
    pub fn begin_usage(&mut self, usage: VertexUsage, topology: PrimitiveTopology) -> MeshResult<()> {
        self.begin(VertexLayout::from_usage(usage), topology)
    }

    pub fn is_building(&self) -> bool {
        self.building
    }

    fn ensure_building(&self) -> MeshResult<()> {
        if self.building {
            Ok(())
        } else {
            Err(MeshError::NotBuilding)
        }
    }

    fn close_part(&mut self) {
        if let Some(i) = self.current_part.take() {
            let part = &mut self.parts[i];
            part.size = self.indices.len() - part.offset;
        }
    }

    /// Close the current part and open a new one at the end of the index buffer.
    ///
    /// Also resets the default vertex color.
    pub fn part(&mut self, id: impl Into<String>, topology: PrimitiveTopology) -> MeshResult<PartHandle> {
        self.ensure_building()?;
        self.close_part();
        self.parts.push(PartDraft {
            id: id.into(),
            topology,
            offset: self.indices.len(),
            size: 0,
        });
        self.current_part = Some(self.parts.len() - 1);
        self.topology = topology;
        self.color = None;
        Ok(PartHandle(self.parts.len() - 1))
    }

    /// Current `(offset, size)` of a part's index window.
    pub fn part_range(&self, handle: PartHandle) -> Option<(usize, usize)> {
        let part = self.parts.get(handle.0)?;
        if self.current_part == Some(handle.0) {
            Some((part.offset, self.indices.len() - part.offset))
        } else {
            Some((part.offset, part.size))
        }
    }

    /// Finish the mesh and reset the builder.
    pub fn end(&mut self) -> MeshResult<BuiltMesh> {
        crate::profile_function!();
        self.ensure_building()?;
        self.close_part();

        let layout = Arc::clone(&self.layout);
        let mesh = Arc::new(Mesh::new(
            layout,
            std::mem::take(&mut self.vertices),
            std::mem::take(&mut self.indices),
        ));
        let parts = self
            .parts
            .drain(..)
            .map(|p| {
                MeshPart::new(p.id, p.topology, Arc::clone(&mesh), p.offset, p.size).map(Arc::new)
            })
            .collect::<MeshResult<Vec<_>>>();

        self.building = false;
        self.current_part = None;
        self.layout = Arc::new(VertexLayout::new());
        self.record.clear();

        let parts = parts?;
        log::debug!(
            "built mesh: {} vertices, {} indices, {} parts",
            mesh.vertex_count(),
            mesh.index_count(),
            parts.len()
        );
        Ok(BuiltMesh { mesh, parts })
    }

    /// Number of vertices written since `begin`.
    pub fn vertex_count(&self) -> usize {
        match self.layout.stride() {
            0 => 0,
            stride => self.vertices.len() / stride,
        }
    }

    /// Number of indices written since `begin`.
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Index of the most recently written vertex.
    pub fn last_index(&self) -> Option<u32> {
        (self.vertex_count() as u32).checked_sub(1)
    }

    /// Default color for vertices that do not set one. Reset on `begin` and `part`.
    pub fn set_color(&mut self, color: Option<Color>) {
        self.color = color;
    }

    pub fn color(&self) -> Option<Color> {
        self.color
    }

    /// UV rectangle mapped onto `rect` and `patch` corners.
    pub fn set_uv_range(&mut self, u1: f32, v1: f32, u2: f32, v2: f32) {
        self.uv_range = TextureRegion::new(u1, v1, u2, v2);
    }

    pub fn set_uv_range_region(&mut self, region: TextureRegion) {
        self.uv_range = region;
    }

    /// Toggle the vertex transform without replacing it.
    pub fn set_vertex_transform_enabled(&mut self, enabled: bool) {
        self.transform.enabled = enabled;
    }

    pub fn is_vertex_transform_enabled(&self) -> bool {
        self.transform.enabled
    }

    /// Scratch storage used by composite shapes; empty between calls.
    pub fn scratch(&self) -> &ScratchArena {
        &self.scratch
    }

    fn check_capacity(&self, additional: usize) -> MeshResult<()> {
        let total = self.vertex_count().checked_add(additional);
        if total.is_none_or(|n| n > self.config.max_vertices as usize) {
            Err(MeshError::TooManyVertices {
                limit: self.config.max_vertices,
            })
        } else {
            Ok(())
        }
    }

    /// Append raw vertex records, `stride` floats each, untransformed.
    ///
    /// Returns the index of the last appended vertex.
    pub fn vertices(&mut self, values: &[f32]) -> MeshResult<Option<u32>> {
        self.ensure_building()?;
        let stride = self.layout.stride();
        if values.len() % stride != 0 {
            return Err(MeshError::StrideMismatch {
                len: values.len(),
                stride,
            });
        }
        self.check_capacity(values.len() / stride)?;
        self.vertices.extend_from_slice(values);
        Ok(self.last_index())
    }

    /// Reserve room for vertices and indices at once.
    pub fn ensure_capacity(&mut self, vertices: usize, indices: usize) {
        self.ensure_vertices(vertices);
        self.ensure_indices(indices);
    }

    /// Reserve room for `vertices` and `triangles` under the current topology.
    pub fn ensure_triangles(&mut self, vertices: usize, triangles: usize) {
        self.ensure_vertices(vertices);
        self.ensure_triangle_indices(triangles);
    }

    /// Reserve room for `vertices` and `rectangles` under the current topology.
    pub fn ensure_rectangles(&mut self, vertices: usize, rectangles: usize) {
        self.ensure_vertices(vertices);
        self.ensure_rectangle_indices(rectangles);
    }

    /// Run `f` and, if it fails, drop the vertices and indices it wrote.
    fn atomic<T>(&mut self, f: impl FnOnce(&mut Self) -> MeshResult<T>) -> MeshResult<T> {
        let (vertices, indices) = (self.vertices.len(), self.indices.len());
        let result = f(self);
        if result.is_err() {
            self.vertices.truncate(vertices);
            self.indices.truncate(indices);
        }
        result
    }

    fn with_scratch<T>(
        &mut self,
        f: impl FnOnce(&mut Self, &mut ScratchArena) -> MeshResult<T>,
    ) -> MeshResult<T> {
        let mut scratch = std::mem::take(&mut self.scratch);
        let result = self.atomic(|b| f(b, &mut scratch));
        self.scratch = scratch;
        result
    }

    // Shape shorthands. Each one writes all of its geometry or none of it.

    /// Flat quad from corner positions, see [`shapes::rect`].
    pub fn rect_normal(&mut self, c00: Vec3, c10: Vec3, c11: Vec3, c01: Vec3, normal: Vec3) -> MeshResult<()> {
        self.atomic(|b| shapes::rect(b, c00, c10, c11, c01, normal))
    }

    /// See [`shapes::patch`].
    pub fn patch(&mut self, corners: [Vec3; 4], normal: Vec3, divisions_u: u32, divisions_v: u32) -> MeshResult<()> {
        self.atomic(|b| shapes::patch(b, corners, normal, divisions_u, divisions_v))
    }

    /// Box of the given size around the origin.
    pub fn box_sized(&mut self, width: f32, height: f32, depth: f32) -> MeshResult<()> {
        self.atomic(|b| shapes::box_sized(b, width, height, depth, false))
    }

    /// Unit cube mapped through `transform`.
    pub fn box_transformed(&mut self, transform: &Mat4, flip: bool) -> MeshResult<()> {
        self.atomic(|b| shapes::box_transformed(b, transform, flip))
    }

    /// Filled circle around `center` facing `normal`.
    pub fn circle(&mut self, radius: f32, divisions: u32, center: Vec3, normal: Vec3) -> MeshResult<()> {
        let circle = Ellipse::circle(radius, divisions)
            .with_center(center)
            .with_normal(normal);
        self.atomic(|b| shapes::ellipse(b, &circle))
    }

    pub fn ellipse(&mut self, ellipse: &Ellipse) -> MeshResult<()> {
        self.atomic(|b| shapes::ellipse(b, ellipse))
    }

    pub fn cylinder(&mut self, cylinder: &Cylinder) -> MeshResult<()> {
        self.atomic(|b| shapes::cylinder(b, cylinder))
    }

    pub fn cone(&mut self, cone: &Cone) -> MeshResult<()> {
        self.atomic(|b| shapes::cone(b, cone))
    }

    pub fn sphere(&mut self, sphere: &UvSphere) -> MeshResult<()> {
        self.atomic(|b| shapes::uv_sphere(b, sphere))
    }

    pub fn capsule(&mut self, radius: f32, height: f32, divisions: u32) -> MeshResult<()> {
        self.with_scratch(|b, scratch| shapes::capsule(b, scratch, radius, height, divisions))
    }

    pub fn arrow(&mut self, arrow: &Arrow) -> MeshResult<()> {
        self.with_scratch(|b, scratch| shapes::arrow(b, scratch, arrow))
    }

    pub fn ring(&mut self, ring: &Ring) -> MeshResult<()> {
        self.atomic(|b| shapes::ring(b, ring))
    }

    /// Icosphere faces `start_face..start_face + face_count`.
    pub fn icosphere(
        &mut self,
        radius: f32,
        divisions: u32,
        flip_normals: bool,
        hard_edges: bool,
        start_face: usize,
        face_count: usize,
    ) -> MeshResult<()> {
        let geometry = IcoSphere::create(radius, divisions, flip_normals, hard_edges)?;
        self.atomic(|b| spheres::emit_faces(b, &geometry, start_face, face_count))
    }

    /// Octahedron-sphere faces `start_face..start_face + face_count`.
    pub fn octahedron_sphere(
        &mut self,
        radius: f32,
        divisions: u32,
        flip_normals: bool,
        hard_edges: bool,
        start_face: usize,
        face_count: usize,
    ) -> MeshResult<()> {
        let geometry = OctahedronSphere::create(radius, divisions, flip_normals, hard_edges)?;
        self.atomic(|b| spheres::emit_faces(b, &geometry, start_face, face_count))
    }
}

impl VertexSink for MeshBuilder {
    fn layout(&self) -> &VertexLayout {
        &self.layout
    }

    fn topology(&self) -> PrimitiveTopology {
        self.topology
    }

    fn vertex(&mut self, info: &VertexInfo) -> MeshResult<u32> {
        self.ensure_building()?;
        self.check_capacity(1)?;

        let o = self.offsets;
        let t = self.transform;
        let record = &mut self.record;
        record.fill(0.0);

        let mut put = |offset: usize, v: &Vec3| record[offset..offset + 3].copy_from_slice(v.as_slice());
        let direction = |v: &Vec3| {
            if t.enabled {
                transform_vector(&t.direction, v).normalize()
            } else {
                *v
            }
        };

        if let Some(p) = &info.position {
            let p = if t.enabled {
                transform_point(&t.position, p)
            } else {
                *p
            };
            put(o.position, &p);
        }
        if let (Some(offset), Some(n)) = (o.normal, &info.normal) {
            put(offset, &direction(n));
        }
        if let (Some(offset), Some(v)) = (o.tangent, &info.tangent) {
            put(offset, &direction(v));
        }
        if let (Some(offset), Some(v)) = (o.binormal, &info.binormal) {
            put(offset, &direction(v));
        }
        if let Some(color) = info.color.or(self.color) {
            if let Some(offset) = o.color {
                record[offset..offset + 4].copy_from_slice(&color.to_array());
            } else if let Some(offset) = o.color_packed {
                record[offset] = color.to_packed_float();
            }
        }
        if let (Some(offset), Some(uv)) = (o.uv, &info.uv) {
            record[offset] = uv.x;
            record[offset + 1] = uv.y;
        }

        self.vertices.extend_from_slice(&self.record);
        Ok(self.vertex_count() as u32 - 1)
    }

    fn index(&mut self, indices: &[u32]) -> MeshResult<()> {
        self.ensure_building()?;
        self.indices.extend_from_slice(indices);
        Ok(())
    }

    fn ensure_vertices(&mut self, count: usize) {
        self.vertices.reserve(count * self.layout.stride());
    }

    fn ensure_indices(&mut self, count: usize) {
        self.indices.reserve(count);
    }

    fn reserve_vertices(&mut self, count: usize) -> MeshResult<()> {
        self.ensure_building()?;
        self.check_capacity(count)?;
        self.ensure_vertices(count);
        Ok(())
    }

    fn uv_range(&self) -> TextureRegion {
        self.uv_range
    }

    fn vertex_transform(&self) -> Option<Mat4> {
        self.transform.enabled.then_some(self.transform.position)
    }

    fn set_vertex_transform(&mut self, transform: Option<Mat4>) -> MeshResult<()> {
        match transform {
            Some(position) => {
                let direction = normal_matrix(&position).ok_or(MeshError::SingularTransform)?;
                self.transform = VertexTransform {
                    position,
                    direction,
                    enabled: true,
                };
            }
            None => self.transform.enabled = false,
        }
        Ok(())
    }

    fn stored_vertex_transform(&self) -> (Mat4, bool) {
        (self.transform.position, self.transform.enabled)
    }
}

static_assertions::assert_impl_all!(MeshBuilder: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Vec2, mat4_from_translation};
    use rstest::rstest;

    fn begin(layout: Arc<VertexLayout>, topology: PrimitiveTopology) -> MeshBuilder {
        let mut b = MeshBuilder::new();
        b.begin(layout, topology).unwrap();
        b.part("test", topology).unwrap();
        b
    }

    #[test]
    fn test_state_machine() {
        let mut b = MeshBuilder::new();
        assert_eq!(b.end().unwrap_err(), MeshError::NotBuilding);
        assert_eq!(
            b.vertex(&VertexInfo::new()).unwrap_err(),
            MeshError::NotBuilding
        );
        assert_eq!(
            b.part("p", PrimitiveTopology::TriangleList).unwrap_err(),
            MeshError::NotBuilding
        );

        b.begin(VertexLayout::position_only(), PrimitiveTopology::TriangleList)
            .unwrap();
        assert_eq!(
            b.begin(VertexLayout::position_only(), PrimitiveTopology::TriangleList),
            Err(MeshError::AlreadyBuilding)
        );
        b.end().unwrap();
        assert!(!b.is_building());
        b.begin(VertexLayout::position_only(), PrimitiveTopology::TriangleList)
            .unwrap();
    }

    #[test]
    fn test_begin_requires_position() {
        let mut b = MeshBuilder::new();
        let err = b.begin_usage(VertexUsage::NORMAL, PrimitiveTopology::TriangleList);
        assert_eq!(err, Err(MeshError::MissingPosition));
        assert!(!b.is_building());
    }

    #[test]
    fn test_vertex_round_trip() {
        let mut b = begin(VertexLayout::position_normal_uv(), PrimitiveTopology::PointList);
        assert_eq!(b.last_index(), None);
        for k in 1..=5u32 {
            let p = Vec3::new(k as f32, 0.0, 0.0);
            let idx = b.vertex(&VertexInfo::new().with_position(p)).unwrap();
            assert_eq!(idx, k - 1);
            assert_eq!(b.last_index(), Some(k - 1));
        }
        let built = b.end().unwrap();
        assert_eq!(built.mesh.vertices().len(), 5 * 8);
        assert_eq!(built.mesh.position(4), Some(Vec3::new(5.0, 0.0, 0.0)));
    }

    #[test]
    fn test_unset_fields_are_zeroed() {
        let mut b = begin(VertexLayout::position_normal_uv(), PrimitiveTopology::PointList);
        b.vertex(&VertexInfo::pnu(Vec3::x(), Vec3::y(), Vec2::new(0.25, 0.75)))
            .unwrap();
        b.vertex(&VertexInfo::new().with_position(Vec3::z())).unwrap();
        let built = b.end().unwrap();
        assert_eq!(
            built.mesh.vertices(),
            &[
                1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.25, 0.75, //
                0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0,
            ]
        );
    }

    #[test]
    fn test_default_color() {
        let mut b = begin(VertexLayout::position_color(), PrimitiveTopology::PointList);
        b.set_color(Some(Color::RED));
        b.vertex(&VertexInfo::new().with_position(Vec3::zeros())).unwrap();
        b.vertex(&VertexInfo::new().with_position(Vec3::zeros()).with_color(Color::BLUE))
            .unwrap();
        // Opening a part resets the default color.
        b.part("next", PrimitiveTopology::PointList).unwrap();
        b.vertex(&VertexInfo::new().with_position(Vec3::zeros())).unwrap();
        let built = b.end().unwrap();
        let v = built.mesh.vertices();
        assert_eq!(&v[3..7], &Color::RED.to_array());
        assert_eq!(&v[10..14], &Color::BLUE.to_array());
        assert_eq!(&v[17..21], &[0.0; 4]);
    }

    #[test]
    fn test_packed_color() {
        let mut b = begin(
            VertexLayout::from_usage(VertexUsage::POSITION | VertexUsage::COLOR_PACKED),
            PrimitiveTopology::PointList,
        );
        b.vertex(&VertexInfo::new().with_position(Vec3::zeros()).with_color(Color::GREEN))
            .unwrap();
        let built = b.end().unwrap();
        assert_eq!(
            built.mesh.vertices()[3].to_bits(),
            Color::GREEN.to_packed_float().to_bits()
        );
    }

    #[test]
    fn test_vertex_transform() {
        let mut b = begin(VertexLayout::position_normal(), PrimitiveTopology::PointList);
        let scale = Mat4::new_nonuniform_scaling(&Vec3::new(2.0, 1.0, 1.0));
        b.set_vertex_transform(Some(mat4_from_translation(Vec3::y()) * scale))
            .unwrap();
        b.vertex(&VertexInfo::new().with_position(Vec3::x()).with_normal(Vec3::new(1.0, 1.0, 0.0)))
            .unwrap();

        b.set_vertex_transform_enabled(false);
        assert_eq!(b.vertex_transform(), None);
        b.vertex(&VertexInfo::new().with_position(Vec3::x())).unwrap();

        let built = b.end().unwrap();
        let v = built.mesh.vertices();
        assert_eq!(&v[0..3], &[2.0, 1.0, 0.0]);
        let n = Vec3::new(v[3], v[4], v[5]);
        let expected = Vec3::new(0.5, 1.0, 0.0).normalize();
        assert!((n - expected).norm() < 1e-5);
        assert_eq!(&v[6..9], &[1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_singular_transform_rejected() {
        let mut b = begin(VertexLayout::position_only(), PrimitiveTopology::PointList);
        assert_eq!(
            b.set_vertex_transform(Some(Mat4::zeros())),
            Err(MeshError::SingularTransform)
        );
        assert!(!b.is_vertex_transform_enabled());
    }

    #[test]
    fn test_parts_are_contiguous() {
        let mut b = MeshBuilder::new();
        b.begin(VertexLayout::position_only(), PrimitiveTopology::TriangleList)
            .unwrap();
        let a = b.part("a", PrimitiveTopology::TriangleList).unwrap();
        b.box_sized(1.0, 1.0, 1.0).unwrap();
        assert_eq!(b.part_range(a), Some((0, 36)));
        let l = b.part("b", PrimitiveTopology::LineList).unwrap();
        b.box_sized(1.0, 1.0, 1.0).unwrap();
        let built = b.end().unwrap();

        let pa = built.part(a).unwrap();
        let pb = built.part(l).unwrap();
        assert_eq!((pa.offset, pa.size), (0, 36));
        assert_eq!((pb.offset, pb.size), (36, 24));
        assert_eq!(pb.topology, PrimitiveTopology::LineList);
        assert!(Arc::ptr_eq(&pa.mesh, &pb.mesh));
        assert_eq!(built.mesh.vertex_count(), 16);
    }

    #[rstest]
    #[case(PrimitiveTopology::PointList, 4)]
    #[case(PrimitiveTopology::LineList, 8)]
    #[case(PrimitiveTopology::TriangleList, 6)]
    fn test_rect_indices(#[case] topology: PrimitiveTopology, #[case] expected: usize) {
        let mut b = begin(VertexLayout::position_normal_uv(), topology);
        b.rect_normal(
            Vec3::zeros(),
            Vec3::x(),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::y(),
            Vec3::z(),
        )
        .unwrap();
        assert_eq!(b.vertex_count(), 4);
        assert_eq!(b.index_count(), expected);
    }

    #[rstest]
    #[case(PrimitiveTopology::TriangleList, 36)]
    #[case(PrimitiveTopology::LineList, 24)]
    #[case(PrimitiveTopology::PointList, 8)]
    fn test_box_indices(#[case] topology: PrimitiveTopology, #[case] expected: usize) {
        let mut b = begin(VertexLayout::position_only(), topology);
        b.box_sized(2.0, 3.0, 4.0).unwrap();
        assert_eq!(b.vertex_count(), 8);
        assert_eq!(b.index_count(), expected);
        let built = b.end().unwrap();
        assert_eq!(built.parts[0].half_extents, Vec3::new(1.0, 1.5, 2.0));
    }

    #[test]
    fn test_box_with_normals_has_face_vertices() {
        let mut b = begin(VertexLayout::position_normal(), PrimitiveTopology::TriangleList);
        b.box_sized(1.0, 1.0, 1.0).unwrap();
        assert_eq!(b.vertex_count(), 24);
        assert_eq!(b.index_count(), 36);
        let built = b.end().unwrap();
        let v = built.mesh.vertices();
        // Every face normal points away from the center.
        for i in 0..24 {
            let p = Vec3::new(v[i * 6], v[i * 6 + 1], v[i * 6 + 2]);
            let n = Vec3::new(v[i * 6 + 3], v[i * 6 + 4], v[i * 6 + 5]);
            assert!(p.dot(&n) > 0.0);
        }
    }

    #[test]
    fn test_patch() {
        let mut b = begin(VertexLayout::position_normal_uv(), PrimitiveTopology::TriangleList);
        let corners = [Vec3::zeros(), Vec3::x(), Vec3::new(1.0, 0.0, 1.0), Vec3::z()];
        b.patch(corners, Vec3::y(), 3, 2).unwrap();
        assert_eq!(b.vertex_count(), 12);
        assert_eq!(b.index_count(), 6 * 6);

        assert!(matches!(
            b.patch(corners, Vec3::y(), 0, 2),
            Err(MeshError::InvalidDivisions { name: "divisions_u", .. })
        ));
        assert_eq!(b.vertex_count(), 12);
    }

    #[test]
    fn test_uv_range_applies_to_rect() {
        let mut b = begin(VertexLayout::position_normal_uv(), PrimitiveTopology::TriangleList);
        b.set_uv_range_region(TextureRegion::new(0.25, 0.5, 0.75, 1.0));
        b.rect_normal(Vec3::zeros(), Vec3::x(), Vec3::new(1.0, 1.0, 0.0), Vec3::y(), Vec3::z())
            .unwrap();
        let built = b.end().unwrap();
        let v = built.mesh.vertices();
        // c00 gets (u, v2), c11 gets (u2, v).
        assert_eq!(&v[6..8], &[0.25, 1.0]);
        assert_eq!(&v[22..24], &[0.75, 0.5]);
    }

    #[test]
    fn test_circle_fan() {
        let mut b = begin(VertexLayout::position_normal_uv(), PrimitiveTopology::TriangleList);
        b.circle(1.0, 8, Vec3::zeros(), Vec3::y()).unwrap();
        assert_eq!(b.vertex_count(), 10);
        assert_eq!(b.index_count(), 24);
    }

    #[test]
    fn test_ellipse_band() {
        let mut b = begin(VertexLayout::position_normal_uv(), PrimitiveTopology::TriangleList);
        b.ellipse(&Ellipse::new(2.0, 2.0, 6).with_inner(1.0, 1.0)).unwrap();
        assert_eq!(b.vertex_count(), 1 + 2 * 7);
        assert_eq!(b.index_count(), 6 * 6);
    }

    #[test]
    fn test_ellipse_outline_requires_lines() {
        let outline = Ellipse::new(2.0, 2.0, 6).with_inner(2.0, 2.0);

        let mut b = begin(VertexLayout::position_normal_uv(), PrimitiveTopology::TriangleList);
        assert!(matches!(
            b.ellipse(&outline),
            Err(MeshError::IncorrectTopology { .. })
        ));
        assert_eq!(b.vertex_count(), 0);

        let mut b = begin(VertexLayout::position_normal_uv(), PrimitiveTopology::LineList);
        b.ellipse(&outline).unwrap();
        assert_eq!(b.vertex_count(), 8);
        assert_eq!(b.index_count(), 12);
    }

    #[test]
    fn test_line_requires_line_topology() {
        let mut b = begin(VertexLayout::position_only(), PrimitiveTopology::TriangleList);
        let a = b.vertex(&VertexInfo::new().with_position(Vec3::zeros())).unwrap();
        let c = b.vertex(&VertexInfo::new().with_position(Vec3::x())).unwrap();
        assert!(b.line(a, c).is_err());
        b.triangle(a, c, a).unwrap();
        assert_eq!(b.index_count(), 3);
    }

    #[test]
    fn test_cylinder_and_cone_counts() {
        let mut b = begin(VertexLayout::position_normal_uv(), PrimitiveTopology::TriangleList);
        b.cylinder(&Cylinder::new(1.0, 2.0, 1.0, 8)).unwrap();
        // side rim pairs plus two capped fans
        assert_eq!(b.vertex_count(), 2 * 9 + 2 * 10);
        assert_eq!(b.index_count(), 8 * 6 + 2 * 8 * 3);

        let mut b = begin(VertexLayout::position_normal_uv(), PrimitiveTopology::TriangleList);
        b.cylinder(&Cylinder::new(1.0, 2.0, 1.0, 8).with_close(false))
            .unwrap();
        assert_eq!(b.vertex_count(), 18);

        let mut b = begin(VertexLayout::position_normal_uv(), PrimitiveTopology::TriangleList);
        b.cone(&Cone::new(1.0, 2.0, 1.0, 8)).unwrap();
        assert_eq!(b.vertex_count(), 1 + 9 + 10);
        assert_eq!(b.index_count(), 8 * 3 * 2);
    }

    #[test]
    fn test_uv_sphere_grid() {
        let mut b = begin(VertexLayout::tangent_space(), PrimitiveTopology::TriangleList);
        b.sphere(&UvSphere::new(2.0, 2.0, 2.0, 8, 4)).unwrap();
        assert_eq!(b.vertex_count(), 9 * 5);
        assert_eq!(b.index_count(), 8 * 4 * 6);
        let built = b.end().unwrap();
        assert!((built.parts[0].radius - 3.0f32.sqrt()).abs() < 1e-4);
    }

    #[test]
    fn test_capsule() {
        let mut b = begin(VertexLayout::position_normal_uv(), PrimitiveTopology::TriangleList);
        assert_eq!(
            b.capsule(1.0, 1.5, 8),
            Err(MeshError::CapsuleTooShort {
                radius: 1.0,
                height: 1.5
            })
        );
        assert_eq!(b.vertex_count(), 0);

        b.capsule(0.5, 3.0, 8).unwrap();
        assert_eq!(b.vertex_count(), 18 + 2 * 81);
        assert!(b.scratch().is_empty());
        let built = b.end().unwrap();
        assert!((built.parts[0].half_extents.y - 1.5).abs() < 1e-5);
    }

    #[test]
    fn test_arrow_drains_scratch_and_restores_transform() {
        let mut b = begin(VertexLayout::position_normal_uv(), PrimitiveTopology::TriangleList);
        let user = mat4_from_translation(Vec3::new(0.0, 0.0, 5.0));
        b.set_vertex_transform(Some(user)).unwrap();
        b.arrow(&Arrow::new(Vec3::zeros(), Vec3::new(2.0, 0.0, 0.0)))
            .unwrap();
        assert!(b.scratch().is_empty());
        assert!(b.scratch().capacity().0 >= 3);
        assert_eq!(b.vertex_transform(), Some(user));

        let built = b.end().unwrap();
        let part = &built.parts[0];
        // Arrow lies along +X, shifted by the caller's transform.
        assert!((part.center.z - 5.0).abs() < 1e-4);
        assert!((part.center.x - 1.0).abs() < 1e-4);
        assert!((part.half_extents.x - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_ring() {
        let mut b = begin(VertexLayout::position_normal_uv(), PrimitiveTopology::TriangleList);
        b.ring(&Ring::new(1.0, 2.0, 16)).unwrap();
        assert_eq!(b.vertex_count(), 34);
        assert_eq!(b.index_count(), 16 * 6);
        assert!(b.ring(&Ring::new(2.0, 1.0, 16)).is_err());
    }

    #[test]
    fn test_icosphere_window() {
        let mut b = begin(VertexLayout::tangent_space(), PrimitiveTopology::TriangleList);
        b.icosphere(1.0, 1, false, false, 10, 30).unwrap();
        assert_eq!(b.vertex_count(), 90);
        b.icosphere(1.0, 1, false, false, 70, usize::MAX).unwrap();
        assert_eq!(b.vertex_count(), 90 + 30);
        assert_eq!(b.index_count(), 120);
    }

    #[test]
    fn test_octahedron_divisions_rejected_before_writing() {
        let mut b = begin(VertexLayout::position_normal(), PrimitiveTopology::TriangleList);
        assert!(b.octahedron_sphere(1.0, 7, false, false, 0, usize::MAX).is_err());
        assert_eq!(b.vertex_count(), 0);
    }

    #[test]
    fn test_too_many_vertices() {
        let mut b = MeshBuilder::with_config(BuilderConfig::default().with_max_vertices(4));
        b.begin(VertexLayout::position_only(), PrimitiveTopology::PointList)
            .unwrap();
        for _ in 0..4 {
            b.vertex(&VertexInfo::new().with_position(Vec3::zeros())).unwrap();
        }
        assert_eq!(
            b.vertex(&VertexInfo::new()),
            Err(MeshError::TooManyVertices { limit: 4 })
        );
        assert_eq!(b.vertex_count(), 4);
    }

    #[test]
    fn test_raw_vertices() {
        let mut b = begin(VertexLayout::position_only(), PrimitiveTopology::PointList);
        assert_eq!(b.vertices(&[0.0; 9]), Ok(Some(2)));
        assert_eq!(
            b.vertices(&[0.0; 4]),
            Err(MeshError::StrideMismatch { len: 4, stride: 3 })
        );
    }

    #[test]
    fn test_arrow_keeps_disabled_transform() {
        let mut b = begin(VertexLayout::position_normal(), PrimitiveTopology::TriangleList);
        let user = mat4_from_translation(Vec3::new(0.0, 0.0, 5.0));
        b.set_vertex_transform(Some(user)).unwrap();
        b.set_vertex_transform_enabled(false);
        b.arrow(&Arrow::new(Vec3::zeros(), Vec3::new(2.0, 0.0, 0.0)))
            .unwrap();

        assert!(!b.is_vertex_transform_enabled());
        assert_eq!(b.stored_vertex_transform(), (user, false));
        b.set_vertex_transform_enabled(true);
        assert_eq!(b.vertex_transform(), Some(user));

        // Drawn without the disabled transform.
        let built = b.end().unwrap();
        assert!(built.parts[0].center.z.abs() < 1e-4);
    }

    #[test]
    fn test_shape_over_vertex_limit_writes_nothing() {
        let mut b = MeshBuilder::with_config(BuilderConfig::default().with_max_vertices(5));
        b.begin(VertexLayout::position_only(), PrimitiveTopology::TriangleList)
            .unwrap();
        assert_eq!(
            b.box_sized(1.0, 1.0, 1.0),
            Err(MeshError::TooManyVertices { limit: 5 })
        );
        assert_eq!(b.vertex_count(), 0);
        assert_eq!(b.index_count(), 0);

        // Through the free emitter the up-front check alone keeps the sink clean.
        assert!(shapes::box_sized(&mut b, 1.0, 1.0, 1.0, false).is_err());
        assert_eq!(b.vertex_count(), 0);

        b.rect_normal(Vec3::zeros(), Vec3::x(), Vec3::new(1.0, 1.0, 0.0), Vec3::y(), Vec3::z())
            .unwrap();
        let built = b.end().unwrap();
        assert_eq!(built.mesh.vertex_count(), 4);
        assert_eq!(built.mesh.index_count(), 6);
    }

    #[test]
    fn test_composite_over_vertex_limit_rolls_back() {
        // The 12 stem side vertices fit, the next piece of the arrow does not.
        let mut b = MeshBuilder::with_config(BuilderConfig::default().with_max_vertices(15));
        b.begin(VertexLayout::position_normal(), PrimitiveTopology::TriangleList)
            .unwrap();
        b.part("arrow", PrimitiveTopology::TriangleList).unwrap();
        assert_eq!(
            b.arrow(&Arrow::new(Vec3::zeros(), Vec3::y()).with_divisions(5)),
            Err(MeshError::TooManyVertices { limit: 15 })
        );
        assert_eq!(b.vertex_count(), 0);
        assert_eq!(b.index_count(), 0);
        assert!(b.scratch().is_empty());
        assert!(!b.is_vertex_transform_enabled());

        assert!(b.capsule(0.5, 3.0, 8).is_err());
        assert_eq!(b.vertex_count(), 0);

        let built = b.end().unwrap();
        assert_eq!(built.parts[0].size, 0);
    }
}
