//! Immutable mesh data produced by [`MeshBuilder`](super::MeshBuilder).
//!
//! This module provides:
//! - [`PrimitiveTopology`] - How indices are assembled into primitives
//! - [`Mesh`] - Interleaved `f32` vertices plus 32-bit indices
//! - [`MeshPart`] - A named draw range within one mesh's index buffer

use std::sync::Arc;

use crate::error::{MeshError, MeshResult};
use crate::math::Vec3;

use super::layout::{VertexAttributeSemantic, VertexLayout};

/// Primitive topology describing how indices are assembled into primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PrimitiveTopology {
    /// Each index is a separate point.
    PointList,
    /// Every two indices form a line.
    LineList,
    /// Every three indices form a triangle.
    #[default]
    TriangleList,
}

impl PrimitiveTopology {
    /// Number of indices per primitive.
    pub fn indices_per_primitive(&self) -> u32 {
        match self {
            Self::PointList => 1,
            Self::LineList => 2,
            Self::TriangleList => 3,
        }
    }
}

/// A finished mesh: one vertex layout, interleaved vertices, 32-bit indices.
///
/// Meshes are immutable once built and shared through `Arc` by the
/// [`MeshPart`]s that draw from them.
#[derive(Debug, Clone)]
pub struct Mesh {
    layout: Arc<VertexLayout>,
    vertices: Vec<f32>,
    indices: Vec<u32>,
    label: Option<String>,
}

impl Mesh {
    /// Create a mesh from raw interleaved vertices and indices.
    ///
    /// `vertices.len()` is expected to be a multiple of the layout stride.
    pub fn new(layout: Arc<VertexLayout>, vertices: Vec<f32>, indices: Vec<u32>) -> Self {
        debug_assert!(layout.stride() == 0 || vertices.len() % layout.stride() == 0);
        Self {
            layout,
            vertices,
            indices,
            label: None,
        }
    }

    /// Set a debug label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Get the vertex layout.
    pub fn layout(&self) -> &Arc<VertexLayout> {
        &self.layout
    }

    /// Interleaved vertex floats.
    pub fn vertices(&self) -> &[f32] {
        &self.vertices
    }

    /// Index buffer.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Number of whole vertices.
    pub fn vertex_count(&self) -> usize {
        match self.layout.stride() {
            0 => 0,
            stride => self.vertices.len() / stride,
        }
    }

    /// Number of indices.
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Vertex data as raw bytes for GPU upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Index data as raw bytes for GPU upload.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Get the debug label.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Position of a vertex, if the layout has one and the index is in range.
    pub fn position(&self, index: u32) -> Option<Vec3> {
        let offset = self.layout.offset_of(VertexAttributeSemantic::Position)?;
        let start = index as usize * self.layout.stride() + offset;
        let p = self.vertices.get(start..start + 3)?;
        Some(Vec3::new(p[0], p[1], p[2]))
    }

    /// Axis-aligned bounds of the vertices referenced by `indices[offset..offset + size]`.
    ///
    /// Returns `None` for an empty or out-of-range window.
    pub fn bounds(&self, offset: usize, size: usize) -> Option<(Vec3, Vec3)> {
        let window = self.indices.get(offset..offset.checked_add(size)?)?;
        let mut positions = window.iter().filter_map(|&i| self.position(i));
        let first = positions.next()?;
        Some(positions.fold((first, first), |(min, max), p| {
            (min.inf(&p), max.sup(&p))
        }))
    }
}

/// A draw range inside a [`Mesh`].
///
/// The window `mesh.indices()[offset..offset + size]` is drawn with
/// `topology`. Local bounds are computed from the referenced positions when
/// the part is finalized.
#[derive(Debug, Clone)]
pub struct MeshPart {
    /// Part identifier.
    pub id: String,
    /// How the index window is assembled into primitives.
    pub topology: PrimitiveTopology,
    /// First index of the window.
    pub offset: usize,
    /// Number of indices in the window.
    pub size: usize,
    /// Mesh the window indexes into.
    pub mesh: Arc<Mesh>,
    /// Center of the local bounding box.
    pub center: Vec3,
    /// Half size of the local bounding box.
    pub half_extents: Vec3,
    /// Radius of the sphere around `center` enclosing the bounding box.
    pub radius: f32,
}

impl MeshPart {
    /// Create a part over an index window and compute its bounds.
    ///
    /// Fails with [`MeshError::PartOutOfRange`] when the window does not fit
    /// inside the mesh's index buffer.
    pub fn new(
        id: impl Into<String>,
        topology: PrimitiveTopology,
        mesh: Arc<Mesh>,
        offset: usize,
        size: usize,
    ) -> MeshResult<Self> {
        let index_count = mesh.index_count();
        if offset.checked_add(size).is_none_or(|end| end > index_count) {
            return Err(MeshError::PartOutOfRange {
                offset,
                size,
                index_count,
            });
        }
        let mut part = Self {
            id: id.into(),
            topology,
            offset,
            size,
            mesh,
            center: Vec3::zeros(),
            half_extents: Vec3::zeros(),
            radius: 0.0,
        };
        part.update_bounds();
        Ok(part)
    }

    /// Recompute `center`, `half_extents` and `radius` from the mesh.
    pub fn update_bounds(&mut self) {
        match self.mesh.bounds(self.offset, self.size) {
            Some((min, max)) => {
                self.center = (min + max) * 0.5;
                self.half_extents = (max - min) * 0.5;
                self.radius = self.half_extents.norm();
            }
            None => {
                self.center = Vec3::zeros();
                self.half_extents = Vec3::zeros();
                self.radius = 0.0;
            }
        }
    }

    /// Index window this part draws.
    ///
    /// Empty if `offset` or `size` were changed to a window outside the mesh.
    pub fn indices(&self) -> &[u32] {
        self.offset
            .checked_add(self.size)
            .and_then(|end| self.mesh.indices().get(self.offset..end))
            .unwrap_or(&[])
    }

    /// Number of primitives in the window.
    pub fn primitive_count(&self) -> usize {
        self.size / self.topology.indices_per_primitive() as usize
    }
}

static_assertions::assert_impl_all!(Mesh: Send, Sync);
static_assertions::assert_impl_all!(MeshPart: Send, Sync);
