//! The vertex sink capability shape emitters write into.

use crate::error::{MeshError, MeshResult};
use crate::math::Mat4;
use crate::texture::TextureRegion;

use super::data::PrimitiveTopology;
use super::layout::{VertexAttributeSemantic, VertexLayout};
use super::vertex::VertexInfo;

/// Something that accepts vertices and indices under one layout and topology.
///
/// [`MeshBuilder`](super::MeshBuilder) is the main implementation. Shape
/// emitters in [`shapes`](super::shapes) and [`spheres`](super::spheres) only
/// talk to this trait, so new shapes can be added without touching the
/// builder.
pub trait VertexSink {
    /// Layout of the vertices being written.
    fn layout(&self) -> &VertexLayout;

    /// Topology of the part currently being written.
    fn topology(&self) -> PrimitiveTopology;

    /// Append one vertex and return its index.
    fn vertex(&mut self, info: &VertexInfo) -> MeshResult<u32>;

    /// Append raw indices.
    fn index(&mut self, indices: &[u32]) -> MeshResult<()>;

    /// Reserve room for `count` more vertices.
    fn ensure_vertices(&mut self, count: usize);

    /// Check that `count` more vertices fit, then reserve room for them.
    ///
    /// Emitters call this before writing, so a shape that would overflow
    /// the sink fails without touching it.
    fn reserve_vertices(&mut self, count: usize) -> MeshResult<()> {
        self.ensure_vertices(count);
        Ok(())
    }

    /// Reserve room for `count` more indices.
    fn ensure_indices(&mut self, count: usize);

    /// UV rectangle mapped onto `rect` and `patch` corners.
    fn uv_range(&self) -> TextureRegion;

    /// Active vertex transform, `None` when transformation is disabled.
    fn vertex_transform(&self) -> Option<Mat4>;

    /// Replace the vertex transform. `None` disables transformation.
    fn set_vertex_transform(&mut self, transform: Option<Mat4>) -> MeshResult<()>;

    /// Stored vertex transform and whether it is enabled.
    ///
    /// Unlike [`vertex_transform`](Self::vertex_transform) this also reports
    /// a matrix that is kept while disabled.
    fn stored_vertex_transform(&self) -> (Mat4, bool);

    /// Put back a state read with
    /// [`stored_vertex_transform`](Self::stored_vertex_transform).
    fn restore_vertex_transform(&mut self, matrix: Mat4, enabled: bool) -> MeshResult<()> {
        self.set_vertex_transform(Some(matrix))?;
        if !enabled {
            self.set_vertex_transform(None)?;
        }
        Ok(())
    }

    /// Whether the layout declares `semantic`.
    fn has(&self, semantic: VertexAttributeSemantic) -> bool {
        self.layout().has_semantic(semantic)
    }

    /// Reserve index room for `count` triangles under the current topology.
    fn ensure_triangle_indices(&mut self, count: usize) {
        let per = match self.topology() {
            PrimitiveTopology::LineList => 6,
            _ => 3,
        };
        self.ensure_indices(per * count);
    }

    /// Reserve index room for `count` rectangles under the current topology.
    fn ensure_rectangle_indices(&mut self, count: usize) {
        let per = match self.topology() {
            PrimitiveTopology::PointList => 4,
            PrimitiveTopology::LineList => 8,
            PrimitiveTopology::TriangleList => 6,
        };
        self.ensure_indices(per * count);
    }

    /// Emit a line between two existing vertices. Requires line topology.
    fn line(&mut self, a: u32, b: u32) -> MeshResult<()> {
        require_topology(self.topology(), PrimitiveTopology::LineList, "LineList")?;
        self.index(&[a, b])
    }

    /// Emit a triangle between three existing vertices.
    ///
    /// With line topology the three edges are emitted; with point topology
    /// the three corners.
    fn triangle(&mut self, a: u32, b: u32, c: u32) -> MeshResult<()> {
        match self.topology() {
            PrimitiveTopology::LineList => self.index(&[a, b, b, c, c, a]),
            PrimitiveTopology::TriangleList | PrimitiveTopology::PointList => {
                self.index(&[a, b, c])
            }
        }
    }

    /// Emit a quad over four existing vertices given in winding order.
    ///
    /// Triangles split along the `c00`-`c11` diagonal, lines trace the
    /// outline and points emit the four corners.
    fn rect(&mut self, c00: u32, c10: u32, c11: u32, c01: u32) -> MeshResult<()> {
        match self.topology() {
            PrimitiveTopology::TriangleList => self.index(&[c00, c10, c11, c11, c01, c00]),
            PrimitiveTopology::LineList => {
                self.index(&[c00, c10, c10, c11, c11, c01, c01, c00])
            }
            PrimitiveTopology::PointList => self.index(&[c00, c10, c11, c01]),
        }
    }
}

/// Fail with [`MeshError::IncorrectTopology`] unless `actual == expected`.
pub(crate) fn require_topology(
    actual: PrimitiveTopology,
    expected: PrimitiveTopology,
    name: &'static str,
) -> MeshResult<()> {
    if actual == expected {
        Ok(())
    } else {
        Err(MeshError::IncorrectTopology {
            actual,
            expected: name,
        })
    }
}

/// Fail with [`MeshError::InvalidDivisions`] unless `min <= value <= max`.
pub(crate) fn check_divisions(name: &'static str, value: u32, min: u32, max: u32) -> MeshResult<()> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(MeshError::InvalidDivisions {
            name,
            value,
            min,
            max,
        })
    }
}
