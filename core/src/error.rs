//! Mesh construction error types.

use thiserror::Error;

use crate::mesh::PrimitiveTopology;

/// Errors raised while building meshes and models.
///
/// Preconditions are checked before the offending call touches the vertex or
/// index buffers. Shape emitters also check the vertex limit for their whole
/// vertex count up front, and the shape methods of
/// [`MeshBuilder`](crate::mesh::MeshBuilder) remove anything a failed shape
/// wrote, so a builder that returned an error is still consistent.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeshError {
    /// `begin()` was called while a mesh is already being built.
    #[error("already building, call end() first")]
    AlreadyBuilding,
    /// A building operation was called before `begin()`.
    #[error("not building, call begin() first")]
    NotBuilding,
    /// The vertex layout has no position attribute.
    #[error("cannot build a mesh without a position attribute")]
    MissingPosition,
    /// The vertex layout failed validation.
    #[error("invalid vertex layout: {0}")]
    InvalidLayout(String),
    /// The shape does not support the active primitive topology.
    #[error("incorrect primitive topology {actual:?}, expected {expected}")]
    IncorrectTopology {
        /// Topology the builder is currently emitting.
        actual: PrimitiveTopology,
        /// Human-readable description of what the shape requires.
        expected: &'static str,
    },
    /// A division or recursion parameter is outside the valid range.
    #[error("{name} must be in [{min}, {max}], got {value}")]
    InvalidDivisions {
        /// Parameter name.
        name: &'static str,
        /// Value supplied by the caller.
        value: u32,
        /// Smallest accepted value.
        min: u32,
        /// Largest accepted value.
        max: u32,
    },
    /// A capsule was requested with height below twice its radius.
    #[error("capsule height {height} must be at least twice the radius {radius}")]
    CapsuleTooShort {
        /// Requested radius.
        radius: f32,
        /// Requested total height.
        height: f32,
    },
    /// A shape was requested with parameters that produce no valid geometry.
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(&'static str),
    /// A vertex transform without an inverse was supplied.
    #[error("vertex transform is not invertible")]
    SingularTransform,
    /// Raw vertex data is not a whole number of vertices.
    #[error("vertex data length {len} is not a multiple of the stride {stride}")]
    StrideMismatch {
        /// Number of floats supplied.
        len: usize,
        /// Floats per vertex.
        stride: usize,
    },
    /// A mesh part's index window does not fit inside its mesh.
    #[error("part window {offset}+{size} exceeds the {index_count} indices of its mesh")]
    PartOutOfRange {
        /// First index of the window.
        offset: usize,
        /// Number of indices in the window.
        size: usize,
        /// Indices available in the mesh.
        index_count: usize,
    },
    /// The next vertex would exceed the addressable range of the builder.
    #[error("too many vertices, limit is {limit}")]
    TooManyVertices {
        /// Configured vertex ceiling.
        limit: u32,
    },
}

/// Convenience alias for mesh building results.
pub type MeshResult<T> = Result<T, MeshError>;
