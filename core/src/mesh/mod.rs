//! Procedural mesh construction with 32-bit indices.
//!
//! - [`VertexLayout`] / [`VertexUsage`] - Interleaved per-vertex attributes
//! - [`MeshBuilder`] - Vertex/index accumulation split into [`MeshPart`]s
//! - [`VertexSink`] - The capability shape emitters write into
//! - [`shapes`] - Boxes, patches, ellipses, cylinders, cones, capsules,
//!   UV spheres, arrows and rings
//! - [`spheres`] - Icosphere and octahedron-sphere subdivision
//! - [`obj`] - Text dump of generated spheres

mod builder;
mod data;
mod layout;
pub mod obj;
mod scratch;
pub mod shapes;
mod sink;
pub mod spheres;
mod vertex;

pub use builder::{BuilderConfig, BuiltMesh, MeshBuilder, PartHandle};
pub use data::{Mesh, MeshPart, PrimitiveTopology};
pub use layout::{VertexAttribute, VertexAttributeSemantic, VertexLayout, VertexUsage};
pub use scratch::{Mat4Slot, ScratchArena, ScratchScope, Vec3Slot};
pub use sink::VertexSink;
pub use vertex::VertexInfo;
