//! Models assembled from mesh parts.
//!
//! - [`Node`] / [`NodePart`] - Transform hierarchy with material-bound parts
//! - [`Model`] - Nodes plus deduplicated material, mesh and part registries
//! - [`ModelBuilder`] - Assembler that packs parts into shared meshes, with
//!   one-call `create_*` constructors for common shapes

mod builder;
mod data;
mod node;
mod part;
mod shapes;

pub use builder::{AssemblerConfig, ModelBuilder};
pub use data::{Model, rebuild_references};
pub use node::{Node, NodePart};
pub use part::PartBuilder;
