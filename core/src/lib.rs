//! # StarMesh Core
//!
//! Procedural mesh construction with 32-bit indices: vertex layouts, the
//! incremental [`mesh::MeshBuilder`], parametric shape emitters, subdivision
//! spheres and the [`model::ModelBuilder`] assembler.

pub mod color;
pub mod error;
pub mod material;
pub mod math;
pub mod mesh;
pub mod model;
pub mod pool;
pub mod profiling;
pub mod texture;

/// Core library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn init() {
    log::info!("StarMesh Core v{} initialized", VERSION);
}
