//! # StarMesh Graphics
//!
//! Render batching for models assembled with `starmesh-core`.
//!
//! ## Overview
//!
//! This crate provides:
//! - [`Camera`] - Perspective camera with view and projection matrices
//! - [`Renderable`] - One pooled draw record, produced by a [`RenderableProvider`]
//! - [`ModelInstance`] - A shared [`Model`](starmesh_core::model::Model) placed in the world
//! - [`Shader`] and [`ShaderProvider`] - Draw callbacks and how they are chosen
//! - [`RenderSorter`] - Draw ordering, front-to-back for opaque geometry by default
//! - [`RenderBatch`] - Collects renderables and flushes them in shader spans
//!
//! The crate issues no GPU calls itself: drawing is whatever the
//! [`Shader`] implementations do.

pub mod batch;
pub mod camera;
pub mod environment;
pub mod error;
pub mod profiling;
pub mod renderable;
pub mod shader;
pub mod sort;

// Re-export main types for convenience
pub use batch::{BatchStats, RenderBatch};
pub use camera::Camera;
pub use environment::{DirectionalLight, Environment};
pub use error::{BatchError, BatchResult};
pub use renderable::{ModelInstance, Renderable, RenderableProvider};
pub use shader::{Shader, ShaderHandle, ShaderLibrary, ShaderProvider};
pub use sort::{BackToFrontSorter, DefaultRenderSorter, RenderSorter};

/// Graphics library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the graphics subsystem.
pub fn init() {
    starmesh_core::init();
    log::info!("StarMesh Graphics v{} initialized", VERSION);
}
