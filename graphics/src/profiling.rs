//! Profiling support via Tracy.
//!
//! Re-exports the CPU profiling macros of [`starmesh_core::profiling`].
//! Enabling this crate's `profiling` feature enables the core one:
//!
//! ```toml
//! [dependencies]
//! starmesh-graphics = { version = "0.1", features = ["profiling"] }
//! ```
//!
//! [`RenderBatch::flush`](crate::RenderBatch::flush) records a
//! `render_batch_flush` span and plots the number of renderables drawn per
//! flush as `batch_renderables`.

pub use starmesh_core::profiling::*;
