//! Parametric shape emitters.
//!
//! Every emitter is a free function over a [`VertexSink`](super::VertexSink)
//! that walks a parametric domain and alternates `vertex()` calls with
//! `rect()`/`triangle()`/`line()` connectivity. Parameters live in small
//! `Copy` structs with `with_*` setters:
//!
//! - [`rect`], [`patch`], [`box_corners`] and friends
//! - [`Ellipse`] (circles, fans, outlines, bands)
//! - [`Cylinder`], [`Cone`], [`capsule`]
//! - [`UvSphere`]
//! - [`Arrow`]
//! - [`Ring`]
//!
//! Division counts of zero and topology mismatches are rejected before the
//! first vertex is written.

mod arrow;
mod cylinder;
mod ellipse;
mod rect;
mod ring;
mod uv_sphere;

pub use arrow::{Arrow, arrow};
pub use cylinder::{Cone, Cylinder, capsule, cone, cylinder};
pub use ellipse::{Ellipse, ellipse};
pub use rect::{
    BoxCorners, box_at, box_corners, box_sized, box_transformed, box_vertices, patch,
    patch_vertices, rect, rect_vertices,
};
pub use ring::{Ring, ring};
pub use uv_sphere::{UvSphere, uv_sphere};
