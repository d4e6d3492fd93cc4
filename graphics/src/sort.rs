//! Draw ordering strategies.

use std::cmp::Ordering;

use crate::camera::Camera;
use crate::renderable::Renderable;

/// Orders a frame's renderables before they are drawn.
pub trait RenderSorter {
    fn sort(&mut self, camera: &Camera, renderables: &mut [Renderable]);
}

/// Opaque geometry first, nearest first; then blended geometry, farthest
/// first.
///
/// Distances are measured from the camera to each mesh part's center in
/// world space. Equal distances compare equal.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultRenderSorter;

impl DefaultRenderSorter {
    /// The ordering used by [`sort`](RenderSorter::sort).
    pub fn compare(camera: &Camera, a: &Renderable, b: &Renderable) -> Ordering {
        match (a.is_blended(), b.is_blended()) {
            (false, true) => Ordering::Less,
            (true, false) => Ordering::Greater,
            (blended, _) => {
                let da = camera.distance_squared(&a.world_center());
                let db = camera.distance_squared(&b.world_center());
                if blended {
                    db.total_cmp(&da)
                } else {
                    da.total_cmp(&db)
                }
            }
        }
    }
}

impl RenderSorter for DefaultRenderSorter {
    fn sort(&mut self, camera: &Camera, renderables: &mut [Renderable]) {
        renderables.sort_by(|a, b| Self::compare(camera, a, b));
    }
}

/// Everything farthest first, ignoring blending.
#[derive(Debug, Clone, Copy, Default)]
pub struct BackToFrontSorter;

impl RenderSorter for BackToFrontSorter {
    fn sort(&mut self, camera: &Camera, renderables: &mut [Renderable]) {
        renderables.sort_by(|a, b| {
            let da = camera.distance_squared(&a.world_center());
            let db = camera.distance_squared(&b.world_center());
            db.total_cmp(&da)
        });
    }
}
