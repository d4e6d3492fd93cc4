use crate::math::Vec3;

use super::SubdivisionSphere;

/// Sphere refined from a regular icosahedron.
///
/// Produces the most uniform triangles of the two generators. Divisions are
/// limited to `[0, 10]` (about 21 million faces).
#[derive(Debug, Clone, Copy, Default)]
pub struct IcoSphere;

impl SubdivisionSphere for IcoSphere {
    const NAME: &'static str = "icosphere";
    const MAX_DIVISIONS: u32 = 10;

    fn seed() -> (Vec<Vec3>, Vec<[u32; 3]>) {
        let t = (1.0 + 5.0f32.sqrt()) / 2.0;
        let vertices = vec![
            Vec3::new(-1.0, t, 0.0),
            Vec3::new(1.0, t, 0.0),
            Vec3::new(-1.0, -t, 0.0),
            Vec3::new(1.0, -t, 0.0),
            Vec3::new(0.0, -1.0, t),
            Vec3::new(0.0, 1.0, t),
            Vec3::new(0.0, -1.0, -t),
            Vec3::new(0.0, 1.0, -t),
            Vec3::new(t, 0.0, -1.0),
            Vec3::new(t, 0.0, 1.0),
            Vec3::new(-t, 0.0, -1.0),
            Vec3::new(-t, 0.0, 1.0),
        ];
        #[rustfmt::skip]
        let faces = vec![
            // around vertex 0
            [0, 11, 5], [0, 5, 1], [0, 1, 7], [0, 7, 10], [0, 10, 11],
            // adjacent
            [1, 5, 9], [5, 11, 4], [11, 10, 2], [10, 7, 6], [7, 1, 8],
            // around vertex 3
            [3, 9, 4], [3, 4, 2], [3, 2, 6], [3, 6, 8], [3, 8, 9],
            // adjacent
            [4, 9, 5], [2, 4, 11], [6, 2, 10], [8, 6, 7], [9, 8, 1],
        ];
        (vertices, faces)
    }
}
