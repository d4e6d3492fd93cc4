use crate::math::Vec3;

use super::SubdivisionSphere;

/// Sphere refined from a regular octahedron.
///
/// The six seed vertices sit on the coordinate axes, so the poles and the
/// equator are always present. Divisions are limited to `[0, 6]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OctahedronSphere;

impl SubdivisionSphere for OctahedronSphere {
    const NAME: &'static str = "octahedron sphere";
    const MAX_DIVISIONS: u32 = 6;

    fn seed() -> (Vec<Vec3>, Vec<[u32; 3]>) {
        let vertices = vec![
            Vec3::x(),
            -Vec3::x(),
            Vec3::y(),
            -Vec3::y(),
            Vec3::z(),
            -Vec3::z(),
        ];
        #[rustfmt::skip]
        let faces = vec![
            [0, 2, 4], [0, 4, 3], [0, 3, 5], [0, 5, 2],
            [1, 4, 2], [1, 3, 4], [1, 5, 3], [1, 2, 5],
        ];
        (vertices, faces)
    }
}
