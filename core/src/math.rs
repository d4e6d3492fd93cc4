//! Math type aliases and helper functions.
//!
//! All geometry is single precision. Matrices are column-major and act on
//! column vectors, so `a * b` applies `b` first.

pub use nalgebra;

/// 2D vector (f32).
pub type Vec2 = nalgebra::Vector2<f32>;

/// 3D vector (f32).
pub type Vec3 = nalgebra::Vector3<f32>;

/// 4D vector (f32).
pub type Vec4 = nalgebra::Vector4<f32>;

/// 3x3 matrix (f32).
pub type Mat3 = nalgebra::Matrix3<f32>;

/// 4x4 matrix (f32).
pub type Mat4 = nalgebra::Matrix4<f32>;

/// Quaternion (f32). Stored as `[x, y, z, w]` in memory.
pub type Quat = nalgebra::Quaternion<f32>;

/// Identity quaternion.
pub fn quat_identity() -> Quat {
    Quat::identity()
}

/// Create a quaternion rotating `angle` radians around `axis`.
///
/// A zero axis yields the identity rotation.
pub fn quat_from_axis_angle(axis: Vec3, angle: f32) -> Quat {
    match nalgebra::Unit::try_new(axis, f32::EPSILON) {
        Some(axis) => nalgebra::UnitQuaternion::from_axis_angle(&axis, angle).into_inner(),
        None => Quat::identity(),
    }
}

/// Build a 4x4 TRS matrix from scale, rotation (quaternion), and translation.
///
/// The rotation is normalized first, so slightly drifted quaternions are fine.
pub fn mat4_from_scale_rotation_translation(scale: Vec3, rotation: Quat, translation: Vec3) -> Mat4 {
    let rotation = nalgebra::UnitQuaternion::from_quaternion(rotation);
    Mat4::new_translation(&translation)
        * rotation.to_homogeneous()
        * Mat4::new_nonuniform_scaling(&scale)
}

/// Build a translation-only 4x4 matrix.
pub fn mat4_from_translation(t: Vec3) -> Mat4 {
    Mat4::new_translation(&t)
}

/// Build a scale-only 4x4 matrix.
pub fn mat4_from_scale(s: Vec3) -> Mat4 {
    Mat4::new_nonuniform_scaling(&s)
}

/// Build an affine matrix whose columns are the given basis vectors and translation.
pub fn mat4_from_basis(x_axis: Vec3, y_axis: Vec3, z_axis: Vec3, translation: Vec3) -> Mat4 {
    #[rustfmt::skip]
    let result = Mat4::new(
        x_axis.x, y_axis.x, z_axis.x, translation.x,
        x_axis.y, y_axis.y, z_axis.y, translation.y,
        x_axis.z, y_axis.z, z_axis.z, translation.z,
        0.0,      0.0,      0.0,      1.0,
    );
    result
}

/// Extract the translation column of an affine matrix.
pub fn mat4_translation(m: &Mat4) -> Vec3 {
    Vec3::new(m[(0, 3)], m[(1, 3)], m[(2, 3)])
}

/// Transform a point (w = 1) by an affine matrix.
pub fn transform_point(m: &Mat4, p: &Vec3) -> Vec3 {
    m.transform_point(&nalgebra::Point3::from(*p)).coords
}

/// Transform a direction (w = 0) by the upper 3x3 block of a matrix.
///
/// The bottom row is ignored, so this is safe for inverse-transposes of
/// matrices with a translation.
pub fn transform_vector(m: &Mat4, v: &Vec3) -> Vec3 {
    m.fixed_view::<3, 3>(0, 0) * v
}

/// Inverse-transpose of `m`, used to carry normals, tangents and binormals
/// through a non-uniform transform.
///
/// Returns `None` when `m` is singular.
pub fn normal_matrix(m: &Mat4) -> Option<Mat4> {
    m.try_inverse().map(|inv| inv.transpose())
}

/// Build a right-handed perspective projection with depth range [0, 1].
pub fn perspective_rh(yfov: f32, aspect: f32, znear: f32, zfar: f32) -> Mat4 {
    let f = 1.0 / (yfov * 0.5).tan();
    let range = 1.0 / (znear - zfar);
    #[rustfmt::skip]
    let result = Mat4::new(
        f / aspect, 0.0, 0.0,          0.0,
        0.0,        f,   0.0,          0.0,
        0.0,        0.0, zfar * range, znear * zfar * range,
        0.0,        0.0, -1.0,         0.0,
    );
    result
}

/// Right-handed look-at view matrix.
pub fn look_at_rh(eye: &Vec3, target: &Vec3, up: &Vec3) -> Mat4 {
    nalgebra::Isometry3::look_at_rh(
        &nalgebra::Point3::from(*eye),
        &nalgebra::Point3::from(*target),
        up,
    )
    .to_homogeneous()
}

/// Any unit vector perpendicular to `v`.
///
/// Crosses with Z and falls back to X when `v` is parallel to Z.
pub fn any_perpendicular(v: &Vec3) -> Vec3 {
    let candidate = v.cross(&Vec3::z());
    if candidate.norm_squared() <= f32::EPSILON {
        v.cross(&Vec3::x()).normalize()
    } else {
        candidate.normalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: &Vec3, b: &Vec3) -> bool {
        (a - b).norm() < 1e-5
    }

    #[test]
    fn test_trs_applies_scale_then_rotation_then_translation() {
        let rotation = quat_from_axis_angle(Vec3::y(), std::f32::consts::FRAC_PI_2);
        let m = mat4_from_scale_rotation_translation(
            Vec3::new(2.0, 2.0, 2.0),
            rotation,
            Vec3::new(0.0, 1.0, 0.0),
        );
        let p = transform_point(&m, &Vec3::new(1.0, 0.0, 0.0));
        assert!(approx(&p, &Vec3::new(0.0, 1.0, -2.0)));
    }

    #[test]
    fn test_transform_vector_ignores_translation() {
        let m = mat4_from_translation(Vec3::new(5.0, 5.0, 5.0));
        let v = transform_vector(&m, &Vec3::new(0.0, 1.0, 0.0));
        assert!(approx(&v, &Vec3::new(0.0, 1.0, 0.0)));
    }

    #[test]
    fn test_normal_matrix_keeps_normals_perpendicular() {
        let m = mat4_from_scale(Vec3::new(4.0, 1.0, 1.0));
        let n = normal_matrix(&m).unwrap();
        // Surface x + y = 0 has normal (1, 1, 0); after scaling x by 4 the
        // surface becomes x / 4 + y = 0 with normal (1/4, 1, 0).
        let normal = transform_vector(&n, &Vec3::new(1.0, 1.0, 0.0)).normalize();
        let expected = Vec3::new(0.25, 1.0, 0.0).normalize();
        assert!(approx(&normal, &expected));
    }

    #[test]
    fn test_normal_matrix_singular() {
        assert!(normal_matrix(&Mat4::zeros()).is_none());
    }

    #[test]
    fn test_mat4_from_basis() {
        let m = mat4_from_basis(Vec3::y(), Vec3::z(), Vec3::x(), Vec3::new(1.0, 2.0, 3.0));
        let p = transform_point(&m, &Vec3::new(1.0, 0.0, 0.0));
        assert!(approx(&p, &Vec3::new(1.0, 3.0, 3.0)));
        assert!(approx(&mat4_translation(&m), &Vec3::new(1.0, 2.0, 3.0)));
    }

    #[test]
    fn test_any_perpendicular() {
        for v in [Vec3::x(), Vec3::y(), Vec3::z(), Vec3::new(1.0, 2.0, 3.0)] {
            let p = any_perpendicular(&v);
            assert!(p.dot(&v).abs() < 1e-5);
            assert!((p.norm() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_look_at_moves_eye_to_origin() {
        let eye = Vec3::new(0.0, 0.0, 5.0);
        let view = look_at_rh(&eye, &Vec3::zeros(), &Vec3::y());
        assert!(approx(&transform_point(&view, &eye), &Vec3::zeros()));
    }
}
