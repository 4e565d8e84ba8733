//! Math type re-exports and transform utilities.
//!
//! Scene transforms and vertex data use `glam` double-precision types;
//! FBX stores all geometry and transform values as 64-bit floats.

// Re-export glam types used throughout the exporter
pub use glam::{DMat4, DQuat, DVec2, DVec3, DVec4};

/// Decompose a 4x4 affine transform into translation, rotation and scaling.
///
/// Rotation is returned as Euler angles in radians, XYZ order (the matrix
/// factors as `Rz * Ry * Rx`). Scaling signs are recovered from the
/// determinant, so a mirrored transform decomposes to negative scaling
/// rather than a garbage rotation.
pub fn decompose_transform(m: &DMat4) -> (DVec3, DVec3, DVec3) {
    let translation = m.w_axis.truncate();

    let mut cols = [
        m.x_axis.truncate(),
        m.y_axis.truncate(),
        m.z_axis.truncate(),
    ];

    let mut scaling = DVec3::new(cols[0].length(), cols[1].length(), cols[2].length());
    if m.determinant() < 0.0 {
        scaling = -scaling;
    }

    if scaling.x != 0.0 {
        cols[0] /= scaling.x;
    }
    if scaling.y != 0.0 {
        cols[1] /= scaling.y;
    }
    if scaling.z != 0.0 {
        cols[2] /= scaling.z;
    }

    let y = (-cols[0].z).clamp(-1.0, 1.0).asin();
    let rotation = if y.cos().abs() > 1.0e-6 {
        DVec3::new(
            cols[1].z.atan2(cols[2].z),
            y,
            cols[0].y.atan2(cols[0].x),
        )
    } else {
        // gimbal lock: fold everything into the z angle
        DVec3::new(0.0, y, (-cols[1].x).atan2(cols[1].y))
    };

    (translation, rotation, scaling)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn assert_close(a: DVec3, b: DVec3) {
        assert!((a - b).length() < 1.0e-9, "{a:?} != {b:?}");
    }

    #[test]
    fn test_decompose_identity() {
        let (t, r, s) = decompose_transform(&DMat4::IDENTITY);
        assert_close(t, DVec3::ZERO);
        assert_close(r, DVec3::ZERO);
        assert_close(s, DVec3::ONE);
    }

    #[test]
    fn test_decompose_translation() {
        let m = DMat4::from_translation(DVec3::new(1.0, 2.0, 3.0));
        let (t, r, s) = decompose_transform(&m);
        assert_close(t, DVec3::new(1.0, 2.0, 3.0));
        assert_close(r, DVec3::ZERO);
        assert_close(s, DVec3::ONE);
    }

    #[test]
    fn test_decompose_rotation_x() {
        let m = DMat4::from_rotation_x(FRAC_PI_2);
        let (t, r, s) = decompose_transform(&m);
        assert_close(t, DVec3::ZERO);
        assert_close(r, DVec3::new(FRAC_PI_2, 0.0, 0.0));
        assert_close(s, DVec3::ONE);
    }

    #[test]
    fn test_decompose_trs() {
        let m = DMat4::from_translation(DVec3::new(-4.0, 0.5, 8.0))
            * DMat4::from_rotation_z(0.25)
            * DMat4::from_scale(DVec3::new(2.0, 2.0, 2.0));
        let (t, r, s) = decompose_transform(&m);
        assert_close(t, DVec3::new(-4.0, 0.5, 8.0));
        assert_close(r, DVec3::new(0.0, 0.0, 0.25));
        assert_close(s, DVec3::splat(2.0));
    }

    #[test]
    fn test_decompose_mirrored() {
        let m = DMat4::from_scale(DVec3::new(-1.0, 1.0, 1.0));
        let (_, _, s) = decompose_transform(&m);
        assert!(s.x < 0.0 || s.y < 0.0 || s.z < 0.0);
        assert!((s.x * s.y * s.z + 1.0).abs() < 1.0e-9);
    }
}
