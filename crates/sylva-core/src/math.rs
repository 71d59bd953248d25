//! Vector and quaternion helpers shared by the turtle and geometry stages
//!
//! Skeleton state lives in `f64` (`glam::DVec3` / `glam::DQuat`) so that
//! orientation error does not accumulate over long sentences. Conversion to
//! `f32` happens only when values are pushed into output buffers.

use glam::{DMat4, DQuat, DVec2, DVec3};

/// Squared length below which a vector or quaternion counts as degenerate
const DEGENERATE_EPSILON: f64 = 1e-24;

/// Local forward reference axis (the turtle grows along +Y)
pub const FORWARD: DVec3 = DVec3::Y;
/// Local right reference axis
pub const RIGHT: DVec3 = DVec3::X;
/// Local up reference axis
pub const UP: DVec3 = DVec3::Z;

/// Normalize a vector, returning the zero vector for zero-length input
pub fn normalize_or_zero(v: DVec3) -> DVec3 {
    let len_sq = v.length_squared();
    if len_sq <= DEGENERATE_EPSILON || !len_sq.is_finite() {
        DVec3::ZERO
    } else {
        v / len_sq.sqrt()
    }
}

/// Normalize a quaternion, returning identity for a zero or non-finite quaternion
pub fn normalize_quat_or_identity(q: DQuat) -> DQuat {
    let len_sq = q.length_squared();
    if len_sq <= DEGENERATE_EPSILON || !len_sq.is_finite() {
        DQuat::IDENTITY
    } else {
        q * (1.0 / len_sq.sqrt())
    }
}

/// Rotation of `degrees` around `axis`
///
/// A degenerate axis yields the identity rotation.
pub fn axis_rotation(axis: DVec3, degrees: f64) -> DQuat {
    let axis = normalize_or_zero(axis);
    if axis == DVec3::ZERO {
        return DQuat::IDENTITY;
    }
    DQuat::from_axis_angle(axis, degrees.to_radians())
}

/// The `(forward, right, up)` axes of a frame with the given orientation
pub fn local_axes(orientation: DQuat) -> (DVec3, DVec3, DVec3) {
    (
        orientation * FORWARD,
        orientation * RIGHT,
        orientation * UP,
    )
}

/// Append a vector to a flat `f32` buffer
pub fn push_vec3(buffer: &mut Vec<f32>, v: DVec3) {
    buffer.extend_from_slice(&[v.x as f32, v.y as f32, v.z as f32]);
}

/// Append a 2D vector to a flat `f32` buffer
pub fn push_vec2(buffer: &mut Vec<f32>, v: DVec2) {
    buffer.extend_from_slice(&[v.x as f32, v.y as f32]);
}

/// Append a matrix to a flat `f32` buffer in column-major order
pub fn push_mat4(buffer: &mut Vec<f32>, m: &DMat4) {
    buffer.extend(m.to_cols_array().iter().map(|&x| x as f32));
}

/// Read the `index`-th vector out of a flat 3-component buffer
#[cfg(test)]
pub(crate) fn read_vec3(buffer: &[f32], index: usize) -> DVec3 {
    let i = index * 3;
    DVec3::new(
        f64::from(buffer[i]),
        f64::from(buffer[i + 1]),
        f64::from(buffer[i + 2]),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn zero_vector_normalizes_to_zero() {
        assert_eq!(normalize_or_zero(DVec3::ZERO), DVec3::ZERO);
    }

    #[test]
    fn vector_normalizes_to_unit_length() {
        let n = normalize_or_zero(DVec3::new(3.0, 4.0, 0.0));
        assert_relative_eq!(n.length(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(n.x, 0.6, epsilon = 1e-12);
    }

    #[test]
    fn zero_quaternion_normalizes_to_identity() {
        let q = DQuat::from_xyzw(0.0, 0.0, 0.0, 0.0);
        assert_eq!(normalize_quat_or_identity(q), DQuat::IDENTITY);

        let nan = DQuat::from_xyzw(f64::NAN, 0.0, 0.0, 1.0);
        assert_eq!(normalize_quat_or_identity(nan), DQuat::IDENTITY);
    }

    #[test]
    fn identity_frame_matches_reference_axes() {
        let (forward, right, up) = local_axes(DQuat::IDENTITY);
        assert_eq!(forward, DVec3::Y);
        assert_eq!(right, DVec3::X);
        assert_eq!(up, DVec3::Z);
    }

    #[test]
    fn axis_rotation_uses_degrees() {
        let q = axis_rotation(DVec3::Z, 90.0);
        let v = q * DVec3::Y;
        assert_relative_eq!(v.x, -1.0, epsilon = 1e-12);
        assert_relative_eq!(v.y, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn degenerate_axis_is_identity() {
        assert_eq!(axis_rotation(DVec3::ZERO, 45.0), DQuat::IDENTITY);
    }

    #[test]
    fn matrices_are_pushed_column_major() {
        let m = DMat4::from_translation(DVec3::new(1.0, 2.0, 3.0));
        let mut buffer = Vec::new();
        push_mat4(&mut buffer, &m);
        assert_eq!(buffer.len(), 16);
        assert_eq!(&buffer[12..15], &[1.0, 2.0, 3.0]);
    }
}
