//! Orientation frames along a curve.

use glam::{EulerRot, Mat3, Quat, Vec3};

/// Builds the rotation that points local +Z along `forward`, with local +Y
/// as close to `up` as possible.
///
/// Falls back to the shortest arc from +Z when `forward` is parallel to `up`,
/// and to identity when `forward` is zero.
pub fn orientation_from_forward(forward: Vec3, up: Vec3) -> Quat {
    let Some(forward) = forward.try_normalize() else {
        return Quat::IDENTITY;
    };

    let right = up.cross(forward);
    if right.length_squared() < 1e-8 {
        return Quat::from_rotation_arc(Vec3::Z, forward);
    }
    let right = right.normalize();
    let up = forward.cross(right);

    Quat::from_mat3(&Mat3::from_cols(right, up, forward))
}

/// Converts a rotation into Euler angles `(x, y, z)` in radians.
///
/// Angles are extracted in yaw-pitch-roll order (`EulerRot::YXZ`) and stored
/// per axis, so `x` is pitch, `y` is yaw and `z` is roll.
pub fn euler_angles(rotation: Quat) -> Vec3 {
    let (yaw, pitch, roll) = rotation.to_euler(EulerRot::YXZ);
    Vec3::new(pitch, yaw, roll)
}
