use crate::constants::{DEPTH_FADE_OFFSET, DEPTH_FADE_SPAN, FOCAL_DISTANCE};
use glam::Vec3;

/// Rotate a tree-local point about the vertical axis.
///
/// `y` is the drop below the apex and is left untouched; `x`/`z` turn
/// together so that positive `z` faces the camera.
#[inline]
pub fn rotate_y(point: Vec3, angle: f32) -> Vec3 {
    let (sin, cos) = angle.sin_cos();
    Vec3::new(
        point.x * cos - point.z * sin,
        point.y,
        point.x * sin + point.z * cos,
    )
}

/// Camera-space depth of a base point after rotation (same as `rotate_y(..).z`).
#[inline]
pub fn depth_at(base_x: f32, base_z: f32, angle: f32) -> f32 {
    let (sin, cos) = angle.sin_cos();
    base_x * sin + base_z * cos
}

/// Simple pinhole scale: points toward the camera (positive z) grow.
#[inline]
pub fn perspective_scale(z: f32) -> f32 {
    let denom = FOCAL_DISTANCE - z;
    if denom <= f32::EPSILON {
        return 0.0;
    }
    FOCAL_DISTANCE / denom
}

/// Unclamped depth fade; values below zero are fully behind the visible band.
#[inline]
pub fn depth_alpha(z: f32) -> f32 {
    (z + DEPTH_FADE_OFFSET) / DEPTH_FADE_SPAN
}

#[inline]
pub fn clamp01(v: f32) -> f32 {
    v.clamp(0.0, 1.0)
}
