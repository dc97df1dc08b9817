use crate::constants::{
    ACCELERATION_BLEND, ANGLE_ADVANCE_EPSILON, DECELERATION_FACTOR, TARGET_ANGULAR_VELOCITY,
    VELOCITY_SNAP_EPSILON,
};
use crate::theme::Theme;
use std::f32::consts::TAU;

/// Rotation of the tree about its vertical axis.
///
/// Velocity is a first-order low-pass filter stepped once per display frame:
/// it eases toward `TARGET_ANGULAR_VELOCITY` while lit and bleeds off
/// geometrically while unlit, snapping to zero so the tree comes to a full
/// stop instead of creeping. Frame intervals are assumed roughly constant.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RotationState {
    pub angle: f32,
    pub angular_velocity: f32,
}

impl RotationState {
    /// Velocity after one frame under `theme`, without touching the angle.
    pub fn next_velocity(velocity: f32, theme: Theme) -> f32 {
        if theme.is_lit() {
            velocity + (TARGET_ANGULAR_VELOCITY - velocity) * ACCELERATION_BLEND
        } else {
            let v = velocity * DECELERATION_FACTOR;
            if v < VELOCITY_SNAP_EPSILON {
                0.0
            } else {
                v
            }
        }
    }

    /// Advance one frame and return the angle to paint with.
    pub fn step(&mut self, theme: Theme) -> f32 {
        self.angular_velocity = Self::next_velocity(self.angular_velocity, theme);
        if self.angular_velocity > ANGLE_ADVANCE_EPSILON {
            self.angle = (self.angle + self.angular_velocity).rem_euclid(TAU);
        }
        self.angle
    }

    pub fn is_at_rest(&self) -> bool {
        self.angular_velocity == 0.0
    }
}
