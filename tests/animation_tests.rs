// Host-side tests for the inertia model driving the tree's rotation.

use snowglobe_core::constants::TARGET_ANGULAR_VELOCITY;
use snowglobe_core::{RotationState, Theme};
use std::f32::consts::TAU;

#[test]
fn lit_velocity_rises_toward_target_without_overshoot() {
    let mut v = 0.0_f32;
    for i in 0..200 {
        let next = RotationState::next_velocity(v, Theme::Lit);
        assert!(next > v, "not increasing at step {i}: {v} -> {next}");
        assert!(next <= TARGET_ANGULAR_VELOCITY, "overshoot at step {i}: {next}");
        v = next;
    }
    assert!((v - TARGET_ANGULAR_VELOCITY).abs() < 1e-4);
}

#[test]
fn unlit_velocity_decays_to_exact_zero() {
    let mut state = RotationState {
        angle: 0.0,
        angular_velocity: TARGET_ANGULAR_VELOCITY,
    };
    let mut steps = 0;
    while state.angular_velocity > 0.0 {
        let before = state.angular_velocity;
        state.step(Theme::Unlit);
        assert!(state.angular_velocity < before);
        steps += 1;
        assert!(steps < 400, "did not stop within bound");
    }
    assert_eq!(state.angular_velocity, 0.0);
    assert!(state.is_at_rest());
}

#[test]
fn angle_freezes_once_stopped() {
    let mut state = RotationState {
        angle: 1.5,
        angular_velocity: 0.0,
    };
    for _ in 0..10 {
        assert_eq!(state.step(Theme::Unlit), 1.5);
    }
}

#[test]
fn angle_wraps_into_one_turn() {
    let mut state = RotationState {
        angle: TAU - 0.001,
        angular_velocity: TARGET_ANGULAR_VELOCITY,
    };
    for _ in 0..2000 {
        let a = state.step(Theme::Lit);
        assert!((0.0..TAU).contains(&a), "angle escaped: {a}");
    }
}

#[test]
fn relighting_resumes_from_current_speed() {
    let mut state = RotationState::default();
    for _ in 0..100 {
        state.step(Theme::Lit);
    }
    let spun_up = state.angular_velocity;
    state.step(Theme::Unlit);
    let coasting = state.angular_velocity;
    assert!(coasting < spun_up && coasting > 0.0);
    state.step(Theme::Lit);
    assert!(state.angular_velocity > coasting);
}
