// Host-side tests for projection math and procedural scene generation.

use glam::Vec3;
use snowglobe_core::constants::*;
use snowglobe_core::projection::*;
use snowglobe_core::{ParticleKind, Scene, SceneConfig};
use std::f32::consts::TAU;

fn default_scene() -> Scene {
    Scene::generate(SceneConfig {
        height: 420.0,
        width: 280.0,
        seed: 7,
    })
}

#[test]
fn rotation_is_periodic_in_full_turns() {
    let points = [
        Vec3::new(10.0, 5.0, -3.0),
        Vec3::new(-120.0, 300.0, 45.0),
        Vec3::new(0.0, 0.0, 0.0),
    ];
    for p in points {
        for step in 0..32 {
            let theta = step as f32 * 0.37;
            let a = rotate_y(p, theta);
            let b = rotate_y(p, theta + TAU);
            assert!((a - b).length() < 1e-3, "{p:?} at {theta}: {a:?} vs {b:?}");
        }
    }
}

#[test]
fn rotation_keeps_height_and_radius() {
    let p = Vec3::new(30.0, 200.0, 40.0);
    let r = rotate_y(p, 1.234);
    assert_eq!(r.y, p.y);
    let before = (p.x * p.x + p.z * p.z).sqrt();
    let after = (r.x * r.x + r.z * r.z).sqrt();
    assert!((before - after).abs() < 1e-3);
}

#[test]
fn depth_matches_rotated_z() {
    let p = Vec3::new(55.0, 10.0, -80.0);
    for step in 0..16 {
        let angle = step as f32 * 0.4;
        let z = rotate_y(p, angle).z;
        assert!((depth_at(p.x, p.z, angle) - z).abs() < 1e-4);
    }
}

#[test]
fn perspective_grows_toward_camera() {
    assert!((perspective_scale(0.0) - 1.0).abs() < 1e-6);
    assert!(perspective_scale(100.0) > 1.0);
    assert!(perspective_scale(-100.0) < 1.0);
    // Degenerate: at or beyond the focal plane nothing is drawn.
    assert_eq!(perspective_scale(FOCAL_DISTANCE), 0.0);
}

#[test]
fn depth_alpha_band() {
    assert!((depth_alpha(-200.0)).abs() < 1e-6);
    assert!((depth_alpha(200.0) - 1.0).abs() < 1e-6);
    assert_eq!(clamp01(depth_alpha(500.0)), 1.0);
    assert_eq!(clamp01(depth_alpha(-500.0)), 0.0);
}

#[test]
fn particles_fill_the_cone() {
    let scene = default_scene();
    assert_eq!(scene.particles.len(), 350);
    for p in &scene.particles {
        let y = p.base.y;
        assert!((0.0..=420.0).contains(&y), "y out of range: {y}");
        let bound = 0.45 * 280.0 * (y / 420.0);
        assert!(p.base.x.abs() <= bound + 1e-3, "x={} bound={}", p.base.x, bound);
        assert!(p.base.z.abs() <= bound + 1e-3, "z={} bound={}", p.base.z, bound);
        assert!(p.size >= 1.0 && p.size < 4.0);
        assert!(p.anim_offset_sec >= 0.0 && p.anim_offset_sec < 5.0);
    }
}

#[test]
fn particle_kinds_are_mixed() {
    let scene = default_scene();
    let bright = scene
        .particles
        .iter()
        .filter(|p| p.kind == ParticleKind::Bright)
        .count();
    // Roughly one in five; loose bounds keep this seed-independent.
    assert!(bright > 20 && bright < 150, "bright={bright}");
}

#[test]
fn spiral_has_seven_loops_of_beads() {
    let scene = default_scene();
    assert_eq!(scene.beads.len(), SPIRAL_LOOPS * SPIRAL_STEPS_PER_LOOP);
    assert_eq!(scene.beads.len(), 245);
    let mut prev_y = -1.0;
    for b in &scene.beads {
        assert!(b.base.y > prev_y);
        prev_y = b.base.y;
        let r = (b.base.x * b.base.x + b.base.z * b.base.z).sqrt();
        let expected = scene.silhouette.radius_at(b.base.y);
        assert!((r - expected).abs() < 1e-2);
    }
}

#[test]
fn ornaments_sit_just_outside_the_cone() {
    let scene = default_scene();
    assert_eq!(scene.ornaments.len(), 15);
    for (o, &(y, _)) in scene.ornaments.iter().zip(ORNAMENT_ANCHORS.iter()) {
        assert_eq!(o.base.y, y);
        let r = (o.base.x * o.base.x + o.base.z * o.base.z).sqrt();
        let cone = scene.silhouette.radius_at(y);
        assert!((r - cone * ORNAMENT_RADIUS_FACTOR).abs() < 1e-2);
        assert!(r > cone);
    }
}

#[test]
fn same_seed_same_scene() {
    let a = default_scene();
    let b = default_scene();
    assert_eq!(a.particles, b.particles);
    assert_eq!(a.beads, b.beads);
    let c = Scene::generate(SceneConfig {
        seed: 8,
        ..SceneConfig::default()
    });
    assert_ne!(a.particles, c.particles);
}

#[test]
fn degenerate_dimensions_give_empty_scene() {
    for (height, width) in [(0.0, 280.0), (420.0, 0.0), (-5.0, 10.0), (f32::NAN, 1.0)] {
        let scene = Scene::generate(SceneConfig {
            height,
            width,
            seed: 1,
        });
        assert!(scene.is_empty(), "{height}x{width} should be empty");
        assert!(scene.config.is_none());
    }
}
