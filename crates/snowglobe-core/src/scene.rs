use crate::constants::*;
use glam::Vec3;
use rand::prelude::*;
use std::f32::consts::TAU;

/// Tree size and generation seed.
///
/// - `height`: drop from the apex to the base of the cone
/// - `width`: full width of the cone at its base
/// - `seed`: RNG seed so a given configuration always yields the same scene
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneConfig {
    pub height: f32,
    pub width: f32,
    pub seed: u64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            height: TREE_HEIGHT,
            width: TREE_WIDTH,
            seed: 42,
        }
    }
}

impl SceneConfig {
    /// Zero, negative, or non-finite dimensions collapse the scene.
    pub fn is_degenerate(&self) -> bool {
        !(self.height.is_finite() && self.width.is_finite())
            || self.height <= 0.0
            || self.width <= 0.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParticleKind {
    /// Small round dust.
    Fine,
    /// Square glint rotated 45 degrees.
    Bright,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SparkleVariant {
    Flash,
    Sparkle,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub base: Vec3,
    pub size: f32,
    pub kind: ParticleKind,
    pub anim_offset_sec: f32,
    pub variant: SparkleVariant,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bead {
    pub base: Vec3,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ornament {
    pub base: Vec3,
}

/// Outline of the cone in tree-local space; the apex sits at the origin.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Silhouette {
    pub height: f32,
    pub half_width: f32,
}

impl Silhouette {
    /// Cone radius at a given drop below the apex.
    #[inline]
    pub fn radius_at(&self, y: f32) -> f32 {
        if self.height <= 0.0 {
            return 0.0;
        }
        (y / self.height) * self.half_width
    }

    pub fn apex(&self) -> [f32; 2] {
        [0.0, 0.0]
    }

    pub fn base_left(&self) -> [f32; 2] {
        [-self.half_width, self.height]
    }

    pub fn base_right(&self) -> [f32; 2] {
        [self.half_width, self.height]
    }
}

/// Immutable point sets for one tree configuration. Only re-projected per frame.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    pub config: Option<SceneConfig>,
    pub particles: Vec<Particle>,
    pub beads: Vec<Bead>,
    pub ornaments: Vec<Ornament>,
    pub silhouette: Silhouette,
}

impl Scene {
    /// Build all point sets from the config's own seed.
    pub fn generate(config: SceneConfig) -> Self {
        let mut rng = StdRng::seed_from_u64(config.seed);
        Self::generate_with_rng(config, &mut rng)
    }

    pub fn generate_with_rng<R: Rng + ?Sized>(config: SceneConfig, rng: &mut R) -> Self {
        if config.is_degenerate() {
            log::warn!(
                "[scene] degenerate tree {}x{}, generating empty scene",
                config.height,
                config.width
            );
            return Self::default();
        }
        let silhouette = Silhouette {
            height: config.height,
            half_width: config.width / 2.0,
        };
        let scene = Self {
            config: Some(config),
            particles: generate_particles(config, rng),
            beads: generate_spiral(config),
            ornaments: generate_ornaments(config),
            silhouette,
        };
        log::debug!(
            "[scene] particles={} beads={} ornaments={}",
            scene.particles.len(),
            scene.beads.len(),
            scene.ornaments.len()
        );
        scene
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty() && self.beads.is_empty() && self.ornaments.is_empty()
    }
}

fn generate_particles<R: Rng + ?Sized>(config: SceneConfig, rng: &mut R) -> Vec<Particle> {
    (0..PARTICLE_COUNT)
        .map(|_| {
            let y = rng.gen::<f32>().powf(PARTICLE_HEIGHT_EXPONENT) * config.height;
            let max_w = (y / config.height) * config.width * PARTICLE_SPREAD;
            let theta = rng.gen::<f32>() * TAU;
            let r = rng.gen::<f32>() * max_w * 0.5;
            let size = rng.gen::<f32>() * 3.0 + 1.0;
            let kind = if rng.gen_bool(PARTICLE_BRIGHT_RATIO as f64) {
                ParticleKind::Bright
            } else {
                ParticleKind::Fine
            };
            let anim_offset_sec = rng.gen::<f32>() * PARTICLE_ANIM_OFFSET_MAX_SEC;
            let variant = if rng.gen_bool(PARTICLE_FLASH_RATIO as f64) {
                SparkleVariant::Flash
            } else {
                SparkleVariant::Sparkle
            };
            Particle {
                base: Vec3::new(r * theta.cos(), y, r * theta.sin()),
                size,
                kind,
                anim_offset_sec,
                variant,
            }
        })
        .collect()
}

// Double spiral: radius grows linearly with the drop so the string hugs the cone.
fn generate_spiral(config: SceneConfig) -> Vec<Bead> {
    let total = SPIRAL_LOOPS * SPIRAL_STEPS_PER_LOOP;
    (0..total)
        .map(|i| {
            let progress = i as f32 / total as f32;
            let y = progress * config.height;
            let r = progress * (config.width / 2.0);
            let theta = progress * TAU * SPIRAL_LOOPS as f32;
            Bead {
                base: Vec3::new(r * theta.cos(), y, r * theta.sin()),
            }
        })
        .collect()
}

fn generate_ornaments(config: SceneConfig) -> Vec<Ornament> {
    ORNAMENT_ANCHORS
        .iter()
        .map(|&(y, theta)| {
            let r = (y / config.height) * (config.width / 2.0) * ORNAMENT_RADIUS_FACTOR;
            Ornament {
                base: Vec3::new(r * theta.cos(), y, r * theta.sin()),
            }
        })
        .collect()
}
