//! Per-frame projection of the scene into a declarative shape list.
//!
//! Every point is rotated by the current angle, scaled by a pinhole
//! perspective and faded by depth. Beads and ornaments share one list that is
//! sorted back to front (painter's algorithm), so the host only has to paint
//! shapes in order on a 2D surface.

use crate::constants::*;
use crate::projection::{clamp01, depth_alpha, depth_at, perspective_scale, rotate_y};
use crate::scene::{ParticleKind, Scene, SparkleVariant};
use crate::theme::{self, StarPalette, Theme};
use rand::prelude::*;
use std::f32::consts::TAU;

pub const TRUNK_WIDTH: f32 = 10.0;
pub const TRUNK_HEIGHT: f32 = 60.0;
pub const TRUNK_INSET: f32 = 25.0; // how far the trunk reaches up into the cone
pub const TRUNK_REFRACTION_X: f32 = 2.0;

pub const STAR_SCALE: f32 = 1.5;
pub const STAR_HALO_RADIUS: f32 = 18.0;
pub const STAR_INNER_SCALE: f32 = 0.6;
pub const STAR_PULSE_PERIOD_SEC: f32 = 3.0;
pub const STAR_PULSE_DEPTH: f32 = 0.06;

/// Outer flare of the four-point star: start point then quadratic segments
/// as `[control_x, control_y, end_x, end_y]`.
pub const STAR_FLARE_START: [f32; 2] = [0.0, -45.0];
pub const STAR_FLARE_CURVES: [[f32; 4]; 4] = [
    [2.0, -10.0, 35.0, 0.0],
    [2.0, 10.0, 0.0, 45.0],
    [-2.0, 10.0, -35.0, 0.0],
    [-2.0, -10.0, 0.0, -45.0],
];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleSprite {
    pub x: f32,
    pub y: f32,
    pub scale: f32,
    pub size: f32,
    pub kind: ParticleKind,
    pub color: &'static str,
    pub opacity: f32,
    pub variant: SparkleVariant,
    pub anim_offset_sec: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BeadSprite {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub color: &'static str,
    pub opacity: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrnamentSprite {
    /// Index into `Scene::ornaments`; stable across frames.
    pub index: usize,
    pub x: f32,
    pub y: f32,
    pub scale: f32,
    pub opacity: f32,
    /// Only camera-facing ornaments accept clicks.
    pub interactive: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Layer {
    Bead(BeadSprite),
    Ornament(OrnamentSprite),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayeredSprite {
    pub depth: f32,
    pub layer: Layer,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Trunk {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Glow {
    /// Triangle corners: apex, base right, base left.
    pub outline: [[f32; 2]; 3],
    pub height: f32,
    pub opacity: f32,
    pub top_color: &'static str,
    pub bottom_color: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Backdrop {
    pub trunk: Trunk,
    pub glow: Glow,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Star {
    pub scale: f32,
    pub palette: StarPalette,
}

/// Everything the host needs to paint one frame, in paint order.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub theme: Theme,
    pub angle: f32,
    pub backdrop: Option<Backdrop>,
    pub particles: Vec<ParticleSprite>,
    pub layered: Vec<LayeredSprite>,
    pub star: Star,
}

impl Frame {
    /// Topmost clickable ornament under a tree-space point.
    ///
    /// Walks the layered list in reverse paint order so the nearest ornament
    /// wins; beads never capture clicks.
    pub fn hit_ornament(&self, point: [f32; 2]) -> Option<usize> {
        if !point[0].is_finite() || !point[1].is_finite() {
            return None;
        }
        self.layered.iter().rev().find_map(|item| match item.layer {
            Layer::Ornament(o) if o.interactive => {
                let half = ORNAMENT_HIT_HALF_EXTENT * o.scale;
                let inside = (point[0] - o.x).abs() <= half && (point[1] - o.y).abs() <= half;
                inside.then_some(o.index)
            }
            _ => None,
        })
    }

    pub fn ornaments(&self) -> impl Iterator<Item = &OrnamentSprite> {
        self.layered.iter().filter_map(|item| match &item.layer {
            Layer::Ornament(o) => Some(o),
            Layer::Bead(_) => None,
        })
    }
}

/// Stable ascending sort by depth (farthest first). Equal depths keep their
/// input order so ties paint deterministically.
pub fn sort_back_to_front<T>(items: &mut [T], depth: impl Fn(&T) -> f32) {
    items.sort_by(|a, b| depth(a).total_cmp(&depth(b)));
}

pub struct SceneRenderer {
    scene: Scene,
    twinkle: StdRng,
}

impl SceneRenderer {
    /// `twinkle` feeds the per-paint glint colors and is separate from the
    /// generation RNG so the scene itself stays reproducible.
    pub fn new(scene: Scene, twinkle: StdRng) -> Self {
        Self { scene, twinkle }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn render(&mut self, angle: f32, theme: Theme) -> Frame {
        let star = Star {
            scale: STAR_SCALE,
            palette: theme::star_palette(theme),
        };
        if self.scene.is_empty() {
            return Frame {
                theme,
                angle,
                backdrop: None,
                particles: Vec::new(),
                layered: Vec::new(),
                star,
            };
        }
        Frame {
            theme,
            angle,
            backdrop: Some(self.backdrop(theme)),
            particles: self.project_particles(angle, theme),
            layered: self.project_layered(angle, theme),
            star,
        }
    }

    fn backdrop(&self, theme: Theme) -> Backdrop {
        let silhouette = &self.scene.silhouette;
        let height = silhouette.height;
        let (top_color, bottom_color) = theme::glow_gradient(theme);
        Backdrop {
            trunk: Trunk {
                x: -TRUNK_WIDTH / 2.0,
                y: height - TRUNK_INSET,
                width: TRUNK_WIDTH,
                height: TRUNK_HEIGHT,
            },
            glow: Glow {
                outline: [silhouette.apex(), silhouette.base_right(), silhouette.base_left()],
                height,
                opacity: theme::glow_opacity(theme),
                top_color,
                bottom_color,
            },
        }
    }

    fn project_particles(&mut self, angle: f32, theme: Theme) -> Vec<ParticleSprite> {
        let twinkle = &mut self.twinkle;
        self.scene
            .particles
            .iter()
            .filter_map(|p| {
                let r = rotate_y(p.base, angle);
                let alpha = depth_alpha(r.z);
                if alpha < PARTICLE_MIN_ALPHA {
                    return None;
                }
                Some(ParticleSprite {
                    x: r.x,
                    y: r.y,
                    scale: perspective_scale(r.z),
                    size: p.size,
                    kind: p.kind,
                    color: theme::particle_color(theme, twinkle),
                    opacity: alpha.min(1.0),
                    variant: p.variant,
                    anim_offset_sec: p.anim_offset_sec,
                })
            })
            .collect()
    }

    fn project_layered(&self, angle: f32, theme: Theme) -> Vec<LayeredSprite> {
        let height = self.scene.silhouette.height;
        let mut items: Vec<(f32, Option<usize>, glam::Vec3)> =
            Vec::with_capacity(self.scene.beads.len() + self.scene.ornaments.len());
        items.extend(
            self.scene
                .beads
                .iter()
                .map(|b| (depth_at(b.base.x, b.base.z, angle), None, b.base)),
        );
        items.extend(
            self.scene
                .ornaments
                .iter()
                .enumerate()
                .map(|(i, o)| (depth_at(o.base.x, o.base.z, angle), Some(i), o.base)),
        );
        sort_back_to_front(&mut items, |item| item.0);

        items
            .into_iter()
            .filter_map(|(depth, ornament, base)| {
                let r = rotate_y(base, angle);
                let scale = perspective_scale(r.z);
                let layer = match ornament {
                    None => {
                        if r.z < BEAD_CULL_Z {
                            return None;
                        }
                        let front = r.z > 0.0;
                        let t = if height > 0.0 { r.y / height } else { 0.0 };
                        let size = if front { 3.0 + t * 3.0 } else { 2.0 + t * 2.0 };
                        Layer::Bead(BeadSprite {
                            x: r.x,
                            y: r.y,
                            radius: size * scale,
                            color: theme::bead_color(theme, front),
                            opacity: if front { 1.0 } else { 0.6 },
                        })
                    }
                    Some(index) => Layer::Ornament(OrnamentSprite {
                        index,
                        x: r.x,
                        y: r.y,
                        scale,
                        opacity: depth_alpha(r.z).clamp(ORNAMENT_MIN_OPACITY, 1.0),
                        interactive: r.z > 0.0,
                    }),
                };
                Some(LayeredSprite { depth, layer })
            })
            .collect()
    }
}

/// Brightness multiplier for a particle's sparkle cycle.
///
/// Lit particles flash quickly or sparkle slowly depending on their variant;
/// unlit ones share one gentle twinkle. `time_sec` is a free-running clock.
pub fn twinkle_factor(variant: SparkleVariant, theme: Theme, time_sec: f32, offset_sec: f32) -> f32 {
    let period = match (theme, variant) {
        (Theme::Lit, SparkleVariant::Flash) => 1.2,
        (Theme::Lit, SparkleVariant::Sparkle) => 2.4,
        (Theme::Unlit, _) => 4.0,
    };
    let phase = ((time_sec + offset_sec) / period).fract() * TAU;
    let floor = if theme.is_lit() { 0.35 } else { 0.55 };
    clamp01(floor + (1.0 - floor) * 0.5 * (1.0 + phase.sin()))
}

/// Slow breathing scale for the star topper.
pub fn star_pulse(time_sec: f32) -> f32 {
    let phase = (time_sec / STAR_PULSE_PERIOD_SEC).fract() * TAU;
    1.0 + STAR_PULSE_DEPTH * phase.sin()
}
