//! Gift boxes, ornament shake bookkeeping and the click/toggle handlers.

use crate::audio::{AudioBackend, AudioEngine, MelodyTransition};
use crate::constants::{SHAKE_DURATION_MS, SHAKE_MAX_ANGLE_RAD, SHAKE_WOBBLES};
use crate::render::Frame;
use crate::theme::{Theme, ThemeCell};
use fnv::FnvHashMap;
use instant::Instant;
use std::f32::consts::TAU;
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GiftIcon {
    Gem,
    Heart,
    Clover,
}

impl GiftIcon {
    pub fn name(self) -> &'static str {
        match self {
            GiftIcon::Gem => "Diamond",
            GiftIcon::Heart => "Love",
            GiftIcon::Clover => "Luck",
        }
    }
}

/// Box, ribbon and border colors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GiftStyle {
    pub box_color: &'static str,
    pub ribbon: &'static str,
    pub border: &'static str,
}

const GIFT_STYLES: [GiftStyle; 3] = [
    GiftStyle {
        box_color: "#000000",
        ribbon: "#ffffff",
        border: "#333",
    },
    GiftStyle {
        box_color: "#ffffff",
        ribbon: "#000000",
        border: "#ddd",
    },
    GiftStyle {
        box_color: "#1a1a1a",
        ribbon: "#d4d4d8",
        border: "#333",
    },
];

/// A clickable gift under the tree. Offsets are pixels from the tree's base
/// center (positive `offset_y` lifts the box).
#[derive(Clone, Debug, PartialEq)]
pub struct GiftItem {
    pub id: &'static str,
    pub is_open: bool,
    pub offset_x: f32,
    pub offset_y: f32,
    pub rotation_deg: f32,
    pub icon: GiftIcon,
    pub color: &'static str,
}

impl GiftItem {
    pub fn toggle(&mut self) -> bool {
        self.is_open = !self.is_open;
        self.is_open
    }

    pub fn style(&self) -> GiftStyle {
        let code = self.id.chars().next().map(|c| c as usize).unwrap_or(0);
        GIFT_STYLES[code % GIFT_STYLES.len()]
    }

    pub fn scale(&self) -> f32 {
        if self.is_open {
            1.1
        } else {
            1.0
        }
    }

    /// Open gifts float above the rest; closed ones stack by height.
    pub fn z_index(&self) -> i32 {
        if self.is_open {
            100
        } else {
            30 - self.offset_y as i32
        }
    }

    pub fn transform_css(&self) -> String {
        format!(
            "translate(calc(-50% + {}px), {}px) rotate({}deg) scale({})",
            self.offset_x,
            -self.offset_y,
            self.rotation_deg,
            self.scale()
        )
    }
}

/// The fixed set of three gifts; never grows or shrinks.
#[derive(Clone, Debug, PartialEq)]
pub struct Gifts {
    items: [GiftItem; 3],
}

impl Default for Gifts {
    fn default() -> Self {
        Self::initial()
    }
}

impl Gifts {
    pub fn initial() -> Self {
        let gift = |id, offset_x, offset_y, rotation_deg, icon| GiftItem {
            id,
            is_open: false,
            offset_x,
            offset_y,
            rotation_deg,
            icon,
            color: "#fff",
        };
        Self {
            items: [
                gift("1", -60.0, 10.0, -5.0, GiftIcon::Gem),
                gift("2", 0.0, -5.0, 0.0, GiftIcon::Heart),
                gift("3", 60.0, 20.0, 5.0, GiftIcon::Clover),
            ],
        }
    }

    pub fn items(&self) -> &[GiftItem] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&GiftItem> {
        self.items.iter().find(|g| g.id == id)
    }

    /// Flip one gift; returns its new open state, or `None` for an unknown id.
    pub fn toggle(&mut self, id: &str) -> Option<bool> {
        self.items.iter_mut().find(|g| g.id == id).map(GiftItem::toggle)
    }
}

/// Transient shake state for clicked ornaments, keyed by ornament index.
#[derive(Debug)]
pub struct ShakeTracker {
    started: FnvHashMap<usize, Instant>,
    duration: Duration,
}

impl Default for ShakeTracker {
    fn default() -> Self {
        Self::new(Duration::from_millis(SHAKE_DURATION_MS))
    }
}

impl ShakeTracker {
    pub fn new(duration: Duration) -> Self {
        Self {
            started: FnvHashMap::default(),
            duration,
        }
    }

    /// (Re)start the shake; a second click restarts the timer.
    pub fn trigger(&mut self, index: usize, now: Instant) {
        self.started.insert(index, now);
    }

    pub fn is_shaking(&self, index: usize, now: Instant) -> bool {
        self.progress(index, now).is_some()
    }

    /// Fraction of the shake elapsed, `None` when idle.
    pub fn progress(&self, index: usize, now: Instant) -> Option<f32> {
        let start = self.started.get(&index)?;
        let elapsed = elapsed_since(now, *start);
        if elapsed >= self.duration {
            return None;
        }
        Some(elapsed.as_secs_f32() / self.duration.as_secs_f32())
    }

    /// Rotation to apply to a shaking ornament, pivoting at its thread.
    pub fn wobble_angle(&self, index: usize, now: Instant) -> f32 {
        match self.progress(index, now) {
            Some(t) => SHAKE_MAX_ANGLE_RAD * (1.0 - t) * (t * SHAKE_WOBBLES * TAU).sin(),
            None => 0.0,
        }
    }

    /// Forget shakes that have run their course.
    pub fn prune(&mut self, now: Instant) {
        let duration = self.duration;
        self.started
            .retain(|_, start| elapsed_since(now, *start) < duration);
    }

    pub fn active_count(&self) -> usize {
        self.started.len()
    }
}

#[inline]
fn elapsed_since(now: Instant, start: Instant) -> Duration {
    if now > start {
        now.duration_since(start)
    } else {
        Duration::ZERO
    }
}

/// Gift click: flip only that gift and ring the chime whichever way it went.
/// Returns the gift's new open state, or `None` for an unknown id.
pub fn on_gift_click<B: AudioBackend>(
    gifts: &mut Gifts,
    audio: &mut AudioEngine<B>,
    id: &str,
) -> Option<bool> {
    audio.play_chime();
    let open = gifts.toggle(id);
    match open {
        Some(open) => log::info!("[click] gift {} open={}", id, open),
        None => log::warn!("[click] unknown gift {}", id),
    }
    open
}

/// Ornament click at a tree-space point.
///
/// A hit starts the shake and rings the chime, and the caller must stop the
/// event from reaching anything behind the ornament. A miss does nothing.
pub fn on_ornament_click<B: AudioBackend>(
    frame: &Frame,
    shakes: &mut ShakeTracker,
    audio: &mut AudioEngine<B>,
    point: [f32; 2],
    now: Instant,
) -> Option<usize> {
    let index = frame.hit_ornament(point)?;
    shakes.trigger(index, now);
    audio.play_chime();
    log::info!("[click] ornament {}", index);
    Some(index)
}

/// Theme switch: the only input that starts or stops the melody.
pub fn on_theme_toggle<B: AudioBackend>(
    theme: &ThemeCell,
    audio: &mut AudioEngine<B>,
) -> (Theme, MelodyTransition) {
    let next = theme.toggle();
    log::info!("[toggle] lit={}", next.is_lit());
    (next, audio.set_melody_playing(next.is_lit()))
}
