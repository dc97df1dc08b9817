//! Light/dark theme flag and the palettes it selects.
//!
//! The flag lives in a single-threaded cell shared between the toggle handler
//! (the only writer) and the frame loop (reader).

use rand::Rng;
use std::cell::Cell;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Theme {
    Lit,
    #[default]
    Unlit,
}

impl Theme {
    #[inline]
    pub fn is_lit(self) -> bool {
        matches!(self, Theme::Lit)
    }

    #[inline]
    pub fn toggled(self) -> Self {
        match self {
            Theme::Lit => Theme::Unlit,
            Theme::Unlit => Theme::Lit,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Theme::Lit => "On",
            Theme::Unlit => "Off",
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ThemeCell(Rc<Cell<Theme>>);

impl ThemeCell {
    pub fn new(theme: Theme) -> Self {
        Self(Rc::new(Cell::new(theme)))
    }

    #[inline]
    pub fn get(&self) -> Theme {
        self.0.get()
    }

    /// Flip the flag and return the new value.
    pub fn toggle(&self) -> Theme {
        let next = self.0.get().toggled();
        self.0.set(next);
        next
    }
}

// Particle glints: mostly blue-white, the occasional warm or icy flash.
const GLINT_RATIO: f64 = 0.2;

/// Re-rolled on every paint so particles twinkle even while the tree is still.
pub fn particle_color<R: Rng + ?Sized>(theme: Theme, rng: &mut R) -> &'static str {
    let glint = rng.gen_bool(GLINT_RATIO);
    match (theme, glint) {
        (Theme::Lit, true) => "#fef3c7",
        (Theme::Lit, false) => "#e0f2fe",
        (Theme::Unlit, true) => "#e0f2fe",
        (Theme::Unlit, false) => "#ffffff",
    }
}

pub fn bead_color(theme: Theme, front: bool) -> &'static str {
    match (theme, front) {
        (Theme::Lit, true) => "#f8fafc",
        (Theme::Unlit, true) => "#ffffff",
        (_, false) => "#94a3b8",
    }
}

/// Colors for the blurred core volume, top to bottom.
pub fn glow_gradient(theme: Theme) -> (&'static str, &'static str) {
    match theme {
        Theme::Lit => ("#fef3c7", "#d97706"),
        Theme::Unlit => ("#ffffff", "#94a3b8"),
    }
}

pub fn glow_opacity(theme: Theme) -> f32 {
    match theme {
        Theme::Lit => 0.6,
        Theme::Unlit => 0.3,
    }
}

/// Crystal fill stops (top-left to bottom-right) and facet stroke.
pub fn crystal_palette(theme: Theme) -> ([&'static str; 3], &'static str) {
    match theme {
        Theme::Lit => (["#ffffff", "#fcd34d", "#b45309"], "rgba(180, 83, 9, 0.5)"),
        Theme::Unlit => (["#ffffff", "#e2e8f0", "#94a3b8"], "rgba(255, 255, 255, 0.3)"),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StarPalette {
    pub halo: &'static str,
    pub flare: &'static str,
    pub inner: &'static str,
}

pub fn star_palette(theme: Theme) -> StarPalette {
    match theme {
        Theme::Lit => StarPalette {
            halo: "#fcd34d",
            flare: "#fffbeb",
            inner: "#fcd34d",
        },
        Theme::Unlit => StarPalette {
            halo: "#ffffff",
            flare: "#ffffff",
            inner: "#ffffff",
        },
    }
}

pub fn background_color(theme: Theme) -> &'static str {
    match theme {
        Theme::Lit => "#1a0500",
        Theme::Unlit => "#000000",
    }
}
