use crate::constants::SNOWFLAKE_COUNT;
use rand::rngs::StdRng;
use rand::Rng;
use std::f32::consts::TAU;

const SWAY_PX: f32 = 6.0;

/// One flake falling from the top of the globe to the bottom on a loop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Snowflake {
    /// Horizontal position as a fraction of the globe width.
    pub left: f32,
    pub duration_sec: f32,
    pub delay_sec: f32,
    pub size_px: f32,
    pub opacity: f32,
}

impl Snowflake {
    /// Position as `[x_fraction, y_fraction]` plus a horizontal sway in
    /// pixels, or `None` before the flake's first fall has begun.
    pub fn position_at(&self, time_sec: f32) -> Option<([f32; 2], f32)> {
        let t = time_sec - self.delay_sec;
        if t < 0.0 || self.duration_sec <= 0.0 {
            return None;
        }
        let progress = (t / self.duration_sec).fract();
        let sway = SWAY_PX * (progress * TAU).sin();
        Some(([self.left, progress], sway))
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Snowfall {
    pub flakes: Vec<Snowflake>,
}

impl Snowfall {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::with_count(rng, SNOWFLAKE_COUNT)
    }

    pub fn with_count<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Self {
        let flakes = (0..count)
            .map(|_| Snowflake {
                left: rng.gen::<f32>(),
                duration_sec: 5.0 + rng.gen::<f32>() * 10.0,
                delay_sec: rng.gen::<f32>() * 5.0,
                size_px: 1.5 + rng.gen::<f32>() * 3.0,
                opacity: 0.4 + rng.gen::<f32>() * 0.6,
            })
            .collect();
        Self { flakes }
    }
}

/// Snow as the frame loop sees it: the flakes, the layer's fade-in opacity
/// and the seconds since the layer appeared (the flakes' own clock).
#[derive(Clone, Copy, Debug)]
pub struct SnowView<'a> {
    pub snowfall: &'a Snowfall,
    pub opacity: f32,
    pub elapsed_sec: f32,
}

/// Snow shown only while lit. Every time the lights come on a fresh layout
/// is drawn and fades in over `fade_in_sec`.
#[derive(Debug)]
pub struct SnowLayer {
    rng: StdRng,
    fade_in_sec: f32,
    active: Option<(Snowfall, f32)>,
}

impl SnowLayer {
    pub fn new(rng: StdRng, fade_in_sec: f32) -> Self {
        Self {
            rng,
            fade_in_sec,
            active: None,
        }
    }

    pub fn update(&mut self, lit: bool, time_sec: f32) -> Option<SnowView<'_>> {
        if !lit {
            if self.active.take().is_some() {
                log::debug!("[snow] cleared");
            }
            return None;
        }
        if self.active.is_none() {
            self.active = Some((Snowfall::generate(&mut self.rng), time_sec));
        }
        let fade_in_sec = self.fade_in_sec;
        let (snowfall, since) = self.active.as_ref()?;
        let elapsed_sec = (time_sec - since).max(0.0);
        let opacity = if fade_in_sec > 0.0 {
            (elapsed_sec / fade_in_sec).min(1.0)
        } else {
            1.0
        };
        Some(SnowView {
            snowfall,
            opacity,
            elapsed_sec,
        })
    }
}
