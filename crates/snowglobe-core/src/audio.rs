//! Audio engine: one lazily created context, a one-shot chime and the
//! looping melody.
//!
//! Synthesis is described as `ToneSpec`s timed in absolute audio-clock
//! seconds and handed to an `AudioBackend`. Once a tone is handed over it
//! plays on its own, so late scheduler ticks never shift notes that are
//! already queued.

use crate::constants::*;
use crate::melody::{MelodyParams, MelodyScheduler, NoteEvent, ScoreEntry, JINGLE_BELLS};
use rand::prelude::*;
use smallvec::SmallVec;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio subsystem unavailable: {0}")]
    Unavailable(String),
    #[error("synthesis failed: {0}")]
    Synthesis(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
}

/// One automation event on a tone's gain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EnvelopeStep {
    Set { value: f32, at: f64 },
    Linear { value: f32, at: f64 },
    Exponential { value: f32, at: f64 },
}

impl EnvelopeStep {
    pub fn at(&self) -> f64 {
        match *self {
            EnvelopeStep::Set { at, .. }
            | EnvelopeStep::Linear { at, .. }
            | EnvelopeStep::Exponential { at, .. } => at,
        }
    }

    pub fn value(&self) -> f32 {
        match *self {
            EnvelopeStep::Set { value, .. }
            | EnvelopeStep::Linear { value, .. }
            | EnvelopeStep::Exponential { value, .. } => value,
        }
    }
}

pub type Envelope = SmallVec<[EnvelopeStep; 4]>;

/// A single oscillator voice, fully timed on the audio clock.
#[derive(Clone, Debug, PartialEq)]
pub struct ToneSpec {
    pub waveform: Waveform,
    pub frequency_hz: f32,
    pub start: f64,
    pub stop: f64,
    pub envelope: Envelope,
    /// Stereo position in `[-1, 1]`; `None` routes straight to the output.
    pub pan: Option<f32>,
}

/// Host audio context.
pub trait AudioBackend {
    /// Audio clock in seconds.
    fn current_time(&self) -> f64;
    /// Resume if the host suspended the context (autoplay policy).
    fn resume_if_suspended(&self) -> Result<(), AudioError>;
    fn play_tone(&self, tone: &ToneSpec) -> Result<(), AudioError>;
    fn close(&self) -> Result<(), AudioError> {
        Ok(())
    }
}

/// Build the four shimmering partials of a glass chime starting at `now`.
pub fn chime_tones<R: Rng + ?Sized>(now: f64, rng: &mut R) -> SmallVec<[ToneSpec; 4]> {
    CHIME_PARTIALS_HZ
        .iter()
        .enumerate()
        .map(|(i, &base)| {
            let frequency_hz = base + rng.gen_range(-CHIME_JITTER_HZ..CHIME_JITTER_HZ);
            let peak = CHIME_PEAK_GAIN - i as f32 * CHIME_PEAK_STEP;
            let decay_end = now + CHIME_DECAY_MIN_SEC + rng.gen::<f64>() * CHIME_DECAY_JITTER_SEC;
            let pan = rng.gen_range(-1.0f32..1.0);
            let mut envelope = Envelope::new();
            envelope.push(EnvelopeStep::Set { value: 0.0, at: now });
            envelope.push(EnvelopeStep::Linear {
                value: peak,
                at: now + CHIME_ATTACK_SEC,
            });
            envelope.push(EnvelopeStep::Exponential {
                value: CHIME_FLOOR_GAIN,
                at: decay_end,
            });
            ToneSpec {
                waveform: Waveform::Sine,
                frequency_hz,
                start: now,
                stop: now + CHIME_STOP_SEC,
                envelope,
                pan: Some(pan),
            }
        })
        .collect()
}

/// Soft triangle note with attack, slight decay and release.
pub fn note_tone(event: &NoteEvent) -> ToneSpec {
    let t = event.start_time_sec;
    let d = event.duration_sec;
    let mut envelope = Envelope::new();
    envelope.push(EnvelopeStep::Set { value: 0.0, at: t });
    envelope.push(EnvelopeStep::Linear {
        value: NOTE_PEAK_GAIN,
        at: t + NOTE_ATTACK_SEC,
    });
    envelope.push(EnvelopeStep::Linear {
        value: NOTE_SUSTAIN_GAIN,
        at: t + d * NOTE_SUSTAIN_FRACTION,
    });
    envelope.push(EnvelopeStep::Linear {
        value: 0.0,
        at: t + d,
    });
    ToneSpec {
        waveform: Waveform::Triangle,
        frequency_hz: event.frequency_hz,
        start: t,
        stop: t + d,
        envelope,
        pan: None,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MelodyTransition {
    Started,
    Stopped,
    Unchanged,
}

pub type BackendFactory<B> = Box<dyn FnMut() -> Result<B, AudioError>>;

/// Owns the single audio context and the melody scheduler.
///
/// The context is created on first use through `factory` and then reused for
/// the engine's lifetime. Every synthesis failure is logged and swallowed.
pub struct AudioEngine<B: AudioBackend> {
    factory: BackendFactory<B>,
    backend: Option<B>,
    scheduler: MelodyScheduler,
    rng: StdRng,
    pending: Vec<NoteEvent>,
}

impl<B: AudioBackend> AudioEngine<B> {
    pub fn new(factory: BackendFactory<B>, rng: StdRng) -> Self {
        Self::with_score(factory, rng, JINGLE_BELLS, MelodyParams::default())
    }

    pub fn with_score(
        factory: BackendFactory<B>,
        rng: StdRng,
        score: &'static [ScoreEntry],
        params: MelodyParams,
    ) -> Self {
        Self {
            factory,
            backend: None,
            scheduler: MelodyScheduler::new(score, params),
            rng,
            pending: Vec::new(),
        }
    }

    pub fn scheduler(&self) -> &MelodyScheduler {
        &self.scheduler
    }

    pub fn is_playing(&self) -> bool {
        self.scheduler.is_playing()
    }

    pub fn has_context(&self) -> bool {
        self.backend.is_some()
    }

    /// Lazily create the context, then resume it if the host suspended it.
    fn context(&mut self) -> Result<&B, AudioError> {
        if self.backend.is_none() {
            let backend = (self.factory)()?;
            log::info!("[audio] context created");
            self.backend = Some(backend);
        }
        let backend = self
            .backend
            .as_ref()
            .ok_or_else(|| AudioError::Unavailable("no context".into()))?;
        backend.resume_if_suspended()?;
        Ok(backend)
    }

    /// Fire-and-forget chime; never touches melody state.
    pub fn play_chime(&mut self) {
        if let Err(e) = self.try_play_chime() {
            log::error!("[audio] chime failed: {}", e);
        }
    }

    fn try_play_chime(&mut self) -> Result<(), AudioError> {
        let now = self.context()?.current_time();
        let tones = chime_tones(now, &mut self.rng);
        let backend = self
            .backend
            .as_ref()
            .ok_or_else(|| AudioError::Unavailable("no context".into()))?;
        for tone in &tones {
            backend.play_tone(tone)?;
        }
        Ok(())
    }

    /// Start or stop the melody. Starting while playing and stopping while
    /// idle are no-ops. Starting queues the first due notes immediately.
    pub fn set_melody_playing(&mut self, playing: bool) -> MelodyTransition {
        if !playing {
            return if self.scheduler.stop() {
                log::info!("[audio] melody stopped");
                MelodyTransition::Stopped
            } else {
                MelodyTransition::Unchanged
            };
        }
        if self.scheduler.is_playing() {
            return MelodyTransition::Unchanged;
        }
        let now = match self.context() {
            Ok(b) => b.current_time(),
            Err(e) => {
                log::error!("[audio] cannot start melody: {}", e);
                return MelodyTransition::Unchanged;
            }
        };
        self.scheduler.start(now);
        log::info!("[audio] melody started at {:.3}s", now);
        self.pump();
        MelodyTransition::Started
    }

    /// One scheduler tick: synthesize every note inside the look-ahead
    /// window. Returns how many notes were handed to the backend.
    pub fn pump(&mut self) -> usize {
        if !self.scheduler.is_playing() {
            return 0;
        }
        let Some(backend) = self.backend.as_ref() else {
            return 0;
        };
        let now = backend.current_time();
        self.pending.clear();
        self.scheduler.drain_due(now, &mut self.pending);
        let mut queued = 0;
        for ev in &self.pending {
            match backend.play_tone(&note_tone(ev)) {
                Ok(()) => queued += 1,
                Err(e) => log::error!("[audio] note {} failed: {}", ev.score_index, e),
            }
        }
        queued
    }

    /// Stop playback and release the context.
    pub fn dispose(&mut self) {
        self.scheduler.stop();
        if let Some(backend) = self.backend.take() {
            if let Err(e) = backend.close() {
                log::warn!("[audio] close failed: {}", e);
            }
        }
    }
}
