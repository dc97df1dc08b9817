use crate::constants::{MELODY_BPM, MELODY_START_DELAY_SEC, SCHEDULE_AHEAD_SEC};

/// Pitches used by the looping melody.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pitch {
    C4,
    D4,
    E4,
    F4,
    G4,
    A4,
    B4,
    C5,
    D5,
    E5,
    F5,
    G5,
}

impl Pitch {
    pub fn hz(self) -> f32 {
        match self {
            Pitch::C4 => 261.63,
            Pitch::D4 => 293.66,
            Pitch::E4 => 329.63,
            Pitch::F4 => 349.23,
            Pitch::G4 => 392.00,
            Pitch::A4 => 440.00,
            Pitch::B4 => 493.88,
            Pitch::C5 => 523.25,
            Pitch::D5 => 587.33,
            Pitch::E5 => 659.25,
            Pitch::F5 => 698.46,
            Pitch::G5 => 783.99,
        }
    }
}

/// One step of a score: a pitch (or a rest) held for some beats.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoreEntry {
    pub pitch: Option<Pitch>,
    pub beats: f32,
}

const fn note(pitch: Pitch, beats: f32) -> ScoreEntry {
    ScoreEntry {
        pitch: Some(pitch),
        beats,
    }
}

/// Jingle Bells chorus, looped forever while lit.
pub const JINGLE_BELLS: &[ScoreEntry] = &[
    note(Pitch::E5, 1.0),
    note(Pitch::E5, 1.0),
    note(Pitch::E5, 2.0),
    note(Pitch::E5, 1.0),
    note(Pitch::E5, 1.0),
    note(Pitch::E5, 2.0),
    note(Pitch::E5, 1.0),
    note(Pitch::G5, 1.0),
    note(Pitch::C5, 1.5),
    note(Pitch::D5, 0.5),
    note(Pitch::E5, 4.0),
    note(Pitch::F5, 1.0),
    note(Pitch::F5, 1.0),
    note(Pitch::F5, 1.5),
    note(Pitch::F5, 0.5),
    note(Pitch::F5, 1.0),
    note(Pitch::E5, 1.0),
    note(Pitch::E5, 1.0),
    note(Pitch::E5, 1.0),
    note(Pitch::E5, 1.0),
    note(Pitch::D5, 1.0),
    note(Pitch::D5, 1.0),
    note(Pitch::E5, 1.0),
    note(Pitch::D5, 2.0),
    note(Pitch::G5, 2.0),
];

/// Tempo and look-ahead timing for the scheduler.
///
/// - `bpm`: beats per minute
/// - `schedule_ahead_sec`: how far past the audio clock notes are queued
/// - `start_delay_sec`: gap between pressing play and the first note
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MelodyParams {
    pub bpm: f32,
    pub schedule_ahead_sec: f64,
    pub start_delay_sec: f64,
}

impl Default for MelodyParams {
    fn default() -> Self {
        Self {
            bpm: MELODY_BPM,
            schedule_ahead_sec: SCHEDULE_AHEAD_SEC,
            start_delay_sec: MELODY_START_DELAY_SEC,
        }
    }
}

impl MelodyParams {
    #[inline]
    pub fn seconds_per_beat(&self) -> f64 {
        60.0 / self.bpm as f64
    }
}

/// A note ready for synthesis, timed on the audio clock.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NoteEvent {
    pub score_index: usize,
    pub frequency_hz: f32,
    pub start_time_sec: f64,
    pub duration_sec: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Playing,
}

/// Look-ahead scheduler walking a fixed score in a loop.
///
/// Typical usage:
/// - `start(now)` when playback is requested (no-op if already playing)
/// - call `drain_due(now, &mut out)` from a short wall-clock timer; every
///   note whose start falls inside the look-ahead window is emitted with an
///   absolute audio-clock start time
/// - `stop()` to go idle; position is reset on the next `start`
#[derive(Clone, Debug)]
pub struct MelodyScheduler {
    pub params: MelodyParams,
    score: &'static [ScoreEntry],
    state: PlaybackState,
    next_note_time: f64,
    score_index: usize,
}

impl MelodyScheduler {
    pub fn new(score: &'static [ScoreEntry], params: MelodyParams) -> Self {
        Self {
            params,
            score,
            state: PlaybackState::Idle,
            next_note_time: 0.0,
            score_index: 0,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn next_note_time(&self) -> f64 {
        self.next_note_time
    }

    pub fn score_index(&self) -> usize {
        self.score_index
    }

    /// Idle -> Playing. Returns `false` (and changes nothing) if already playing.
    pub fn start(&mut self, now_sec: f64) -> bool {
        if self.is_playing() {
            return false;
        }
        self.state = PlaybackState::Playing;
        self.score_index = 0;
        self.next_note_time = now_sec + self.params.start_delay_sec;
        true
    }

    /// Playing -> Idle. Returns `false` if already idle.
    pub fn stop(&mut self) -> bool {
        if !self.is_playing() {
            return false;
        }
        self.state = PlaybackState::Idle;
        true
    }

    /// Emit every note starting before `now + schedule_ahead`. Rests emit
    /// nothing but still advance time.
    pub fn drain_due(&mut self, now_sec: f64, out_events: &mut Vec<NoteEvent>) {
        if !self.is_playing() || self.score.is_empty() {
            return;
        }
        let seconds_per_beat = self.params.seconds_per_beat();
        let horizon = now_sec + self.params.schedule_ahead_sec;
        while self.next_note_time < horizon {
            let entry = self.score[self.score_index];
            let duration_sec = entry.beats as f64 * seconds_per_beat;
            if let Some(pitch) = entry.pitch {
                out_events.push(NoteEvent {
                    score_index: self.score_index,
                    frequency_hz: pitch.hz(),
                    start_time_sec: self.next_note_time,
                    duration_sec,
                });
            }
            // A zero-length score would never advance the clock.
            if duration_sec <= 0.0 {
                log::warn!("[melody] non-positive duration at {}", self.score_index);
                self.next_note_time = horizon;
            } else {
                self.next_note_time += duration_sec;
            }
            self.score_index = (self.score_index + 1) % self.score.len();
        }
    }
}
