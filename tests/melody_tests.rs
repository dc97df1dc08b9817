// Host-side tests for the look-ahead scheduler, the audio engine and the click
// handlers, using a scripted backend in place of the browser audio context.

use instant::Instant;
use rand::rngs::StdRng;
use rand::SeedableRng;
use snowglobe_core::constants::*;
use snowglobe_core::render::SceneRenderer;
use snowglobe_core::theme::ThemeCell;
use snowglobe_core::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

const THREE_NOTES: &[ScoreEntry] = &[
    ScoreEntry {
        pitch: Some(Pitch::E5),
        beats: 1.0,
    },
    ScoreEntry {
        pitch: Some(Pitch::E5),
        beats: 1.0,
    },
    ScoreEntry {
        pitch: Some(Pitch::E5),
        beats: 2.0,
    },
];

const WITH_REST: &[ScoreEntry] = &[
    ScoreEntry {
        pitch: Some(Pitch::C5),
        beats: 1.0,
    },
    ScoreEntry {
        pitch: None,
        beats: 1.0,
    },
    ScoreEntry {
        pitch: Some(Pitch::G5),
        beats: 1.0,
    },
];

const BEAT: f64 = 60.0 / 140.0;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

#[test]
fn notes_are_emitted_inside_the_window_in_order() {
    let mut s = MelodyScheduler::new(THREE_NOTES, MelodyParams::default());
    assert!(s.start(10.0));
    let t0 = 10.0 + MELODY_START_DELAY_SEC;
    let mut out = Vec::new();

    // Walk the clock in 100 ms ticks, like the host timer does.
    let mut now = 10.0;
    while now < 12.0 {
        s.drain_due(now, &mut out);
        now += 0.1;
    }
    let starts: Vec<f64> = out.iter().map(|e| e.start_time_sec).collect();
    assert!(starts.len() >= 4, "{starts:?}");
    assert!(approx(starts[0], t0));
    assert!(approx(starts[1], t0 + BEAT));
    assert!(approx(starts[2], t0 + 2.0 * BEAT));
    // Third note holds two beats, then the score loops.
    assert!(approx(starts[3], t0 + 4.0 * BEAT));
    assert_eq!(out[3].score_index, 0);
    assert!(approx(out[2].duration_sec, 2.0 * BEAT));
    for e in &out {
        assert_eq!(e.frequency_hz, Pitch::E5.hz());
    }
}

#[test]
fn nothing_is_scheduled_past_the_horizon() {
    let mut s = MelodyScheduler::new(JINGLE_BELLS, MelodyParams::default());
    s.start(0.0);
    let mut out = Vec::new();
    for tick in 0..50 {
        let now = tick as f64 * 0.1;
        s.drain_due(now, &mut out);
        for e in &out {
            assert!(e.start_time_sec < now + SCHEDULE_AHEAD_SEC);
        }
        assert!(s.next_note_time() >= now + SCHEDULE_AHEAD_SEC);
    }
}

#[test]
fn late_tick_catches_up_without_shifting_times() {
    let mut s = MelodyScheduler::new(THREE_NOTES, MelodyParams::default());
    s.start(0.0);
    let mut out = Vec::new();
    // A throttled timer fires once, two seconds late; the fifth note (2.24s) is
    // still beyond the 2.1s horizon.
    s.drain_due(2.0, &mut out);
    let t0 = MELODY_START_DELAY_SEC;
    let expected = [0.0, 1.0, 2.0, 4.0];
    assert_eq!(out.len(), expected.len());
    for (e, beats) in out.iter().zip(expected) {
        assert!(approx(e.start_time_sec, t0 + beats * BEAT));
    }
}

#[test]
fn rests_advance_time_silently() {
    let mut s = MelodyScheduler::new(WITH_REST, MelodyParams::default());
    s.start(0.0);
    let mut out = Vec::new();
    s.drain_due(1.0, &mut out);
    let t0 = MELODY_START_DELAY_SEC;
    assert_eq!(out.len(), 2);
    assert_eq!(out[0].frequency_hz, Pitch::C5.hz());
    assert_eq!(out[1].frequency_hz, Pitch::G5.hz());
    assert!(approx(out[1].start_time_sec, t0 + 2.0 * BEAT));
    assert_eq!(out[1].score_index, 2);
}

#[test]
fn start_and_stop_are_idempotent() {
    let mut s = MelodyScheduler::new(THREE_NOTES, MelodyParams::default());
    assert_eq!(s.state(), PlaybackState::Idle);
    assert!(!s.stop());
    assert!(s.start(1.0));
    let first = s.next_note_time();
    assert!(!s.start(5.0));
    assert_eq!(s.next_note_time(), first);
    assert!(s.stop());
    assert!(!s.stop());

    let mut out = Vec::new();
    s.drain_due(100.0, &mut out);
    assert!(out.is_empty());

    // Restart rewinds to the top of the score.
    let mut out = Vec::new();
    s.start(0.0);
    s.drain_due(0.6, &mut out);
    s.stop();
    s.start(20.0);
    assert_eq!(s.score_index(), 0);
    assert!(approx(s.next_note_time(), 20.0 + MELODY_START_DELAY_SEC));
}

#[test]
fn note_envelope_shape() {
    let ev = NoteEvent {
        score_index: 0,
        frequency_hz: 440.0,
        start_time_sec: 2.0,
        duration_sec: 1.0,
    };
    let tone = note_tone(&ev);
    assert_eq!(tone.waveform, Waveform::Triangle);
    assert_eq!(tone.pan, None);
    assert!(approx(tone.stop, 3.0));
    let steps: Vec<(f32, f64)> = tone.envelope.iter().map(|s| (s.value(), s.at())).collect();
    assert_eq!(steps.len(), 4);
    assert_eq!(steps[0].0, 0.0);
    assert!(approx(steps[1].1, 2.05));
    assert_eq!(steps[1].0, NOTE_PEAK_GAIN);
    assert!(approx(steps[2].1, 2.8));
    assert_eq!(steps[3].0, 0.0);
    assert!(approx(steps[3].1, 3.0));
}

#[test]
fn chime_partials_stay_near_their_base() {
    let mut rng = StdRng::seed_from_u64(9);
    for _ in 0..20 {
        let tones = chime_tones(3.0, &mut rng);
        assert_eq!(tones.len(), 4);
        for (tone, base) in tones.iter().zip(CHIME_PARTIALS_HZ) {
            assert_eq!(tone.waveform, Waveform::Sine);
            assert!((tone.frequency_hz - base).abs() <= CHIME_JITTER_HZ);
            let pan = tone.pan.unwrap();
            assert!((-1.0..=1.0).contains(&pan));
            assert!(approx(tone.start, 3.0));
            assert!(approx(tone.stop, 3.0 + CHIME_STOP_SEC));
            let decay = tone.envelope.last().unwrap();
            assert!(matches!(decay, EnvelopeStep::Exponential { .. }));
            assert!(decay.at() >= 5.5 && decay.at() <= 6.5);
        }
    }
}

#[derive(Default)]
struct Script {
    clock: Cell<f64>,
    created: Cell<usize>,
    resumed: Cell<usize>,
    closed: Cell<usize>,
    tones: RefCell<Vec<ToneSpec>>,
    fail_tones: Cell<bool>,
}

struct FakeBackend(Rc<Script>);

impl AudioBackend for FakeBackend {
    fn current_time(&self) -> f64 {
        self.0.clock.get()
    }

    fn resume_if_suspended(&self) -> Result<(), AudioError> {
        self.0.resumed.set(self.0.resumed.get() + 1);
        Ok(())
    }

    fn play_tone(&self, tone: &ToneSpec) -> Result<(), AudioError> {
        if self.0.fail_tones.get() {
            return Err(AudioError::Synthesis("oscillator refused".into()));
        }
        self.0.tones.borrow_mut().push(tone.clone());
        Ok(())
    }

    fn close(&self) -> Result<(), AudioError> {
        self.0.closed.set(self.0.closed.get() + 1);
        Ok(())
    }
}

fn engine(script: &Rc<Script>) -> AudioEngine<FakeBackend> {
    let s = script.clone();
    let factory: BackendFactory<FakeBackend> = Box::new(move || {
        s.created.set(s.created.get() + 1);
        Ok(FakeBackend(s.clone()))
    });
    AudioEngine::with_score(
        factory,
        StdRng::seed_from_u64(1),
        THREE_NOTES,
        MelodyParams::default(),
    )
}

#[test]
fn context_is_created_lazily_and_once() {
    let script = Rc::new(Script::default());
    let mut e = engine(&script);
    assert!(!e.has_context());
    assert_eq!(script.created.get(), 0);

    e.play_chime();
    e.play_chime();
    assert_eq!(e.set_melody_playing(true), MelodyTransition::Started);
    assert_eq!(script.created.get(), 1);
    assert!(script.resumed.get() >= 3);
    assert!(e.has_context());
}

#[test]
fn chime_does_not_touch_melody_state() {
    let script = Rc::new(Script::default());
    let mut e = engine(&script);
    e.play_chime();
    assert_eq!(script.tones.borrow().len(), 4);
    assert!(!e.is_playing());

    e.set_melody_playing(true);
    let before = e.scheduler().next_note_time();
    e.play_chime();
    assert!(e.is_playing());
    assert_eq!(e.scheduler().next_note_time(), before);
}

#[test]
fn melody_transitions_and_pump() {
    let script = Rc::new(Script::default());
    let mut e = engine(&script);
    script.clock.set(5.0);
    assert_eq!(e.set_melody_playing(false), MelodyTransition::Unchanged);
    assert_eq!(e.set_melody_playing(true), MelodyTransition::Started);
    assert_eq!(e.set_melody_playing(true), MelodyTransition::Unchanged);

    // The first note lands at 5.1, inside 5.0 + 0.1 only once the clock moves.
    script.clock.set(5.05);
    assert_eq!(e.pump(), 1);
    let first = script.tones.borrow()[0].clone();
    assert_eq!(first.waveform, Waveform::Triangle);
    assert!(approx(first.start, 5.0 + MELODY_START_DELAY_SEC));

    assert_eq!(e.set_melody_playing(false), MelodyTransition::Stopped);
    script.clock.set(9.0);
    assert_eq!(e.pump(), 0);
    assert_eq!(script.tones.borrow().len(), 1);
}

#[test]
fn synthesis_errors_are_swallowed() {
    let script = Rc::new(Script::default());
    script.fail_tones.set(true);
    let mut e = engine(&script);
    e.play_chime();
    assert_eq!(e.set_melody_playing(true), MelodyTransition::Started);
    script.clock.set(1.0);
    assert_eq!(e.pump(), 0);
    assert!(e.is_playing());
}

#[test]
fn unavailable_context_leaves_melody_idle() {
    let attempts = Rc::new(Cell::new(0));
    let a = attempts.clone();
    let factory: BackendFactory<FakeBackend> = Box::new(move || {
        a.set(a.get() + 1);
        Err(AudioError::Unavailable("blocked".into()))
    });
    let mut e = AudioEngine::new(factory, StdRng::seed_from_u64(2));
    e.play_chime();
    assert_eq!(e.set_melody_playing(true), MelodyTransition::Unchanged);
    assert!(!e.is_playing());
    assert!(!e.has_context());
    assert_eq!(e.pump(), 0);
    // Nothing was created, so each request tries again.
    assert_eq!(attempts.get(), 2);
}

#[test]
fn dispose_stops_and_closes() {
    let script = Rc::new(Script::default());
    let mut e = engine(&script);
    e.set_melody_playing(true);
    e.dispose();
    assert!(!e.is_playing());
    assert!(!e.has_context());
    assert_eq!(script.closed.get(), 1);
    e.dispose();
    assert_eq!(script.closed.get(), 1);
}

#[test]
fn gift_clicks_chime_every_time() {
    let script = Rc::new(Script::default());
    let mut e = engine(&script);
    let mut gifts = Gifts::initial();

    assert_eq!(on_gift_click(&mut gifts, &mut e, "2"), Some(true));
    assert_eq!(on_gift_click(&mut gifts, &mut e, "2"), Some(false));
    assert_eq!(script.tones.borrow().len(), 8);
    assert_eq!(gifts, Gifts::initial());
    assert!(!e.is_playing());

    // Unknown ids still chime but change nothing.
    assert_eq!(on_gift_click(&mut gifts, &mut e, "9"), None);
    assert_eq!(script.tones.borrow().len(), 12);
    assert_eq!(gifts, Gifts::initial());
}

#[test]
fn ornament_hit_shakes_and_chimes() {
    let script = Rc::new(Script::default());
    let mut e = engine(&script);
    let mut shakes = ShakeTracker::default();
    let mut r = SceneRenderer::new(
        Scene::generate(SceneConfig::default()),
        StdRng::seed_from_u64(3),
    );
    let frame = r.render(1.1, Theme::Lit);
    let target = *frame.ornaments().find(|o| o.interactive).unwrap();
    let now = Instant::now();

    let hit = on_ornament_click(&frame, &mut shakes, &mut e, [target.x, target.y], now);
    let index = hit.unwrap();
    assert!(shakes.is_shaking(index, now));
    assert_eq!(shakes.active_count(), 1);
    assert_eq!(script.tones.borrow().len(), 4);
    assert!(!e.is_playing());
}

#[test]
fn ornament_miss_is_silent() {
    let script = Rc::new(Script::default());
    let mut e = engine(&script);
    let mut shakes = ShakeTracker::default();
    let mut r = SceneRenderer::new(
        Scene::generate(SceneConfig::default()),
        StdRng::seed_from_u64(3),
    );
    let frame = r.render(1.1, Theme::Lit);

    let hit = on_ornament_click(&frame, &mut shakes, &mut e, [-290.0, 690.0], Instant::now());
    assert_eq!(hit, None);
    assert_eq!(shakes.active_count(), 0);
    assert!(script.tones.borrow().is_empty());
    assert_eq!(script.created.get(), 0);
}

#[test]
fn only_the_theme_switch_drives_the_melody() {
    let script = Rc::new(Script::default());
    let mut e = engine(&script);
    let theme = ThemeCell::new(Theme::Unlit);

    assert_eq!(
        on_theme_toggle(&theme, &mut e),
        (Theme::Lit, MelodyTransition::Started)
    );
    assert!(e.is_playing());

    let mut gifts = Gifts::initial();
    on_gift_click(&mut gifts, &mut e, "1");
    let mut shakes = ShakeTracker::default();
    let mut r = SceneRenderer::new(
        Scene::generate(SceneConfig::default()),
        StdRng::seed_from_u64(3),
    );
    let frame = r.render(1.1, Theme::Lit);
    on_ornament_click(&frame, &mut shakes, &mut e, [-290.0, 690.0], Instant::now());
    assert!(e.is_playing());
    assert_eq!(theme.get(), Theme::Lit);

    assert_eq!(
        on_theme_toggle(&theme, &mut e),
        (Theme::Unlit, MelodyTransition::Stopped)
    );
    assert!(!e.is_playing());
}
