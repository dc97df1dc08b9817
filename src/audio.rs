use crate::timer::{self, Cadence, HostTask};
use snowglobe_core::constants::SCHEDULER_INTERVAL_MS;
use snowglobe_core::theme::ThemeCell;
use snowglobe_core::{
    on_theme_toggle, AudioBackend, AudioEngine, AudioError, EnvelopeStep, MelodyTransition,
    TaskSlot, Theme, ToneSpec, Waveform,
};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsValue;
use web_sys as web;

fn js_err(e: JsValue) -> AudioError {
    AudioError::Synthesis(format!("{:?}", e))
}

/// WebAudio implementation of the engine's backend.
pub struct WebAudio {
    ctx: web::AudioContext,
}

impl WebAudio {
    pub fn create() -> Result<Self, AudioError> {
        let ctx = web::AudioContext::new()
            .map_err(|e| AudioError::Unavailable(format!("{:?}", e)))?;
        Ok(Self { ctx })
    }
}

fn create_gain(ctx: &web::AudioContext) -> Result<web::GainNode, AudioError> {
    let g = web::GainNode::new(ctx).map_err(js_err)?;
    g.gain().set_value(0.0);
    Ok(g)
}

fn apply_envelope(param: &web::AudioParam, envelope: &[EnvelopeStep]) -> Result<(), AudioError> {
    for step in envelope {
        let scheduled = match *step {
            EnvelopeStep::Set { value, at } => param.set_value_at_time(value, at),
            EnvelopeStep::Linear { value, at } => param.linear_ramp_to_value_at_time(value, at),
            EnvelopeStep::Exponential { value, at } => {
                param.exponential_ramp_to_value_at_time(value, at)
            }
        };
        scheduled.map_err(js_err)?;
    }
    Ok(())
}

impl AudioBackend for WebAudio {
    fn current_time(&self) -> f64 {
        self.ctx.current_time()
    }

    fn resume_if_suspended(&self) -> Result<(), AudioError> {
        if self.ctx.state() == web::AudioContextState::Suspended {
            log::info!("[audio] resuming suspended context");
            _ = self.ctx.resume().map_err(js_err)?;
        }
        Ok(())
    }

    fn play_tone(&self, tone: &ToneSpec) -> Result<(), AudioError> {
        let src = web::OscillatorNode::new(&self.ctx).map_err(js_err)?;
        src.set_type(match tone.waveform {
            Waveform::Sine => web::OscillatorType::Sine,
            Waveform::Triangle => web::OscillatorType::Triangle,
        });
        src.frequency()
            .set_value_at_time(tone.frequency_hz, tone.start)
            .map_err(js_err)?;

        let gain = create_gain(&self.ctx)?;
        apply_envelope(&gain.gain(), &tone.envelope)?;
        src.connect_with_audio_node(&gain).map_err(js_err)?;

        let destination = self.ctx.destination();
        match tone.pan {
            Some(pan) => {
                let panner = web::StereoPannerNode::new(&self.ctx).map_err(js_err)?;
                panner.pan().set_value(pan.clamp(-1.0, 1.0));
                gain.connect_with_audio_node(&panner).map_err(js_err)?;
                panner
                    .connect_with_audio_node(&destination)
                    .map_err(js_err)?;
            }
            None => {
                gain.connect_with_audio_node(&destination)
                    .map_err(js_err)?;
            }
        }

        src.start_with_when(tone.start).map_err(js_err)?;
        src.stop_with_when(tone.stop).map_err(js_err)?;
        Ok(())
    }

    fn close(&self) -> Result<(), AudioError> {
        _ = self.ctx.close().map_err(js_err)?;
        Ok(())
    }
}

pub type SharedAudio = Rc<RefCell<AudioEngine<WebAudio>>>;

pub fn build_engine(seed: u64) -> SharedAudio {
    use rand::SeedableRng;
    let engine = AudioEngine::new(
        Box::new(WebAudio::create),
        rand::rngs::StdRng::seed_from_u64(seed),
    );
    Rc::new(RefCell::new(engine))
}

/// Drives the melody: owns the look-ahead timer that pumps the engine.
///
/// Only the theme toggle holds one of these.
pub struct MelodyPlayer {
    engine: SharedAudio,
    task: TaskSlot<HostTask>,
}

impl MelodyPlayer {
    pub fn new(engine: SharedAudio) -> Self {
        Self {
            engine,
            task: TaskSlot::default(),
        }
    }

    /// Flip the theme and bring the melody timer in line with it.
    pub fn toggle_theme(&mut self, theme: &ThemeCell) -> Theme {
        let (next, transition) = on_theme_toggle(theme, &mut *self.engine.borrow_mut());
        self.follow(transition);
        next
    }

    fn follow(&mut self, transition: MelodyTransition) {
        match transition {
            MelodyTransition::Started => {
                let engine = self.engine.clone();
                self.task.install(timer::spawn_repeating(
                    Cadence::TimeoutMs(SCHEDULER_INTERVAL_MS),
                    move || {
                        engine.borrow_mut().pump();
                    },
                ));
            }
            MelodyTransition::Stopped => {
                self.task.cancel();
            }
            MelodyTransition::Unchanged => {}
        }
    }

    /// Stop the loop and release the audio context.
    pub fn shutdown(&mut self) {
        self.engine.borrow_mut().set_melody_playing(false);
        self.task.cancel();
        self.engine.borrow_mut().dispose();
    }
}
