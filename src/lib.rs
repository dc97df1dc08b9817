#![cfg(target_arch = "wasm32")]
use instant::Instant;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use snowglobe_core::render::SceneRenderer;
use snowglobe_core::snow::SnowLayer;
use snowglobe_core::theme::ThemeCell;
use snowglobe_core::{Gifts, RotationState, Scene, SceneConfig, ShakeTracker, TaskHandle, Theme};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

mod audio;
mod chrome;
mod constants;
mod dom;
mod draw;
mod events;
mod frame;
mod timer;

fn wire_canvas_resize(canvas: &web::HtmlCanvasElement) {
    dom::sync_canvas_backing_size(canvas);
    let canvas_resize = canvas.clone();
    let resize_closure = Closure::wrap(Box::new(move || {
        dom::sync_canvas_backing_size(&canvas_resize);
    }) as Box<dyn FnMut()>);
    if let Some(window) = web::window() {
        _ = window
            .add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref());
    }
    resize_closure.forget();
}

// Stop the melody timer and the frame loop when the page goes away.
fn wire_teardown(melody: Rc<RefCell<audio::MelodyPlayer>>, mut frame_task: timer::HostTask) {
    let closure = Closure::wrap(Box::new(move || {
        melody.borrow_mut().shutdown();
        frame_task.cancel();
        log::info!("[teardown] loops cancelled");
    }) as Box<dyn FnMut()>);
    if let Some(window) = web::window() {
        _ = window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("snowglobe-web starting");

    if let Err(e) = init() {
        log::error!("init error: {:?}", e);
    }
    Ok(())
}

fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let canvas: web::HtmlCanvasElement = document
        .get_element_by_id(constants::CANVAS_ID)
        .ok_or_else(|| anyhow::anyhow!("missing #{}", constants::CANVAS_ID))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    wire_canvas_resize(&canvas);

    let ctx2d: web::CanvasRenderingContext2d = canvas
        .get_context("2d")
        .map_err(|e| anyhow::anyhow!("{:?}", e))?
        .ok_or_else(|| anyhow::anyhow!("no 2d context"))?
        .dyn_into::<web::CanvasRenderingContext2d>()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;

    // Fresh sparkle layout per page load; everything downstream is seeded from it.
    let mut entropy = StdRng::from_entropy();
    let config = SceneConfig {
        seed: entropy.gen(),
        ..SceneConfig::default()
    };
    let scene = Scene::generate(config);
    log::info!(
        "[scene] {}x{} particles={} beads={} ornaments={}",
        config.height,
        config.width,
        scene.particles.len(),
        scene.beads.len(),
        scene.ornaments.len()
    );

    let theme = ThemeCell::new(Theme::Unlit);
    let audio = audio::build_engine(entropy.gen());
    let melody = Rc::new(RefCell::new(audio::MelodyPlayer::new(audio.clone())));
    let shakes = Rc::new(RefCell::new(ShakeTracker::default()));
    let gifts = Rc::new(RefCell::new(Gifts::initial()));

    chrome::apply_theme(&document, theme.get());
    events::controls::wire_theme_toggle(&document, theme.clone(), melody.clone());
    events::controls::wire_gifts(&document, gifts, audio.clone());

    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
        theme,
        rotation: RotationState::default(),
        renderer: SceneRenderer::new(scene, StdRng::seed_from_u64(entropy.gen())),
        painter: draw::Painter::new(ctx2d),
        canvas: canvas.clone(),
        shakes: shakes.clone(),
        snow: SnowLayer::new(
            StdRng::seed_from_u64(entropy.gen()),
            constants::SNOW_FADE_IN_SEC,
        ),
        started: Instant::now(),
        last_frame: None,
    }));

    events::pointer::wire_ornament_clicks(events::pointer::OrnamentWiring {
        canvas,
        frame_ctx: frame_ctx.clone(),
        shakes,
        audio,
    });

    let frame_task = frame::start_loop(frame_ctx);
    wire_teardown(melody, frame_task);
    Ok(())
}
