use crate::draw::{PaintInputs, Painter};
use crate::timer::{self, Cadence, HostTask};
use instant::Instant;
use snowglobe_core::render::{Frame, SceneRenderer};
use snowglobe_core::snow::SnowLayer;
use snowglobe_core::theme::ThemeCell;
use snowglobe_core::viewport::Viewport;
use snowglobe_core::{RotationState, ShakeTracker};
use std::cell::RefCell;
use std::rc::Rc;
use web_sys as web;

/// State touched once per display refresh.
pub struct FrameContext {
    pub theme: ThemeCell,
    pub rotation: RotationState,
    pub renderer: SceneRenderer,
    pub painter: Painter,
    pub canvas: web::HtmlCanvasElement,
    pub shakes: Rc<RefCell<ShakeTracker>>,
    pub snow: SnowLayer,
    pub started: Instant,
    /// Last painted frame, kept for ornament picking.
    pub last_frame: Option<Frame>,
}

impl FrameContext {
    pub fn frame(&mut self) {
        let now = Instant::now();
        let time_sec = (now - self.started).as_secs_f32();
        let theme = self.theme.get();

        let angle = self.rotation.step(theme);
        let frame = self.renderer.render(angle, theme);

        self.shakes.borrow_mut().prune(now);
        let shakes = self.shakes.borrow();
        let inputs = PaintInputs {
            viewport: Viewport::fit(self.canvas.width() as f32, self.canvas.height() as f32),
            time_sec,
            now,
            shakes: &shakes,
            snow: self.snow.update(theme.is_lit(), time_sec),
        };
        if let Err(e) = self.painter.paint(&frame, &inputs) {
            log::error!("paint error: {:?}", e);
        }
        drop(shakes);
        self.last_frame = Some(frame);
    }
}

/// Start the requestAnimationFrame loop; cancel the returned task on teardown.
pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) -> HostTask {
    timer::spawn_repeating(Cadence::AnimationFrame, move || {
        frame_ctx.borrow_mut().frame();
    })
}
