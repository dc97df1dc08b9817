use crate::audio::SharedAudio;
use crate::dom;
use crate::frame::FrameContext;
use instant::Instant;
use snowglobe_core::viewport::Viewport;
use snowglobe_core::{on_ornament_click, ShakeTracker};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

#[derive(Clone)]
pub struct OrnamentWiring {
    pub canvas: web::HtmlCanvasElement,
    pub frame_ctx: Rc<RefCell<FrameContext>>,
    pub shakes: Rc<RefCell<ShakeTracker>>,
    pub audio: SharedAudio,
}

/// Canvas clicks are mapped into tree space and offered to the ornaments.
/// A hit stops the event so nothing behind the ornament reacts.
pub fn wire_ornament_clicks(w: OrnamentWiring) {
    let canvas_for_listener = w.canvas.clone();
    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::MouseEvent| {
        let [px, py] = dom::pointer_canvas_px(&ev, &w.canvas);
        if !px.is_finite() || !py.is_finite() {
            return;
        }
        let viewport = Viewport::fit(w.canvas.width() as f32, w.canvas.height() as f32);
        let point = viewport.to_tree(px, py);
        let ctx = w.frame_ctx.borrow();
        let Some(frame) = ctx.last_frame.as_ref() else {
            return;
        };
        let hit = on_ornament_click(
            frame,
            &mut w.shakes.borrow_mut(),
            &mut *w.audio.borrow_mut(),
            point,
            Instant::now(),
        );
        if hit.is_some() {
            ev.stop_propagation();
        }
    }) as Box<dyn FnMut(_)>);
    _ = canvas_for_listener
        .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
    closure.forget();
}
