use snowglobe_core::{CancelToken, TaskHandle};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

#[derive(Clone, Copy, Debug)]
pub enum Cadence {
    AnimationFrame,
    TimeoutMs(i32),
}

type SharedClosure = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// A self-rescheduling browser callback. Cancelling clears the queued
/// callback and drops the closure, which also breaks its self-reference.
pub struct HostTask {
    cadence: Cadence,
    token: CancelToken,
    pending: Rc<Cell<Option<i32>>>,
    closure: SharedClosure,
}

fn request(cadence: Cadence, cb: &js_sys::Function) -> Option<i32> {
    let w = web::window()?;
    let handle = match cadence {
        Cadence::AnimationFrame => w.request_animation_frame(cb),
        Cadence::TimeoutMs(ms) => w.set_timeout_with_callback_and_timeout_and_arguments_0(cb, ms),
    };
    match handle {
        Ok(h) => Some(h),
        Err(e) => {
            log::error!("[timer] schedule failed: {:?}", e);
            None
        }
    }
}

fn clear(cadence: Cadence, handle: i32) {
    if let Some(w) = web::window() {
        match cadence {
            Cadence::AnimationFrame => {
                _ = w.cancel_animation_frame(handle);
            }
            Cadence::TimeoutMs(_) => w.clear_timeout_with_handle(handle),
        }
    }
}

/// Run `body` on every tick of `cadence` until the returned task is cancelled.
pub fn spawn_repeating(cadence: Cadence, mut body: impl FnMut() + 'static) -> HostTask {
    let token = CancelToken::new();
    let pending: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
    let closure: SharedClosure = Rc::new(RefCell::new(None));

    let token_tick = token.clone();
    let pending_tick = pending.clone();
    let closure_tick = closure.clone();
    *closure.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        pending_tick.set(None);
        if token_tick.is_cancelled() {
            return;
        }
        body();
        if let Some(cb) = closure_tick.borrow().as_ref() {
            pending_tick.set(request(cadence, cb.as_ref().unchecked_ref()));
        }
    }) as Box<dyn FnMut()>));

    if let Some(cb) = closure.borrow().as_ref() {
        pending.set(request(cadence, cb.as_ref().unchecked_ref()));
    }
    HostTask {
        cadence,
        token,
        pending,
        closure,
    }
}

impl TaskHandle for HostTask {
    fn cancel(&mut self) {
        if !self.token.cancel() {
            return;
        }
        if let Some(handle) = self.pending.take() {
            clear(self.cadence, handle);
        }
        self.closure.borrow_mut().take();
    }
}
