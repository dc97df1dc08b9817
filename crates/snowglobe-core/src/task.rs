//! Cancellation for self-rescheduling callbacks (frame loop, melody timer).
//!
//! The owner keeps the handle in a `TaskSlot`; the callback itself checks a
//! shared `CancelToken` before rescheduling, so a tick that is already running
//! when the owner cancels does not queue another one.

use std::cell::Cell;
use std::rc::Rc;

#[derive(Clone, Debug, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` only for the call that actually cancelled.
    pub fn cancel(&self) -> bool {
        !self.0.replace(true)
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// Host-side handle to a pending repeating callback.
pub trait TaskHandle {
    /// Stop the task and clear any callback the host still has queued.
    fn cancel(&mut self);
}

/// Holds at most one live task; installing a new one cancels the old.
#[derive(Debug)]
pub struct TaskSlot<H: TaskHandle> {
    active: Option<H>,
}

impl<H: TaskHandle> Default for TaskSlot<H> {
    fn default() -> Self {
        Self { active: None }
    }
}

impl<H: TaskHandle> TaskSlot<H> {
    pub fn install(&mut self, handle: H) {
        self.cancel();
        self.active = Some(handle);
    }

    /// Idempotent; returns whether a task was running.
    pub fn cancel(&mut self) -> bool {
        match self.active.take() {
            Some(mut h) => {
                h.cancel();
                true
            }
            None => false,
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }
}

impl<H: TaskHandle> Drop for TaskSlot<H> {
    fn drop(&mut self) {
        self.cancel();
    }
}
