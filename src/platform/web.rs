//! Browser scheduler backed by `requestAnimationFrame` and `setTimeout`

use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use super::scheduler::{FrameHandle, Scheduler, TimerHandle, TimerKind};

/// Frame callback, receives the `requestAnimationFrame` timestamp
pub type FrameCallback = Rc<dyn Fn(f64)>;
/// Timer callback
pub type TimerCallback = Rc<dyn Fn(TimerKind)>;

/// Routes browser callbacks back into the host.
///
/// Cheap to clone; the host builds one per borrow of its game state.
#[derive(Clone)]
pub struct WebScheduler {
    window: web_sys::Window,
    on_frame: FrameCallback,
    on_timer: TimerCallback,
}

impl WebScheduler {
    pub fn new(window: web_sys::Window, on_frame: FrameCallback, on_timer: TimerCallback) -> Self {
        Self {
            window,
            on_frame,
            on_timer,
        }
    }
}

impl Scheduler for WebScheduler {
    fn request_frame(&mut self) -> Option<FrameHandle> {
        let cb = self.on_frame.clone();
        let closure = Closure::once_into_js(move |time: f64| cb(time));
        match self
            .window
            .request_animation_frame(closure.unchecked_ref())
        {
            Ok(id) => Some(FrameHandle(id)),
            Err(e) => {
                log::error!("requestAnimationFrame failed: {:?}", e);
                None
            }
        }
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if let Err(e) = self.window.cancel_animation_frame(handle.0) {
            log::warn!("cancelAnimationFrame failed: {:?}", e);
        }
    }

    fn set_timeout(&mut self, kind: TimerKind, delay_ms: u32) -> Option<TimerHandle> {
        let cb = self.on_timer.clone();
        let closure = Closure::once_into_js(move || cb(kind));
        let delay = i32::try_from(delay_ms).unwrap_or(i32::MAX);
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(closure.unchecked_ref(), delay)
        {
            Ok(id) => Some(TimerHandle(id)),
            Err(e) => {
                log::error!("setTimeout failed: {:?}", e);
                None
            }
        }
    }

    fn clear_timeout(&mut self, handle: TimerHandle) {
        self.window.clear_timeout_with_handle(handle.0);
    }
}
