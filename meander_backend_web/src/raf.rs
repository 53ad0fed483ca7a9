// Copyright 2026 the Meander Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `requestAnimationFrame` frame scheduler.
//!
//! [`RafScheduler`] maps the core [`FrameScheduler`] contract onto the
//! browser's `requestAnimationFrame`/`cancelAnimationFrame` pair. The engine
//! keeps the returned [`FrameHandle`] in an owned field; cancelling it
//! synchronously revokes the browser callback, so stopping the engine can
//! never leak a tick past teardown.
//!
//! Clones share one underlying scheduler, letting the frame hook re-arm
//! through its own clone while the application glue holds another.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use wasm_bindgen::JsCast as _;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

use meander_core::scheduler::{FrameHandle, FrameScheduler};

// Direct global bindings instead of `web_sys::Window` methods — avoids
// fetching (and unwrapping) the Window object on every frame.
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = performance, js_name = "now")]
    pub(crate) fn performance_now() -> f64;

    #[wasm_bindgen(js_name = "requestAnimationFrame")]
    fn request_animation_frame(callback: &JsValue) -> i32;

    #[wasm_bindgen(js_name = "cancelAnimationFrame")]
    fn cancel_animation_frame(id: i32);
}

type RafClosure = Closure<dyn FnMut(f64)>;

struct RafInner {
    /// The persistent JS closure registered with `requestAnimationFrame`.
    ///
    /// Captures only a `Weak` back-reference, so dropping the last
    /// scheduler clone actually frees the inner state.
    closure: RefCell<Option<RafClosure>>,

    /// Driver hook invoked each time an armed callback fires.
    on_frame: RefCell<Option<Box<dyn FnMut()>>>,

    /// Browser id of the armed callback.
    raf_id: Cell<Option<i32>>,

    /// Engine-facing handle of the armed callback.
    armed: Cell<Option<u64>>,

    /// Source for engine-facing handles.
    next_handle: Cell<u64>,
}

impl Drop for RafInner {
    fn drop(&mut self) {
        // A callback left pending would call into freed state.
        if let Some(id) = self.raf_id.take() {
            cancel_animation_frame(id);
        }
    }
}

/// Frame scheduler backed by `requestAnimationFrame`.
#[derive(Clone)]
pub struct RafScheduler {
    inner: Rc<RafInner>,
}

impl Default for RafScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl RafScheduler {
    /// Creates a scheduler with nothing armed and no frame hook.
    ///
    /// Call [`set_on_frame`](Self::set_on_frame) before the first
    /// `schedule`, or armed callbacks fire into nothing.
    #[must_use]
    pub fn new() -> Self {
        let inner = Rc::new(RafInner {
            closure: RefCell::new(None),
            on_frame: RefCell::new(None),
            raf_id: Cell::new(None),
            armed: Cell::new(None),
            next_handle: Cell::new(0),
        });

        let weak: Weak<RafInner> = Rc::downgrade(&inner);
        let closure = Closure::wrap(Box::new(move |_timestamp_ms: f64| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            // Cancelled between browser dispatch and delivery.
            if inner.armed.take().is_none() {
                return;
            }
            inner.raf_id.set(None);

            // The hook may re-arm via `schedule`; only `on_frame` is
            // borrowed while it runs.
            if let Some(hook) = inner.on_frame.borrow_mut().as_mut() {
                hook();
            }
        }) as Box<dyn FnMut(f64)>);
        *inner.closure.borrow_mut() = Some(closure);

        Self { inner }
    }

    /// Sets the hook invoked each time an armed callback fires.
    ///
    /// The hook typically borrows the application state and calls
    /// `Engine::on_frame` with a clone of this scheduler.
    pub fn set_on_frame(&self, hook: impl FnMut() + 'static) {
        *self.inner.on_frame.borrow_mut() = Some(Box::new(hook));
    }

    /// Returns `true` while a callback is armed.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.inner.armed.get().is_some()
    }
}

impl FrameScheduler for RafScheduler {
    fn schedule(&mut self) -> FrameHandle {
        let handle = self.inner.next_handle.get();
        self.inner.next_handle.set(handle + 1);
        self.inner.armed.set(Some(handle));

        if let Some(closure) = self.inner.closure.borrow().as_ref() {
            let id = request_animation_frame(closure.as_ref().unchecked_ref());
            self.inner.raf_id.set(Some(id));
        }
        FrameHandle(handle)
    }

    fn cancel(&mut self, handle: FrameHandle) {
        // Stale handles (already fired, or from an earlier arm) are no-ops.
        if self.inner.armed.get() != Some(handle.0) {
            return;
        }
        self.inner.armed.set(None);
        if let Some(id) = self.inner.raf_id.take() {
            cancel_animation_frame(id);
        }
    }
}

impl core::fmt::Debug for RafScheduler {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RafScheduler")
            .field("armed", &self.inner.armed.get())
            .field("next_handle", &self.inner.next_handle.get())
            .finish_non_exhaustive()
    }
}
