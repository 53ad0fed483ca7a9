// Copyright 2026 the Meander Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web backend for meander.
//!
//! This crate provides the browser integrations behind the core contracts:
//!
//! - [`RafScheduler`]: `requestAnimationFrame` frame scheduler
//! - [`CanvasHost`]: 2D canvas render host with a raster basemap substrate
//! - [`mercator`]: pure Web-Mercator projection and tile math
//!
//! Application glue owns the engine (typically inside an `Rc<RefCell<..>>`),
//! registers an [`RafScheduler::set_on_frame`] hook that calls
//! `Engine::on_frame`, and wires [`CanvasHost::install_camera_controls`]
//! into `Engine::apply_camera`.

pub mod mercator;

mod canvas_host;
mod raf;

pub use canvas_host::{BasemapConfig, CanvasHost};
pub use meander_core::host::RenderHost;
pub use raf::RafScheduler;

/// Returns `performance.now()` in milliseconds.
#[must_use]
pub fn now_ms() -> f64 {
    raf::performance_now()
}
