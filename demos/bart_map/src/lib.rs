// Copyright 2026 the Meander Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web demo: animated BART trips over a basemap.
//!
//! Mounts the full stack on a canvas — [`RafScheduler`] for ticks,
//! [`CanvasHost`] for drawing and camera gestures, and the engine in
//! between — over the San Francisco dataset: two stations, two static
//! connecting edges, and a handful of synthesized trips sweeping the
//! peninsula on a 1800-unit loop.
//!
//! Build with: `wasm-pack build --target web demos/bart_map`
//!
//! Then serve an `index.html` with a `<canvas id="map">` and call
//! `mount("map", tileTemplate, accessToken)` from JS.
//!
//! [`RafScheduler`]: meander_backend_web::RafScheduler
//! [`CanvasHost`]: meander_backend_web::CanvasHost

// This crate only runs in the browser; suppress dead-code warnings when
// cargo-checking on a native host target.
#![cfg_attr(
    not(target_arch = "wasm32"),
    allow(dead_code, reason = "this crate only runs in the browser")
)]

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::Point;
use wasm_bindgen::JsCast as _;
use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

use meander_backend_web::{BasemapConfig, CanvasHost, RafScheduler};
use meander_core::config::{AccessToken, EngineConfig};
use meander_core::dataset::{SceneData, StationPoint, StaticEdge};
use meander_core::engine::Engine;
use meander_core::layer::Styles;
use meander_core::trace::Tracer;
use meander_core::trip::TripRecord;
use meander_core::viewport::ViewportState;

const INITIAL_VIEWPORT: ViewportState = ViewportState {
    longitude: -122.41669,
    latitude: 37.7853,
    zoom: 13.0,
    pitch: 0.0,
    bearing: 0.0,
};

struct App {
    engine: Engine,
    host: CanvasHost,
}

thread_local! {
    /// Keeps the mounted app alive for the page's lifetime.
    static APP: RefCell<Option<Rc<RefCell<App>>>> = const { RefCell::new(None) };
}

/// Mounts the animation onto the canvas with the given element id.
///
/// `tile_template` is a raster tile URL with `{z}`, `{x}`, `{y}`, and
/// `{token}` placeholders; `access_token` is passed through opaquely.
#[wasm_bindgen]
pub fn mount(canvas_id: &str, tile_template: &str, access_token: &str) -> Result<(), JsValue> {
    let document = web_sys::window()
        .ok_or_else(|| JsValue::from_str("no window"))?
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let canvas: HtmlCanvasElement = document
        .get_element_by_id(canvas_id)
        .ok_or_else(|| JsValue::from_str("canvas not found"))?
        .dyn_into()?;

    let config = EngineConfig {
        loop_length: 1800,
        animation_speed: 3,
        trail_length: 180,
        initial_viewport: INITIAL_VIEWPORT,
    };
    let basemap = BasemapConfig {
        tile_url_template: String::from(tile_template),
        access_token: AccessToken::new(access_token),
    };

    let engine = Engine::new(config, Styles::default(), scene())
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    let host = CanvasHost::new(canvas, basemap);
    let app = Rc::new(RefCell::new(App { engine, host }));

    let mut scheduler = RafScheduler::new();
    {
        let app = Rc::clone(&app);
        let mut hook_scheduler = scheduler.clone();
        scheduler.set_on_frame(move || {
            let mut app = app.borrow_mut();
            let App { engine, host } = &mut *app;
            engine.on_frame(&mut hook_scheduler, host, &mut Tracer::none());
        });
    }

    {
        let source = Rc::clone(&app);
        let sink = Rc::clone(&app);
        let app = app.borrow();
        app.host.install_camera_controls(
            move || source.borrow().engine.viewport(),
            move |update| sink.borrow_mut().engine.apply_camera(update),
        )?;
    }

    app.borrow_mut()
        .engine
        .start(&mut scheduler, &mut Tracer::none())
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    APP.with(|slot| {
        *slot.borrow_mut() = Some(app);
    });
    Ok(())
}

/// The original demo scene: Colma and Civic Center, the two downtown
/// edges, and synthesized trips between them.
fn scene() -> SceneData {
    let stations = vec![
        StationPoint {
            name: String::from("Colma"),
            passengers: 4214,
            position: Point::new(-122.466233, 37.684638),
        },
        StationPoint {
            name: String::from("Civic Center"),
            passengers: 24_798,
            position: Point::new(-122.413756, 37.779528),
        },
    ];
    let edges = vec![
        StaticEdge::new(
            Point::new(-122.41669, 37.7653),
            Point::new(-122.42669, 37.781),
        ),
        StaticEdge::new(
            Point::new(-122.41669, 37.7753),
            Point::new(-122.41669, 37.781),
        ),
    ];
    let trips = vec![
        // Colma to Civic Center along the peninsula.
        trip(&[
            (-122.466233, 37.684638, 0),
            (-122.458000, 37.706000, 240),
            (-122.444000, 37.730000, 520),
            (-122.428000, 37.758000, 860),
            (-122.413756, 37.779528, 1140),
        ]),
        // A Mission loop, offset into the cycle.
        trip(&[
            (-122.419000, 37.765000, 300),
            (-122.407000, 37.770000, 560),
            (-122.404000, 37.782000, 820),
            (-122.413000, 37.790000, 1080),
            (-122.424000, 37.784000, 1340),
            (-122.419000, 37.765000, 1600),
        ]),
        // A short downtown shuttle that repeats early in the loop.
        trip(&[
            (-122.396000, 37.793000, 100),
            (-122.403000, 37.788000, 340),
            (-122.410000, 37.783000, 580),
        ]),
    ];
    SceneData {
        stations,
        edges,
        trips,
    }
}

fn trip(waypoints: &[(f64, f64, u64)]) -> TripRecord {
    let path = waypoints
        .iter()
        .map(|&(lon, lat, _)| Point::new(lon, lat))
        .collect();
    let timestamps = waypoints.iter().map(|&(_, _, t)| t).collect();
    TripRecord::new(path, timestamps).expect("waypoint lists are parallel by construction")
}
