// Copyright 2026 the Meander Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! 2D canvas render host.
//!
//! [`CanvasHost`] draws the basemap substrate and the layer stack onto an
//! `HtmlCanvasElement`: raster tiles first, then each descriptor in the
//! order the stack dictates. Trail strokes fade with vertex age; station
//! radii are ground meters converted at the station's latitude.
//!
//! The host also owns the camera-interaction surface:
//! [`install_camera_controls`](CanvasHost::install_camera_controls) wires
//! pointer-drag pan and wheel zoom into a caller-supplied relay, which the
//! application glue forwards to `Engine::apply_camera`. The animation path
//! never touches the camera.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use wasm_bindgen::JsCast as _;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement, MouseEvent, WheelEvent,
};

use meander_core::config::AccessToken;
use meander_core::error::HostError;
use meander_core::host::RenderHost;
use meander_core::layer::{EdgeLayer, LayerDescriptor, Rgba8, StationLayer, TrailLayer};
use meander_core::viewport::{CameraUpdate, ViewportState};

use crate::mercator::{self, Projection, TileCoord};

/// Background fill drawn under the tiles while they load.
const BACKGROUND: &str = "#101418";

/// Coarse cap on cached tile images; beyond it the cache is cleared and the
/// visible tiles reload on the next frame.
const TILE_CACHE_CAP: usize = 512;

/// Highest tile zoom requested from the substrate.
const MAX_TILE_ZOOM: f64 = 19.0;

/// Basemap substrate configuration.
///
/// The access token is opaque: substituted into the URL template, never
/// parsed.
#[derive(Clone, Debug)]
pub struct BasemapConfig {
    /// URL template with `{z}`, `{x}`, `{y}`, and `{token}` placeholders.
    pub tile_url_template: String,
    /// Credential substituted for `{token}`.
    pub access_token: AccessToken,
}

impl BasemapConfig {
    fn tile_url(&self, tile: TileCoord) -> String {
        self.tile_url_template
            .replace("{z}", &tile.z.to_string())
            .replace("{x}", &tile.x.to_string())
            .replace("{y}", &tile.y.to_string())
            .replace("{token}", self.access_token.reveal())
    }
}

/// Render host drawing onto a 2D canvas.
pub struct CanvasHost {
    canvas: HtmlCanvasElement,
    basemap: BasemapConfig,
    context: Option<CanvasRenderingContext2d>,
    tiles: HashMap<TileCoord, HtmlImageElement>,
}

impl CanvasHost {
    /// Creates a host over `canvas`. The 2D context is acquired lazily, so
    /// draws report [`HostError::Unavailable`] until the surface is ready.
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement, basemap: BasemapConfig) -> Self {
        Self {
            canvas,
            basemap,
            context: None,
            tiles: HashMap::new(),
        }
    }

    /// Returns the backing canvas.
    #[must_use]
    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Installs pointer-drag pan and wheel-zoom listeners on the canvas.
    ///
    /// Each gesture becomes a [`CameraUpdate`] delivered to `relay`;
    /// `viewport` supplies the current camera so deltas can be scaled to
    /// the active zoom. Listeners live for the lifetime of the page.
    pub fn install_camera_controls(
        &self,
        viewport: impl Fn() -> ViewportState + 'static,
        relay: impl FnMut(CameraUpdate) + 'static,
    ) -> Result<(), JsValue> {
        let viewport = Rc::new(viewport);
        let relay = Rc::new(RefCell::new(relay));
        let anchor: Rc<Cell<Option<(i32, i32)>>> = Rc::new(Cell::new(None));

        {
            let anchor = Rc::clone(&anchor);
            let on_down = Closure::wrap(Box::new(move |event: MouseEvent| {
                anchor.set(Some((event.client_x(), event.client_y())));
            }) as Box<dyn FnMut(MouseEvent)>);
            self.canvas
                .add_event_listener_with_callback("mousedown", on_down.as_ref().unchecked_ref())?;
            on_down.forget();
        }

        for release in ["mouseup", "mouseleave"] {
            let anchor = Rc::clone(&anchor);
            let on_release = Closure::wrap(Box::new(move |_event: MouseEvent| {
                anchor.set(None);
            }) as Box<dyn FnMut(MouseEvent)>);
            self.canvas
                .add_event_listener_with_callback(release, on_release.as_ref().unchecked_ref())?;
            on_release.forget();
        }

        {
            let anchor = Rc::clone(&anchor);
            let viewport = Rc::clone(&viewport);
            let relay = Rc::clone(&relay);
            let on_move = Closure::wrap(Box::new(move |event: MouseEvent| {
                let Some((ax, ay)) = anchor.get() else {
                    return;
                };
                let (x, y) = (event.client_x(), event.client_y());
                anchor.set(Some((x, y)));

                let current = viewport();
                let update = pan_update(&current, f64::from(x - ax), f64::from(y - ay));
                relay.borrow_mut()(update);
            }) as Box<dyn FnMut(MouseEvent)>);
            self.canvas
                .add_event_listener_with_callback("mousemove", on_move.as_ref().unchecked_ref())?;
            on_move.forget();
        }

        {
            let on_wheel = Closure::wrap(Box::new(move |event: WheelEvent| {
                event.prevent_default();
                let current = viewport();
                let zoom = (current.zoom - event.delta_y() * 0.002).clamp(0.0, 22.0);
                relay.borrow_mut()(CameraUpdate {
                    zoom: Some(zoom),
                    ..CameraUpdate::default()
                });
            }) as Box<dyn FnMut(WheelEvent)>);
            self.canvas
                .add_event_listener_with_callback("wheel", on_wheel.as_ref().unchecked_ref())?;
            on_wheel.forget();
        }

        Ok(())
    }

    fn context(&mut self) -> Option<CanvasRenderingContext2d> {
        if self.context.is_none() {
            self.context = self
                .canvas
                .get_context("2d")
                .ok()
                .flatten()
                .and_then(|object| object.dyn_into::<CanvasRenderingContext2d>().ok());
        }
        self.context.clone()
    }

    fn draw_basemap(
        &mut self,
        ctx: &CanvasRenderingContext2d,
        viewport: &ViewportState,
        projection: &Projection,
        width: f64,
        height: f64,
    ) {
        let tile_zoom = viewport.zoom.floor().clamp(0.0, MAX_TILE_ZOOM);
        #[expect(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "tile zoom is clamped to [0, 19]"
        )]
        let z = tile_zoom as u8;
        let n = 1_i64 << i64::from(z);
        let tile_span = projection.world() / n as f64;
        let center = projection.center_world();

        #[expect(
            clippy::cast_possible_truncation,
            reason = "tile indices at zoom <= 19 fit comfortably in i64"
        )]
        let (center_x, center_y) = (
            (center.x / tile_span).floor() as i64,
            (center.y / tile_span).floor() as i64,
        );
        // Rotation-safe cover radius.
        let radius = 0.5 * (width * width + height * height).sqrt();
        #[expect(
            clippy::cast_possible_truncation,
            reason = "tile reach for any real canvas is a small positive count"
        )]
        let reach = (radius / tile_span).ceil() as i64 + 1;

        ctx.save();
        let _ = ctx.translate(width / 2.0, height / 2.0);
        let _ = ctx.rotate(projection.screen_rotation());

        for ty in (center_y - reach)..=(center_y + reach) {
            if ty < 0 || ty >= n {
                continue;
            }
            for tx in (center_x - reach)..=(center_x + reach) {
                // Wrap across the antimeridian.
                let wrapped = tx.rem_euclid(n);
                #[expect(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    reason = "wrapped indices are in [0, 2^z)"
                )]
                let tile = TileCoord {
                    z,
                    x: wrapped as u32,
                    y: ty as u32,
                };
                let origin_x = tx as f64 * tile_span - center.x;
                let origin_y = ty as f64 * tile_span - center.y;
                if let Some(image) = self.tile(tile)
                    && image.complete()
                    && image.natural_width() > 0
                {
                    let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(
                        &image, origin_x, origin_y, tile_span, tile_span,
                    );
                }
            }
        }

        ctx.restore();
    }

    /// Returns the cached tile image, kicking off a load on first request.
    fn tile(&mut self, tile: TileCoord) -> Option<HtmlImageElement> {
        if self.tiles.len() > TILE_CACHE_CAP {
            self.tiles.clear();
        }
        if let Some(image) = self.tiles.get(&tile) {
            return Some(image.clone());
        }
        let image = HtmlImageElement::new().ok()?;
        image.set_cross_origin(Some("anonymous"));
        image.set_src(&self.basemap.tile_url(tile));
        self.tiles.insert(tile, image.clone());
        Some(image)
    }

    fn draw_trails(ctx: &CanvasRenderingContext2d, projection: &Projection, layer: &TrailLayer) {
        ctx.set_line_width(layer.style.width);
        ctx.set_line_cap("round");
        ctx.set_stroke_style_str(&css_color(layer.style.color));

        let trail_length = layer.trail_length.max(1) as f64;
        for segment in &layer.segments {
            for pair in segment.positions.windows(2).zip(segment.timestamps.windows(2)) {
                let (points, timestamps) = pair;
                let from = projection.to_screen(points[0]);
                let to = projection.to_screen(points[1]);

                // Fade with the age of the newer vertex.
                let age = layer.time.units().saturating_sub(timestamps[1]) as f64;
                let freshness = (1.0 - age / trail_length).clamp(0.05, 1.0);
                ctx.set_global_alpha(freshness * f64::from(layer.style.color.a) / 255.0);

                ctx.begin_path();
                ctx.move_to(from.x, from.y);
                ctx.line_to(to.x, to.y);
                ctx.stroke();
            }
        }
        ctx.set_global_alpha(1.0);
    }

    fn draw_stations(
        ctx: &CanvasRenderingContext2d,
        projection: &Projection,
        layer: &StationLayer,
    ) {
        ctx.set_fill_style_str(&css_color(layer.style.color));
        for station in layer.stations.iter() {
            let center = projection.to_screen(station.position);
            let radius = layer.style.radius / projection.meters_per_pixel(station.position.y);
            ctx.begin_path();
            let _ = ctx.arc(center.x, center.y, radius, 0.0, core::f64::consts::TAU);
            ctx.fill();
        }
    }

    fn draw_edges(ctx: &CanvasRenderingContext2d, projection: &Projection, layer: &EdgeLayer) {
        ctx.set_line_width(layer.style.width);
        ctx.set_line_cap("round");
        ctx.set_stroke_style_str(&css_color(layer.style.color));
        for edge in layer.edges.iter() {
            let from = projection.to_screen(edge.source);
            let to = projection.to_screen(edge.target);
            ctx.begin_path();
            ctx.move_to(from.x, from.y);
            ctx.line_to(to.x, to.y);
            ctx.stroke();
        }
    }
}

impl RenderHost for CanvasHost {
    fn draw(
        &mut self,
        viewport: &ViewportState,
        layers: &[LayerDescriptor],
    ) -> Result<(), HostError> {
        let Some(ctx) = self.context() else {
            return Err(HostError::Unavailable);
        };
        let width = f64::from(self.canvas.width());
        let height = f64::from(self.canvas.height());
        if width <= 0.0 || height <= 0.0 {
            return Err(HostError::Unavailable);
        }

        let projection = Projection::new(viewport, width, height);

        ctx.set_global_alpha(1.0);
        ctx.set_fill_style_str(BACKGROUND);
        ctx.fill_rect(0.0, 0.0, width, height);
        self.draw_basemap(&ctx, viewport, &projection, width, height);

        for layer in layers {
            match layer {
                LayerDescriptor::Trails(trail) => Self::draw_trails(&ctx, &projection, trail),
                LayerDescriptor::Stations(stations) => {
                    Self::draw_stations(&ctx, &projection, stations);
                }
                LayerDescriptor::Edges(edges) => Self::draw_edges(&ctx, &projection, edges),
            }
        }
        Ok(())
    }
}

impl fmt::Debug for CanvasHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CanvasHost")
            .field("canvas", &"HtmlCanvasElement")
            .field("cached_tiles", &self.tiles.len())
            .field("context_ready", &self.context.is_some())
            .finish_non_exhaustive()
    }
}

/// Pan by a screen-pixel delta: dragging right moves the center west,
/// dragging down moves it north.
fn pan_update(current: &ViewportState, dx: f64, dy: f64) -> CameraUpdate {
    let world = mercator::world_size(current.zoom);
    let degrees_per_px = 360.0 / world;
    let longitude = current.longitude - dx * degrees_per_px;
    let latitude = (current.latitude
        + dy * degrees_per_px * current.latitude.to_radians().cos())
    .clamp(-mercator::MAX_LATITUDE, mercator::MAX_LATITUDE);
    CameraUpdate {
        longitude: Some(wrap_longitude(longitude)),
        latitude: Some(latitude),
        ..CameraUpdate::default()
    }
}

fn wrap_longitude(longitude: f64) -> f64 {
    (longitude + 180.0).rem_euclid(360.0) - 180.0
}

fn css_color(color: Rgba8) -> String {
    format!("rgb({} {} {})", color.r, color.g, color.b)
}
