// Copyright 2026 the Meander Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Camera state, owned separately from simulation time.
//!
//! The camera and the clock coexist in every frame but have disjoint
//! writers: [`Viewport`] is mutated only through [`Viewport::apply`], which
//! the render host's interaction layer calls in response to user gestures.
//! Nothing on the animation path writes it, so any number of ticks leaves
//! the camera bit-identical.

use core::fmt;

/// Camera parameters for the map viewport.
///
/// Angles are in degrees; `zoom` follows the usual web-map convention where
/// each whole step doubles the scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportState {
    /// Longitude of the viewport center, degrees east.
    pub longitude: f64,
    /// Latitude of the viewport center, degrees north.
    pub latitude: f64,
    /// Zoom level.
    pub zoom: f64,
    /// Camera tilt from vertical, degrees.
    pub pitch: f64,
    /// Compass direction the camera faces, degrees clockwise from north.
    pub bearing: f64,
}

impl ViewportState {
    /// Creates an untilted, north-up viewport.
    #[must_use]
    pub const fn new(longitude: f64, latitude: f64, zoom: f64) -> Self {
        Self {
            longitude,
            latitude,
            zoom,
            pitch: 0.0,
            bearing: 0.0,
        }
    }

    /// Returns `true` when every field is a finite number.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.longitude.is_finite()
            && self.latitude.is_finite()
            && self.zoom.is_finite()
            && self.pitch.is_finite()
            && self.bearing.is_finite()
    }
}

/// A partial camera update produced by user interaction.
///
/// Fields left `None` keep their current value, so a pan gesture can move
/// the center without touching zoom or orientation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CameraUpdate {
    /// New center longitude, if changed.
    pub longitude: Option<f64>,
    /// New center latitude, if changed.
    pub latitude: Option<f64>,
    /// New zoom level, if changed.
    pub zoom: Option<f64>,
    /// New pitch, if changed.
    pub pitch: Option<f64>,
    /// New bearing, if changed.
    pub bearing: Option<f64>,
}

impl CameraUpdate {
    /// Returns `true` when the update carries no changes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.longitude.is_none()
            && self.latitude.is_none()
            && self.zoom.is_none()
            && self.pitch.is_none()
            && self.bearing.is_none()
    }
}

/// Holds the camera for the lifetime of the engine.
#[derive(Clone)]
pub struct Viewport {
    state: ViewportState,
}

impl Viewport {
    /// Creates a viewport at the given initial camera.
    #[must_use]
    pub const fn new(state: ViewportState) -> Self {
        Self { state }
    }

    /// Returns the current camera.
    #[inline]
    #[must_use]
    pub const fn current(&self) -> ViewportState {
        self.state
    }

    /// Merges a user-interaction update into the camera.
    ///
    /// Non-finite values in the update are ignored field-by-field, so a
    /// degenerate gesture cannot corrupt the camera.
    pub fn apply(&mut self, update: CameraUpdate) {
        merge(&mut self.state.longitude, update.longitude);
        merge(&mut self.state.latitude, update.latitude);
        merge(&mut self.state.zoom, update.zoom);
        merge(&mut self.state.pitch, update.pitch);
        merge(&mut self.state.bearing, update.bearing);
    }
}

impl fmt::Debug for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Viewport").field("state", &self.state).finish()
    }
}

fn merge(field: &mut f64, update: Option<f64>) {
    if let Some(value) = update
        && value.is_finite()
    {
        *field = value;
    }
}
