// Copyright 2026 the Meander Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web-Mercator projection and tile math.
//!
//! Pure functions shared by the canvas host: geographic positions to world
//! pixels, world pixels to canvas pixels under a viewport, and Slippy-map
//! tile coordinates for the basemap substrate. Everything here is
//! browser-free and unit-tested natively.
//!
//! The world is square: `TILE_SIZE * 2^zoom` pixels on a side, longitude
//! mapped linearly, latitude through the Mercator stretch and clamped to
//! [`MAX_LATITUDE`] where the projection diverges.

use core::f64::consts::PI;

use kurbo::Point;

use meander_core::viewport::ViewportState;

/// Raster tile edge length in pixels.
pub const TILE_SIZE: f64 = 256.0;

/// Highest projectable latitude; the familiar square-world cutoff.
pub const MAX_LATITUDE: f64 = 85.051_128_78;

/// Earth circumference at the equator, meters.
pub const EARTH_CIRCUMFERENCE_METERS: f64 = 40_075_016.686;

/// Side length of the world in pixels at a (fractional) zoom level.
#[must_use]
pub fn world_size(zoom: f64) -> f64 {
    TILE_SIZE * zoom.exp2()
}

/// Latitude to the [0, 1] Mercator y fraction (0 at the north cutoff).
fn y_fraction(latitude: f64) -> f64 {
    let lat = latitude.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    0.5 - (lat.tan() + 1.0 / lat.cos()).ln() / (2.0 * PI)
}

/// Projects `(longitude, latitude)` to world pixels for a world of side
/// `world`.
#[must_use]
pub fn world_px(position: Point, world: f64) -> Point {
    Point::new(
        (position.x + 180.0) / 360.0 * world,
        y_fraction(position.y) * world,
    )
}

/// A Slippy-map tile coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TileCoord {
    /// Integer zoom level.
    pub z: u8,
    /// Column, west to east.
    pub x: u32,
    /// Row, north to south.
    pub y: u32,
}

/// Tile containing `position` at integer zoom `z`.
#[must_use]
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "indices are clamped to [0, 2^z) before conversion"
)]
pub fn tile_for(position: Point, z: u8) -> TileCoord {
    let n = (1_u64 << u32::from(z)) as f64;
    let x = ((position.x + 180.0) / 360.0 * n).floor().clamp(0.0, n - 1.0);
    let y = (y_fraction(position.y) * n).floor().clamp(0.0, n - 1.0);
    TileCoord {
        z,
        x: x as u32,
        y: y as u32,
    }
}

/// Converts between geographic positions and canvas pixels for one frame.
///
/// The viewport center lands on the canvas center; positive bearing turns
/// the camera clockwise from north, so the map rotates the opposite way on
/// screen. Pitch is accepted but not applied — this is a flat projection.
#[derive(Clone, Copy, Debug)]
pub struct Projection {
    world: f64,
    center: Point,
    half_width: f64,
    half_height: f64,
    bearing_sin: f64,
    bearing_cos: f64,
}

impl Projection {
    /// Builds the projection for one frame of a `width` x `height` canvas.
    #[must_use]
    pub fn new(viewport: &ViewportState, width: f64, height: f64) -> Self {
        let world = world_size(viewport.zoom);
        let center = world_px(Point::new(viewport.longitude, viewport.latitude), world);
        let bearing = viewport.bearing.to_radians();
        Self {
            world,
            center,
            half_width: width / 2.0,
            half_height: height / 2.0,
            bearing_sin: bearing.sin(),
            bearing_cos: bearing.cos(),
        }
    }

    /// World side length for this frame, in pixels.
    #[must_use]
    pub fn world(&self) -> f64 {
        self.world
    }

    /// World-pixel position of the viewport center.
    #[must_use]
    pub fn center_world(&self) -> Point {
        self.center
    }

    /// Screen rotation in radians, for hosts that rotate the canvas.
    #[must_use]
    pub fn screen_rotation(&self) -> f64 {
        -self.bearing_sin.atan2(self.bearing_cos)
    }

    /// Canvas position of a world-pixel position.
    #[must_use]
    pub fn world_to_screen(&self, world: Point) -> Point {
        let dx = world.x - self.center.x;
        let dy = world.y - self.center.y;
        Point::new(
            self.half_width + dx * self.bearing_cos + dy * self.bearing_sin,
            self.half_height - dx * self.bearing_sin + dy * self.bearing_cos,
        )
    }

    /// Canvas position of a geographic `(longitude, latitude)` position.
    #[must_use]
    pub fn to_screen(&self, position: Point) -> Point {
        self.world_to_screen(world_px(position, self.world))
    }

    /// Ground meters represented by one pixel at `latitude`.
    #[must_use]
    pub fn meters_per_pixel(&self, latitude: f64) -> f64 {
        EARTH_CIRCUMFERENCE_METERS * latitude.to_radians().cos() / self.world
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sf_viewport() -> ViewportState {
        ViewportState::new(-122.41669, 37.7853, 13.0)
    }

    #[test]
    fn world_doubles_per_zoom_step() {
        assert_eq!(world_size(0.0), 256.0);
        assert_eq!(world_size(1.0), 512.0);
        assert!((world_size(13.0) - 256.0 * 8192.0).abs() < 1e-6);
    }

    #[test]
    fn equator_and_prime_meridian_project_to_world_center() {
        let world = world_size(4.0);
        let p = world_px(Point::ZERO, world);
        assert!((p.x - world / 2.0).abs() < 1e-9);
        assert!((p.y - world / 2.0).abs() < 1e-9);
    }

    #[test]
    fn viewport_center_lands_on_canvas_center() {
        let projection = Projection::new(&sf_viewport(), 800.0, 600.0);
        let screen = projection.to_screen(Point::new(-122.41669, 37.7853));
        assert!((screen.x - 400.0).abs() < 1e-9);
        assert!((screen.y - 300.0).abs() < 1e-9);
    }

    #[test]
    fn north_is_up_and_east_is_right_without_bearing() {
        let projection = Projection::new(&sf_viewport(), 800.0, 600.0);
        let east = projection.to_screen(Point::new(-122.40, 37.7853));
        assert!(east.x > 400.0, "east of center must land right of center");
        assert!((east.y - 300.0).abs() < 1e-6);

        let north = projection.to_screen(Point::new(-122.41669, 37.80));
        assert!(north.y < 300.0, "north of center must land above center");
    }

    #[test]
    fn bearing_rotates_the_map() {
        let mut viewport = sf_viewport();
        viewport.bearing = 90.0;
        let projection = Projection::new(&viewport, 800.0, 600.0);
        // Camera faces east, so a point east of center appears up-screen.
        let east = projection.to_screen(Point::new(-122.40, 37.7853));
        assert!((east.x - 400.0).abs() < 1e-6);
        assert!(east.y < 300.0);
    }

    #[test]
    fn known_tile_for_san_francisco() {
        let tile = tile_for(Point::new(-122.41669, 37.7853), 13);
        assert_eq!(tile, TileCoord { z: 13, x: 1310, y: 3166 });
    }

    #[test]
    fn zoom_zero_has_a_single_tile() {
        assert_eq!(
            tile_for(Point::new(-122.41669, 37.7853), 0),
            TileCoord { z: 0, x: 0, y: 0 }
        );
        assert_eq!(
            tile_for(Point::new(179.9, -84.0), 0),
            TileCoord { z: 0, x: 0, y: 0 }
        );
    }

    #[test]
    fn poles_clamp_instead_of_diverging() {
        let world = world_size(2.0);
        let north = world_px(Point::new(0.0, 90.0), world);
        let south = world_px(Point::new(0.0, -90.0), world);
        assert!(north.y.is_finite() && north.y >= -1e-6);
        assert!(south.y.is_finite() && south.y <= world + 1e-6);
    }

    #[test]
    fn meters_per_pixel_matches_the_equatorial_constant() {
        let viewport = ViewportState::new(0.0, 0.0, 0.0);
        let projection = Projection::new(&viewport, 256.0, 256.0);
        let mpp = projection.meters_per_pixel(0.0);
        assert!((mpp - 156_543.033).abs() < 0.1, "zoom 0: ~156543 m/px, got {mpp}");
    }
}
