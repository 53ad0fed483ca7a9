// Copyright 2026 the Meander Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer descriptors, styles, and composition.
//!
//! A [`LayerDescriptor`] is an immutable value describing one renderable
//! dataset and its visual encoding. Descriptors carry no behavior; the
//! render host interprets them. Time-dependent descriptors (trails) are
//! rebuilt from scratch every tick by the [`factory`] functions — a previous
//! frame's descriptor is never mutated in place — while the static station
//! and edge descriptors are built once and shared via `Arc` so per-frame
//! recomposition stays cheap.

mod factory;
mod stack;

pub use factory::{edge_layer, station_layer, trail_layer};
pub use stack::compose;

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use kurbo::Point;

use crate::clock::SimTime;
use crate::dataset::{StationPoint, StaticEdge};

/// RGBA color, 8 bits per channel.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel; 255 is opaque.
    pub a: u8,
}

impl Rgba8 {
    /// Creates a color from all four channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a fully opaque color.
    #[must_use]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

impl fmt::Debug for Rgba8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }
}

/// Visual encoding for the trail layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrailStyle {
    /// Stroke color at full freshness; hosts fade it with vertex age.
    pub color: Rgba8,
    /// Stroke width in pixels.
    pub width: f64,
}

/// Visual encoding for the station layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StationStyle {
    /// Fill color.
    pub color: Rgba8,
    /// Point radius in meters on the ground.
    pub radius: f64,
}

/// Visual encoding for the edge layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeStyle {
    /// Stroke color.
    pub color: Rgba8,
    /// Stroke width in pixels.
    pub width: f64,
}

/// Visual encodings for the three layers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Styles {
    /// Trip trails.
    pub trail: TrailStyle,
    /// Station points.
    pub stations: StationStyle,
    /// Static edges.
    pub edges: EdgeStyle,
}

impl Default for Styles {
    /// The classic transit-demo look: coral trails, amber stations, slate
    /// edges.
    fn default() -> Self {
        Self {
            trail: TrailStyle {
                color: Rgba8::opaque(253, 128, 93),
                width: 3.0,
            },
            stations: StationStyle {
                color: Rgba8::opaque(255, 200, 0),
                radius: 1000.0,
            },
            edges: EdgeStyle {
                color: Rgba8::opaque(84, 110, 122),
                width: 2.0,
            },
        }
    }
}

/// Which dataset a descriptor draws. Stable name for diagnostics and tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayerKind {
    /// Time-windowed trip trails.
    Trails,
    /// Station points.
    Stations,
    /// Static connecting edges.
    Edges,
}

/// An immutable description of one renderable dataset and its visual
/// encoding.
#[derive(Clone, Debug, PartialEq)]
pub enum LayerDescriptor {
    /// Time-windowed trip trails, lowest in the stack.
    Trails(TrailLayer),
    /// Station points, above the trails.
    Stations(StationLayer),
    /// Static connecting edges, on top.
    Edges(EdgeLayer),
}

impl LayerDescriptor {
    /// Returns which dataset this descriptor draws.
    #[must_use]
    pub const fn kind(&self) -> LayerKind {
        match self {
            Self::Trails(_) => LayerKind::Trails,
            Self::Stations(_) => LayerKind::Stations,
            Self::Edges(_) => LayerKind::Edges,
        }
    }
}

/// The windowed slice of one trip, ready to draw.
#[derive(Clone, Debug, PartialEq)]
pub struct TrailSegment {
    /// Vertex positions inside the window, oldest first.
    pub positions: Vec<Point>,
    /// Matching vertex timestamps, used for age fading.
    pub timestamps: Vec<u64>,
}

/// All trips' trail windows at one simulation time.
#[derive(Clone, Debug, PartialEq)]
pub struct TrailLayer {
    /// Simulation time the windows were computed at.
    pub time: SimTime,
    /// Window length used, so hosts can fade vertices by age.
    pub trail_length: u64,
    /// One entry per trip with a non-empty window.
    pub segments: Vec<TrailSegment>,
    /// Visual encoding.
    pub style: TrailStyle,
}

/// The static station dataset with its encoding.
#[derive(Clone, Debug, PartialEq)]
pub struct StationLayer {
    /// Shared station data; cloning the layer does not copy it.
    pub stations: Arc<[StationPoint]>,
    /// Visual encoding.
    pub style: StationStyle,
}

/// The static edge dataset with its encoding.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeLayer {
    /// Shared edge data; cloning the layer does not copy it.
    pub edges: Arc<[StaticEdge]>,
    /// Visual encoding.
    pub style: EdgeStyle,
}
