// Copyright 2026 the Meander Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Static scene datasets, supplied fully materialized before the first
//! frame and immutable afterwards.

use alloc::string::String;
use alloc::vec::Vec;
use kurbo::{Line, Point};

use crate::trip::TripRecord;

/// A named station with ridership, drawn as a fixed-radius point.
#[derive(Clone, Debug, PartialEq)]
pub struct StationPoint {
    /// Display name.
    pub name: String,
    /// Average ridership count; never negative.
    pub passengers: u32,
    /// Position as `(longitude, latitude)` degrees.
    pub position: Point,
}

/// A static connecting segment between two positions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StaticEdge {
    /// Segment start, `(longitude, latitude)` degrees.
    pub source: Point,
    /// Segment end, `(longitude, latitude)` degrees.
    pub target: Point,
}

impl StaticEdge {
    /// Creates an edge from source to target.
    #[must_use]
    pub const fn new(source: Point, target: Point) -> Self {
        Self { source, target }
    }

    /// The edge as a drawable line segment.
    #[must_use]
    pub const fn to_line(self) -> Line {
        Line {
            p0: self.source,
            p1: self.target,
        }
    }
}

/// Everything the engine renders.
///
/// Loaded once before the engine starts; there is no streaming or
/// incremental ingestion.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SceneData {
    /// Station points.
    pub stations: Vec<StationPoint>,
    /// Static connecting edges.
    pub edges: Vec<StaticEdge>,
    /// Trip records animated by the clock.
    pub trips: Vec<TripRecord>,
}
