// Copyright 2026 the Meander Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pure constructors for layer descriptors.
//!
//! Each function maps a dataset and a style to a descriptor with no hidden
//! state: the same inputs always yield an equivalent descriptor. The trail
//! builder runs every tick; the station and edge builders run once at engine
//! construction, with the engine holding the memoized result.

use alloc::vec::Vec;

use crate::clock::SimTime;
use crate::dataset::{StationPoint, StaticEdge};
use crate::trip::TripRecord;

use super::{
    EdgeLayer, EdgeStyle, LayerDescriptor, StationLayer, StationStyle, TrailLayer, TrailSegment,
    TrailStyle,
};

/// Builds the trail layer for one tick.
///
/// Each trip contributes the vertices of its closed trail window
/// (see [`TripRecord::trail_window`]); trips whose window is empty this tick
/// contribute nothing but stay in the dataset, and malformed trips are
/// skipped entirely. Returns `None` when no trip contributes, so the stack
/// omits the layer instead of drawing an empty one.
#[must_use]
pub fn trail_layer(
    trips: &[TripRecord],
    now: SimTime,
    trail_length: u64,
    style: TrailStyle,
) -> Option<LayerDescriptor> {
    let mut segments = Vec::new();
    for trip in trips {
        if trip.malformation().is_some() {
            continue;
        }
        let window = trip.trail_window(now, trail_length);
        if window.is_empty() {
            continue;
        }
        segments.push(TrailSegment {
            positions: trip.path()[window.clone()].to_vec(),
            timestamps: trip.timestamps()[window].to_vec(),
        });
    }
    if segments.is_empty() {
        return None;
    }
    Some(LayerDescriptor::Trails(TrailLayer {
        time: now,
        trail_length,
        segments,
        style,
    }))
}

/// Builds the station layer.
#[must_use]
pub fn station_layer(stations: &[StationPoint], style: StationStyle) -> Option<LayerDescriptor> {
    if stations.is_empty() {
        return None;
    }
    Some(LayerDescriptor::Stations(StationLayer {
        stations: stations.into(),
        style,
    }))
}

/// Builds the edge layer.
#[must_use]
pub fn edge_layer(edges: &[StaticEdge], style: EdgeStyle) -> Option<LayerDescriptor> {
    if edges.is_empty() {
        return None;
    }
    Some(LayerDescriptor::Edges(EdgeLayer {
        edges: edges.into(),
        style,
    }))
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec;

    use kurbo::Point;

    use crate::layer::Styles;

    use super::*;

    fn diagonal_trip(offset: f64, timestamps: Vec<u64>) -> TripRecord {
        let path = (0..timestamps.len())
            .map(|i| Point::new(offset + i as f64, i as f64))
            .collect();
        TripRecord::new(path, timestamps).unwrap()
    }

    #[test]
    fn windows_are_cut_per_trip() {
        let trips = vec![
            diagonal_trip(0.0, vec![0, 100, 200, 300]),
            diagonal_trip(10.0, vec![0, 240, 260]),
        ];
        let style = Styles::default().trail;
        let Some(LayerDescriptor::Trails(layer)) = trail_layer(&trips, SimTime(250), 150, style)
        else {
            panic!("expected a trail layer");
        };

        assert_eq!(layer.segments.len(), 2);
        assert_eq!(layer.segments[0].timestamps, &[100, 200]);
        assert_eq!(layer.segments[1].timestamps, &[240]);
        assert_eq!(layer.time, SimTime(250));
        assert_eq!(layer.trail_length, 150);
    }

    #[test]
    fn trip_with_empty_window_contributes_nothing() {
        let trips = vec![
            diagonal_trip(0.0, vec![0, 100]),
            // Starts far in the future of the current tick.
            diagonal_trip(5.0, vec![900, 950]),
        ];
        let style = Styles::default().trail;
        let Some(LayerDescriptor::Trails(layer)) = trail_layer(&trips, SimTime(120), 100, style)
        else {
            panic!("expected a trail layer");
        };
        assert_eq!(layer.segments.len(), 1, "future trip renders nothing yet");
    }

    #[test]
    fn malformed_trip_is_excluded_while_valid_sibling_renders() {
        let trips = vec![
            diagonal_trip(0.0, vec![0, 5, 3]),
            diagonal_trip(1.0, vec![0, 4, 8]),
        ];
        assert!(trips[0].malformation().is_some());

        let style = Styles::default().trail;
        let Some(LayerDescriptor::Trails(layer)) = trail_layer(&trips, SimTime(8), 8, style) else {
            panic!("expected a trail layer");
        };
        assert_eq!(layer.segments.len(), 1);
        assert_eq!(layer.segments[0].timestamps, &[0, 4, 8]);
    }

    #[test]
    fn no_contributing_trip_means_no_layer() {
        let trips = vec![diagonal_trip(0.0, vec![500, 600])];
        let style = Styles::default().trail;
        assert!(trail_layer(&trips, SimTime(10), 50, style).is_none());
    }

    #[test]
    fn same_inputs_yield_equal_descriptors() {
        let trips = vec![diagonal_trip(0.0, vec![0, 100, 200])];
        let style = Styles::default().trail;
        let a = trail_layer(&trips, SimTime(150), 100, style);
        let b = trail_layer(&trips, SimTime(150), 100, style);
        assert_eq!(a, b);
    }

    #[test]
    fn station_layer_is_none_for_empty_dataset() {
        let style = Styles::default().stations;
        assert!(station_layer(&[], style).is_none());
    }

    #[test]
    fn station_layer_keeps_data_and_style() {
        let stations = vec![StationPoint {
            name: String::from("Civic Center"),
            passengers: 24_798,
            position: Point::new(-122.413756, 37.779528),
        }];
        let style = Styles::default().stations;
        let Some(LayerDescriptor::Stations(layer)) = station_layer(&stations, style) else {
            panic!("expected a station layer");
        };
        assert_eq!(layer.stations.len(), 1);
        assert_eq!(layer.stations[0].name, "Civic Center");
        assert_eq!(layer.style, style);
    }

    #[test]
    fn edge_layer_is_none_for_empty_dataset() {
        let style = Styles::default().edges;
        assert!(edge_layer(&[], style).is_none());
    }
}
