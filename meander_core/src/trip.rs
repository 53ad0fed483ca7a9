// Copyright 2026 the Meander Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trip records and trail windows.
//!
//! A [`TripRecord`] pairs an ordered path with one timestamp per vertex.
//! Construction enforces the structural invariant (equal lengths) up front;
//! the ordering invariant (non-decreasing timestamps) is checked once and
//! cached, and a violating record is merely flagged so the trail factory can
//! skip it without aborting the batch.
//!
//! # Window convention
//!
//! [`TripRecord::trail_window`] selects the vertices whose timestamp lies in
//! the **closed** window `[now - trail_length, now]` — inclusive at both
//! ends. A vertex exactly `trail_length` old is still drawn; a vertex
//! stamped exactly `now` is already drawn. The lower bound saturates at
//! zero, so a trail never reaches backwards across the loop seam.

use alloc::vec::Vec;
use core::ops::Range;

use kurbo::Point;

use crate::clock::SimTime;
use crate::error::{ConfigError, RecordError};

/// One vehicle's journey: an ordered path with one timestamp per vertex.
#[derive(Clone, Debug, PartialEq)]
pub struct TripRecord {
    path: Vec<Point>,
    timestamps: Vec<u64>,
    /// Cached ordering check; `Err` marks the record malformed.
    well_formed: Result<(), RecordError>,
}

impl TripRecord {
    /// Creates a record from a path and matching timestamps.
    ///
    /// Out-of-order timestamps do not fail construction: the record is
    /// flagged malformed, excluded from trail output, and surfaced once
    /// through the trace sink when the engine starts. One bad record must
    /// not blank the rest of the batch.
    ///
    /// # Errors
    ///
    /// [`ConfigError::MismatchedTripLengths`] when the sequences differ in
    /// length.
    pub fn new(path: Vec<Point>, timestamps: Vec<u64>) -> Result<Self, ConfigError> {
        if path.len() != timestamps.len() {
            return Err(ConfigError::MismatchedTripLengths {
                path: path.len(),
                timestamps: timestamps.len(),
            });
        }
        let well_formed = check_monotonic(&timestamps);
        Ok(Self {
            path,
            timestamps,
            well_formed,
        })
    }

    /// Returns the path positions.
    #[must_use]
    pub fn path(&self) -> &[Point] {
        &self.path
    }

    /// Returns the per-vertex timestamps.
    #[must_use]
    pub fn timestamps(&self) -> &[u64] {
        &self.timestamps
    }

    /// Number of vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.path.len()
    }

    /// Returns `true` for a record with no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Returns the defect that makes this record undrawable, if any.
    #[must_use]
    pub fn malformation(&self) -> Option<RecordError> {
        self.well_formed.err()
    }

    /// Index range of vertices inside the closed window
    /// `[now - trail_length, now]`.
    ///
    /// Empty when no timestamp has entered the window yet (the record stays
    /// valid for later ticks) and for malformed records, whose timestamps
    /// cannot be searched.
    #[must_use]
    pub fn trail_window(&self, now: SimTime, trail_length: u64) -> Range<usize> {
        if self.well_formed.is_err() {
            return 0..0;
        }
        let upper = self.timestamps.partition_point(|&ts| ts <= now.units());
        let lower_bound = now.units().saturating_sub(trail_length);
        let lower = self.timestamps[..upper].partition_point(|&ts| ts < lower_bound);
        lower..upper
    }
}

fn check_monotonic(timestamps: &[u64]) -> Result<(), RecordError> {
    for (i, pair) in timestamps.windows(2).enumerate() {
        if pair[1] < pair[0] {
            return Err(RecordError::NonMonotonicTimestamps { index: i + 1 });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    fn square_trip() -> TripRecord {
        TripRecord::new(
            vec![
                Point::new(0.0, 0.0),
                Point::new(0.0, 1.0),
                Point::new(1.0, 1.0),
                Point::new(1.0, 0.0),
            ],
            vec![0, 100, 200, 300],
        )
        .unwrap()
    }

    #[test]
    fn window_is_closed_at_both_ends() {
        // now = 250, trail = 150: the window is [100, 250], so exactly the
        // vertices stamped 100 and 200 are inside.
        let trip = square_trip();
        let window = trip.trail_window(SimTime(250), 150);
        assert_eq!(window, 1..3);
        assert_eq!(&trip.timestamps()[window], &[100, 200]);
    }

    #[test]
    fn lower_bound_is_inclusive() {
        let trip = square_trip();
        // now = 250, trail = 50: lower bound lands exactly on 200.
        let window = trip.trail_window(SimTime(250), 50);
        assert_eq!(&trip.timestamps()[window], &[200]);
    }

    #[test]
    fn upper_bound_is_inclusive() {
        let trip = square_trip();
        let window = trip.trail_window(SimTime(300), 100);
        assert_eq!(&trip.timestamps()[window], &[200, 300]);
    }

    #[test]
    fn window_before_first_timestamp_is_empty_but_record_stays_usable() {
        let trip = TripRecord::new(
            vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)],
            vec![500, 600],
        )
        .unwrap();
        assert!(trip.trail_window(SimTime(100), 150).is_empty());
        // The same record renders once the clock reaches its timestamps.
        assert_eq!(trip.trail_window(SimTime(550), 150), 0..1);
    }

    #[test]
    fn lower_bound_saturates_at_zero() {
        let trip = square_trip();
        // now = 50, trail = 150: everything up to 50 is in the window.
        let window = trip.trail_window(SimTime(50), 150);
        assert_eq!(&trip.timestamps()[window], &[0]);
    }

    #[test]
    fn mismatched_lengths_are_rejected_at_construction() {
        let err = TripRecord::new(
            vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)],
            vec![0, 100, 200],
        )
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::MismatchedTripLengths {
                path: 2,
                timestamps: 3
            }
        );
    }

    #[test]
    fn non_monotonic_record_is_flagged_not_rejected() {
        let trip = TripRecord::new(
            vec![
                Point::new(0.0, 0.0),
                Point::new(0.0, 1.0),
                Point::new(1.0, 1.0),
            ],
            vec![0, 5, 3],
        )
        .unwrap();
        assert_eq!(
            trip.malformation(),
            Some(RecordError::NonMonotonicTimestamps { index: 2 })
        );
        assert!(
            trip.trail_window(SimTime(10), 10).is_empty(),
            "malformed records never produce a window"
        );
    }

    #[test]
    fn equal_adjacent_timestamps_are_allowed() {
        let trip = TripRecord::new(
            vec![Point::new(0.0, 0.0), Point::new(0.0, 1.0)],
            vec![100, 100],
        )
        .unwrap();
        assert_eq!(trip.malformation(), None);
        assert_eq!(trip.trail_window(SimTime(100), 10), 0..2);
    }

    #[test]
    fn empty_record_is_valid_and_windowless() {
        let trip = TripRecord::new(Vec::new(), Vec::new()).unwrap();
        assert!(trip.is_empty());
        assert!(trip.trail_window(SimTime(100), 50).is_empty());
    }
}
