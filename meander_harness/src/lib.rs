// Copyright 2026 the Meander Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deterministic scheduler/host doubles and frame metrics.
//!
//! [`ManualScheduler`] and [`RecordingHost`] stand in for a real platform so
//! demos and tests can crank the engine by hand: arm, fire, drop, or cancel
//! ticks in any order and observe exactly what reached the render boundary.
//! [`FrameStats`] keeps a rolling history of trail activity for HUD-style
//! summaries.

#![no_std]

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use meander_core::error::HostError;
use meander_core::host::RenderHost;
use meander_core::layer::{LayerDescriptor, LayerKind};
use meander_core::scheduler::{FrameHandle, FrameScheduler};
use meander_core::viewport::ViewportState;

/// Hand-cranked frame scheduler.
///
/// Hands out sequential handles and records every cancellation, so tests can
/// assert on arm/cancel pairing. The "host" side of the contract is the
/// caller: [`fire`](Self::fire) takes the armed handle the way a platform
/// dispatches a due callback, and simply not calling it models a tick
/// dropped under load.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_handle: u64,
    pending: Option<FrameHandle>,
    cancelled: Vec<FrameHandle>,
}

impl ManualScheduler {
    /// Creates an idle scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the armed handle, if any.
    #[must_use]
    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Takes the armed handle, as the platform does when dispatching the
    /// callback. Returns `None` when nothing is armed.
    pub fn fire(&mut self) -> Option<FrameHandle> {
        self.pending.take()
    }

    /// Every handle that was cancelled, in order.
    #[must_use]
    pub fn cancelled(&self) -> &[FrameHandle] {
        &self.cancelled
    }

    /// Total number of `schedule` calls so far.
    #[must_use]
    pub fn scheduled_total(&self) -> u64 {
        self.next_handle
    }
}

impl FrameScheduler for ManualScheduler {
    fn schedule(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next_handle);
        self.next_handle += 1;
        self.pending = Some(handle);
        handle
    }

    fn cancel(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
        self.cancelled.push(handle);
    }
}

/// One hand-off recorded by [`RecordingHost`].
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedFrame {
    /// Camera at the hand-off.
    pub viewport: ViewportState,
    /// Layer kinds in draw order.
    pub kinds: Vec<LayerKind>,
    /// Trail segments in the frame's trail layer, zero if absent.
    pub trail_segments: usize,
}

/// Render host double: records successful hand-offs, can go dark.
#[derive(Debug)]
pub struct RecordingHost {
    available: bool,
    frames: Vec<RecordedFrame>,
    refusals: u64,
}

impl Default for RecordingHost {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingHost {
    /// Creates an available host with no recorded frames.
    #[must_use]
    pub fn new() -> Self {
        Self {
            available: true,
            frames: Vec::new(),
            refusals: 0,
        }
    }

    /// Makes the host report [`HostError::Unavailable`] (or stop doing so).
    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    /// Frames drawn so far, oldest first.
    #[must_use]
    pub fn frames(&self) -> &[RecordedFrame] {
        &self.frames
    }

    /// Number of draws refused while dark.
    #[must_use]
    pub fn refusals(&self) -> u64 {
        self.refusals
    }
}

impl RenderHost for RecordingHost {
    fn draw(
        &mut self,
        viewport: &ViewportState,
        layers: &[LayerDescriptor],
    ) -> Result<(), HostError> {
        if !self.available {
            self.refusals += 1;
            return Err(HostError::Unavailable);
        }
        let trail_segments = layers
            .iter()
            .find_map(|layer| match layer {
                LayerDescriptor::Trails(trail) => Some(trail.segments.len()),
                _ => None,
            })
            .unwrap_or(0);
        self.frames.push(RecordedFrame {
            viewport: *viewport,
            kinds: layers.iter().map(LayerDescriptor::kind).collect(),
            trail_segments,
        });
        Ok(())
    }
}

/// Rolling frame metrics with a fixed-size history of trail vertex counts.
#[derive(Debug)]
pub struct FrameStats<const N: usize> {
    trail_points: [usize; N],
    cursor: usize,
    ticks: u64,
    skips: u64,
}

impl<const N: usize> Default for FrameStats<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> FrameStats<N> {
    /// Creates an empty tracker.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            trail_points: [0; N],
            cursor: 0,
            ticks: 0,
            skips: 0,
        }
    }

    /// Observes one tick.
    pub fn observe(&mut self, trail_points: usize, skipped: bool) {
        self.trail_points[self.cursor % N] = trail_points;
        self.cursor = (self.cursor + 1) % N;
        self.ticks = self.ticks.saturating_add(1);
        if skipped {
            self.skips = self.skips.saturating_add(1);
        }
    }

    /// Total ticks observed.
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Total skipped draws observed.
    #[must_use]
    pub fn skips(&self) -> u64 {
        self.skips
    }

    /// Skips per 1000 observed ticks.
    #[must_use]
    pub fn skip_rate_per_1000(&self) -> f64 {
        if self.ticks == 0 {
            return 0.0;
        }
        self.skips as f64 * 1000.0 / self.ticks as f64
    }

    /// Returns an ASCII sparkline over the trail-point history,
    /// oldest first, scaled to `max_points`.
    #[must_use]
    pub fn sparkline_ascii(&self, max_points: usize) -> String {
        const LEVELS: &[u8] = b" .:-=+*#%@";
        let max = max_points.max(1);
        let mut out = String::with_capacity(N);
        let mut i = 0;
        while i < N {
            let idx = (self.cursor + i) % N;
            let v = self.trail_points[idx].min(max);
            let level = v * (LEVELS.len() - 1) / max;
            out.push(LEVELS[level] as char);
            i += 1;
        }
        out
    }
}
