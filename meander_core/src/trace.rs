// Copyright 2026 the Meander Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the frame loop.
//!
//! [`TraceSink`] has one method per engine event, all defaulting to no-ops,
//! so a sink implements only the events it cares about. [`Tracer`] wraps an
//! optional `&mut dyn TraceSink`: with the `trace` feature **off** every
//! method compiles to nothing; with it **on** each method is a single
//! `Option` branch before dispatch.
//!
//! Nothing here is swallowed silently elsewhere — a skipped frame and a
//! rejected record each produce exactly one event.

use crate::clock::SimTime;
use crate::error::RecordError;

/// Emitted once when the engine transitions to running.
#[derive(Clone, Copy, Debug)]
pub struct StartEvent {
    /// Loop length of the freshly created clock.
    pub loop_length: u64,
    /// Per-tick step of the freshly created clock.
    pub step: u64,
}

/// Emitted on every tick, after the clock advances.
#[derive(Clone, Copy, Debug)]
pub struct TickEvent {
    /// Monotonic frame counter.
    pub frame_index: u64,
    /// Simulation time for this tick.
    pub time: SimTime,
}

/// Emitted after the layer stack for a tick is composed.
#[derive(Clone, Copy, Debug)]
pub struct ComposeEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Number of layers in the stack.
    pub layer_count: usize,
    /// Number of trips contributing a trail this tick.
    pub trail_segments: usize,
}

/// Why a frame's draw was skipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// The render host reported its surface was not ready.
    HostUnavailable,
}

/// Emitted when a frame is skipped; simulation time is unaffected.
#[derive(Clone, Copy, Debug)]
pub struct SkipEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Why the draw did not happen.
    pub reason: SkipReason,
}

/// Emitted once per rejected trip record, when the engine starts.
#[derive(Clone, Copy, Debug)]
pub struct RecordRejection {
    /// Index of the record in the supplied trip dataset.
    pub trip_index: usize,
    /// The defect.
    pub error: RecordError,
}

/// Receives trace events from the frame loop.
///
/// All methods have default no-op implementations.
pub trait TraceSink {
    /// Called when the engine starts.
    fn on_started(&mut self, e: &StartEvent) {
        _ = e;
    }

    /// Called after the clock advances each tick.
    fn on_tick(&mut self, e: &TickEvent) {
        _ = e;
    }

    /// Called after the layer stack is composed each tick.
    fn on_compose(&mut self, e: &ComposeEvent) {
        _ = e;
    }

    /// Called when a frame's draw is skipped.
    fn on_frame_skipped(&mut self, e: &SkipEvent) {
        _ = e;
    }

    /// Called once per trip record excluded from rendering.
    fn on_record_rejected(&mut self, r: &RecordRejection) {
        _ = r;
    }

    /// Called when the engine stops; `frame_index` is the next unused
    /// counter value.
    fn on_stopped(&mut self, frame_index: u64) {
        _ = frame_index;
    }
}

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`StartEvent`].
    #[inline]
    pub fn started(&mut self, e: &StartEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_started(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`TickEvent`].
    #[inline]
    pub fn tick(&mut self, e: &TickEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_tick(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ComposeEvent`].
    #[inline]
    pub fn compose(&mut self, e: &ComposeEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_compose(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`SkipEvent`].
    #[inline]
    pub fn frame_skipped(&mut self, e: &SkipEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_frame_skipped(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`RecordRejection`].
    #[inline]
    pub fn record_rejected(&mut self, r: &RecordRejection) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_record_rejected(r);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = r;
        }
    }

    /// Emits the stop notification.
    #[inline]
    pub fn stopped(&mut self, frame_index: u64) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_stopped(frame_index);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = frame_index;
        }
    }
}
