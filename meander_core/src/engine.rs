// Copyright 2026 the Meander Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Engine lifecycle and the per-frame pipeline.
//!
//! The engine is a two-state machine. `Stopped → Running` on
//! [`start`](Engine::start), which creates the clock and arms the first
//! frame; `Running → Running` on every [`on_frame`](Engine::on_frame);
//! `Running → Stopped` on [`stop`](Engine::stop), which cancels the pending
//! callback *before* returning so no tick can leak past teardown. Stop is
//! idempotent.
//!
//! Each tick is one synchronous pass: advance the clock, rebuild the trail
//! layer, compose the stack with the memoized static layers, and hand
//! `(viewport, layers)` to the render host. An unavailable host skips only
//! the draw — time advances on the host's pacing regardless, so tick N+1's
//! time always equals `(tick N's time + step) mod loop_length`.

use alloc::vec::Vec;

use crate::clock::{SimClock, SimTime};
use crate::config::EngineConfig;
use crate::dataset::SceneData;
use crate::error::{ConfigError, HostError};
use crate::host::RenderHost;
use crate::layer::{self, LayerDescriptor, Styles};
use crate::scheduler::{FrameHandle, FrameScheduler};
use crate::trace::{
    ComposeEvent, RecordRejection, SkipEvent, SkipReason, StartEvent, TickEvent, Tracer,
};
use crate::trip::TripRecord;
use crate::viewport::{CameraUpdate, Viewport, ViewportState};

/// Engine lifecycle state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum EngineState {
    Stopped,
    Running,
}

/// The animation engine.
///
/// Owns the clock (while running), the screened trip dataset, the memoized
/// static layers, and the camera. The frame scheduler and render host stay
/// outside as collaborators passed into each lifecycle call, so platform
/// glue can wire them however its ownership rules demand.
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    styles: Styles,
    state: EngineState,
    /// Exists only between `start` and `stop`.
    clock: Option<SimClock>,
    /// Handle of the armed frame callback, if any.
    pending: Option<FrameHandle>,
    frame_index: u64,
    trips: Vec<TripRecord>,
    rejections: Vec<RecordRejection>,
    rejections_reported: bool,
    stations: Option<LayerDescriptor>,
    edges: Option<LayerDescriptor>,
    viewport: Viewport,
}

impl Engine {
    /// Creates an engine over a validated configuration and dataset.
    ///
    /// The static station and edge layers are built here, once; malformed
    /// trip records are catalogued for a one-time diagnostic at start.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] for a non-positive timing parameter or a non-finite
    /// initial viewport. (Mismatched trip records never get this far —
    /// [`TripRecord::new`] already refused to construct them.)
    pub fn new(config: EngineConfig, styles: Styles, data: SceneData) -> Result<Self, ConfigError> {
        config.validate()?;

        let rejections = data
            .trips
            .iter()
            .enumerate()
            .filter_map(|(trip_index, trip)| {
                trip.malformation().map(|error| RecordRejection { trip_index, error })
            })
            .collect();

        let stations = layer::station_layer(&data.stations, styles.stations);
        let edges = layer::edge_layer(&data.edges, styles.edges);
        let viewport = Viewport::new(config.initial_viewport);

        Ok(Self {
            config,
            styles,
            state: EngineState::Stopped,
            clock: None,
            pending: None,
            frame_index: 0,
            trips: data.trips,
            rejections,
            rejections_reported: false,
            stations,
            edges,
            viewport,
        })
    }

    /// Transitions `Stopped → Running`: creates the clock and arms the
    /// first frame. Starting a running engine is a no-op.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] if the clock parameters are invalid. Construction
    /// already validated them, so this only fires for an engine built from
    /// a configuration mutated through unsafe means — but the clock refuses
    /// a zero modulus regardless.
    pub fn start<S: FrameScheduler>(
        &mut self,
        scheduler: &mut S,
        tracer: &mut Tracer<'_>,
    ) -> Result<(), ConfigError> {
        if self.state == EngineState::Running {
            return Ok(());
        }

        let clock = SimClock::new(self.config.loop_length, self.config.animation_speed)?;
        tracer.started(&StartEvent {
            loop_length: clock.loop_length(),
            step: clock.step(),
        });
        if !self.rejections_reported {
            for rejection in &self.rejections {
                tracer.record_rejected(rejection);
            }
            self.rejections_reported = true;
        }

        self.clock = Some(clock);
        self.state = EngineState::Running;
        self.pending = Some(scheduler.schedule());
        Ok(())
    }

    /// One tick: advance time, rebuild the trail layer, compose, hand off,
    /// re-arm.
    ///
    /// Called by platform glue when the armed callback fires. A callback
    /// that fires after [`stop`](Self::stop) is ignored.
    pub fn on_frame<S: FrameScheduler, H: RenderHost>(
        &mut self,
        scheduler: &mut S,
        host: &mut H,
        tracer: &mut Tracer<'_>,
    ) {
        if self.state != EngineState::Running {
            return;
        }
        self.pending = None;

        let Some(clock) = self.clock.as_mut() else {
            return;
        };
        let now = clock.advance();
        let frame_index = self.frame_index;
        self.frame_index += 1;
        tracer.tick(&TickEvent { frame_index, time: now });

        let trails =
            layer::trail_layer(&self.trips, now, self.config.trail_length, self.styles.trail);
        let trail_segments = match &trails {
            Some(LayerDescriptor::Trails(layer)) => layer.segments.len(),
            _ => 0,
        };
        let stack = layer::compose(trails, self.stations.clone(), self.edges.clone());
        tracer.compose(&ComposeEvent {
            frame_index,
            layer_count: stack.len(),
            trail_segments,
        });

        let viewport = self.viewport.current();
        match host.draw(&viewport, &stack) {
            Ok(()) => {}
            Err(HostError::Unavailable) => {
                tracer.frame_skipped(&SkipEvent {
                    frame_index,
                    reason: SkipReason::HostUnavailable,
                });
            }
        }

        self.pending = Some(scheduler.schedule());
    }

    /// Transitions `Running → Stopped`, cancelling the pending callback
    /// before returning. Stopping a stopped (or never-started) engine does
    /// nothing.
    pub fn stop<S: FrameScheduler>(&mut self, scheduler: &mut S, tracer: &mut Tracer<'_>) {
        if self.state != EngineState::Running {
            return;
        }
        if let Some(handle) = self.pending.take() {
            scheduler.cancel(handle);
        }
        self.clock = None;
        self.state = EngineState::Stopped;
        tracer.stopped(self.frame_index);
    }

    /// Merges a user camera gesture, relayed by the render host's
    /// interaction layer. Nothing on the animation path calls this.
    pub fn apply_camera(&mut self, update: CameraUpdate) {
        self.viewport.apply(update);
    }

    /// Returns the current camera.
    #[must_use]
    pub fn viewport(&self) -> ViewportState {
        self.viewport.current()
    }

    /// Returns the current simulation time, while running.
    #[must_use]
    pub fn current_time(&self) -> Option<SimTime> {
        self.clock.as_ref().map(SimClock::current)
    }

    /// Returns `true` between `start` and `stop`.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == EngineState::Running
    }

    /// Number of ticks processed since construction.
    #[must_use]
    pub fn frames_processed(&self) -> u64 {
        self.frame_index
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use kurbo::Point;

    use crate::dataset::{StationPoint, StaticEdge};
    use crate::layer::LayerKind;

    use super::*;

    /// Hand-cranked scheduler double.
    #[derive(Debug, Default)]
    struct TestScheduler {
        next: u64,
        pending: Option<FrameHandle>,
        cancelled: Vec<FrameHandle>,
    }

    impl FrameScheduler for TestScheduler {
        fn schedule(&mut self) -> FrameHandle {
            let handle = FrameHandle(self.next);
            self.next += 1;
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

    /// Host double that records successful draws and can go dark.
    #[derive(Debug)]
    struct TestHost {
        available: bool,
        draws: Vec<(ViewportState, Vec<LayerKind>)>,
        attempts: u64,
    }

    impl TestHost {
        fn new() -> Self {
            Self {
                available: true,
                draws: Vec::new(),
                attempts: 0,
            }
        }
    }

    impl RenderHost for TestHost {
        fn draw(
            &mut self,
            viewport: &ViewportState,
            layers: &[LayerDescriptor],
        ) -> Result<(), HostError> {
            self.attempts += 1;
            if !self.available {
                return Err(HostError::Unavailable);
            }
            self.draws
                .push((*viewport, layers.iter().map(LayerDescriptor::kind).collect()));
            Ok(())
        }
    }

    fn config() -> EngineConfig {
        EngineConfig {
            loop_length: 1800,
            animation_speed: 5,
            trail_length: 180,
            initial_viewport: ViewportState::new(-122.41669, 37.7853, 13.0),
        }
    }

    fn scene() -> SceneData {
        SceneData {
            stations: vec![StationPoint {
                name: "Colma".into(),
                passengers: 4214,
                position: Point::new(-122.466233, 37.684638),
            }],
            edges: vec![StaticEdge::new(
                Point::new(-122.41669, 37.7653),
                Point::new(-122.42669, 37.781),
            )],
            trips: vec![
                TripRecord::new(
                    vec![
                        Point::new(-122.42, 37.78),
                        Point::new(-122.41, 37.79),
                        Point::new(-122.40, 37.80),
                    ],
                    vec![0, 60, 120],
                )
                .unwrap(),
            ],
        }
    }

    fn engine() -> Engine {
        Engine::new(config(), Styles::default(), scene()).unwrap()
    }

    #[test]
    fn invalid_configuration_fails_at_construction() {
        let mut bad = config();
        bad.trail_length = 0;
        let err = Engine::new(bad, Styles::default(), scene()).unwrap_err();
        assert_eq!(err, ConfigError::ZeroTrailLength);
    }

    #[test]
    fn start_arms_one_frame() {
        let mut engine = engine();
        let mut scheduler = TestScheduler::default();
        engine.start(&mut scheduler, &mut Tracer::none()).unwrap();

        assert!(engine.is_running());
        assert_eq!(engine.current_time(), Some(SimTime(0)));
        assert!(scheduler.pending.is_some(), "first frame must be armed");
    }

    #[test]
    fn start_twice_is_a_no_op() {
        let mut engine = engine();
        let mut scheduler = TestScheduler::default();
        engine.start(&mut scheduler, &mut Tracer::none()).unwrap();
        engine.start(&mut scheduler, &mut Tracer::none()).unwrap();
        assert_eq!(scheduler.next, 1, "second start must not arm another frame");
    }

    #[test]
    fn tick_advances_time_draws_and_rearms() {
        let mut engine = engine();
        let mut scheduler = TestScheduler::default();
        let mut host = TestHost::new();
        engine.start(&mut scheduler, &mut Tracer::none()).unwrap();

        scheduler.pending.take();
        engine.on_frame(&mut scheduler, &mut host, &mut Tracer::none());

        assert_eq!(engine.current_time(), Some(SimTime(5)));
        assert_eq!(host.draws.len(), 1);
        let (viewport, kinds) = &host.draws[0];
        assert_eq!(viewport, &config().initial_viewport);
        assert_eq!(
            kinds,
            &vec![LayerKind::Trails, LayerKind::Stations, LayerKind::Edges]
        );
        assert!(scheduler.pending.is_some(), "next frame must be armed");
    }

    #[test]
    fn time_follows_the_modulo_law_across_ticks() {
        let mut engine = engine();
        let mut scheduler = TestScheduler::default();
        let mut host = TestHost::new();
        engine.start(&mut scheduler, &mut Tracer::none()).unwrap();

        let mut expected = 0_u64;
        for _ in 0..1000 {
            scheduler.pending.take();
            engine.on_frame(&mut scheduler, &mut host, &mut Tracer::none());
            expected = (expected + 5) % 1800;
            assert_eq!(engine.current_time(), Some(SimTime(expected)));
        }
    }

    #[test]
    fn viewport_is_bit_identical_after_1000_ticks() {
        let mut engine = engine();
        let mut scheduler = TestScheduler::default();
        let mut host = TestHost::new();
        let initial = engine.viewport();
        engine.start(&mut scheduler, &mut Tracer::none()).unwrap();

        for _ in 0..1000 {
            scheduler.pending.take();
            engine.on_frame(&mut scheduler, &mut host, &mut Tracer::none());
        }
        assert_eq!(engine.viewport(), initial);
    }

    #[test]
    fn stop_cancels_the_pending_frame() {
        let mut engine = engine();
        let mut scheduler = TestScheduler::default();
        engine.start(&mut scheduler, &mut Tracer::none()).unwrap();
        let armed = scheduler.pending.expect("start arms a frame");

        engine.stop(&mut scheduler, &mut Tracer::none());
        assert!(!engine.is_running());
        assert_eq!(engine.current_time(), None, "clock is destroyed on stop");
        assert_eq!(scheduler.cancelled, vec![armed]);
        assert!(scheduler.pending.is_none());
    }

    #[test]
    fn stop_is_idempotent() {
        let mut engine = engine();
        let mut scheduler = TestScheduler::default();
        engine.start(&mut scheduler, &mut Tracer::none()).unwrap();
        engine.stop(&mut scheduler, &mut Tracer::none());
        engine.stop(&mut scheduler, &mut Tracer::none());

        assert_eq!(scheduler.cancelled.len(), 1, "cancel must reach the scheduler once");
    }

    #[test]
    fn stop_before_start_is_a_no_op() {
        let mut engine = engine();
        let mut scheduler = TestScheduler::default();
        engine.stop(&mut scheduler, &mut Tracer::none());
        assert!(scheduler.cancelled.is_empty());
    }

    #[test]
    fn stale_callback_after_stop_does_not_tick() {
        let mut engine = engine();
        let mut scheduler = TestScheduler::default();
        let mut host = TestHost::new();
        engine.start(&mut scheduler, &mut Tracer::none()).unwrap();
        engine.stop(&mut scheduler, &mut Tracer::none());

        // The host delivers a callback that was in flight anyway.
        engine.on_frame(&mut scheduler, &mut host, &mut Tracer::none());
        assert_eq!(host.attempts, 0);
        assert_eq!(engine.frames_processed(), 0);
    }

    #[test]
    fn unavailable_host_skips_the_draw_but_time_advances() {
        let mut engine = engine();
        let mut scheduler = TestScheduler::default();
        let mut host = TestHost::new();
        host.available = false;
        engine.start(&mut scheduler, &mut Tracer::none()).unwrap();

        scheduler.pending.take();
        engine.on_frame(&mut scheduler, &mut host, &mut Tracer::none());
        assert!(host.draws.is_empty(), "no frame reaches the surface");
        assert_eq!(engine.current_time(), Some(SimTime(5)));
        assert!(scheduler.pending.is_some(), "retry is armed for the next tick");

        // The host comes back; the next tick draws normally.
        host.available = true;
        scheduler.pending.take();
        engine.on_frame(&mut scheduler, &mut host, &mut Tracer::none());
        assert_eq!(host.draws.len(), 1);
        assert_eq!(engine.current_time(), Some(SimTime(10)));
    }

    #[test]
    fn camera_updates_flow_only_through_apply_camera() {
        let mut engine = engine();
        let mut scheduler = TestScheduler::default();
        let mut host = TestHost::new();
        engine.start(&mut scheduler, &mut Tracer::none()).unwrap();

        engine.apply_camera(CameraUpdate {
            zoom: Some(14.0),
            ..CameraUpdate::default()
        });
        scheduler.pending.take();
        engine.on_frame(&mut scheduler, &mut host, &mut Tracer::none());

        assert_eq!(host.draws[0].0.zoom, 14.0);
        assert_eq!(host.draws[0].0.longitude, -122.41669);
    }

    #[cfg(feature = "trace")]
    #[test]
    fn rejected_records_are_surfaced_once_at_start() {
        use crate::trace::TraceSink;

        #[derive(Default)]
        struct CountingSink {
            rejections: Vec<usize>,
        }
        impl TraceSink for CountingSink {
            fn on_record_rejected(&mut self, r: &RecordRejection) {
                self.rejections.push(r.trip_index);
            }
        }

        let mut data = scene();
        data.trips.push(
            TripRecord::new(
                vec![
                    Point::new(0.0, 0.0),
                    Point::new(0.0, 1.0),
                    Point::new(1.0, 1.0),
                ],
                vec![0, 5, 3],
            )
            .unwrap(),
        );

        let mut engine = Engine::new(config(), Styles::default(), data).unwrap();
        let mut scheduler = TestScheduler::default();
        let mut sink = CountingSink::default();

        engine.start(&mut scheduler, &mut Tracer::new(&mut sink)).unwrap();
        engine.stop(&mut scheduler, &mut Tracer::new(&mut sink));
        engine.start(&mut scheduler, &mut Tracer::new(&mut sink)).unwrap();

        assert_eq!(sink.rejections, vec![1], "one diagnostic for the one bad record");
    }

    #[cfg(feature = "trace")]
    #[test]
    fn skipped_frames_are_surfaced() {
        use crate::trace::TraceSink;

        #[derive(Default)]
        struct SkipSink {
            skips: u64,
        }
        impl TraceSink for SkipSink {
            fn on_frame_skipped(&mut self, _e: &SkipEvent) {
                self.skips += 1;
            }
        }

        let mut engine = engine();
        let mut scheduler = TestScheduler::default();
        let mut host = TestHost::new();
        host.available = false;
        let mut sink = SkipSink::default();

        engine.start(&mut scheduler, &mut Tracer::new(&mut sink)).unwrap();
        scheduler.pending.take();
        engine.on_frame(&mut scheduler, &mut host, &mut Tracer::new(&mut sink));
        assert_eq!(sink.skips, 1);
    }
}
