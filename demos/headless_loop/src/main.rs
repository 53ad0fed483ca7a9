// Copyright 2026 the Meander Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated frame loop that exercises the engine end to end.
//!
//! Runs 60 hand-cranked frames over a small transit scene with a
//! [`ManualScheduler`] and [`RecordingHost`], printing one line per tick and
//! a rolling trail-activity sparkline at the end. A deliberately malformed
//! trip is included to show per-record rejection, and the host goes dark for
//! a few frames mid-run to show the skip-and-retry path.

use kurbo::Point;

use meander_core::config::EngineConfig;
use meander_core::dataset::{SceneData, StationPoint, StaticEdge};
use meander_core::engine::Engine;
use meander_core::layer::Styles;
use meander_core::trace::{
    ComposeEvent, RecordRejection, SkipEvent, StartEvent, TickEvent, TraceSink, Tracer,
};
use meander_core::trip::TripRecord;
use meander_core::viewport::ViewportState;
use meander_harness::{FrameStats, ManualScheduler, RecordingHost};

const FRAME_COUNT: u64 = 60;
/// Frames 20..24 simulate a render surface that is not ready.
const DARK_FRAMES: std::ops::Range<u64> = 20..24;

/// Prints each frame-loop event as one aligned stdout line.
#[derive(Debug, Default)]
struct PrintSink;

impl TraceSink for PrintSink {
    fn on_started(&mut self, e: &StartEvent) {
        println!("start  loop={} step={}", e.loop_length, e.step);
    }

    fn on_tick(&mut self, e: &TickEvent) {
        print!("frame {:>3}  t={:>5}", e.frame_index, e.time.units());
    }

    fn on_compose(&mut self, e: &ComposeEvent) {
        print!("  layers={} trails={}", e.layer_count, e.trail_segments);
        println!();
    }

    fn on_frame_skipped(&mut self, e: &SkipEvent) {
        println!("frame {:>3}  skipped: {:?}", e.frame_index, e.reason);
    }

    fn on_record_rejected(&mut self, r: &RecordRejection) {
        println!("reject trip #{}: {}", r.trip_index, r.error);
    }

    fn on_stopped(&mut self, frame_index: u64) {
        println!("stop   after {frame_index} frames");
    }
}

fn scene() -> SceneData {
    let stations = vec![
        StationPoint {
            name: "Colma".into(),
            passengers: 4214,
            position: Point::new(-122.466233, 37.684638),
        },
        StationPoint {
            name: "Civic Center".into(),
            passengers: 24_798,
            position: Point::new(-122.413756, 37.779528),
        },
    ];
    let edges = vec![
        StaticEdge::new(
            Point::new(-122.41669, 37.7653),
            Point::new(-122.42669, 37.781),
        ),
        StaticEdge::new(
            Point::new(-122.41669, 37.7753),
            Point::new(-122.41669, 37.781),
        ),
    ];
    let trips = vec![
        TripRecord::new(
            vec![
                Point::new(-122.466233, 37.684638),
                Point::new(-122.4520, 37.7100),
                Point::new(-122.4380, 37.7400),
                Point::new(-122.4220, 37.7650),
                Point::new(-122.413756, 37.779528),
            ],
            vec![0, 120, 260, 420, 560],
        )
        .expect("trip lengths match"),
        TripRecord::new(
            vec![
                Point::new(-122.4000, 37.7900),
                Point::new(-122.4100, 37.7820),
                Point::new(-122.4200, 37.7750),
                Point::new(-122.4300, 37.7690),
            ],
            vec![80, 300, 520, 740],
        )
        .expect("trip lengths match"),
        // Timestamps go backwards: rejected once at start, never drawn.
        TripRecord::new(
            vec![
                Point::new(-122.40, 37.80),
                Point::new(-122.41, 37.81),
                Point::new(-122.42, 37.82),
            ],
            vec![0, 50, 30],
        )
        .expect("trip lengths match"),
    ];
    SceneData {
        stations,
        edges,
        trips,
    }
}

fn main() {
    let config = EngineConfig {
        loop_length: 1800,
        animation_speed: 15,
        trail_length: 180,
        initial_viewport: ViewportState::new(-122.41669, 37.7853, 13.0),
    };

    let mut engine =
        Engine::new(config, Styles::default(), scene()).expect("configuration is valid");
    let mut scheduler = ManualScheduler::new();
    let mut host = RecordingHost::new();
    let mut sink = PrintSink::default();
    let mut stats = FrameStats::<60>::new();

    engine
        .start(&mut scheduler, &mut Tracer::new(&mut sink))
        .expect("configuration is valid");

    for frame in 0..FRAME_COUNT {
        host.set_available(!DARK_FRAMES.contains(&frame));

        let refusals_before = host.refusals();
        assert!(
            scheduler.fire().is_some(),
            "engine must keep itself armed while running"
        );
        engine.on_frame(&mut scheduler, &mut host, &mut Tracer::new(&mut sink));

        let skipped = host.refusals() > refusals_before;
        let trail_points = host
            .frames()
            .last()
            .map_or(0, |recorded| recorded.trail_segments);
        stats.observe(trail_points, skipped);
    }

    engine.stop(&mut scheduler, &mut Tracer::new(&mut sink));

    println!();
    println!("drawn   {:>3} frames", host.frames().len());
    println!("skipped {:>3} frames", stats.skips());
    println!("trail   [{}]", stats.sparkline_ascii(3));
}
