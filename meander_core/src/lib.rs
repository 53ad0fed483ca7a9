// Copyright 2026 the Meander Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame-driven trail animation over geospatial layer stacks.
//!
//! `meander_core` owns the temporal logic of an animated transit map: a
//! fixed-modulo simulation clock sweeps a trailing window along trip paths,
//! and each tick recomposes an ordered stack of immutable layer descriptors
//! that a render host draws under an independently-controlled camera. It is
//! `no_std` compatible (with `alloc`); everything platform-specific lives in
//! backend crates.
//!
//! # Architecture
//!
//! The crate is organized around a frame loop that turns host display
//! callbacks into freshly composed layer stacks:
//!
//! ```text
//!   FrameScheduler (host tick source)
//!       │ armed callback fires
//!       ▼
//!   Engine::on_frame ──► SimClock::advance ──► layer::trail_layer
//!                                                    │
//!                      layer::compose ◄──────────────┘
//!                            │
//!                            ▼
//!              RenderHost::draw(viewport, layers)
//! ```
//!
//! **[`clock`]** — `SimTime` and the wrapping `SimClock`. Time always stays
//! in `[0, loop_length)`; the modulo arithmetic is exposed as a free function
//! so the invariant is testable in isolation.
//!
//! **[`trip`]** — Validated trip records and closed-window trail lookup.
//! Records with mismatched path/timestamp lengths are rejected at
//! construction; records with out-of-order timestamps stay constructible but
//! are excluded from rendering so one bad record cannot blank a batch.
//!
//! **[`layer`]** — Immutable layer descriptors, the pure factory functions
//! that build them, and the fixed back-to-front [`compose`](layer::compose)
//! order. Time-dependent descriptors are rebuilt every tick; static ones are
//! built once and shared.
//!
//! **[`viewport`]** — Camera state. Written only through user-interaction
//! updates relayed by the render host, never by the clock.
//!
//! **[`engine`]** — The Stopped/Running lifecycle: arming frames, advancing
//! time, composing, handing off, and cancelling the pending callback on stop.
//!
//! **[`scheduler`]** / **[`host`]** — The two contracts the surrounding
//! platform implements: a cancellable per-frame callback source and a
//! drawing boundary.
//!
//! **[`trace`]** — [`TraceSink`](trace::TraceSink) trait and event types for
//! frame-loop instrumentation, with zero-overhead
//! [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one
//!   branch per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod clock;
pub mod config;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod host;
pub mod layer;
pub mod scheduler;
pub mod trace;
pub mod trip;
pub mod viewport;
