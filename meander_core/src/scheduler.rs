// Copyright 2026 the Meander Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host frame-callback contract.
//!
//! The engine never spins its own loop. The surrounding platform owns
//! pacing: the engine arms exactly one callback per tick through
//! [`FrameScheduler::schedule`] and keeps the returned [`FrameHandle`] in an
//! owned field, so stopping can revoke the pending callback synchronously
//! without any closure holding mutable engine state.
//!
//! Backends map this onto their native mechanism (the browser's
//! `requestAnimationFrame`/`cancelAnimationFrame` pair, a compositor frame
//! callback, a test double). There is no ordering guarantee relative to
//! work scheduled outside the engine, and a callback may be dropped by the
//! host under load — the engine only advances time when a callback actually
//! fires, so a dropped frame can never corrupt the timeline.

use core::fmt;

/// Identifies one pending frame callback.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

impl fmt::Debug for FrameHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FrameHandle({})", self.0)
    }
}

/// A cancellable source of per-frame callbacks.
pub trait FrameScheduler {
    /// Arms one callback at the next display refresh and returns its handle.
    fn schedule(&mut self) -> FrameHandle;

    /// Revokes a pending callback before returning.
    ///
    /// Cancelling a handle that already fired, or was never issued, is a
    /// no-op.
    fn cancel(&mut self, handle: FrameHandle);
}
