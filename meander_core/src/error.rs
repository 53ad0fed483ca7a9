// Copyright 2026 the Meander Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for configuration, record screening, and the render boundary.
//!
//! Three failure classes with three different policies:
//!
//! - [`ConfigError`] — rejected synchronously at construction or start,
//!   never deferred into a tick. The only fatal class.
//! - [`RecordError`] — per-record defects. The offending record is excluded
//!   from rendering and surfaced once through the trace sink; the rest of
//!   the batch keeps rendering.
//! - [`HostError`] — per-frame render boundary failures. The frame is
//!   skipped, simulation time is retained, and the next host-paced tick
//!   retries.

use core::fmt;

/// Rejected engine configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// `loop_length` was zero.
    ZeroLoopLength,
    /// `animation_speed` was zero.
    ZeroAnimationSpeed,
    /// `trail_length` was zero.
    ZeroTrailLength,
    /// A viewport field was NaN or infinite.
    NonFiniteViewport,
    /// A trip's path and timestamp sequences differ in length.
    MismatchedTripLengths {
        /// Number of path positions.
        path: usize,
        /// Number of timestamps.
        timestamps: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroLoopLength => write!(f, "loop length must be positive"),
            Self::ZeroAnimationSpeed => write!(f, "animation speed must be positive"),
            Self::ZeroTrailLength => write!(f, "trail length must be positive"),
            Self::NonFiniteViewport => write!(f, "viewport fields must be finite"),
            Self::MismatchedTripLengths { path, timestamps } => write!(
                f,
                "trip has {path} path positions but {timestamps} timestamps"
            ),
        }
    }
}

impl core::error::Error for ConfigError {}

/// Why a trip record is excluded from rendering.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordError {
    /// Timestamps must be non-decreasing; `index` is the first position
    /// that goes backwards.
    NonMonotonicTimestamps {
        /// Index of the first out-of-order timestamp.
        index: usize,
    },
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonMonotonicTimestamps { index } => {
                write!(f, "timestamp at index {index} goes backwards")
            }
        }
    }
}

impl core::error::Error for RecordError {}

/// Failure reported by the render host for a single frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostError {
    /// The drawing surface is not ready. The engine skips the frame and
    /// retries on the next tick; host pacing is the only backoff.
    Unavailable,
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "render host is not ready"),
        }
    }
}

impl core::error::Error for HostError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages_name_the_offending_field() {
        use alloc::string::ToString;

        assert_eq!(
            ConfigError::ZeroLoopLength.to_string(),
            "loop length must be positive"
        );
        assert_eq!(
            ConfigError::MismatchedTripLengths {
                path: 4,
                timestamps: 3
            }
            .to_string(),
            "trip has 4 path positions but 3 timestamps"
        );
        assert_eq!(
            RecordError::NonMonotonicTimestamps { index: 2 }.to_string(),
            "timestamp at index 2 goes backwards"
        );
    }
}
