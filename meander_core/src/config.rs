// Copyright 2026 the Meander Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Engine configuration, validated eagerly.
//!
//! Every field is required and checked up front by
//! [`EngineConfig::validate`]; invalid values are rejected rather than
//! silently replaced with defaults, so a misconfigured engine fails at
//! construction instead of misbehaving mid-animation.

use alloc::string::String;
use core::fmt;

use crate::error::ConfigError;
use crate::viewport::ViewportState;

/// Opaque basemap access credential.
///
/// The engine never parses the value; it is handed to the render host at
/// mount for whatever tile substrate the host uses. `Debug` redacts the
/// value so tokens do not leak into logs.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wraps a credential string.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw credential for substitution into a host request.
    #[must_use]
    pub fn reveal(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccessToken(redacted)")
    }
}

/// All knobs required to run the engine.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    /// Total length of the looping timeline, in timeline units.
    pub loop_length: u64,
    /// Timeline units added per tick.
    pub animation_speed: u64,
    /// Length of the trailing window behind the current time.
    pub trail_length: u64,
    /// Camera at mount. Mutated afterwards only by user interaction.
    pub initial_viewport: ViewportState,
}

impl EngineConfig {
    /// Checks every field, reporting the first violation.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.loop_length == 0 {
            return Err(ConfigError::ZeroLoopLength);
        }
        if self.animation_speed == 0 {
            return Err(ConfigError::ZeroAnimationSpeed);
        }
        if self.trail_length == 0 {
            return Err(ConfigError::ZeroTrailLength);
        }
        if !self.initial_viewport.is_finite() {
            return Err(ConfigError::NonFiniteViewport);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> EngineConfig {
        EngineConfig {
            loop_length: 1800,
            animation_speed: 5,
            trail_length: 180,
            initial_viewport: ViewportState::new(-122.41669, 37.7853, 13.0),
        }
    }

    #[test]
    fn valid_config_passes() {
        assert_eq!(valid().validate(), Ok(()));
    }

    #[test]
    fn each_zero_field_is_named() {
        let mut config = valid();
        config.loop_length = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroLoopLength));

        let mut config = valid();
        config.animation_speed = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroAnimationSpeed));

        let mut config = valid();
        config.trail_length = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroTrailLength));
    }

    #[test]
    fn non_finite_viewport_is_rejected() {
        let mut config = valid();
        config.initial_viewport.latitude = f64::NAN;
        assert_eq!(config.validate(), Err(ConfigError::NonFiniteViewport));
    }

    #[test]
    fn token_debug_is_redacted() {
        use alloc::format;

        let token = AccessToken::new("pk.super-secret");
        assert_eq!(format!("{token:?}"), "AccessToken(redacted)");
        assert_eq!(token.reveal(), "pk.super-secret");
    }
}
