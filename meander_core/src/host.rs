// Copyright 2026 the Meander Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render boundary contract.
//!
//! The host is an external collaborator: it draws whatever ordered stack the
//! engine hands it, owns the basemap substrate (configured with an opaque
//! [`AccessToken`]), and owns the camera-interaction surface, relaying user
//! gestures back through [`Engine::apply_camera`]. The engine never waits on
//! the host — a failed draw skips that frame and the next host-paced tick
//! retries.
//!
//! [`AccessToken`]: crate::config::AccessToken
//! [`Engine::apply_camera`]: crate::engine::Engine::apply_camera

use crate::error::HostError;
use crate::layer::LayerDescriptor;
use crate::viewport::ViewportState;

/// Draws one frame from an ordered layer stack and the current camera.
pub trait RenderHost {
    /// Draws `layers` back-to-front under `viewport`.
    ///
    /// # Errors
    ///
    /// [`HostError::Unavailable`] when the drawing surface is not ready;
    /// the engine skips the frame, keeps simulation time intact, and
    /// retries next tick.
    fn draw(
        &mut self,
        viewport: &ViewportState,
        layers: &[LayerDescriptor],
    ) -> Result<(), HostError>;
}
