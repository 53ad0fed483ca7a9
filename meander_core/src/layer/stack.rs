// Copyright 2026 the Meander Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deterministic draw-order composition.

use alloc::vec::Vec;

use super::LayerDescriptor;

/// Orders the frame's layers back-to-front: trails under stations, stations
/// under edges.
///
/// The order is fixed across calls — visual overlap depends on it — and
/// absent layers are omitted rather than inserted as empty placeholders, so
/// the result length always equals the number of `Some` inputs.
#[must_use]
pub fn compose(
    trails: Option<LayerDescriptor>,
    stations: Option<LayerDescriptor>,
    edges: Option<LayerDescriptor>,
) -> Vec<LayerDescriptor> {
    let mut stack = Vec::with_capacity(3);
    if let Some(layer) = trails {
        stack.push(layer);
    }
    if let Some(layer) = stations {
        stack.push(layer);
    }
    if let Some(layer) = edges {
        stack.push(layer);
    }
    stack
}
