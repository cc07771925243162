// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Forwarding of trace events to the [`tracing`] ecosystem.
//!
//! [`TracingSink`] turns every event into a `tracing` event under the
//! `strata` target, with the event fields as structured key-values. Install
//! any subscriber to collect them; without one the calls are cheap no-ops.

use strata_core::trace::{
    FailureEvent, LayerVisibilityEvent, OcclusionEvent, StepEvent, TraceSink, TreeBuiltEvent,
};
use tracing::{debug, trace, warn};

/// A [`TraceSink`] that emits `tracing` events.
///
/// Ingestion and sequencer steps are logged at `debug`, recorded failures at
/// `warn`, and per-layer visibility at `trace`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl TracingSink {
    /// Creates the sink.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl TraceSink for TracingSink {
    fn on_tree_built(&mut self, e: &TreeBuiltEvent) {
        debug!(
            target: "strata",
            timestamp = e.timestamp,
            layers = e.layer_count,
            roots = e.root_count,
            "snapshot tree built"
        );
    }

    fn on_occlusion(&mut self, e: &OcclusionEvent) {
        debug!(
            target: "strata",
            timestamp = e.timestamp,
            visible = e.visible,
            occluded = e.occluded,
            partially_occluded = e.partially_occluded,
            "occlusion computed"
        );
    }

    fn on_step(&mut self, e: &StepEvent) {
        debug!(
            target: "strata",
            entry = e.entry_index,
            timestamp = e.timestamp,
            group = e.group_index,
            outcome = e.outcome.as_str(),
            "sequencer step"
        );
    }

    fn on_failure(&mut self, e: &FailureEvent) {
        warn!(
            target: "strata",
            entry = e.entry_index,
            timestamp = e.timestamp,
            group = e.group_index,
            "assertion group failed"
        );
    }

    fn wants_layer_visibility(&self) -> bool {
        tracing::enabled!(target: "strata", tracing::Level::TRACE)
    }

    fn on_layer_visibility(&mut self, timestamp: i64, layers: &[LayerVisibilityEvent]) {
        for layer in layers {
            trace!(
                target: "strata",
                timestamp,
                layer = layer.layer.0,
                visible = layer.visible,
                occluded_by = layer.occluded_by,
                covered_by = layer.covered_by,
                "layer visibility"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::layer::Layer;
    use strata_core::snapshot::Snapshot;
    use strata_core::trace::Tracer;

    #[test]
    fn no_subscriber_skips_per_layer_records() {
        let sink = TracingSink::new();
        assert!(
            !sink.wants_layer_visibility(),
            "no subscriber is installed, so trace level is disabled"
        );
    }

    #[test]
    fn forwards_ingestion_without_a_subscriber() {
        let mut sink = TracingSink::new();
        let snapshot = Snapshot::build(
            0,
            vec![Layer::new(1, "Root").with_buffer(1, 1)],
            &mut Tracer::new(&mut sink),
        );
        assert!(snapshot.is_ok(), "{snapshot:?}");
    }
}
