// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Timestamps
//! are printed in the producer's clock, unconverted.

use std::io::Write;

use strata_core::trace::{
    FailureEvent, LayerVisibilityEvent, OcclusionEvent, StepEvent, TraceSink, TreeBuiltEvent,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    per_layer: bool,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("per_layer", &self.per_layer)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::with_writer(Box::new(std::io::stderr()))
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self::with_writer(writer)
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            per_layer: false,
        }
    }

    /// Also print one line per layer after each snapshot's occlusion pass.
    #[must_use]
    pub fn per_layer(mut self, enabled: bool) -> Self {
        self.per_layer = enabled;
        self
    }

    /// Consumes the sink, returning the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_tree_built(&mut self, e: &TreeBuiltEvent) {
        let _ = writeln!(
            self.writer,
            "[tree] t={} layers={} roots={}",
            e.timestamp, e.layer_count, e.root_count,
        );
    }

    fn on_occlusion(&mut self, e: &OcclusionEvent) {
        let _ = writeln!(
            self.writer,
            "[occlusion] t={} visible={} occluded={} partial={}",
            e.timestamp, e.visible, e.occluded, e.partially_occluded,
        );
    }

    fn on_step(&mut self, e: &StepEvent) {
        let _ = writeln!(
            self.writer,
            "[step] entry={} t={} group={} {}",
            e.entry_index,
            e.timestamp,
            e.group_index,
            e.outcome.as_str(),
        );
    }

    fn on_failure(&mut self, e: &FailureEvent) {
        let _ = writeln!(
            self.writer,
            "[failure] group={} anchored at entry={} t={}",
            e.group_index, e.entry_index, e.timestamp,
        );
    }

    fn wants_layer_visibility(&self) -> bool {
        self.per_layer
    }

    fn on_layer_visibility(&mut self, timestamp: i64, layers: &[LayerVisibilityEvent]) {
        for layer in layers {
            let state = if layer.visible { "visible" } else { "hidden" };
            let _ = writeln!(
                self.writer,
                "[layer] t={timestamp} id={} {state} occluded_by={} covered_by={}",
                layer.layer, layer.occluded_by, layer.covered_by,
            );
        }
    }
}
