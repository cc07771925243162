// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for snapshot building and verification.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that
//! snapshot ingestion and the assertion sequencer call as they run. All method
//! bodies default to no-ops, so implementing only the events you care about is
//! fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing. When **on**, each
//! method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace` — enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`) — gates per-layer [`LayerVisibilityEvent`]
//!   records plus the corresponding `TraceSink` method.

#[cfg(feature = "trace-rich")]
use crate::layer::LayerId;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// What the sequencer did with one (group, entry) evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StepOutcome {
    /// The group held; the sequencer moves to the next entry.
    Passed,
    /// The group failed before anything passed and leading skip is on.
    SkippedLeading,
    /// The group stopped holding; the next group takes over this entry.
    HandedOff,
    /// The group failed and a failure was recorded.
    Reported,
}

impl StepOutcome {
    /// Short lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::SkippedLeading => "skipped",
            Self::HandedOff => "handed-off",
            Self::Reported => "reported",
        }
    }
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted after a snapshot's layer tree is linked.
#[derive(Clone, Copy, Debug)]
pub struct TreeBuiltEvent {
    /// Snapshot timestamp.
    pub timestamp: i64,
    /// Number of layers.
    pub layer_count: usize,
    /// Number of roots.
    pub root_count: usize,
}

/// Emitted after occlusion is computed for a snapshot.
#[derive(Clone, Copy, Debug)]
pub struct OcclusionEvent {
    /// Snapshot timestamp.
    pub timestamp: i64,
    /// Layers that ended up visible.
    pub visible: usize,
    /// Layers fully occluded by an opaque layer.
    pub occluded: usize,
    /// Layers with at least one partial occluder.
    pub partially_occluded: usize,
}

/// Emitted for every sequencer step.
#[derive(Clone, Copy, Debug)]
pub struct StepEvent {
    /// Position of the entry in the verified sequence.
    pub entry_index: usize,
    /// Timestamp of that entry.
    pub timestamp: i64,
    /// Position of the group being evaluated.
    pub group_index: usize,
    /// What happened.
    pub outcome: StepOutcome,
}

/// Emitted when the sequencer records a failure.
#[derive(Clone, Copy, Debug)]
pub struct FailureEvent {
    /// Entry the failure is anchored at.
    pub entry_index: usize,
    /// Timestamp of that entry.
    pub timestamp: i64,
    /// Group that failed.
    pub group_index: usize,
}

/// Final visibility of one layer.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug)]
pub struct LayerVisibilityEvent {
    /// The layer.
    pub layer: LayerId,
    /// Whether it ended up visible.
    pub visible: bool,
    /// Number of opaque layers fully covering it.
    pub occluded_by: usize,
    /// Number of translucent layers over it.
    pub covered_by: usize,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from snapshot ingestion and verification.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a snapshot's tree has been built.
    fn on_tree_built(&mut self, e: &TreeBuiltEvent) {
        _ = e;
    }

    /// Called when a snapshot's occlusion has been computed.
    fn on_occlusion(&mut self, e: &OcclusionEvent) {
        _ = e;
    }

    /// Called for every sequencer step.
    fn on_step(&mut self, e: &StepEvent) {
        _ = e;
    }

    /// Called when a failure is recorded.
    fn on_failure(&mut self, e: &FailureEvent) {
        _ = e;
    }

    /// Whether this sink consumes per-layer visibility (requires
    /// `trace-rich` feature). Returning false skips building the records.
    #[cfg(feature = "trace-rich")]
    fn wants_layer_visibility(&self) -> bool {
        true
    }

    /// Called with per-layer visibility for a snapshot (requires `trace-rich`
    /// feature).
    #[cfg(feature = "trace-rich")]
    fn on_layer_visibility(&mut self, timestamp: i64, layers: &[LayerVisibilityEvent]) {
        _ = (timestamp, layers);
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl Default for Tracer<'_> {
    fn default() -> Self {
        Self::none()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Reborrows this tracer for a shorter lifetime.
    #[inline]
    #[must_use]
    pub fn reborrow(&mut self) -> Tracer<'_> {
        #[cfg(feature = "trace")]
        {
            Tracer {
                sink: self.sink.as_deref_mut().map(|s| s as &mut dyn TraceSink),
            }
        }
        #[cfg(not(feature = "trace"))]
        {
            Tracer::none()
        }
    }

    /// Emits a [`TreeBuiltEvent`].
    #[inline]
    pub fn tree_built(&mut self, e: &TreeBuiltEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_tree_built(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`OcclusionEvent`].
    #[inline]
    pub fn occlusion(&mut self, e: &OcclusionEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_occlusion(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`StepEvent`].
    #[inline]
    pub fn step(&mut self, e: &StepEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_step(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`FailureEvent`].
    #[inline]
    pub fn failure(&mut self, e: &FailureEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_failure(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Whether per-layer events would reach a sink.
    #[cfg(feature = "trace-rich")]
    #[inline]
    #[must_use]
    pub fn wants_layer_visibility(&self) -> bool {
        self.sink.as_ref().is_some_and(|s| s.wants_layer_visibility())
    }

    /// Emits per-layer visibility (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn layer_visibility(&mut self, timestamp: i64, layers: &[LayerVisibilityEvent]) {
        if let Some(s) = &mut self.sink {
            s.on_layer_visibility(timestamp, layers);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_step() -> StepEvent {
        StepEvent {
            entry_index: 3,
            timestamp: 1_000,
            group_index: 1,
            outcome: StepOutcome::HandedOff,
        }
    }

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        sink.on_step(&sample_step());
        sink.on_tree_built(&TreeBuiltEvent {
            timestamp: 0,
            layer_count: 4,
            root_count: 1,
        });
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.step(&sample_step());
        tracer.failure(&FailureEvent {
            entry_index: 0,
            timestamp: 0,
            group_index: 0,
        });
    }

    #[test]
    fn outcome_labels() {
        assert_eq!(StepOutcome::Passed.as_str(), "passed");
        assert_eq!(StepOutcome::SkippedLeading.as_str(), "skipped");
        assert_eq!(StepOutcome::Reported.as_str(), "reported");
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::vec::Vec;

        struct RecordingSink {
            steps: Vec<(usize, StepOutcome)>,
        }
        impl TraceSink for RecordingSink {
            fn on_step(&mut self, e: &StepEvent) {
                self.steps.push((e.entry_index, e.outcome));
            }
        }

        let mut sink = RecordingSink { steps: Vec::new() };
        let mut tracer = Tracer::new(&mut sink);
        tracer.reborrow().step(&sample_step());
        tracer.step(&sample_step());
        drop(tracer);
        assert_eq!(sink.steps, [(3, StepOutcome::HandedOff), (3, StepOutcome::HandedOff)]);
    }
}
