// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Assertions over sequences of layer snapshots.
//!
//! `strata_check` verifies claims about how the visible state of a scene
//! evolves over a captured trace. It is `no_std` compatible (with `alloc`).
//!
//! # Architecture
//!
//! ```text
//!   SnapshotSequence (strata_core)
//!       │
//!       ▼
//!   LayersTraceCheck ──► AssertionSequence ──► verify() ──► Failures
//!       │                    │
//!       │                    └─ AssertionGroup ─► Assertion(&Snapshot)
//!       │                                              │
//!       │                          EntryCheck / LayerCheck / RegionCheck
//!       ▼
//!   check_no_flicker()
//! ```
//!
//! **[`sequence`]** — The hand-off state machine. Each group must hold for
//! at least one entry before the next takes over; failures are collected
//! with the entry they are anchored at.
//!
//! **[`entry`]**, **[`layer`]**, **[`region`]** — Single-snapshot checks
//! returning [`CheckFailure`] facts.
//!
//! **[`flicker`]** — Detection of layers visible for a single entry.
//!
//! **[`layers_trace`]** — [`LayersTraceCheck`], the fluent front end.
//!
//! **[`window`]**, **[`window_trace`]** — The same model over
//! window-manager snapshots: z-order, app-window stacking, frame coverage,
//! rotation and focus, fronted by [`WindowTraceCheck`].
//!
//! # Crate features
//!
//! - `trace` (disabled by default): Forwards sequencer steps and failures
//!   to a [`TraceSink`](strata_core::trace::TraceSink).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

use alloc::vec::Vec;

use strata_core::layer::Layer;
use strata_core::snapshot::SnapshotSequence;
use strata_core::trace::Tracer;

pub mod assertion;
pub mod config;
pub mod entry;
pub mod fact;
pub mod failure;
pub mod flicker;
pub mod layer;
pub mod layers_trace;
pub mod region;
pub mod sequence;
pub mod window;
pub mod window_trace;

pub use config::{CheckConfig, GroupMatch};
pub use fact::Fact;
pub use failure::{
    Anchor, CheckFailure, CheckResult, Failure, FailureKind, Failures, VerifyError,
};
pub use layers_trace::LayersTraceCheck;
pub use window_trace::WindowTraceCheck;

/// Builds a trace from raw frames and runs the checks `configure`
/// registers on it over every entry.
///
/// # Errors
///
/// [`VerifyError::Structural`] if a frame is malformed, otherwise
/// [`VerifyError::Failed`] with every failure found.
pub fn verify_frames(
    frames: impl IntoIterator<Item = (i64, Vec<Layer>)>,
    config: CheckConfig,
    tracer: &mut Tracer<'_>,
    configure: impl FnOnce(&mut LayersTraceCheck<'_>),
) -> Result<(), VerifyError> {
    let trace = SnapshotSequence::build(frames, &mut tracer.reborrow())?;
    let mut check = LayersTraceCheck::with_config(&trace, config);
    configure(&mut check);
    check.for_all_entries_traced(tracer)?;
    Ok(())
}
