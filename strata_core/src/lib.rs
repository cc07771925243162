// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer snapshots, occlusion and region geometry for visual state checks.
//!
//! `strata_core` turns captured scene snapshots into something checks can
//! query. It is `no_std` compatible (with `alloc`) and stores each snapshot's
//! layer tree in struct-of-arrays form with index handles.
//!
//! # Architecture
//!
//! Each snapshot is processed once, at ingestion:
//!
//! ```text
//!   Vec<Layer> (flat, parent ids)
//!       │
//!       ▼
//!   LayerTree::build() ──► LayerTree ──► OcclusionResult::compute()
//!                                                │
//!                 ┌──────────────────────────────┘
//!                 ▼
//!   Snapshot ──► SnapshotSequence ──► checks (strata_check)
//! ```
//!
//! **[`layer`]** — The captured [`Layer`](layer::Layer) record, the
//! [`LayerTree`](layer::LayerTree) rebuilt from parent references, and the
//! front-to-back occlusion pass that decides visibility.
//!
//! **[`region`]** — Rectangle-set regions with coverage tests that report
//! the offending remainder.
//!
//! **[`snapshot`]** — [`Snapshot`](snapshot::Snapshot) and
//! [`SnapshotSequence`](snapshot::SnapshotSequence) with name- and id-based
//! queries.
//!
//! **[`transform`]** — 3D affine transform type for layer positioning.
//!
//! **[`window`]** — Window-manager snapshots: windows in z-order, display
//! rotation, focus, and task display areas with unique activity owners.
//!
//! **[`trace`]** — [`TraceSink`](trace::TraceSink) trait and event types for
//! ingestion and verification instrumentation, with zero-overhead
//! [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-layer
//!   visibility events.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

mod error;

pub mod layer;
pub mod region;
pub mod snapshot;
pub mod trace;
pub mod transform;
pub mod window;

pub use error::BuildError;
