// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pretty-printing, `tracing` forwarding, and JSON failure reports for
//! strata diagnostics.
//!
//! This crate provides [`TraceSink`](strata_core::trace::TraceSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`] — human-readable one-line-per-event output.
//! - [`log::TracingSink`] — forwards events to a `tracing` subscriber.
//!
//! and [`report`], which renders verification failures as JSON.

pub mod log;
pub mod pretty;
pub mod report;
