// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fluent checks over a whole layers trace.
//!
//! Assertions registered on a [`LayersTraceCheck`] are collected into groups
//! and only run when [`for_all_entries`](LayersTraceCheck::for_all_entries)
//! or [`for_range`](LayersTraceCheck::for_range) is called. Consecutive
//! assertions land in the same group; [`then`](LayersTraceCheck::then)
//! closes the group so the next assertion starts a new one:
//!
//! ```
//! use kurbo::Rect;
//! use strata_check::LayersTraceCheck;
//! use strata_core::layer::Layer;
//! use strata_core::snapshot::{Snapshot, SnapshotSequence};
//!
//! let frame = |ts, visible: bool| {
//!     let mut app = Layer::new(1, "App").with_bounds(Rect::new(0., 0., 10., 10.)).with_buffer(10, 10);
//!     if !visible {
//!         app = app.hidden();
//!     }
//!     Snapshot::new(ts, vec![app]).unwrap()
//! };
//! let trace = SnapshotSequence::from_entries(vec![frame(0, true), frame(1, true), frame(2, false)]);
//!
//! let mut check = LayersTraceCheck::new(&trace);
//! check.is_visible(&["App"]).then().is_invisible(&["App"]);
//! assert!(check.for_all_entries().is_ok());
//! ```

use alloc::collections::BTreeSet;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use strata_core::region::Region;
use strata_core::snapshot::{Snapshot, SnapshotSequence};
use strata_core::trace::Tracer;

use crate::config::CheckConfig;
use crate::entry::{EntryCheck, discard};
use crate::fact::{Fact, join};
use crate::failure::{CheckFailure, CheckResult, Failures};
use crate::flicker::{check_no_flicker, visible_layer_names};
use crate::layer::LayerCheck;
use crate::region::RegionCheck;
use crate::sequence::AssertionSequence;

/// Builder and runner for assertions over a [`SnapshotSequence`].
pub struct LayersTraceCheck<'a> {
    trace: &'a SnapshotSequence,
    config: CheckConfig,
    sequence: AssertionSequence<Snapshot>,
    new_group: bool,
}

impl core::fmt::Debug for LayersTraceCheck<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LayersTraceCheck")
            .field("entries", &self.trace.len())
            .field("config", &self.config)
            .field("sequence", &self.sequence)
            .field("new_group", &self.new_group)
            .finish()
    }
}

fn owned(names: &[&str]) -> Vec<String> {
    names.iter().map(ToString::to_string).collect()
}

fn borrowed(names: &[String]) -> Vec<&str> {
    names.iter().map(String::as_str).collect()
}

impl<'a> LayersTraceCheck<'a> {
    /// Starts checking `trace` with the default configuration.
    #[must_use]
    pub fn new(trace: &'a SnapshotSequence) -> Self {
        Self::with_config(trace, CheckConfig::default())
    }

    /// Starts checking `trace` with `config`.
    #[must_use]
    pub fn with_config(trace: &'a SnapshotSequence, config: CheckConfig) -> Self {
        Self {
            trace,
            config,
            sequence: AssertionSequence::new(),
            new_group: true,
        }
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &CheckConfig {
        &self.config
    }

    /// The registered assertion groups.
    #[must_use]
    pub fn sequence(&self) -> &AssertionSequence<Snapshot> {
        &self.sequence
    }

    /// Registers an arbitrary entry assertion under `name`.
    pub fn custom(
        &mut self,
        name: impl Into<String>,
        check: impl Fn(&Snapshot) -> CheckResult + 'static,
    ) -> &mut Self {
        if self.new_group {
            self.sequence.add(name, check);
        } else {
            self.sequence.append(name, check);
        }
        self.new_group = false;
        self
    }

    /// Closes the current group; the next assertion starts a new one.
    pub fn then(&mut self) -> &mut Self {
        self.new_group = true;
        self
    }

    /// Ignores leading entries until the first group passes.
    pub fn skip_until_first_assertion(&mut self) -> &mut Self {
        self.config.skip_leading = true;
        self
    }

    /// Marks the current group as a hard precondition.
    pub fn precondition(&mut self) -> &mut Self {
        self.sequence.as_precondition();
        self
    }

    /// Every entry holds a layer matching `names`.
    pub fn contains(&mut self, names: &[&str]) -> &mut Self {
        let names = owned(names);
        self.custom(alloc::format!("contains({})", join(&names)), move |s| {
            discard(EntryCheck::new(s).contains(&borrowed(&names)))
        })
    }

    /// No entry holds a layer matching `names`.
    pub fn not_contains(&mut self, names: &[&str]) -> &mut Self {
        let names = owned(names);
        self.custom(alloc::format!("not_contains({})", join(&names)), move |s| {
            discard(EntryCheck::new(s).not_contains(&borrowed(&names)))
        })
    }

    /// A layer matching `names` is visible.
    pub fn is_visible(&mut self, names: &[&str]) -> &mut Self {
        let names = owned(names);
        self.custom(alloc::format!("is_visible({})", join(&names)), move |s| {
            discard(EntryCheck::new(s).is_visible(&borrowed(&names)))
        })
    }

    /// No layer matching `names` is visible.
    pub fn is_invisible(&mut self, names: &[&str]) -> &mut Self {
        let names = owned(names);
        self.custom(alloc::format!("is_invisible({})", join(&names)), move |s| {
            discard(EntryCheck::new(s).is_invisible(&borrowed(&names)))
        })
    }

    /// The visible region of layers matching `names` covers `region`.
    pub fn covers_at_least(&mut self, region: Region, names: &[&str]) -> &mut Self {
        self.region_assertion("covers_at_least", region, names, |check, target| {
            check.covers_at_least(target)
        })
    }

    /// The visible region of layers matching `names` stays inside `region`.
    pub fn covers_at_most(&mut self, region: Region, names: &[&str]) -> &mut Self {
        self.region_assertion("covers_at_most", region, names, |check, target| {
            check.covers_at_most(target)
        })
    }

    /// The visible region of layers matching `names` is exactly `region`.
    pub fn covers_exactly(&mut self, region: Region, names: &[&str]) -> &mut Self {
        self.region_assertion("covers_exactly", region, names, |check, target| {
            check.covers_exactly(target)
        })
    }

    fn region_assertion(
        &mut self,
        label: &str,
        region: Region,
        names: &[&str],
        compare: fn(&RegionCheck, &Region) -> CheckResult,
    ) -> &mut Self {
        let names = owned(names);
        let composition_only = self.config.use_composition_region_only;
        let name = alloc::format!("{label}({region}, {})", join(&names));
        self.custom(name, move |s| {
            let check = EntryCheck::new(s).visible_region(&borrowed(&names), composition_only)?;
            compare(&check, &region)
        })
    }

    /// Runs the registered groups over every entry.
    ///
    /// # Errors
    ///
    /// Every failure the sequencer found.
    pub fn for_all_entries(&self) -> Result<(), Failures> {
        self.for_all_entries_traced(&mut Tracer::none())
    }

    /// Like [`for_all_entries`](Self::for_all_entries), reporting each
    /// sequencer step to `tracer`.
    ///
    /// # Errors
    ///
    /// Every failure the sequencer found.
    pub fn for_all_entries_traced(&self, tracer: &mut Tracer<'_>) -> Result<(), Failures> {
        self.sequence
            .verify(self.trace.entries(), &self.config, tracer)
    }

    /// Runs the registered groups over entries with
    /// `start <= timestamp <= end`.
    ///
    /// # Errors
    ///
    /// Every failure the sequencer found.
    pub fn for_range(&self, start: i64, end: i64) -> Result<(), Failures> {
        self.sequence.verify(
            self.trace.range(start, end),
            &self.config,
            &mut Tracer::none(),
        )
    }

    /// Checks that the buffered layer named `name` presents `frames` in
    /// order, starting from the first entry showing `frames[0]`.
    ///
    /// Repeated frames across entries count once. An empty `frames` passes.
    ///
    /// # Errors
    ///
    /// Reports the expected frames and the frames actually found.
    pub fn has_frame_sequence(&self, name: &str, frames: &[u64]) -> CheckResult {
        let Some(&first) = frames.first() else {
            return Ok(());
        };

        let mut seen = BTreeSet::new();
        let found: Vec<u64> = self
            .trace
            .iter()
            .filter_map(|snapshot| snapshot.layer_with_buffer(name))
            .map(|view| view.layer().current_frame)
            .filter(|frame| seen.insert(*frame))
            .skip_while(|frame| *frame != first)
            .collect();

        let prefix = &found[..found.len().min(frames.len())];
        if prefix == frames {
            return Ok(());
        }
        Err(CheckFailure::from_facts(alloc::vec![
            Fact::new("Could not find frame sequence for", name),
            Fact::new("Expected frames", join(frames.iter().map(u64::to_string))),
            Fact::new("Found frames", join(found.iter().map(u64::to_string))),
        ]))
    }

    /// Checks that every visible layer stays visible for at least two
    /// consecutive entries, ignoring names that contain any of `ignore`.
    ///
    /// Pass [`CheckConfig::flicker_ignore_names`] for the usual transient
    /// starting windows.
    ///
    /// # Errors
    ///
    /// One flicker failure per offending entry.
    pub fn visible_layers_shown_more_than_one_consecutive_entry(
        &self,
        ignore: &[&str],
    ) -> Result<(), Failures> {
        check_no_flicker(self.trace.entries(), |snapshot| {
            visible_layer_names(snapshot, ignore)
        })
    }

    /// Checks on the entry captured at exactly `timestamp`.
    #[must_use]
    pub fn entry(&self, timestamp: i64) -> Option<EntryCheck<'a>> {
        self.trace.entry_at(timestamp).map(EntryCheck::new)
    }

    /// Checks on the first entry.
    #[must_use]
    pub fn first(&self) -> Option<EntryCheck<'a>> {
        self.trace.first().map(EntryCheck::new)
    }

    /// Checks on the last entry.
    #[must_use]
    pub fn last(&self) -> Option<EntryCheck<'a>> {
        self.trace.last().map(EntryCheck::new)
    }

    /// The first match for `name` (and `frame`, when given) in any entry.
    ///
    /// Returns a check for a missing layer when no entry has one.
    #[must_use]
    pub fn layer(&self, name: &'a str, frame: Option<u64>) -> LayerCheck<'a> {
        let trace: &'a SnapshotSequence = self.trace;
        trace
            .iter()
            .map(|snapshot| EntryCheck::new(snapshot).layer(name, frame))
            .find(|check| check.view().is_some())
            .unwrap_or(LayerCheck::new(name, None))
    }
}
