// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Checks over a whole snapshot.
//!
//! Layer lookups match on name fragments: a layer matches if its name
//! contains any of the given fragments. Checks return `Result<&Self, _>` so
//! they chain with `?` or [`Result::and_then`].

use strata_core::layer::InvisibleReason;
use strata_core::snapshot::{LayerView, Snapshot};

use crate::fact::{Fact, join};
use crate::failure::{CheckFailure, CheckResult};
use crate::layer::LayerCheck;
use crate::region::RegionCheck;

/// Checks over one snapshot.
#[derive(Clone, Copy, Debug)]
pub struct EntryCheck<'a> {
    snapshot: &'a Snapshot,
}

impl<'a> EntryCheck<'a> {
    /// Starts checking `snapshot`.
    #[must_use]
    pub fn new(snapshot: &'a Snapshot) -> Self {
        Self { snapshot }
    }

    /// The snapshot under check.
    #[must_use]
    pub fn snapshot(&self) -> &'a Snapshot {
        self.snapshot
    }

    /// Passes if the snapshot was captured at `timestamp`.
    ///
    /// # Errors
    ///
    /// Reports the expected and actual timestamps.
    pub fn has_timestamp(&self, timestamp: i64) -> Result<&Self, CheckFailure> {
        let actual = self.snapshot.timestamp();
        if actual == timestamp {
            return Ok(self);
        }
        Err(CheckFailure::from_facts(alloc::vec![
            Fact::label("Wrong entry timestamp"),
            Fact::new("Expected", timestamp),
            Fact::new("Actual", actual),
        ]))
    }

    /// Passes if the snapshot has no layers.
    ///
    /// # Errors
    ///
    /// Reports the layer count.
    pub fn is_empty(&self) -> Result<&Self, CheckFailure> {
        if self.snapshot.is_empty() {
            return Ok(self);
        }
        Err(CheckFailure::from_facts(alloc::vec![
            Fact::label("Entry should be empty"),
            Fact::new("Layers", self.snapshot.len()),
        ]))
    }

    /// Passes if the snapshot has at least one layer.
    ///
    /// # Errors
    ///
    /// Reports that the entry is empty.
    pub fn is_not_empty(&self) -> Result<&Self, CheckFailure> {
        if self.snapshot.is_empty() {
            Err(CheckFailure::new(Fact::label("Entry should not be empty")))
        } else {
            Ok(self)
        }
    }

    /// Passes if the snapshot has exactly `count` layers.
    ///
    /// # Errors
    ///
    /// Reports the expected and actual counts.
    pub fn has_layers_size(&self, count: usize) -> Result<&Self, CheckFailure> {
        let actual = self.snapshot.len();
        if actual == count {
            return Ok(self);
        }
        Err(CheckFailure::from_facts(alloc::vec![
            Fact::label("Wrong number of layers in entry"),
            Fact::new("Expected", count),
            Fact::new("Actual", actual),
        ]))
    }

    /// Passes if some layer matches `names`. No names always pass.
    ///
    /// # Errors
    ///
    /// Reports `Could not find` with the searched fragments.
    pub fn contains(&self, names: &[&str]) -> Result<&Self, CheckFailure> {
        if names.is_empty() || self.snapshot.find(names).next().is_some() {
            Ok(self)
        } else {
            Err(CheckFailure::new(Fact::new("Could not find", join(names))))
        }
    }

    /// Passes if no layer matches `names`.
    ///
    /// # Errors
    ///
    /// Reports `Could find` with the first matching layer.
    pub fn not_contains(&self, names: &[&str]) -> Result<&Self, CheckFailure> {
        match self.snapshot.find(names).next() {
            None => Ok(self),
            Some(view) => Err(CheckFailure::new(Fact::new("Could find", view.layer()))),
        }
    }

    /// Passes if some layer matching `names` is visible.
    ///
    /// When every match is invisible, the failure explains the last match
    /// examined: `Hidden by parent` naming its parent, or `Is Invisible`
    /// with its visibility reason.
    ///
    /// # Errors
    ///
    /// `Could not find` when nothing matches, otherwise the reason above.
    pub fn is_visible(&self, names: &[&str]) -> Result<&Self, CheckFailure> {
        self.contains(names)?;
        let mut reason = None;
        for view in self.snapshot.find(names) {
            reason = match view.visibility().reason() {
                None => return Ok(self),
                Some(InvisibleReason::HiddenByParent { name, .. }) => {
                    Some(Fact::new("Hidden by parent", name))
                }
                Some(why) => Some(Fact::new("Is Invisible", why)),
            };
        }
        match reason {
            Some(fact) => Err(CheckFailure::new(fact)),
            None => Ok(self),
        }
    }

    /// Passes if no layer matching `names` is visible, including when
    /// nothing matches.
    ///
    /// # Errors
    ///
    /// Reports `Layer is visible` with the searched fragments.
    pub fn is_invisible(&self, names: &[&str]) -> Result<&Self, CheckFailure> {
        if self.is_visible(names).is_err() {
            Ok(self)
        } else {
            Err(CheckFailure::new(Fact::new("Layer is visible", join(names))))
        }
    }

    /// The combined visible region of visible layers matching `names`.
    ///
    /// With `composition_only`, only compositor-computed visible regions
    /// count; otherwise screen bounds are used.
    ///
    /// # Errors
    ///
    /// `Could not find` when nothing matches.
    pub fn visible_region(
        &self,
        names: &[&str],
        composition_only: bool,
    ) -> Result<RegionCheck, CheckFailure> {
        self.contains(names)?;
        let region = self.snapshot.visible_region(names, composition_only);
        let context = alloc::vec![
            Fact::new("Entry", self.snapshot.timestamp()),
            Fact::new("Layers", join(names)),
        ];
        Ok(RegionCheck::with_context(region, context))
    }

    /// The first layer whose name contains `name` and, when given, whose
    /// current frame is `frame`.
    ///
    /// Always returns a check; use [`LayerCheck::exists`] to require a
    /// match.
    #[must_use]
    pub fn layer(&self, name: &'a str, frame: Option<u64>) -> LayerCheck<'a> {
        let view = self.snapshot.layers().find(|view: &LayerView<'a>| {
            let layer = view.layer();
            layer.name.contains(name) && frame.is_none_or(|f| layer.current_frame == f)
        });
        LayerCheck::new(name, view)
    }
}

/// Adapts a chaining entry check into a plain [`CheckResult`].
pub(crate) fn discard<T>(result: Result<T, CheckFailure>) -> CheckResult {
    result.map(|_| ())
}
