// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coverage checks over a [`Region`].
//!
//! Every failure names the region under test, the region actually covered,
//! and the remainder that broke the check, so a report can be read without
//! the trace at hand.

use alloc::vec::Vec;

use strata_core::region::Region;

use crate::fact::Fact;
use crate::failure::{CheckFailure, CheckResult};

/// A region captured from a snapshot, ready to be compared.
#[derive(Clone, Debug, PartialEq)]
pub struct RegionCheck {
    actual: Region,
    context: Vec<Fact>,
}

impl RegionCheck {
    /// Wraps `actual` with no extra context.
    #[must_use]
    pub fn new(actual: Region) -> Self {
        Self {
            actual,
            context: Vec::new(),
        }
    }

    /// Wraps `actual`, prefixing every failure with `context`.
    #[must_use]
    pub fn with_context(actual: Region, context: Vec<Fact>) -> Self {
        Self { actual, context }
    }

    /// The region being checked.
    #[must_use]
    pub fn region(&self) -> &Region {
        &self.actual
    }

    /// Passes if the region covers every point of `target`.
    ///
    /// # Errors
    ///
    /// Reports the `Uncovered region`.
    pub fn covers_at_least(&self, target: &Region) -> CheckResult {
        self.actual
            .covers_at_least(target)
            .map_err(|uncovered| self.fail(target, [Fact::new("Uncovered region", uncovered)]))
    }

    /// Passes if the region covers nothing outside `target`.
    ///
    /// # Errors
    ///
    /// Reports the `Out-of-bounds region`.
    pub fn covers_at_most(&self, target: &Region) -> CheckResult {
        self.actual.covers_at_most(target).map_err(|out_of_bounds| {
            self.fail(target, [Fact::new("Out-of-bounds region", out_of_bounds)])
        })
    }

    /// Passes if the region covers exactly `target`.
    ///
    /// # Errors
    ///
    /// Reports whichever of the uncovered and out-of-bounds remainders are
    /// non-empty.
    pub fn covers_exactly(&self, target: &Region) -> CheckResult {
        self.actual.covers_exactly(target).map_err(|mismatch| {
            let mut extra = Vec::new();
            if !mismatch.uncovered.is_empty() {
                extra.push(Fact::new("Uncovered region", &mismatch.uncovered));
            }
            if !mismatch.out_of_bounds.is_empty() {
                extra.push(Fact::new("Out-of-bounds region", &mismatch.out_of_bounds));
            }
            self.fail(target, extra)
        })
    }

    /// Passes if `other` lies entirely inside the region.
    ///
    /// # Errors
    ///
    /// Reports the part of `other` outside as the `Uncovered region`.
    pub fn contains(&self, other: &Region) -> CheckResult {
        self.actual
            .contains(other)
            .map_err(|outside| self.fail(other, [Fact::new("Uncovered region", outside)]))
    }

    /// Passes if the region shares at least one point with `other`.
    ///
    /// # Errors
    ///
    /// Reports that the regions are disjoint.
    pub fn overlaps(&self, other: &Region) -> CheckResult {
        match self.actual.overlaps(other) {
            Some(_) => Ok(()),
            None => Err(self.fail(other, [Fact::label("Regions do not overlap")])),
        }
    }

    /// Passes if the region shares no point with `other`.
    ///
    /// # Errors
    ///
    /// Reports the `Overlap region`.
    pub fn not_overlaps(&self, other: &Region) -> CheckResult {
        match self.actual.overlaps(other) {
            None => Ok(()),
            Some(shared) => Err(self.fail(other, [Fact::new("Overlap region", shared)])),
        }
    }

    fn fail(&self, target: &Region, extra: impl IntoIterator<Item = Fact>) -> CheckFailure {
        let mut facts = self.context.clone();
        facts.push(Fact::new("Region to test", target));
        facts.push(Fact::new("Covered region", &self.actual));
        facts.extend(extra);
        CheckFailure::from_facts(facts)
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Rect;

    use super::*;

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Region {
        Region::from_rect(Rect::new(x0, y0, x1, y1))
    }

    #[test]
    fn covers_at_least_reports_uncovered_part() {
        let check = RegionCheck::new(rect(0.0, 0.0, 10.0, 10.0));
        assert!(check.covers_at_least(&rect(2.0, 2.0, 8.0, 8.0)).is_ok());
        let failure = check.covers_at_least(&rect(5.0, 0.0, 15.0, 10.0)).unwrap_err();
        assert_eq!(failure.fact("Uncovered region"), Some("[(10, 0, 15, 10)]"));
        assert_eq!(failure.fact("Region to test"), Some("[(5, 0, 15, 10)]"));
    }

    #[test]
    fn covers_at_most_reports_out_of_bounds_part() {
        let check = RegionCheck::new(rect(0.0, 0.0, 10.0, 10.0));
        assert!(check.covers_at_most(&rect(-5.0, -5.0, 20.0, 20.0)).is_ok());
        let failure = check.covers_at_most(&rect(0.0, 0.0, 10.0, 5.0)).unwrap_err();
        assert_eq!(failure.fact("Out-of-bounds region"), Some("[(0, 5, 10, 10)]"));
    }

    #[test]
    fn covers_exactly_is_sharp_to_one_unit() {
        let check = RegionCheck::new(rect(0.0, 0.0, 10.0, 10.0));
        assert!(check.covers_exactly(&rect(0.0, 0.0, 10.0, 10.0)).is_ok());

        let failure = check.covers_exactly(&rect(0.0, 0.0, 10.0, 11.0)).unwrap_err();
        assert!(failure.has_fact("Uncovered region"));
        assert!(!failure.has_fact("Out-of-bounds region"));

        let failure = check.covers_exactly(&rect(0.0, 0.0, 9.0, 10.0)).unwrap_err();
        assert!(failure.has_fact("Out-of-bounds region"));
    }

    #[test]
    fn contains_reports_the_part_outside() {
        let check = RegionCheck::new(rect(0.0, 0.0, 10.0, 10.0));
        assert!(check.contains(&rect(0.0, 0.0, 10.0, 10.0)).is_ok());
        let failure = check.contains(&rect(0.0, 8.0, 10.0, 12.0)).unwrap_err();
        assert_eq!(failure.fact("Uncovered region"), Some("[(0, 10, 10, 12)]"));
        assert_eq!(failure.fact("Covered region"), Some("[(0, 0, 10, 10)]"));
    }

    #[test]
    fn overlap_checks() {
        let check = RegionCheck::new(rect(0.0, 0.0, 10.0, 10.0));
        assert!(check.overlaps(&rect(9.0, 9.0, 20.0, 20.0)).is_ok());
        assert!(check.overlaps(&rect(10.0, 0.0, 20.0, 10.0)).is_err());
        assert!(check.not_overlaps(&rect(10.0, 0.0, 20.0, 10.0)).is_ok());
        let failure = check.not_overlaps(&rect(9.0, 9.0, 20.0, 20.0)).unwrap_err();
        assert_eq!(failure.fact("Overlap region"), Some("[(9, 9, 10, 10)]"));
    }

    #[test]
    fn context_comes_first() {
        let check = RegionCheck::with_context(
            Region::new(),
            alloc::vec![Fact::new("Layer", "StatusBar")],
        );
        let failure = check.covers_at_least(&rect(0.0, 0.0, 1.0, 1.0)).unwrap_err();
        assert_eq!(failure.facts()[0], Fact::new("Layer", "StatusBar"));
    }
}
