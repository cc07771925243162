// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Named assertions and the groups the sequencer steps through.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::config::GroupMatch;
use crate::fact::Fact;
use crate::failure::{CheckFailure, CheckResult};

/// A named check over one trace entry.
pub struct Assertion<E> {
    name: String,
    check: Box<dyn Fn(&E) -> CheckResult>,
}

impl<E> Assertion<E> {
    /// Wraps `check` under `name`.
    pub fn new(name: impl Into<String>, check: impl Fn(&E) -> CheckResult + 'static) -> Self {
        Self {
            name: name.into(),
            check: Box::new(check),
        }
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs the check.
    ///
    /// # Errors
    ///
    /// Returns the check's failure facts.
    pub fn check(&self, entry: &E) -> CheckResult {
        (self.check)(entry)
    }
}

impl<E> fmt::Debug for Assertion<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Assertion")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Assertions meant to hold together over one contiguous run of entries.
pub struct AssertionGroup<E> {
    members: Vec<Assertion<E>>,
    precondition: bool,
}

impl<E> AssertionGroup<E> {
    /// Creates a group holding one assertion.
    #[must_use]
    pub fn new(first: Assertion<E>) -> Self {
        Self {
            members: alloc::vec![first],
            precondition: false,
        }
    }

    /// Adds another member.
    pub fn push(&mut self, assertion: Assertion<E>) {
        self.members.push(assertion);
    }

    /// The members, in insertion order.
    #[must_use]
    pub fn members(&self) -> &[Assertion<E>] {
        &self.members
    }

    /// Member names joined with `" and "`.
    #[must_use]
    pub fn name(&self) -> String {
        let names: Vec<&str> = self.members.iter().map(Assertion::name).collect();
        names.join(" and ")
    }

    /// Whether a reported failure of this group stops verification.
    #[must_use]
    pub fn is_precondition(&self) -> bool {
        self.precondition
    }

    /// Marks the group as a hard precondition.
    pub fn set_precondition(&mut self, precondition: bool) {
        self.precondition = precondition;
    }

    /// Evaluates the group against one entry.
    ///
    /// With several members, each member's facts are introduced by an
    /// `Assertion` fact naming it.
    ///
    /// # Errors
    ///
    /// Under [`GroupMatch::Any`], the facts of every member when none held.
    /// Under [`GroupMatch::All`], the facts of the first member that failed.
    pub fn evaluate(&self, entry: &E, mode: GroupMatch) -> CheckResult {
        let labelled = self.members.len() > 1;
        let mut facts = Vec::new();
        for member in &self.members {
            match (member.check(entry), mode) {
                (Ok(()), GroupMatch::Any) => return Ok(()),
                (Ok(()), GroupMatch::All) => {}
                (Err(failure), _) => {
                    if labelled {
                        facts.push(Fact::new("Assertion", member.name()));
                    }
                    facts.extend(failure.into_facts());
                    if mode == GroupMatch::All {
                        return Err(CheckFailure::from_facts(facts));
                    }
                }
            }
        }
        if facts.is_empty() {
            Ok(())
        } else {
            Err(CheckFailure::from_facts(facts))
        }
    }
}

impl<E> fmt::Debug for AssertionGroup<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssertionGroup")
            .field("members", &self.members)
            .field("precondition", &self.precondition)
            .finish()
    }
}
