// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Check failures, sequence failures and the verification error.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use strata_core::BuildError;

use crate::fact::{Fact, write_facts};

/// A failed single-entry check: the facts explaining why.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CheckFailure {
    facts: Vec<Fact>,
}

impl CheckFailure {
    /// Creates a failure from one fact.
    #[must_use]
    pub fn new(fact: Fact) -> Self {
        Self {
            facts: alloc::vec![fact],
        }
    }

    /// Creates a failure from several facts.
    #[must_use]
    pub fn from_facts(facts: Vec<Fact>) -> Self {
        Self { facts }
    }

    /// Appends a fact.
    #[must_use]
    pub fn with(mut self, fact: Fact) -> Self {
        self.facts.push(fact);
        self
    }

    /// The facts, in the order they were added.
    #[must_use]
    pub fn facts(&self) -> &[Fact] {
        &self.facts
    }

    /// Whether a fact with `key` is present.
    #[must_use]
    pub fn has_fact(&self, key: &str) -> bool {
        self.facts.iter().any(|f| f.key == key)
    }

    /// Value of the first fact with `key`.
    #[must_use]
    pub fn fact(&self, key: &str) -> Option<&str> {
        self.facts
            .iter()
            .find(|f| f.key == key)
            .map(|f| f.value.as_str())
    }

    /// Consumes the failure, returning its facts.
    #[must_use]
    pub fn into_facts(self) -> Vec<Fact> {
        self.facts
    }
}

impl fmt::Display for CheckFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("check failed\n")?;
        write_facts(f, &self.facts)
    }
}

impl core::error::Error for CheckFailure {}

/// Outcome of a single check.
pub type CheckResult = Result<(), CheckFailure>;

/// What kind of sequence failure was observed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// An assertion saw the wrong value.
    Mismatch,
    /// No assertion ever passed.
    NeverPassed,
    /// An assertion held to the end of the trace while later ones never ran.
    NeverTransitioned,
    /// Something was visible for only one entry.
    Flicker,
}

impl FailureKind {
    /// Short label used in reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mismatch => "mismatch",
            Self::NeverPassed => "never-passed",
            Self::NeverTransitioned => "never-transitioned",
            Self::Flicker => "flicker",
        }
    }
}

/// The entry a failure is attributed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Anchor {
    /// Position in the verified entry list.
    pub index: usize,
    /// Timestamp of that entry.
    pub timestamp: i64,
}

/// One structured failure from a trace-level check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Failure {
    /// What went wrong.
    pub kind: FailureKind,
    /// Name of the failing assertion group.
    pub group: String,
    /// Entry the failure is attributed to.
    pub anchor: Anchor,
    /// Everything needed to understand the failure without the trace.
    pub facts: Vec<Fact>,
}

impl Failure {
    /// Value of the first fact with `key`.
    #[must_use]
    pub fn fact(&self, key: &str) -> Option<&str> {
        self.facts
            .iter()
            .find(|f| f.key == key)
            .map(|f| f.value.as_str())
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "[{}] {} at entry {} (t={})",
            self.kind.as_str(),
            self.group,
            self.anchor.index,
            self.anchor.timestamp
        )?;
        write_facts(f, &self.facts)
    }
}

/// A non-empty list of failures from one verification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Failures(pub(crate) Vec<Failure>);

impl Failures {
    /// Wraps `failures`, or returns `None` if there are none.
    #[must_use]
    pub fn from_vec(failures: Vec<Failure>) -> Option<Self> {
        (!failures.is_empty()).then_some(Self(failures))
    }

    /// The failures in the order they were found.
    #[must_use]
    pub fn as_slice(&self) -> &[Failure] {
        &self.0
    }

    /// Number of failures (at least one).
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; present for API symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The first failure found.
    #[must_use]
    pub fn first(&self) -> &Failure {
        &self.0[0]
    }

    /// Iterates over the failures.
    pub fn iter(&self) -> core::slice::Iter<'_, Failure> {
        self.0.iter()
    }

    /// Consumes the list.
    #[must_use]
    pub fn into_vec(self) -> Vec<Failure> {
        self.0
    }
}

impl<'a> IntoIterator for &'a Failures {
    type Item = &'a Failure;
    type IntoIter = core::slice::Iter<'a, Failure>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Failures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} failure(s)", self.0.len())?;
        for failure in &self.0 {
            fmt::Display::fmt(failure, f)?;
        }
        Ok(())
    }
}

impl core::error::Error for Failures {}

/// Why a trace did not verify.
#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    /// The input could not be turned into snapshots.
    #[error("malformed trace: {0}")]
    Structural(#[from] BuildError),
    /// The snapshots were built but the checks failed.
    #[error("{0}")]
    Failed(#[from] Failures),
}
