// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The assertion sequencer.
//!
//! Groups are checked in declaration order against entries in trace order.
//! Each group must hold for at least one entry; once it stops holding, the
//! next group takes over starting at the same entry:
//!
//! ```text
//!   entries:  e0   e1   e2   e3   e4
//!   groups:   [A ] [A ] [B ] [B ] [C ]
//!                      ▲         ▲
//!                      A fails,  B fails,
//!                      B holds   C holds
//! ```
//!
//! A group that fails without having held is reported, anchored at the
//! entry before the one that exposed it (the last point where the trace was
//! still consistent). The walk itself is a plain loop over explicit state;
//! nothing is unwound.

use alloc::string::String;
use alloc::vec::Vec;

use strata_core::snapshot::TraceEntry;
use strata_core::trace::{FailureEvent, StepEvent, StepOutcome, Tracer};

use crate::assertion::{Assertion, AssertionGroup};
use crate::config::CheckConfig;
use crate::fact::{Fact, join};
use crate::failure::{Anchor, CheckResult, Failure, FailureKind, Failures};

/// An ordered list of assertion groups.
pub struct AssertionSequence<E> {
    groups: Vec<AssertionGroup<E>>,
}

impl<E> core::fmt::Debug for AssertionSequence<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(&self.groups).finish()
    }
}

impl<E> Default for AssertionSequence<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> AssertionSequence<E> {
    /// Creates an empty sequence.
    #[must_use]
    pub fn new() -> Self {
        Self { groups: Vec::new() }
    }

    /// Starts a new group holding one assertion.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        check: impl Fn(&E) -> CheckResult + 'static,
    ) -> &mut Self {
        self.groups
            .push(AssertionGroup::new(Assertion::new(name, check)));
        self
    }

    /// Adds an assertion to the last group, or starts the first group.
    pub fn append(
        &mut self,
        name: impl Into<String>,
        check: impl Fn(&E) -> CheckResult + 'static,
    ) -> &mut Self {
        let assertion = Assertion::new(name, check);
        match self.groups.last_mut() {
            Some(group) => group.push(assertion),
            None => self.groups.push(AssertionGroup::new(assertion)),
        }
        self
    }

    /// Marks the last group as a hard precondition: once its failure is
    /// reported, verification stops.
    pub fn as_precondition(&mut self) -> &mut Self {
        if let Some(group) = self.groups.last_mut() {
            group.set_precondition(true);
        }
        self
    }

    /// The groups in order.
    #[must_use]
    pub fn groups(&self) -> &[AssertionGroup<E>] {
        &self.groups
    }

    /// Whether no assertions were registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl<E: TraceEntry> AssertionSequence<E> {
    /// Verifies the sequence against `entries`.
    ///
    /// An empty sequence or an empty entry list verifies trivially.
    ///
    /// # Errors
    ///
    /// Every failure found, in discovery order.
    pub fn verify(
        &self,
        entries: &[E],
        config: &CheckConfig,
        tracer: &mut Tracer<'_>,
    ) -> Result<(), Failures> {
        if self.groups.is_empty() || entries.is_empty() {
            return Ok(());
        }

        let mut failures = Vec::new();
        let mut entry_index = 0;
        let mut group_index = 0;
        let mut last_passed: Option<usize> = None;

        while group_index < self.groups.len() && entry_index < entries.len() {
            let group = &self.groups[group_index];
            let entry = &entries[entry_index];
            let step = |outcome| StepEvent {
                entry_index,
                timestamp: entry.timestamp(),
                group_index,
                outcome,
            };

            let failure = match group.evaluate(entry, config.group_match) {
                Ok(()) => {
                    last_passed = Some(group_index);
                    tracer.step(&step(StepOutcome::Passed));
                    entry_index += 1;
                    continue;
                }
                Err(failure) => failure,
            };

            if config.skip_leading && last_passed.is_none() {
                tracer.step(&step(StepOutcome::SkippedLeading));
                entry_index += 1;
                continue;
            }

            let never_held = last_passed != Some(group_index);
            let is_last = group_index + 1 == self.groups.len();
            if never_held || is_last {
                tracer.step(&step(StepOutcome::Reported));
                let anchor = anchor_at(entries, entry_index.saturating_sub(1));
                tracer.failure(&FailureEvent {
                    entry_index: anchor.index,
                    timestamp: anchor.timestamp,
                    group_index,
                });
                let kind = if last_passed.is_none() {
                    FailureKind::NeverPassed
                } else {
                    FailureKind::Mismatch
                };
                let mut facts = alloc::vec![Fact::new(
                    "Failed at entry",
                    alloc::format!("{entry_index} (t={})", entry.timestamp()),
                )];
                facts.extend(failure.into_facts());
                failures.push(Failure {
                    kind,
                    group: group.name(),
                    anchor,
                    facts,
                });
                if group.is_precondition() {
                    return Err(Failures(failures));
                }
            } else {
                tracer.step(&step(StepOutcome::HandedOff));
            }
            group_index += 1;
        }

        if last_passed.is_none() && failures.is_empty() {
            let first = &self.groups[0];
            let anchor = anchor_at(entries, 0);
            tracer.failure(&FailureEvent {
                entry_index: anchor.index,
                timestamp: anchor.timestamp,
                group_index: 0,
            });
            failures.push(Failure {
                kind: FailureKind::NeverPassed,
                group: first.name(),
                anchor,
                facts: alloc::vec![Fact::new("Assertion never passed", first.name())],
            });
        }

        if failures.is_empty() && group_index + 1 < self.groups.len() {
            let names: Vec<String> = self.groups.iter().map(AssertionGroup::name).collect();
            let anchor = anchor_at(entries, entries.len() - 1);
            tracer.failure(&FailureEvent {
                entry_index: anchor.index,
                timestamp: anchor.timestamp,
                group_index,
            });
            failures.push(Failure {
                kind: FailureKind::NeverTransitioned,
                group: names[group_index].clone(),
                anchor,
                facts: alloc::vec![
                    Fact::new("Assertion never became false", &names[group_index]),
                    Fact::new("Passed assertions", join(&names[..group_index])),
                    Fact::new("Untested assertions", join(&names[group_index + 1..])),
                ],
            });
        }

        match Failures::from_vec(failures) {
            Some(failures) => Err(failures),
            None => Ok(()),
        }
    }
}

fn anchor_at<E: TraceEntry>(entries: &[E], index: usize) -> Anchor {
    Anchor {
        index,
        timestamp: entries[index].timestamp(),
    }
}
