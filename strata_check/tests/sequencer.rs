// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hand-off protocol of the assertion sequencer, driven by synthetic
//! entries that record which named predicates hold.

use strata_check::sequence::AssertionSequence;
use strata_check::{CheckConfig, CheckFailure, CheckResult, Fact, FailureKind, GroupMatch};
use strata_core::snapshot::TraceEntry;
use strata_core::trace::Tracer;

/// An entry listing the predicates that hold at it.
struct Entry {
    timestamp: i64,
    holds: &'static [&'static str],
}

impl TraceEntry for Entry {
    fn timestamp(&self) -> i64 {
        self.timestamp
    }
}

fn entries(spec: &[&'static [&'static str]]) -> Vec<Entry> {
    spec.iter()
        .enumerate()
        .map(|(i, &holds)| Entry {
            timestamp: 100 * i as i64,
            holds,
        })
        .collect()
}

fn holds(name: &'static str) -> impl Fn(&Entry) -> CheckResult {
    move |entry| {
        if entry.holds.contains(&name) {
            Ok(())
        } else {
            Err(CheckFailure::new(Fact::new("Does not hold", name)))
        }
    }
}

fn sequence(groups: &[&'static str]) -> AssertionSequence<Entry> {
    let mut sequence = AssertionSequence::new();
    for &name in groups {
        sequence.add(name, holds(name));
    }
    sequence
}

fn run(
    sequence: &AssertionSequence<Entry>,
    entries: &[Entry],
    config: &CheckConfig,
) -> Result<(), strata_check::Failures> {
    sequence.verify(entries, config, &mut Tracer::none())
}

fn skip_leading() -> CheckConfig {
    CheckConfig {
        skip_leading: true,
        ..CheckConfig::default()
    }
}

#[test]
fn leading_skip_then_hand_off_succeeds() {
    let trace = entries(&[&[], &["A"], &["B"], &["B"]]);
    let result = run(&sequence(&["A", "B"]), &trace, &skip_leading());
    assert!(result.is_ok(), "{result:?}");
}

#[test]
fn without_leading_skip_the_first_entry_fails() {
    let trace = entries(&[&[], &["A"], &["B"], &["B"]]);
    let failures = run(&sequence(&["A", "B"]), &trace, &CheckConfig::default()).unwrap_err();
    let first = failures.first();
    assert_eq!(first.kind, FailureKind::NeverPassed);
    assert_eq!(first.group, "A");
    assert_eq!(first.anchor.index, 0);
}

#[test]
fn group_that_never_passes_is_anchored_at_first_entry() {
    let trace = entries(&[&[], &[], &[]]);
    let failures = run(&sequence(&["A"]), &trace, &skip_leading()).unwrap_err();
    assert_eq!(failures.len(), 1);
    let failure = failures.first();
    assert_eq!(failure.kind, FailureKind::NeverPassed);
    assert_eq!(failure.anchor.index, 0);
    assert_eq!(failure.anchor.timestamp, 0);
    assert_eq!(failure.fact("Assertion never passed"), Some("A"));
}

#[test]
fn last_group_failing_is_anchored_at_last_good_entry() {
    let trace = entries(&[&["A"], &["A", "B"], &["B"], &[]]);
    let failures = run(&sequence(&["A", "B"]), &trace, &CheckConfig::default()).unwrap_err();
    assert_eq!(failures.len(), 1);
    let failure = failures.first();
    assert_eq!(failure.kind, FailureKind::Mismatch);
    assert_eq!(failure.group, "B");
    assert_eq!(failure.anchor.index, 2);
    assert_eq!(failure.anchor.timestamp, 200);
    assert_eq!(failure.fact("Does not hold"), Some("B"));
    assert_eq!(failure.fact("Failed at entry"), Some("3 (t=300)"));
}

#[test]
fn next_group_not_holding_at_hand_off_is_reported() {
    let trace = entries(&[&["A"], &[], &["B"]]);
    let failures = run(&sequence(&["A", "B"]), &trace, &CheckConfig::default()).unwrap_err();
    let failure = failures.first();
    assert_eq!(failure.group, "B");
    assert_eq!(failure.kind, FailureKind::Mismatch);
    assert_eq!(failure.anchor.index, 0);
}

#[test]
fn group_holding_to_the_end_never_transitioned() {
    let trace = entries(&[&["A"], &["A"], &["A"]]);
    let failures = run(&sequence(&["A", "B", "C"]), &trace, &CheckConfig::default()).unwrap_err();
    assert_eq!(failures.len(), 1);
    let failure = failures.first();
    assert_eq!(failure.kind, FailureKind::NeverTransitioned);
    assert_eq!(failure.anchor.index, 2);
    assert_eq!(failure.fact("Assertion never became false"), Some("A"));
    assert_eq!(failure.fact("Passed assertions"), Some(""));
    assert_eq!(failure.fact("Untested assertions"), Some("B, C"));
}

#[test]
fn final_group_may_hold_until_the_end() {
    let trace = entries(&[&["A"], &["B"], &["B"]]);
    assert!(run(&sequence(&["A", "B"]), &trace, &CheckConfig::default()).is_ok());
}

#[test]
fn failures_after_a_report_are_collected() {
    let trace = entries(&[&["A"], &[], &[]]);
    let failures = run(&sequence(&["A", "B", "C"]), &trace, &CheckConfig::default()).unwrap_err();
    let groups: Vec<&str> = failures.iter().map(|f| f.group.as_str()).collect();
    assert_eq!(groups, ["B", "C"]);
}

#[test]
fn precondition_stops_verification() {
    let trace = entries(&[&["A"], &[], &[]]);
    let mut sequence = sequence(&["A"]);
    sequence.add("B", holds("B")).as_precondition();
    sequence.add("C", holds("C"));
    let failures = run(&sequence, &trace, &CheckConfig::default()).unwrap_err();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures.first().group, "B");
}

#[test]
fn group_members_combine_per_config() {
    let trace = entries(&[&["A"], &["A"]]);
    let mut sequence = AssertionSequence::new();
    sequence.add("A", holds("A")).append("X", holds("X"));
    assert_eq!(sequence.groups()[0].name(), "A and X");

    assert!(run(&sequence, &trace, &CheckConfig::default()).is_ok());

    let all = CheckConfig {
        group_match: GroupMatch::All,
        ..CheckConfig::default()
    };
    let failures = run(&sequence, &trace, &all).unwrap_err();
    assert_eq!(failures.first().fact("Assertion"), Some("X"));
}

#[test]
fn empty_inputs_verify_trivially() {
    let none: Vec<Entry> = Vec::new();
    assert!(run(&sequence(&["A"]), &none, &CheckConfig::default()).is_ok());
    let trace = entries(&[&[]]);
    assert!(run(&AssertionSequence::new(), &trace, &CheckConfig::default()).is_ok());
}

#[cfg(feature = "trace")]
#[test]
fn steps_are_traced() {
    use strata_core::trace::{FailureEvent, StepEvent, StepOutcome, TraceSink};

    #[derive(Default)]
    struct Recorder {
        steps: Vec<StepOutcome>,
        failures: Vec<usize>,
    }

    impl TraceSink for Recorder {
        fn on_step(&mut self, e: &StepEvent) {
            self.steps.push(e.outcome);
        }

        fn on_failure(&mut self, e: &FailureEvent) {
            self.failures.push(e.entry_index);
        }
    }

    let trace = entries(&[&[], &["A"], &["B"]]);
    let mut recorder = Recorder::default();
    let result = sequence(&["A", "B"]).verify(
        &trace,
        &skip_leading(),
        &mut Tracer::new(&mut recorder),
    );
    assert!(result.is_ok(), "{result:?}");
    assert_eq!(
        recorder.steps,
        [
            StepOutcome::SkippedLeading,
            StepOutcome::Passed,
            StepOutcome::HandedOff,
            StepOutcome::Passed,
        ]
    );
    assert!(recorder.failures.is_empty());
}
