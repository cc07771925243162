// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON failure reports.
//!
//! [`to_json`] renders a verification outcome as a JSON object so failures
//! can be archived next to the trace they came from and diffed between
//! runs. The shape is:
//!
//! ```json
//! {
//!   "status": "failed",
//!   "failures": [
//!     {
//!       "kind": "mismatch",
//!       "group": "is_visible(StatusBar)",
//!       "anchor": { "index": 2, "timestamp": 300 },
//!       "facts": [ { "key": "Is Invisible", "value": "Alpha is 0" } ]
//!     }
//!   ]
//! }
//! ```
//!
//! Structural errors use `"status": "malformed"` with an `"error"` message
//! instead of a failure list.

use std::io::{self, Write};

use serde_json::{Value, json};

use strata_check::{Failure, VerifyError};

/// Renders one failure.
#[must_use]
pub fn failure_to_json(failure: &Failure) -> Value {
    let facts: Vec<Value> = failure
        .facts
        .iter()
        .map(|fact| json!({ "key": fact.key, "value": fact.value }))
        .collect();
    json!({
        "kind": failure.kind.as_str(),
        "group": failure.group,
        "anchor": {
            "index": failure.anchor.index,
            "timestamp": failure.anchor.timestamp,
        },
        "facts": facts,
    })
}

/// Renders the outcome of a verification.
#[must_use]
pub fn to_json(result: &Result<(), VerifyError>) -> Value {
    match result {
        Ok(()) => json!({ "status": "passed", "failures": [] }),
        Err(VerifyError::Failed(failures)) => json!({
            "status": "failed",
            "failures": failures.iter().map(failure_to_json).collect::<Vec<_>>(),
        }),
        Err(err @ VerifyError::Structural(_)) => json!({
            "status": "malformed",
            "error": err.to_string(),
        }),
    }
}

/// Writes the report for `result` as pretty-printed JSON.
///
/// # Errors
///
/// Propagates write errors from `writer`.
pub fn write_report(result: &Result<(), VerifyError>, writer: &mut dyn Write) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, &to_json(result))?;
    writeln!(writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_check::{Anchor, Fact, FailureKind, Failures};
    use strata_core::BuildError;
    use strata_core::layer::LayerId;

    fn failures() -> Failures {
        Failures::from_vec(vec![Failure {
            kind: FailureKind::NeverTransitioned,
            group: "is_visible(App)".into(),
            anchor: Anchor {
                index: 4,
                timestamp: 1_000,
            },
            facts: vec![
                Fact::new("Assertion never became false", "is_visible(App)"),
                Fact::new("Untested assertions", "is_invisible(App)"),
            ],
        }])
        .unwrap()
    }

    #[test]
    fn report_lists_failures() {
        let value = to_json(&Err(VerifyError::Failed(failures())));
        assert_eq!(value["status"], "failed");
        let failure = &value["failures"][0];
        assert_eq!(failure["kind"], "never-transitioned");
        assert_eq!(failure["anchor"]["timestamp"], 1_000);
        assert_eq!(failure["facts"][1]["value"], "is_invisible(App)");
    }

    #[test]
    fn report_for_malformed_trace() {
        let err = VerifyError::Structural(BuildError::ParentCycle { id: LayerId(7) });
        let value = to_json(&Err(err));
        assert_eq!(value["status"], "malformed");
        assert_eq!(
            value["error"],
            "malformed trace: layer 7 is part of a parent cycle"
        );
    }

    #[test]
    fn written_report_is_valid_json() {
        let mut out = Vec::new();
        write_report(&Ok(()), &mut out).unwrap();
        let parsed: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed["status"], "passed");
        assert!(parsed["failures"].as_array().unwrap().is_empty(), "no failures expected");
    }
}
