// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Consecutive-visibility ("flicker") detection.
//!
//! Every name that becomes visible must stay visible for at least two
//! consecutive entries. The check keeps a window of two entries: the names
//! visible in the previous entry, and the names that first appeared there
//! and are still waiting for confirmation.

use alloc::collections::BTreeSet;
use alloc::string::String;
use alloc::vec::Vec;

use strata_core::snapshot::{Snapshot, TraceEntry, matches_any};

use crate::fact::{Fact, join};
use crate::failure::{Anchor, Failure, FailureKind, Failures};

/// Group name attached to flicker failures.
pub const FLICKER_CHECK_NAME: &str = "visibleLayersShownMoreThanOneConsecutiveEntry";

/// Names of the visible layers of `snapshot`, skipping names that contain
/// any of `ignore`.
#[must_use]
pub fn visible_layer_names(snapshot: &Snapshot, ignore: &[&str]) -> BTreeSet<String> {
    snapshot
        .visible_layers()
        .map(|view| &view.layer().name)
        .filter(|name| !matches_any(name, ignore))
        .cloned()
        .collect()
}

/// Reports every name selected by `visible` that is not confirmed on the
/// entry right after it first appears.
///
/// A failure is anchored at the entry where the unconfirmed names were last
/// seen. Names still unconfirmed at the end of the trace are reported at the
/// last entry.
///
/// # Errors
///
/// One [`FailureKind::Flicker`] failure per offending entry.
pub fn check_no_flicker<E, F>(entries: &[E], mut visible: F) -> Result<(), Failures>
where
    E: TraceEntry,
    F: FnMut(&E) -> BTreeSet<String>,
{
    let Some(first) = entries.first() else {
        return Ok(());
    };

    let mut failures = Vec::new();
    let mut last_visible = visible(first);
    let mut unconfirmed = last_visible.clone();

    for (index, entry) in entries.iter().enumerate().skip(1) {
        let current = visible(entry);
        unconfirmed.retain(|name| !current.contains(name));
        if !unconfirmed.is_empty() {
            failures.push(flicker(entries, index - 1, &unconfirmed));
            unconfirmed.clear();
        }
        unconfirmed.extend(current.difference(&last_visible).cloned());
        last_visible = current;
    }

    if !unconfirmed.is_empty() {
        failures.push(flicker(entries, entries.len() - 1, &unconfirmed));
    }

    match Failures::from_vec(failures) {
        Some(failures) => Err(failures),
        None => Ok(()),
    }
}

fn flicker<E: TraceEntry>(entries: &[E], index: usize, names: &BTreeSet<String>) -> Failure {
    Failure {
        kind: FailureKind::Flicker,
        group: FLICKER_CHECK_NAME.into(),
        anchor: Anchor {
            index,
            timestamp: entries[index].timestamp(),
        },
        facts: alloc::vec![Fact::new("Not visible for 2 entries", join(names))],
    }
}
