// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fluent checks over a window-manager trace.
//!
//! Grouping works as in [`LayersTraceCheck`](crate::LayersTraceCheck):
//! consecutive assertions share a group until [`then`](WindowTraceCheck::then)
//! starts the next one.
//!
//! ```
//! use strata_check::WindowTraceCheck;
//! use strata_core::window::{WindowSequence, WindowSnapshot, WindowState};
//!
//! let frame = |ts, shown: bool| {
//!     let mut ime = WindowState::new("InputMethod");
//!     if !shown {
//!         ime = ime.hidden();
//!     }
//!     WindowSnapshot::new(ts, vec![ime, WindowState::new("com.example/.Main").app_window()])
//! };
//! let trace = WindowSequence::from_entries(vec![frame(0, false), frame(1, true), frame(2, true)]);
//!
//! let mut check = WindowTraceCheck::new(&trace);
//! check
//!     .hides_above_app_window(&["InputMethod"])
//!     .then()
//!     .shows_above_app_window(&["InputMethod"]);
//! assert!(check.for_all_entries().is_ok());
//! ```

use alloc::collections::BTreeSet;
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use strata_core::region::Region;
use strata_core::snapshot::matches_any;
use strata_core::trace::Tracer;
use strata_core::window::{WindowSequence, WindowSnapshot};

use crate::config::CheckConfig;
use crate::entry::discard;
use crate::fact::join;
use crate::failure::{CheckResult, Failures};
use crate::flicker::check_no_flicker;
use crate::region::RegionCheck;
use crate::sequence::AssertionSequence;
use crate::window::WindowStateCheck;

/// Builder and runner for assertions over a [`WindowSequence`].
pub struct WindowTraceCheck<'a> {
    trace: &'a WindowSequence,
    config: CheckConfig,
    sequence: AssertionSequence<WindowSnapshot>,
    new_group: bool,
}

impl core::fmt::Debug for WindowTraceCheck<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WindowTraceCheck")
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

/// Titles of the visible windows of `snapshot`, skipping titles that
/// contain any of `ignore`.
#[must_use]
pub fn visible_window_names(snapshot: &WindowSnapshot, ignore: &[&str]) -> BTreeSet<String> {
    snapshot
        .visible_windows()
        .map(|w| &w.title)
        .filter(|title| !matches_any(title, ignore))
        .cloned()
        .collect()
}

impl<'a> WindowTraceCheck<'a> {
    /// Starts checking `trace` with the default configuration.
    #[must_use]
    pub fn new(trace: &'a WindowSequence) -> Self {
        Self::with_config(trace, CheckConfig::default())
    }

    /// Starts checking `trace` with `config`.
    #[must_use]
    pub fn with_config(trace: &'a WindowSequence, config: CheckConfig) -> Self {
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
    pub fn sequence(&self) -> &AssertionSequence<WindowSnapshot> {
        &self.sequence
    }

    /// Registers an arbitrary entry assertion under `name`.
    pub fn custom(
        &mut self,
        name: impl Into<String>,
        check: impl Fn(&WindowSnapshot) -> CheckResult + 'static,
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

    fn names_assertion(
        &mut self,
        label: &str,
        names: &[&str],
        check: fn(&WindowStateCheck<'_>, &[&str]) -> CheckResult,
    ) -> &mut Self {
        let names = owned(names);
        self.custom(format!("{label}({})", join(&names)), move |s| {
            check(&WindowStateCheck::new(s), &borrowed(&names))
        })
    }

    /// Every entry holds a window matching `names`.
    pub fn contains(&mut self, names: &[&str]) -> &mut Self {
        self.names_assertion("contains", names, |c, n| discard(c.contains(n)))
    }

    /// No entry holds a window matching `names`.
    pub fn not_contains(&mut self, names: &[&str]) -> &mut Self {
        self.names_assertion("not_contains", names, |c, n| discard(c.not_contains(n)))
    }

    /// A window matching `names` is visible.
    pub fn is_visible(&mut self, names: &[&str]) -> &mut Self {
        self.names_assertion("is_visible", names, |c, n| discard(c.is_visible(n)))
    }

    /// No window matching `names` is visible.
    pub fn is_invisible(&mut self, names: &[&str]) -> &mut Self {
        self.names_assertion("is_invisible", names, |c, n| discard(c.is_invisible(n)))
    }

    /// A visible window matching `names` sits above the app windows.
    pub fn shows_above_app_window(&mut self, names: &[&str]) -> &mut Self {
        self.names_assertion("shows_above_app_window", names, |c, n| {
            discard(c.is_above_app_window(n, true))
        })
    }

    /// A window matching `names` above the app windows is hidden.
    pub fn hides_above_app_window(&mut self, names: &[&str]) -> &mut Self {
        self.names_assertion("hides_above_app_window", names, |c, n| {
            discard(c.is_above_app_window(n, false))
        })
    }

    /// A visible window matching `names` sits below the app windows.
    pub fn shows_below_app_window(&mut self, names: &[&str]) -> &mut Self {
        self.names_assertion("shows_below_app_window", names, |c, n| {
            discard(c.is_below_app_window(n, true))
        })
    }

    /// A window matching `names` below the app windows is hidden.
    pub fn hides_below_app_window(&mut self, names: &[&str]) -> &mut Self {
        self.names_assertion("hides_below_app_window", names, |c, n| {
            discard(c.is_below_app_window(n, false))
        })
    }

    /// A non-app window matching `names` is visible.
    pub fn shows_non_app_window(&mut self, names: &[&str]) -> &mut Self {
        self.names_assertion("shows_non_app_window", names, |c, n| {
            discard(c.contains_non_app_window(n, true))
        })
    }

    /// A non-app window matching `names` is hidden.
    pub fn hides_non_app_window(&mut self, names: &[&str]) -> &mut Self {
        self.names_assertion("hides_non_app_window", names, |c, n| {
            discard(c.contains_non_app_window(n, false))
        })
    }

    /// The topmost visible app window matches `names`.
    pub fn shows_app_window_on_top(&mut self, names: &[&str]) -> &mut Self {
        self.names_assertion("shows_app_window_on_top", names, |c, n| {
            discard(c.shows_app_window_on_top(n))
        })
    }

    /// An app window matching `names` is hidden, so it cannot be on top.
    pub fn app_window_not_on_top(&mut self, names: &[&str]) -> &mut Self {
        self.names_assertion("app_window_not_on_top", names, |c, n| {
            discard(c.contains_app_window(n, false))
        })
    }

    /// An app window matching `names` is visible.
    pub fn shows_app_window(&mut self, names: &[&str]) -> &mut Self {
        self.names_assertion("shows_app_window", names, |c, n| {
            discard(c.contains_app_window(n, true))
        })
    }

    /// An app window matching `names` is hidden.
    pub fn hides_app_window(&mut self, names: &[&str]) -> &mut Self {
        self.names_assertion("hides_app_window", names, |c, n| {
            discard(c.contains_app_window(n, false))
        })
    }

    /// The frames of the windows matching each of `names` never overlap.
    pub fn no_windows_overlap(&mut self, names: &[&str]) -> &mut Self {
        self.names_assertion("no_windows_overlap", names, |c, n| {
            discard(c.no_windows_overlap(n))
        })
    }

    /// The window matching `above` is in front of the one matching `below`.
    pub fn is_above_window(&mut self, above: &str, below: &str) -> &mut Self {
        let (above, below) = (above.to_string(), below.to_string());
        self.custom(format!("{above} is above {below}"), move |s| {
            discard(WindowStateCheck::new(s).is_above_window(&above, &below))
        })
    }

    /// The frames of visible windows matching `names` cover `region`.
    pub fn covers_at_least(&mut self, region: Region, names: &[&str]) -> &mut Self {
        self.region_assertion("covers_at_least", region, names, |check, target| {
            check.covers_at_least(target)
        })
    }

    /// The frames of visible windows matching `names` stay inside `region`.
    pub fn covers_at_most(&mut self, region: Region, names: &[&str]) -> &mut Self {
        self.region_assertion("covers_at_most", region, names, |check, target| {
            check.covers_at_most(target)
        })
    }

    /// The frames of visible windows matching `names` are exactly `region`.
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
        let name = format!("{label}({region}, {})", join(&names));
        self.custom(name, move |s| {
            let check = WindowStateCheck::new(s).frame_region(&borrowed(&names))?;
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

    /// Checks that every visible window stays visible for at least two
    /// consecutive entries, ignoring titles that contain any of `ignore`.
    ///
    /// # Errors
    ///
    /// One flicker failure per offending entry.
    pub fn visible_windows_shown_more_than_one_consecutive_entry(
        &self,
        ignore: &[&str],
    ) -> Result<(), Failures> {
        check_no_flicker(self.trace.entries(), |snapshot| {
            visible_window_names(snapshot, ignore)
        })
    }

    /// Checks on the entry captured at exactly `timestamp`.
    #[must_use]
    pub fn entry(&self, timestamp: i64) -> Option<WindowStateCheck<'a>> {
        self.trace.entry_at(timestamp).map(WindowStateCheck::new)
    }

    /// Checks on the first entry.
    #[must_use]
    pub fn first(&self) -> Option<WindowStateCheck<'a>> {
        self.trace.first().map(WindowStateCheck::new)
    }

    /// Checks on the last entry.
    #[must_use]
    pub fn last(&self) -> Option<WindowStateCheck<'a>> {
        self.trace.last().map(WindowStateCheck::new)
    }
}
