// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Checks over one window-manager snapshot.
//!
//! Windows match on title fragments, like layers do in
//! [`EntryCheck`](crate::entry::EntryCheck). Z-order checks read the
//! window list top first, so a lower index is further in front.

use alloc::format;
use alloc::vec::Vec;

use strata_core::window::{Rotation, WindowSnapshot, WindowState};

use crate::fact::{Fact, join};
use crate::failure::CheckFailure;
use crate::region::RegionCheck;

/// Checks over one [`WindowSnapshot`].
#[derive(Clone, Copy, Debug)]
pub struct WindowStateCheck<'a> {
    snapshot: &'a WindowSnapshot,
}

impl<'a> WindowStateCheck<'a> {
    /// Starts checking `snapshot`.
    #[must_use]
    pub fn new(snapshot: &'a WindowSnapshot) -> Self {
        Self { snapshot }
    }

    /// The snapshot under check.
    #[must_use]
    pub fn snapshot(&self) -> &'a WindowSnapshot {
        self.snapshot
    }

    /// Passes if some window matches `names`. No names always pass.
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

    /// Passes if no window matches `names`.
    ///
    /// # Errors
    ///
    /// Reports `Could find` with the first match.
    pub fn not_contains(&self, names: &[&str]) -> Result<&Self, CheckFailure> {
        match self.snapshot.find(names).next() {
            None => Ok(self),
            Some(window) => Err(CheckFailure::new(Fact::new("Could find", window))),
        }
    }

    /// Passes if a window matching `names` is visible.
    ///
    /// # Errors
    ///
    /// `Could not find` when nothing matches, otherwise `Is Invisible`.
    pub fn is_visible(&self, names: &[&str]) -> Result<&Self, CheckFailure> {
        self.shown_in(self.snapshot.windows().iter(), names)
    }

    /// Passes if nothing matches `names`, or some match is hidden.
    ///
    /// # Errors
    ///
    /// Reports `Is Visible` with the searched fragments.
    pub fn is_invisible(&self, names: &[&str]) -> Result<&Self, CheckFailure> {
        self.hidden_in(self.snapshot.windows().iter(), names)
    }

    /// Passes if a window above every app window matches `names` and has
    /// the requested visibility.
    ///
    /// # Errors
    ///
    /// See [`is_visible`](Self::is_visible) and
    /// [`is_invisible`](Self::is_invisible).
    pub fn is_above_app_window(&self, names: &[&str], visible: bool) -> Result<&Self, CheckFailure> {
        self.with_visibility(self.snapshot.above_app_windows().iter(), names, visible)
    }

    /// Like [`is_above_app_window`](Self::is_above_app_window) for the
    /// windows stacked below the app windows.
    ///
    /// # Errors
    ///
    /// See [`is_visible`](Self::is_visible) and
    /// [`is_invisible`](Self::is_invisible).
    pub fn is_below_app_window(&self, names: &[&str], visible: bool) -> Result<&Self, CheckFailure> {
        self.with_visibility(self.snapshot.below_app_windows().iter(), names, visible)
    }

    /// Visibility check restricted to windows not owned by an activity.
    ///
    /// # Errors
    ///
    /// See [`is_visible`](Self::is_visible) and
    /// [`is_invisible`](Self::is_invisible).
    pub fn contains_non_app_window(
        &self,
        names: &[&str],
        visible: bool,
    ) -> Result<&Self, CheckFailure> {
        self.with_visibility(self.snapshot.non_app_windows(), names, visible)
    }

    /// Visibility check restricted to activity windows.
    ///
    /// # Errors
    ///
    /// See [`is_visible`](Self::is_visible) and
    /// [`is_invisible`](Self::is_invisible).
    pub fn contains_app_window(&self, names: &[&str], visible: bool) -> Result<&Self, CheckFailure> {
        self.with_visibility(self.snapshot.app_windows(), names, visible)
    }

    /// Passes if the topmost visible app window matches `names`.
    ///
    /// # Errors
    ///
    /// `No window titles to search` for empty `names`, `Could not find`
    /// when nothing matches, otherwise `Not on top` with the window found.
    pub fn shows_app_window_on_top(&self, names: &[&str]) -> Result<&Self, CheckFailure> {
        if names.is_empty() {
            return Err(CheckFailure::new(Fact::label("No window titles to search")));
        }
        self.contains(names)?;
        let top = self.snapshot.top_visible_app_window();
        if top.is_some_and(|title| names.iter().any(|n| title.contains(n))) {
            return Ok(self);
        }
        Err(CheckFailure::from_facts(alloc::vec![
            Fact::new("Not on top", join(names)),
            Fact::new("Found", top.unwrap_or("<none>")),
        ]))
    }

    /// Passes if the frames of the visible windows matching each of
    /// `names` are pairwise disjoint.
    ///
    /// # Errors
    ///
    /// A usage failure for fewer than two names, `Could not find` for the
    /// first name without a window, otherwise the first overlapping pair.
    pub fn no_windows_overlap(&self, names: &[&str]) -> Result<&Self, CheckFailure> {
        if names.len() < 2 {
            return Err(CheckFailure::new(Fact::new(
                "Must give more than one window to check",
                join(names),
            )));
        }
        for name in names {
            self.contains(&[*name])?;
        }
        let frames: Vec<_> = names
            .iter()
            .map(|name| self.snapshot.frame_region(&[*name]))
            .collect();
        for (i, first) in frames.iter().enumerate() {
            for (j, second) in frames.iter().enumerate().skip(i + 1) {
                if first.overlaps(second).is_some() {
                    return Err(CheckFailure::from_facts(alloc::vec![
                        Fact::new("Overlap", names[i]),
                        Fact::new("Overlap", names[j]),
                    ]));
                }
            }
        }
        Ok(self)
    }

    /// Passes if the first window matching `above` is in front of the
    /// first window matching `below`.
    ///
    /// # Errors
    ///
    /// A usage failure when both names are equal, `Could not find` for a
    /// missing window, otherwise `{above} is above {below}` with both
    /// positions.
    pub fn is_above_window(&self, above: &str, below: &str) -> Result<&Self, CheckFailure> {
        if above == below {
            return Err(CheckFailure::new(Fact::new(
                "A window cannot be above itself",
                above,
            )));
        }
        self.contains(&[above])?.contains(&[below])?;
        let above_z = self.snapshot.position_of(above);
        let below_z = self.snapshot.position_of(below);
        if above_z < below_z {
            return Ok(self);
        }
        Err(CheckFailure::from_facts(alloc::vec![
            Fact::label(format!("{above} is above {below}")),
            Fact::new("Above position", above_z.unwrap_or_default()),
            Fact::new("Below position", below_z.unwrap_or_default()),
        ]))
    }

    /// The union of the frames of visible windows matching `names`.
    ///
    /// # Errors
    ///
    /// `Could not find` when nothing matches.
    pub fn frame_region(&self, names: &[&str]) -> Result<RegionCheck, CheckFailure> {
        self.contains(names)?;
        let context = alloc::vec![
            Fact::new("Entry", self.snapshot.timestamp()),
            Fact::new("Windows", join(names)),
        ];
        Ok(RegionCheck::with_context(self.snapshot.frame_region(names), context))
    }

    /// Passes if display `display_id` has `rotation`.
    ///
    /// # Errors
    ///
    /// `Could not find display`, or the expected and actual rotation.
    pub fn has_rotation(&self, rotation: Rotation, display_id: i32) -> Result<&Self, CheckFailure> {
        let actual = self.rotation(display_id)?;
        if actual == rotation {
            return Ok(self);
        }
        Err(CheckFailure::from_facts(alloc::vec![
            Fact::label("Incorrect rotation"),
            Fact::new("Display", display_id),
            Fact::new("Expected", rotation),
            Fact::new("Actual", actual),
        ]))
    }

    /// Passes if display `display_id` does not have `rotation`.
    ///
    /// # Errors
    ///
    /// `Could not find display`, or `Rotation should not be` the found one.
    pub fn is_not_rotation(
        &self,
        rotation: Rotation,
        display_id: i32,
    ) -> Result<&Self, CheckFailure> {
        if self.rotation(display_id)? != rotation {
            return Ok(self);
        }
        Err(CheckFailure::from_facts(alloc::vec![
            Fact::new("Rotation should not be", rotation),
            Fact::new("Display", display_id),
        ]))
    }

    /// Passes if the focused window is titled exactly `title`.
    ///
    /// # Errors
    ///
    /// Reports the expected and focused titles.
    pub fn is_focused(&self, title: &str) -> Result<&Self, CheckFailure> {
        let focused = self.snapshot.focused_window();
        if focused == Some(title) {
            return Ok(self);
        }
        Err(CheckFailure::from_facts(alloc::vec![
            Fact::label("Invalid focused window"),
            Fact::new("Expected", title),
            Fact::new("Actual", focused.unwrap_or("<none>")),
        ]))
    }

    /// Passes unless the focused window is titled exactly `title`.
    ///
    /// # Errors
    ///
    /// Reports `Has focused window`.
    pub fn is_not_focused(&self, title: &str) -> Result<&Self, CheckFailure> {
        if self.snapshot.focused_window() == Some(title) {
            Err(CheckFailure::new(Fact::new("Has focused window", title)))
        } else {
            Ok(self)
        }
    }

    fn rotation(&self, display_id: i32) -> Result<Rotation, CheckFailure> {
        self.snapshot
            .display(display_id)
            .map(|display| display.rotation)
            .ok_or_else(|| CheckFailure::new(Fact::new("Could not find display", display_id)))
    }

    fn with_visibility<'w>(
        &self,
        windows: impl Iterator<Item = &'w WindowState>,
        names: &[&str],
        visible: bool,
    ) -> Result<&Self, CheckFailure> {
        if visible {
            self.shown_in(windows, names)
        } else {
            self.hidden_in(windows, names)
        }
    }

    // The name lookup spans the whole snapshot; visibility is judged only
    // among `windows`.
    fn shown_in<'w>(
        &self,
        mut windows: impl Iterator<Item = &'w WindowState>,
        names: &[&str],
    ) -> Result<&Self, CheckFailure> {
        self.contains(names)?;
        if windows.any(|w| w.is_visible && names.iter().any(|n| w.title.contains(n))) {
            Ok(self)
        } else {
            Err(CheckFailure::new(Fact::new("Is Invisible", join(names))))
        }
    }

    fn hidden_in<'w>(
        &self,
        mut windows: impl Iterator<Item = &'w WindowState>,
        names: &[&str],
    ) -> Result<&Self, CheckFailure> {
        if self.snapshot.find(names).next().is_none() {
            return Ok(self);
        }
        if windows.any(|w| !w.is_visible && names.iter().any(|n| w.title.contains(n))) {
            Ok(self)
        } else {
            Err(CheckFailure::new(Fact::new("Is Visible", join(names))))
        }
    }
}
