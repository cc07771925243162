// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Window-manager snapshots.
//!
//! A [`WindowSnapshot`] is the window-manager view of one captured frame:
//! the window list in z-order (top first), the displays with their rotation,
//! and the task display areas that own activities. Unlike a layer
//! [`Snapshot`](crate::snapshot::Snapshot) there is no tree to rebuild, but
//! activity ownership is validated at construction.
//!
//! ```
//! use kurbo::Rect;
//! use strata_core::window::{WindowSnapshot, WindowState};
//!
//! let snapshot = WindowSnapshot::new(
//!     0,
//!     vec![
//!         WindowState::new("StatusBar").with_frame(Rect::new(0., 0., 100., 10.)),
//!         WindowState::new("com.example/.Main").app_window().with_frame(Rect::new(0., 0., 100., 200.)),
//!         WindowState::new("Wallpaper"),
//!     ],
//! );
//! assert_eq!(snapshot.top_visible_app_window(), Some("com.example/.Main"));
//! assert_eq!(snapshot.above_app_windows().len(), 1);
//! ```

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use kurbo::Rect;

use crate::error::BuildError;
use crate::region::Region;
use crate::snapshot::{TraceEntry, matches_any};

/// Display rotation in quarter turns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Rotation {
    /// Natural orientation.
    #[default]
    Rotation0,
    /// 90 degrees.
    Rotation90,
    /// 180 degrees.
    Rotation180,
    /// 270 degrees.
    Rotation270,
}

impl Rotation {
    /// Rotation from a quarter-turn count, wrapping past a full turn.
    #[must_use]
    pub fn from_quarter_turns(turns: u32) -> Self {
        match turns % 4 {
            0 => Self::Rotation0,
            1 => Self::Rotation90,
            2 => Self::Rotation180,
            _ => Self::Rotation270,
        }
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Rotation0 => "ROTATION_0",
            Self::Rotation90 => "ROTATION_90",
            Self::Rotation180 => "ROTATION_180",
            Self::Rotation270 => "ROTATION_270",
        })
    }
}

/// One window as captured from the window manager.
#[derive(Clone, Debug, PartialEq)]
pub struct WindowState {
    /// Window title, usually the owning component name.
    pub title: String,
    /// Display the window is placed on.
    pub display_id: i32,
    /// Whether the window belongs to an activity.
    pub is_app_window: bool,
    /// Whether the window surface is shown.
    pub is_visible: bool,
    /// Window frame in display coordinates.
    pub frame: Rect,
}

impl WindowState {
    /// A visible, non-app window on display 0 with an empty frame.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            display_id: 0,
            is_app_window: false,
            is_visible: true,
            frame: Rect::ZERO,
        }
    }

    /// Marks the window as belonging to an activity.
    #[must_use]
    pub fn app_window(mut self) -> Self {
        self.is_app_window = true;
        self
    }

    /// Marks the window surface as not shown.
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.is_visible = false;
        self
    }

    /// Moves the window to another display.
    #[must_use]
    pub fn with_display(mut self, display_id: i32) -> Self {
        self.display_id = display_id;
        self
    }

    /// Sets the window frame.
    #[must_use]
    pub fn with_frame(mut self, frame: Rect) -> Self {
        self.frame = frame;
        self
    }
}

impl fmt::Display for WindowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} frame={:?}", self.title, self.frame)
    }
}

/// A display and its current rotation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisplayState {
    /// Display id.
    pub id: i32,
    /// Current rotation.
    pub rotation: Rotation,
}

/// A container of tasks on one display, listing the activities it holds.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TaskDisplayArea {
    /// Area name.
    pub name: String,
    /// Display the area belongs to.
    pub display_id: i32,
    /// Activities inside any task of this area.
    pub activities: Vec<String>,
}

impl TaskDisplayArea {
    /// An area with no activities.
    pub fn new(name: impl Into<String>, display_id: i32) -> Self {
        Self {
            name: name.into(),
            display_id,
            activities: Vec::new(),
        }
    }

    /// Adds an activity to the area.
    #[must_use]
    pub fn with_activity(mut self, activity: impl Into<String>) -> Self {
        self.activities.push(activity.into());
        self
    }

    /// Whether the area holds an activity named exactly `activity`.
    #[must_use]
    pub fn contains_activity(&self, activity: &str) -> bool {
        self.activities.iter().any(|a| a == activity)
    }
}

/// One captured window-manager state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WindowSnapshot {
    timestamp: i64,
    windows: Vec<WindowState>,
    displays: Vec<DisplayState>,
    task_display_areas: Vec<TaskDisplayArea>,
    focused_window: Option<String>,
}

impl WindowSnapshot {
    /// A snapshot with `windows` in z-order, top first, and no displays.
    #[must_use]
    pub fn new(timestamp: i64, windows: Vec<WindowState>) -> Self {
        Self {
            timestamp,
            windows,
            ..Self::default()
        }
    }

    /// Adds a display.
    #[must_use]
    pub fn with_display(mut self, id: i32, rotation: Rotation) -> Self {
        self.displays.push(DisplayState { id, rotation });
        self
    }

    /// Records the focused window title.
    #[must_use]
    pub fn with_focused_window(mut self, title: impl Into<String>) -> Self {
        self.focused_window = Some(title.into());
        self
    }

    /// Attaches the task display areas.
    ///
    /// # Errors
    ///
    /// [`BuildError::AmbiguousActivityOwner`] if two areas hold the same
    /// activity.
    pub fn with_task_display_areas(
        mut self,
        areas: Vec<TaskDisplayArea>,
    ) -> Result<Self, BuildError> {
        check_activity_owners(&areas)?;
        self.task_display_areas = areas;
        Ok(self)
    }

    /// Capture time.
    #[must_use]
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// All windows, top first.
    #[must_use]
    pub fn windows(&self) -> &[WindowState] {
        &self.windows
    }

    /// Whether the snapshot has no windows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Windows whose title contains any of `names`, top first.
    pub fn find<'a>(&'a self, names: &'a [&str]) -> impl Iterator<Item = &'a WindowState> + 'a {
        self.windows
            .iter()
            .filter(move |w| matches_any(&w.title, names))
    }

    /// Z-order position of the first window whose title contains `name`.
    #[must_use]
    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.windows.iter().position(|w| w.title.contains(name))
    }

    /// Windows whose surface is shown, top first.
    pub fn visible_windows(&self) -> impl Iterator<Item = &WindowState> + '_ {
        self.windows.iter().filter(|w| w.is_visible)
    }

    /// Activity windows, top first.
    pub fn app_windows(&self) -> impl Iterator<Item = &WindowState> + '_ {
        self.windows.iter().filter(|w| w.is_app_window)
    }

    /// Windows not owned by an activity, top first.
    pub fn non_app_windows(&self) -> impl Iterator<Item = &WindowState> + '_ {
        self.windows.iter().filter(|w| !w.is_app_window)
    }

    /// Non-app windows stacked above the topmost app window.
    #[must_use]
    pub fn above_app_windows(&self) -> &[WindowState] {
        let end = self
            .windows
            .iter()
            .position(|w| w.is_app_window)
            .unwrap_or(self.windows.len());
        &self.windows[..end]
    }

    /// Windows left after skipping the ones above the app windows and as
    /// many entries as there are app windows.
    #[must_use]
    pub fn below_app_windows(&self) -> &[WindowState] {
        let start = self.above_app_windows().len() + self.app_windows().count();
        self.windows.get(start..).unwrap_or_default()
    }

    /// Title of the topmost visible app window.
    #[must_use]
    pub fn top_visible_app_window(&self) -> Option<&str> {
        self.windows
            .iter()
            .find(|w| w.is_app_window && w.is_visible)
            .map(|w| w.title.as_str())
    }

    /// Union of the frames of visible windows matching `names`.
    #[must_use]
    pub fn frame_region(&self, names: &[&str]) -> Region {
        let mut region = Region::new();
        for window in self.find(names).filter(|w| w.is_visible) {
            region.add_rect(window.frame);
        }
        region
    }

    /// Known displays.
    #[must_use]
    pub fn displays(&self) -> &[DisplayState] {
        &self.displays
    }

    /// The display with `id`.
    #[must_use]
    pub fn display(&self, id: i32) -> Option<&DisplayState> {
        self.displays.iter().find(|d| d.id == id)
    }

    /// Title of the focused window, if any.
    #[must_use]
    pub fn focused_window(&self) -> Option<&str> {
        self.focused_window.as_deref()
    }

    /// All task display areas.
    #[must_use]
    pub fn task_display_areas(&self) -> &[TaskDisplayArea] {
        &self.task_display_areas
    }

    /// The area holding `activity`. Unique by construction.
    #[must_use]
    pub fn task_display_area(&self, activity: &str) -> Option<&TaskDisplayArea> {
        self.task_display_areas
            .iter()
            .find(|area| area.contains_activity(activity))
    }
}

fn check_activity_owners(areas: &[TaskDisplayArea]) -> Result<(), BuildError> {
    let mut owner: BTreeMap<&str, usize> = BTreeMap::new();
    for (index, area) in areas.iter().enumerate() {
        for activity in &area.activities {
            match owner.insert(activity.as_str(), index) {
                Some(previous) if previous != index => {
                    return Err(BuildError::AmbiguousActivityOwner {
                        activity: activity.clone(),
                    });
                }
                _ => {}
            }
        }
    }
    Ok(())
}

impl TraceEntry for WindowSnapshot {
    fn timestamp(&self) -> i64 {
        self.timestamp
    }
}

/// An ordered, immutable list of window snapshots.
#[derive(Clone, Debug, Default)]
pub struct WindowSequence {
    entries: Vec<WindowSnapshot>,
}

impl WindowSequence {
    /// Wraps snapshots, ordering them by timestamp.
    ///
    /// Snapshots with equal timestamps keep their relative order.
    #[must_use]
    pub fn from_entries(mut entries: Vec<WindowSnapshot>) -> Self {
        entries.sort_by_key(WindowSnapshot::timestamp);
        Self { entries }
    }

    /// All snapshots in order.
    #[must_use]
    pub fn entries(&self) -> &[WindowSnapshot] {
        &self.entries
    }

    /// Number of snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no snapshots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The snapshot captured at exactly `timestamp`.
    #[must_use]
    pub fn entry_at(&self, timestamp: i64) -> Option<&WindowSnapshot> {
        let start = self.entries.partition_point(|e| e.timestamp < timestamp);
        self.entries.get(start).filter(|e| e.timestamp == timestamp)
    }

    /// Snapshots with `start <= timestamp <= end`.
    #[must_use]
    pub fn range(&self, start: i64, end: i64) -> &[WindowSnapshot] {
        let lo = self.entries.partition_point(|e| e.timestamp < start);
        let hi = self.entries.partition_point(|e| e.timestamp <= end);
        self.entries.get(lo..hi.max(lo)).unwrap_or_default()
    }

    /// The earliest snapshot.
    #[must_use]
    pub fn first(&self) -> Option<&WindowSnapshot> {
        self.entries.first()
    }

    /// The latest snapshot.
    #[must_use]
    pub fn last(&self) -> Option<&WindowSnapshot> {
        self.entries.last()
    }

    /// Iterates over snapshots in order.
    pub fn iter(&self) -> core::slice::Iter<'_, WindowSnapshot> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    fn scene() -> Vec<WindowState> {
        vec![
            WindowState::new("StatusBar").with_frame(Rect::new(0.0, 0.0, 100.0, 10.0)),
            WindowState::new("NavigationBar")
                .hidden()
                .with_frame(Rect::new(0.0, 190.0, 100.0, 200.0)),
            WindowState::new("com.example/.Dialog")
                .app_window()
                .hidden(),
            WindowState::new("com.example/.Main")
                .app_window()
                .with_frame(Rect::new(0.0, 0.0, 100.0, 200.0)),
            WindowState::new("Wallpaper").with_frame(Rect::new(0.0, 0.0, 100.0, 200.0)),
        ]
    }

    #[test]
    fn z_order_partitions() {
        let snapshot = WindowSnapshot::new(0, scene());
        let titles = |ws: &[WindowState]| ws.iter().map(|w| w.title.clone()).collect::<Vec<_>>();
        assert_eq!(titles(snapshot.above_app_windows()), ["StatusBar", "NavigationBar"]);
        assert_eq!(titles(snapshot.below_app_windows()), ["Wallpaper"]);
        assert_eq!(snapshot.app_windows().count(), 2);
        assert_eq!(snapshot.non_app_windows().count(), 3);
        assert_eq!(snapshot.visible_windows().count(), 3);
        assert_eq!(snapshot.top_visible_app_window(), Some("com.example/.Main"));
        assert_eq!(snapshot.position_of("Main"), Some(3));
        assert_eq!(snapshot.position_of("Launcher"), None);
    }

    #[test]
    fn no_app_windows_leaves_everything_above() {
        let snapshot = WindowSnapshot::new(0, vec![WindowState::new("a"), WindowState::new("b")]);
        assert_eq!(snapshot.above_app_windows().len(), 2);
        assert!(snapshot.below_app_windows().is_empty());
        assert_eq!(snapshot.top_visible_app_window(), None);
    }

    #[test]
    fn frame_region_skips_hidden_windows() {
        let snapshot = WindowSnapshot::new(0, scene());
        let bars = snapshot.frame_region(&["StatusBar", "NavigationBar"]);
        assert!(bars.same_area_as(&Region::from_rect(Rect::new(0.0, 0.0, 100.0, 10.0))));
        assert!(snapshot.frame_region(&["Dialog"]).is_empty());
    }

    #[test]
    fn displays_and_focus() {
        let snapshot = WindowSnapshot::new(0, scene())
            .with_display(0, Rotation::Rotation90)
            .with_focused_window("com.example/.Main");
        assert_eq!(snapshot.display(0).map(|d| d.rotation), Some(Rotation::Rotation90));
        assert!(snapshot.display(1).is_none());
        assert_eq!(snapshot.focused_window(), Some("com.example/.Main"));
        assert_eq!(Rotation::from_quarter_turns(7), Rotation::Rotation270);
        assert_eq!(alloc::format!("{}", Rotation::Rotation180), "ROTATION_180");
    }

    #[test]
    fn activity_lookup_by_task_display_area() {
        let snapshot = WindowSnapshot::new(0, scene())
            .with_task_display_areas(vec![
                TaskDisplayArea::new("DefaultTaskDisplayArea", 0)
                    .with_activity("com.example/.Main")
                    .with_activity("com.example/.Dialog"),
                TaskDisplayArea::new("Secondary", 1).with_activity("com.other/.Home"),
            ])
            .unwrap();
        let area = snapshot.task_display_area("com.other/.Home").unwrap();
        assert_eq!(area.display_id, 1);
        assert!(snapshot.task_display_area("com.example").is_none());
    }

    #[test]
    fn activity_claimed_by_two_areas_is_rejected() {
        let err = WindowSnapshot::new(0, scene())
            .with_task_display_areas(vec![
                TaskDisplayArea::new("DefaultTaskDisplayArea", 0).with_activity("com.example/.Main"),
                TaskDisplayArea::new("Secondary", 1).with_activity("com.example/.Main"),
            ])
            .unwrap_err();
        assert_eq!(
            err,
            BuildError::AmbiguousActivityOwner {
                activity: "com.example/.Main".into()
            }
        );
    }

    #[test]
    fn repeated_activity_within_one_area_is_fine() {
        let snapshot = WindowSnapshot::new(0, Vec::new()).with_task_display_areas(vec![
            TaskDisplayArea::new("DefaultTaskDisplayArea", 0)
                .with_activity("com.example/.Main")
                .with_activity("com.example/.Main"),
        ]);
        assert!(snapshot.is_ok());
    }

    #[test]
    fn sequence_orders_by_timestamp() {
        let seq = WindowSequence::from_entries(vec![
            WindowSnapshot::new(20, scene()),
            WindowSnapshot::new(10, scene()),
        ]);
        assert_eq!(seq.first().map(WindowSnapshot::timestamp), Some(10));
        assert_eq!(seq.last().map(WindowSnapshot::timestamp), Some(20));
        assert!(seq.entry_at(15).is_none());
        assert_eq!(seq.range(0, 15).len(), 1);
        assert!(seq.range(20, 10).is_empty());
    }
}
