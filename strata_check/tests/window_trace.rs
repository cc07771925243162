// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end checks over window-manager traces.

use kurbo::Rect;
use strata_check::{CheckConfig, FailureKind, WindowTraceCheck};
use strata_core::region::Region;
use strata_core::window::{Rotation, WindowSequence, WindowSnapshot, WindowState};

const SCREEN: Rect = Rect::new(0.0, 0.0, 100.0, 200.0);
const STATUS_BAR: Rect = Rect::new(0.0, 0.0, 100.0, 10.0);

/// Status bar on top, then the optional `app`, then the launcher.
fn frame(timestamp: i64, app: bool) -> WindowSnapshot {
    let mut windows = vec![WindowState::new("StatusBar").with_frame(STATUS_BAR)];
    if app {
        windows.push(WindowState::new("com.example/.Main").app_window().with_frame(SCREEN));
    }
    windows.push(
        WindowState::new("com.android.launcher/.Home")
            .app_window()
            .with_frame(SCREEN),
    );
    windows.push(WindowState::new("Wallpaper").with_frame(SCREEN));
    WindowSnapshot::new(timestamp, windows).with_display(0, Rotation::Rotation0)
}

fn trace(frames: Vec<WindowSnapshot>) -> WindowSequence {
    WindowSequence::from_entries(frames)
}

#[test]
fn app_launch_takes_the_top_app_slot() {
    let trace = trace(vec![
        frame(0, false),
        frame(1, false),
        frame(2, true),
        frame(3, true),
    ]);
    let mut check = WindowTraceCheck::new(&trace);
    check
        .shows_app_window_on_top(&["launcher"])
        .shows_above_app_window(&["StatusBar"])
        .then()
        .shows_app_window_on_top(&["Main"]);
    assert_eq!(check.sequence().groups().len(), 2);
    let result = check.for_all_entries();
    assert!(result.is_ok(), "{result:?}");
}

#[test]
fn top_app_failure_names_the_window_found() {
    let trace = trace(vec![frame(0, true)]);
    let mut check = WindowTraceCheck::new(&trace);
    check.shows_app_window_on_top(&["launcher"]);
    let failures = check.for_all_entries().unwrap_err();
    let failure = failures.first();
    assert_eq!(failure.group, "shows_app_window_on_top(launcher)");
    assert_eq!(failure.fact("Not on top"), Some("launcher"));
    assert_eq!(failure.fact("Found"), Some("com.example/.Main"));
}

#[test]
fn stacking_and_overlap_hold_across_entries() {
    let trace = trace(vec![frame(0, true), frame(1, true)]);
    let mut check = WindowTraceCheck::new(&trace);
    check
        .shows_below_app_window(&["Wallpaper"])
        .shows_non_app_window(&["StatusBar"])
        .shows_app_window(&["Main"])
        .is_above_window("Main", "launcher")
        .contains(&["Wallpaper"])
        .not_contains(&["InputMethod"]);
    let result = check.for_all_entries();
    assert!(result.is_ok(), "{result:?}");

    let mut overlap = WindowTraceCheck::new(&trace);
    overlap.no_windows_overlap(&["StatusBar", "Main"]);
    let failures = overlap.for_all_entries().unwrap_err();
    assert_eq!(failures.first().kind, FailureKind::NeverPassed);
    assert_eq!(failures.first().group, "no_windows_overlap(StatusBar, Main)");
}

#[test]
fn above_window_group_is_named_after_the_pair() {
    let trace = trace(vec![frame(0, true)]);
    let mut check = WindowTraceCheck::new(&trace);
    check.is_above_window("Wallpaper", "StatusBar");
    let failures = check.for_all_entries().unwrap_err();
    let failure = failures.first();
    assert_eq!(failure.group, "Wallpaper is above StatusBar");
    assert_eq!(failure.fact("Below position"), Some("0"));
}

#[test]
fn frame_coverage_over_the_trace() {
    let trace = trace(vec![frame(0, true), frame(1, true)]);
    let mut check = WindowTraceCheck::new(&trace);
    check
        .covers_exactly(Region::from_rect(STATUS_BAR), &["StatusBar"])
        .covers_at_least(Region::from_rect(SCREEN), &["Main"])
        .covers_at_most(Region::from_rect(SCREEN), &["Main", "StatusBar"]);
    let result = check.for_all_entries();
    assert!(result.is_ok(), "{result:?}");

    let mut short = WindowTraceCheck::new(&trace);
    short.covers_at_most(Region::from_rect(Rect::new(0.0, 0.0, 100.0, 5.0)), &["StatusBar"]);
    let failures = short.for_all_entries().unwrap_err();
    assert_eq!(
        failures.first().fact("Out-of-bounds region"),
        Some("[(0, 5, 100, 10)]")
    );
}

#[test]
fn hides_app_window_passes_when_the_window_is_gone() {
    let trace = trace(vec![frame(0, false), frame(1, false)]);
    let mut check = WindowTraceCheck::new(&trace);
    check.hides_app_window(&["Main"]).app_window_not_on_top(&["Main"]);
    let result = check.for_all_entries();
    assert!(result.is_ok(), "{result:?}");
}

#[test]
fn range_and_entry_access() {
    let trace = trace(vec![frame(0, false), frame(10, true), frame(20, true)]);
    let mut check = WindowTraceCheck::new(&trace);
    check.is_visible(&["Main"]);
    assert!(check.for_all_entries().is_err());
    assert!(check.for_range(10, 20).is_ok());

    let last = check.last().unwrap();
    assert!(last.has_rotation(Rotation::Rotation0, 0).is_ok());
    assert!(check.first().unwrap().not_contains(&["Main"]).is_ok());
    assert!(check.entry(10).is_some());
    assert!(check.entry(15).is_none());
}

#[test]
fn window_shown_for_one_entry_is_a_flicker() {
    let with_toast = |ts, shown: bool| {
        let mut snapshot = frame(ts, true);
        if shown {
            let mut windows = snapshot.windows().to_vec();
            windows.insert(0, WindowState::new("Toast").with_frame(Rect::new(10.0, 150.0, 90.0, 170.0)));
            snapshot = WindowSnapshot::new(ts, windows);
        }
        snapshot
    };
    let trace = trace(vec![
        with_toast(0, false),
        with_toast(10, true),
        with_toast(20, false),
    ]);
    let check = WindowTraceCheck::new(&trace);
    let failures = check
        .visible_windows_shown_more_than_one_consecutive_entry(&[])
        .unwrap_err();
    assert_eq!(failures.len(), 1);
    let failure = failures.first();
    assert_eq!(failure.kind, FailureKind::Flicker);
    assert_eq!(failure.anchor.timestamp, 10);
    assert_eq!(failure.fact("Not visible for 2 entries"), Some("Toast"));

    assert!(
        check
            .visible_windows_shown_more_than_one_consecutive_entry(&["Toast"])
            .is_ok()
    );
}

#[test]
fn skipping_leading_entries() {
    let trace = trace(vec![frame(0, false), frame(1, true), frame(2, true)]);
    let mut check = WindowTraceCheck::with_config(&trace, CheckConfig::default());
    check.skip_until_first_assertion().shows_app_window(&["Main"]);
    let result = check.for_all_entries();
    assert!(result.is_ok(), "{result:?}");
}
