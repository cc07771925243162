// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Checker configuration.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

/// Name fragment of the splash screen window shown while an app starts.
pub const SPLASH_SCREEN_NAME: &str = "Splash Screen";

/// Name fragment of the snapshot window shown while an app resumes.
pub const SNAPSHOT_WINDOW_NAME: &str = "SnapshotStartingWindow";

/// How the members of an assertion group combine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GroupMatch {
    /// The group holds if any member holds.
    #[default]
    Any,
    /// The group holds only if every member holds.
    All,
}

/// Knobs for trace verification.
///
/// Built with struct-update syntax over [`Default`]:
///
/// ```
/// use strata_check::CheckConfig;
///
/// let config = CheckConfig {
///     skip_leading: true,
///     ..CheckConfig::default()
/// };
/// assert!(config.use_composition_region_only);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckConfig {
    /// Ignore entries until the first assertion group passes for the first
    /// time.
    pub skip_leading: bool,
    /// How group members combine.
    pub group_match: GroupMatch,
    /// Region checks use only compositor-computed visible regions, not
    /// screen bounds.
    pub use_composition_region_only: bool,
    /// Name fragments excluded from flicker detection.
    pub flicker_ignore: Vec<String>,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            skip_leading: false,
            group_match: GroupMatch::Any,
            use_composition_region_only: true,
            flicker_ignore: alloc::vec![
                SPLASH_SCREEN_NAME.to_string(),
                SNAPSHOT_WINDOW_NAME.to_string(),
            ],
        }
    }
}

impl CheckConfig {
    /// The flicker ignore list as string slices.
    #[must_use]
    pub fn flicker_ignore_names(&self) -> Vec<&str> {
        self.flicker_ignore.iter().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = CheckConfig::default();
        assert!(!config.skip_leading);
        assert_eq!(config.group_match, GroupMatch::Any);
        assert!(config.use_composition_region_only);
        assert_eq!(
            config.flicker_ignore_names(),
            [SPLASH_SCREEN_NAME, SNAPSHOT_WINDOW_NAME]
        );
    }
}
