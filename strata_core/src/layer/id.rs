// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer identity and arena index types.

use core::fmt;

/// Sentinel value indicating "no layer" in arena index fields.
pub const INVALID: u32 = u32::MAX;

/// Id reserved by the compositor for the root of offscreen layers.
pub const OFFSCREEN_ROOT_ID: LayerId = LayerId(0x7FFF_FFFD);

/// The producer-assigned identity of a layer.
///
/// Unique within one snapshot. The same id in two snapshots usually refers to
/// the same surface, but nothing here relies on that.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LayerId(pub i32);

impl fmt::Debug for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LayerId({})", self.0)
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Position of a layer in a [`LayerTree`](super::LayerTree) arena.
///
/// Only meaningful for the tree that produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LayerIndex(pub(crate) u32);

impl LayerIndex {
    /// Returns the raw arena slot (for diagnostics only).
    #[inline]
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    #[inline]
    pub(crate) const fn slot(self) -> usize {
        self.0 as usize
    }
}
