// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Structural errors raised while building a layer tree or window snapshot.

use alloc::string::String;

use crate::layer::LayerId;

/// Malformed snapshot input.
///
/// These indicate a broken producer rather than a failed check, so they are
/// surfaced immediately and never retried.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// Two layers in one snapshot share an id.
    #[error("duplicate layer id {id} in snapshot")]
    DuplicateLayerId {
        /// The repeated id.
        id: LayerId,
    },
    /// Following parent links from this layer never reaches a root.
    #[error("layer {id} is part of a parent cycle")]
    ParentCycle {
        /// A layer on the cycle.
        id: LayerId,
    },
    /// More than one task display area claims the same activity.
    #[error("activity {activity} belongs to more than one task display area")]
    AmbiguousActivityOwner {
        /// The activity claimed twice.
        activity: String,
    },
}
