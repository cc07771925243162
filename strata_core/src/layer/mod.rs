// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer data model, tree reconstruction and occlusion.
//!
//! A *layer* is one rendered surface as captured in a snapshot. Each layer
//! has:
//!
//! - An identity ([`LayerId`]) assigned by the producer, unique per snapshot.
//! - A back-reference to its parent. The tree is rebuilt from these by
//!   [`LayerTree::build`]; it is never stored on the layers themselves.
//! - **Captured properties**: geometry, color, corner radius, kind and flags
//!   (see [`Layer`]).
//! - **Derived state** produced by [`OcclusionResult::compute`]: which
//!   layers in front occlude or cover it, and whether it ends up visible.
//!
//! Trees are stored in struct-of-arrays layout with [`LayerIndex`] handles
//! into the arena.

mod id;
mod occlusion;
mod props;
mod store;
mod traverse;

pub use id::{INVALID, LayerId, LayerIndex, OFFSCREEN_ROOT_ID};
pub use occlusion::{InvisibleReason, Occlusion, OcclusionResult, Visibility};
pub use props::{BufferSize, Color, Layer, LayerFlags, LayerKind};
pub use store::LayerTree;
pub use traverse::{Ancestors, Children};
