// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arena-backed layer tree rebuilt from a flat, parent-referencing list.

use alloc::collections::BTreeMap;
use alloc::vec;
use alloc::vec::Vec;

use super::id::{INVALID, LayerId, LayerIndex};
use super::props::Layer;
use super::traverse::{self, Ancestors, Children};
use crate::error::BuildError;

/// The layers of one snapshot, linked into a forest.
///
/// Layers keep their input position as their [`LayerIndex`]. Topology lives
/// in parallel index arrays so the tree owns no node pointers and can never
/// form ownership cycles. A tree is built once and never mutated.
#[derive(Clone, Debug)]
pub struct LayerTree {
    layers: Vec<Layer>,

    // -- Topology --
    pub(crate) parent: Vec<u32>,
    pub(crate) first_child: Vec<u32>,
    pub(crate) next_sibling: Vec<u32>,
    roots: Vec<u32>,

    // -- Derived at build time --
    hidden_by_parent: Vec<bool>,
    paint_order: Vec<u32>,
    flattened: Vec<u32>,
    by_id: BTreeMap<LayerId, u32>,
}

impl LayerTree {
    /// Links `layers` into a forest.
    ///
    /// A layer whose `parent_id` names no layer in the list is a root.
    /// Children and roots are ordered by ascending `z`, ties keeping input
    /// order.
    ///
    /// # Errors
    ///
    /// [`BuildError::DuplicateLayerId`] if two layers share an id, and
    /// [`BuildError::ParentCycle`] if parent links loop.
    pub fn build(layers: Vec<Layer>) -> Result<Self, BuildError> {
        let n = layers.len();
        let mut by_id = BTreeMap::new();
        for (idx, layer) in layers.iter().enumerate() {
            if by_id.insert(layer.id, slot_of(idx)).is_some() {
                return Err(BuildError::DuplicateLayerId { id: layer.id });
            }
        }

        let parent: Vec<u32> = layers
            .iter()
            .map(|layer| {
                layer
                    .parent_id
                    .and_then(|p| by_id.get(&p).copied())
                    .unwrap_or(INVALID)
            })
            .collect();
        check_acyclic(&layers, &parent)?;

        // Group children under their parent, stable-sorted by z.
        let mut kids: Vec<Vec<u32>> = vec![Vec::new(); n];
        let mut roots = Vec::new();
        for (idx, &p) in parent.iter().enumerate() {
            if p == INVALID {
                roots.push(slot_of(idx));
            } else {
                kids[p as usize].push(slot_of(idx));
            }
        }
        roots.sort_by_key(|&i| layers[i as usize].z);

        let mut first_child = vec![INVALID; n];
        let mut next_sibling = vec![INVALID; n];
        for (p, list) in kids.iter_mut().enumerate() {
            list.sort_by_key(|&i| layers[i as usize].z);
            let mut prev = INVALID;
            for &c in list.iter() {
                if prev == INVALID {
                    first_child[p] = c;
                } else {
                    next_sibling[prev as usize] = c;
                }
                prev = c;
            }
        }

        let mut tree = Self {
            layers,
            parent,
            first_child,
            next_sibling,
            roots,
            hidden_by_parent: vec![false; n],
            paint_order: Vec::new(),
            flattened: Vec::new(),
            by_id,
        };
        tree.paint_order = traverse::paint_order(&tree, &tree.roots);
        tree.flattened = traverse::breadth_order(&tree, &tree.roots);

        // Parents precede children in paint order, so one pass suffices.
        for i in 0..tree.paint_order.len() {
            let idx = tree.paint_order[i] as usize;
            let p = tree.parent[idx];
            if p != INVALID {
                let parent_layer = &tree.layers[p as usize];
                tree.hidden_by_parent[idx] =
                    parent_layer.is_hidden_by_policy() || tree.hidden_by_parent[p as usize];
            }
        }

        Ok(tree)
    }

    /// Number of layers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Whether the snapshot has no layers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Returns the layer at `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx` came from a different tree and is out of range.
    #[must_use]
    pub fn layer(&self, idx: LayerIndex) -> &Layer {
        &self.layers[idx.slot()]
    }

    /// Looks up a layer by id.
    #[must_use]
    pub fn index_of(&self, id: LayerId) -> Option<LayerIndex> {
        self.by_id.get(&id).map(|&i| LayerIndex(i))
    }

    /// Returns the parent of a layer, if any.
    #[must_use]
    pub fn parent(&self, idx: LayerIndex) -> Option<LayerIndex> {
        let p = self.parent[idx.slot()];
        (p != INVALID).then_some(LayerIndex(p))
    }

    /// Returns an iterator over the direct children of a layer, back to front.
    #[must_use]
    pub fn children(&self, idx: LayerIndex) -> Children<'_> {
        Children::new(self, self.first_child[idx.slot()])
    }

    /// Returns an iterator over the ancestors of a layer, nearest first.
    #[must_use]
    pub fn ancestors(&self, idx: LayerIndex) -> Ancestors<'_> {
        Ancestors::new(self, idx.0)
    }

    /// Root layers, back to front.
    pub fn roots(&self) -> impl ExactSizeIterator<Item = LayerIndex> + '_ {
        self.roots.iter().map(|&i| LayerIndex(i))
    }

    /// Whether all layers hang off a single root.
    ///
    /// Producers are expected to emit one logical scene per snapshot, but
    /// several roots are tolerated.
    #[must_use]
    pub fn has_single_root(&self) -> bool {
        self.roots.len() == 1
    }

    /// Whether any ancestor is hidden by policy.
    #[must_use]
    pub fn is_hidden_by_parent(&self, idx: LayerIndex) -> bool {
        self.hidden_by_parent[idx.slot()]
    }

    /// Layers in paint order (depth-first, back to front).
    pub fn paint_order(&self) -> impl DoubleEndedIterator<Item = LayerIndex> + '_ {
        self.paint_order.iter().map(|&i| LayerIndex(i))
    }

    /// Layers in flattened order (breadth-first from the roots).
    pub fn flattened(&self) -> impl ExactSizeIterator<Item = LayerIndex> + '_ {
        self.flattened.iter().map(|&i| LayerIndex(i))
    }

    /// All layers in input order.
    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "snapshots never approach u32::MAX layers"
)]
pub(crate) fn slot_of(idx: usize) -> u32 {
    idx as u32
}

/// Rejects parent links that loop back on themselves.
fn check_acyclic(layers: &[Layer], parent: &[u32]) -> Result<(), BuildError> {
    const UNSEEN: u8 = 0;
    const ACTIVE: u8 = 1;
    const DONE: u8 = 2;

    let mut state = vec![UNSEEN; parent.len()];
    let mut chain = Vec::new();
    for start in 0..parent.len() {
        let mut cur = slot_of(start);
        while cur != INVALID && state[cur as usize] == UNSEEN {
            state[cur as usize] = ACTIVE;
            chain.push(cur);
            cur = parent[cur as usize];
        }
        if cur != INVALID && state[cur as usize] == ACTIVE {
            return Err(BuildError::ParentCycle {
                id: layers[cur as usize].id,
            });
        }
        for idx in chain.drain(..) {
            state[idx as usize] = DONE;
        }
    }
    Ok(())
}
