// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree traversal utilities.

use alloc::collections::VecDeque;
use alloc::vec::Vec;

use super::id::{INVALID, LayerIndex};
use super::store::LayerTree;

/// An iterator over the direct children of a layer, back to front.
///
/// Created by [`LayerTree::children`].
#[derive(Debug)]
pub struct Children<'a> {
    tree: &'a LayerTree,
    current: u32,
}

impl<'a> Children<'a> {
    pub(crate) fn new(tree: &'a LayerTree, first: u32) -> Self {
        Self {
            tree,
            current: first,
        }
    }
}

impl Iterator for Children<'_> {
    type Item = LayerIndex;

    fn next(&mut self) -> Option<LayerIndex> {
        if self.current == INVALID {
            return None;
        }
        let idx = self.current;
        self.current = self.tree.next_sibling[idx as usize];
        Some(LayerIndex(idx))
    }
}

/// An iterator from a layer's parent up to its root.
///
/// Created by [`LayerTree::ancestors`].
#[derive(Debug)]
pub struct Ancestors<'a> {
    tree: &'a LayerTree,
    current: u32,
}

impl<'a> Ancestors<'a> {
    pub(crate) fn new(tree: &'a LayerTree, start: u32) -> Self {
        Self {
            tree,
            current: tree.parent[start as usize],
        }
    }
}

impl Iterator for Ancestors<'_> {
    type Item = LayerIndex;

    fn next(&mut self) -> Option<LayerIndex> {
        if self.current == INVALID {
            return None;
        }
        let idx = self.current;
        self.current = self.tree.parent[idx as usize];
        Some(LayerIndex(idx))
    }
}

/// Depth-first pre-order over the forest, siblings in ascending `z`.
///
/// This is paint order: reading it backwards visits layers front to back.
pub(crate) fn paint_order(tree: &LayerTree, roots: &[u32]) -> Vec<u32> {
    let mut order = Vec::with_capacity(tree.len());
    let mut stack: Vec<u32> = roots.iter().rev().copied().collect();
    let mut scratch = Vec::new();
    while let Some(idx) = stack.pop() {
        order.push(idx);
        scratch.clear();
        scratch.extend(Children::new(tree, tree.first_child[idx as usize]).map(|c| c.0));
        stack.extend(scratch.iter().rev());
    }
    order
}

/// Breadth-first order over the forest: roots, then their children, and so
/// on, siblings in ascending `z`.
pub(crate) fn breadth_order(tree: &LayerTree, roots: &[u32]) -> Vec<u32> {
    let mut order = Vec::with_capacity(tree.len());
    let mut queue: VecDeque<u32> = roots.iter().copied().collect();
    while let Some(idx) = queue.pop_front() {
        order.push(idx);
        queue.extend(Children::new(tree, tree.first_child[idx as usize]).map(|c| c.0));
    }
    order
}
