// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Occlusion and visibility for one snapshot.
//!
//! Layers are walked front to back (reverse paint order). Each layer that
//! could be seen on its own is compared against the opaque and transparent
//! layers already visited, then joins one of those two lists.
//!
//! Rounded corners never fully occlude: a rounded rectangle leaves its
//! corners uncovered, so it only ever lands in `partially_occluded_by`.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::region::rect_is_empty;

use super::id::{LayerId, LayerIndex};
use super::props::Layer;
use super::store::{LayerTree, slot_of};

/// Which layers in front of a layer cover it.
///
/// Each list is in front-to-back order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Occlusion {
    /// Opaque layers without rounded corners that fully contain this layer.
    pub occluded_by: Vec<LayerIndex>,
    /// Opaque layers overlapping this layer but not in `occluded_by`.
    pub partially_occluded_by: Vec<LayerIndex>,
    /// Translucent layers overlapping this layer.
    pub covered_by: Vec<LayerIndex>,
}

impl Occlusion {
    /// Whether any opaque layer fully covers this one.
    #[must_use]
    pub fn is_occluded(&self) -> bool {
        !self.occluded_by.is_empty()
    }
}

/// Why a layer cannot be seen.
///
/// Variants are listed in reporting priority: when several apply, the
/// earliest one wins.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvisibleReason {
    /// An ancestor is hidden by policy.
    ///
    /// Names the direct parent, which may itself only be hidden through its
    /// own ancestors.
    HiddenByParent {
        /// The direct parent.
        parent: LayerId,
        /// Its name.
        name: String,
    },
    /// The layer's own hidden flag is set.
    HiddenByPolicy,
    /// No buffer and nothing else to draw.
    EmptyBuffer,
    /// Fill alpha is zero.
    ZeroAlpha,
    /// Fully covered by opaque layers.
    Occluded {
        /// Ids of the covering layers, front to back.
        by: Vec<LayerId>,
    },
    /// The crop rectangle encloses no area.
    EmptyCrop,
    /// The transform collapses the layer or is not finite.
    InvalidTransform,
    /// The visible region (or bounds, without one) is empty.
    EmptyRegion,
}

impl fmt::Display for InvisibleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HiddenByParent { name, .. } => write!(f, "Hidden by parent {name}"),
            Self::HiddenByPolicy => f.write_str("Flag is hidden"),
            Self::EmptyBuffer => f.write_str("Buffer is empty"),
            Self::ZeroAlpha => f.write_str("Alpha is 0"),
            Self::Occluded { by } => {
                f.write_str("Layer is occluded by: ")?;
                for (i, id) in by.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{id}")?;
                }
                Ok(())
            }
            Self::EmptyCrop => f.write_str("Crop is 0x0"),
            Self::InvalidTransform => f.write_str("Transform is invalid"),
            Self::EmptyRegion => f.write_str("Visible region is empty"),
        }
    }
}

/// Final visibility of a layer in its snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Visibility {
    /// The layer contributes pixels.
    Visible,
    /// The layer contributes nothing, for the given reason.
    Invisible(InvisibleReason),
}

impl Visibility {
    /// Whether the layer is visible.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        matches!(self, Self::Visible)
    }

    /// The reason, if invisible.
    #[must_use]
    pub fn reason(&self) -> Option<&InvisibleReason> {
        match self {
            Self::Visible => None,
            Self::Invisible(reason) => Some(reason),
        }
    }
}

/// Occlusion and visibility of every layer in a [`LayerTree`], indexed by
/// [`LayerIndex`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OcclusionResult {
    occlusion: Vec<Occlusion>,
    visibility: Vec<Visibility>,
}

impl OcclusionResult {
    /// Computes occlusion for every layer of `tree`.
    ///
    /// Never fails: missing regions fall back to bounds, and layers with
    /// non-axis-aligned transforms simply never contain or get contained.
    #[must_use]
    pub fn compute(tree: &LayerTree) -> Self {
        let mut occlusion = alloc::vec![Occlusion::default(); tree.len()];
        let mut opaque: Vec<LayerIndex> = Vec::new();
        let mut transparent: Vec<LayerIndex> = Vec::new();

        for idx in tree.paint_order().rev() {
            let layer = tree.layer(idx);
            if pre_occlusion_reason(tree, idx).is_some() || region_reason(layer).is_some() {
                continue;
            }
            let entry = &mut occlusion[idx.slot()];
            entry.occluded_by.extend(opaque.iter().copied().filter(|&o| {
                let front = tree.layer(o);
                front.contains(layer) && !front.has_rounded_corners()
            }));
            let fully = &entry.occluded_by;
            let partial = opaque
                .iter()
                .copied()
                .filter(|&o| tree.layer(o).overlaps(layer) && !fully.contains(&o))
                .collect::<Vec<_>>();
            entry.partially_occluded_by = partial;
            entry.covered_by.extend(
                transparent
                    .iter()
                    .copied()
                    .filter(|&t| tree.layer(t).overlaps(layer)),
            );

            if layer.is_opaque() {
                opaque.push(idx);
            } else {
                transparent.push(idx);
            }
        }

        let visibility = (0..tree.len())
            .map(|slot| {
                let idx = LayerIndex(slot_of(slot));
                let reason = pre_occlusion_reason(tree, idx)
                    .or_else(|| occlusion_reason(tree, &occlusion[slot]))
                    .or_else(|| region_reason(tree.layer(idx)));
                match reason {
                    Some(reason) => Visibility::Invisible(reason),
                    None => Visibility::Visible,
                }
            })
            .collect();

        Self {
            occlusion,
            visibility,
        }
    }

    /// Occlusion sets for a layer.
    #[must_use]
    pub fn occlusion(&self, idx: LayerIndex) -> &Occlusion {
        &self.occlusion[idx.slot()]
    }

    /// Visibility of a layer.
    #[must_use]
    pub fn visibility(&self, idx: LayerIndex) -> &Visibility {
        &self.visibility[idx.slot()]
    }

    /// Whether a layer is visible.
    #[must_use]
    pub fn is_visible(&self, idx: LayerIndex) -> bool {
        self.visibility[idx.slot()].is_visible()
    }

    /// Number of visible layers.
    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.visibility.iter().filter(|v| v.is_visible()).count()
    }

    /// Number of layers fully occluded by something in front.
    #[must_use]
    pub fn occluded_count(&self) -> usize {
        self.occlusion.iter().filter(|o| o.is_occluded()).count()
    }

    /// Number of layers with at least one partial occluder.
    #[must_use]
    pub fn partially_occluded_count(&self) -> usize {
        self.occlusion
            .iter()
            .filter(|o| !o.partially_occluded_by.is_empty())
            .count()
    }
}

/// Reasons that outrank occlusion, in priority order.
fn pre_occlusion_reason(tree: &LayerTree, idx: LayerIndex) -> Option<InvisibleReason> {
    let layer = tree.layer(idx);
    if tree.is_hidden_by_parent(idx) {
        if let Some(parent) = tree.parent(idx).map(|p| tree.layer(p)) {
            return Some(InvisibleReason::HiddenByParent {
                parent: parent.id,
                name: parent.name.clone(),
            });
        }
    }
    if layer.is_hidden_by_policy() {
        return Some(InvisibleReason::HiddenByPolicy);
    }
    if layer.is_buffer_empty() && !layer.has_effects() {
        return Some(InvisibleReason::EmptyBuffer);
    }
    if !layer.fills_color() {
        return Some(InvisibleReason::ZeroAlpha);
    }
    None
}

fn occlusion_reason(tree: &LayerTree, occlusion: &Occlusion) -> Option<InvisibleReason> {
    occlusion.is_occluded().then(|| InvisibleReason::Occluded {
        by: occlusion
            .occluded_by
            .iter()
            .map(|&o| tree.layer(o).id)
            .collect(),
    })
}

/// Geometry reasons. Layers with one of these never take part in occlusion.
fn region_reason(layer: &Layer) -> Option<InvisibleReason> {
    if layer.has_empty_crop() {
        return Some(InvisibleReason::EmptyCrop);
    }
    if !layer.transform.is_valid() {
        return Some(InvisibleReason::InvalidTransform);
    }
    // Explicit screen bounds can still be empty.
    (layer.effective_region().is_empty() || rect_is_empty(layer.screen_bounds()))
        .then_some(InvisibleReason::EmptyRegion)
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::vec;

    use kurbo::Rect;

    use super::*;
    use crate::layer::{Color, LayerKind};
    use crate::region::Region;
    use crate::transform::Transform3d;

    const SCREEN: Rect = Rect::new(0.0, 0.0, 100.0, 100.0);

    fn surface(id: i32, name: &str, bounds: Rect) -> Layer {
        Layer::new(id, name)
            .with_parent(1)
            .with_bounds(bounds)
            .with_buffer(100, 100)
    }

    fn root() -> Layer {
        Layer::new(1, "root")
            .with_kind(LayerKind::Container)
            .with_bounds(SCREEN)
    }

    fn build(layers: Vec<Layer>) -> (LayerTree, OcclusionResult) {
        let tree = LayerTree::build(layers).unwrap();
        let result = OcclusionResult::compute(&tree);
        (tree, result)
    }

    fn at(tree: &LayerTree, id: i32) -> LayerIndex {
        tree.index_of(LayerId(id)).unwrap()
    }

    #[test]
    fn opaque_front_layer_occludes_contained_back_layer() {
        let (tree, result) = build(vec![
            root(),
            surface(2, "back", Rect::new(10.0, 10.0, 50.0, 50.0)).with_z(0),
            surface(3, "front", SCREEN).with_z(1).opaque(),
        ]);
        let back = at(&tree, 2);
        let front = at(&tree, 3);
        assert_eq!(result.occlusion(back).occluded_by, [front]);
        assert!(result.occlusion(back).partially_occluded_by.is_empty());
        assert_eq!(
            result.visibility(back).reason().map(ToString::to_string).as_deref(),
            Some("Layer is occluded by: 3")
        );
        assert!(result.is_visible(front));
    }

    #[test]
    fn rounded_corners_only_partially_occlude() {
        let (tree, result) = build(vec![
            root(),
            surface(2, "back", Rect::new(10.0, 10.0, 50.0, 50.0)).with_z(0),
            surface(3, "front", SCREEN)
                .with_z(1)
                .opaque()
                .with_corner_radius(8.0),
        ]);
        let back = at(&tree, 2);
        let front = at(&tree, 3);
        assert!(result.occlusion(back).occluded_by.is_empty());
        assert_eq!(result.occlusion(back).partially_occluded_by, [front]);
        assert!(result.is_visible(back));
    }

    #[test]
    fn translucent_front_layer_only_covers() {
        let (tree, result) = build(vec![
            root(),
            surface(2, "back", SCREEN).with_z(0),
            surface(3, "scrim", SCREEN)
                .with_z(1)
                .opaque()
                .with_color(Color::rgba(0.0, 0.0, 0.0, 0.5)),
        ]);
        let back = at(&tree, 2);
        assert_eq!(result.occlusion(back).covered_by, [at(&tree, 3)]);
        assert!(result.is_visible(back));
    }

    #[test]
    fn hidden_layers_do_not_occlude() {
        let (tree, result) = build(vec![
            root(),
            surface(2, "back", Rect::new(10.0, 10.0, 50.0, 50.0)).with_z(0),
            surface(3, "front", SCREEN).with_z(1).opaque().hidden(),
        ]);
        let back = at(&tree, 2);
        assert!(result.is_visible(back));
        assert_eq!(
            result.visibility(at(&tree, 3)),
            &Visibility::Invisible(InvisibleReason::HiddenByPolicy)
        );
    }

    #[test]
    fn ancestor_hidden_wins_over_everything() {
        let (tree, result) = build(vec![
            root(),
            surface(2, "parent", SCREEN).hidden(),
            Layer::new(3, "child")
                .with_parent(2)
                .hidden()
                .with_color(Color::TRANSPARENT),
        ]);
        assert_eq!(
            result.visibility(at(&tree, 3)).reason().map(ToString::to_string).as_deref(),
            Some("Hidden by parent parent")
        );
    }

    #[test]
    fn reason_priority_below_hidden() {
        let (tree, result) = build(vec![
            root(),
            Layer::new(2, "no-buffer").with_parent(1).with_bounds(SCREEN),
            surface(3, "clear", SCREEN).with_color(Color::TRANSPARENT),
            surface(4, "empty-region", SCREEN).with_visible_region(Region::new()),
            surface(5, "zero-bounds", Rect::ZERO),
        ]);
        let reason = |id| result.visibility(at(&tree, id)).reason().cloned();
        assert_eq!(reason(2), Some(InvisibleReason::EmptyBuffer));
        assert_eq!(reason(3), Some(InvisibleReason::ZeroAlpha));
        assert_eq!(reason(4), Some(InvisibleReason::EmptyRegion));
        assert_eq!(reason(5), Some(InvisibleReason::EmptyRegion));
    }

    #[test]
    fn geometry_reasons() {
        let (tree, result) = build(vec![
            root(),
            surface(2, "cropped", SCREEN).with_crop(Rect::new(5.0, 5.0, 5.0, 50.0)),
            surface(3, "offscreen", SCREEN).with_screen_bounds(Rect::new(0.0, 0.0, 0.0, 0.0)),
            surface(4, "blur", SCREEN)
                .with_kind(LayerKind::Effect)
                .with_color(Color::rgba(0.0, 0.0, 0.0, 0.0))
                .with_buffer(0, 0)
                .with_blur_radius(20.0),
        ]);
        let reason = |id| result.visibility(at(&tree, id)).reason().cloned();
        assert_eq!(reason(2), Some(InvisibleReason::EmptyCrop));
        assert_eq!(reason(3), Some(InvisibleReason::EmptyRegion));
        // Blur keeps an effect layer drawing; its alpha still hides it.
        assert_eq!(reason(4), Some(InvisibleReason::ZeroAlpha));
    }

    #[test]
    fn color_layers_draw_without_buffer() {
        let (tree, result) = build(vec![
            root(),
            Layer::new(2, "dim")
                .with_parent(1)
                .with_kind(LayerKind::Color)
                .with_bounds(SCREEN),
        ]);
        assert!(result.is_visible(at(&tree, 2)));
        assert_eq!(
            result.visibility(at(&tree, 1)),
            &Visibility::Invisible(InvisibleReason::EmptyBuffer)
        );
    }

    #[test]
    fn rotated_front_layer_never_occludes() {
        let (tree, result) = build(vec![
            root(),
            surface(2, "back", Rect::new(40.0, 40.0, 60.0, 60.0)).with_z(0),
            surface(3, "tilted", SCREEN)
                .with_z(1)
                .opaque()
                .with_transform(Transform3d::from_rotation_z(0.1)),
        ]);
        let back = at(&tree, 2);
        assert!(result.is_visible(back));
        assert_eq!(result.occlusion(back).partially_occluded_by, [at(&tree, 3)]);
    }

    #[test]
    fn collapsed_layer_is_never_occluded() {
        let (tree, result) = build(vec![
            root(),
            surface(2, "collapsed", SCREEN)
                .with_z(0)
                .with_transform(Transform3d::from_affine([0.0, 0.0, 0.0, 0.0, 800.0, 800.0])),
            surface(3, "corner", Rect::new(0.0, 0.0, 10.0, 10.0))
                .with_z(1)
                .opaque(),
        ]);
        let collapsed = at(&tree, 2);
        assert_eq!(result.occlusion(collapsed), &Occlusion::default());
        assert_eq!(
            result.visibility(collapsed),
            &Visibility::Invisible(InvisibleReason::InvalidTransform)
        );
        assert!(result.is_visible(at(&tree, 3)));
    }

    #[test]
    fn hidden_grandparent_names_the_direct_parent() {
        let (tree, result) = build(vec![
            root(),
            surface(2, "task", SCREEN).hidden(),
            Layer::new(3, "activity")
                .with_parent(2)
                .with_kind(LayerKind::Container),
            Layer::new(4, "window")
                .with_parent(3)
                .with_bounds(SCREEN)
                .with_buffer(10, 10),
        ]);
        assert_eq!(
            result.visibility(at(&tree, 4)),
            &Visibility::Invisible(InvisibleReason::HiddenByParent {
                parent: LayerId(3),
                name: "activity".into(),
            })
        );
    }

    #[test]
    fn occluded_layers_still_occlude_what_is_behind_them() {
        let (tree, result) = build(vec![
            root(),
            surface(2, "bottom", Rect::new(20.0, 20.0, 30.0, 30.0)).with_z(0),
            surface(3, "middle", Rect::new(10.0, 10.0, 60.0, 60.0)).with_z(1).opaque(),
            surface(4, "top", SCREEN).with_z(2).opaque(),
        ]);
        assert_eq!(
            result.occlusion(at(&tree, 2)).occluded_by,
            [at(&tree, 4), at(&tree, 3)]
        );
        assert_eq!(result.occluded_count(), 2);
        assert_eq!(result.visible_count(), 1);
    }

    #[test]
    fn compute_is_deterministic() {
        let (tree, first) = build(vec![
            root(),
            surface(2, "a", Rect::new(0.0, 0.0, 60.0, 60.0)).with_z(0).opaque(),
            surface(3, "b", Rect::new(40.0, 40.0, 100.0, 100.0)).with_z(1).opaque(),
            surface(4, "c", SCREEN)
                .with_z(2)
                .with_color(Color::rgba(1.0, 1.0, 1.0, 0.2)),
        ]);
        let second = OcclusionResult::compute(&tree);
        assert_eq!(first, second);
        assert_eq!(first.partially_occluded_count(), 1);
    }
}
