// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Timestamped snapshots and the sequences they form.
//!
//! A [`Snapshot`] owns one [`LayerTree`] plus its [`OcclusionResult`], both
//! computed once at ingestion. Everything after that is read-only, so
//! snapshots can be shared freely between checks.

use alloc::vec::Vec;

use crate::error::BuildError;
use crate::layer::{
    Layer, LayerId, LayerIndex, LayerTree, Occlusion, OcclusionResult, Visibility,
};
use crate::region::Region;
use crate::trace::{OcclusionEvent, Tracer, TreeBuiltEvent};

/// Anything that sits at a point in a trace.
pub trait TraceEntry {
    /// Capture time of the entry, in the producer's clock.
    fn timestamp(&self) -> i64;
}

/// Whether `name` contains any of `fragments`.
///
/// No fragments match nothing.
#[must_use]
pub fn matches_any(name: &str, fragments: &[&str]) -> bool {
    fragments.iter().any(|f| name.contains(f))
}

/// One captured scene with its occlusion already resolved.
#[derive(Clone, Debug)]
pub struct Snapshot {
    timestamp: i64,
    tree: LayerTree,
    occlusion: OcclusionResult,
}

impl Snapshot {
    /// Builds a snapshot from a flat layer list.
    ///
    /// # Errors
    ///
    /// Returns a [`BuildError`] if the layers do not form a forest with
    /// unique ids.
    pub fn new(timestamp: i64, layers: Vec<Layer>) -> Result<Self, BuildError> {
        Self::build(timestamp, layers, &mut Tracer::none())
    }

    /// Like [`new`](Self::new), reporting progress to `tracer`.
    ///
    /// # Errors
    ///
    /// Returns a [`BuildError`] if the layers do not form a forest with
    /// unique ids.
    pub fn build(
        timestamp: i64,
        layers: Vec<Layer>,
        tracer: &mut Tracer<'_>,
    ) -> Result<Self, BuildError> {
        let tree = LayerTree::build(layers)?;
        tracer.tree_built(&TreeBuiltEvent {
            timestamp,
            layer_count: tree.len(),
            root_count: tree.roots().len(),
        });

        let occlusion = OcclusionResult::compute(&tree);
        tracer.occlusion(&OcclusionEvent {
            timestamp,
            visible: occlusion.visible_count(),
            occluded: occlusion.occluded_count(),
            partially_occluded: occlusion.partially_occluded_count(),
        });

        let snapshot = Self {
            timestamp,
            tree,
            occlusion,
        };
        #[cfg(feature = "trace-rich")]
        if tracer.wants_layer_visibility() {
            let events: Vec<_> = snapshot
                .layers()
                .map(|view| crate::trace::LayerVisibilityEvent {
                    layer: view.layer().id,
                    visible: view.is_visible(),
                    occluded_by: view.occlusion().occluded_by.len(),
                    covered_by: view.occlusion().covered_by.len(),
                })
                .collect();
            tracer.layer_visibility(timestamp, &events);
        }
        Ok(snapshot)
    }

    /// Capture time.
    #[must_use]
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// The linked layer tree.
    #[must_use]
    pub fn tree(&self) -> &LayerTree {
        &self.tree
    }

    /// Number of layers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Whether the snapshot has no layers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// All layers in flattened order (roots first, breadth-first).
    pub fn layers(&self) -> impl ExactSizeIterator<Item = LayerView<'_>> + '_ {
        self.tree.flattened().map(|idx| self.view(idx))
    }

    /// Visible layers in flattened order.
    pub fn visible_layers(&self) -> impl Iterator<Item = LayerView<'_>> + '_ {
        self.layers().filter(LayerView::is_visible)
    }

    /// Layers whose name contains any of `names`, in flattened order.
    pub fn find<'a>(&'a self, names: &'a [&str]) -> impl Iterator<Item = LayerView<'a>> + 'a {
        self.layers()
            .filter(move |view| matches_any(&view.layer().name, names))
    }

    /// Looks up a layer by id.
    #[must_use]
    pub fn layer(&self, id: LayerId) -> Option<LayerView<'_>> {
        self.tree.index_of(id).map(|idx| self.view(idx))
    }

    /// Whether the layer with `id` exists and is visible.
    #[must_use]
    pub fn is_visible(&self, id: LayerId) -> bool {
        self.layer(id).is_some_and(|view| view.is_visible())
    }

    /// Visibility of the layer with `id`.
    #[must_use]
    pub fn visibility(&self, id: LayerId) -> Option<&Visibility> {
        self.tree.index_of(id).map(|idx| self.occlusion.visibility(idx))
    }

    /// Occlusion sets of the layer with `id`.
    #[must_use]
    pub fn occlusion(&self, id: LayerId) -> Option<&Occlusion> {
        self.tree.index_of(id).map(|idx| self.occlusion.occlusion(idx))
    }

    /// The whole occlusion result.
    #[must_use]
    pub fn occlusion_result(&self) -> &OcclusionResult {
        &self.occlusion
    }

    /// First layer whose name contains `name` and that has a buffer.
    #[must_use]
    pub fn layer_with_buffer(&self, name: &str) -> Option<LayerView<'_>> {
        self.layers()
            .find(|view| view.layer().name.contains(name) && !view.layer().is_buffer_empty())
    }

    /// Whether any visible layer is named exactly `name`.
    #[must_use]
    pub fn has_visible_named(&self, name: &str) -> bool {
        self.visible_layers().any(|view| view.layer().name == name)
    }

    /// Union of the visible areas of visible layers matching `names`.
    ///
    /// With `composition_only`, only compositor-computed visible regions
    /// count; otherwise each layer contributes its screen bounds.
    #[must_use]
    pub fn visible_region(&self, names: &[&str], composition_only: bool) -> Region {
        let mut region = Region::new();
        for view in self.find(names).filter(LayerView::is_visible) {
            let layer = view.layer();
            if composition_only {
                if let Some(visible) = &layer.visible_region {
                    region = region.union(visible);
                }
            } else {
                region.add_rect(layer.screen_bounds());
            }
        }
        region
    }

    fn view(&self, idx: LayerIndex) -> LayerView<'_> {
        LayerView {
            snapshot: self,
            idx,
        }
    }
}

impl TraceEntry for Snapshot {
    fn timestamp(&self) -> i64 {
        self.timestamp
    }
}

/// A layer together with the snapshot it was resolved in.
#[derive(Clone, Copy, Debug)]
pub struct LayerView<'a> {
    snapshot: &'a Snapshot,
    idx: LayerIndex,
}

impl<'a> LayerView<'a> {
    /// Arena index of the layer.
    #[must_use]
    pub fn index(&self) -> LayerIndex {
        self.idx
    }

    /// The captured layer.
    #[must_use]
    pub fn layer(&self) -> &'a Layer {
        self.snapshot.tree.layer(self.idx)
    }

    /// The owning snapshot.
    #[must_use]
    pub fn snapshot(&self) -> &'a Snapshot {
        self.snapshot
    }

    /// Final visibility.
    #[must_use]
    pub fn visibility(&self) -> &'a Visibility {
        self.snapshot.occlusion.visibility(self.idx)
    }

    /// Whether the layer is visible.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visibility().is_visible()
    }

    /// Which layers in front cover this one.
    #[must_use]
    pub fn occlusion(&self) -> &'a Occlusion {
        self.snapshot.occlusion.occlusion(self.idx)
    }

    /// Whether an ancestor is hidden by policy.
    #[must_use]
    pub fn is_hidden_by_parent(&self) -> bool {
        self.snapshot.tree.is_hidden_by_parent(self.idx)
    }

    /// The parent layer, if any.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.snapshot.tree.parent(self.idx).map(|idx| Self {
            snapshot: self.snapshot,
            idx,
        })
    }
}

/// An ordered, immutable list of snapshots.
#[derive(Clone, Debug, Default)]
pub struct SnapshotSequence {
    entries: Vec<Snapshot>,
}

impl SnapshotSequence {
    /// Wraps already-built snapshots, ordering them by timestamp.
    ///
    /// Snapshots with equal timestamps keep their relative order.
    #[must_use]
    pub fn from_entries(mut entries: Vec<Snapshot>) -> Self {
        entries.sort_by_key(Snapshot::timestamp);
        Self { entries }
    }

    /// Builds every snapshot from `(timestamp, layers)` pairs.
    ///
    /// # Errors
    ///
    /// Returns the first [`BuildError`] encountered.
    pub fn build(
        frames: impl IntoIterator<Item = (i64, Vec<Layer>)>,
        tracer: &mut Tracer<'_>,
    ) -> Result<Self, BuildError> {
        let entries = frames
            .into_iter()
            .map(|(timestamp, layers)| Snapshot::build(timestamp, layers, tracer))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_entries(entries))
    }

    /// All snapshots in order.
    #[must_use]
    pub fn entries(&self) -> &[Snapshot] {
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
    pub fn entry_at(&self, timestamp: i64) -> Option<&Snapshot> {
        let start = self.entries.partition_point(|e| e.timestamp < timestamp);
        self.entries.get(start).filter(|e| e.timestamp == timestamp)
    }

    /// Snapshots with `start <= timestamp <= end`.
    #[must_use]
    pub fn range(&self, start: i64, end: i64) -> &[Snapshot] {
        let lo = self.entries.partition_point(|e| e.timestamp < start);
        let hi = self.entries.partition_point(|e| e.timestamp <= end);
        self.entries.get(lo..hi.max(lo)).unwrap_or_default()
    }

    /// The earliest snapshot.
    #[must_use]
    pub fn first(&self) -> Option<&Snapshot> {
        self.entries.first()
    }

    /// The latest snapshot.
    #[must_use]
    pub fn last(&self) -> Option<&Snapshot> {
        self.entries.last()
    }

    /// Iterates over snapshots in order.
    pub fn iter(&self) -> core::slice::Iter<'_, Snapshot> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a SnapshotSequence {
    type Item = &'a Snapshot;
    type IntoIter = core::slice::Iter<'a, Snapshot>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use kurbo::Rect;

    use super::*;
    use crate::layer::LayerKind;

    const SCREEN: Rect = Rect::new(0.0, 0.0, 100.0, 200.0);

    fn scene() -> Vec<Layer> {
        vec![
            Layer::new(1, "Display Root")
                .with_kind(LayerKind::Container)
                .with_bounds(SCREEN),
            Layer::new(2, "com.example/MainActivity#0")
                .with_parent(1)
                .with_bounds(SCREEN)
                .with_buffer(100, 200)
                .with_visible_region(Region::from_rect(Rect::new(0.0, 20.0, 100.0, 200.0)))
                .with_frame(7),
            Layer::new(3, "StatusBar#0")
                .with_parent(1)
                .with_z(1)
                .with_bounds(Rect::new(0.0, 0.0, 100.0, 20.0))
                .with_buffer(100, 20)
                .opaque(),
        ]
    }

    #[test]
    fn queries_by_id_and_name() {
        let snapshot = Snapshot::new(10, scene()).unwrap();
        assert_eq!(snapshot.len(), 3);
        assert!(snapshot.is_visible(LayerId(2)));
        assert!(!snapshot.is_visible(LayerId(1)));
        assert!(!snapshot.is_visible(LayerId(42)));
        assert_eq!(snapshot.find(&["StatusBar", "Nope"]).count(), 1);
        assert_eq!(snapshot.find(&[]).count(), 0);
        assert_eq!(snapshot.visible_layers().count(), 2);
        assert!(snapshot.has_visible_named("StatusBar#0"));
        assert!(!snapshot.has_visible_named("StatusBar"));
        let with_buffer = snapshot.layer_with_buffer("MainActivity").unwrap();
        assert_eq!(with_buffer.layer().current_frame, 7);
        assert_eq!(snapshot.layer(LayerId(3)).unwrap().parent().unwrap().layer().id, LayerId(1));
    }

    #[test]
    fn visible_region_modes() {
        let snapshot = Snapshot::new(10, scene()).unwrap();
        let composed = snapshot.visible_region(&["MainActivity", "StatusBar"], true);
        assert!(composed.same_area_as(&Region::from_rect(Rect::new(0.0, 20.0, 100.0, 200.0))));
        let bounds = snapshot.visible_region(&["MainActivity", "StatusBar"], false);
        assert!(bounds.same_area_as(&Region::from_rect(SCREEN)));
    }

    #[test]
    fn sequence_orders_and_slices_by_timestamp() {
        let seq = SnapshotSequence::from_entries(vec![
            Snapshot::new(30, scene()).unwrap(),
            Snapshot::new(10, scene()).unwrap(),
            Snapshot::new(20, scene()).unwrap(),
        ]);
        let stamps: Vec<i64> = seq.iter().map(Snapshot::timestamp).collect();
        assert_eq!(stamps, [10, 20, 30]);
        assert_eq!(seq.entry_at(20).map(Snapshot::timestamp), Some(20));
        assert!(seq.entry_at(25).is_none());
        assert_eq!(seq.range(15, 30).len(), 2);
        assert_eq!(seq.range(10, 10).len(), 1);
        assert!(seq.range(31, 40).is_empty());
        assert!(seq.range(30, 10).is_empty());
        assert_eq!(seq.first().map(Snapshot::timestamp), Some(10));
        assert_eq!(seq.last().map(Snapshot::timestamp), Some(30));
    }

    #[test]
    fn build_propagates_structural_errors() {
        let err = SnapshotSequence::build(
            [(0, scene()), (1, vec![Layer::new(1, "a"), Layer::new(1, "b")])],
            &mut Tracer::none(),
        )
        .unwrap_err();
        assert_eq!(err, BuildError::DuplicateLayerId { id: LayerId(1) });
    }

    #[cfg(feature = "trace")]
    #[test]
    fn build_reports_to_sink() {
        use crate::trace::TraceSink;

        #[derive(Default)]
        struct Counts {
            trees: usize,
            visible: usize,
        }
        impl TraceSink for Counts {
            fn on_tree_built(&mut self, _: &TreeBuiltEvent) {
                self.trees += 1;
            }
            fn on_occlusion(&mut self, e: &OcclusionEvent) {
                self.visible += e.visible;
            }
        }

        let mut sink = Counts::default();
        SnapshotSequence::build([(0, scene()), (1, scene())], &mut Tracer::new(&mut sink)).unwrap();
        assert_eq!(sink.trees, 2);
        assert_eq!(sink.visible, 4);
    }
}
