// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Checks over a single layer of one snapshot.

use alloc::vec::Vec;

use strata_core::layer::{BufferSize, Layer};
use strata_core::region::Region;
use strata_core::snapshot::LayerView;

use crate::fact::Fact;
use crate::failure::CheckFailure;
use crate::region::RegionCheck;

/// A layer looked up by name, which may or may not have been found.
///
/// Every check other than [`does_not_exist`](Self::does_not_exist) first
/// requires the layer to exist.
#[derive(Clone, Copy, Debug)]
pub struct LayerCheck<'a> {
    name: &'a str,
    view: Option<LayerView<'a>>,
}

impl<'a> LayerCheck<'a> {
    /// Wraps the result of a lookup for `name`.
    #[must_use]
    pub fn new(name: &'a str, view: Option<LayerView<'a>>) -> Self {
        Self { name, view }
    }

    /// The layer, if it was found.
    #[must_use]
    pub fn view(&self) -> Option<LayerView<'a>> {
        self.view
    }

    /// Passes if the layer was found.
    ///
    /// # Errors
    ///
    /// Reports `Could not find` with the searched name.
    pub fn exists(&self) -> Result<&Self, CheckFailure> {
        self.found()?;
        Ok(self)
    }

    /// Passes if the layer was not found.
    ///
    /// # Errors
    ///
    /// Reports `Could find` with the layer that matched.
    pub fn does_not_exist(&self) -> Result<&Self, CheckFailure> {
        match self.view {
            None => Ok(self),
            Some(view) => Err(CheckFailure::new(Fact::new("Could find", view.layer()))),
        }
    }

    /// Passes if the layer's active buffer is exactly `size`.
    ///
    /// # Errors
    ///
    /// Reports the expected and actual buffer sizes.
    pub fn has_buffer_size(&self, size: BufferSize) -> Result<&Self, CheckFailure> {
        let layer = self.found()?;
        if layer.active_buffer == size {
            Ok(self)
        } else {
            Err(self.mismatch("Incorrect buffer size", size, layer.active_buffer))
        }
    }

    /// Passes if the layer's screen bounds measure `width` by `height`.
    ///
    /// # Errors
    ///
    /// Reports the expected and actual sizes.
    pub fn has_layer_size(&self, width: f64, height: f64) -> Result<&Self, CheckFailure> {
        let layer = self.found()?;
        let actual = layer.screen_bounds().size();
        if actual.width == width && actual.height == height {
            Ok(self)
        } else {
            Err(self.mismatch(
                "Incorrect layer size",
                alloc::format!("{width}x{height}"),
                alloc::format!("{}x{}", actual.width, actual.height),
            ))
        }
    }

    /// Passes if the compositor scaled the buffer with `mode`.
    ///
    /// # Errors
    ///
    /// Reports the expected and actual scaling modes.
    pub fn has_scaling_mode(&self, mode: i32) -> Result<&Self, CheckFailure> {
        let layer = self.found()?;
        if layer.scaling_mode == mode {
            Ok(self)
        } else {
            Err(self.mismatch("Incorrect scaling mode", mode, layer.scaling_mode))
        }
    }

    /// Passes if the presented buffer has `orientation`.
    ///
    /// # Errors
    ///
    /// Reports the expected and actual orientations.
    pub fn has_buffer_orientation(&self, orientation: u32) -> Result<&Self, CheckFailure> {
        let layer = self.found()?;
        let actual = layer.buffer_orientation();
        if actual == orientation {
            Ok(self)
        } else {
            Err(self.mismatch("Incorrect buffer orientation", orientation, actual))
        }
    }

    /// Passes if the layer is visible.
    ///
    /// # Errors
    ///
    /// Reports the visibility reason.
    pub fn is_visible(&self) -> Result<&Self, CheckFailure> {
        let view = self.found_view()?;
        match view.visibility().reason() {
            None => Ok(self),
            Some(reason) => Err(CheckFailure::from_facts(alloc::vec![
                Fact::new("Layer", view.layer()),
                Fact::new("Is Invisible", reason),
            ])),
        }
    }

    /// Passes if the layer is invisible.
    ///
    /// # Errors
    ///
    /// Reports `Layer is visible`.
    pub fn is_invisible(&self) -> Result<&Self, CheckFailure> {
        let view = self.found_view()?;
        if view.is_visible() {
            Err(CheckFailure::new(Fact::new("Layer is visible", view.layer())))
        } else {
            Ok(self)
        }
    }

    /// The compositor-computed visible region, empty when absent.
    ///
    /// # Errors
    ///
    /// Fails if the layer was not found.
    pub fn visible_region(&self) -> Result<RegionCheck, CheckFailure> {
        let layer = self.found()?;
        let region = layer.visible_region.clone().unwrap_or_default();
        Ok(RegionCheck::with_context(region, self.context(layer)))
    }

    /// The layer's screen bounds as a region.
    ///
    /// # Errors
    ///
    /// Fails if the layer was not found.
    pub fn screen_bounds(&self) -> Result<RegionCheck, CheckFailure> {
        let layer = self.found()?;
        Ok(RegionCheck::with_context(
            Region::from_rect(layer.screen_bounds()),
            self.context(layer),
        ))
    }

    fn found_view(&self) -> Result<LayerView<'a>, CheckFailure> {
        self.view
            .ok_or_else(|| CheckFailure::new(Fact::new("Could not find", self.name)))
    }

    fn found(&self) -> Result<&'a Layer, CheckFailure> {
        self.found_view().map(|view| view.layer())
    }

    fn context(&self, layer: &Layer) -> Vec<Fact> {
        alloc::vec![
            Fact::new("Layer", layer),
            Fact::new("Frame", layer.current_frame),
        ]
    }

    fn mismatch(
        &self,
        label: &str,
        expected: impl core::fmt::Display,
        actual: impl core::fmt::Display,
    ) -> CheckFailure {
        CheckFailure::from_facts(alloc::vec![
            Fact::label(label),
            Fact::new("Layer", self.name),
            Fact::new("Expected", expected),
            Fact::new("Actual", actual),
        ])
    }
}
