// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-layer captured properties and the predicates derived from them.

use alloc::string::String;
use core::fmt;

use kurbo::Rect;

use super::id::{LayerId, OFFSCREEN_ROOT_ID};
use crate::region::{Region, rect_is_empty};
use crate::transform::Transform3d;

/// What a layer draws.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LayerKind {
    /// Presents a client buffer.
    #[default]
    Buffer,
    /// Fills its bounds with a solid color.
    Color,
    /// Draws a color fill, shadow or blur without a buffer.
    Effect,
    /// Groups children and draws nothing itself.
    Container,
}

impl LayerKind {
    /// Short name used in diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buffer => "BufferLayer",
            Self::Color => "ColorLayer",
            Self::Effect => "EffectLayer",
            Self::Container => "ContainerLayer",
        }
    }
}

/// Per-layer boolean flags.
///
/// Setting [`hidden`](Self::hidden) suppresses all visual contribution of the
/// layer and its entire subtree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct LayerFlags {
    /// Whether the layer (and its subtree) is hidden.
    pub hidden: bool,
}

/// Straight-alpha RGBA color with components in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red.
    pub r: f32,
    /// Green.
    pub g: f32,
    /// Blue.
    pub b: f32,
    /// Alpha.
    pub a: f32,
}

impl Color {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);
    /// Opaque black.
    pub const BLACK: Self = Self::rgba(0.0, 0.0, 0.0, 1.0);

    /// Creates a color from its components.
    #[inline]
    #[must_use]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Whether the color contributes nothing (alpha is zero or less).
    #[inline]
    #[must_use]
    pub fn is_empty(self) -> bool {
        !(self.a > 0.0)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Dimensions of the buffer a layer is presenting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct BufferSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl BufferSize {
    /// No buffer.
    pub const EMPTY: Self = Self::new(0, 0);

    /// Creates a buffer size.
    #[inline]
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Whether either dimension is zero.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl fmt::Display for BufferSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// One layer as captured in a snapshot.
///
/// All fields are public so producers can fill them directly; the `with_*`
/// methods are shorthands for tests and hand-built traces.
#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    /// Identity, unique within the snapshot.
    pub id: LayerId,
    /// Parent reference. Unresolvable parents make the layer a root.
    pub parent_id: Option<LayerId>,
    /// Human-readable name; checks select layers by substring.
    pub name: String,
    /// Order among siblings (ascending is back to front).
    pub z: i32,
    /// Local bounds.
    pub bounds: Rect,
    /// Screen-space bounds, when the producer computed them.
    pub screen_bounds: Option<Rect>,
    /// Visible region computed by the compositor, when available.
    pub visible_region: Option<Region>,
    /// Fill color; its alpha is the layer's effective alpha.
    pub color: Color,
    /// Opaque hint from the producer. Only honored when alpha is 1.
    pub is_opaque: bool,
    /// Corner radius of the layer's clip.
    pub corner_radius: f64,
    /// Shadow radius.
    pub shadow_radius: f64,
    /// Background blur radius.
    pub background_blur_radius: f64,
    /// What the layer draws.
    pub kind: LayerKind,
    /// Policy flags.
    pub flags: LayerFlags,
    /// Size of the buffer being presented.
    pub active_buffer: BufferSize,
    /// Scaling mode the compositor applied to the buffer, as captured.
    pub scaling_mode: i32,
    /// Buffer transform type bits; bits 8..16 hold the orientation.
    pub buffer_transform: u32,
    /// Layer-to-screen transform.
    pub transform: Transform3d,
    /// Crop rectangle, if any.
    pub crop: Option<Rect>,
    /// Frame number of the presented buffer.
    pub current_frame: u64,
}

impl Layer {
    /// Creates a visible-by-default buffer layer with no geometry.
    #[must_use]
    pub fn new(id: i32, name: impl Into<String>) -> Self {
        Self {
            id: LayerId(id),
            parent_id: None,
            name: name.into(),
            z: 0,
            bounds: Rect::ZERO,
            screen_bounds: None,
            visible_region: None,
            color: Color::BLACK,
            is_opaque: false,
            corner_radius: 0.0,
            shadow_radius: 0.0,
            background_blur_radius: 0.0,
            kind: LayerKind::Buffer,
            flags: LayerFlags::default(),
            active_buffer: BufferSize::EMPTY,
            scaling_mode: 0,
            buffer_transform: 0,
            transform: Transform3d::IDENTITY,
            crop: None,
            current_frame: 0,
        }
    }

    /// Sets the parent reference.
    #[must_use]
    pub fn with_parent(mut self, parent: i32) -> Self {
        self.parent_id = Some(LayerId(parent));
        self
    }

    /// Sets the sibling order key.
    #[must_use]
    pub fn with_z(mut self, z: i32) -> Self {
        self.z = z;
        self
    }

    /// Sets local bounds.
    #[must_use]
    pub fn with_bounds(mut self, bounds: Rect) -> Self {
        self.bounds = bounds;
        self
    }

    /// Sets explicit screen bounds.
    #[must_use]
    pub fn with_screen_bounds(mut self, bounds: Rect) -> Self {
        self.screen_bounds = Some(bounds);
        self
    }

    /// Sets the compositor-computed visible region.
    #[must_use]
    pub fn with_visible_region(mut self, region: Region) -> Self {
        self.visible_region = Some(region);
        self
    }

    /// Sets the fill color.
    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Marks the layer as opaque.
    #[must_use]
    pub fn opaque(mut self) -> Self {
        self.is_opaque = true;
        self
    }

    /// Sets the corner radius.
    #[must_use]
    pub fn with_corner_radius(mut self, radius: f64) -> Self {
        self.corner_radius = radius;
        self
    }

    /// Sets the shadow radius.
    #[must_use]
    pub fn with_shadow_radius(mut self, radius: f64) -> Self {
        self.shadow_radius = radius;
        self
    }

    /// Sets the background blur radius.
    #[must_use]
    pub fn with_blur_radius(mut self, radius: f64) -> Self {
        self.background_blur_radius = radius;
        self
    }

    /// Sets the layer kind.
    #[must_use]
    pub fn with_kind(mut self, kind: LayerKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the hidden flag.
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.flags.hidden = true;
        self
    }

    /// Sets the active buffer size.
    #[must_use]
    pub fn with_buffer(mut self, width: u32, height: u32) -> Self {
        self.active_buffer = BufferSize::new(width, height);
        self
    }

    /// Sets the buffer scaling mode.
    #[must_use]
    pub fn with_scaling_mode(mut self, mode: i32) -> Self {
        self.scaling_mode = mode;
        self
    }

    /// Sets the buffer transform type bits.
    #[must_use]
    pub fn with_buffer_transform(mut self, bits: u32) -> Self {
        self.buffer_transform = bits;
        self
    }

    /// Sets the transform.
    #[must_use]
    pub fn with_transform(mut self, transform: Transform3d) -> Self {
        self.transform = transform;
        self
    }

    /// Sets the crop rectangle.
    #[must_use]
    pub fn with_crop(mut self, crop: Rect) -> Self {
        self.crop = Some(crop);
        self
    }

    /// Sets the presented frame number.
    #[must_use]
    pub fn with_frame(mut self, frame: u64) -> Self {
        self.current_frame = frame;
        self
    }

    // -- Derived predicates --

    /// Hidden by its own flags, or the offscreen root.
    #[must_use]
    pub fn is_hidden_by_policy(&self) -> bool {
        self.flags.hidden || self.id == OFFSCREEN_ROOT_ID
    }

    /// Whether the fill color has any alpha.
    #[must_use]
    pub fn fills_color(&self) -> bool {
        !self.color.is_empty()
    }

    /// Whether the layer casts a shadow.
    #[must_use]
    pub fn draws_shadows(&self) -> bool {
        self.shadow_radius > 0.0
    }

    /// Whether the layer blurs what is behind it.
    #[must_use]
    pub fn has_blur(&self) -> bool {
        self.background_blur_radius > 0.0
    }

    /// Whether the layer's clip has rounded corners.
    #[must_use]
    pub fn has_rounded_corners(&self) -> bool {
        self.corner_radius > 0.0
    }

    /// Whether the layer draws something without a buffer: any color layer,
    /// or an effect layer that fills color, casts a shadow or blurs.
    #[must_use]
    pub fn has_effects(&self) -> bool {
        match self.kind {
            LayerKind::Color => true,
            LayerKind::Effect => self.fills_color() || self.draws_shadows() || self.has_blur(),
            LayerKind::Buffer | LayerKind::Container => false,
        }
    }

    /// Orientation of the presented buffer, from its transform bits.
    #[must_use]
    pub fn buffer_orientation(&self) -> u32 {
        (self.buffer_transform >> 8) & 0xFF
    }

    /// Whether a crop is set and encloses no area.
    #[must_use]
    pub fn has_empty_crop(&self) -> bool {
        self.crop.is_some_and(rect_is_empty)
    }

    /// Whether the active buffer has no area.
    #[must_use]
    pub fn is_buffer_empty(&self) -> bool {
        self.active_buffer.is_empty()
    }

    /// Opaque only when the producer says so *and* alpha is exactly 1.
    #[must_use]
    pub fn is_opaque(&self) -> bool {
        self.is_opaque && self.color.a == 1.0
    }

    /// The region used for emptiness tests: the compositor's visible region
    /// when present, else local bounds.
    #[must_use]
    pub fn effective_region(&self) -> Region {
        match &self.visible_region {
            Some(region) => region.clone(),
            None => Region::from_rect(self.bounds),
        }
    }

    /// Screen-space bounds: the non-empty visible region's bounds, else the
    /// explicit screen bounds, else local bounds mapped through the
    /// transform.
    #[must_use]
    pub fn screen_bounds(&self) -> Rect {
        if let Some(region) = &self.visible_region {
            if !region.is_empty() {
                return region.bounds();
            }
        }
        if let Some(bounds) = self.screen_bounds {
            return bounds;
        }
        self.transform.apply_to_rect(self.bounds)
    }

    /// Whether this layer's screen bounds fully contain `inner`'s.
    ///
    /// Always false when either transform is not a simple rotation, since
    /// bounding boxes of rotated rectangles over-approximate.
    #[must_use]
    pub fn contains(&self, inner: &Self) -> bool {
        if !self.transform.is_simple_rotation() || !inner.transform.is_simple_rotation() {
            return false;
        }
        crate::region::rect_contains(self.screen_bounds(), inner.screen_bounds())
    }

    /// Whether the screen bounds of the two layers intersect.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        crate::region::rect_intersection(self.screen_bounds(), other.screen_bounds()).is_some()
    }

    /// Whether local bounds have no area.
    #[must_use]
    pub fn has_empty_bounds(&self) -> bool {
        rect_is_empty(self.bounds)
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.name, self.id)?;
        if !self.active_buffer.is_empty() {
            write!(f, " buffer:{} frame#{}", self.active_buffer, self.current_frame)?;
        }
        Ok(())
    }
}
