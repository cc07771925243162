// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rectangle-set regions and coverage tests.
//!
//! A [`Region`] is a list of pairwise-disjoint, non-empty, axis-aligned
//! rectangles. Union and subtraction keep that invariant, so [`area`]
//! is a plain sum and emptiness is a length check.
//!
//! The coverage tests ([`covers_at_least`], [`covers_at_most`],
//! [`covers_exactly`]) return the offending remainder on failure so callers
//! can report *where* a region fell short, not just that it did.
//!
//! [`area`]: Region::area
//! [`covers_at_least`]: Region::covers_at_least
//! [`covers_at_most`]: Region::covers_at_most
//! [`covers_exactly`]: Region::covers_exactly

use alloc::vec::Vec;
use core::fmt;

use kurbo::Rect;

/// Returns true if `rect` encloses no area (including NaN extents).
#[inline]
#[must_use]
pub fn rect_is_empty(rect: Rect) -> bool {
    !(rect.width() > 0.0 && rect.height() > 0.0)
}

/// Intersection of two normalized rectangles, or `None` if they don't overlap.
#[must_use]
pub fn rect_intersection(a: Rect, b: Rect) -> Option<Rect> {
    let r = Rect::new(a.x0.max(b.x0), a.y0.max(b.y0), a.x1.min(b.x1), a.y1.min(b.y1));
    (!rect_is_empty(r)).then_some(r)
}

/// Whether `outer` fully contains `inner`. Empty rectangles neither contain
/// nor are contained.
#[must_use]
pub fn rect_contains(outer: Rect, inner: Rect) -> bool {
    if rect_is_empty(outer) || rect_is_empty(inner) {
        return false;
    }
    outer.x0 <= inner.x0 && outer.y0 <= inner.y0 && outer.x1 >= inner.x1 && outer.y1 >= inner.y1
}

/// Pushes the parts of `a` not covered by `b` into `out`.
fn subtract_rect(a: Rect, b: Rect, out: &mut Vec<Rect>) {
    let Some(i) = rect_intersection(a, b) else {
        out.push(a);
        return;
    };
    let pieces = [
        Rect::new(a.x0, a.y0, a.x1, i.y0),
        Rect::new(a.x0, i.y1, a.x1, a.y1),
        Rect::new(a.x0, i.y0, i.x0, i.y1),
        Rect::new(i.x1, i.y0, a.x1, i.y1),
    ];
    out.extend(pieces.into_iter().filter(|r| !rect_is_empty(*r)));
}

/// A set of pixels described by disjoint axis-aligned rectangles.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Region {
    rects: Vec<Rect>,
}

/// Why a [`Region::covers_exactly`] check failed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RegionMismatch {
    /// Part of the expected region that is not covered.
    pub uncovered: Region,
    /// Part of the actual region that lies outside the expected one.
    pub out_of_bounds: Region,
}

impl Region {
    /// The empty region.
    pub const EMPTY: Self = Self { rects: Vec::new() };

    /// Creates an empty region.
    #[must_use]
    pub const fn new() -> Self {
        Self::EMPTY
    }

    /// Creates a region covering `rect`.
    #[must_use]
    pub fn from_rect(rect: Rect) -> Self {
        let mut region = Self::new();
        region.add_rect(rect);
        region
    }

    /// Creates a region covering the union of `rects`.
    #[must_use]
    pub fn from_rects(rects: impl IntoIterator<Item = Rect>) -> Self {
        let mut region = Self::new();
        for rect in rects {
            region.add_rect(rect);
        }
        region
    }

    /// The disjoint rectangles making up this region.
    #[must_use]
    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    /// Whether the region covers no area.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// Total covered area.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.rects.iter().map(|r| r.area()).sum()
    }

    /// Bounding box of the region, or [`Rect::ZERO`] if empty.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        let mut iter = self.rects.iter();
        let Some(first) = iter.next() else {
            return Rect::ZERO;
        };
        iter.fold(*first, |acc, r| acc.union(*r))
    }

    /// Adds `rect` to the region.
    pub fn add_rect(&mut self, rect: Rect) {
        let rect = rect.abs();
        if rect_is_empty(rect) {
            return;
        }
        let mut fresh = Vec::from([rect]);
        for existing in &self.rects {
            let mut next = Vec::with_capacity(fresh.len());
            for piece in fresh {
                subtract_rect(piece, *existing, &mut next);
            }
            fresh = next;
            if fresh.is_empty() {
                return;
            }
        }
        self.rects.extend(fresh);
    }

    /// Returns the union of `self` and `other`.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let mut out = self.clone();
        for rect in &other.rects {
            out.add_rect(*rect);
        }
        out
    }

    /// Returns the part of `self` not covered by `other`.
    #[must_use]
    pub fn subtract(&self, other: &Self) -> Self {
        let mut remaining = self.rects.clone();
        for cut in &other.rects {
            let mut next = Vec::with_capacity(remaining.len());
            for piece in remaining {
                subtract_rect(piece, *cut, &mut next);
            }
            remaining = next;
            if remaining.is_empty() {
                break;
            }
        }
        // Pieces of disjoint rects stay disjoint.
        Self { rects: remaining }
    }

    /// Returns the part covered by both regions.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Self {
        let mut rects = Vec::new();
        for a in &self.rects {
            for b in &other.rects {
                if let Some(i) = rect_intersection(*a, *b) {
                    rects.push(i);
                }
            }
        }
        Self { rects }
    }

    /// Whether both regions cover exactly the same pixels, regardless of how
    /// they are split into rectangles.
    #[must_use]
    pub fn same_area_as(&self, other: &Self) -> bool {
        self.subtract(other).is_empty() && other.subtract(self).is_empty()
    }

    /// Checks that `self` covers every point of `target`.
    ///
    /// On failure returns the uncovered part of `target`.
    pub fn covers_at_least(&self, target: &Self) -> Result<(), Self> {
        let uncovered = target.subtract(self);
        if uncovered.is_empty() {
            Ok(())
        } else {
            Err(uncovered)
        }
    }

    /// Checks that `self` covers no point outside `target`.
    ///
    /// On failure returns the part of `self` lying outside `target`.
    pub fn covers_at_most(&self, target: &Self) -> Result<(), Self> {
        let out_of_bounds = self.subtract(target);
        if out_of_bounds.is_empty() {
            Ok(())
        } else {
            Err(out_of_bounds)
        }
    }

    /// Checks that `self` and `target` cover exactly the same points.
    pub fn covers_exactly(&self, target: &Self) -> Result<(), RegionMismatch> {
        let uncovered = target.subtract(self);
        let out_of_bounds = self.subtract(target);
        if uncovered.is_empty() && out_of_bounds.is_empty() {
            Ok(())
        } else {
            Err(RegionMismatch {
                uncovered,
                out_of_bounds,
            })
        }
    }

    /// Returns the shared part if the regions overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> Option<Self> {
        let shared = self.intersect(other);
        (!shared.is_empty()).then_some(shared)
    }

    /// Checks that `other` lies entirely inside `self`.
    ///
    /// On failure returns the part of `other` outside `self`. An empty
    /// `other` is contained by anything.
    pub fn contains(&self, other: &Self) -> Result<(), Self> {
        self.covers_at_least(other)
    }
}

impl From<Rect> for Region {
    fn from(rect: Rect) -> Self {
        Self::from_rect(rect)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rects.is_empty() {
            return f.write_str("[empty]");
        }
        f.write_str("[")?;
        for (i, r) in self.rects.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "({}, {}, {}, {})", r.x0, r.y0, r.x1, r.y1)?;
        }
        f.write_str("]")
    }
}
