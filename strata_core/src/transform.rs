// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimal column-major 4×4 layer transform.
//!
//! Snapshots only ever need the 2-D part of a layer's transform: mapping a
//! layer's bounds into screen space, and deciding whether that mapping keeps
//! rectangles axis-aligned. Anything else (skew, arbitrary rotation,
//! perspective) makes containment tests meaningless, so those transforms are
//! reported as not [simple](Transform3d::is_simple_rotation).

use core::ops::Mul;

use kurbo::Rect;
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

/// Tolerance used when classifying matrix entries as zero.
const EPSILON: f64 = 1e-6;

/// A column-major 4×4 affine transform stored as `[[f64; 4]; 4]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform3d {
    /// Four columns, each a 4-element array `[x, y, z, w]`.
    pub cols: [[f64; 4]; 4],
}

impl Transform3d {
    /// The 4×4 identity matrix.
    pub const IDENTITY: Self = Self {
        cols: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    /// Creates a transform from a column-major 2-D array.
    #[inline]
    #[must_use]
    pub const fn from_cols_array_2d(cols: [[f64; 4]; 4]) -> Self {
        Self { cols }
    }

    /// Creates a 2-D affine transform from the usual `[a, b, c, d, tx, ty]`
    /// coefficients, mapping `(x, y)` to `(a*x + c*y + tx, b*x + d*y + ty)`.
    #[inline]
    #[must_use]
    pub const fn from_affine(coeffs: [f64; 6]) -> Self {
        let [a, b, c, d, tx, ty] = coeffs;
        Self {
            cols: [
                [a, b, 0.0, 0.0],
                [c, d, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [tx, ty, 0.0, 1.0],
            ],
        }
    }

    /// Creates a pure translation transform.
    #[inline]
    #[must_use]
    pub const fn from_translation(x: f64, y: f64, z: f64) -> Self {
        Self {
            cols: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [x, y, z, 1.0],
            ],
        }
    }

    /// Creates a non-uniform scale transform.
    #[inline]
    #[must_use]
    pub const fn from_scale(sx: f64, sy: f64, sz: f64) -> Self {
        Self {
            cols: [
                [sx, 0.0, 0.0, 0.0],
                [0.0, sy, 0.0, 0.0],
                [0.0, 0.0, sz, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Creates a rotation around the Z axis (radians).
    #[inline]
    #[must_use]
    pub fn from_rotation_z(radians: f64) -> Self {
        #[cfg(feature = "std")]
        let (s, c) = radians.sin_cos();
        #[cfg(not(feature = "std"))]
        let (s, c) = (radians.sin(), radians.cos());
        Self {
            cols: [
                [c, s, 0.0, 0.0],
                [-s, c, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Is this transform [finite]?
    ///
    /// [finite]: f64::is_finite
    #[inline]
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.cols.iter().flatten().all(|v| v.is_finite())
    }

    /// Whether the 2-D part can map a layer to a non-degenerate area.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        let [a, b, c, d] = self.linear_2d();
        self.is_finite() && !near_zero(a * d - b * c)
    }

    /// Whether the 2-D part keeps rectangles axis-aligned.
    ///
    /// True for rotations by multiples of 90°, optionally combined with
    /// per-axis scaling and translation. A scale that collapses either axis
    /// is not simple.
    #[must_use]
    pub fn is_simple_rotation(&self) -> bool {
        if !self.is_valid() {
            return false;
        }
        let [a, b, c, d] = self.linear_2d();
        (near_zero(b) && near_zero(c)) || (near_zero(a) && near_zero(d))
    }

    /// Maps `rect` through the 2-D part of the transform and returns the
    /// bounding box of the four transformed corners.
    #[must_use]
    pub fn apply_to_rect(&self, rect: Rect) -> Rect {
        let corners = [
            (rect.x0, rect.y0),
            (rect.x1, rect.y0),
            (rect.x0, rect.y1),
            (rect.x1, rect.y1),
        ];
        let mut out = Rect::new(f64::MAX, f64::MAX, f64::MIN, f64::MIN);
        for (x, y) in corners {
            let (tx, ty) = self.apply_to_point(x, y);
            out.x0 = out.x0.min(tx);
            out.y0 = out.y0.min(ty);
            out.x1 = out.x1.max(tx);
            out.y1 = out.y1.max(ty);
        }
        out
    }

    fn apply_to_point(&self, x: f64, y: f64) -> (f64, f64) {
        let c = &self.cols;
        (
            c[0][0] * x + c[1][0] * y + c[3][0],
            c[0][1] * x + c[1][1] * y + c[3][1],
        )
    }

    /// Returns `[a, b, c, d]`: the upper-left 2×2 block.
    fn linear_2d(&self) -> [f64; 4] {
        let c = &self.cols;
        [c[0][0], c[0][1], c[1][0], c[1][1]]
    }
}

fn near_zero(v: f64) -> bool {
    v > -EPSILON && v < EPSILON
}

impl Default for Transform3d {
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Transform3d {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        let a = &self.cols;
        let b = &rhs.cols;
        let mut out = [[0.0_f64; 4]; 4];
        for (j, col) in out.iter_mut().enumerate() {
            for (i, cell) in col.iter_mut().enumerate() {
                *cell =
                    a[0][i] * b[j][0] + a[1][i] * b[j][1] + a[2][i] * b[j][2] + a[3][i] * b[j][3];
            }
        }
        Self { cols: out }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_rect(a: Rect, b: Rect) -> bool {
        near_zero(a.x0 - b.x0)
            && near_zero(a.y0 - b.y0)
            && near_zero(a.x1 - b.x1)
            && near_zero(a.y1 - b.y1)
    }

    #[test]
    fn default_is_identity() {
        assert_eq!(Transform3d::default(), Transform3d::IDENTITY);
    }

    #[test]
    fn identity_maps_rect_to_itself() {
        let r = Rect::new(10.0, 20.0, 110.0, 220.0);
        assert_eq!(Transform3d::IDENTITY.apply_to_rect(r), r);
    }

    #[test]
    fn translation_then_scale_maps_bounds() {
        let t = Transform3d::from_translation(5.0, 5.0, 0.0) * Transform3d::from_scale(2.0, 3.0, 1.0);
        let mapped = t.apply_to_rect(Rect::new(0.0, 0.0, 10.0, 10.0));
        assert!(
            approx_rect(mapped, Rect::new(5.0, 5.0, 25.0, 35.0)),
            "got {mapped:?}"
        );
    }

    #[test]
    fn quarter_turn_is_simple_rotation() {
        let r = Transform3d::from_rotation_z(core::f64::consts::FRAC_PI_2);
        assert!(r.is_simple_rotation());
        let mapped = r.apply_to_rect(Rect::new(0.0, 0.0, 10.0, 20.0));
        assert!(
            approx_rect(mapped, Rect::new(-20.0, 0.0, 0.0, 10.0)),
            "got {mapped:?}"
        );
    }

    #[test]
    fn arbitrary_rotation_is_not_simple() {
        let r = Transform3d::from_rotation_z(0.3);
        assert!(!r.is_simple_rotation());
        assert!(r.is_valid());
    }

    #[test]
    fn zero_scale_is_neither_valid_nor_simple() {
        let t = Transform3d::from_scale(0.0, 1.0, 1.0);
        assert!(!t.is_valid());
        assert!(!t.is_simple_rotation());
        let collapsed = Transform3d::from_affine([0.0, 0.0, 0.0, 0.0, 800.0, 800.0]);
        assert!(!collapsed.is_simple_rotation());
    }

    #[test]
    fn nan_is_neither_valid_nor_simple() {
        let mut t = Transform3d::IDENTITY;
        t.cols[0][1] = f64::NAN;
        assert!(!t.is_finite());
        assert!(!t.is_valid());
        assert!(!t.is_simple_rotation());
    }

    #[test]
    fn affine_coefficients_round_trip_through_point_mapping() {
        let t = Transform3d::from_affine([1.0, 0.0, 0.0, 1.0, 7.0, -3.0]);
        assert_eq!(t, Transform3d::from_translation(7.0, -3.0, 0.0));
    }
}
