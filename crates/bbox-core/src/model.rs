//! Core data model for bounding-box annotation.
//!
//! A `Bbox` is a labeled rectangle over the background image, in surface
//! coordinates. Identity is positional: a box's index in the `BoxStore`
//! is also the index of its visual shape on the render surface.

use serde::{Deserialize, Serialize};

// ─── Geometry ────────────────────────────────────────────────────────────

/// A point in surface coordinates (device-independent pixels).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle. `width` and `height` are never negative when
/// produced by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Normalized rectangle spanned by two corner points.
    /// The min corner becomes left/top, so all four drag directions work.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            left: a.x.min(b.x),
            top: a.y.min(b.y),
            width: (b.x - a.x).abs(),
            height: (b.y - a.y).abs(),
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.left, self.top)
    }

    pub fn bottom_right(&self) -> Point {
        Point::new(self.right(), self.bottom())
    }

    /// Inclusive point containment.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left && p.x <= self.right() && p.y >= self.top && p.y <= self.bottom()
    }

    /// True if the two rectangles overlap or touch.
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.left <= other.right()
            && other.left <= self.right()
            && self.top <= other.bottom()
            && other.top <= self.bottom()
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self {
            left: self.left + dx,
            top: self.top + dy,
            ..*self
        }
    }

    /// Zero width or zero height.
    pub fn is_empty(&self) -> bool {
        self.width == 0.0 || self.height == 0.0
    }

    pub fn is_finite(&self) -> bool {
        self.left.is_finite()
            && self.top.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
    }
}

// ─── Box ─────────────────────────────────────────────────────────────────

/// A labeled region of interest.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Bbox {
    #[serde(flatten)]
    pub bounds: Bounds,
    #[serde(default)]
    pub label: String,
}

impl Bbox {
    pub fn new(bounds: Bounds, label: impl Into<String>) -> Self {
        Self {
            bounds,
            label: label.into(),
        }
    }

    /// A box with an empty label, as produced by drawing or quick-add.
    pub fn unlabeled(bounds: Bounds) -> Self {
        Self::new(bounds, "")
    }
}
