//! Geometric primitives shared by the transform, contour and selection code.

use serde::{Deserialize, Serialize};

/// A 2D point with floating-point coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

impl Point {
    /// Origin point (0, 0).
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Calculate the distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Returns true if both coordinates are finite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self::new(x, y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// A closed interval `[low, high]` on one axis.
///
/// Serialized as a two-element array, matching the host's `xrange`/`yrange`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Range {
    /// Lower bound.
    pub low: f64,
    /// Upper bound.
    pub high: f64,
}

impl Range {
    /// Create a new range.
    #[must_use]
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// Range centred on zero with the given half-extent.
    #[must_use]
    pub const fn symmetric(half: f64) -> Self {
        Self::new(-half, half)
    }

    /// Signed extent `high - low`.
    #[must_use]
    pub fn span(&self) -> f64 {
        self.high - self.low
    }

    /// Midpoint of the range.
    #[must_use]
    pub fn midpoint(&self) -> f64 {
        (self.low + self.high) / 2.0
    }

    /// Returns true if the range has zero extent.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.span() == 0.0
    }

    /// Returns true if `v` lies within the closed range (in either orientation).
    #[must_use]
    pub fn contains(&self, v: f64) -> bool {
        v >= self.low.min(self.high) && v <= self.low.max(self.high)
    }
}

impl From<[f64; 2]> for Range {
    fn from([low, high]: [f64; 2]) -> Self {
        Self::new(low, high)
    }
}

impl From<Range> for [f64; 2] {
    fn from(r: Range) -> Self {
        [r.low, r.high]
    }
}

/// An axis-aligned rectangle given by two opposite corners.
///
/// Corners are kept exactly as supplied; `x1` need not be smaller than `x2`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// First corner x.
    pub x1: f64,
    /// First corner y.
    pub y1: f64,
    /// Opposite corner x.
    pub x2: f64,
    /// Opposite corner y.
    pub y2: f64,
}

impl Rect {
    /// Create a rectangle from corner coordinates.
    #[must_use]
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Create a rectangle from two corner points.
    #[must_use]
    pub const fn from_corners(a: Point, b: Point) -> Self {
        Self::new(a.x, a.y, b.x, b.y)
    }

    /// First corner.
    #[must_use]
    pub const fn corner1(&self) -> Point {
        Point::new(self.x1, self.y1)
    }

    /// Opposite corner.
    #[must_use]
    pub const fn corner2(&self) -> Point {
        Point::new(self.x2, self.y2)
    }

    /// Get the (unsigned) area of the rectangle.
    #[must_use]
    pub fn area(&self) -> f64 {
        ((self.x2 - self.x1) * (self.y2 - self.y1)).abs()
    }
}

/// Data-space extent on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    /// Horizontal extent.
    pub x: Range,
    /// Vertical extent.
    pub y: Range,
}

impl Bounds {
    /// Create bounds from per-axis ranges.
    #[must_use]
    pub const fn new(x: Range, y: Range) -> Self {
        Self { x, y }
    }

    /// Returns true if `p` lies inside the bounds (edges inclusive).
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        self.x.contains(p.x) && self.y.contains(p.y)
    }
}
