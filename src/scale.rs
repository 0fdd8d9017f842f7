//! Linear data-to-viewport mappings.
//!
//! Every coordinate the renderer sees passes through a [`ViewportTransform`]:
//! one independent [`AxisScale`] per axis mapping the data-space extent
//! (`x_from`, `y_from`) onto the fixed viewport box (`x_to`, `y_to`).
//!
//! ```text
//! scale = (to_high - to_low) / (from_high - from_low)
//! out   = scale * (in - from_low) + to_low
//! ```
//!
//! A zero-extent source axis never divides by zero: the scale is taken as 1
//! and `from_low` lands on the midpoint of the target range.

use crate::geometry::{Bounds, Point, Range, Rect};

/// Trait for scale functions that map domain values to range values.
pub trait Scale<D, R> {
    /// Transform a domain value to a range value.
    fn scale(&self, value: D) -> R;

    /// Get the domain extent.
    fn domain(&self) -> (D, D);

    /// Get the range extent.
    fn range(&self) -> (R, R);
}

/// Linear scale for one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisScale {
    from: Range,
    to: Range,
    factor: f64,
    origin: f64,
}

impl AxisScale {
    /// Create a scale mapping `from` onto `to`.
    ///
    /// Never fails; a degenerate `from` yields a unit scale pinned to the
    /// midpoint of `to`.
    #[must_use]
    pub fn new(from: Range, to: Range) -> Self {
        if from.is_degenerate() {
            Self { from, to, factor: 1.0, origin: to.midpoint() }
        } else {
            Self { from, to, factor: to.span() / from.span(), origin: to.low }
        }
    }

    /// Multiplicative factor applied to data offsets.
    #[must_use]
    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// Returns true if the source extent was zero.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.from.is_degenerate()
    }

    /// Invert the scale (viewport to data).
    ///
    /// A zero-width target carries no position, so every value inverts to
    /// the source low bound.
    #[must_use]
    pub fn invert(&self, value: f64) -> f64 {
        if self.factor == 0.0 {
            return self.from.low;
        }
        (value - self.origin) / self.factor + self.from.low
    }
}

impl Scale<f64, f64> for AxisScale {
    fn scale(&self, value: f64) -> f64 {
        self.factor * (value - self.from.low) + self.origin
    }

    fn domain(&self) -> (f64, f64) {
        (self.from.low, self.from.high)
    }

    fn range(&self) -> (f64, f64) {
        (self.to.low, self.to.high)
    }
}

/// Per-axis pair of scales from data space into viewport space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportTransform {
    /// Horizontal scale.
    pub x: AxisScale,
    /// Vertical scale.
    pub y: AxisScale,
}

impl ViewportTransform {
    /// Build a transform; argument order follows the host convention
    /// (targets first, then sources).
    #[must_use]
    pub fn new(x_to: Range, y_to: Range, x_from: Range, y_from: Range) -> Self {
        Self { x: AxisScale::new(x_from, x_to), y: AxisScale::new(y_from, y_to) }
    }

    /// Build a transform from data bounds onto a viewport box.
    #[must_use]
    pub fn between(from: Bounds, to: Bounds) -> Self {
        Self::new(to.x, to.y, from.x, from.y)
    }

    /// Map a single point.
    #[must_use]
    pub fn apply(&self, p: Point) -> Point {
        Point::new(self.x.scale(p.x), self.y.scale(p.y))
    }

    /// Map both corners of a rectangle independently.
    #[must_use]
    pub fn apply_rect(&self, r: &Rect) -> Rect {
        Rect::from_corners(self.apply(r.corner1()), self.apply(r.corner2()))
    }

    /// Map a viewport point back into data space.
    #[must_use]
    pub fn invert(&self, p: Point) -> Point {
        Point::new(self.x.invert(p.x), self.y.invert(p.y))
    }
}

/// A record carrying a position that can be re-projected.
///
/// `with_position` must return a new record equal to `self` except for its
/// coordinates.
pub trait Positioned {
    /// Current position.
    fn position(&self) -> Point;

    /// Copy of the record at a new position.
    #[must_use]
    fn with_position(&self, p: Point) -> Self;
}

impl Positioned for Point {
    fn position(&self) -> Point {
        *self
    }

    fn with_position(&self, p: Point) -> Self {
        p
    }
}

/// Rescale records from `x_from`/`y_from` onto `x_to`/`y_to`.
///
/// Returns a freshly allocated collection; order and length are preserved.
#[must_use]
pub fn rescale<T: Positioned>(items: &[T], x_to: Range, y_to: Range, x_from: Range, y_from: Range) -> Vec<T> {
    rescale_with(items, &ViewportTransform::new(x_to, y_to, x_from, y_from))
}

/// Rescale records with a prebuilt transform.
#[must_use]
pub fn rescale_with<T: Positioned>(items: &[T], transform: &ViewportTransform) -> Vec<T> {
    items.iter().map(|item| item.with_position(transform.apply(item.position()))).collect()
}

/// Rescale both corners of a rectangle.
#[must_use]
pub fn rescale_box(rect: &Rect, x_to: Range, y_to: Range, x_from: Range, y_from: Range) -> Rect {
    ViewportTransform::new(x_to, y_to, x_from, y_from).apply_rect(rect)
}

/// Single-pass min/max of all positions.
///
/// Returns `None` for an empty slice; a single point yields a zero-extent box.
#[must_use]
pub fn bounding_box_of<T: Positioned>(items: &[T]) -> Option<Bounds> {
    let first = items.first()?.position();
    let mut x = Range::new(first.x, first.x);
    let mut y = Range::new(first.y, first.y);

    for p in items.iter().skip(1).map(Positioned::position) {
        if p.x < x.low {
            x.low = p.x;
        }
        if p.x > x.high {
            x.high = p.x;
        }
        if p.y < y.low {
            y.low = p.y;
        }
        if p.y > y.high {
            y.high = p.y;
        }
    }

    Some(Bounds::new(x, y))
}


// ============================================================================
// Property-based tests with proptest
// ============================================================================
