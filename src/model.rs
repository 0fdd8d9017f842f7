//! Records held by the widget: labelled anchor points and grid cells.

use crate::color::Rgba;
use crate::geometry::{Point, Rect};
use crate::scale::{Positioned, ViewportTransform};

/// A text label anchored at a position.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LabeledPoint {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
    /// Text shown at the anchor.
    pub label: String,
}

impl LabeledPoint {
    /// Create a new label anchor.
    #[must_use]
    pub fn new(x: f64, y: f64, label: impl Into<String>) -> Self {
        Self { x, y, label: label.into() }
    }
}

impl Positioned for LabeledPoint {
    fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    fn with_position(&self, p: Point) -> Self {
        Self { x: p.x, y: p.y, label: self.label.clone() }
    }
}

/// A colored axis-aligned grid cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridCell {
    /// Cell rectangle.
    pub rect: Rect,
    /// Fill color.
    pub color: Rgba,
}

impl GridCell {
    /// Create a new grid cell.
    #[must_use]
    pub const fn new(rect: Rect, color: Rgba) -> Self {
        Self { rect, color }
    }
}

/// Rescale every cell's corners, keeping colors and order.
#[must_use]
pub fn rescale_cells(cells: &[GridCell], transform: &ViewportTransform) -> Vec<GridCell> {
    cells.iter().map(|c| GridCell::new(transform.apply_rect(&c.rect), c.color)).collect()
}
