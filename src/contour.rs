//! Grid cell outlines.
//!
//! A contour is the closed 4-vertex ring of a rectangle, always emitted in
//! the order (x1,y1), (x1,y2), (x2,y2), (x2,y1).

use crate::color::Rgba;
use crate::geometry::{Point, Rect};
use crate::model::GridCell;

/// A closed polygon ring with its fill color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contour {
    /// Ring vertices; the last implicitly connects to the first.
    pub ring: [Point; 4],
    /// Fill color.
    pub color: Rgba,
}

/// Build the 4-vertex ring of a rectangle.
///
/// Zero-area rectangles produce a degenerate ring.
#[must_use]
pub fn to_contour(rect: &Rect) -> [Point; 4] {
    [
        Point::new(rect.x1, rect.y1),
        Point::new(rect.x1, rect.y2),
        Point::new(rect.x2, rect.y2),
        Point::new(rect.x2, rect.y1),
    ]
}

/// Build a contour for every (already rescaled) cell.
#[must_use]
pub fn cells_to_contours(cells: &[GridCell]) -> Vec<Contour> {
    cells.iter().map(|c| Contour { ring: to_contour(&c.rect), color: c.color }).collect()
}
