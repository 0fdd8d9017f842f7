//! Lasso selection: which displayed points fall inside a drawn polygon.
//!
//! Containment uses even-odd ray casting. Points lying exactly on an edge or
//! a vertex are outside. Polygons with fewer than three vertices contain
//! nothing.

use crate::geometry::{Bounds, Point, Range};
use crate::scale::{bounding_box_of, Positioned};

/// A closed freehand polygon in viewport space.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LassoPolygon {
    vertices: Vec<Point>,
    bounds: Option<Bounds>,
}

impl LassoPolygon {
    /// Create a polygon from its vertices.
    ///
    /// A repeated closing vertex (first == last) is dropped.
    #[must_use]
    pub fn new(mut vertices: Vec<Point>) -> Self {
        if vertices.len() > 1 && vertices.first() == vertices.last() {
            vertices.pop();
        }
        let bounds = bounding_box_of(&vertices);
        Self { vertices, bounds }
    }

    /// Polygon vertices, without a closing duplicate.
    #[must_use]
    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    /// Returns true if the polygon can enclose anything.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.vertices.len() >= 3
    }

    /// Check whether `p` lies strictly inside the polygon.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        if !self.is_valid() {
            return false;
        }
        if let Some(b) = &self.bounds {
            if !b.contains(p) {
                return false;
            }
        }
        if on_boundary(p, &self.vertices) {
            return false;
        }
        crossing_parity(p, &self.vertices)
    }
}

impl From<Vec<Point>> for LassoPolygon {
    fn from(vertices: Vec<Point>) -> Self {
        Self::new(vertices)
    }
}

/// Indices (ascending) of the points strictly inside `polygon`.
///
/// O(n·m) for n points and m vertices.
#[must_use]
pub fn select_within<T: Positioned>(points: &[T], polygon: &LassoPolygon) -> Vec<usize> {
    if !polygon.is_valid() {
        return Vec::new();
    }

    points
        .iter()
        .enumerate()
        .filter(|(_, pt)| polygon.contains(pt.position()))
        .map(|(i, _)| i)
        .collect()
}

/// Even-odd ray cast towards +x.
fn crossing_parity(p: Point, ring: &[Point]) -> bool {
    let mut inside = false;
    let mut j = ring.len() - 1;

    for i in 0..ring.len() {
        let (a, b) = (ring[i], ring[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }

    inside
}

fn on_boundary(p: Point, ring: &[Point]) -> bool {
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        if on_segment(p, ring[j], ring[i]) {
            return true;
        }
        j = i;
    }
    false
}

fn on_segment(p: Point, a: Point, b: Point) -> bool {
    let cross = (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x);
    cross == 0.0 && Range::new(a.x, b.x).contains(p.x) && Range::new(a.y, b.y).contains(p.y)
}
