//! Viewport state: data bounds, target box, and the renderer camera.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};
use crate::geometry::{Bounds, Point, Range};
use crate::scale::ViewportTransform;

/// On-screen panel size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanelSize {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl PanelSize {
    /// Create a validated panel size.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] for negative or non-finite sizes.
    pub fn new(width: f64, height: f64) -> Result<Self> {
        if !(width.is_finite() && height.is_finite()) || width < 0.0 || height < 0.0 {
            return Err(Error::InvalidDimensions { width, height });
        }
        Ok(Self { width, height })
    }

    /// Target box centred at the origin, inset by `margin` on every side.
    ///
    /// The inset never exceeds half the panel, so a panel narrower than
    /// `2 * margin` collapses to its centre rather than flipping.
    #[must_use]
    pub fn target_box(&self, margin: f64) -> Bounds {
        Bounds::new(inset(self.width / 2.0, margin), inset(self.height / 2.0, margin))
    }
}

fn inset(half: f64, margin: f64) -> Range {
    let inner = (half - margin).max(0.0);
    Range::symmetric(inner)
}

/// The last-used data bounds and target bounds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewportState {
    /// Data-space extent (`x_from`, `y_from`).
    pub from: Bounds,
    /// Viewport-space extent (`x_to`, `y_to`).
    pub to: Bounds,
}

impl ViewportState {
    /// Transform from data space into the viewport.
    #[must_use]
    pub fn transform(&self) -> ViewportTransform {
        ViewportTransform::between(self.from, self.to)
    }
}

/// Renderer camera state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    /// Camera look-at point in viewport space.
    #[serde(serialize_with = "serialize_target")]
    pub target: Point,
    /// Zoom level (log2 scale).
    pub zoom: f64,
    /// Smallest allowed zoom.
    pub min_zoom: f64,
    /// Largest allowed zoom.
    pub max_zoom: f64,
}

/// Initial camera: centred at the origin, fully zoomed out.
pub const INITIAL_VIEW_STATE: ViewState =
    ViewState { target: Point::ORIGIN, zoom: 0.0, min_zoom: 0.0, max_zoom: 10.0 };

impl Default for ViewState {
    fn default() -> Self {
        INITIAL_VIEW_STATE
    }
}

impl ViewState {
    /// Overlay the fields present in `patch` onto `self`.
    #[must_use]
    pub fn merged(self, patch: &ViewStatePatch) -> Self {
        Self {
            target: patch.target.unwrap_or(self.target),
            zoom: patch.zoom.unwrap_or(self.zoom),
            min_zoom: patch.min_zoom.unwrap_or(self.min_zoom),
            max_zoom: patch.max_zoom.unwrap_or(self.max_zoom),
        }
    }

    /// Normalise a camera change: fully zoomed out means re-centred.
    #[must_use]
    pub fn settled(mut self) -> Self {
        if self.zoom == 0.0 {
            self.target = Point::ORIGIN;
        }
        self
    }

    /// The `{zoom, target}` pair echoed to the host.
    #[must_use]
    pub fn echo(&self) -> CameraEcho {
        CameraEcho { zoom: self.zoom, target: [self.target.x, self.target.y] }
    }
}

/// Partial camera state sent by the host.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewStatePatch {
    /// New look-at point; `[x, y]` or `[x, y, z]`.
    #[serde(deserialize_with = "deserialize_target")]
    pub target: Option<Point>,
    /// New zoom.
    pub zoom: Option<f64>,
    /// New minimum zoom.
    pub min_zoom: Option<f64>,
    /// New maximum zoom.
    pub max_zoom: Option<f64>,
}

/// Camera summary sent to the host for synchronised zooming.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraEcho {
    /// Zoom level.
    pub zoom: f64,
    /// Look-at point `[x, y]`.
    pub target: [f64; 2],
}

fn serialize_target<S: serde::Serializer>(p: &Point, s: S) -> std::result::Result<S::Ok, S::Error> {
    [p.x, p.y, 0.0].serialize(s)
}

fn deserialize_target<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Option<Point>, D::Error> {
    let coords: Option<Vec<f64>> = Option::deserialize(d)?;
    match coords.as_deref() {
        None => Ok(None),
        Some([x, y]) | Some([x, y, _]) => Ok(Some(Point::new(*x, *y))),
        Some(other) => Err(serde::de::Error::invalid_length(other.len(), &"2 or 3 coordinates")),
    }
}
