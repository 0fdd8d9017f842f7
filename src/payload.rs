//! Inbound host messages.
//!
//! The host serialises tables column-wise (`{"x": [...], "y": [...]}`) and
//! colors as CSS strings. Decoding validates everything up front so a
//! malformed message is rejected before any widget state changes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::color::{parse_colors, Rgba};
use crate::error::{Error, Result};
use crate::geometry::{Point, Range, Rect};
use crate::model::{GridCell, LabeledPoint};
use crate::viewport::ViewStatePatch;

/// Column-wise point coordinates.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PointTable {
    /// X column.
    pub x: Vec<f64>,
    /// Y column.
    pub y: Vec<f64>,
}

impl PointTable {
    /// Zip the columns into points.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DataLengthMismatch`] if the columns differ in length.
    pub fn rows(&self) -> Result<Vec<Point>> {
        check_len("coords", "y", self.x.len(), self.y.len())?;
        Ok(self.x.iter().zip(&self.y).map(|(&x, &y)| Point::new(x, y)).collect())
    }
}

/// Column-wise label anchors.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LabelTable {
    /// X column.
    pub x: Vec<f64>,
    /// Y column.
    pub y: Vec<f64>,
    /// Label text column.
    pub label: Vec<String>,
}

impl LabelTable {
    /// Zip the columns into label anchors.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DataLengthMismatch`] if the columns differ in length.
    pub fn rows(&self) -> Result<Vec<LabeledPoint>> {
        check_len("labelCoords", "y", self.x.len(), self.y.len())?;
        check_len("labelCoords", "label", self.x.len(), self.label.len())?;
        Ok(self
            .x
            .iter()
            .zip(&self.y)
            .zip(&self.label)
            .map(|((&x, &y), label)| LabeledPoint::new(x, y, label.clone()))
            .collect())
    }
}

/// Column-wise grid cells.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PolygonTable {
    /// First corner x.
    pub x1: Vec<f64>,
    /// First corner y.
    pub y1: Vec<f64>,
    /// Opposite corner x.
    pub x2: Vec<f64>,
    /// Opposite corner y.
    pub y2: Vec<f64>,
    /// Fill color per cell (CSS).
    pub color: Vec<String>,
}

impl PolygonTable {
    /// Decode the table into cells, parsing colors.
    ///
    /// # Errors
    ///
    /// Returns an error on column length mismatch or a malformed color.
    pub fn cells(&self) -> Result<Vec<GridCell>> {
        let n = self.x1.len();
        check_len("polygons", "y1", n, self.y1.len())?;
        check_len("polygons", "x2", n, self.x2.len())?;
        check_len("polygons", "y2", n, self.y2.len())?;
        check_len("polygons", "color", n, self.color.len())?;

        let colors = parse_colors(&self.color)?;
        Ok((0..n)
            .map(|i| GridCell::new(Rect::new(self.x1[i], self.y1[i], self.x2[i], self.y2[i]), colors[i]))
            .collect())
    }
}

fn check_len(table: &'static str, column: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(Error::DataLengthMismatch { table, column, expected, actual })
    }
}

/// Pass-through renderer properties, forwarded untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RendererProps {
    /// Extra scatter layer properties.
    pub scatter_plot_layer_props: Map<String, Value>,
    /// Extra grid polygon layer properties.
    pub polygon_layer_props: Map<String, Value>,
    /// Extra text layer properties.
    pub text_layer_props: Map<String, Value>,
    /// Extra renderer-level properties.
    pub deck_props: Map<String, Value>,
}

/// Full render payload, as sent by the host.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderPayload {
    /// Point coordinates.
    pub coords: PointTable,
    /// Label anchors.
    #[serde(default)]
    pub label_coords: Option<LabelTable>,
    /// Per-point fill colors.
    #[serde(default)]
    pub colors: Vec<String>,
    /// Per-point tooltip text.
    #[serde(default)]
    pub labels: Vec<String>,
    /// Grid cells.
    #[serde(default)]
    pub polygons: Option<PolygonTable>,
    /// Per-point colors used while the grid is shown.
    #[serde(default)]
    pub point_color_polygons: Option<Vec<String>>,
    /// Explicit data-space x extent.
    #[serde(default)]
    pub xrange: Option<Range>,
    /// Explicit data-space y extent.
    #[serde(default)]
    pub yrange: Option<Range>,
    /// Whether the pan/lasso buttons are shown.
    #[serde(default = "default_show_controls")]
    pub show_controls: bool,
    /// Title text.
    #[serde(default)]
    pub title: String,
    /// Grid legend entries, opaque to the widget.
    #[serde(default)]
    pub grid_legend_items: Option<Value>,
    /// Pass-through renderer properties.
    #[serde(flatten)]
    pub renderer_props: RendererProps,
}

fn default_show_controls() -> bool {
    true
}

impl RenderPayload {
    /// Parse a payload from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Payload`] if the JSON does not match the schema.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validate and convert into typed data.
    ///
    /// # Errors
    ///
    /// Returns an error on column mismatches, color-count mismatches or
    /// malformed colors.
    pub fn decode(&self) -> Result<FullUpdate> {
        let points = self.coords.rows()?;
        let colors = decode_point_colors("colors", &self.colors, points.len())?;
        let grid_palette = self
            .point_color_polygons
            .as_ref()
            .map(|specs| decode_point_colors("pointColorPolygons", specs, points.len()))
            .transpose()?;

        Ok(FullUpdate {
            label_anchors: self.label_coords.as_ref().map(LabelTable::rows).transpose()?.unwrap_or_default(),
            cells: self.polygons.as_ref().map(PolygonTable::cells).transpose()?,
            points,
            colors,
            grid_palette,
            labels: self.labels.clone(),
            x_range: self.xrange,
            y_range: self.yrange,
            show_controls: self.show_controls,
            title: self.title.clone(),
            grid_legend_items: self.grid_legend_items.clone(),
            renderer_props: self.renderer_props.clone(),
        })
    }
}

/// Fill used for points when the host sends no colors.
pub const DEFAULT_POINT_COLOR: Rgba = Rgba::rgb(70, 130, 180);

/// Resolve per-point colors: one per point, one broadcast to all, or none.
///
/// # Errors
///
/// Returns an error for a malformed color or a count that is neither 0, 1
/// nor `n`.
pub fn decode_point_colors<S: AsRef<str>>(table: &'static str, specs: &[S], n: usize) -> Result<Vec<Rgba>> {
    let parsed = parse_colors(specs)?;
    match parsed.len() {
        0 => Ok(vec![DEFAULT_POINT_COLOR; n]),
        1 => Ok(vec![parsed[0]; n]),
        len if len == n => Ok(parsed),
        len => Err(Error::DataLengthMismatch { table, column: "color", expected: n, actual: len }),
    }
}

/// Validated contents of a [`RenderPayload`].
#[derive(Debug, Clone, PartialEq)]
pub struct FullUpdate {
    /// Raw data-space points.
    pub points: Vec<Point>,
    /// One fill color per point.
    pub colors: Vec<Rgba>,
    /// One grid-overlay color per point, if supplied.
    pub grid_palette: Option<Vec<Rgba>>,
    /// Tooltip text by point index.
    pub labels: Vec<String>,
    /// Raw data-space label anchors.
    pub label_anchors: Vec<LabeledPoint>,
    /// Raw data-space grid cells; `None` disables the grid.
    pub cells: Option<Vec<GridCell>>,
    /// Explicit x extent.
    pub x_range: Option<Range>,
    /// Explicit y extent.
    pub y_range: Option<Range>,
    /// Pan/lasso buttons visible.
    pub show_controls: bool,
    /// Title text.
    pub title: String,
    /// Opaque legend entries.
    pub grid_legend_items: Option<Value>,
    /// Pass-through renderer properties.
    pub renderer_props: RendererProps,
}

/// Incremental update for a live widget.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct ProxyCommand {
    /// Target widget id.
    pub id: String,
    /// Camera patch, merged over the initial view.
    #[serde(rename = "initialViewState", alias = "view-state", alias = "viewState")]
    pub view_state: Option<ViewStatePatch>,
    /// New per-point colors.
    pub colors: Option<Vec<String>>,
    /// New label anchors.
    #[serde(rename = "labelCoords", alias = "label-coordinates")]
    pub label_coords: Option<LabelTable>,
    /// New grid cells.
    #[serde(alias = "polygon-set")]
    pub polygons: Option<PolygonTable>,
    /// New tooltip text.
    pub labels: Option<Vec<String>>,
    /// Request the grid overlay be shown.
    #[serde(rename = "showGrid", alias = "show-grid")]
    pub show_grid: Option<bool>,
    /// New title.
    pub title: Option<String>,
}

impl ProxyCommand {
    /// Parse a command from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Payload`] if the JSON does not match the schema.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Command addressed to `id` with no changes.
    #[must_use]
    pub fn for_widget(id: impl Into<String>) -> Self {
        Self { id: id.into(), ..Self::default() }
    }
}
