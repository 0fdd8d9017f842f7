//! Widget configuration.
//!
//! Layer styling and timing knobs, loadable from YAML. Anything missing from
//! the file falls back to the defaults below.

use crate::color::Rgba;
use crate::error::{Error, Result};
use crate::viewport::{ViewState, INITIAL_VIEW_STATE};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Scatter layer styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointStyle {
    /// Smallest on-screen radius in pixels.
    pub radius_min_pixels: f64,
    /// Largest on-screen radius in pixels.
    pub radius_max_pixels: f64,
    /// Layer opacity (0.0-1.0).
    pub opacity: f64,
    /// Outline color `[r, g, b, a]`.
    pub line_color: [u8; 4],
}

impl Default for PointStyle {
    fn default() -> Self {
        Self { radius_min_pixels: 3.0, radius_max_pixels: 20.0, opacity: 0.8, line_color: [51, 51, 51, 100] }
    }
}

/// Grid overlay styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridStyle {
    /// Contour outline color.
    pub line_color: [u8; 4],
    /// Contour outline width in pixels.
    pub line_width: f64,
}

impl Default for GridStyle {
    fn default() -> Self {
        Self { line_color: [221, 221, 221, 255], line_width: 1.0 }
    }
}

/// Text label styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelStyle {
    /// Font size in pixels.
    pub size: f64,
    /// Text color.
    pub color: [u8; 4],
    /// Background box color.
    pub background: [u8; 4],
    /// Font family list.
    pub font_family: String,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            size: 18.0,
            color: [51, 51, 51, 255],
            background: [255, 255, 255, 100],
            font_family: "Helvetica, Arial, sans-serif".to_string(),
        }
    }
}

/// Camera zoom limits applied to the initial view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewLimits {
    /// Smallest allowed zoom.
    pub min_zoom: f64,
    /// Largest allowed zoom.
    pub max_zoom: f64,
}

impl Default for ViewLimits {
    fn default() -> Self {
        Self { min_zoom: INITIAL_VIEW_STATE.min_zoom, max_zoom: INITIAL_VIEW_STATE.max_zoom }
    }
}

/// Complete widget configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickerConfig {
    /// Configuration version.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Inset of the target box from the panel edge, in pixels.
    #[serde(default = "default_margin")]
    pub margin: f64,

    /// Quiet period before a resize is applied, in milliseconds.
    #[serde(default = "default_resize_debounce_ms")]
    pub resize_debounce_ms: u64,

    /// Initial camera limits.
    #[serde(default)]
    pub view: ViewLimits,

    /// Scatter layer styling.
    #[serde(default)]
    pub points: PointStyle,

    /// Grid overlay styling.
    #[serde(default)]
    pub grid: GridStyle,

    /// Text label styling.
    #[serde(default)]
    pub labels: LabelStyle,

    /// Fill color of the polygon while it is being drawn.
    #[serde(default = "default_lasso_fill")]
    pub lasso_fill: [u8; 4],
}

fn default_version() -> u32 {
    1
}
fn default_margin() -> f64 {
    10.0
}
fn default_resize_debounce_ms() -> u64 {
    50
}
fn default_lasso_fill() -> [u8; 4] {
    [200, 0, 80, 180]
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            margin: default_margin(),
            resize_debounce_ms: default_resize_debounce_ms(),
            view: ViewLimits::default(),
            points: PointStyle::default(),
            grid: GridStyle::default(),
            labels: LabelStyle::default(),
            lasso_fill: default_lasso_fill(),
        }
    }
}

impl PickerConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .map_err(|_| Error::ConfigNotFound(path.display().to_string()))?;

        Self::parse(&content)
    }

    /// Parses configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error with line number if parsing fails.
    pub fn parse(yaml: &str) -> Result<Self> {
        serde_yaml_ng::from_str(yaml).map_err(|e| {
            let line = e.location().map(|l| l.line()).unwrap_or(0);
            Error::ConfigParse { line, message: e.to_string() }
        })
    }

    /// Loads configuration with fallback to defaults.
    #[must_use]
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Resize quiet period as a Duration.
    #[must_use]
    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }

    /// Default camera with the configured zoom limits.
    #[must_use]
    pub fn initial_view(&self) -> ViewState {
        ViewState { min_zoom: self.view.min_zoom, max_zoom: self.view.max_zoom, ..INITIAL_VIEW_STATE }
    }

    /// Drawing fill as a color.
    #[must_use]
    pub fn lasso_fill_color(&self) -> Rgba {
        Rgba::from_array(self.lasso_fill)
    }
}
