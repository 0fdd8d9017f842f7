//! Renderer boundary.
//!
//! The widget never draws. After every state change it assembles a [`Frame`]
//! of freshly derived, viewport-space layers and hands it to a [`Renderer`].
//! The renderer reports back exactly one event the widget cares about, a
//! completed lasso polygon, via [`crate::widget::PickerWidget::on_polygon_drawn`].

use std::cell::RefCell;
use std::rc::Rc;

use crate::color::Rgba;
use crate::config::PickerConfig;
use crate::contour::Contour;
use crate::geometry::Point;
use crate::interaction::{cursor_for, CursorKind, DragState, InteractionMode};
use crate::model::LabeledPoint;
use crate::payload::RendererProps;
use crate::viewport::ViewState;

/// One displayed data point.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    /// Index in the host's point list.
    pub index: usize,
    /// Viewport-space position.
    pub position: Point,
    /// Fill color.
    pub fill: Rgba,
}

/// Scatter layer.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterLayer {
    /// Points in index order.
    pub points: Vec<ScatterPoint>,
    /// Smallest radius in pixels.
    pub radius_min_pixels: f64,
    /// Largest radius in pixels.
    pub radius_max_pixels: f64,
    /// Layer opacity.
    pub opacity: f64,
    /// Outline color.
    pub line_color: Rgba,
}

/// Grid contour layer.
#[derive(Debug, Clone, PartialEq)]
pub struct GridLayer {
    /// Cell outlines.
    pub contours: Vec<Contour>,
    /// Whether the overlay is drawn.
    pub visible: bool,
    /// Outline color.
    pub line_color: Rgba,
    /// Outline width in pixels.
    pub line_width: f64,
}

/// Text label layer.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLayer {
    /// Viewport-space label anchors.
    pub labels: Vec<LabeledPoint>,
    /// Font size in pixels.
    pub size: f64,
    /// Text color.
    pub color: Rgba,
    /// Background box color.
    pub background: Rgba,
    /// Font family list.
    pub font_family: String,
}

/// Freehand drawing layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawLayer {
    /// Drawing is enabled only in lasso mode.
    pub mode: InteractionMode,
    /// Fill of the in-progress polygon.
    pub fill: Rgba,
}

/// Cursor policy for the active mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorPolicy {
    mode: InteractionMode,
}

impl CursorPolicy {
    /// Policy for `mode`.
    #[must_use]
    pub const fn new(mode: InteractionMode) -> Self {
        Self { mode }
    }

    /// Cursor for the current drag state.
    #[must_use]
    pub const fn cursor(&self, drag: DragState) -> CursorKind {
        cursor_for(self.mode, drag)
    }
}

/// Visibility of the toolbar buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolbarState {
    /// Pan and lasso buttons shown.
    pub show_mode_buttons: bool,
    /// Grid toggle button shown.
    pub show_grid_toggle: bool,
    /// Grid toggle is in its active state.
    pub grid_active: bool,
    /// Highlighted mode button.
    pub active_mode: InteractionMode,
}

/// Everything a renderer needs for one draw.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Scatter points.
    pub scatter: ScatterLayer,
    /// Grid overlay.
    pub grid: GridLayer,
    /// Text labels.
    pub text: TextLayer,
    /// Lasso drawing layer.
    pub draw: DrawLayer,
    /// Cursor policy.
    pub cursor: CursorPolicy,
    /// Toolbar state.
    pub toolbar: ToolbarState,
    /// Tooltip text by point index.
    pub tooltips: Vec<String>,
    /// Title text.
    pub title: String,
    /// Grid legend entries, forwarded untouched.
    pub grid_legend_items: Option<serde_json::Value>,
    /// Pass-through layer properties.
    pub props: RendererProps,
}

impl Frame {
    /// Tooltip for the point under the pointer.
    #[must_use]
    pub fn tooltip(&self, index: usize) -> Option<&str> {
        self.tooltips.get(index).map(String::as_str)
    }
}

/// Build the static layer styling from configuration.
pub(crate) fn styled_layers(config: &PickerConfig) -> (ScatterLayer, GridLayer, TextLayer) {
    let scatter = ScatterLayer {
        points: Vec::new(),
        radius_min_pixels: config.points.radius_min_pixels,
        radius_max_pixels: config.points.radius_max_pixels,
        opacity: config.points.opacity,
        line_color: Rgba::from_array(config.points.line_color),
    };
    let grid = GridLayer {
        contours: Vec::new(),
        visible: false,
        line_color: Rgba::from_array(config.grid.line_color),
        line_width: config.grid.line_width,
    };
    let text = TextLayer {
        labels: Vec::new(),
        size: config.labels.size,
        color: Rgba::from_array(config.labels.color),
        background: Rgba::from_array(config.labels.background),
        font_family: config.labels.font_family.clone(),
    };
    (scatter, grid, text)
}

/// Drawing backend.
pub trait Renderer {
    /// Draw a frame.
    fn render(&mut self, frame: &Frame);

    /// Move the camera.
    fn set_view_state(&mut self, view: &ViewState);
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn render(&mut self, frame: &Frame) {
        (**self).render(frame);
    }

    fn set_view_state(&mut self, view: &ViewState) {
        (**self).set_view_state(view);
    }
}

/// Renderer that draws nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _frame: &Frame) {}

    fn set_view_state(&mut self, _view: &ViewState) {}
}

#[derive(Debug, Default)]
struct Recorded {
    frames: Vec<Frame>,
    views: Vec<ViewState>,
}

/// Renderer that keeps every frame and camera change; clones share storage.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    inner: Rc<RefCell<Recorded>>,
}

impl RecordingRenderer {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frames rendered so far.
    #[must_use]
    pub fn render_count(&self) -> usize {
        self.inner.borrow().frames.len()
    }

    /// Most recent frame.
    #[must_use]
    pub fn last_frame(&self) -> Option<Frame> {
        self.inner.borrow().frames.last().cloned()
    }

    /// Most recent camera state.
    #[must_use]
    pub fn last_view_state(&self) -> Option<ViewState> {
        self.inner.borrow().views.last().copied()
    }
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, frame: &Frame) {
        self.inner.borrow_mut().frames.push(frame.clone());
    }

    fn set_view_state(&mut self, view: &ViewState) {
        self.inner.borrow_mut().views.push(*view);
    }
}
