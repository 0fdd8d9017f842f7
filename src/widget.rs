//! Widget state controller.
//!
//! [`PickerWidget`] owns every piece of mutable state for one scatterplot:
//! the raw data-space inputs, their viewport-space derivatives, the active
//! interaction mode and the grid overlay flag. Inputs arrive as full updates,
//! resizes, toolbar actions, lasso polygons and camera changes; each one
//! re-derives what it touched and hands a fresh [`Frame`] to the renderer.
//!
//! Data-space inputs are kept so a resize can rescale without recomputing the
//! data bounds.

use serde_json::Value;
use tracing::{debug, debug_span, trace};

use crate::channel::{HostChannel, OutboundEvent};
use crate::color::Rgba;
use crate::config::PickerConfig;
use crate::contour::{cells_to_contours, Contour};
use crate::debounce::{Clock, Debouncer};
use crate::error::Result;
use crate::geometry::{Bounds, Point};
use crate::interaction::{cursor_for, CursorKind, DragState, InteractionMode, ToolbarAction};
use crate::model::{rescale_cells, GridCell, LabeledPoint};
use crate::payload::{FullUpdate, RenderPayload, RendererProps, DEFAULT_POINT_COLOR};
use crate::renderer::{styled_layers, CursorPolicy, DrawLayer, Frame, Renderer, ScatterPoint, ToolbarState};
use crate::scale::{bounding_box_of, rescale_with};
use crate::selection::{select_within, LassoPolygon};
use crate::viewport::{PanelSize, ViewState, ViewStatePatch, ViewportState};

/// One scatterplot picker.
#[derive(Debug)]
pub struct PickerWidget<R, H, C: Clock> {
    id: String,
    config: PickerConfig,
    size: PanelSize,
    viewport: ViewportState,

    mode: InteractionMode,
    drag: DragState,
    show_grid: bool,
    grid_toggle_visible: bool,
    show_controls: bool,

    raw_points: Vec<Point>,
    raw_label_anchors: Vec<LabeledPoint>,
    raw_cells: Option<Vec<GridCell>>,

    points: Vec<Point>,
    label_anchors: Vec<LabeledPoint>,
    contours: Vec<Contour>,

    colors: Vec<Rgba>,
    active_colors: Vec<Rgba>,
    grid_palette: Option<Vec<Rgba>>,
    labels: Vec<String>,
    title: String,
    grid_legend_items: Option<Value>,
    props: RendererProps,
    view_state: ViewState,

    resize: Debouncer<PanelSize, C>,
    renderer: R,
    channel: H,
}

impl<R: Renderer, H: HostChannel, C: Clock> PickerWidget<R, H, C> {
    /// Create an empty widget. Nothing is drawn until the first update.
    pub fn new(id: impl Into<String>, size: PanelSize, config: PickerConfig, renderer: R, channel: H, clock: C) -> Self {
        let resize = Debouncer::new(config.resize_debounce(), clock);
        let view_state = config.initial_view();
        let viewport = ViewportState { from: Bounds::default(), to: size.target_box(config.margin) };
        Self {
            id: id.into(),
            config,
            size,
            viewport,
            mode: InteractionMode::default(),
            drag: DragState::Idle,
            show_grid: false,
            grid_toggle_visible: false,
            show_controls: true,
            raw_points: Vec::new(),
            raw_label_anchors: Vec::new(),
            raw_cells: None,
            points: Vec::new(),
            label_anchors: Vec::new(),
            contours: Vec::new(),
            colors: Vec::new(),
            active_colors: Vec::new(),
            grid_palette: None,
            labels: Vec::new(),
            title: String::new(),
            grid_legend_items: None,
            props: RendererProps::default(),
            view_state,
            resize,
            renderer,
            channel,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Widget id, also the prefix of every outbound topic.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &PickerConfig {
        &self.config
    }

    /// Current panel size.
    #[must_use]
    pub fn size(&self) -> PanelSize {
        self.size
    }

    /// Cached data and target bounds.
    #[must_use]
    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    /// Current interaction mode.
    #[must_use]
    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    /// Cursor for the current mode and drag state.
    #[must_use]
    pub fn cursor(&self) -> CursorKind {
        cursor_for(self.mode, self.drag)
    }

    /// Returns true if the grid overlay is shown.
    #[must_use]
    pub fn show_grid(&self) -> bool {
        self.show_grid
    }

    /// Returns true if the grid toggle button is offered.
    #[must_use]
    pub fn grid_toggle_visible(&self) -> bool {
        self.grid_toggle_visible
    }

    /// Returns true if the pan and lasso buttons are shown.
    #[must_use]
    pub fn show_controls(&self) -> bool {
        self.show_controls
    }

    /// Number of points.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.raw_points.len()
    }

    /// Points in viewport space.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Label anchors in viewport space.
    #[must_use]
    pub fn label_anchors(&self) -> &[LabeledPoint] {
        &self.label_anchors
    }

    /// Grid contours in viewport space.
    #[must_use]
    pub fn contours(&self) -> &[Contour] {
        &self.contours
    }

    /// Host-supplied point colors.
    #[must_use]
    pub fn colors(&self) -> &[Rgba] {
        &self.colors
    }

    /// Colors currently used to fill points.
    #[must_use]
    pub fn active_colors(&self) -> &[Rgba] {
        &self.active_colors
    }

    /// Tooltip text by point index.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Tooltip for point `index`.
    #[must_use]
    pub fn tooltip(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    /// Title text.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Current camera.
    #[must_use]
    pub fn view_state(&self) -> ViewState {
        self.view_state
    }

    /// Returns true if a resize is waiting for its quiet period.
    #[must_use]
    pub fn resize_pending(&self) -> bool {
        self.resize.is_pending()
    }

    // ========================================================================
    // Full updates and resizing
    // ========================================================================

    /// Decode and apply a host payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload fails validation; the widget is left
    /// unchanged in that case.
    pub fn apply_payload(&mut self, payload: &RenderPayload) -> Result<()> {
        let update = payload.decode()?;
        self.apply_full_update(update);
        Ok(())
    }

    /// Replace all data, recompute the data bounds, and render.
    pub fn apply_full_update(&mut self, update: FullUpdate) {
        let _span = debug_span!("full_update", widget = %self.id, points = update.points.len()).entered();

        let fitted = bounding_box_of(&update.points);
        let x_from = update.x_range.or(fitted.map(|b| b.x)).unwrap_or_default();
        let y_from = update.y_range.or(fitted.map(|b| b.y)).unwrap_or_default();
        self.viewport = ViewportState { from: Bounds::new(x_from, y_from), to: self.target_box() };
        debug!(?x_from, ?y_from, "data bounds");

        self.raw_points = update.points;
        self.raw_label_anchors = update.label_anchors;
        self.raw_cells = update.cells;
        self.colors = update.colors;
        self.grid_palette = update.grid_palette;
        self.swap_fill();
        self.labels = update.labels;
        self.title = update.title;
        self.show_controls = update.show_controls;
        self.grid_legend_items = update.grid_legend_items;
        self.props = update.renderer_props;

        if self.raw_cells.is_some() {
            self.grid_toggle_visible = true;
        } else {
            if self.show_grid {
                self.flip_grid();
            }
            self.grid_toggle_visible = false;
        }

        self.rederive();
        self.render();
    }

    /// Queue a resize; it applies once `tick` runs after the quiet period.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidDimensions`] for negative or non-finite sizes.
    pub fn request_resize(&mut self, width: f64, height: f64) -> Result<()> {
        let size = PanelSize::new(width, height)?;
        trace!(widget = %self.id, width, height, "resize requested");
        self.resize.schedule(size);
        Ok(())
    }

    /// Apply a pending resize whose quiet period has elapsed.
    ///
    /// Returns true if a resize was applied.
    pub fn tick(&mut self) -> bool {
        match self.resize.poll() {
            Some(size) => {
                self.apply_resize(size);
                true
            }
            None => false,
        }
    }

    /// Recompute the target box for `size`, rescale with the cached data
    /// bounds, and render.
    pub fn apply_resize(&mut self, size: PanelSize) {
        debug!(widget = %self.id, width = size.width, height = size.height, "resize");
        self.size = size;
        self.viewport.to = self.target_box();
        self.rederive();
        self.render();
    }

    fn target_box(&self) -> Bounds {
        self.size.target_box(self.config.margin)
    }

    fn rederive(&mut self) {
        let transform = self.viewport.transform();
        self.points = rescale_with(&self.raw_points, &transform);
        self.label_anchors = rescale_with(&self.raw_label_anchors, &transform);
        self.contours = self
            .raw_cells
            .as_deref()
            .map(|cells| cells_to_contours(&rescale_cells(cells, &transform)))
            .unwrap_or_default();
    }

    // ========================================================================
    // Interaction
    // ========================================================================

    /// Switch interaction mode and render.
    pub fn set_mode(&mut self, mode: InteractionMode) {
        debug!(widget = %self.id, ?mode, "mode change");
        self.mode = mode;
        self.drag = DragState::Idle;
        self.render();
    }

    /// Handle a toolbar button press.
    pub fn handle_toolbar(&mut self, action: ToolbarAction) {
        match action.target_mode() {
            Some(mode) => self.set_mode(mode),
            None => self.toggle_grid(),
        }
    }

    /// Record whether the pointer is dragging.
    pub fn set_drag_state(&mut self, drag: DragState) {
        self.drag = drag;
    }

    /// Show or hide the grid overlay, notify the host, and render.
    pub fn toggle_grid(&mut self) {
        self.flip_grid();
        self.render();
    }

    /// Flip the grid flag and notify the host. Does not render.
    pub fn flip_grid(&mut self) {
        self.show_grid = !self.show_grid;
        self.swap_fill();
        debug!(widget = %self.id, show_grid = self.show_grid, "grid toggled");
        self.channel.send(&self.id, OutboundEvent::ShowGrid(self.show_grid));
    }

    /// Fill with the grid palette while the grid is shown, else the host colors.
    fn swap_fill(&mut self) {
        self.active_colors = match (&self.grid_palette, self.show_grid) {
            (Some(palette), true) => palette.clone(),
            _ => self.colors.clone(),
        };
    }

    /// Select the points inside a completed lasso polygon and send their
    /// indices to the host.
    pub fn on_polygon_drawn(&mut self, vertices: Vec<Point>) -> Vec<usize> {
        let polygon = LassoPolygon::new(vertices);
        let selected = select_within(&self.points, &polygon);
        debug!(widget = %self.id, vertices = polygon.vertices().len(), selected = selected.len(), "lasso");
        self.channel.send(&self.id, OutboundEvent::SelectedPoints(selected.clone()));
        selected
    }

    /// Accept a camera change from the renderer, echo it to the host, and
    /// return the state the renderer should adopt.
    pub fn on_view_state_change(&mut self, view: ViewState) -> ViewState {
        let settled = view.settled();
        self.view_state = settled;
        trace!(widget = %self.id, zoom = settled.zoom, "view state");
        self.channel.send(&self.id, OutboundEvent::ViewState(settled.echo()));
        settled
    }

    // ========================================================================
    // Partial updates
    //
    // These change one slice of state and do not render.
    // ========================================================================

    /// Merge `patch` over the initial view and move the camera.
    pub fn set_view_state(&mut self, patch: &ViewStatePatch) {
        self.view_state = self.config.initial_view().merged(patch);
        self.renderer.set_view_state(&self.view_state);
    }

    /// Replace both the displayed and the baseline point colors.
    ///
    /// Takes effect immediately, even while the grid palette is shown; the
    /// next grid toggle swaps between the palette and these colors.
    pub fn set_colors(&mut self, colors: Vec<Rgba>) {
        self.active_colors.clone_from(&colors);
        self.colors = colors;
    }

    /// Replace the label anchors, rescaling with the cached bounds.
    pub fn set_label_anchors(&mut self, anchors: Vec<LabeledPoint>) {
        self.label_anchors = rescale_with(&anchors, &self.viewport.transform());
        self.raw_label_anchors = anchors;
    }

    /// Replace the grid cells, rescaling with the cached bounds, and offer
    /// the grid toggle.
    pub fn set_cells(&mut self, cells: Vec<GridCell>) {
        self.contours = cells_to_contours(&rescale_cells(&cells, &self.viewport.transform()));
        self.raw_cells = Some(cells);
        self.grid_toggle_visible = true;
    }

    /// Replace the tooltip text.
    pub fn set_labels(&mut self, labels: Vec<String>) {
        self.labels = labels;
    }

    /// Replace the title.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// Assemble the current frame.
    #[must_use]
    pub fn frame(&self) -> Frame {
        let (mut scatter, mut grid, mut text) = styled_layers(&self.config);
        let fills = self.active_colors();
        scatter.points = self
            .points
            .iter()
            .enumerate()
            .map(|(index, &position)| ScatterPoint {
                index,
                position,
                fill: fills.get(index).copied().unwrap_or(DEFAULT_POINT_COLOR),
            })
            .collect();
        grid.contours = self.contours.clone();
        grid.visible = self.show_grid && self.grid_toggle_visible;
        text.labels = self.label_anchors.clone();

        Frame {
            scatter,
            grid,
            text,
            draw: DrawLayer { mode: self.mode, fill: self.config.lasso_fill_color() },
            cursor: CursorPolicy::new(self.mode),
            toolbar: ToolbarState {
                show_mode_buttons: self.show_controls,
                show_grid_toggle: self.grid_toggle_visible,
                grid_active: self.show_grid,
                active_mode: self.mode,
            },
            tooltips: self.labels.clone(),
            title: self.title.clone(),
            grid_legend_items: self.grid_legend_items.clone(),
            props: self.props.clone(),
        }
    }

    /// Hand the current frame to the renderer.
    pub fn render(&mut self) {
        let frame = self.frame();
        trace!(widget = %self.id, points = frame.scatter.points.len(), "render");
        self.renderer.render(&frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::RecordingChannel;
    use crate::debounce::ManualClock;
    use crate::geometry::{Range, Rect};
    use crate::renderer::RecordingRenderer;
    use approx::assert_relative_eq;
    use serde_json::json;
    use std::time::Duration;

    type TestWidget = PickerWidget<RecordingRenderer, RecordingChannel, ManualClock>;

    struct Harness {
        widget: TestWidget,
        renderer: RecordingRenderer,
        channel: RecordingChannel,
        clock: ManualClock,
    }

    fn harness() -> Harness {
        let renderer = RecordingRenderer::new();
        let channel = RecordingChannel::new();
        let clock = ManualClock::new();
        let widget = PickerWidget::new(
            "w",
            PanelSize::new(120.0, 120.0).unwrap(),
            PickerConfig::default(),
            renderer.clone(),
            channel.clone(),
            clock.clone(),
        );
        Harness { widget, renderer, channel, clock }
    }

    fn triangle_update() -> FullUpdate {
        RenderPayload::from_json(
            r#"{
                "coords": {"x": [0, 10, 5], "y": [0, 0, 10]},
                "colors": ["red", "green", "blue"],
                "labels": ["a", "b", "c"],
                "polygons": {"x1": [0], "y1": [0], "x2": [10], "y2": [10], "color": ["grey"]},
                "pointColorPolygons": ["black"]
            }"#,
        )
        .unwrap()
        .decode()
        .unwrap()
    }

    #[test]
    fn test_full_update_rescales_into_target_box() {
        let mut h = harness();
        h.widget.apply_full_update(triangle_update());

        assert_eq!(h.widget.points()[0], Point::new(-50.0, -50.0));
        assert_eq!(h.widget.points()[1], Point::new(50.0, -50.0));
        assert_eq!(h.widget.points()[2], Point::new(0.0, 50.0));
        assert_eq!(h.widget.contours().len(), 1);
        assert!(h.widget.grid_toggle_visible());
        assert_eq!(h.renderer.render_count(), 1);
    }

    #[test]
    fn test_explicit_ranges_override_fit() {
        let mut h = harness();
        let mut update = triangle_update();
        update.x_range = Some(Range::new(0.0, 20.0));
        h.widget.apply_full_update(update);

        assert_relative_eq!(h.widget.points()[1].x, 0.0);
        assert_eq!(h.widget.viewport().from.x, Range::new(0.0, 20.0));
    }

    #[test]
    fn test_empty_update_is_finite() {
        let mut h = harness();
        let update = RenderPayload::from_json(r#"{"coords": {"x": [], "y": []}}"#).unwrap().decode().unwrap();
        h.widget.apply_full_update(update);

        assert!(h.widget.points().is_empty());
        assert_eq!(h.widget.viewport().from, Bounds::default());
        assert!(!h.widget.grid_toggle_visible());
    }

    #[test]
    fn test_single_point_pins_to_midpoint() {
        let mut h = harness();
        let update = RenderPayload::from_json(r#"{"coords": {"x": [7], "y": [3]}}"#).unwrap().decode().unwrap();
        h.widget.apply_full_update(update);

        assert_eq!(h.widget.points()[0], Point::ORIGIN);
    }

    #[test]
    fn test_grid_toggle_swaps_palette() {
        let mut h = harness();
        h.widget.apply_full_update(triangle_update());
        let original = h.widget.colors().to_vec();

        h.widget.toggle_grid();
        assert!(h.widget.show_grid());
        assert_eq!(h.widget.active_colors(), &[Rgba::BLACK; 3]);
        assert!(h.renderer.last_frame().unwrap().grid.visible);

        h.widget.toggle_grid();
        assert_eq!(h.widget.active_colors(), original.as_slice());
        assert_eq!(h.channel.messages_named("w_show_grid"), vec![json!(true), json!(false)]);
    }

    #[test]
    fn test_update_without_polygons_turns_grid_off() {
        let mut h = harness();
        h.widget.apply_full_update(triangle_update());
        h.widget.toggle_grid();

        let mut update = triangle_update();
        update.cells = None;
        h.widget.apply_full_update(update);

        assert!(!h.widget.show_grid());
        assert!(!h.widget.grid_toggle_visible());
        assert!(h.widget.contours().is_empty());
        let frame = h.renderer.last_frame().unwrap();
        assert!(!frame.toolbar.show_grid_toggle);
        assert!(!frame.grid.visible);
    }

    #[test]
    fn test_resize_is_debounced() {
        let mut h = harness();
        h.widget.apply_full_update(triangle_update());
        let renders = h.renderer.render_count();

        for i in 0..5u32 {
            h.widget.request_resize(200.0 + f64::from(i), 100.0).unwrap();
            h.clock.advance(Duration::from_millis(10));
            assert!(!h.widget.tick());
        }
        h.clock.advance(Duration::from_millis(50));
        assert!(h.widget.tick());
        assert!(!h.widget.tick());

        assert_eq!(h.renderer.render_count(), renders + 1);
        assert_eq!(h.widget.size(), PanelSize::new(204.0, 100.0).unwrap());
        assert_eq!(h.widget.viewport().from.x, Range::new(0.0, 10.0));
        assert_eq!(h.widget.points()[1], Point::new(92.0, -40.0));
    }

    #[test]
    fn test_resize_below_margins_collapses_to_centre() {
        let mut h = harness();
        h.widget.apply_full_update(triangle_update());

        h.widget.request_resize(15.0, 15.0).unwrap();
        h.clock.advance(Duration::from_millis(100));
        assert!(h.widget.tick());

        assert_eq!(h.widget.viewport().to, Bounds::new(Range::new(0.0, 0.0), Range::new(0.0, 0.0)));
        assert!(h.widget.points().iter().all(|p| *p == Point::ORIGIN));
        assert!(h.widget.viewport().transform().invert(Point::ORIGIN).x.is_finite());
    }

    #[test]
    fn test_resize_rejects_bad_size() {
        let mut h = harness();
        assert!(h.widget.request_resize(-5.0, 10.0).is_err());
        assert!(!h.widget.resize_pending());
    }

    #[test]
    fn test_toolbar_mode_switch() {
        let mut h = harness();
        h.widget.handle_toolbar(ToolbarAction::SelectLasso);
        assert_eq!(h.widget.mode(), InteractionMode::Lasso);
        assert_eq!(h.widget.cursor(), CursorKind::Cell);
        assert_eq!(h.renderer.last_frame().unwrap().draw.mode, InteractionMode::Lasso);

        h.widget.handle_toolbar(ToolbarAction::SelectPan);
        h.widget.set_drag_state(DragState::Dragging);
        assert_eq!(h.widget.cursor(), CursorKind::Grabbing);
    }

    #[test]
    fn test_lasso_sends_selection() {
        let mut h = harness();
        h.widget.apply_full_update(triangle_update());
        h.widget.set_mode(InteractionMode::Lasso);

        let lasso = vec![Point::new(-60.0, -60.0), Point::new(60.0, -60.0), Point::new(60.0, 0.0), Point::new(-60.0, 0.0)];
        assert_eq!(h.widget.on_polygon_drawn(lasso), vec![0, 1]);
        assert_eq!(h.channel.messages_named("w_selected_points"), vec![json!([0, 1])]);
    }

    #[test]
    fn test_degenerate_lasso_selects_nothing() {
        let mut h = harness();
        h.widget.apply_full_update(triangle_update());
        assert!(h.widget.on_polygon_drawn(vec![Point::ORIGIN, Point::new(1.0, 1.0)]).is_empty());
        assert_eq!(h.channel.messages_named("w_selected_points"), vec![json!([])]);
    }

    #[test]
    fn test_view_state_zoom_zero_recentres() {
        let mut h = harness();
        let moved = ViewState { target: Point::new(12.0, -3.0), zoom: 0.0, ..ViewState::default() };
        let settled = h.widget.on_view_state_change(moved);

        assert_eq!(settled.target, Point::ORIGIN);
        assert_eq!(h.channel.messages_named("w_view_state"), vec![json!({"zoom": 0.0, "target": [0.0, 0.0]})]);

        let zoomed = ViewState { zoom: 2.0, ..moved };
        assert_eq!(h.widget.on_view_state_change(zoomed).target, Point::new(12.0, -3.0));
    }

    #[test]
    fn test_tooltip_includes_index_zero() {
        let mut h = harness();
        h.widget.apply_full_update(triangle_update());
        assert_eq!(h.widget.tooltip(0), Some("a"));
        assert_eq!(h.widget.tooltip(3), None);
        assert_eq!(h.renderer.last_frame().unwrap().tooltip(2), Some("c"));
    }

    #[test]
    fn test_hidden_controls_reach_frame() {
        let mut h = harness();
        let mut update = triangle_update();
        update.show_controls = false;
        h.widget.apply_full_update(update);
        assert!(!h.renderer.last_frame().unwrap().toolbar.show_mode_buttons);
    }

    #[test]
    fn test_set_cells_uses_cached_bounds() {
        let mut h = harness();
        let mut update = triangle_update();
        update.cells = None;
        h.widget.apply_full_update(update);

        h.widget.set_cells(vec![GridCell::new(Rect::new(0.0, 0.0, 5.0, 5.0), Rgba::RED)]);
        assert!(h.widget.grid_toggle_visible());
        assert_eq!(h.widget.contours()[0].ring[2], Point::new(0.0, 0.0));
        assert_eq!(h.widget.contours()[0].ring[0], Point::new(-50.0, -50.0));
    }
}
