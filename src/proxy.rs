//! Incremental host updates.
//!
//! A [`ProxyCommand`] names a widget by id and carries only the fields that
//! changed. Every field is validated before any is applied, and the widget
//! renders once per command.

use std::collections::HashMap;

use tracing::{debug, debug_span};

use crate::channel::HostChannel;
use crate::debounce::Clock;
use crate::error::Result;
use crate::payload::{decode_point_colors, LabelTable, PolygonTable, ProxyCommand};
use crate::renderer::Renderer;
use crate::widget::PickerWidget;

/// Apply `cmd` to `widget`, ignoring the command's id.
///
/// # Errors
///
/// Returns an error if any field fails validation; nothing is applied in
/// that case.
pub fn apply_proxy<R: Renderer, H: HostChannel, C: Clock>(
    widget: &mut PickerWidget<R, H, C>,
    cmd: &ProxyCommand,
) -> Result<()> {
    let _span = debug_span!("proxy", widget = %widget.id()).entered();

    let colors =
        cmd.colors.as_ref().map(|specs| decode_point_colors("colors", specs, widget.point_count())).transpose()?;
    let anchors = cmd.label_coords.as_ref().map(LabelTable::rows).transpose()?;
    let cells = cmd.polygons.as_ref().map(PolygonTable::cells).transpose()?;

    if let Some(patch) = &cmd.view_state {
        debug!(?patch, "view state");
        widget.set_view_state(patch);
    }
    if let Some(colors) = colors {
        debug!(count = colors.len(), "colors");
        widget.set_colors(colors);
    }
    if let Some(anchors) = anchors {
        debug!(count = anchors.len(), "label anchors");
        widget.set_label_anchors(anchors);
    }
    if let Some(cells) = cells {
        debug!(count = cells.len(), "grid cells");
        widget.set_cells(cells);
    }
    if let Some(labels) = &cmd.labels {
        widget.set_labels(labels.clone());
    }
    if cmd.show_grid == Some(true) && !widget.show_grid() {
        widget.flip_grid();
    }
    if let Some(title) = &cmd.title {
        widget.set_title(title.as_str());
    }

    widget.render();
    Ok(())
}

/// Live widgets by id.
#[derive(Debug)]
pub struct WidgetDirectory<R, H, C: Clock> {
    widgets: HashMap<String, PickerWidget<R, H, C>>,
}

impl<R, H, C: Clock> Default for WidgetDirectory<R, H, C> {
    fn default() -> Self {
        Self { widgets: HashMap::new() }
    }
}

impl<R: Renderer, H: HostChannel, C: Clock> WidgetDirectory<R, H, C> {
    /// Create an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a widget under its id, returning any widget it replaces.
    pub fn insert(&mut self, widget: PickerWidget<R, H, C>) -> Option<PickerWidget<R, H, C>> {
        self.widgets.insert(widget.id().to_string(), widget)
    }

    /// Unregister a widget.
    pub fn remove(&mut self, id: &str) -> Option<PickerWidget<R, H, C>> {
        self.widgets.remove(id)
    }

    /// Look up a widget.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&PickerWidget<R, H, C>> {
        self.widgets.get(id)
    }

    /// Look up a widget for mutation.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut PickerWidget<R, H, C>> {
        self.widgets.get_mut(id)
    }

    /// Number of registered widgets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    /// Returns true if no widget is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    /// Route a command to the widget it names.
    ///
    /// Returns `Ok(false)` if no widget has that id.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails validation.
    pub fn dispatch(&mut self, cmd: &ProxyCommand) -> Result<bool> {
        match self.widgets.get_mut(&cmd.id) {
            Some(widget) => apply_proxy(widget, cmd).map(|()| true),
            None => {
                debug!(id = %cmd.id, "proxy command for unknown widget");
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::RecordingChannel;
    use crate::color::Rgba;
    use crate::config::PickerConfig;
    use crate::debounce::ManualClock;
    use crate::geometry::Point;
    use crate::payload::RenderPayload;
    use crate::renderer::RecordingRenderer;
    use crate::viewport::PanelSize;
    use serde_json::json;

    type Directory = WidgetDirectory<RecordingRenderer, RecordingChannel, ManualClock>;

    fn directory() -> (Directory, RecordingRenderer, RecordingChannel) {
        let renderer = RecordingRenderer::new();
        let channel = RecordingChannel::new();
        let mut widget = PickerWidget::new(
            "w",
            PanelSize::new(120.0, 120.0).unwrap(),
            PickerConfig::default(),
            renderer.clone(),
            channel.clone(),
            ManualClock::new(),
        );
        let payload = RenderPayload::from_json(
            r#"{
                "coords": {"x": [0, 10, 5], "y": [0, 0, 10]},
                "labelCoords": {"x": [5], "y": [5], "label": ["mid"]},
                "colors": ["red"],
                "labels": ["a", "b", "c"],
                "polygons": {"x1": [0], "y1": [0], "x2": [10], "y2": [10], "color": ["grey"]},
                "pointColorPolygons": ["black"]
            }"#,
        )
        .unwrap();
        widget.apply_payload(&payload).unwrap();

        let mut dir = Directory::new();
        dir.insert(widget);
        (dir, renderer, channel)
    }

    #[test]
    fn test_colors_only_leaves_geometry() {
        let (mut dir, renderer, _) = directory();
        let before = dir.get("w").unwrap();
        let (points, anchors, contours, labels) =
            (before.points().to_vec(), before.label_anchors().to_vec(), before.contours().to_vec(), before.labels().to_vec());
        let renders = renderer.render_count();

        let cmd = ProxyCommand::from_json(r#"{"id": "w", "colors": ["blue", "navy", "teal"]}"#).unwrap();
        assert!(dir.dispatch(&cmd).unwrap());

        let after = dir.get("w").unwrap();
        assert_eq!(after.colors()[0], Rgba::rgb(0, 0, 255));
        assert_eq!(after.points(), points.as_slice());
        assert_eq!(after.label_anchors(), anchors.as_slice());
        assert_eq!(after.contours(), contours.as_slice());
        assert_eq!(after.labels(), labels.as_slice());
        assert_eq!(renderer.render_count(), renders + 1);
    }

    #[test]
    fn test_unknown_id_is_noop() {
        let (mut dir, renderer, channel) = directory();
        let renders = renderer.render_count();

        let cmd = ProxyCommand::from_json(r#"{"id": "missing", "title": "x", "showGrid": true}"#).unwrap();
        assert!(!dir.dispatch(&cmd).unwrap());
        assert_eq!(renderer.render_count(), renders);
        assert!(channel.messages().is_empty());
        assert_eq!(dir.get("w").unwrap().title(), "");
    }

    #[test]
    fn test_invalid_field_applies_nothing() {
        let (mut dir, renderer, _) = directory();
        let renders = renderer.render_count();

        let cmd = ProxyCommand::from_json(r#"{"id": "w", "title": "new", "colors": ["notacolor"]}"#).unwrap();
        assert!(dir.dispatch(&cmd).is_err());
        assert_eq!(dir.get("w").unwrap().title(), "");
        assert_eq!(renderer.render_count(), renders);
    }

    #[test]
    fn test_show_grid_only_turns_on() {
        let (mut dir, _, channel) = directory();

        let on = ProxyCommand { show_grid: Some(true), ..ProxyCommand::for_widget("w") };
        dir.dispatch(&on).unwrap();
        dir.dispatch(&on).unwrap();
        assert!(dir.get("w").unwrap().show_grid());
        assert_eq!(channel.messages_named("w_show_grid"), vec![json!(true)]);

        let off = ProxyCommand { show_grid: Some(false), ..ProxyCommand::for_widget("w") };
        dir.dispatch(&off).unwrap();
        assert!(dir.get("w").unwrap().show_grid());
    }

    #[test]
    fn test_colors_while_grid_shown_apply_immediately() {
        let (mut dir, renderer, _) = directory();
        dir.get_mut("w").unwrap().toggle_grid();
        assert_eq!(dir.get("w").unwrap().active_colors(), &[Rgba::BLACK; 3]);

        let cmd = ProxyCommand::from_json(r#"{"id": "w", "colors": ["white"]}"#).unwrap();
        dir.dispatch(&cmd).unwrap();

        let fills = |r: &RecordingRenderer| r.last_frame().unwrap().scatter.points.iter().map(|p| p.fill).collect::<Vec<_>>();
        assert!(dir.get("w").unwrap().show_grid());
        assert_eq!(fills(&renderer), vec![Rgba::WHITE; 3]);

        let widget = dir.get_mut("w").unwrap();
        widget.toggle_grid();
        assert_eq!(fills(&renderer), vec![Rgba::WHITE; 3]);
        widget.toggle_grid();
        assert_eq!(fills(&renderer), vec![Rgba::BLACK; 3]);
        widget.toggle_grid();
        assert_eq!(fills(&renderer), vec![Rgba::WHITE; 3]);
        assert_eq!(widget.colors(), &[Rgba::WHITE; 3]);
    }

    #[test]
    fn test_view_state_merges_over_initial() {
        let (mut dir, renderer, _) = directory();
        let cmd = ProxyCommand::from_json(r#"{"id": "w", "view-state": {"zoom": 4, "target": [1, 2]}}"#).unwrap();
        dir.dispatch(&cmd).unwrap();

        let view = renderer.last_view_state().unwrap();
        assert_eq!(view.zoom, 4.0);
        assert_eq!(view.target, Point::new(1.0, 2.0));
        assert_eq!(view.max_zoom, 10.0);
    }

    #[test]
    fn test_label_coordinates_use_cached_bounds() {
        let (mut dir, _, _) = directory();
        let cmd = ProxyCommand::from_json(
            r#"{"id": "w", "label-coordinates": {"x": [0, 10], "y": [0, 10], "label": ["lo", "hi"]}}"#,
        )
        .unwrap();
        dir.dispatch(&cmd).unwrap();

        let anchors = dir.get("w").unwrap().label_anchors().to_vec();
        assert_eq!((anchors[0].x, anchors[0].y), (-50.0, -50.0));
        assert_eq!((anchors[1].x, anchors[1].y), (50.0, 50.0));
        assert_eq!(anchors[1].label, "hi");
    }

    #[test]
    fn test_polygon_set_shows_toggle() {
        let renderer = RecordingRenderer::new();
        let mut widget = PickerWidget::new(
            "bare",
            PanelSize::new(120.0, 120.0).unwrap(),
            PickerConfig::default(),
            renderer.clone(),
            RecordingChannel::new(),
            ManualClock::new(),
        );
        widget.apply_payload(&RenderPayload::from_json(r#"{"coords": {"x": [0, 10], "y": [0, 10]}}"#).unwrap()).unwrap();
        assert!(!widget.grid_toggle_visible());

        let cmd = ProxyCommand::from_json(
            r#"{"id": "bare", "polygon-set": {"x1": [0], "y1": [0], "x2": [10], "y2": [10], "color": ["red"]}}"#,
        )
        .unwrap();
        apply_proxy(&mut widget, &cmd).unwrap();

        assert!(widget.grid_toggle_visible());
        assert_eq!(widget.contours().len(), 1);
        assert!(renderer.last_frame().unwrap().toolbar.show_grid_toggle);
    }
}
