//! End-to-end picker scenarios.
//!
//! Each test drives a widget through the public API the way a host and a
//! renderer would, and checks what reaches the renderer and the host.
//!
//! Run: cargo test --test picker_scenarios

#![allow(clippy::unwrap_used, clippy::float_cmp)]

use std::time::Duration;

use approx::assert_relative_eq;
use serde_json::json;

use scatter_picker::channel::RecordingChannel;
use scatter_picker::prelude::*;
use scatter_picker::renderer::RecordingRenderer;

type Widget = PickerWidget<RecordingRenderer, RecordingChannel, ManualClock>;

struct Scene {
    widget: Widget,
    renderer: RecordingRenderer,
    channel: RecordingChannel,
    clock: ManualClock,
}

fn scene(id: &str, width: f64, height: f64) -> Scene {
    let renderer = RecordingRenderer::new();
    let channel = RecordingChannel::new();
    let clock = ManualClock::new();
    let widget = PickerWidget::new(
        id,
        PanelSize::new(width, height).unwrap(),
        PickerConfig::default(),
        renderer.clone(),
        channel.clone(),
        clock.clone(),
    );
    Scene { widget, renderer, channel, clock }
}

const TRIANGLE: &str = r##"{
    "coords": {"x": [0, 10, 5], "y": [0, 0, 10]},
    "labelCoords": {"x": [5], "y": [5], "label": ["centre"]},
    "colors": ["#ff0000", "#00ff00", "#0000ff"],
    "labels": ["first", "second", "third"],
    "polygons": {"x1": [0, 5], "y1": [0, 0], "x2": [5, 10], "y2": [5, 5], "color": ["#eee", "#ddd"]},
    "pointColorPolygons": ["black", "black", "white"],
    "title": "Triangle"
}"##;

fn load_triangle(s: &mut Scene) {
    s.widget.apply_payload(&RenderPayload::from_json(TRIANGLE).unwrap()).unwrap();
}

// ============================================================================
// Rescaling
// ============================================================================

#[test]
fn triangle_fills_target_box() {
    let mut s = scene("w", 120.0, 120.0);
    load_triangle(&mut s);

    let frame = s.renderer.last_frame().unwrap();
    let pts: Vec<Point> = frame.scatter.points.iter().map(|p| p.position).collect();
    for p in &pts {
        assert!((-50.0..=50.0).contains(&p.x) && (-50.0..=50.0).contains(&p.y), "{p:?} outside box");
    }

    let cx = pts.iter().map(|p| p.x).sum::<f64>() / 3.0;
    let cy = pts.iter().map(|p| p.y).sum::<f64>() / 3.0;
    assert_relative_eq!(cx, 0.0, epsilon = 1e-9);
    assert_relative_eq!(cy, -50.0 + 100.0 / 3.0, epsilon = 1e-9);

    assert_eq!(frame.text.labels[0].label, "centre");
    assert_eq!((frame.text.labels[0].x, frame.text.labels[0].y), (0.0, 0.0));
    assert_eq!(frame.title, "Triangle");
}

#[test]
fn contours_follow_cells() {
    let mut s = scene("w", 120.0, 120.0);
    load_triangle(&mut s);

    let frame = s.renderer.last_frame().unwrap();
    assert_eq!(frame.grid.contours.len(), 2);
    assert_eq!(
        frame.grid.contours[0].ring,
        [Point::new(-50.0, -50.0), Point::new(-50.0, 0.0), Point::new(0.0, 0.0), Point::new(0.0, -50.0)]
    );
    assert_eq!(frame.grid.contours[1].color, Rgba::rgb(0xdd, 0xdd, 0xdd));
    assert!(!frame.grid.visible);
}

// ============================================================================
// Resize
// ============================================================================

#[test]
fn resize_burst_applies_once_with_last_size() {
    let mut s = scene("w", 120.0, 120.0);
    load_triangle(&mut s);
    let before = s.renderer.render_count();

    let sizes = [(200.0, 200.0), (210.0, 200.0), (220.0, 200.0), (230.0, 200.0), (240.0, 220.0)];
    for (w, h) in sizes {
        s.widget.request_resize(w, h).unwrap();
        s.clock.advance(Duration::from_millis(10));
        s.widget.tick();
    }
    assert_eq!(s.renderer.render_count(), before);

    s.clock.advance(Duration::from_millis(50));
    s.widget.tick();
    s.clock.advance(Duration::from_millis(500));
    s.widget.tick();

    assert_eq!(s.renderer.render_count(), before + 1);
    let frame = s.renderer.last_frame().unwrap();
    assert_eq!(frame.scatter.points[1].position, Point::new(110.0, -100.0));
}

// ============================================================================
// Lasso
// ============================================================================

#[test]
fn lasso_gesture_reports_indices() {
    let mut s = scene("plot", 120.0, 120.0);
    load_triangle(&mut s);
    s.widget.handle_toolbar(ToolbarAction::SelectLasso);
    assert_eq!(s.renderer.last_frame().unwrap().cursor.cursor(DragState::Idle), CursorKind::Cell);

    let picked = s.widget.on_polygon_drawn(vec![
        Point::new(-60.0, -60.0),
        Point::new(-40.0, -60.0),
        Point::new(10.0, 60.0),
        Point::new(-10.0, 60.0),
        Point::new(-60.0, -60.0),
    ]);

    assert_eq!(picked, vec![0, 2]);
    assert_eq!(s.channel.messages_named("plot_selected_points"), vec![json!([0, 2])]);
}

#[test]
fn lasso_through_a_point_excludes_it() {
    let mut s = scene("w", 120.0, 120.0);
    load_triangle(&mut s);

    // Bottom edge runs exactly through points 0 and 1.
    let picked = s.widget.on_polygon_drawn(vec![
        Point::new(-70.0, -50.0),
        Point::new(70.0, -50.0),
        Point::new(70.0, 70.0),
        Point::new(-70.0, 70.0),
    ]);
    assert_eq!(picked, vec![2]);
}

// ============================================================================
// Grid overlay
// ============================================================================

#[test]
fn grid_toggle_round_trip_restores_colors() {
    let mut s = scene("w", 120.0, 120.0);
    load_triangle(&mut s);
    let original: Vec<Rgba> = s.renderer.last_frame().unwrap().scatter.points.iter().map(|p| p.fill).collect();

    s.widget.handle_toolbar(ToolbarAction::ToggleGrid);
    let shown = s.renderer.last_frame().unwrap();
    assert!(shown.grid.visible);
    assert!(shown.toolbar.grid_active);
    assert_eq!(shown.scatter.points[2].fill, Rgba::WHITE);

    s.widget.handle_toolbar(ToolbarAction::ToggleGrid);
    let hidden: Vec<Rgba> = s.renderer.last_frame().unwrap().scatter.points.iter().map(|p| p.fill).collect();
    assert_eq!(hidden, original);
    assert_eq!(s.channel.messages_named("w_show_grid"), vec![json!(true), json!(false)]);
}

// ============================================================================
// Proxy commands
// ============================================================================

fn directory_with(s: Scene) -> (WidgetDirectory<RecordingRenderer, RecordingChannel, ManualClock>, RecordingRenderer) {
    let mut dir = WidgetDirectory::new();
    let renderer = s.renderer.clone();
    dir.insert(s.widget);
    (dir, renderer)
}

#[test]
fn proxy_colors_leave_everything_else() {
    let mut s = scene("w", 120.0, 120.0);
    load_triangle(&mut s);
    let before = s.renderer.last_frame().unwrap();
    let (mut dir, renderer) = directory_with(s);

    dir.dispatch(&ProxyCommand::from_json(r#"{"id": "w", "colors": ["orange"]}"#).unwrap()).unwrap();

    let after = renderer.last_frame().unwrap();
    assert!(after.scatter.points.iter().all(|p| p.fill == Rgba::rgb(255, 165, 0)));
    let positions = |f: &Frame| f.scatter.points.iter().map(|p| p.position).collect::<Vec<_>>();
    assert_eq!(positions(&after), positions(&before));
    assert_eq!(after.text, before.text);
    assert_eq!(after.grid, before.grid);
    assert_eq!(after.tooltips, before.tooltips);
}

#[test]
fn proxy_for_unknown_widget_changes_nothing() {
    let mut s = scene("w", 120.0, 120.0);
    load_triangle(&mut s);
    let (mut dir, renderer) = directory_with(s);
    let renders = renderer.render_count();

    let handled = dir.dispatch(&ProxyCommand::from_json(r#"{"id": "other", "title": "nope"}"#).unwrap()).unwrap();

    assert!(!handled);
    assert_eq!(renderer.render_count(), renders);
    assert_eq!(dir.get("w").unwrap().title(), "Triangle");
}

#[test]
fn proxy_several_fields_render_once() {
    let mut s = scene("w", 120.0, 120.0);
    load_triangle(&mut s);
    let (mut dir, renderer) = directory_with(s);
    let renders = renderer.render_count();

    let cmd = ProxyCommand::from_json(
        r#"{"id": "w", "labels": ["x", "y", "z"], "title": "Renamed", "showGrid": true, "initialViewState": {"zoom": 2}}"#,
    )
    .unwrap();
    dir.dispatch(&cmd).unwrap();

    assert_eq!(renderer.render_count(), renders + 1);
    let frame = renderer.last_frame().unwrap();
    assert_eq!(frame.title, "Renamed");
    assert_eq!(frame.tooltip(0), Some("x"));
    assert!(frame.grid.visible);
    assert_eq!(renderer.last_view_state().unwrap().zoom, 2.0);
}

// ============================================================================
// Camera
// ============================================================================

#[test]
fn zooming_out_fully_recentres() {
    let mut s = scene("w", 120.0, 120.0);
    load_triangle(&mut s);

    let panned = ViewState { target: Point::new(20.0, 20.0), zoom: 1.0, ..ViewState::default() };
    assert_eq!(s.widget.on_view_state_change(panned).target, Point::new(20.0, 20.0));

    let out = ViewState { zoom: 0.0, ..panned };
    assert_eq!(s.widget.on_view_state_change(out).target, Point::ORIGIN);

    assert_eq!(
        s.channel.messages_named("w_view_state"),
        vec![json!({"zoom": 1.0, "target": [20.0, 20.0]}), json!({"zoom": 0.0, "target": [0.0, 0.0]})]
    );
}

// ============================================================================
// Rejected input
// ============================================================================

#[test]
fn bad_color_rejects_whole_update() {
    let mut s = scene("w", 120.0, 120.0);
    load_triangle(&mut s);
    let renders = s.renderer.render_count();

    let bad = RenderPayload::from_json(r#"{"coords": {"x": [1], "y": [1]}, "colors": ["rgb(1,2)"], "title": "bad"}"#).unwrap();
    let err = s.widget.apply_payload(&bad).unwrap_err();

    assert!(matches!(err, Error::InvalidColor { .. }));
    assert_eq!(s.widget.point_count(), 3);
    assert_eq!(s.widget.title(), "Triangle");
    assert_eq!(s.renderer.render_count(), renders);
}
