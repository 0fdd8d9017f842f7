//! picker-replay - headless scatter-picker driver.
//!
//! Reads host events as JSON lines on stdin, drives one widget, and writes
//! every outbound host event as a JSON line on stdout.
//!
//! ```text
//! {"event": "render", "payload": {"coords": {"x": [0, 1], "y": [0, 1]}}}
//! {"event": "mode", "mode": "lasso"}
//! {"event": "polygon", "vertices": [[-60, -60], [60, -60], [0, 60]]}
//! ```

use std::io::{self, BufRead};
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use scatter_picker::channel::JsonLinesChannel;
use scatter_picker::config::PickerConfig;
use scatter_picker::debounce::ManualClock;
use scatter_picker::geometry::Point;
use scatter_picker::interaction::InteractionMode;
use scatter_picker::payload::{ProxyCommand, RenderPayload};
use scatter_picker::proxy::WidgetDirectory;
use scatter_picker::renderer::{Frame, Renderer};
use scatter_picker::viewport::{PanelSize, ViewState};
use scatter_picker::widget::PickerWidget;

/// Replay host events against a headless scatter picker.
#[derive(Parser, Debug)]
#[command(name = "picker-replay")]
#[command(author = "PAIML Team")]
#[command(version)]
#[command(about = "Replay JSON-lines host events against a headless scatter picker", long_about = None)]
struct Cli {
    /// Config file path (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Widget id used for outbound topics
    #[arg(long, default_value = "picker")]
    id: String,

    /// Initial panel width in pixels
    #[arg(long, default_value = "640")]
    width: f64,

    /// Initial panel height in pixels
    #[arg(long, default_value = "480")]
    height: f64,
}

/// One inbound line.
#[derive(Debug, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum Inbound {
    Render { payload: RenderPayload },
    Proxy { command: ProxyCommand },
    Resize { width: f64, height: f64 },
    Tick { ms: u64 },
    Mode { mode: InteractionMode },
    ToggleGrid,
    Polygon { vertices: Vec<[f64; 2]> },
    ViewState { zoom: f64, target: [f64; 2] },
}

/// Renderer that logs a summary of each frame.
#[derive(Debug, Default)]
struct TraceRenderer;

impl Renderer for TraceRenderer {
    fn render(&mut self, frame: &Frame) {
        tracing::info!(
            points = frame.scatter.points.len(),
            contours = frame.grid.contours.len(),
            grid = frame.grid.visible,
            mode = ?frame.draw.mode,
            title = %frame.title,
            "frame"
        );
    }

    fn set_view_state(&mut self, view: &ViewState) {
        tracing::info!(zoom = view.zoom, x = view.target.x, y = view.target.y, "camera");
    }
}

type ReplayWidget = PickerWidget<TraceRenderer, JsonLinesChannel<io::Stdout>, ManualClock>;
type ReplayDirectory = WidgetDirectory<TraceRenderer, JsonLinesChannel<io::Stdout>, ManualClock>;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config.as_deref().map(PickerConfig::load).transpose()?.unwrap_or_default();

    let clock = ManualClock::new();
    let widget: ReplayWidget = PickerWidget::new(
        cli.id.clone(),
        PanelSize::new(cli.width, cli.height)?,
        config,
        TraceRenderer,
        JsonLinesChannel::new(io::stdout()),
        clock.clone(),
    );
    let mut directory = ReplayDirectory::new();
    directory.insert(widget);

    for (lineno, line) in io::stdin().lock().lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let event: Inbound = match serde_json::from_str(&line) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!(line = lineno + 1, error = %e, "skipping malformed event");
                continue;
            }
        };
        if let Err(e) = replay(&mut directory, &cli.id, &clock, event) {
            tracing::warn!(line = lineno + 1, error = %e, "event rejected");
        }
    }

    Ok(())
}

fn replay(
    directory: &mut ReplayDirectory,
    id: &str,
    clock: &ManualClock,
    event: Inbound,
) -> scatter_picker::Result<()> {
    if let Inbound::Proxy { command } = &event {
        directory.dispatch(command)?;
        return Ok(());
    }
    let Some(widget) = directory.get_mut(id) else {
        return Ok(());
    };

    match event {
        Inbound::Render { payload } => widget.apply_payload(&payload)?,
        Inbound::Proxy { .. } => {}
        Inbound::Resize { width, height } => widget.request_resize(width, height)?,
        Inbound::Tick { ms } => {
            clock.advance(Duration::from_millis(ms));
            widget.tick();
        }
        Inbound::Mode { mode } => widget.set_mode(mode),
        Inbound::ToggleGrid => widget.toggle_grid(),
        Inbound::Polygon { vertices } => {
            widget.on_polygon_drawn(vertices.into_iter().map(Point::from).collect());
        }
        Inbound::ViewState { zoom, target } => {
            let view = ViewState { zoom, target: Point::from(target), ..widget.view_state() };
            widget.on_view_state_change(view);
        }
    }
    Ok(())
}
