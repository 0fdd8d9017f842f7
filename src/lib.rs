//! # Scatter-Picker
//!
//! Core of an interactive scatterplot point picker.
//!
//! A host sends point coordinates, colors, labels and an optional grid of
//! rectangular cells. The widget rescales everything into a viewport box
//! centred at the origin, hands layer descriptions to a pluggable renderer,
//! and reports the indices of the points the user encloses with a freehand
//! lasso.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use scatter_picker::prelude::*;
//!
//! let mut widget = PickerWidget::new(
//!     "plot",
//!     PanelSize::new(640.0, 480.0)?,
//!     PickerConfig::default(),
//!     NullRenderer,
//!     NullChannel,
//!     SystemClock::new(),
//! );
//! widget.apply_payload(&RenderPayload::from_json(json)?)?;
//! widget.set_mode(InteractionMode::Lasso);
//! let picked = widget.on_polygon_drawn(vertices);
//! ```
//!
//! ## Feature Flags
//!
//! - `replay`: builds the `picker-replay` binary, a headless driver that
//!   reads host events as JSON lines

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
// Allow unwrap() in tests only - banned in production code
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Core Modules
// ============================================================================

/// Color types and CSS color parsing.
pub mod color;

/// Geometric primitives (points, ranges, rectangles).
pub mod geometry;

/// Linear data-to-viewport transforms.
pub mod scale;

/// Labeled points and grid cells.
pub mod model;

/// Grid cell outlines.
pub mod contour;

/// Lasso point-in-polygon selection.
pub mod selection;

// ============================================================================
// Widget Modules
// ============================================================================

/// Panel size, viewport bounds and camera state.
pub mod viewport;

/// Interaction modes and cursor policy.
pub mod interaction;

/// Trailing-edge debouncing.
pub mod debounce;

/// Renderer boundary and frame layers.
pub mod renderer;

/// Outbound host notifications.
pub mod channel;

/// Widget state controller.
pub mod widget;

// ============================================================================
// Host Protocol
// ============================================================================

/// Inbound host payloads and commands.
pub mod payload;

/// Incremental update handling and widget lookup.
pub mod proxy;

/// YAML configuration.
pub mod config;

// ============================================================================
// Error Types
// ============================================================================

/// Error types for scatter-picker operations.
pub mod error;

pub use error::{Error, Result};

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types and traits for convenient imports.
///
/// ```rust,ignore
/// use scatter_picker::prelude::*;
/// ```
pub mod prelude {
    pub use crate::channel::{HostChannel, JsonLinesChannel, NullChannel, OutboundEvent};
    pub use crate::color::{Hsla, Rgba};
    pub use crate::config::PickerConfig;
    pub use crate::contour::{to_contour, Contour};
    pub use crate::debounce::{Clock, Debouncer, ManualClock, SystemClock};
    pub use crate::error::{Error, Result};
    pub use crate::geometry::{Bounds, Point, Range, Rect};
    pub use crate::interaction::{cursor_for, CursorKind, DragState, InteractionMode, ToolbarAction};
    pub use crate::payload::{ProxyCommand, RenderPayload};
    pub use crate::proxy::{apply_proxy, WidgetDirectory};
    pub use crate::renderer::{Frame, NullRenderer, Renderer};
    pub use crate::scale::{bounding_box_of, rescale, rescale_box, Positioned, ViewportTransform};
    pub use crate::selection::{select_within, LassoPolygon};
    pub use crate::viewport::{PanelSize, ViewState};
    pub use crate::widget::PickerWidget;
}
