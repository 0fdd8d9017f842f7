//! Interaction modes, toolbar actions and cursor policy.

use serde::{Deserialize, Serialize};

/// Active tool. Exactly one is active; the widget starts in [`InteractionMode::Pan`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionMode {
    /// Drag pans, wheel zooms.
    #[default]
    Pan,
    /// Drag draws a freehand selection polygon.
    Lasso,
}

/// Pointer drag state reported by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    /// No button held.
    #[default]
    Idle,
    /// A drag is in progress.
    Dragging,
}

/// Cursor shape requested from the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CursorKind {
    /// Platform default arrow.
    Default,
    /// Closed hand while panning.
    Grabbing,
    /// Crosshair-like cell cursor while drawing.
    Cell,
}

impl CursorKind {
    /// CSS cursor keyword.
    #[must_use]
    pub const fn as_css(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Grabbing => "grabbing",
            Self::Cell => "cell",
        }
    }
}

/// Cursor for a mode and drag state.
#[must_use]
pub const fn cursor_for(mode: InteractionMode, drag: DragState) -> CursorKind {
    match (mode, drag) {
        (InteractionMode::Pan, DragState::Dragging) => CursorKind::Grabbing,
        (InteractionMode::Pan, DragState::Idle) => CursorKind::Default,
        (InteractionMode::Lasso, _) => CursorKind::Cell,
    }
}

/// Toolbar button presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolbarAction {
    /// Switch to pan/zoom.
    SelectPan,
    /// Switch to lasso drawing.
    SelectLasso,
    /// Show or hide the grid overlay.
    ToggleGrid,
}

impl ToolbarAction {
    /// Mode this action switches to, if it is a mode button.
    #[must_use]
    pub const fn target_mode(self) -> Option<InteractionMode> {
        match self {
            Self::SelectPan => Some(InteractionMode::Pan),
            Self::SelectLasso => Some(InteractionMode::Lasso),
            Self::ToggleGrid => None,
        }
    }
}
