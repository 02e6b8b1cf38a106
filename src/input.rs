//! Drawing tools, pointer buttons, keys, and the pointer gesture state.
//!
//! `Tool` and `Modifiers` capture the user's intent at the time of a pointer
//! event. `InputState` is the gesture tracked between pointer-down and
//! pointer-up; being an enum, it can never be drawing and panning at once.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::camera::Point;
use crate::consts::WHEEL_LINE_HEIGHT;
use crate::doc::StrokeTool;

/// Which tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Freehand drawing in the selected color (default).
    #[default]
    Pen,
    /// Freehand drawing in the background color.
    Eraser,
    /// Primary-button drag pans the view.
    Pan,
}

impl Tool {
    /// The stroke kind this tool produces, or `None` for non-drawing tools.
    #[must_use]
    pub fn stroke_tool(self) -> Option<StrokeTool> {
        match self {
            Self::Pen => Some(StrokeTool::Pen),
            Self::Eraser => Some(StrokeTool::Eraser),
            Self::Pan => None,
        }
    }

    /// CSS cursor shown while idle with this tool.
    #[must_use]
    pub fn cursor(self) -> &'static str {
        match self {
            Self::Pen | Self::Eraser => "crosshair",
            Self::Pan => "grab",
        }
    }
}

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Command on macOS. Trackpad pinch also reports Ctrl.
    #[must_use]
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button, pen contact, or single-finger touch.
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button.
    Secondary,
    /// Back/forward or any other extra button.
    Other,
}

impl Button {
    /// Map a DOM `MouseEvent.button` code.
    #[must_use]
    pub fn from_dom(code: i16) -> Self {
        match code {
            0 => Self::Primary,
            1 => Self::Middle,
            2 => Self::Secondary,
            _ => Self::Other,
        }
    }
}

/// A keyboard key as reported by the browser (`KeyboardEvent.key`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    /// Whether this key plus `modifiers` is the undo chord (Ctrl/Cmd+Z, no Shift).
    #[must_use]
    pub fn is_undo(&self, modifiers: Modifiers) -> bool {
        modifiers.command() && !modifiers.shift && self.0.eq_ignore_ascii_case("z")
    }
}

/// Wheel / trackpad scroll delta in CSS pixels.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    pub dx: f64,
    /// Positive = scroll down.
    pub dy: f64,
}

/// Unit of a DOM `WheelEvent` delta (`deltaMode`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaMode {
    Pixel,
    Line,
    Page,
}

impl DeltaMode {
    #[must_use]
    pub fn from_dom(code: u32) -> Self {
        match code {
            1 => Self::Line,
            2 => Self::Page,
            _ => Self::Pixel,
        }
    }
}

impl WheelDelta {
    /// Convert a raw DOM delta to CSS pixels. A page is `page_height` pixels.
    #[must_use]
    pub fn from_dom(dx: f64, dy: f64, mode: DeltaMode, page_height: f64) -> Self {
        let unit = match mode {
            DeltaMode::Pixel => 1.0,
            DeltaMode::Line => WHEEL_LINE_HEIGHT,
            DeltaMode::Page => page_height,
        };
        Self { dx: dx * unit, dy: dy * unit }
    }
}

/// Brush settings supplied by the toolbar.
#[derive(Debug, Clone, PartialEq)]
pub struct UiState {
    pub tool: Tool,
    /// CSS color for pen strokes.
    pub color: String,
    /// Line width in world units.
    pub brush_size: f64,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            tool: Tool::default(),
            color: crate::consts::DEFAULT_COLOR.to_owned(),
            brush_size: crate::consts::DEFAULT_BRUSH_SIZE,
        }
    }
}

/// Gesture in progress between pointer-down and pointer-up.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InputState {
    /// Waiting for the next pointer-down.
    #[default]
    Idle,
    /// Extending the store's current stroke on each move.
    Drawing,
    /// Dragging the view.
    Panning {
        /// Previous pointer position in CSS pixels, used to compute the pan delta.
        last_css: Point,
    },
}

impl InputState {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    #[must_use]
    pub fn is_drawing(&self) -> bool {
        matches!(self, Self::Drawing)
    }

    #[must_use]
    pub fn is_panning(&self) -> bool {
        matches!(self, Self::Panning { .. })
    }
}
