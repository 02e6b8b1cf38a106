//! Shared numeric and color constants for the sketchpad crate.

// ── Viewport ────────────────────────────────────────────────────

/// Smallest allowed zoom factor.
pub const MIN_SCALE: f64 = 0.1;

/// Largest allowed zoom factor.
pub const MAX_SCALE: f64 = 10.0;

/// Scale change per wheel pixel when zooming.
pub const ZOOM_SENSITIVITY: f64 = 0.001;

/// CSS pixels per wheel line, for devices that report `DOM_DELTA_LINE`.
pub const WHEEL_LINE_HEIGHT: f64 = 16.0;

// ── Rendering ───────────────────────────────────────────────────

/// World-unit slack around the visible rectangle before a stroke is culled.
pub const CULL_MARGIN_WORLD: f64 = 100.0;

/// Canvas background; eraser strokes paint in this color.
pub const BACKGROUND_COLOR: &str = "#ffffff";

/// Fallback panel colors and font, drawn while the widget is faulted.
pub const FALLBACK_FILL: &str = "#f4f1ee";
pub const FALLBACK_TEXT: &str = "#1f1a17";
pub const FALLBACK_FONT: &str = "16px sans-serif";

// ── Brush defaults ──────────────────────────────────────────────

pub const DEFAULT_COLOR: &str = "#000000";

/// Default line width in world units.
pub const DEFAULT_BRUSH_SIZE: f64 = 5.0;
