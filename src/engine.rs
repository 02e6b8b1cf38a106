use crate::camera::{Point, Viewport};
use crate::config::SketchConfig;
use crate::doc::StrokeStore;
use crate::input::{Button, InputState, Key, Modifiers, Tool, UiState, WheelDelta};
use crate::render::{self, CanvasSurface, PaintStats, Surface};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// The scene changed; schedule a paint.
    RenderNeeded,
    /// Set the canvas CSS cursor.
    SetCursor(&'static str),
    /// Stroke count, undo count, or view numbers changed.
    StatsChanged,
}

/// Low-frequency projection of engine state for auxiliary UI text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewStats {
    pub stroke_count: usize,
    pub undo_count: u64,
    pub scale: f64,
    pub offset: Point,
    pub drawing: bool,
    pub panning: bool,
}

/// Input routing and display state, independent of the drawing surface.
///
/// Tested natively; `Engine` adds the surface and the fault handling.
/// Pointer positions arrive in CSS pixels and are scaled by `dpr` into the
/// device-pixel space the viewport works in.
#[derive(Debug)]
pub struct EngineCore {
    pub doc: StrokeStore,
    pub viewport: Viewport,
    pub ui: UiState,
    pub input: InputState,
    pub config: SketchConfig,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub dpr: f64,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::new(SketchConfig::default())
    }
}

impl EngineCore {
    #[must_use]
    pub fn new(config: SketchConfig) -> Self {
        Self {
            doc: StrokeStore::new(),
            viewport: Viewport::default(),
            ui: UiState::default(),
            input: InputState::default(),
            config: config.sanitized(),
            viewport_width: 0.0,
            viewport_height: 0.0,
            dpr: 1.0,
        }
    }

    // --- Surface geometry ---

    /// Record the displayed size (CSS pixels) and pixel ratio.
    ///
    /// Returns the backing-store size in device pixels, or `None` when the
    /// size is unusable (a hidden container reports zero) and was ignored.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) -> Option<(u32, u32)> {
        if !(width_css.is_finite() && height_css.is_finite()) || width_css <= 0.0 || height_css <= 0.0 {
            log::warn!("ignoring viewport resize to {width_css}x{height_css}");
            return None;
        }
        self.viewport_width = width_css;
        self.viewport_height = height_css;
        self.dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
        let width = (width_css * self.dpr).round().max(1.0) as u32;
        let height = (height_css * self.dpr).round().max(1.0) as u32;
        Some((width, height))
    }

    /// Convert a CSS-pixel position to surface device pixels.
    #[must_use]
    pub fn to_device(&self, css: Point) -> Point {
        Point::new(css.x * self.dpr, css.y * self.dpr)
    }

    /// World position under a CSS-pixel pointer position.
    #[must_use]
    pub fn css_to_world(&self, css: Point) -> Point {
        self.viewport.to_world(self.to_device(css))
    }

    // --- Toolbar ---

    pub fn set_tool(&mut self, tool: Tool) -> Vec<Action> {
        self.ui.tool = tool;
        if self.input.is_idle() {
            vec![Action::SetCursor(tool.cursor())]
        } else {
            Vec::new()
        }
    }

    pub fn set_color(&mut self, color: &str) {
        if !color.trim().is_empty() {
            self.ui.color = color.to_owned();
        }
    }

    pub fn set_brush_size(&mut self, size: f64) {
        if size.is_finite() && size > 0.0 {
            self.ui.brush_size = size;
        }
    }

    // --- Pointer input ---

    /// Start a draw or pan gesture. Ignored unless idle.
    pub fn on_pointer_down(&mut self, css: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        if !self.input.is_idle() {
            return Vec::new();
        }

        let pan = button == Button::Middle
            || (button == Button::Primary && (self.ui.tool == Tool::Pan || modifiers.shift));
        if pan {
            self.input = InputState::Panning { last_css: css };
            return vec![Action::SetCursor("grabbing"), Action::StatsChanged];
        }

        if button != Button::Primary {
            return Vec::new();
        }
        let Some(kind) = self.ui.tool.stroke_tool() else {
            return Vec::new();
        };
        let origin = self.css_to_world(css);
        if !self.doc.begin_stroke(origin, &self.ui.color, self.ui.brush_size, kind) {
            return Vec::new();
        }
        self.input = InputState::Drawing;
        vec![Action::RenderNeeded, Action::StatsChanged]
    }

    pub fn on_pointer_move(&mut self, css: Point) -> Vec<Action> {
        match self.input {
            InputState::Idle => Vec::new(),
            InputState::Drawing => {
                let world = self.css_to_world(css);
                if self.doc.extend_current(world) {
                    vec![Action::RenderNeeded]
                } else {
                    Vec::new()
                }
            }
            InputState::Panning { last_css } => {
                let dx = (css.x - last_css.x) * self.dpr;
                let dy = (css.y - last_css.y) * self.dpr;
                self.viewport.pan_by(dx, dy);
                self.input = InputState::Panning { last_css: css };
                vec![Action::RenderNeeded, Action::StatsChanged]
            }
        }
    }

    /// End the active gesture (pointer up or pointer leaving the surface).
    pub fn on_pointer_up(&mut self) -> Vec<Action> {
        match std::mem::take(&mut self.input) {
            InputState::Idle => Vec::new(),
            InputState::Drawing => {
                if let Some(id) = self.doc.commit_current() {
                    log::debug!("committed stroke {id} ({} total)", self.doc.len());
                }
                vec![Action::RenderNeeded, Action::StatsChanged]
            }
            InputState::Panning { .. } => vec![Action::SetCursor(self.ui.tool.cursor()), Action::StatsChanged],
        }
    }

    /// Zoom around the pointer when the zoom modifier is held; other wheel
    /// events are left to the host.
    pub fn on_wheel(&mut self, css: Point, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
        if !modifiers.command() {
            return Vec::new();
        }
        let anchor = self.to_device(css);
        self.viewport.zoom_at(anchor, -delta.dy, self.config.zoom_sensitivity);
        vec![Action::RenderNeeded, Action::StatsChanged]
    }

    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        if key.is_undo(modifiers) {
            return self.undo();
        }
        Vec::new()
    }

    // --- Commands ---

    /// Remove the most recent committed stroke.
    pub fn undo(&mut self) -> Vec<Action> {
        match self.doc.undo() {
            Some(stroke) => {
                log::debug!("undo stroke {} ({} left)", stroke.id, self.doc.len());
                vec![Action::RenderNeeded, Action::StatsChanged]
            }
            None => Vec::new(),
        }
    }

    /// Remove all committed strokes and reset the undo counter.
    pub fn clear(&mut self) -> Vec<Action> {
        log::debug!("clearing {} strokes", self.doc.len());
        self.doc.clear();
        vec![Action::RenderNeeded, Action::StatsChanged]
    }

    /// Restore the identity view.
    pub fn reset_view(&mut self) -> Vec<Action> {
        log::debug!("view reset");
        self.viewport.reset();
        vec![Action::RenderNeeded, Action::StatsChanged]
    }

    // --- Queries ---

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn view_stats(&self) -> ViewStats {
        ViewStats {
            stroke_count: self.doc.len(),
            undo_count: self.doc.undo_count(),
            scale: self.viewport.scale,
            offset: self.viewport.offset,
            drawing: self.input.is_drawing(),
            panning: self.input.is_panning(),
        }
    }
}

/// Whether the widget is painting normally or showing its fallback.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Health {
    #[default]
    Running,
    Faulted { message: String },
}

/// The full drawing engine. Wraps `EngineCore` and owns the drawing surface.
///
/// Paint failures are contained here: they are logged, the engine switches to
/// [`Health::Faulted`], and the surface shows a retry prompt until
/// [`Engine::retry`] remounts the core.
pub struct Engine<S: Surface = CanvasSurface> {
    surface: S,
    pub core: EngineCore,
    health: Health,
    last_paint: PaintStats,
}

impl<S: Surface> Engine<S> {
    /// Create a new engine drawing onto `surface`.
    #[must_use]
    pub fn new(surface: S, config: SketchConfig) -> Self {
        Self { surface, core: EngineCore::new(config), health: Health::Running, last_paint: PaintStats::default() }
    }

    // --- Viewport ---

    /// Update displayed size and pixel ratio, resizing the backing store.
    ///
    /// The displayed size is pinned to the measured CSS size so a larger
    /// backing store cannot feed back into the next measurement.
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) -> Vec<Action> {
        let Some((width, height)) = self.core.set_viewport(width_css, height_css, dpr) else {
            return Vec::new();
        };
        self.surface.set_display_size(self.core.viewport_width, self.core.viewport_height);
        self.surface.resize(width, height);
        vec![Action::RenderNeeded]
    }

    // --- Input events ---

    /// While faulted, a primary press is the retry action.
    pub fn on_pointer_down(&mut self, css: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        if self.is_faulted() {
            return if button == Button::Primary { self.retry() } else { Vec::new() };
        }
        self.core.on_pointer_down(css, button, modifiers)
    }

    pub fn on_pointer_move(&mut self, css: Point) -> Vec<Action> {
        if self.is_faulted() {
            return Vec::new();
        }
        self.core.on_pointer_move(css)
    }

    pub fn on_pointer_up(&mut self) -> Vec<Action> {
        if self.is_faulted() {
            return Vec::new();
        }
        self.core.on_pointer_up()
    }

    pub fn on_wheel(&mut self, css: Point, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
        if self.is_faulted() {
            return Vec::new();
        }
        self.core.on_wheel(css, delta, modifiers)
    }

    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        if self.is_faulted() {
            return Vec::new();
        }
        self.core.on_key_down(key, modifiers)
    }

    // --- Toolbar commands ---

    pub fn set_tool(&mut self, tool: Tool) -> Vec<Action> {
        self.core.set_tool(tool)
    }

    pub fn set_color(&mut self, color: &str) {
        self.core.set_color(color);
    }

    pub fn set_brush_size(&mut self, size: f64) {
        self.core.set_brush_size(size);
    }

    pub fn undo(&mut self) -> Vec<Action> {
        self.core.undo()
    }

    pub fn clear(&mut self) -> Vec<Action> {
        self.core.clear()
    }

    pub fn reset_view(&mut self) -> Vec<Action> {
        self.core.reset_view()
    }

    // --- Render ---

    /// Draw the current state to the surface, or the fallback if faulted.
    pub fn render(&mut self) {
        if let Health::Faulted { message } = &self.health {
            if let Err(err) = render::paint_fallback(&mut self.surface, message) {
                log::error!("fallback paint failed: {err:?}");
            }
            return;
        }

        match render::paint(&mut self.surface, &self.core.doc, &self.core.viewport, &self.core.config) {
            Ok(stats) => {
                log::trace!("painted {} strokes, culled {}", stats.painted, stats.culled);
                self.last_paint = stats;
            }
            Err(err) => {
                let message = format!("{err:?}");
                log::error!("paint failed, showing fallback: {message}");
                self.health = Health::Faulted { message };
                self.core.input = InputState::Idle;
                self.render();
            }
        }
    }

    /// Leave the faulted state with a freshly mounted core.
    ///
    /// Strokes and view are discarded; toolbar settings and surface geometry
    /// carry over.
    pub fn retry(&mut self) -> Vec<Action> {
        log::info!("retrying after fault");
        let mut core = EngineCore::new(self.core.config.clone());
        core.ui = self.core.ui.clone();
        core.viewport_width = self.core.viewport_width;
        core.viewport_height = self.core.viewport_height;
        core.dpr = self.core.dpr;
        self.core = core;
        self.health = Health::Running;
        self.last_paint = PaintStats::default();
        vec![Action::RenderNeeded, Action::StatsChanged, Action::SetCursor(self.core.ui.tool.cursor())]
    }

    // --- Queries ---

    #[must_use]
    pub fn health(&self) -> &Health {
        &self.health
    }

    #[must_use]
    pub fn is_faulted(&self) -> bool {
        matches!(self.health, Health::Faulted { .. })
    }

    /// Counters from the most recent successful paint.
    #[must_use]
    pub fn last_paint(&self) -> PaintStats {
        self.last_paint
    }

    #[must_use]
    pub fn view_stats(&self) -> ViewStats {
        self.core.view_stats()
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}
