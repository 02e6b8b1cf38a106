//! Rendering: repaints the whole surface from the stroke store and viewport.
//!
//! Painting goes through the [`Surface`] trait so the pipeline can run against
//! a browser `CanvasRenderingContext2d` ([`CanvasSurface`]) or a recording
//! fake in tests. This module reads state only; it never mutates the stores.
//!
//! All fallible surface calls propagate `S::Error`. The caller
//! ([`crate::engine::Engine::render`]) decides what a failure means.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::camera::Viewport;
use crate::config::SketchConfig;
use crate::consts::{FALLBACK_FILL, FALLBACK_FONT, FALLBACK_TEXT};
use crate::doc::{Stroke, StrokeStore, StrokeTool};
use crate::error::{HostError, js_error_message};

/// The 2D drawing primitives the renderer needs.
pub trait Surface {
    type Error: std::fmt::Debug;

    /// Backing-store size in device pixels.
    fn size(&self) -> (f64, f64);

    /// Resize the backing store to `width` x `height` device pixels.
    fn resize(&mut self, width: u32, height: u32);

    /// Fix the displayed size in CSS pixels, independent of the backing store.
    fn set_display_size(&mut self, css_width: f64, css_height: f64);

    /// Replace the current transform matrix.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the backend rejects the matrix.
    fn set_transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Result<(), Self::Error>;

    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64);
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64);
    fn set_fill_style(&mut self, color: &str);
    fn set_stroke_style(&mut self, color: &str);
    fn set_line_width(&mut self, width: f64);
    /// Round caps and joins.
    fn set_round_lines(&mut self);
    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn stroke(&mut self);
    fn set_font(&mut self, font: &str);
    fn set_text_align(&mut self, align: &str);

    /// # Errors
    ///
    /// Returns `Err` if the backend fails to draw the text.
    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> Result<(), Self::Error>;
}

/// Per-paint counters, kept by [`crate::engine::Engine::last_paint`] and
/// logged at trace level after each paint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaintStats {
    /// Strokes drawn as a path.
    pub painted: usize,
    /// Strokes skipped because no point was near the visible area.
    pub culled: usize,
    /// Strokes skipped because they have fewer than two points.
    pub degenerate: usize,
}

/// Clear the surface and draw every stroke, committed first, then the
/// in-progress one.
///
/// # Errors
///
/// Returns `Err` if any surface call fails.
pub fn paint<S: Surface>(
    surface: &mut S,
    store: &StrokeStore,
    viewport: &Viewport,
    config: &SketchConfig,
) -> Result<PaintStats, S::Error> {
    let (width, height) = surface.size();

    surface.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)?;
    surface.clear_rect(0.0, 0.0, width, height);
    surface.set_transform(viewport.scale, 0.0, 0.0, viewport.scale, viewport.offset.x, viewport.offset.y)?;

    let visible = viewport.visible_world_rect(width, height, config.cull_margin);
    let mut stats = PaintStats::default();

    for stroke in store.paint_order() {
        if !stroke.points.iter().any(|p| visible.contains(*p)) {
            stats.culled += 1;
            continue;
        }
        if stroke.points.len() < 2 {
            stats.degenerate += 1;
            continue;
        }
        draw_stroke(surface, stroke, &config.background_color);
        stats.painted += 1;
    }

    Ok(stats)
}

fn draw_stroke<S: Surface>(surface: &mut S, stroke: &Stroke, background: &str) {
    let color = match stroke.tool {
        StrokeTool::Pen => stroke.color.as_str(),
        StrokeTool::Eraser => background,
    };
    surface.set_stroke_style(color);
    surface.set_line_width(stroke.size);
    surface.set_round_lines();

    surface.begin_path();
    let mut points = stroke.points.iter();
    if let Some(first) = points.next() {
        surface.move_to(first.x, first.y);
    }
    for p in points {
        surface.line_to(p.x, p.y);
    }
    surface.stroke();
}

/// Replace the scene with a retry prompt after a fault.
///
/// # Errors
///
/// Returns `Err` if any surface call fails.
pub fn paint_fallback<S: Surface>(surface: &mut S, message: &str) -> Result<(), S::Error> {
    let (width, height) = surface.size();
    surface.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)?;
    surface.clear_rect(0.0, 0.0, width, height);
    surface.set_fill_style(FALLBACK_FILL);
    surface.fill_rect(0.0, 0.0, width, height);

    surface.set_fill_style(FALLBACK_TEXT);
    surface.set_font(FALLBACK_FONT);
    surface.set_text_align("center");
    let cx = width * 0.5;
    let cy = height * 0.5;
    surface.fill_text("Drawing surface failed", cx, cy - 24.0)?;
    surface.fill_text(message, cx, cy)?;
    surface.fill_text("Click to retry", cx, cy + 24.0)?;
    Ok(())
}

// =============================================================
// Browser surface
// =============================================================

/// A `<canvas>` element and its 2D context.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Acquire the 2D context of `canvas`.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::NoContext`] if the canvas has no usable 2D context.
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, HostError> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or(HostError::NoContext)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| HostError::NoContext)?;
        Ok(Self { canvas, ctx })
    }

    #[must_use]
    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }
}

impl Surface for CanvasSurface {
    type Error = JsValue;

    fn size(&self) -> (f64, f64) {
        (f64::from(self.canvas.width()), f64::from(self.canvas.height()))
    }

    fn resize(&mut self, width: u32, height: u32) {
        // Assigning either dimension resets the context, so skip no-op resizes.
        if self.canvas.width() != width {
            self.canvas.set_width(width);
        }
        if self.canvas.height() != height {
            self.canvas.set_height(height);
        }
    }

    fn set_display_size(&mut self, css_width: f64, css_height: f64) {
        let style = self.canvas.style();
        for (property, value) in [("width", css_width), ("height", css_height)] {
            if let Err(err) = style.set_property(property, &format!("{value}px")) {
                log::warn!("failed to set canvas {property}: {}", js_error_message(&err));
            }
        }
    }

    fn set_transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Result<(), JsValue> {
        self.ctx.set_transform(a, b, c, d, e, f)
    }

    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.ctx.clear_rect(x, y, w, h);
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.ctx.fill_rect(x, y, w, h);
    }

    fn set_fill_style(&mut self, color: &str) {
        self.ctx.set_fill_style_str(color);
    }

    fn set_stroke_style(&mut self, color: &str) {
        self.ctx.set_stroke_style_str(color);
    }

    fn set_line_width(&mut self, width: f64) {
        self.ctx.set_line_width(width);
    }

    fn set_round_lines(&mut self) {
        self.ctx.set_line_cap("round");
        self.ctx.set_line_join("round");
    }

    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.ctx.move_to(x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.ctx.line_to(x, y);
    }

    fn stroke(&mut self) {
        self.ctx.stroke();
    }

    fn set_font(&mut self, font: &str) {
        self.ctx.set_font(font);
    }

    fn set_text_align(&mut self, align: &str) {
        self.ctx.set_text_align(align);
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> Result<(), JsValue> {
        self.ctx.fill_text(text, x, y)
    }
}
