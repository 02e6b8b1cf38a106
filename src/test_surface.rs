//! In-memory [`Surface`] that records every call, for unit tests.

use crate::render::Surface;

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    SetTransform([f64; 6]),
    ClearRect(f64, f64, f64, f64),
    FillRect(f64, f64, f64, f64),
    FillStyle(String),
    StrokeStyle(String),
    LineWidth(f64),
    RoundLines,
    BeginPath,
    MoveTo(f64, f64),
    LineTo(f64, f64),
    Stroke,
    Font(String),
    TextAlign(String),
    FillText(String),
}

pub struct RecordingSurface {
    pub width: f64,
    pub height: f64,
    pub ops: Vec<Op>,
    /// Last CSS size passed to `set_display_size`.
    pub display: Option<(f64, f64)>,
    /// When set, `set_transform` fails with this message.
    pub fail_with: Option<String>,
}

impl RecordingSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height, ops: Vec::new(), display: None, fail_with: None }
    }

    pub fn failing(width: f64, height: f64, message: &str) -> Self {
        Self { fail_with: Some(message.to_owned()), ..Self::new(width, height) }
    }

    /// Number of `stroke()` calls, i.e. paths actually drawn.
    pub fn strokes(&self) -> usize {
        self.ops.iter().filter(|op| matches!(op, Op::Stroke)).count()
    }

    pub fn stroke_styles(&self) -> Vec<String> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::StrokeStyle(c) => Some(c.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn texts(&self) -> Vec<String> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::FillText(t) => Some(t.clone()),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    type Error = String;

    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = f64::from(width);
        self.height = f64::from(height);
    }

    fn set_display_size(&mut self, css_width: f64, css_height: f64) {
        self.display = Some((css_width, css_height));
    }

    fn set_transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Result<(), String> {
        if let Some(message) = &self.fail_with {
            return Err(message.clone());
        }
        self.ops.push(Op::SetTransform([a, b, c, d, e, f]));
        Ok(())
    }

    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.ops.push(Op::ClearRect(x, y, w, h));
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.ops.push(Op::FillRect(x, y, w, h));
    }

    fn set_fill_style(&mut self, color: &str) {
        self.ops.push(Op::FillStyle(color.to_owned()));
    }

    fn set_stroke_style(&mut self, color: &str) {
        self.ops.push(Op::StrokeStyle(color.to_owned()));
    }

    fn set_line_width(&mut self, width: f64) {
        self.ops.push(Op::LineWidth(width));
    }

    fn set_round_lines(&mut self) {
        self.ops.push(Op::RoundLines);
    }

    fn begin_path(&mut self) {
        self.ops.push(Op::BeginPath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.ops.push(Op::MoveTo(x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.ops.push(Op::LineTo(x, y));
    }

    fn stroke(&mut self) {
        self.ops.push(Op::Stroke);
    }

    fn set_font(&mut self, font: &str) {
        self.ops.push(Op::Font(font.to_owned()));
    }

    fn set_text_align(&mut self, align: &str) {
        self.ops.push(Op::TextAlign(align.to_owned()));
    }

    fn fill_text(&mut self, text: &str, _x: f64, _y: f64) -> Result<(), String> {
        self.ops.push(Op::FillText(text.to_owned()));
        Ok(())
    }
}
