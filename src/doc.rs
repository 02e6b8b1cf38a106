//! Document model: freehand strokes and the in-memory stroke store.
//!
//! Strokes are stored in world space. The store holds an ordered sequence of
//! committed strokes plus at most one in-progress stroke that the input router
//! extends on every pointer move. The renderer reads both directly; nothing in
//! this module knows about the viewport or the drawing surface.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use uuid::Uuid;

use crate::camera::Point;

/// Unique identifier for a stroke.
pub type StrokeId = Uuid;

/// How a stroke is painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeTool {
    /// Painted in the stroke's own color.
    Pen,
    /// Painted in the canvas background color.
    Eraser,
}

/// A freehand polyline in world coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub id: StrokeId,
    /// Ordered sample points; never empty.
    pub points: Vec<Point>,
    /// CSS color string used when `tool` is [`StrokeTool::Pen`].
    pub color: String,
    /// Line width in world units.
    pub size: f64,
    pub tool: StrokeTool,
}

impl Stroke {
    /// Start a stroke with a single point.
    #[must_use]
    pub fn new(origin: Point, color: impl Into<String>, size: f64, tool: StrokeTool) -> Self {
        Self { id: Uuid::new_v4(), points: vec![origin], color: color.into(), size, tool }
    }
}

/// Committed strokes plus the optional stroke being drawn.
#[derive(Debug, Default)]
pub struct StrokeStore {
    committed: Vec<Stroke>,
    current: Option<Stroke>,
    undo_count: u64,
}

impl StrokeStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new in-progress stroke. Returns `false` (and does nothing) if a
    /// stroke is already being drawn.
    pub fn begin_stroke(&mut self, origin: Point, color: &str, size: f64, tool: StrokeTool) -> bool {
        if self.current.is_some() {
            return false;
        }
        self.current = Some(Stroke::new(origin, color, size, tool));
        true
    }

    /// Append a point to the in-progress stroke, if any.
    pub fn extend_current(&mut self, point: Point) -> bool {
        let Some(stroke) = self.current.as_mut() else {
            return false;
        };
        stroke.points.push(point);
        true
    }

    /// Move the in-progress stroke into the committed sequence.
    ///
    /// The current stroke is always cleared; the returned id is `Some` only
    /// when a stroke was actually committed.
    pub fn commit_current(&mut self) -> Option<StrokeId> {
        let stroke = self.current.take()?;
        if stroke.points.is_empty() {
            return None;
        }
        let id = stroke.id;
        self.committed.push(stroke);
        Some(id)
    }

    /// Drop the most recently committed stroke. No-op on an empty store.
    pub fn undo(&mut self) -> Option<Stroke> {
        let popped = self.committed.pop()?;
        self.undo_count += 1;
        Some(popped)
    }

    /// Remove every committed stroke and reset the undo counter.
    pub fn clear(&mut self) {
        self.committed.clear();
        self.undo_count = 0;
    }

    #[must_use]
    pub fn committed(&self) -> &[Stroke] {
        &self.committed
    }

    #[must_use]
    pub fn current(&self) -> Option<&Stroke> {
        self.current.as_ref()
    }

    /// Committed strokes followed by the in-progress stroke, in paint order.
    pub fn paint_order(&self) -> impl Iterator<Item = &Stroke> {
        self.committed.iter().chain(self.current.iter())
    }

    /// Number of undo operations that removed a stroke since the last clear.
    #[must_use]
    pub fn undo_count(&self) -> u64 {
        self.undo_count
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.committed.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.committed.is_empty()
    }
}
