#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use crate::consts::{MAX_SCALE, MIN_SCALE};

/// A point in either screen (device-pixel) or world space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in world space, `min` inclusive to `max` inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldRect {
    pub min: Point,
    pub max: Point,
}

impl WorldRect {
    /// Grow the rectangle by `margin` on every side.
    #[must_use]
    pub fn expand(self, margin: f64) -> Self {
        Self {
            min: Point::new(self.min.x - margin, self.min.y - margin),
            max: Point::new(self.max.x + margin, self.max.y + margin),
        }
    }

    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// Pan/zoom transform mapping world to screen as `screen = world * scale + offset`.
///
/// `offset` is in device pixels. `scale` always stays within
/// [`MIN_SCALE`]..=[`MAX_SCALE`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scale: f64,
    pub offset: Point,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { scale: 1.0, offset: Point::default() }
    }
}

impl Viewport {
    /// Convert a screen-space point (device pixels) to world coordinates.
    #[must_use]
    pub fn to_world(&self, screen: Point) -> Point {
        Point {
            x: (screen.x - self.offset.x) / self.scale,
            y: (screen.y - self.offset.y) / self.scale,
        }
    }

    /// Convert a world-space point to screen coordinates (device pixels).
    #[must_use]
    pub fn to_screen(&self, world: Point) -> Point {
        Point {
            x: world.x * self.scale + self.offset.x,
            y: world.y * self.scale + self.offset.y,
        }
    }

    /// Rescale by `raw_delta * sensitivity`, keeping the world point under
    /// `anchor` fixed on screen.
    pub fn zoom_at(&mut self, anchor: Point, raw_delta: f64, sensitivity: f64) {
        let new_scale = (self.scale + raw_delta * sensitivity).clamp(MIN_SCALE, MAX_SCALE);
        if !new_scale.is_finite() {
            return;
        }
        let world = self.to_world(anchor);
        self.scale = new_scale;
        self.offset = Point {
            x: anchor.x - world.x * new_scale,
            y: anchor.y - world.y * new_scale,
        };
    }

    /// Shift the view by a screen-space delta in device pixels.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.offset.x += dx;
        self.offset.y += dy;
    }

    /// Restore the identity transform.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// World-space rectangle covered by a `width` x `height` device-pixel
    /// surface, grown by `margin` world units.
    #[must_use]
    pub fn visible_world_rect(&self, width: f64, height: f64, margin: f64) -> WorldRect {
        WorldRect {
            min: self.to_world(Point::new(0.0, 0.0)),
            max: self.to_world(Point::new(width, height)),
        }
        .expand(margin)
    }
}
