//! Coordinate spaces and the pan/zoom viewport.
//!
//! Three spaces are in play:
//!
//! - **screen**: pointer coordinates as the host reports them (CSS pixels,
//!   relative to the page).
//! - **local**: screen minus the canvas element's top-left corner.
//! - **canvas**: the unscaled, unpanned space element positions live in.
//!
//! [`to_canvas_space`] and [`to_screen_space`] are exact inverses for any
//! positive zoom. Neither clamps: keeping zoom inside its range is the job of
//! [`ZoomRange`], applied whenever the viewport is mutated.

#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// A point in screen, local, or canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle, `left`/`top` inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    /// Rectangle spanning `origin .. origin + size`.
    #[must_use]
    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    #[must_use]
    pub fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }

    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Whether `pt` lies inside the rectangle, edges included.
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        pt.x >= self.left && pt.x <= self.left + self.width && pt.y >= self.top && pt.y <= self.top + self.height
    }
}

/// Inclusive zoom bounds for a viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomRange {
    pub min: f64,
    pub max: f64,
}

impl ZoomRange {
    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Clamp `zoom` into the range. Non-finite input collapses to `min`.
    #[must_use]
    pub fn clamp(&self, zoom: f64) -> f64 {
        if !zoom.is_finite() {
            return self.min;
        }
        zoom.max(self.min).min(self.max)
    }

    /// Apply `delta` to `zoom`, clamp, and round to two decimals.
    ///
    /// Rounding keeps repeated steps from accumulating float noise in the
    /// displayed percentage; the result is re-clamped so rounding can never
    /// leave the range.
    #[must_use]
    pub fn step(&self, zoom: f64, delta: f64) -> f64 {
        let clamped = self.clamp(zoom + delta);
        self.clamp(round_2dp(clamped))
    }
}

fn round_2dp(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Pan/zoom state of a canvas.
///
/// `pan_x` / `pan_y` are in CSS pixels and unbounded.
/// `zoom` is a scale factor (1.0 = no zoom).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub pan_x: f64,
    pub pan_y: f64,
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { pan_x: 0.0, pan_y: 0.0, zoom: 1.0 }
    }
}

impl Viewport {
    /// Viewport at the origin with the given zoom.
    #[must_use]
    pub fn with_zoom(zoom: f64) -> Self {
        Self { zoom, ..Self::default() }
    }

    /// Convert a local (canvas-element relative) point to canvas space.
    #[must_use]
    pub fn local_to_canvas(&self, local: Point) -> Point {
        Point {
            x: (local.x - self.pan_x) / self.zoom,
            y: (local.y - self.pan_y) / self.zoom,
        }
    }

    /// Convert a canvas-space point to local coordinates.
    #[must_use]
    pub fn canvas_to_local(&self, canvas: Point) -> Point {
        Point {
            x: canvas.x * self.zoom + self.pan_x,
            y: canvas.y * self.zoom + self.pan_y,
        }
    }

    /// Convert a screen-space distance to canvas units.
    #[must_use]
    pub fn screen_dist_to_canvas(&self, screen_dist: f64) -> f64 {
        screen_dist / self.zoom
    }
}

/// Convert a screen point to canvas space.
///
/// `canvas_origin` is the canvas element's rectangle in screen space; only its
/// top-left corner is used. `viewport.zoom` must be positive.
#[must_use]
pub fn to_canvas_space(screen: Point, viewport: &Viewport, canvas_origin: &Rect) -> Point {
    viewport.local_to_canvas(Point::new(screen.x - canvas_origin.left, screen.y - canvas_origin.top))
}

/// Convert a canvas-space point back to screen space. Inverse of [`to_canvas_space`].
#[must_use]
pub fn to_screen_space(canvas: Point, viewport: &Viewport, canvas_origin: &Rect) -> Point {
    let local = viewport.canvas_to_local(canvas);
    Point::new(local.x + canvas_origin.left, local.y + canvas_origin.top)
}
