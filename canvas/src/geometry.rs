//! Points and the fixed display → raster coordinate mapping.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use serde::{Deserialize, Serialize};

use crate::consts::{DISPLAY_HEIGHT, DISPLAY_WIDTH, LOGICAL_HEIGHT, LOGICAL_WIDTH};

/// A point in either display (CSS pixel) or raster space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
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

/// Size of the drawing raster and of the element it is displayed in.
///
/// `logical_*` are raster pixels. `display_*` are CSS pixels. Pointer events
/// arrive in display space and must be scaled per axis by
/// `logical / display` before they touch the raster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasGeometry {
    pub logical_width: u32,
    pub logical_height: u32,
    pub display_width: f64,
    pub display_height: f64,
}

impl Default for CanvasGeometry {
    fn default() -> Self {
        Self {
            logical_width: LOGICAL_WIDTH,
            logical_height: LOGICAL_HEIGHT,
            display_width: DISPLAY_WIDTH,
            display_height: DISPLAY_HEIGHT,
        }
    }
}

impl CanvasGeometry {
    /// Horizontal display → raster factor (0.75 for the default geometry).
    #[must_use]
    pub fn scale_x(&self) -> f64 {
        scale(self.logical_width, self.display_width)
    }

    /// Vertical display → raster factor (0.75 for the default geometry).
    #[must_use]
    pub fn scale_y(&self) -> f64 {
        scale(self.logical_height, self.display_height)
    }

    /// Convert a display-space point to raster coordinates.
    #[must_use]
    pub fn to_logical(&self, display: Point) -> Point {
        Point { x: display.x * self.scale_x(), y: display.y * self.scale_y() }
    }

    /// Convert a raster point back to display coordinates.
    #[must_use]
    pub fn to_display(&self, logical: Point) -> Point {
        Point { x: logical.x / self.scale_x(), y: logical.y / self.scale_y() }
    }

    /// Whether the raster has no pixels at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.logical_width == 0 || self.logical_height == 0
    }
}

fn scale(logical: u32, display: f64) -> f64 {
    if display > 0.0 { f64::from(logical) / display } else { 1.0 }
}
