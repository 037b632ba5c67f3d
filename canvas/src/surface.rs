//! The drawing surface: raster, pointer handlers, clear.
//!
//! DESIGN
//! ======
//! `Surface` is pure state with no browser dependency so it can be driven
//! from tests and from a headless participant. Every mutating handler also
//! returns the [`PaintOp`] it performed, which a host can replay onto a real
//! `<canvas>` (see the `web` feature) to keep both in step.
//!
//! Handlers take display-space points; scaling to raster space happens here
//! and nowhere else.

#[cfg(test)]
#[path = "surface_test.rs"]
mod surface_test;

use image::RgbaImage;

use crate::consts::BACKGROUND;
use crate::geometry::{CanvasGeometry, Point};
use crate::input::InputState;
use crate::raster;
use crate::tool::{BrushWidth, Color, ToolState};

/// A paint operation performed on the raster, in raster coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PaintOp {
    /// A new path starts here. Nothing is painted yet.
    BeginPath { at: Point },
    /// The path was extended and the new segment painted.
    LineTo { from: Point, to: Point, color: Color, width: BrushWidth },
    /// The path was closed; pointer released.
    ClosePath,
    /// The whole raster was refilled with the background.
    Clear,
}

/// Fixed-size RGBA raster with freehand pen input.
pub struct Surface {
    geometry: CanvasGeometry,
    pixels: RgbaImage,
    input: InputState,
}

impl Default for Surface {
    fn default() -> Self {
        Self::new(CanvasGeometry::default())
    }
}

impl Surface {
    /// Allocate the raster and fill it with the background.
    #[must_use]
    pub fn new(geometry: CanvasGeometry) -> Self {
        let pixels = RgbaImage::from_pixel(geometry.logical_width, geometry.logical_height, image::Rgba(BACKGROUND));
        Self { geometry, pixels, input: InputState::Idle }
    }

    #[must_use]
    pub fn geometry(&self) -> &CanvasGeometry {
        &self.geometry
    }

    #[must_use]
    pub fn input(&self) -> InputState {
        self.input
    }

    #[must_use]
    pub fn is_drawing(&self) -> bool {
        self.input.is_drawing()
    }

    /// Display → raster mapping for this surface.
    #[must_use]
    pub fn to_logical(&self, display: Point) -> Point {
        self.geometry.to_logical(display)
    }

    // --- Pointer input ---

    /// Start a new path under the pointer.
    pub fn pointer_down(&mut self, display: Point) -> PaintOp {
        let at = self.to_logical(display);
        self.input = InputState::Drawing { origin: at, last: at, segments: 0 };
        PaintOp::BeginPath { at }
    }

    /// Extend the current path to the pointer and paint the new segment.
    ///
    /// Returns `None` when no path is in progress.
    pub fn pointer_move(&mut self, display: Point, tool: &ToolState) -> Option<PaintOp> {
        let InputState::Drawing { origin, last, segments } = self.input else {
            return None;
        };
        let to = self.to_logical(display);
        raster::paint_segment(&mut self.pixels, last, to, f64::from(tool.width.px()), tool.color.rgba());
        self.input = InputState::Drawing { origin, last: to, segments: segments + 1 };
        Some(PaintOp::LineTo { from: last, to, color: tool.color, width: tool.width })
    }

    /// Close the current path. Returns `None` if none was open.
    pub fn pointer_up(&mut self) -> Option<PaintOp> {
        if !self.input.is_drawing() {
            return None;
        }
        self.input = InputState::Idle;
        Some(PaintOp::ClosePath)
    }

    /// Refill the raster with the background. Any open path is dropped.
    pub fn clear(&mut self) -> PaintOp {
        raster::fill(&mut self.pixels, BACKGROUND);
        self.input = InputState::Idle;
        PaintOp::Clear
    }

    // --- Read back ---

    /// Borrow the raster.
    #[must_use]
    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Copy of the raster, detached from further drawing.
    #[must_use]
    pub fn snapshot(&self) -> RgbaImage {
        self.pixels.clone()
    }

    /// RGBA at raster pixel `(x, y)`, if in bounds.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.pixels.get_pixel_checked(x, y).map(|p| p.0)
    }

    /// Whether every pixel equals the background.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.pixels.pixels().all(|p| p.0 == BACKGROUND)
    }
}
