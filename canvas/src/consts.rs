//! Shared numeric constants for the canvas crate.

// ── Geometry ────────────────────────────────────────────────────

/// Width of the drawing raster, in raster pixels.
pub const LOGICAL_WIDTH: u32 = 270;

/// Height of the drawing raster, in raster pixels.
pub const LOGICAL_HEIGHT: u32 = 240;

/// Width of the canvas element on screen, in CSS pixels.
pub const DISPLAY_WIDTH: f64 = 360.0;

/// Height of the canvas element on screen, in CSS pixels.
pub const DISPLAY_HEIGHT: f64 = 320.0;

// ── Paint ───────────────────────────────────────────────────────

/// Light gray the canvas is filled with on creation and on clear.
pub const BACKGROUND: [u8; 4] = [0xf0, 0xf0, 0xf0, 0xff];

/// [`BACKGROUND`] as a CSS color string.
pub const BACKGROUND_CSS: &str = "#f0f0f0";
