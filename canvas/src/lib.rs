//! Freehand drawing canvas for the meeting sketch modal.
//!
//! This crate owns the drawing surface: a small fixed-size RGBA raster that
//! the user paints on with a pen, the closed set of pen colors and brush
//! widths offered by the modal, and the mapping from on-screen pointer
//! positions to raster pixels. It has no knowledge of the meeting channel or
//! of image export; the host reads the raster back through
//! [`surface::Surface::snapshot`].
//!
//! With the `web` feature the same paint operations can be mirrored onto a
//! browser `<canvas>` element via [`web::WebMirror`].
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`surface`] | The raster and its pointer handlers |
//! | [`tool`] | Pen color palette, brush widths, current tool state |
//! | [`geometry`] | Points, canvas geometry, display → raster mapping |
//! | [`input`] | Pointer gesture state |
//! | [`raster`] | Software painting of stroke segments and fills |
//! | [`consts`] | Fixed sizes and colors |
//! | [`error`] | Crate error type |

pub mod consts;
pub mod error;
pub mod geometry;
pub mod input;
pub mod raster;
pub mod surface;
pub mod tool;
#[cfg(feature = "web")]
pub mod web;

pub use error::CanvasError;
pub use geometry::{CanvasGeometry, Point};
pub use surface::{PaintOp, Surface};
pub use tool::{BrushWidth, Color, ToolState};
