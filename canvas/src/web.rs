//! Browser mirror: replays [`PaintOp`]s onto a `<canvas>` element.
//!
//! This module is the only place that touches [`web_sys::CanvasRenderingContext2d`].
//! The raster in [`crate::surface::Surface`] stays the source of truth; the
//! mirror only keeps what the user sees in step with it.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::consts::BACKGROUND_CSS;
use crate::error::CanvasError;
use crate::geometry::CanvasGeometry;
use crate::surface::PaintOp;

/// A canvas element sized and configured for the sketch modal.
pub struct WebMirror {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl WebMirror {
    /// Size `canvas` to `geometry`, grab its 2D context, and paint the background.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Context`] if the element has no 2D context or
    /// rejects the style update.
    pub fn attach(canvas: HtmlCanvasElement, geometry: &CanvasGeometry) -> Result<Self, CanvasError> {
        canvas.set_width(geometry.logical_width);
        canvas.set_height(geometry.logical_height);
        let style = canvas.style();
        style
            .set_property("width", &format!("{}px", geometry.display_width))
            .map_err(js_err)?;
        style
            .set_property("height", &format!("{}px", geometry.display_height))
            .map_err(js_err)?;

        let ctx = canvas
            .get_context("2d")
            .map_err(js_err)?
            .ok_or_else(|| CanvasError::Context("2d context not supported".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| CanvasError::Context("context is not CanvasRenderingContext2d".into()))?;
        ctx.set_line_cap("round");
        ctx.set_line_join("round");

        let mirror = Self { canvas, ctx };
        mirror.fill_background();
        Ok(mirror)
    }

    /// Replay one operation.
    pub fn apply(&self, op: &PaintOp) {
        match *op {
            PaintOp::BeginPath { at } => {
                self.ctx.begin_path();
                self.ctx.move_to(at.x, at.y);
            }
            // Each segment is stroked on its own so a later color change
            // cannot repaint earlier segments of the same path.
            PaintOp::LineTo { from, to, color, width } => {
                self.ctx.set_stroke_style_str(color.css_name());
                self.ctx.set_line_width(f64::from(width.px()));
                self.ctx.begin_path();
                self.ctx.move_to(from.x, from.y);
                self.ctx.line_to(to.x, to.y);
                self.ctx.stroke();
            }
            PaintOp::ClosePath => self.ctx.close_path(),
            PaintOp::Clear => self.fill_background(),
        }
    }

    fn fill_background(&self) {
        let w = f64::from(self.canvas.width());
        let h = f64::from(self.canvas.height());
        self.ctx.clear_rect(0.0, 0.0, w, h);
        self.ctx.set_fill_style_str(BACKGROUND_CSS);
        self.ctx.fill_rect(0.0, 0.0, w, h);
    }
}

fn js_err(value: JsValue) -> CanvasError {
    CanvasError::Context(format!("{value:?}"))
}
