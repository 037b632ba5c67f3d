//! Software painting onto the RGBA raster.
//!
//! A stroke segment covers every pixel whose center lies within half the
//! brush width of the segment, which gives round caps and round joins. There
//! is no anti-aliasing; covered pixels take the pen color outright.

#[cfg(test)]
#[path = "raster_test.rs"]
mod raster_test;

use image::{Rgba, RgbaImage};

use crate::geometry::Point;

/// Paint a segment from `a` to `b`, `width` raster pixels wide.
///
/// Returns the number of pixels written.
pub fn paint_segment(img: &mut RgbaImage, a: Point, b: Point, width: f64, color: [u8; 4]) -> usize {
    let radius = width * 0.5;
    if radius <= 0.0 || img.width() == 0 || img.height() == 0 {
        return 0;
    }

    let (x0, x1) = span(a.x.min(b.x) - radius, a.x.max(b.x) + radius, img.width());
    let (y0, y1) = span(a.y.min(b.y) - radius, a.y.max(b.y) + radius, img.height());

    let r2 = radius * radius;
    let mut written = 0;
    for y in y0..y1 {
        for x in x0..x1 {
            let center = Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
            if dist2_to_segment(center, a, b) <= r2 {
                img.put_pixel(x, y, Rgba(color));
                written += 1;
            }
        }
    }
    written
}

/// Overwrite every pixel with `color`.
pub fn fill(img: &mut RgbaImage, color: [u8; 4]) {
    for px in img.pixels_mut() {
        *px = Rgba(color);
    }
}

/// Squared distance from `p` to the closed segment `a`–`b`.
#[must_use]
pub fn dist2_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len2 = dx * dx + dy * dy;
    let t = if len2 > 0.0 { (((p.x - a.x) * dx + (p.y - a.y) * dy) / len2).clamp(0.0, 1.0) } else { 0.0 };
    let (cx, cy) = (a.x + t * dx, a.y + t * dy);
    (p.x - cx) * (p.x - cx) + (p.y - cy) * (p.y - cy)
}

/// Clamp a float range to pixel indices `[lo, hi)` within `0..limit`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn span(lo: f64, hi: f64, limit: u32) -> (u32, u32) {
    let max = f64::from(limit);
    let lo = lo.floor().clamp(0.0, max) as u32;
    let hi = hi.ceil().clamp(0.0, max) as u32;
    (lo, hi)
}
