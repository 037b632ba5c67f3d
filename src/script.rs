//! Stroke scripts: canned pen input for the headless participant.
//!
//! A script is a JSON array of strokes in display coordinates:
//!
//! ```json
//! [{ "color": "red", "width": 12, "points": [[100, 100], [100, 160]] }]
//! ```

use std::path::Path;

use canvas::{BrushWidth, Color, Point};
use serde::Deserialize;

use crate::session::DrawingSession;

#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("failed to read stroke script: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid stroke script: {0}")]
    Json(#[from] serde_json::Error),
}

/// One press-drag-release gesture.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Stroke {
    #[serde(default)]
    pub color: Color,
    #[serde(default)]
    pub width: BrushWidth,
    /// Display-space points; the first is the press position.
    pub points: Vec<[f64; 2]>,
}

/// Parse a script from JSON text.
///
/// # Errors
///
/// Returns [`ScriptError::Json`] on malformed input, unknown colors, or
/// brush widths outside 5/8/12.
pub fn parse(json: &str) -> Result<Vec<Stroke>, ScriptError> {
    Ok(serde_json::from_str(json)?)
}

/// Read and parse a script file.
///
/// # Errors
///
/// Returns [`ScriptError::Io`] if the file cannot be read, otherwise as [`parse`].
pub fn load(path: &Path) -> Result<Vec<Stroke>, ScriptError> {
    parse(&std::fs::read_to_string(path)?)
}

/// A single red vertical line, the default when no script is given.
#[must_use]
pub fn demo() -> Vec<Stroke> {
    vec![Stroke { color: Color::Red, width: BrushWidth::Thick, points: vec![[100.0, 100.0], [100.0, 160.0]] }]
}

/// Draw `strokes` into `session`, selecting each stroke's tool first.
///
/// Returns the number of segments painted.
pub fn replay(session: &mut DrawingSession, strokes: &[Stroke]) -> usize {
    let mut painted = 0;
    for stroke in strokes {
        let Some((first, rest)) = stroke.points.split_first() else {
            continue;
        };
        session.set_color(stroke.color);
        session.set_brush_width(stroke.width);
        session.pointer_down(Point::new(first[0], first[1]));
        for p in rest {
            if session.pointer_move(Point::new(p[0], p[1])).is_some() {
                painted += 1;
            }
        }
        session.pointer_up();
    }
    painted
}

#[cfg(test)]
#[path = "script_test.rs"]
mod tests;
