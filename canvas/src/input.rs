//! Pointer gesture state between pointer-down and pointer-up.

use crate::geometry::Point;

/// Whether a stroke is in progress, and where its pen currently is.
///
/// Positions are raster coordinates (already scaled).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InputState {
    /// No button held; pointer moves are ignored.
    #[default]
    Idle,
    /// Button held since `origin`; the pen was last at `last`.
    Drawing {
        /// Where the path began.
        origin: Point,
        /// End of the most recently painted segment.
        last: Point,
        /// Number of segments painted so far in this path.
        segments: usize,
    },
}

impl InputState {
    #[must_use]
    pub fn is_drawing(&self) -> bool {
        matches!(self, Self::Drawing { .. })
    }
}
