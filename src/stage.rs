//! Which sub-view of the sketch modal is active.

use std::fmt;

#[cfg(test)]
#[path = "stage_test.rs"]
mod tests;

/// Modal stage. A label for the host's view of this participant; drawing and
/// submitting stay available in every stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stage {
    /// Canvas and toolbar shown; the user may draw and submit.
    #[default]
    Drawing,
    /// At least one drawing was sent since the host last started drawing.
    Submitted,
}

/// Things that move the modal between stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageEvent {
    /// The host sent `startDrawing`.
    StartDrawing,
    /// This participant's drawing was emitted.
    Submitted,
}

impl Stage {
    /// Next stage after `event`.
    #[must_use]
    pub fn apply(self, event: StageEvent) -> Self {
        match (self, event) {
            (_, StageEvent::StartDrawing) => Self::Drawing,
            (_, StageEvent::Submitted) => Self::Submitted,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Drawing => "drawing",
            Self::Submitted => "submitted",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
