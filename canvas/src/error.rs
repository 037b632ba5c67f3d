/// Errors produced by the canvas crate.
#[derive(Debug, thiserror::Error)]
pub enum CanvasError {
    /// A color name outside the six-entry palette.
    #[error("unknown pen color: {0}")]
    UnknownColor(String),
    /// A brush width other than 5, 8 or 12.
    #[error("invalid brush width: {0} (expected 5, 8 or 12)")]
    InvalidBrushWidth(u32),
    /// The browser refused to hand out a 2D rendering context.
    #[error("canvas context unavailable: {0}")]
    Context(String),
}
