//! Pen tool: the closed color palette, brush widths, and the current selection.
//!
//! The modal only ever offers these fixed choices, so both are plain enums.
//! A [`ToolState`] is read at the moment a segment is painted; changing it
//! never touches pixels that are already on the raster.

#[cfg(test)]
#[path = "tool_test.rs"]
mod tool_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CanvasError;

/// One of the six pen colors offered by the modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Orange,
    Green,
    Blue,
    #[default]
    Black,
    White,
}

impl Color {
    /// Palette in the order the buttons are laid out.
    pub const ALL: [Self; 6] = [Self::Red, Self::Orange, Self::Green, Self::Blue, Self::Black, Self::White];

    /// CSS color keyword.
    #[must_use]
    pub fn css_name(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Orange => "orange",
            Self::Green => "green",
            Self::Blue => "blue",
            Self::Black => "black",
            Self::White => "white",
        }
    }

    /// Opaque RGBA value of the CSS keyword.
    #[must_use]
    pub fn rgba(self) -> [u8; 4] {
        match self {
            Self::Red => [0xff, 0x00, 0x00, 0xff],
            Self::Orange => [0xff, 0xa5, 0x00, 0xff],
            Self::Green => [0x00, 0x80, 0x00, 0xff],
            Self::Blue => [0x00, 0x00, 0xff, 0xff],
            Self::Black => [0x00, 0x00, 0x00, 0xff],
            Self::White => [0xff, 0xff, 0xff, 0xff],
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.css_name())
    }
}

impl FromStr for Color {
    type Err = CanvasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.css_name() == name)
            .ok_or_else(|| CanvasError::UnknownColor(s.to_owned()))
    }
}

/// Stroke width in raster pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum BrushWidth {
    /// 5 px.
    Thin,
    /// 8 px.
    #[default]
    Medium,
    /// 12 px.
    Thick,
}

impl BrushWidth {
    pub const ALL: [Self; 3] = [Self::Thin, Self::Medium, Self::Thick];

    #[must_use]
    pub fn px(self) -> u32 {
        match self {
            Self::Thin => 5,
            Self::Medium => 8,
            Self::Thick => 12,
        }
    }
}

impl TryFrom<u32> for BrushWidth {
    type Error = CanvasError;

    fn try_from(px: u32) -> Result<Self, Self::Error> {
        match px {
            5 => Ok(Self::Thin),
            8 => Ok(Self::Medium),
            12 => Ok(Self::Thick),
            other => Err(CanvasError::InvalidBrushWidth(other)),
        }
    }
}

impl From<BrushWidth> for u32 {
    fn from(width: BrushWidth) -> Self {
        width.px()
    }
}

/// The pen as currently configured by the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ToolState {
    pub color: Color,
    pub width: BrushWidth,
}

impl ToolState {
    #[must_use]
    pub fn new(color: Color, width: BrushWidth) -> Self {
        Self { color, width }
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn set_width(&mut self, width: BrushWidth) {
        self.width = width;
    }
}
