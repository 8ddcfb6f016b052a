//! Drawing palette and brush sizes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::MaximusError;

/// Palette colors as (name, hex)
pub const PALETTE: &[(&str, &str)] = &[
    ("red", "#FF0000"),
    ("lime", "#00FF00"),
    ("blue", "#0000FF"),
    ("yellow", "#FFFF00"),
    ("magenta", "#FF00FF"),
    ("cyan", "#00FFFF"),
    ("orange", "#FFA500"),
    ("purple", "#800080"),
    ("green", "#008000"),
    ("pink", "#FFC0CB"),
    ("brown", "#A52A2A"),
    ("black", "#000000"),
    ("white", "#FFFFFF"),
];

pub const BRUSH_SIZES: &[u32] = &[2, 5, 10, 20, 30];

pub const DEFAULT_BRUSH_SIZE: u32 = 5;

/// A palette color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255 };

    fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#')?;
        if hex.len() != 6 {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    pub fn rgba(&self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = MaximusError;

    /// Accepts a palette name or its hex code. Colors outside the palette are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        PALETTE
            .iter()
            .find(|(name, hex)| name.eq_ignore_ascii_case(wanted) || hex.eq_ignore_ascii_case(wanted))
            .and_then(|(_, hex)| Color::from_hex(hex))
            .ok_or_else(|| MaximusError::InvalidColor(wanted.to_string()))
    }
}

/// Validate a brush size against the available brushes
pub fn brush_size(size: u32) -> Result<u32, MaximusError> {
    if BRUSH_SIZES.contains(&size) {
        Ok(size)
    } else {
        Err(MaximusError::InvalidBrushSize(size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_lookup() {
        let red: Color = "red".parse().unwrap();
        assert_eq!(red, Color { r: 255, g: 0, b: 0 });
        let orange: Color = "#ffa500".parse().unwrap();
        assert_eq!(orange.to_hex(), "#FFA500");
    }

    #[test]
    fn test_off_palette_rejected() {
        assert!(matches!(
            "#123456".parse::<Color>(),
            Err(MaximusError::InvalidColor(_))
        ));
    }

    #[test]
    fn test_every_palette_entry_parses() {
        for (name, _) in PALETTE {
            assert!(name.parse::<Color>().is_ok(), "{}", name);
        }
    }

    #[test]
    fn test_brush_sizes() {
        assert_eq!(brush_size(10).unwrap(), 10);
        assert!(brush_size(7).is_err());
    }
}
