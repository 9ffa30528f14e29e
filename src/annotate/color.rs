//! RGB color model for node and edge styling.

use anyhow::Result;
use std::fmt;

use crate::core::DepvizError;

/// An opaque RGB color.
///
/// Serialized as uppercase `#RRGGBB`, the form Graphviz attribute values
/// use. [`Color::decode`] additionally accepts `0x` prefixed hex and plain
/// decimal literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Self = Self::new(0x00, 0x00, 0x00);
    pub const WHITE: Self = Self::new(0xFF, 0xFF, 0xFF);
    pub const CORNFLOWER_BLUE: Self = Self::new(0x64, 0x95, 0xED);
    pub const GREEN: Self = Self::new(0x00, 0x80, 0x00);
    pub const DARK_GREY: Self = Self::new(0xA9, 0xA9, 0xA9);
    /// Fill used for the aggregated project roots
    pub const ROOT_GREY: Self = Self::new(0xDD, 0xDD, 0xDD);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self {
            r,
            g,
            b,
        }
    }

    /// Parse `#RRGGBB`, `0xRRGGBB` or a plain decimal literal.
    pub fn decode(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        let parsed = if let Some(hex) = trimmed.strip_prefix('#') {
            u32::from_str_radix(hex, 16)
        } else if let Some(hex) = trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X"))
        {
            u32::from_str_radix(hex, 16)
        } else {
            trimmed.parse::<u32>()
        };

        match parsed {
            Ok(rgb) if rgb <= 0x00FF_FFFF => Ok(Self::from_rgb(rgb)),
            _ => Err(DepvizError::InvalidColor {
                value: value.to_string(),
            }
            .into()),
        }
    }

    const fn from_rgb(rgb: u32) -> Self {
        Self::new(((rgb >> 16) & 0xFF) as u8, ((rgb >> 8) & 0xFF) as u8, (rgb & 0xFF) as u8)
    }

    /// Average this color with another, channel by channel.
    pub const fn mix(self, other: Self) -> Self {
        Self::new(
            ((self.r as u16 + other.r as u16) / 2) as u8,
            ((self.g as u16 + other.g as u16) / 2) as u8,
            ((self.b as u16 + other.b as u16) / 2) as u8,
        )
    }

    /// A paler variant, used for optional nodes.
    pub const fn lighten(self) -> Self {
        self.mix(Self::WHITE)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}
