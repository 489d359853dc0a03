//! # Colour Palette
//!
//! [`HexColor`] is a validated `#rrggbb` value and [`ColorPalette`] the fixed
//! 22-slot record every generator reads from.
//!
//! Parsing is case-insensitive; the stored form is always lower-case so the
//! same palette serializes to the same bytes no matter how it was typed.
//! Short hex (`#fff`) and alpha (`#rrggbbaa`) are rejected.

use crate::error::{Result, ThemeError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A validated, normalised `#rrggbb` colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor {
    r: u8,
    g: u8,
    b: u8,
}

impl HexColor {
    /// Build a colour from its channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` (case-insensitive).
    pub fn parse(value: &str) -> Result<Self> {
        let invalid = || {
            ThemeError::Validation(format!(
                "invalid color '{value}': expected #RRGGBB (6 hex digits, no alpha)"
            ))
        };

        let digits = value.strip_prefix('#').ok_or_else(invalid)?;
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
        Ok(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }

    /// Red, green and blue channels.
    pub fn channels(self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    /// Channels scaled to `0.0..=1.0`, as property lists want them.
    pub fn unit_channels(self) -> (f64, f64, f64) {
        (
            f64::from(self.r) / 255.0,
            f64::from(self.g) / 255.0,
            f64::from(self.b) / 255.0,
        )
    }

    /// WCAG relative luminance in `0.0..=1.0`.
    pub fn luminance(self) -> f64 {
        fn linear(c: f64) -> f64 {
            if c <= 0.039_28 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        let (r, g, b) = self.unit_channels();
        0.2126 * linear(r) + 0.7152 * linear(g) + 0.0722 * linear(b)
    }

    /// Blend `ratio` of `other` into `self` (0.0 keeps `self`, 1.0 yields `other`).
    pub fn mix(self, other: HexColor, ratio: f64) -> HexColor {
        let ratio = ratio.clamp(0.0, 1.0);
        let blend = |a: u8, b: u8| {
            let v = f64::from(a) * (1.0 - ratio) + f64::from(b) * ratio;
            v.round().clamp(0.0, 255.0) as u8
        };
        HexColor {
            r: blend(self.r, other.r),
            g: blend(self.g, other.g),
            b: blend(self.b, other.b),
        }
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for HexColor {
    type Error = ThemeError;

    fn try_from(value: String) -> Result<Self> {
        HexColor::parse(&value)
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.to_string()
    }
}

/// The 22 named colours that make up a theme.
///
/// Every field is required: a missing or malformed entry fails
/// deserialization and names the offending key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ColorPalette {
    pub background: HexColor,
    pub foreground: HexColor,
    pub cursor: HexColor,
    pub selection: HexColor,
    pub black: HexColor,
    pub red: HexColor,
    pub green: HexColor,
    pub yellow: HexColor,
    pub blue: HexColor,
    pub magenta: HexColor,
    pub cyan: HexColor,
    pub white: HexColor,
    pub bright_black: HexColor,
    pub bright_red: HexColor,
    pub bright_green: HexColor,
    pub bright_yellow: HexColor,
    pub bright_blue: HexColor,
    pub bright_magenta: HexColor,
    pub bright_cyan: HexColor,
    pub bright_white: HexColor,
    pub accent: HexColor,
    pub border: HexColor,
}

/// ANSI colour names in index order (`color0`..`color7`).
pub const ANSI_NAMES: [&str; 8] = [
    "black", "red", "green", "yellow", "blue", "magenta", "cyan", "white",
];

impl ColorPalette {
    /// The eight normal ANSI colours, index 0..=7.
    pub fn normal(&self) -> [HexColor; 8] {
        [
            self.black,
            self.red,
            self.green,
            self.yellow,
            self.blue,
            self.magenta,
            self.cyan,
            self.white,
        ]
    }

    /// The eight bright ANSI colours, index 8..=15.
    pub fn bright(&self) -> [HexColor; 8] {
        [
            self.bright_black,
            self.bright_red,
            self.bright_green,
            self.bright_yellow,
            self.bright_blue,
            self.bright_magenta,
            self.bright_cyan,
            self.bright_white,
        ]
    }

    /// All 16 ANSI colours in terminal index order.
    pub fn ansi(&self) -> [HexColor; 16] {
        let mut out = [self.black; 16];
        out[..8].copy_from_slice(&self.normal());
        out[8..].copy_from_slice(&self.bright());
        out
    }

    /// Whether the palette reads as a light theme (bright background).
    pub fn is_light(&self) -> bool {
        self.background.luminance() > 0.5
    }
}
