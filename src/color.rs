//! Color values and hex validation.

use once_cell::sync::Lazy;
use palette::Srgb;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

static HEX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#([0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").unwrap());

/// An opaque sRGB color.
///
/// Only `#RGB` and `#RRGGBB` text is accepted; anything else is rejected at
/// the configuration boundary, so renderers never see a malformed color.
/// Formats as lowercase `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color(Srgb<u8>);

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self(Srgb::new(red, green, blue))
    }

    /// Parses strict hex text. Returns `None` for anything else.
    pub fn parse(text: &str) -> Option<Self> {
        if !HEX_RE.is_match(text) {
            return None;
        }
        Srgb::<u8>::from_str(text).ok().map(Self)
    }

    /// Parses `text`, falling back to `fallback` when it is not valid hex.
    pub fn parse_or(text: &str, fallback: Color) -> Self {
        Self::parse(text).unwrap_or_else(|| {
            log::debug!("color {text:?} is not #RGB/#RRGGBB, using {fallback}");
            fallback
        })
    }

    /// Returns true if `text` is strict `#RGB` / `#RRGGBB` hex.
    pub fn is_valid_hex(text: &str) -> bool {
        HEX_RE.is_match(text)
    }

    pub fn red(&self) -> u8 {
        self.0.red
    }

    pub fn green(&self) -> u8 {
        self.0.green
    }

    pub fn blue(&self) -> u8 {
        self.0.blue
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:02x}{:02x}{:02x}",
            self.0.red, self.0.green, self.0.blue
        )
    }
}

impl From<Srgb<u8>> for Color {
    fn from(rgb: Srgb<u8>) -> Self {
        Self(rgb)
    }
}
