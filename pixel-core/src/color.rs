//! Hex color parsing and RGB565 packing.
//!
//! The design tool stores colors as CSS-style hex strings (`#RGB` or
//! `#RRGGBB`). The panel takes 16-bit colors with 5 bits red, 6 bits green
//! and 5 bits blue. Conversion is one-way: the low bits of each channel are
//! dropped.

use serde::{Deserialize, Serialize};

/// Leading character of every textual color.
pub const COLOR_MARKER: char = '#';

/// A 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Create a color from its channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RGB` or `#RRGGBB`.
    ///
    /// Returns `None` when the marker is missing, a digit is not hex, or the
    /// digit count is anything other than 3 or 6.
    #[must_use]
    pub fn parse_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix(COLOR_MARKER)?;
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }

        match digits.len() {
            3 => {
                let nibble = |i: usize| u8::from_str_radix(&digits[i..=i], 16).ok();
                // 0xA -> 0xAA
                Some(Self::new(
                    nibble(0)? * 0x11,
                    nibble(1)? * 0x11,
                    nibble(2)? * 0x11,
                ))
            }
            6 => {
                let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
                Some(Self::new(byte(0)?, byte(2)?, byte(4)?))
            }
            _ => None,
        }
    }
}

/// A packed 16-bit RGB565 panel color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackedColor(u16);

impl PackedColor {
    /// Black, also the value of an absent or malformed color.
    pub const BLACK: Self = Self(0x0000);
    /// White.
    pub const WHITE: Self = Self(0xFFFF);
    /// Pure red.
    pub const RED: Self = Self(0xF800);
    /// Pure green.
    pub const GREEN: Self = Self(0x07E0);
    /// Pure blue.
    pub const BLUE: Self = Self(0x001F);

    /// Wrap an already packed value.
    #[must_use]
    pub const fn from_raw(raw: u16) -> Self {
        Self(raw)
    }

    /// The packed value.
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Pack 8-bit channels, keeping the top 5/6/5 bits.
    #[must_use]
    #[allow(clippy::cast_lossless)]
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self((((r & 0xF8) as u16) << 8) | (((g & 0xFC) as u16) << 3) | ((b >> 3) as u16))
    }

    /// 5-bit red channel.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn red5(self) -> u8 {
        ((self.0 >> 11) & 0x1F) as u8
    }

    /// 6-bit green channel.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn green6(self) -> u8 {
        ((self.0 >> 5) & 0x3F) as u8
    }

    /// 5-bit blue channel.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn blue5(self) -> u8 {
        (self.0 & 0x1F) as u8
    }

    /// Approximate 24-bit color for host-side previews.
    ///
    /// Low bits are refilled by bit replication, so `#FFFFFF` and `#000000`
    /// survive exactly; nothing else is guaranteed to.
    #[must_use]
    pub const fn to_rgb(self) -> Rgb {
        let r = self.red5();
        let g = self.green6();
        let b = self.blue5();
        Rgb::new((r << 3) | (r >> 2), (g << 2) | (g >> 4), (b << 3) | (b >> 2))
    }
}

impl From<Rgb> for PackedColor {
    fn from(rgb: Rgb) -> Self {
        Self::from_rgb(rgb.r, rgb.g, rgb.b)
    }
}

impl std::fmt::Display for PackedColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{:04X}", self.0)
    }
}

/// Convert a document color string to a panel color.
///
/// Absent, empty and malformed strings all fall back to black.
#[must_use]
pub fn color_to_packed(hex: Option<&str>) -> PackedColor {
    hex.and_then(Rgb::parse_hex)
        .map_or(PackedColor::BLACK, PackedColor::from)
}
