//! Hex color values used for fills, strokes and backgrounds.

use std::fmt;

/// A 6-digit hex color, printed as lowercase `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HexColor([u8; 3]);

impl HexColor {
    pub const BLACK: Self = Self([0x00, 0x00, 0x00]);
    pub const WHITE: Self = Self([0xff, 0xff, 0xff]);

    /// Parse `#rrggbb` (either case). Short forms and named colors are rejected.
    pub fn parse(value: &str) -> Option<Self> {
        let hex = value.trim().strip_prefix('#')?;
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Self([r, g, b]))
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{r:02x}{g:02x}{b:02x}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert_eq!(HexColor::parse("#1a1a1a").unwrap().to_string(), "#1a1a1a");
        assert_eq!(HexColor::parse("#FFAA00").unwrap().to_string(), "#ffaa00");
        assert_eq!(HexColor::parse("#000000"), Some(HexColor::BLACK));
    }

    #[test]
    fn test_parse_invalid() {
        for value in ["", "#fff", "112233", "#11223", "#1122334", "#gg0000", "red", "#fffff"] {
            assert_eq!(HexColor::parse(value), None, "accepted {value:?}");
        }
    }

    #[test]
    fn test_constants() {
        assert_eq!(HexColor::BLACK.to_string(), "#000000");
        assert_eq!(HexColor::WHITE.to_string(), "#ffffff");
    }
}
