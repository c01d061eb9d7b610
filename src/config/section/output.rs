//! Top-level output settings: `format` and `rasterizer`.
//!
//! # Example
//!
//! ```toml
//! format = "png"              # svg | png | sprite | font
//! retina = true               # also write <name>@2x.png
//! dpi = 90
//! rasterizer = "auto"         # auto | rsvg-convert | rsvg | inkscape
//! ```

use clap::ValueEnum;
use std::fmt;

/// What the exporter produces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// Transformed SVG files mirroring the input layout.
    Svg,
    /// One PNG per icon.
    #[default]
    Png,
    /// A single packed sheet (SVG + PNG).
    Sprite,
    /// An icon font compiled by `fontcustom`.
    Font,
}

impl ExportFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "svg" => Some(Self::Svg),
            "png" => Some(Self::Png),
            "sprite" => Some(Self::Sprite),
            "font" => Some(Self::Font),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Png => "png",
            Self::Sprite => "sprite",
            Self::Font => "font",
        }
    }

    /// Formats that produce PNG files.
    pub const fn needs_rasterizer(self) -> bool {
        matches!(self, Self::Png | Self::Sprite)
    }

}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// External SVG to PNG converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rasterizer {
    /// librsvg's `rsvg-convert`.
    RsvgConvert,
    /// Legacy librsvg `rsvg` wrapper.
    Rsvg,
    /// Inkscape 1.x command line.
    Inkscape,
}

impl Rasterizer {
    /// Probe order used for `rasterizer = "auto"`.
    pub const AUTO_ORDER: [Self; 3] = [Self::RsvgConvert, Self::Rsvg, Self::Inkscape];

    /// Parse a rasterizer name. `auto` is handled by the caller.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "rsvg-convert" => Some(Self::RsvgConvert),
            "rsvg" => Some(Self::Rsvg),
            "inkscape" => Some(Self::Inkscape),
            _ => None,
        }
    }

    /// Executable name.
    pub const fn program(self) -> &'static str {
        match self {
            Self::RsvgConvert => "rsvg-convert",
            Self::Rsvg => "rsvg",
            Self::Inkscape => "inkscape",
        }
    }
}

impl fmt::Display for Rasterizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program())
    }
}
