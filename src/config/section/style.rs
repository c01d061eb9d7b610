//! `[global_style]` and per-icon override tables.
//!
//! # Example
//!
//! ```toml
//! [global_style]
//! padding = 2
//! fill = "#734a08"
//!
//! [global_style.shield]
//! size = 20
//! rounded = 3
//! fill = "#ffffff"
//! stroke-fill = "#734a08"
//! stroke-width = 1
//!
//! [global_style.halo]
//! fill = "#ffffff"
//! width = 1
//! opacity = 0.5
//!
//! # Overrides are keyed by icon id
//! [bank]
//! fill = "#000000"
//! ```
//!
//! Raw tables ([`StyleConfig`]) are resolved once at load time into
//! validated [`Style`] values; size-dependent shield checks happen per icon
//! in the transformer.

use crate::config::types::{ConfigDiagnostics, FieldPath, HexColor, Lenient};
use crate::config::util;
use serde::Deserialize;

/// Default halo opacity.
pub const DEFAULT_HALO_OPACITY: f64 = 0.3;

// ============================================================================
// raw tables
// ============================================================================

/// Style table as written in the config file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub padding: Option<Lenient<i64>>,
    pub fill: Option<Lenient<String>>,
    pub shield: Option<Lenient<ShieldConfig>>,
    pub halo: Option<Lenient<HaloConfig>>,
    pub canvas: Option<Lenient<bool>>,
}

/// `shield` sub-table.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ShieldConfig {
    pub size: Option<Lenient<i64>>,
    pub rounded: Option<Lenient<i64>>,
    pub fill: Option<Lenient<String>>,
    #[serde(rename = "stroke-fill", alias = "stroke_fill")]
    pub stroke_fill: Option<Lenient<String>>,
    #[serde(rename = "stroke-width", alias = "stroke_width")]
    pub stroke_width: Option<Lenient<f64>>,
}

/// `halo` sub-table.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct HaloConfig {
    pub fill: Option<Lenient<String>>,
    pub width: Option<Lenient<f64>>,
    pub opacity: Option<Lenient<f64>>,
}

// ============================================================================
// validated style
// ============================================================================

/// Validated style. `None` fields are unset and may be filled by a merge.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Style {
    pub padding: Option<u32>,
    pub fill: Option<HexColor>,
    pub shield: Option<Shield>,
    pub halo: Option<Halo>,
    pub canvas: Option<bool>,
}

/// Background shape drawn behind the icon.
#[derive(Debug, Clone, PartialEq)]
pub struct Shield {
    /// Requested edge length; `None` means "same as the icon".
    pub size: Option<u32>,
    /// Corner radius, 0 for square corners.
    pub rounded: u32,
    pub fill: HexColor,
    pub stroke: Option<Stroke>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub fill: HexColor,
    pub width: f64,
}

/// Outline duplicate of the icon path drawn behind it.
#[derive(Debug, Clone, PartialEq)]
pub struct Halo {
    pub fill: HexColor,
    pub width: f64,
    pub opacity: f64,
}

impl Style {
    /// Apply `over` on top of this style.
    ///
    /// Top-level keys present in `over` replace the ones here wholesale
    /// (an override `shield` replaces the global shield, it is not merged).
    /// With `fill_only`, every key but `fill` is ignored.
    pub fn merged(&self, over: &Style, fill_only: bool) -> Style {
        let fill = over.fill.or(self.fill);
        if fill_only {
            return Style {
                fill,
                ..self.clone()
            };
        }
        Style {
            padding: over.padding.or(self.padding),
            fill,
            shield: over.shield.clone().or_else(|| self.shield.clone()),
            halo: over.halo.clone().or_else(|| self.halo.clone()),
            canvas: over.canvas.or(self.canvas),
        }
    }

    /// Effective padding (0 when unset).
    pub fn padding(&self) -> u32 {
        self.padding.unwrap_or(0)
    }

    /// Whether the canvas element should be kept.
    pub fn keeps_canvas(&self) -> bool {
        self.canvas.unwrap_or(true)
    }
}

// ============================================================================
// resolution
// ============================================================================

impl StyleConfig {
    /// Validate this table, reporting problems under `field`.
    pub fn resolve(&self, field: &FieldPath, diag: &mut ConfigDiagnostics) -> Style {
        let padding = self
            .padding
            .as_ref()
            .map(|value| util::non_negative(Some(value), &field.join("padding"), 0, diag));

        let fill = util::color(
            self.fill.as_ref(),
            &field.join("fill"),
            "leaving the icon fill unchanged",
            diag,
        );

        let canvas = self.canvas.as_ref().and_then(|value| {
            let field = field.join("canvas");
            let parsed = value.as_bool();
            if parsed.is_none() {
                diag.warn_with_hint(field, format!("{value} is not a boolean"), "keeping the canvas");
            }
            parsed
        });

        let shield = self.shield.as_ref().and_then(|shield| {
            let field = field.join("shield");
            match shield {
                Lenient::Valid(shield) => Some(shield.resolve(&field, diag)),
                Lenient::Invalid(value) => {
                    diag.warn_with_hint(field, format!("{value} is not a table"), "no shield is drawn");
                    None
                }
            }
        });

        let halo = self.halo.as_ref().and_then(|halo| {
            let field = field.join("halo");
            match halo {
                Lenient::Valid(halo) => Some(halo.resolve(&field, diag)),
                Lenient::Invalid(value) => {
                    diag.warn_with_hint(field, format!("{value} is not a table"), "no halo is drawn");
                    None
                }
            }
        });

        Style {
            padding,
            fill,
            shield,
            halo,
            canvas,
        }
    }
}

impl ShieldConfig {
    fn resolve(&self, field: &FieldPath, diag: &mut ConfigDiagnostics) -> Shield {
        let size = util::positive(
            self.size.as_ref(),
            &field.join("size"),
            "using the icon size",
            diag,
        );
        let rounded = util::non_negative(self.rounded.as_ref(), &field.join("rounded"), 0, diag);
        let fill = util::color(
            self.fill.as_ref(),
            &field.join("fill"),
            "using #000000 (black)",
            diag,
        )
        .unwrap_or(HexColor::BLACK);

        Shield {
            size,
            rounded,
            fill,
            stroke: self.resolve_stroke(field, diag),
        }
    }

    /// Stroke needs both `stroke-fill` and `stroke-width`.
    ///
    /// A width `<= 0` disables the stroke without a warning.
    fn resolve_stroke(&self, field: &FieldPath, diag: &mut ConfigDiagnostics) -> Option<Stroke> {
        let fill = util::color(
            self.stroke_fill.as_ref(),
            &field.join("stroke-fill"),
            "no stroke is drawn",
            diag,
        );
        let width = util::float(
            self.stroke_width.as_ref(),
            &field.join("stroke-width"),
            "no stroke is drawn",
            diag,
        );

        match (fill, width) {
            (_, Some(width)) if width <= 0.0 => None,
            (Some(fill), Some(width)) => Some(Stroke { fill, width }),
            (None, None) => None,
            _ if self.stroke_fill.is_some() && self.stroke_width.is_some() => None,
            _ => {
                diag.warn_with_hint(
                    field.clone(),
                    "`stroke-fill` and `stroke-width` must be set together",
                    "no stroke is drawn",
                );
                None
            }
        }
    }
}

impl HaloConfig {
    fn resolve(&self, field: &FieldPath, diag: &mut ConfigDiagnostics) -> Halo {
        let fill = util::color(
            self.fill.as_ref(),
            &field.join("fill"),
            "using #ffffff (white)",
            diag,
        )
        .unwrap_or(HexColor::WHITE);

        let width = match util::float(self.width.as_ref(), &field.join("width"), "using 0", diag) {
            Some(width) if width < 0.0 => {
                diag.warn_with_hint(
                    field.join("width"),
                    format!("negative halo width {width} is not allowed"),
                    "using 1",
                );
                1.0
            }
            Some(width) => width,
            None => 0.0,
        };

        let opacity_hint = format!("using {DEFAULT_HALO_OPACITY}");
        let opacity = match util::float(
            self.opacity.as_ref(),
            &field.join("opacity"),
            &opacity_hint,
            diag,
        ) {
            Some(opacity) if opacity > 0.0 && opacity <= 1.0 => opacity,
            Some(opacity) => {
                diag.warn_with_hint(
                    field.join("opacity"),
                    format!("opacity {opacity} must lie in (0, 1]"),
                    opacity_hint,
                );
                DEFAULT_HALO_OPACITY
            }
            None => DEFAULT_HALO_OPACITY,
        };

        Halo {
            fill,
            width,
            opacity,
        }
    }
}

// ============================================================================
// tests
// ============================================================================
