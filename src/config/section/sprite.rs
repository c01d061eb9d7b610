//! `[sprite]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [sprite]
//! cols = 12               # icons per row
//! outer_padding = 4       # margin around the whole sheet
//! icon_padding = 4        # margin around each icon
//! background = "#ffffff"  # optional sheet background
//! filename = "sprite"     # <output>/<filename>.svg|.png|.json
//! size_filter = 0         # only pack icons of this size (0 = all)
//! manifest = false        # write <filename>.json with icon positions
//! ```

use crate::config::types::{ConfigDiagnostics, FieldPath, HexColor, Lenient};
use crate::config::util;
use serde::Deserialize;

/// `[sprite]` as written in the config file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SpriteSection {
    pub cols: Option<Lenient<i64>>,
    pub outer_padding: Option<Lenient<i64>>,
    pub icon_padding: Option<Lenient<i64>>,
    pub background: Option<Lenient<String>>,
    pub filename: Option<Lenient<String>>,
    pub size_filter: Option<Lenient<i64>>,
    pub manifest: Option<Lenient<bool>>,
}

/// Validated sprite settings.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteConfig {
    pub cols: u32,
    pub outer_padding: u32,
    pub icon_padding: u32,
    pub background: Option<HexColor>,
    pub filename: String,
    /// Only icons of this nominal size are packed; 0 packs everything.
    pub size_filter: u32,
    pub manifest: bool,
}

impl SpriteConfig {
    pub const DEFAULT_COLS: u32 = 12;
    pub const DEFAULT_PADDING: u32 = 4;
    pub const DEFAULT_FILENAME: &'static str = "sprite";
}

impl Default for SpriteConfig {
    fn default() -> Self {
        Self {
            cols: Self::DEFAULT_COLS,
            outer_padding: Self::DEFAULT_PADDING,
            icon_padding: Self::DEFAULT_PADDING,
            background: None,
            filename: Self::DEFAULT_FILENAME.to_string(),
            size_filter: 0,
            manifest: false,
        }
    }
}

impl SpriteSection {
    pub fn resolve(&self, field: &FieldPath, diag: &mut ConfigDiagnostics) -> SpriteConfig {
        let cols_hint = format!("using {}", SpriteConfig::DEFAULT_COLS);
        let cols = util::positive(self.cols.as_ref(), &field.join("cols"), &cols_hint, diag)
            .unwrap_or(SpriteConfig::DEFAULT_COLS);

        let filename = util::string(
            self.filename.as_ref(),
            &field.join("filename"),
            "using \"sprite\"",
            diag,
        )
        .and_then(|name| {
            let name = name.trim();
            if name.is_empty() || name.contains(['/', '\\']) {
                diag.warn_with_hint(
                    field.join("filename"),
                    format!("`{name}` is not a plain file name"),
                    "using \"sprite\"",
                );
                None
            } else {
                Some(name.to_string())
            }
        })
        .unwrap_or_else(|| SpriteConfig::DEFAULT_FILENAME.to_string());

        SpriteConfig {
            cols,
            outer_padding: util::non_negative(
                self.outer_padding.as_ref(),
                &field.join("outer_padding"),
                SpriteConfig::DEFAULT_PADDING,
                diag,
            ),
            icon_padding: util::non_negative(
                self.icon_padding.as_ref(),
                &field.join("icon_padding"),
                SpriteConfig::DEFAULT_PADDING,
                diag,
            ),
            background: util::color(
                self.background.as_ref(),
                &field.join("background"),
                "no background is drawn",
                diag,
            ),
            filename,
            size_filter: util::non_negative(
                self.size_filter.as_ref(),
                &field.join("size_filter"),
                0,
                diag,
            ),
            manifest: util::boolean(self.manifest.as_ref(), &field.join("manifest"), false, diag),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(content: &str) -> (SpriteConfig, ConfigDiagnostics) {
        let raw: SpriteSection = toml::from_str(content).unwrap();
        let mut diag = ConfigDiagnostics::new();
        let config = raw.resolve(&FieldPath::new("sprite"), &mut diag);
        (config, diag)
    }

    #[test]
    fn test_defaults() {
        let (config, diag) = resolve("");
        assert_eq!(config, SpriteConfig::default());
        assert!(diag.is_empty());
    }

    #[test]
    fn test_custom_values() {
        let (config, diag) = resolve(
            r##"
            cols = 4
            outer_padding = 0
            icon_padding = 2
            background = "#F0F0F0"
            filename = "icons"
            size_filter = 24
            manifest = true
            "##,
        );
        assert!(diag.is_empty());
        assert_eq!(config.cols, 4);
        assert_eq!(config.outer_padding, 0);
        assert_eq!(config.icon_padding, 2);
        assert_eq!(config.background.unwrap().to_string(), "#f0f0f0");
        assert_eq!(config.filename, "icons");
        assert_eq!(config.size_filter, 24);
        assert!(config.manifest);
    }

    #[test]
    fn test_invalid_values() {
        let (config, diag) = resolve(
            r##"
            cols = 0
            outer_padding = -1
            background = "white"
            filename = "a/b"
            manifest = "yes"
            "##,
        );
        assert_eq!(config.cols, 12);
        assert_eq!(config.outer_padding, 4);
        assert_eq!(config.background, None);
        assert_eq!(config.filename, "sprite");
        assert!(!config.manifest);
        for field in [
            "sprite.cols",
            "sprite.outer_padding",
            "sprite.background",
            "sprite.filename",
            "sprite.manifest",
        ] {
            assert!(diag.has_warning_for(field), "no warning for {field}");
        }
    }
}
