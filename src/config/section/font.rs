//! `[font]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [font]
//! size_filter = 14                    # only icons of this size (0 = all)
//! output = "font"                     # relative to basedir
//! name = "icons"
//! css_selector = ".icon-{{glyph}}"
//! ```

use crate::config::types::{ConfigDiagnostics, FieldPath, Lenient};
use crate::config::util;
use crate::utils::path::expand_path;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// `[font]` as written in the config file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FontSection {
    pub size_filter: Option<Lenient<i64>>,
    pub output: Option<Lenient<String>>,
    pub name: Option<Lenient<String>>,
    pub css_selector: Option<Lenient<String>>,
}

/// Validated font settings.
#[derive(Debug, Clone, PartialEq)]
pub struct FontConfig {
    pub size_filter: u32,
    /// Directory `fontcustom` writes the font and stylesheet to.
    pub output: PathBuf,
    pub name: String,
    pub css_selector: String,
}

impl FontConfig {
    pub const DEFAULT_SIZE_FILTER: u32 = 14;
    pub const DEFAULT_NAME: &'static str = "icons";
    pub const DEFAULT_CSS_SELECTOR: &'static str = ".icon-{{glyph}}";

    pub fn with_root(root: &Path) -> Self {
        Self {
            size_filter: Self::DEFAULT_SIZE_FILTER,
            output: root.join("font"),
            name: Self::DEFAULT_NAME.to_string(),
            css_selector: Self::DEFAULT_CSS_SELECTOR.to_string(),
        }
    }
}

impl FontSection {
    /// Validate, resolving `output` against `root`.
    pub fn resolve(
        &self,
        field: &FieldPath,
        root: &Path,
        diag: &mut ConfigDiagnostics,
    ) -> FontConfig {
        let defaults = FontConfig::with_root(root);

        let output = util::string(
            self.output.as_ref(),
            &field.join("output"),
            "using <basedir>/font",
            diag,
        )
        .map_or(defaults.output, |raw| expand_path(&raw, root));

        let name = non_empty(
            util::string(self.name.as_ref(), &field.join("name"), "using \"icons\"", diag),
            &field.join("name"),
            "using \"icons\"",
            diag,
        )
        .unwrap_or(defaults.name);

        let css_selector = non_empty(
            util::string(
                self.css_selector.as_ref(),
                &field.join("css_selector"),
                "using \".icon-{{glyph}}\"",
                diag,
            ),
            &field.join("css_selector"),
            "using \".icon-{{glyph}}\"",
            diag,
        )
        .unwrap_or(defaults.css_selector);

        FontConfig {
            size_filter: util::non_negative(
                self.size_filter.as_ref(),
                &field.join("size_filter"),
                FontConfig::DEFAULT_SIZE_FILTER,
                diag,
            ),
            output,
            name,
            css_selector,
        }
    }
}

fn non_empty(
    value: Option<String>,
    field: &FieldPath,
    fallback: &str,
    diag: &mut ConfigDiagnostics,
) -> Option<String> {
    let value = value?;
    if value.trim().is_empty() {
        diag.warn_with_hint(field.clone(), "must not be empty", fallback);
        return None;
    }
    Some(value)
}
