//! Export configuration loaded from a TOML file.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Section definitions
//! │   ├── output     # format, rasterizer
//! │   ├── style      # [global_style] and per-icon overrides
//! │   ├── sprite     # [sprite]
//! │   └── font       # [font]
//! ├── types/         # Utility types
//! │   ├── color      # HexColor
//! │   ├── error      # ConfigError, ConfigDiagnostics
//! │   ├── field      # FieldPath
//! │   └── lenient    # Lenient<T>
//! ├── util.rs        # Normalization helpers
//! └── mod.rs         # ExportConfig (this file)
//! ```
//!
//! # Loading
//!
//! Loading never fails on a bad value. The file is parsed into raw tables,
//! every value is normalized into [`ExportConfig`] and each problem becomes a
//! diagnostic with the fallback that was applied. Only an unreadable or
//! unparseable file is fatal.

pub mod section;
pub mod types;
mod util;

pub use section::{
    ExportFormat, FontConfig, Halo, Rasterizer, Shield, SpriteConfig, Stroke, Style,
};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath, HexColor};

use crate::cli::Cli;
use crate::utils::path::{expand_path, normalize_path};
use anyhow::Result;
use section::{FontSection, SpriteSection, StyleConfig};
use serde::Deserialize;
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};
use types::Lenient;

/// Top-level keys that are not per-icon overrides.
const KNOWN_KEYS: &[&str] = &[
    "basedir",
    "input",
    "input_dirs",
    "output",
    "format",
    "retina",
    "dpi",
    "rasterizer",
    "global_style",
    "sprite",
    "font",
];

/// Keys that must hold a table.
const TABLE_KEYS: &[&str] = &["global_style", "sprite", "font"];

/// Default rasterization density.
pub const DEFAULT_DPI: f64 = 90.0;

// ============================================================================
// raw configuration
// ============================================================================

/// Root table minus per-icon overrides.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawConfig {
    basedir: Option<Lenient<String>>,
    input: Option<Lenient<String>>,
    input_dirs: Option<InputDirs>,
    output: Option<Lenient<String>>,
    format: Option<Lenient<String>>,
    retina: Option<Lenient<bool>>,
    dpi: Option<Lenient<f64>>,
    rasterizer: Option<Lenient<String>>,
    global_style: StyleConfig,
    sprite: SpriteSection,
    font: FontSection,
}

/// `input_dirs` accepts a list or a single directory.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InputDirs {
    Many(Vec<String>),
    One(String),
    Invalid(toml::Value),
}

// ============================================================================
// validated configuration
// ============================================================================

/// Validated export configuration, built once and passed by reference.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Absolute path of the config file.
    pub config_path: PathBuf,
    /// Base directory every relative path is resolved against.
    pub root: PathBuf,
    pub input: PathBuf,
    /// Subdirectories of `input` to export, `""` is `input` itself.
    pub input_dirs: Vec<String>,
    pub output: PathBuf,
    pub format: ExportFormat,
    pub retina: bool,
    pub dpi: f64,
    /// `None` picks the first installed rasterizer.
    pub rasterizer: Option<Rasterizer>,
    pub global_style: Style,
    /// Per-icon overrides keyed by icon id.
    pub overrides: BTreeMap<String, Style>,
    pub sprite: SpriteConfig,
    pub font: FontConfig,
}

impl ExportConfig {
    /// Load the config named on the command line and apply CLI overrides.
    ///
    /// Diagnostics are printed before returning.
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut diag = ConfigDiagnostics::new();
        let mut config = Self::from_path(&cli.config, &mut diag)?;
        diag.print();

        config.apply_cli(cli);
        Ok(config)
    }

    /// Read and parse a config file.
    pub fn from_path(path: &Path, diag: &mut ConfigDiagnostics) -> Result<Self, ConfigError> {
        let config_path = normalize_path(path);
        let content =
            fs::read_to_string(&config_path).map_err(|e| ConfigError::Io(config_path.clone(), e))?;
        Self::parse(&content, &config_path, diag)
    }

    /// Parse config `content` as if it were read from `config_path`.
    pub fn parse(
        content: &str,
        config_path: &Path,
        diag: &mut ConfigDiagnostics,
    ) -> Result<Self, ConfigError> {
        let toml_error = |e| ConfigError::Toml(config_path.to_path_buf(), e);

        let mut table: toml::Table = toml::from_str(content).map_err(toml_error)?;

        for key in TABLE_KEYS {
            if let Some(value) = table.get(*key)
                && !value.is_table()
            {
                diag.warn_with_hint(
                    FieldPath::new(*key),
                    format!("expected a table, found {value}"),
                    "using defaults",
                );
                table.remove(*key);
            }
        }

        let overrides = split_overrides(&mut table, diag);

        let raw: RawConfig =
            deserialize_reporting_unknown(toml::Value::Table(table), &FieldPath::default(), diag)
                .map_err(toml_error)?;

        let mut style_overrides = BTreeMap::new();
        for (id, value) in overrides {
            let field = FieldPath::new(id.as_str());
            let raw: StyleConfig =
                deserialize_reporting_unknown(value, &field, diag).map_err(toml_error)?;
            style_overrides.insert(id, raw.resolve(&field, diag));
        }

        let config_dir = config_path
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);

        Ok(Self::normalize(raw, style_overrides, config_path, &config_dir, diag))
    }

    fn normalize(
        raw: RawConfig,
        overrides: BTreeMap<String, Style>,
        config_path: &Path,
        config_dir: &Path,
        diag: &mut ConfigDiagnostics,
    ) -> Self {
        let root = resolve_root(raw.basedir.as_ref(), config_dir, diag);

        let input = util::string(raw.input.as_ref(), &FieldPath::new("input"), "using basedir", diag)
            .map_or_else(|| root.clone(), |input| expand_path(&input, &root));
        let output = util::string(
            raw.output.as_ref(),
            &FieldPath::new("output"),
            "using <basedir>/export",
            diag,
        )
        .map_or_else(|| root.join("export"), |output| expand_path(&output, &root));

        let format = match raw.format.as_ref() {
            None => ExportFormat::default(),
            Some(value) => value.as_str().and_then(ExportFormat::parse).unwrap_or_else(|| {
                diag.warn_with_hint(
                    FieldPath::new("format"),
                    format!("unknown format {value}"),
                    "expected svg, png, sprite or font; using svg",
                );
                ExportFormat::Svg
            }),
        };

        let dpi = match util::float(raw.dpi.as_ref(), &FieldPath::new("dpi"), "using 90", diag) {
            Some(dpi) if dpi > 0.0 => dpi,
            Some(dpi) => {
                diag.warn_with_hint(FieldPath::new("dpi"), format!("{dpi} must be positive"), "using 90");
                DEFAULT_DPI
            }
            None => DEFAULT_DPI,
        };

        let rasterizer = raw.rasterizer.as_ref().and_then(|value| {
            let name = value.as_str().map(str::trim);
            if name == Some("auto") {
                return None;
            }
            let parsed = name.and_then(Rasterizer::parse);
            if parsed.is_none() {
                diag.warn_with_hint(
                    FieldPath::new("rasterizer"),
                    format!("unknown rasterizer {value}"),
                    "expected auto, rsvg-convert, rsvg or inkscape; using auto",
                );
            }
            parsed
        });

        Self {
            config_path: config_path.to_path_buf(),
            input,
            input_dirs: resolve_input_dirs(raw.input_dirs, diag),
            output,
            format,
            retina: util::boolean(raw.retina.as_ref(), &FieldPath::new("retina"), false, diag),
            dpi,
            rasterizer,
            global_style: raw.global_style.resolve(&FieldPath::new("global_style"), diag),
            overrides,
            sprite: raw.sprite.resolve(&FieldPath::new("sprite"), diag),
            font: raw.font.resolve(&FieldPath::new("font"), &root, diag),
            root,
        }
    }

    /// Apply command-line overrides.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(output) = &cli.output {
            self.output = normalize_path(output);
        }
        if let Some(format) = cli.format {
            self.format = format;
        }
    }

    /// Effective style of one icon.
    ///
    /// Sprite sheets only take `fill` from overrides; fonts never keep the
    /// canvas.
    pub fn style_for(&self, icon_id: &str) -> Style {
        let mut style = match self.overrides.get(icon_id) {
            Some(over) => self
                .global_style
                .merged(over, self.format == ExportFormat::Sprite),
            None => self.global_style.clone(),
        };
        if self.format == ExportFormat::Font {
            style.canvas = Some(false);
        }
        style
    }

    /// Size filter for the current format, 0 when unfiltered.
    pub fn size_filter(&self) -> u32 {
        match self.format {
            ExportFormat::Sprite => self.sprite.size_filter,
            ExportFormat::Font => self.font.size_filter,
            ExportFormat::Svg | ExportFormat::Png => 0,
        }
    }
}

// ============================================================================
// helpers
// ============================================================================

/// Move every unknown top-level table out of `table` as an override.
///
/// Unknown scalars can't be overrides and are reported.
fn split_overrides(
    table: &mut toml::Table,
    diag: &mut ConfigDiagnostics,
) -> Vec<(String, toml::Value)> {
    let unknown: Vec<String> = table
        .keys()
        .filter(|key| !KNOWN_KEYS.contains(&key.as_str()))
        .cloned()
        .collect();

    let mut overrides = Vec::new();
    for key in unknown {
        let Some(value) = table.remove(&key) else {
            continue;
        };
        if value.is_table() {
            overrides.push((key, value));
        } else {
            diag.warn_with_hint(
                FieldPath::new(key.as_str()),
                "unknown key",
                "icon overrides must be tables; ignoring",
            );
        }
    }
    overrides
}

/// Deserialize `value`, reporting unknown fields below `field`.
fn deserialize_reporting_unknown<T>(
    value: toml::Value,
    field: &FieldPath,
    diag: &mut ConfigDiagnostics,
) -> Result<T, toml::de::Error>
where
    T: for<'de> Deserialize<'de>,
{
    let mut ignored = Vec::new();
    let parsed = serde_ignored::deserialize(value, |path: serde_ignored::Path| {
        ignored.push(path.to_string());
    })?;
    for path in ignored {
        diag.warn(field.join(&path), "unknown field, ignored");
    }
    Ok(parsed)
}

/// `basedir` must be absolute; anything else falls back to `config_dir`.
fn resolve_root(
    basedir: Option<&Lenient<String>>,
    config_dir: &Path,
    diag: &mut ConfigDiagnostics,
) -> PathBuf {
    let field = FieldPath::new("basedir");
    let hint = "using the config file's directory";
    let Some(raw) = util::string(basedir, &field, hint, diag) else {
        return config_dir.to_path_buf();
    };

    let expanded = PathBuf::from(shellexpand::tilde(&raw).into_owned());
    if expanded.is_absolute() {
        expanded
    } else {
        diag.warn_with_hint(field, format!("`{raw}` is not an absolute path"), hint);
        config_dir.to_path_buf()
    }
}

fn resolve_input_dirs(dirs: Option<InputDirs>, diag: &mut ConfigDiagnostics) -> Vec<String> {
    let dirs = match dirs {
        None => vec![String::new()],
        Some(InputDirs::One(dir)) => vec![dir],
        Some(InputDirs::Many(dirs)) => dirs,
        Some(InputDirs::Invalid(value)) => {
            diag.warn_with_hint(
                FieldPath::new("input_dirs"),
                format!("expected a list of directory names, found {value}"),
                "using the input directory itself",
            );
            vec![String::new()]
        }
    };
    dirs.into_iter()
        .map(|dir| dir.trim_matches('/').to_string())
        .collect()
}

/// Parse a config snippet rooted at `/icons` and assert it is warning-free.
#[cfg(test)]
pub fn test_parse_config(content: &str) -> ExportConfig {
    let mut diag = ConfigDiagnostics::new();
    let config = ExportConfig::parse(content, Path::new("/icons/export.toml"), &mut diag).unwrap();
    assert!(
        diag.is_empty(),
        "test config has warnings: {:?}",
        diag.warnings()
    );
    config
}

// ============================================================================
// tests
// ============================================================================
