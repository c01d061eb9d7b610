//! Command-line interface definitions.

use crate::config::ExportFormat;
use clap::{ColorChoice, Parser};
use std::path::PathBuf;

/// Batch icon exporter: padding, shields, halos and recoloring, written as
/// SVG, PNG, a sprite sheet or an icon font
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Export config file (TOML)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Output directory, overrides `output` in the config
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// Output format, overrides `format` in the config
    #[arg(short, long, value_enum)]
    pub format: Option<ExportFormat>,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,

    /// Control colored output (auto, always, never)
    #[arg(long, default_value = "auto")]
    pub color: ColorChoice,
}
