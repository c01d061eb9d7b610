//! icon-export - batch icon transformer.
//!
//! Applies padding, shields, halos and recoloring to a set of SVG icons and
//! writes them as SVG, PNG, a sprite sheet or an icon font.

#![allow(dead_code)]

mod cli;
mod config;
mod external;
mod icon;
mod image;
mod logger;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, export::run_export};
use config::ExportConfig;
use external::Toolchain;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = ExportConfig::load(&cli)?;
    let toolchain = Toolchain::detect(&config)?;
    run_export(&config, &toolchain)?;
    Ok(())
}
