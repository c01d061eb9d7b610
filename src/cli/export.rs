//! Batch export orchestration.
//!
//! Export phases:
//! - **Collect** - `<id>-<size>.svg` files of every input directory, sorted
//! - **Transform** - per-icon style applied and written under the output root
//! - **Rasterize** - png mode only, one PNG (plus `@2x`) per icon
//! - **Finish** - sprite packing or font compilation
//!
//! Per-icon problems (unreadable file, bad document, unwritable output) skip
//! that icon. A failing external tool stops the run.

use crate::{
    config::{ExportConfig, ExportFormat},
    debug,
    external::{RasterTool, Toolchain},
    icon::{ExportedIcon, IconName},
    image::{sprite::pack_sprite, svg::transform_icon},
    log,
    logger::ProgressLine,
    utils::plural::plural_count,
};
use anyhow::{Context, Result};
use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// Outcome of a run.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Icons written by the transform phase, in processing order.
    pub icons: Vec<ExportedIcon>,
    /// Icons skipped because of a recoverable problem.
    pub skipped: usize,
    /// Final artifacts: PNGs, the sprite sheet and manifest.
    pub outputs: Vec<PathBuf>,
}

/// One input directory and its icons.
struct SourceDir {
    name: String,
    icons: Vec<(PathBuf, IconName)>,
}

/// Run the whole export for `config`.
pub fn run_export(config: &ExportConfig, toolchain: &Toolchain) -> Result<BatchReport> {
    log!(
        "export";
        "{} -> {} ({})",
        config.input.display(),
        config.output.display(),
        config.format
    );

    let mut report = export_icons(config, toolchain)?;

    match config.format {
        ExportFormat::Sprite => finish_sprite(config, toolchain, &mut report)?,
        ExportFormat::Font => {
            let compiler = toolchain
                .font_compiler
                .as_ref()
                .context("no font compiler available")?;
            compiler.compile(&config.output, &report.icons, &config.font, &config.root)?;
        }
        ExportFormat::Svg | ExportFormat::Png => {}
    }

    log!(
        "export";
        "exported {}{}",
        plural_count(report.icons.len(), "icon"),
        if report.skipped > 0 {
            format!(", skipped {}", report.skipped)
        } else {
            String::new()
        }
    );
    Ok(report)
}

/// Transform (and in png mode rasterize) every matching icon.
pub fn export_icons(config: &ExportConfig, toolchain: &Toolchain) -> Result<BatchReport> {
    let rasterizer = if config.format == ExportFormat::Png {
        Some(
            toolchain
                .rasterizer
                .as_ref()
                .context("no rasterizer available")?,
        )
    } else {
        None
    };

    let sources = collect_sources(config);
    let counts: Vec<(String, usize)> = sources
        .iter()
        .map(|source| (source.name.clone(), source.icons.len()))
        .collect();
    let progress = ProgressLine::new(&counts);

    let mut report = BatchReport::default();
    for source in &sources {
        for (path, name) in &source.icons {
            match export_icon(config, &source.name, path, name)? {
                Some(icon) => {
                    let icon = match rasterizer {
                        Some(tool) => rasterize_icon(config, tool, icon, &mut report.outputs)?,
                        None => icon,
                    };
                    report.icons.push(icon);
                }
                None => report.skipped += 1,
            }
            progress.inc(&source.name);
        }
    }
    progress.finish();

    Ok(report)
}

/// Matching icons of every configured input directory.
///
/// Missing directories are reported and skipped.
fn collect_sources(config: &ExportConfig) -> Vec<SourceDir> {
    let size_filter = config.size_filter();

    config
        .input_dirs
        .iter()
        .filter_map(|dir| {
            let path = config.input.join(dir);
            match list_icons(&path) {
                Ok(mut icons) => {
                    if size_filter > 0 {
                        icons.retain(|(_, name)| name.size == size_filter);
                    }
                    debug!("export"; "{}: {}", path.display(), plural_count(icons.len(), "icon"));
                    Some(SourceDir {
                        name: dir.clone(),
                        icons,
                    })
                }
                Err(e) => {
                    log!("warning"; "skipping input directory {}: {e}", path.display());
                    None
                }
            }
        })
        .collect()
}

/// `<id>-<size>.svg` files directly inside `dir`, sorted by name.
fn list_icons(dir: &Path) -> io::Result<Vec<(PathBuf, IconName)>> {
    let mut icons = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        if let Some(name) = IconName::from_path(&path) {
            icons.push((path, name));
        }
    }
    icons.sort_by(|(a, _), (b, _)| a.cmp(b));
    Ok(icons)
}

/// Transform one icon and write it. `None` means it was skipped.
fn export_icon(
    config: &ExportConfig,
    dir: &str,
    path: &Path,
    name: &IconName,
) -> Result<Option<ExportedIcon>> {
    let markup = match fs::read_to_string(path) {
        Ok(markup) => markup,
        Err(e) => {
            log!("warning"; "failed to read {}: {e}", path.display());
            return Ok(None);
        }
    };

    let style = config.style_for(&name.id);
    let transformed = match transform_icon(&style, &name.id, name.size, &markup) {
        Ok(transformed) => transformed,
        Err(e) => {
            log!("warning"; "skipping {}: {e}", path.display());
            return Ok(None);
        }
    };
    for warning in &transformed.warnings {
        log!("warning"; "{}: {warning}", name.id);
    }

    let target = output_path(config, dir, &name.id, transformed.size);
    if let Err(e) = write_file(&target, &transformed.markup) {
        log!("warning"; "could not save {}: {e}", target.display());
        return Ok(None);
    }
    debug!("export"; "{} -> {}", path.display(), target.display());

    Ok(Some(ExportedIcon {
        id: name.id.clone(),
        size: transformed.size,
        dir: dir.to_string(),
        path: target,
    }))
}

/// Where a transformed icon is written.
///
/// Fonts take a flat `<id>.svg`; everything else mirrors the input layout
/// as `<dir>/<id>-<size>.svg` with the transformed size.
fn output_path(config: &ExportConfig, dir: &str, id: &str, size: u32) -> PathBuf {
    match config.format {
        ExportFormat::Font => config.output.join(format!("{id}.svg")),
        _ => config.output.join(dir).join(format!("{id}-{size}.svg")),
    }
}

fn write_file(path: &Path, content: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)
}

/// Replace a written SVG by its PNG rendering.
fn rasterize_icon(
    config: &ExportConfig,
    tool: &RasterTool,
    icon: ExportedIcon,
    outputs: &mut Vec<PathBuf>,
) -> Result<ExportedIcon> {
    let png = icon.path.with_extension("png");
    outputs.extend(tool.rasterize(&icon.path, &png, config.dpi, config.retina)?);
    fs::remove_file(&icon.path)
        .with_context(|| format!("failed to remove {}", icon.path.display()))?;
    Ok(ExportedIcon { path: png, ..icon })
}

/// Pack the sheet and render it to PNG.
fn finish_sprite(
    config: &ExportConfig,
    toolchain: &Toolchain,
    report: &mut BatchReport,
) -> Result<()> {
    let Some(packed) = pack_sprite(&report.icons, &config.sprite, &config.output)? else {
        return Ok(());
    };

    let tool = toolchain
        .rasterizer
        .as_ref()
        .context("no rasterizer available")?;
    let png = packed.svg_path.with_extension("png");
    let rasters = tool.rasterize(&packed.svg_path, &png, config.dpi, config.retina)?;

    report.outputs.push(packed.svg_path);
    report.outputs.extend(rasters);
    report.outputs.extend(packed.manifest_path);
    Ok(())
}

// ============================================================================
// tests
// ============================================================================
