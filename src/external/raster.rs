//! SVG to PNG rasterization through an external tool.
//!
//! | Tool           | Invocation                                                        |
//! |----------------|-------------------------------------------------------------------|
//! | `rsvg-convert` | `-a --zoom=<z> --format=png -o <dst> <src>`                       |
//! | `rsvg`         | `-a --zoom=<z> --format=png <src> <dst>`                          |
//! | `inkscape`     | `--export-dpi=<dpi> --export-type=png --export-filename=<dst> <src>` |
//!
//! librsvg tools take a zoom factor relative to 90 dpi instead of a dpi.

use crate::config::Rasterizer;
use crate::debug;
use crate::utils::exec::{Cmd, EMPTY_FILTER, FilterRule};
use anyhow::{Context, Result};
use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

/// Density the librsvg zoom factor is relative to.
const BASE_DPI: f64 = 90.0;

/// Progress chatter inkscape prints to stderr on success.
const INKSCAPE_FILTER: FilterRule =
    FilterRule::new(&["Background RRGGBBAA", "Area ", "Rendering ", "(inkscape:"]);

/// An installed rasterizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterTool {
    pub kind: Rasterizer,
    /// Resolved executable path.
    pub program: PathBuf,
}

impl RasterTool {
    pub fn new(kind: Rasterizer, program: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            program: program.into(),
        }
    }

    /// Command-line arguments rendering `src` into `dst` at `dpi`.
    pub fn args(&self, src: &Path, dst: &Path, dpi: f64) -> Vec<OsString> {
        let zoom = format!("--zoom={}", zoom(dpi));
        match self.kind {
            Rasterizer::RsvgConvert => vec![
                "-a".into(),
                zoom.into(),
                "--format=png".into(),
                "-o".into(),
                dst.into(),
                src.into(),
            ],
            Rasterizer::Rsvg => vec![
                "-a".into(),
                zoom.into(),
                "--format=png".into(),
                src.into(),
                dst.into(),
            ],
            Rasterizer::Inkscape => {
                let mut filename = OsString::from("--export-filename=");
                filename.push(dst);
                vec![
                    format!("--export-dpi={dpi}").into(),
                    "--export-type=png".into(),
                    filename,
                    src.into(),
                ]
            }
        }
    }

    /// Render `src` to `dst`, plus `<dst>@2x` at double density when `retina`.
    ///
    /// Returns the written files. Any failing pass is an error.
    pub fn rasterize(&self, src: &Path, dst: &Path, dpi: f64, retina: bool) -> Result<Vec<PathBuf>> {
        self.run(src, dst, dpi)?;
        let mut written = vec![dst.to_path_buf()];

        if retina {
            let hidpi = retina_path(dst);
            self.run(src, &hidpi, dpi * 2.0)?;
            written.push(hidpi);
        }
        Ok(written)
    }

    fn run(&self, src: &Path, dst: &Path, dpi: f64) -> Result<()> {
        let filter = match self.kind {
            Rasterizer::Inkscape => &INKSCAPE_FILTER,
            Rasterizer::RsvgConvert | Rasterizer::Rsvg => &EMPTY_FILTER,
        };
        Cmd::new(&self.program)
            .args(self.args(src, dst, dpi))
            .filter(filter)
            .run()
            .with_context(|| format!("failed to rasterize {}", src.display()))?;
        debug!("raster"; "{} -> {} ({dpi} dpi)", src.display(), dst.display());
        Ok(())
    }
}

/// librsvg zoom factor for `dpi`, rounded to two decimals.
pub fn zoom(dpi: f64) -> f64 {
    (dpi / BASE_DPI * 100.0).round() / 100.0
}

/// `icons/bank-24.png` → `icons/bank-24@2x.png`.
pub fn retina_path(path: &Path) -> PathBuf {
    let stem = path.file_stem().unwrap_or_default().to_string_lossy();
    let name = match path.extension() {
        Some(ext) => format!("{stem}@2x.{}", ext.to_string_lossy()),
        None => format!("{stem}@2x"),
    };
    path.with_file_name(name)
}
