//! External tools: rasterizers and the icon font compiler.
//!
//! Tools are located once at startup. A tool the chosen format needs but
//! that isn't installed stops the run before any icon is touched.

mod font;
mod raster;

pub use font::FontCompiler;
pub use raster::RasterTool;

use crate::config::{ExportConfig, ExportFormat, Rasterizer};
use crate::debug;
use anyhow::{Result, bail};
use std::path::PathBuf;

/// Tools required by the configured format.
#[derive(Debug, Clone, Default)]
pub struct Toolchain {
    pub rasterizer: Option<RasterTool>,
    pub font_compiler: Option<FontCompiler>,
}

impl Toolchain {
    /// Locate the tools `config.format` needs on `PATH`.
    pub fn detect(config: &ExportConfig) -> Result<Self> {
        Self::detect_with(config, |program| which::which(program).ok())
    }

    fn detect_with(
        config: &ExportConfig,
        lookup: impl Fn(&str) -> Option<PathBuf>,
    ) -> Result<Self> {
        let mut toolchain = Self::default();

        if config.format.needs_rasterizer() {
            let Some(tool) = find_rasterizer(config.rasterizer, &lookup) else {
                match config.rasterizer {
                    Some(wanted) => bail!(
                        "rasterizer `{wanted}` not found, install it or set rasterizer = \"auto\""
                    ),
                    None => bail!(
                        "no rasterizer found for {} output, install rsvg-convert, rsvg or inkscape",
                        config.format
                    ),
                }
            };
            debug!("export"; "rasterizer: {}", tool.program.display());
            toolchain.rasterizer = Some(tool);
        }

        if config.format == ExportFormat::Font {
            let Some(program) = lookup(FontCompiler::PROGRAM) else {
                bail!("`fontcustom` not found, it is required for font output");
            };
            debug!("export"; "font compiler: {}", program.display());
            toolchain.font_compiler = Some(FontCompiler::new(program));
        }

        Ok(toolchain)
    }
}

/// The requested rasterizer, or the first installed one in probe order.
fn find_rasterizer(
    preferred: Option<Rasterizer>,
    lookup: &impl Fn(&str) -> Option<PathBuf>,
) -> Option<RasterTool> {
    let candidates = match preferred {
        Some(kind) => vec![kind],
        None => Rasterizer::AUTO_ORDER.to_vec(),
    };
    candidates.into_iter().find_map(|kind| {
        lookup(kind.program()).map(|program| RasterTool::new(kind, program))
    })
}
