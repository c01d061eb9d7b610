//! Icon font compilation through `fontcustom`.

use crate::config::FontConfig;
use crate::icon::ExportedIcon;
use crate::utils::{exec::Cmd, plural::plural_count};
use crate::{debug, log};
use anyhow::{Context, Result};
use std::{
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
};

/// An installed `fontcustom`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontCompiler {
    pub program: PathBuf,
}

impl FontCompiler {
    pub const PROGRAM: &'static str = "fontcustom";

    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// `compile` arguments for the flat icon directory `source`.
    pub fn args(&self, source: &Path, font: &FontConfig, design_size: u32) -> Vec<OsString> {
        let mut output = OsString::from("--output=");
        output.push(&font.output);
        vec![
            "compile".into(),
            source.into(),
            "--force".into(),
            output,
            format!("--font-name={}", font.name).into(),
            "--no-hash".into(),
            format!("--font-design-size={design_size}").into(),
            format!("--css-selector={}", font.css_selector).into(),
        ]
    }

    /// Compile `icons` (all inside `source`) into a font, then delete them.
    ///
    /// Runs from `root` so fontcustom picks up a project-local config.
    pub fn compile(
        &self,
        source: &Path,
        icons: &[ExportedIcon],
        font: &FontConfig,
        root: &Path,
    ) -> Result<()> {
        if icons.is_empty() {
            log!("warning"; "no icons match size {}, font not compiled", font.size_filter);
            return Ok(());
        }

        let size = design_size(icons, font.size_filter);
        Cmd::new(&self.program)
            .args(self.args(source, font, size))
            .cwd(root)
            .run()
            .context("font compilation failed")?;

        for icon in icons {
            if let Err(e) = fs::remove_file(&icon.path) {
                log!("warning"; "failed to remove {}: {e}", icon.path.display());
            }
        }
        debug!("font"; "removed {} source files", icons.len());

        log!(
            "font";
            "compiled {} into `{}` ({})",
            plural_count(icons.len(), "glyph"),
            font.name,
            font.output.display()
        );
        Ok(())
    }
}

/// Largest transformed icon size, or `fallback` for an empty set.
pub fn design_size(icons: &[ExportedIcon], fallback: u32) -> u32 {
    icons.iter().map(|icon| icon.size).max().unwrap_or(fallback)
}
