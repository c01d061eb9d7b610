//! Icon file naming and exported icon records.
//!
//! Source icons are named `<id>-<size>.svg`, e.g. `bank-24.svg`. The id and
//! nominal size come from the file name, never from the document.

use regex::Regex;
use std::{
    path::{Path, PathBuf},
    sync::OnceLock,
};

fn name_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([a-z-]+)-([0-9]+)$").unwrap())
}

/// Parsed `<id>-<size>.svg` file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconName {
    pub id: String,
    pub size: u32,
}

impl IconName {
    /// Parse a file name. Anything but `<id>-<size>.svg` gives `None`.
    pub fn parse(file_name: &str) -> Option<Self> {
        let stem = file_name.strip_suffix(".svg")?;
        let captures = name_pattern().captures(stem)?;
        Some(Self {
            id: captures[1].to_string(),
            size: captures[2].parse().ok()?,
        })
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        Self::parse(path.file_name()?.to_str()?)
    }
}

/// An icon written by the batch driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedIcon {
    pub id: String,
    /// Edge length after transformation.
    pub size: u32,
    /// Input subdirectory it came from, `""` for the input root.
    pub dir: String,
    /// Written file.
    pub path: PathBuf,
}

impl ExportedIcon {
    /// File name of the written file, used for ordering.
    pub fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
    }
}
