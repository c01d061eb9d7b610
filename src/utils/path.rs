//! Path normalization utilities.
//!
//! - `normalize_path` - file system paths (canonicalize + fallback)
//! - `expand_path` - config paths with `~` expansion, relative to a base directory
//! - `remove_dir_if_empty` - cleanup of intermediate output directories

use std::{
    fs,
    path::{Path, PathBuf},
};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Falls back to:
/// - Return as-is if already absolute
/// - Join with current directory if relative
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Expand `~` in a config path and resolve it against `base`.
///
/// Absolute paths (after expansion) are returned unchanged.
pub fn expand_path(raw: &str, base: &Path) -> PathBuf {
    let expanded = PathBuf::from(shellexpand::tilde(raw).into_owned());
    if expanded.is_absolute() {
        expanded
    } else {
        base.join(expanded)
    }
}

/// Remove `dir` if it exists and holds no entries.
///
/// Returns true when the directory was removed.
pub fn remove_dir_if_empty(dir: &Path) -> bool {
    let is_empty = fs::read_dir(dir).is_ok_and(|mut entries| entries.next().is_none());
    is_empty && fs::remove_dir(dir).is_ok()
}
