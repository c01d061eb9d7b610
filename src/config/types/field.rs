//! Dotted config field path.

use owo_colors::OwoColorize;
use std::fmt;

/// Path of a config field, e.g. `global_style.shield.size`.
///
/// Per-icon override tables are keyed by icon id, so paths are built at
/// load time rather than fixed per struct.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath(String);

impl FieldPath {
    #[inline]
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Path of a child field.
    pub fn join(&self, key: &str) -> Self {
        if self.0.is_empty() {
            Self::new(key)
        } else {
            Self(format!("{}.{key}", self.0))
        }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_args!("`{}`", self.0).bright_blue())
    }
}

impl AsRef<str> for FieldPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
