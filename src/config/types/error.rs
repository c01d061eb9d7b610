//! Configuration error types.

use super::FieldPath;
use owo_colors::OwoColorize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// ConfigError
// ============================================================================

/// Fatal configuration errors. Everything else degrades to a diagnostic.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("could not parse config file `{0}`")]
    Toml(PathBuf, #[source] toml::de::Error),
}

// ============================================================================
// ConfigDiagnostic
// ============================================================================

/// A single recoverable configuration problem.
#[derive(Debug, Clone)]
pub struct ConfigDiagnostic {
    /// Config field path (e.g., "global_style.shield.fill")
    pub field: FieldPath,
    /// Problem description
    pub message: String,
    /// Fallback or fix hint (optional)
    pub hint: Option<String>,
}

impl ConfigDiagnostic {
    pub fn new(field: FieldPath, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl fmt::Display for ConfigDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{} {} {}",
            "[".dimmed(),
            self.field.as_str().cyan(),
            "]".dimmed(),
            "→".yellow(),
            self.message
        )?;
        if let Some(hint) = &self.hint {
            write!(f, "\n  {} {}", "hint:".yellow(), hint)?;
        }
        Ok(())
    }
}

// ============================================================================
// ConfigDiagnostics
// ============================================================================

/// Warnings collected while normalizing the config.
#[derive(Debug, Default)]
pub struct ConfigDiagnostics {
    warnings: Vec<ConfigDiagnostic>,
}

impl ConfigDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(&mut self, field: FieldPath, message: impl Into<String>) {
        self.warnings.push(ConfigDiagnostic::new(field, message));
    }

    /// Add a warning with a hint (usually the fallback that was applied).
    pub fn warn_with_hint(
        &mut self,
        field: FieldPath,
        message: impl Into<String>,
        hint: impl Into<String>,
    ) {
        self.warnings
            .push(ConfigDiagnostic::new(field, message).with_hint(hint));
    }

    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn warnings(&self) -> &[ConfigDiagnostic] {
        &self.warnings
    }

    /// Whether any warning was reported for `field`.
    #[cfg(test)]
    pub fn has_warning_for(&self, field: &str) -> bool {
        self.warnings.iter().any(|w| w.field.as_str() == field)
    }

    /// Print collected warnings in a grouped format.
    pub fn print(&self) {
        if self.warnings.is_empty() {
            return;
        }

        crate::log!(
            "warning";
            "{} in config, using defaults:",
            crate::utils::plural::plural_count(self.warnings.len(), "problem")
        );
        for warning in &self.warnings {
            eprintln!("{warning}");
        }
    }
}
