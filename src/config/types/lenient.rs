//! Lenient scalar config values.
//!
//! Config scalars deserialize into [`Lenient`] so that a value of the wrong
//! type is kept around for a diagnostic instead of failing the whole parse.

use serde::Deserialize;
use std::fmt;

/// A config value that either has the expected type or is kept raw.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Lenient<T> {
    Valid(T),
    Invalid(toml::Value),
}

impl Lenient<i64> {
    /// Integer value, also accepting numeric strings and whole floats.
    #[allow(clippy::cast_possible_truncation)]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Valid(n) => Some(*n),
            Self::Invalid(toml::Value::String(s)) => s.trim().parse().ok(),
            Self::Invalid(toml::Value::Float(f)) if f.fract() == 0.0 => Some(*f as i64),
            Self::Invalid(_) => None,
        }
    }
}

impl Lenient<f64> {
    /// Float value, also accepting numeric strings.
    pub fn as_float(&self) -> Option<f64> {
        let value = match self {
            Self::Valid(f) => Some(*f),
            Self::Invalid(toml::Value::String(s)) => s.trim().parse().ok(),
            Self::Invalid(_) => None,
        };
        value.filter(|f| f.is_finite())
    }
}

impl Lenient<bool> {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Valid(b) => Some(*b),
            Self::Invalid(_) => None,
        }
    }
}

impl Lenient<String> {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Valid(s) => Some(s),
            Self::Invalid(_) => None,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Lenient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Valid(value) => write!(f, "{value}"),
            Self::Invalid(value) => write!(f, "{value}"),
        }
    }
}
