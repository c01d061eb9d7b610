//! Normalization helpers turning lenient raw values into validated ones.
//!
//! Every helper reports problems to [`ConfigDiagnostics`] and returns the
//! documented fallback instead of failing.

use super::types::{ConfigDiagnostics, FieldPath, HexColor, Lenient};

/// Hint attached to every rejected color.
pub const COLOR_FORMAT_HINT: &str = "format colors as hex, e.g. #1a1a1a";

/// Integer `>= 0`. Missing values give `default` silently.
pub fn non_negative(
    value: Option<&Lenient<i64>>,
    field: &FieldPath,
    default: u32,
    diag: &mut ConfigDiagnostics,
) -> u32 {
    let Some(value) = value else {
        return default;
    };
    match value.as_int() {
        Some(n) if n >= 0 => u32::try_from(n).unwrap_or_else(|_| {
            diag.warn_with_hint(field.clone(), format!("{n} is too large"), format!("using {default}"));
            default
        }),
        Some(n) => {
            diag.warn_with_hint(
                field.clone(),
                format!("negative value {n} is not allowed"),
                format!("using {default}"),
            );
            default
        }
        None => {
            diag.warn_with_hint(field.clone(), format!("{value} is not a number"), format!("using {default}"));
            default
        }
    }
}

/// Integer `> 0`, or `None` (with a diagnostic) when missing or invalid.
pub fn positive(
    value: Option<&Lenient<i64>>,
    field: &FieldPath,
    fallback: &str,
    diag: &mut ConfigDiagnostics,
) -> Option<u32> {
    let value = value?;
    match value.as_int() {
        Some(n) if n > 0 => match u32::try_from(n) {
            Ok(n) => Some(n),
            Err(_) => {
                diag.warn_with_hint(field.clone(), format!("{n} is too large"), fallback);
                None
            }
        },
        Some(n) => {
            diag.warn_with_hint(field.clone(), format!("{n} must be greater than 0"), fallback);
            None
        }
        None => {
            diag.warn_with_hint(field.clone(), format!("{value} is not a number"), fallback);
            None
        }
    }
}

/// Finite float, or `None` (with a diagnostic) when not a number.
pub fn float(
    value: Option<&Lenient<f64>>,
    field: &FieldPath,
    fallback: &str,
    diag: &mut ConfigDiagnostics,
) -> Option<f64> {
    let value = value?;
    let parsed = value.as_float();
    if parsed.is_none() {
        diag.warn_with_hint(field.clone(), format!("{value} is not a number"), fallback);
    }
    parsed
}

/// Hex color, or `None` (with a diagnostic) when invalid.
///
/// `fallback` describes what happens instead, e.g. "using #000000 (black)".
pub fn color(
    value: Option<&Lenient<String>>,
    field: &FieldPath,
    fallback: &str,
    diag: &mut ConfigDiagnostics,
) -> Option<HexColor> {
    let value = value?;
    let parsed = value.as_str().and_then(HexColor::parse);
    if parsed.is_none() {
        diag.warn_with_hint(
            field.clone(),
            format!("invalid color {value}"),
            format!("{COLOR_FORMAT_HINT}; {fallback}"),
        );
    }
    parsed
}

/// Boolean, falling back to `default` (with a diagnostic) for other types.
pub fn boolean(
    value: Option<&Lenient<bool>>,
    field: &FieldPath,
    default: bool,
    diag: &mut ConfigDiagnostics,
) -> bool {
    let Some(value) = value else {
        return default;
    };
    value.as_bool().unwrap_or_else(|| {
        diag.warn_with_hint(
            field.clone(),
            format!("{value} is not a boolean"),
            format!("using {default}"),
        );
        default
    })
}

/// String, or `None` (with a diagnostic) for other types.
pub fn string(
    value: Option<&Lenient<String>>,
    field: &FieldPath,
    fallback: &str,
    diag: &mut ConfigDiagnostics,
) -> Option<String> {
    let value = value?;
    let parsed = value.as_str().map(str::to_string);
    if parsed.is_none() {
        diag.warn_with_hint(field.clone(), format!("{value} is not a string"), fallback);
    }
    parsed
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn field() -> FieldPath {
        FieldPath::new("test")
    }

    #[test]
    fn test_non_negative() {
        let mut diag = ConfigDiagnostics::new();
        assert_eq!(non_negative(None, &field(), 4, &mut diag), 4);
        assert_eq!(non_negative(Some(&Lenient::Valid(0)), &field(), 4, &mut diag), 0);
        assert_eq!(non_negative(Some(&Lenient::Valid(9)), &field(), 4, &mut diag), 9);
        assert!(diag.is_empty());

        assert_eq!(non_negative(Some(&Lenient::Valid(-2)), &field(), 4, &mut diag), 4);
        let text = Lenient::Invalid(toml::Value::String("wide".into()));
        assert_eq!(non_negative(Some(&text), &field(), 4, &mut diag), 4);
        assert_eq!(diag.len(), 2);
    }

    #[test]
    fn test_positive() {
        let mut diag = ConfigDiagnostics::new();
        assert_eq!(positive(None, &field(), "icon size", &mut diag), None);
        assert!(diag.is_empty());
        assert_eq!(positive(Some(&Lenient::Valid(32)), &field(), "", &mut diag), Some(32));
        assert_eq!(positive(Some(&Lenient::Valid(0)), &field(), "", &mut diag), None);
        assert_eq!(diag.len(), 1);
    }

    #[test]
    fn test_color() {
        let mut diag = ConfigDiagnostics::new();
        let valid = Lenient::Valid("#112233".to_string());
        assert_eq!(
            color(Some(&valid), &field(), "", &mut diag),
            HexColor::parse("#112233")
        );
        assert!(diag.is_empty());

        let invalid = Lenient::Valid("blue".to_string());
        assert_eq!(color(Some(&invalid), &field(), "using black", &mut diag), None);
        let wrong_type = Lenient::Invalid(toml::Value::Integer(3));
        assert_eq!(color(Some(&wrong_type), &field(), "using black", &mut diag), None);
        assert_eq!(diag.len(), 2);
        assert!(diag.warnings()[0].hint.as_deref().unwrap().contains("using black"));
    }

    #[test]
    fn test_boolean() {
        let mut diag = ConfigDiagnostics::new();
        assert!(boolean(Some(&Lenient::Valid(true)), &field(), false, &mut diag));
        let text = Lenient::Invalid(toml::Value::String("yes".into()));
        assert!(!boolean(Some(&text), &field(), false, &mut diag));
        assert_eq!(diag.len(), 1);
    }

    #[test]
    fn test_float() {
        let mut diag = ConfigDiagnostics::new();
        assert_eq!(float(Some(&Lenient::Valid(1.5)), &field(), "", &mut diag), Some(1.5));
        let table = Lenient::Invalid(toml::Value::Table(toml::Table::new()));
        assert_eq!(float(Some(&table), &field(), "", &mut diag), None);
        assert_eq!(diag.len(), 1);
    }
}
