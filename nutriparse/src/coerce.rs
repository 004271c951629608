//! Numeric coercion for externally sourced values.
//!
//! Everything downstream of the remote analysis service needs guaranteed
//! numbers for arithmetic, even when the upstream sends `"450"` or
//! `"450 kcal"` where a number belongs. Coercion never fails: unparsable
//! input becomes `0.0`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// Characters kept when coercing a string to a number.
static NUMERIC_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\d.\-]").expect("invalid numeric-strip pattern"));

/// Coerces an arbitrary JSON value into a guaranteed `f64`.
///
/// - Numbers pass through unchanged.
/// - Strings are stripped of everything except digits, `.` and `-`,
///   then parsed as floating point. Unparsable strings become `0.0`.
/// - Every other type becomes `0.0`.
///
/// # Examples
///
/// ```
/// use nutriparse::coerce::to_number;
/// use serde_json::json;
///
/// assert_eq!(to_number(&json!(42.5)), 42.5);
/// assert_eq!(to_number(&json!("450 kcal")), 450.0);
/// assert_eq!(to_number(&json!(null)), 0.0);
/// ```
pub fn to_number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => number_from_str(s),
        _ => 0.0,
    }
}

/// Coerces a string into a guaranteed `f64`.
///
/// Strips units and separators before parsing, so `"1,250 kcal"` → `1250.0`
/// (the comma is removed along with the unit).
pub fn number_from_str(s: &str) -> f64 {
    let cleaned = NUMERIC_CHARS.replace_all(s, "");
    cleaned.parse::<f64>().unwrap_or(0.0)
}

/// Returns the value as `f64` only if it is a JSON number.
///
/// Used where the contract requires a *numeric* field rather than a
/// coercible one — the structured block's required macros and the
/// reconciler's source fields must already be numbers.
#[inline]
pub fn as_number(value: &Value) -> Option<f64> {
    value.as_f64()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_number_passes_through() {
        assert_eq!(to_number(&json!(12)), 12.0);
        assert_eq!(to_number(&json!(-3.5)), -3.5);
    }

    #[test]
    fn test_string_with_units() {
        assert_eq!(to_number(&json!("32g")), 32.0);
        assert_eq!(to_number(&json!("450 kcal")), 450.0);
        assert_eq!(to_number(&json!("1,250")), 1250.0);
    }

    #[test]
    fn test_negative_string() {
        assert_eq!(number_from_str("-12.5"), -12.5);
    }

    #[test]
    fn test_unparsable_string_is_zero() {
        assert_eq!(number_from_str("no digits here"), 0.0);
        assert_eq!(number_from_str(""), 0.0);
    }

    #[test]
    fn test_other_types_are_zero() {
        assert_eq!(to_number(&json!(true)), 0.0);
        assert_eq!(to_number(&json!([1, 2])), 0.0);
        assert_eq!(to_number(&json!({"a": 1})), 0.0);
        assert_eq!(to_number(&json!(null)), 0.0);
    }

    #[test]
    fn test_as_number_rejects_strings() {
        assert_eq!(as_number(&json!(7)), Some(7.0));
        assert_eq!(as_number(&json!("7")), None);
    }
}
