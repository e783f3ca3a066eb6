//! Numeric coercion of raw backend values
//!
//! Values arrive as JSON numbers, numeric strings, empty strings (pandas
//! `fillna('')`) or `null`. Every consumer goes through [`coerce`], which
//! never fails: anything that is not a finite number becomes
//! [`Numeric::Absent`].

use serde_json::Value;

/// Result of coercing one raw value
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Numeric {
    /// A finite number
    Value(f64),
    /// Missing, non-numeric or non-finite
    #[default]
    Absent,
}

impl Numeric {
    /// The number, if present
    pub fn value(self) -> Option<f64> {
        match self {
            Numeric::Value(v) => Some(v),
            Numeric::Absent => None,
        }
    }

    pub fn is_absent(self) -> bool {
        matches!(self, Numeric::Absent)
    }
}

impl From<Option<f64>> for Numeric {
    fn from(value: Option<f64>) -> Self {
        match value {
            Some(v) if v.is_finite() => Numeric::Value(v),
            _ => Numeric::Absent,
        }
    }
}

/// Coerce an optional raw value to a number
pub fn coerce(raw: Option<&Value>) -> Numeric {
    match raw {
        Some(Value::Number(n)) => n.as_f64().into(),
        Some(Value::String(text)) => parse_numeric_text(text),
        _ => Numeric::Absent,
    }
}

/// Parse the textual form of a number.
///
/// Surrounding whitespace is ignored. The whole text must be a number, so a
/// unit suffix such as `"1.5 bar"` is absent, as are empty text and
/// `inf`/`NaN` spellings.
pub fn parse_numeric_text(text: &str) -> Numeric {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Numeric::Absent;
    }
    trimmed.parse::<f64>().ok().into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numbers_pass_through() {
        assert_eq!(coerce(Some(&json!(3))), Numeric::Value(3.0));
        assert_eq!(coerce(Some(&json!(-2.5))), Numeric::Value(-2.5));
    }

    #[test]
    fn test_numeric_strings_are_parsed() {
        assert_eq!(coerce(Some(&json!("42.5"))), Numeric::Value(42.5));
        assert_eq!(coerce(Some(&json!("  7 "))), Numeric::Value(7.0));
        assert_eq!(coerce(Some(&json!("1e3"))), Numeric::Value(1000.0));
    }

    #[test]
    fn test_malformed_values_are_absent_not_zero() {
        for raw in [json!("abc"), json!(""), json!("   "), json!("NaN"), json!("inf")] {
            assert_eq!(coerce(Some(&raw)), Numeric::Absent, "{raw}");
        }
    }

    #[test]
    fn test_no_leading_number_prefix_parsing() {
        for text in ["12abc", "1.5 bar", "Infinity", "-Infinity", "3,5"] {
            assert_eq!(parse_numeric_text(text), Numeric::Absent, "{text}");
        }
    }

    #[test]
    fn test_non_scalar_values_are_absent() {
        assert!(coerce(None).is_absent());
        assert!(coerce(Some(&Value::Null)).is_absent());
        assert!(coerce(Some(&json!(true))).is_absent());
        assert!(coerce(Some(&json!([1]))).is_absent());
        assert!(coerce(Some(&json!({"v": 1}))).is_absent());
    }

    #[test]
    fn test_numeric_accessors() {
        assert_eq!(Numeric::Value(1.0).value(), Some(1.0));
        assert_eq!(Numeric::Absent.value(), None);
        assert_eq!(Numeric::from(Some(f64::NAN)), Numeric::Absent);
        assert_eq!(Numeric::default(), Numeric::Absent);
    }
}
