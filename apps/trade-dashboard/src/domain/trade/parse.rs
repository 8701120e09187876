//! Lenient field parsing.
//!
//! Malformed numbers become zero instead of failing the record, so a
//! single bad cell never poisons the aggregate sums. Timestamps are the
//! exception: a record that cannot be ordered is rejected by the caller.
//!
//! A number outside `±MAX_MAGNITUDE` counts as malformed. Every field is
//! rounded to `DECIMAL_PLACES`, which keeps the squares, sums and ratios
//! computed downstream inside `Decimal`'s range.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;

use crate::domain::shared::Timestamp;

/// Largest accepted magnitude for a numeric field (one billion).
pub const MAX_MAGNITUDE: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Fractional digits kept for a numeric field.
pub const DECIMAL_PLACES: u32 = 8;

/// Round to [`DECIMAL_PLACES`]; out-of-range magnitudes become zero.
#[must_use]
pub fn bounded(value: Decimal) -> Decimal {
    if value.abs() > MAX_MAGNITUDE {
        Decimal::ZERO
    } else {
        value.round_dp(DECIMAL_PLACES)
    }
}

/// Parse a numeric cell, defaulting to zero.
///
/// Accepts plain and scientific notation after trimming and stripping a
/// leading `$`, a trailing `%` and `,` thousands separators.
#[must_use]
pub fn parse_decimal_lenient(raw: &str) -> Decimal {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix('$').unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();
    if trimmed.is_empty() {
        return Decimal::ZERO;
    }

    let cleaned = trimmed.replace(',', "");
    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .map_or(Decimal::ZERO, bounded)
}

/// Parse a price or balance cell. Negative values are malformed and become zero.
#[must_use]
pub fn parse_non_negative(raw: &str) -> Decimal {
    clamp_non_negative(parse_decimal_lenient(raw))
}

/// Read a JSON value as a decimal, defaulting to zero.
///
/// Numbers go through their shortest textual form so `0.1` stays exactly
/// `0.1`; strings use [`parse_decimal_lenient`]; anything else is zero.
#[must_use]
pub fn decimal_from_json(value: &Value) -> Decimal {
    match value {
        Value::Number(n) => {
            let text = n.to_string();
            Decimal::from_str(&text)
                .or_else(|_| Decimal::from_scientific(&text))
                .ok()
                .or_else(|| n.as_f64().and_then(|f| Decimal::try_from(f).ok()))
                .map_or(Decimal::ZERO, bounded)
        }
        Value::String(s) => parse_decimal_lenient(s),
        _ => Decimal::ZERO,
    }
}

/// Read a JSON value as a non-negative decimal.
#[must_use]
pub fn non_negative_from_json(value: &Value) -> Decimal {
    clamp_non_negative(decimal_from_json(value))
}

/// Read an optional JSON value, keeping the distinction between "absent
/// or null" and "present but malformed".
#[must_use]
pub fn optional_decimal_from_json(value: Option<&Value>) -> Option<Decimal> {
    match value {
        None | Some(Value::Null) => None,
        Some(v) => Some(decimal_from_json(v)),
    }
}

/// Read a JSON value as a timestamp.
///
/// Strings use [`Timestamp::parse_flexible`]; integers are Unix seconds
/// (or milliseconds for large values).
#[must_use]
pub fn timestamp_from_json(value: &Value) -> Option<Timestamp> {
    match value {
        Value::String(s) => Timestamp::parse_flexible(s),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .and_then(Timestamp::from_unix),
        _ => None,
    }
}

/// Read a JSON value as trimmed text; `None` when absent, null or blank.
#[must_use]
pub fn text_from_json(value: Option<&Value>) -> Option<String> {
    let text = match value? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn clamp_non_negative(value: Decimal) -> Decimal {
    if value.is_sign_negative() && !value.is_zero() {
        Decimal::ZERO
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;
    use test_case::test_case;

    #[test_case("12.5", dec!(12.5))]
    #[test_case(" -3.25 ", dec!(-3.25))]
    #[test_case("$1,234.50", dec!(1234.50))]
    #[test_case("4.2%", dec!(4.2))]
    #[test_case("1e2", dec!(100))]
    #[test_case("1.5e-1", dec!(0.15))]
    #[test_case("", Decimal::ZERO)]
    #[test_case("N/A", Decimal::ZERO)]
    #[test_case("12abc", Decimal::ZERO)]
    #[test_case("NaN", Decimal::ZERO)]
    #[test_case("1e15", Decimal::ZERO)]
    #[test_case("-1e15", Decimal::ZERO)]
    #[test_case("79000000000000000000000000000", Decimal::ZERO)]
    #[test_case("1000000000", dec!(1000000000))]
    #[test_case("0.123456789", dec!(0.12345679))]
    fn lenient_decimal(raw: &str, expected: Decimal) {
        assert_eq!(parse_decimal_lenient(raw), expected);
    }

    #[test]
    fn negative_price_is_malformed() {
        assert_eq!(parse_non_negative("-5"), Decimal::ZERO);
        assert_eq!(parse_non_negative("5"), dec!(5));
        assert_eq!(non_negative_from_json(&json!(-1.5)), Decimal::ZERO);
    }

    #[test]
    fn json_numbers_keep_exact_value() {
        assert_eq!(decimal_from_json(&json!(0.1)), dec!(0.1));
        assert_eq!(decimal_from_json(&json!(42)), dec!(42));
        assert_eq!(decimal_from_json(&json!("7.5")), dec!(7.5));
        assert_eq!(decimal_from_json(&json!(true)), Decimal::ZERO);
        assert_eq!(decimal_from_json(&Value::Null), Decimal::ZERO);
    }

    #[test]
    fn json_numbers_out_of_range_become_zero() {
        assert_eq!(decimal_from_json(&json!(1e15)), Decimal::ZERO);
        assert_eq!(decimal_from_json(&json!(-7.9e28)), Decimal::ZERO);
        assert_eq!(decimal_from_json(&json!(1e300)), Decimal::ZERO);
        assert_eq!(
            optional_decimal_from_json(Some(&json!(u64::MAX))),
            Some(Decimal::ZERO)
        );
    }

    #[test]
    fn optional_distinguishes_null_from_malformed() {
        assert_eq!(optional_decimal_from_json(None), None);
        assert_eq!(optional_decimal_from_json(Some(&Value::Null)), None);
        assert_eq!(
            optional_decimal_from_json(Some(&json!("garbage"))),
            Some(Decimal::ZERO)
        );
        assert_eq!(optional_decimal_from_json(Some(&json!(-2))), Some(dec!(-2)));
    }

    #[test]
    fn json_timestamps() {
        let Some(from_str) = timestamp_from_json(&json!("2024-01-15T10:00:00Z")) else {
            panic!("expected RFC 3339 string to parse");
        };
        let Some(from_secs) = timestamp_from_json(&json!(1_705_312_800)) else {
            panic!("expected unix seconds to parse");
        };
        assert_eq!(from_str, from_secs);
        assert!(timestamp_from_json(&json!("yesterday")).is_none());
        assert!(timestamp_from_json(&json!({})).is_none());
    }

    #[test]
    fn text_is_trimmed() {
        assert_eq!(text_from_json(Some(&json!("  sol "))), Some("sol".to_string()));
        assert_eq!(text_from_json(Some(&json!("   "))), None);
        assert_eq!(text_from_json(Some(&Value::Null)), None);
        assert_eq!(text_from_json(None), None);
    }
}
