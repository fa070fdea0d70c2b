//! Two-decimal fixed-point helpers for prices and ratings.
//!
//! Amounts are stored as `f64` and always rendered as strings with exactly
//! two decimals (`25` -> `"25.00"`).

use serde::Serializer;
use serde_json::Value;

/// Largest accepted price (exclusive): five digits before the decimal point
pub const MAX_PRICE: f64 = 100_000.0;

pub fn round_2dp(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn format_2dp(value: f64) -> String {
    format!("{:.2}", round_2dp(value))
}

pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_2dp(*value))
}

pub fn serialize_option<S: Serializer>(
    value: &Option<f64>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(v) => serializer.serialize_str(&format_2dp(*v)),
        None => serializer.serialize_none(),
    }
}

/// Parse a price given either as a JSON number or a numeric string.
/// The error is the user-facing message for the `price` field.
pub fn parse_price(value: &Value) -> Result<f64, String> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    let price = match parsed {
        Some(p) if p.is_finite() => p,
        _ => return Err("A valid number is required.".to_string()),
    };

    if price < 0.0 {
        return Err("Ensure this value is greater than or equal to 0.".to_string());
    }
    if price >= MAX_PRICE {
        return Err(
            "Ensure that there are no more than 5 digits before the decimal point.".to_string(),
        );
    }
    if (price * 100.0 - (price * 100.0).round()).abs() > 1e-6 {
        return Err("Ensure that there are no more than 2 decimal places.".to_string());
    }

    Ok(round_2dp(price))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn formats_two_decimals() {
        assert_eq!(format_2dp(25.0), "25.00");
        assert_eq!(format_2dp(2.5), "2.50");
        assert_eq!(format_2dp(14.0 / 3.0), "4.67");
    }

    #[test]
    fn parses_numbers_and_numeric_strings() {
        assert_eq!(parse_price(&json!(150)), Ok(150.0));
        assert_eq!(parse_price(&json!("55.5")), Ok(55.5));
        assert_eq!(parse_price(&json!(" 12.30 ")), Ok(12.3));
    }

    #[test]
    fn rejects_bad_prices() {
        assert_eq!(
            parse_price(&json!("abc")),
            Err("A valid number is required.".to_string())
        );
        assert!(parse_price(&json!(null)).is_err());
        assert!(parse_price(&json!(-1)).is_err());
        assert!(parse_price(&json!(100000)).is_err());
        assert_eq!(
            parse_price(&json!(1.234)),
            Err("Ensure that there are no more than 2 decimal places.".to_string())
        );
    }
}
