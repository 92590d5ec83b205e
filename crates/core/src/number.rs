//! Lenient integer coercion for request fields.
//!
//! Clients send chip amounts as JSON numbers, numeric strings, or (from
//! sloppy form encoders) booleans and nulls. All of them are coerced to a
//! number first and then floored, so `"12.9"` becomes `12` and `-0.5`
//! becomes `-1`.

use serde_json::Value;

/// Coerce a JSON value to an integer, flooring fractional input.
///
/// Returns `None` when the value is missing, is not numeric-like, is not
/// finite, or falls outside the `i64` range.
pub fn parse_integer(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => match n.as_i64() {
            Some(i) => Some(i),
            None => floor_to_i64(n.as_f64()?),
        },
        Value::String(s) => parse_numeric_str(s),
        Value::Bool(b) => Some(i64::from(*b)),
        Value::Null => Some(0),
        Value::Array(_) | Value::Object(_) => None,
    }
}

fn parse_numeric_str(raw: &str) -> Option<i64> {
    let s = raw.trim();
    if s.is_empty() {
        return Some(0);
    }

    let radix = match s.get(..2) {
        Some("0x") | Some("0X") => Some(16),
        Some("0o") | Some("0O") => Some(8),
        Some("0b") | Some("0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        let digits = &s[2..];
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_alphanumeric()) {
            return None;
        }
        return i64::from_str_radix(digits, radix).ok();
    }

    // Only digits, sign, dot and exponent count as numeric text; this keeps
    // "inf" and "NaN" out.
    if !s
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
    {
        return None;
    }

    floor_to_i64(s.parse::<f64>().ok()?)
}

fn floor_to_i64(n: f64) -> Option<i64> {
    if !n.is_finite() {
        return None;
    }
    let floored = n.floor();
    // i64::MAX as f64 rounds up to 2^63, which is itself out of range.
    if floored < i64::MIN as f64 || floored >= i64::MAX as f64 {
        return None;
    }
    Some(floored as i64)
}
