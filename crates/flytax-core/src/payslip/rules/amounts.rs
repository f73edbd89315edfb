//! Amount normalization for French payslips.

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde_json::Value;

/// Parse a locale-formatted amount (e.g., "1 234,56", "1.234.567,89", "12.50 €").
///
/// Whitespace (including non-breaking spaces) is dropped, commas become
/// periods, and anything that is not a digit or period is discarded. With
/// several periods left, they are all thousands separators when every group
/// after the first has three digits; otherwise only the last one is the
/// decimal point.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    let groups: Vec<&str> = cleaned.split('.').collect();
    let (integer, fraction) = match groups.as_slice() {
        [] => return None,
        [whole] => (whole.to_string(), ""),
        [head @ .., last] if groups.len() > 2 && groups[1..].iter().all(|g| g.len() == 3) => {
            (format!("{}{}", head.concat(), last), "")
        }
        [head @ .., last] => (head.concat(), *last),
    };

    if integer.is_empty() && fraction.is_empty() {
        return None;
    }

    let literal = match (integer.is_empty(), fraction.is_empty()) {
        (_, true) => integer,
        (true, false) => format!("0.{}", fraction),
        (false, false) => format!("{}.{}", integer, fraction),
    };

    Decimal::from_str(&literal).ok()
}

/// Parse an amount carried in a JSON value.
///
/// Numbers are taken as they are (sign included), strings go through
/// [`parse_amount`], anything else is not an amount.
pub fn parse_amount_value(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(Decimal::from(i))
            } else if let Some(u) = n.as_u64() {
                Some(Decimal::from(u))
            } else {
                n.as_f64().and_then(|f| {
                    Decimal::from_str(&f.to_string())
                        .ok()
                        .or_else(|| Decimal::from_f64(f))
                })
            }
        }
        Value::String(s) => parse_amount(s),
        _ => None,
    }
}

/// Format amount in French style (1 234,56).
pub fn format_amount(amount: Decimal) -> String {
    let s = format!("{:.2}", amount.abs());
    let (integer_part, decimal_part) = s.split_once('.').unwrap_or((s.as_str(), "00"));

    let mut formatted = String::with_capacity(integer_part.len() + integer_part.len() / 3 + 4);
    if amount.is_sign_negative() && !amount.is_zero() {
        formatted.push('-');
    }
    for (i, c) in integer_part.chars().enumerate() {
        if i > 0 && (integer_part.len() - i) % 3 == 0 {
            formatted.push(' ');
        }
        formatted.push(c);
    }

    format!("{},{}", formatted, decimal_part)
}
