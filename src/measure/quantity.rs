//! Quantity parsing
//!
//! Separates the numeric amount of a raw measure from its unit phrase.

use serde::{Deserialize, Serialize};

use super::text::{split_numeric_alpha, strip_punctuation};

/// Unit phrase used when a measure carries no alphabetic token
pub const IMPLIED_UNIT: &str = "count";

/// Quantity used when a measure carries no usable numeric token
pub const IMPLIED_VALUE: f64 = 1.0;

/// A raw measure split into amount and unit text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedQuantity {
    /// Summed numeric amount, always >= 0
    pub value: f64,
    /// Lower-cased alphabetic tokens joined by single spaces
    pub unit_phrase: String,
}

/// Parse a raw measure cell into a quantity and unit phrase
///
/// Examples:
/// - "1 3/4 shot" -> (1.75, "shot")
/// - "ice" -> (1.0, "ice")
/// - "1" -> (1.0, "count")
/// - "2oz" -> (2.0, "oz")
pub fn parse_quantity(raw: &str) -> ParsedQuantity {
    let cleaned = strip_punctuation(&split_numeric_alpha(raw));

    let mut sum = 0.0;
    let mut words = Vec::new();

    for token in cleaned.split_whitespace() {
        let Some(first) = token.chars().next() else {
            continue;
        };
        if first.is_ascii_digit() {
            match parse_numeric_token(token) {
                Some(n) if (sum + n).is_finite() => sum += n,
                _ => {}
            }
        } else if first.is_alphabetic() {
            words.push(token.to_lowercase());
        }
    }

    let value = if sum == 0.0 { IMPLIED_VALUE } else { sum };
    let unit_phrase = if words.is_empty() {
        IMPLIED_UNIT.to_string()
    } else {
        words.join(" ")
    };

    ParsedQuantity {
        value: value.abs(),
        unit_phrase,
    }
}

/// Evaluate a numeric literal: integer, decimal, or `a/b`
///
/// Anything else, including a zero denominator or a value outside the
/// finite f64 range, yields None.
pub fn parse_numeric_token(token: &str) -> Option<f64> {
    let value = match token.split_once('/') {
        Some((num, den)) => {
            let num = parse_decimal(num)?;
            let den = parse_decimal(den)?;
            if den == 0.0 {
                return None;
            }
            num / den
        }
        None => parse_decimal(token)?,
    };
    value.is_finite().then_some(value)
}

fn parse_decimal(s: &str) -> Option<f64> {
    let mut parts = s.splitn(2, '.');
    let whole = parts.next().unwrap_or("");
    let frac = parts.next();

    let digits_ok = |p: &str| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit());
    let valid = match frac {
        Some(f) => digits_ok(whole) && digits_ok(f),
        None => digits_ok(whole),
    };

    if !valid {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}
