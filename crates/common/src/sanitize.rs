//! Normalisation helpers for product attributes.
//!
//! Shared by the Contentful transform and by API request cleaning so that a
//! value arriving through either path is stored in the same shape.

use std::str::FromStr;

use rust_decimal::Decimal;

pub const SKU_MAX_CHARS: usize = 64;
pub const NAME_MAX_CHARS: usize = 200;

/// Collapse runs of whitespace into a single space and trim both ends.
pub fn collapse_spaces(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Collapsed string, or `None` when nothing is left.
pub fn clean_string(value: Option<&str>) -> Option<String> {
    let out = collapse_spaces(value?);
    if out.is_empty() {
        None
    } else {
        Some(out)
    }
}

/// Uppercased SKU capped at [`SKU_MAX_CHARS`].
pub fn normalize_sku(value: Option<&str>) -> Option<String> {
    let cleaned = clean_string(value)?;
    Some(cleaned.to_uppercase().chars().take(SKU_MAX_CHARS).collect())
}

/// Product name capped at [`NAME_MAX_CHARS`].
pub fn normalize_name(value: Option<&str>) -> Option<String> {
    let cleaned = clean_string(value)?;
    Some(cleaned.chars().take(NAME_MAX_CHARS).collect())
}

/// Currency code reduced to uppercase ASCII letters (`" clp$ "` -> `"CLP"`).
pub fn normalize_currency(value: Option<&str>) -> Option<String> {
    let cleaned = clean_string(value)?;
    let code: String = cleaned
        .to_uppercase()
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .collect();
    if code.is_empty() {
        None
    } else {
        Some(code)
    }
}

/// Decimal parse that accepts a comma as the decimal separator.
///
/// Only the first comma is rewritten, so thousands separators such as
/// `"1.299,90"` are rejected rather than misread.
pub fn parse_decimal(value: &str) -> Option<Decimal> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    let normalized = trimmed.replacen(',', ".", 1);
    Decimal::from_str(&normalized)
        .or_else(|_| Decimal::from_scientific(&normalized))
        .ok()
}

/// Leading-integer parse: optional sign then digits, stopping at the first
/// other character (`"12 units"` -> 12, `"7.9"` -> 7).
pub fn parse_leading_int(value: &str) -> Option<i32> {
    let trimmed = value.trim_start();
    let (sign, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => ("-", &trimmed[1..]),
        Some(b'+') => ("", &trimmed[1..]),
        _ => ("", trimmed),
    };
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    format!("{sign}{digits}").parse().ok()
}
