use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value;

use crate::contentful::models::{CtfEntry, CtfProductFields};
use catalog_common::sanitize::{
    clean_string, normalize_currency, normalize_name, normalize_sku, parse_decimal,
    parse_leading_int,
};
use catalog_db::products::models::ProductUpsert;

pub const PLACEHOLDER_NAME: &str = "(sin nombre)";

/// Map a Contentful entry onto the normalized upsert record.
///
/// Never fails: malformed values become `None` and a missing name becomes
/// [`PLACEHOLDER_NAME`], so every fetched entry produces exactly one record.
pub fn entry_to_upsert(entry: &CtfEntry) -> ProductUpsert {
    let empty = CtfProductFields::default();
    let f = entry.fields.as_ref().unwrap_or(&empty);

    ProductUpsert {
        contentful_id: entry.sys.id.clone(),
        sku: normalize_sku(text(&f.sku)),
        name: normalize_name(text(&f.name)).unwrap_or_else(|| PLACEHOLDER_NAME.to_string()),
        category: clean_string(text(&f.category)),
        brand: clean_string(text(&f.brand)),
        model: clean_string(text(&f.model)),
        color: clean_string(text(&f.color)),
        currency: normalize_currency(text(&f.currency)),
        price: f.price.as_ref().and_then(to_decimal),
        stock: f.stock.as_ref().and_then(to_int),
        source_created_at: parse_timestamp(entry.sys.created_at.as_deref()),
        source_updated_at: parse_timestamp(entry.sys.updated_at.as_deref()),
    }
}

pub fn parse_timestamp(value: Option<&str>) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value?.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

// Non-string JSON in a text field counts as absent.
fn text(value: &Option<Value>) -> Option<&str> {
    match value {
        Some(Value::String(s)) => Some(s.as_str()),
        _ => None,
    }
}

fn to_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => parse_decimal(&n.to_string()),
        Value::String(s) => parse_decimal(s),
        _ => None,
    }
}

fn to_int(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => match n.as_i64() {
            Some(i) => i32::try_from(i).ok(),
            None => n
                .as_f64()
                .filter(|f| f.is_finite())
                .map(f64::trunc)
                .filter(|f| *f >= i32::MIN as f64 && *f <= i32::MAX as f64)
                .map(|f| f as i32),
        },
        Value::String(s) => parse_leading_int(s),
        _ => None,
    }
}
