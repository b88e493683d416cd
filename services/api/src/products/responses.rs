use catalog_common::error::{CatalogError, CatalogResult};
use catalog_db::products::models::{Product, ProductColumn};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct DeleteProductResponse {
    pub id: Uuid,
    pub deleted: bool,
}

/// Serialize `product`, keeping only `columns` when any are given.
pub fn project(product: &Product, columns: &[ProductColumn]) -> CatalogResult<Value> {
    let value = serde_json::to_value(product)
        .map_err(|e| CatalogError::Internal(format!("failed to serialize product: {e}")))?;
    if columns.is_empty() {
        return Ok(value);
    }

    let mut all = match value {
        Value::Object(map) => map,
        other => return Ok(other),
    };
    let picked = columns
        .iter()
        .filter_map(|col| all.remove(col.as_str()).map(|v| (col.as_str().to_owned(), v)))
        .collect();
    Ok(Value::Object(picked))
}
