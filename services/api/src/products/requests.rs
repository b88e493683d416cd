use std::str::FromStr;

use catalog_common::error::{CatalogError, CatalogResult};
use catalog_common::sanitize::{clean_string, normalize_currency, normalize_sku, parse_decimal};
use catalog_db::products::models::{NewProduct, ProductColumn, ProductFilter, ProductPatch};
use rust_decimal::Decimal;
use serde::Deserialize;

const TEXT_MAX_CHARS: usize = 200;
const CURRENCY_MAX_CHARS: usize = 50;
const PRICE_MAX_SCALE: u32 = 2;

/// Query string for `GET /api/products`. Everything arrives as text and is
/// parsed here so bad numbers surface as a 400 with the usual error body.
#[derive(Debug, Default, Deserialize)]
pub struct ListProductsQuery {
    pub name: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub color: Option<String>,
    pub currency: Option<String>,
    pub sku: Option<String>,
    pub price: Option<String>,
    #[serde(alias = "priceMin")]
    pub price_min: Option<String>,
    #[serde(alias = "priceMax")]
    pub price_max: Option<String>,
    pub stock: Option<String>,
    pub offset: Option<String>,
    pub limit: Option<String>,
    pub select: Option<String>,
}

impl ListProductsQuery {
    pub fn to_filter(&self) -> CatalogResult<ProductFilter> {
        Ok(ProductFilter {
            name: clean_string(self.name.as_deref()),
            category: clean_string(self.category.as_deref()),
            brand: clean_string(self.brand.as_deref()),
            model: clean_string(self.model.as_deref()),
            color: clean_string(self.color.as_deref()),
            currency: clean_string(self.currency.as_deref()),
            sku: clean_string(self.sku.as_deref()),
            price: decimal_param("price", self.price.as_deref())?,
            price_min: decimal_param("price_min", self.price_min.as_deref())?,
            price_max: decimal_param("price_max", self.price_max.as_deref())?,
            stock: number_param("stock", self.stock.as_deref())?,
            limit: number_param("limit", self.limit.as_deref())?,
            offset: number_param("offset", self.offset.as_deref())?,
        })
    }

    /// Requested projection; empty means every column.
    pub fn columns(&self) -> Vec<ProductColumn> {
        self.select
            .as_deref()
            .map(ProductColumn::parse_list)
            .unwrap_or_default()
    }
}

fn decimal_param(key: &str, raw: Option<&str>) -> CatalogResult<Option<Decimal>> {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => parse_decimal(v)
            .map(Some)
            .ok_or_else(|| CatalogError::Validation(format!("{key} must be a number"))),
    }
}

fn number_param<T: FromStr>(key: &str, raw: Option<&str>) -> CatalogResult<Option<T>> {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => v
            .parse()
            .map(Some)
            .map_err(|_| CatalogError::Validation(format!("{key} must be an integer"))),
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    #[serde(alias = "contentfulId")]
    pub contentful_id: Option<String>,
    pub name: Option<String>,
    pub sku: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub color: Option<String>,
    pub currency: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i64>,
}

impl CreateProductRequest {
    pub fn into_new_product(self) -> CatalogResult<NewProduct> {
        let contentful_id = required("contentful_id", self.contentful_id.as_deref())?;
        let name = required("name", self.name.as_deref())?;

        let price = match self.price {
            Some(p) if p <= Decimal::ZERO => {
                return Err(CatalogError::Validation("price must be positive".into()))
            }
            Some(p) => Some(check_scale(p)?),
            None => None,
        };

        Ok(NewProduct {
            contentful_id,
            sku: max_len("sku", normalize_sku(self.sku.as_deref()), TEXT_MAX_CHARS)?,
            name,
            category: optional("category", self.category.as_deref())?,
            brand: optional("brand", self.brand.as_deref())?,
            model: optional("model", self.model.as_deref())?,
            color: optional("color", self.color.as_deref())?,
            currency: max_len(
                "currency",
                normalize_currency(self.currency.as_deref()),
                CURRENCY_MAX_CHARS,
            )?,
            price,
            stock: stock(self.stock)?,
        })
    }
}

/// Partial update body. Blank strings are treated as absent.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProductRequest {
    pub sku: Option<String>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub color: Option<String>,
    pub currency: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i64>,
}

impl UpdateProductRequest {
    pub fn into_patch(self) -> CatalogResult<ProductPatch> {
        if let Some(p) = self.price {
            if p < Decimal::ZERO {
                return Err(CatalogError::Validation("price must be >= 0".into()));
            }
        }

        Ok(ProductPatch {
            sku: max_len("sku", normalize_sku(self.sku.as_deref()), TEXT_MAX_CHARS)?,
            name: optional("name", self.name.as_deref())?,
            category: optional("category", self.category.as_deref())?,
            brand: optional("brand", self.brand.as_deref())?,
            model: optional("model", self.model.as_deref())?,
            color: optional("color", self.color.as_deref())?,
            currency: max_len(
                "currency",
                clean_string(self.currency.as_deref()),
                CURRENCY_MAX_CHARS,
            )?,
            price: self.price,
            stock: stock(self.stock)?,
        })
    }
}

fn required(key: &str, raw: Option<&str>) -> CatalogResult<String> {
    optional(key, raw)?.ok_or_else(|| CatalogError::Validation(format!("{key} is required")))
}

fn optional(key: &str, raw: Option<&str>) -> CatalogResult<Option<String>> {
    max_len(key, clean_string(raw), TEXT_MAX_CHARS)
}

fn max_len(key: &str, value: Option<String>, max: usize) -> CatalogResult<Option<String>> {
    match value {
        Some(v) if v.chars().count() > max => Err(CatalogError::Validation(format!(
            "{key} must be at most {max} characters"
        ))),
        other => Ok(other),
    }
}

fn check_scale(price: Decimal) -> CatalogResult<Decimal> {
    if price.normalize().scale() > PRICE_MAX_SCALE {
        return Err(CatalogError::Validation(
            "price must have at most 2 decimal places".into(),
        ));
    }
    Ok(price)
}

fn stock(value: Option<i64>) -> CatalogResult<Option<i32>> {
    match value {
        None => Ok(None),
        Some(v) if v < 0 => Err(CatalogError::Validation("stock must be >= 0".into())),
        Some(v) => i32::try_from(v)
            .map(Some)
            .map_err(|_| CatalogError::Validation("stock is out of range".into())),
    }
}
