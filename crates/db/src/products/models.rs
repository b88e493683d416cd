use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_PAGE_LIMIT: i64 = 5;
pub const MAX_PAGE_LIMIT: i64 = 5;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: Uuid,
    pub contentful_id: String,
    pub sku: Option<String>,
    pub name: String,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub color: Option<String>,
    pub currency: Option<String>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
    pub source_created_at: Option<DateTime<Utc>>,
    pub source_updated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Product created directly through the API.
#[derive(Debug, Clone, Default)]
pub struct NewProduct {
    pub contentful_id: String,
    pub sku: Option<String>,
    pub name: String,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub color: Option<String>,
    pub currency: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
}

/// Editable subset of a product. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub sku: Option<String>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub color: Option<String>,
    pub currency: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.sku.is_none()
            && self.name.is_none()
            && self.category.is_none()
            && self.brand.is_none()
            && self.model.is_none()
            && self.color.is_none()
            && self.currency.is_none()
            && self.price.is_none()
            && self.stock.is_none()
    }

    /// Overlay this patch onto `current`, uppercasing the currency code.
    pub fn apply_to(&self, current: &Product) -> Product {
        let mut merged = current.clone();
        if let Some(v) = &self.sku {
            merged.sku = Some(v.clone());
        }
        if let Some(v) = &self.name {
            merged.name = v.clone();
        }
        if let Some(v) = &self.category {
            merged.category = Some(v.clone());
        }
        if let Some(v) = &self.brand {
            merged.brand = Some(v.clone());
        }
        if let Some(v) = &self.model {
            merged.model = Some(v.clone());
        }
        if let Some(v) = &self.color {
            merged.color = Some(v.clone());
        }
        if let Some(v) = &self.currency {
            merged.currency = Some(v.to_uppercase());
        }
        if let Some(v) = self.price {
            merged.price = Some(v);
        }
        if let Some(v) = self.stock {
            merged.stock = Some(v);
        }
        merged
    }
}

/// Normalized record produced by the sync transform, keyed by `contentful_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductUpsert {
    pub contentful_id: String,
    pub sku: Option<String>,
    pub name: String,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub color: Option<String>,
    pub currency: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
    pub source_created_at: Option<DateTime<Utc>>,
    pub source_updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UpsertOutcome {
    Updated,
    Inserted,
    /// Insert hit a unique conflict (typically a soft-deleted row) and was ignored.
    Skipped,
}

impl UpsertOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Updated => "updated",
            Self::Inserted => "inserted",
            Self::Skipped => "skipped",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProductColumn {
    Id,
    ContentfulId,
    Sku,
    Name,
    Category,
    Brand,
    Model,
    Color,
    Currency,
    Price,
    Stock,
    SourceCreatedAt,
    SourceUpdatedAt,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

impl ProductColumn {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::ContentfulId => "contentful_id",
            Self::Sku => "sku",
            Self::Name => "name",
            Self::Category => "category",
            Self::Brand => "brand",
            Self::Model => "model",
            Self::Color => "color",
            Self::Currency => "currency",
            Self::Price => "price",
            Self::Stock => "stock",
            Self::SourceCreatedAt => "source_created_at",
            Self::SourceUpdatedAt => "source_updated_at",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
            Self::DeletedAt => "deleted_at",
        }
    }

    /// Parse a comma-separated column list, dropping unknown names and duplicates.
    pub fn parse_list(raw: &str) -> Vec<Self> {
        let mut out: Vec<Self> = Vec::new();
        for col in raw.split(',').filter_map(|c| c.trim().parse().ok()) {
            if !out.contains(&col) {
                out.push(col);
            }
        }
        out
    }
}

impl FromStr for ProductColumn {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "id" => Ok(Self::Id),
            "contentful_id" => Ok(Self::ContentfulId),
            "sku" => Ok(Self::Sku),
            "name" => Ok(Self::Name),
            "category" => Ok(Self::Category),
            "brand" => Ok(Self::Brand),
            "model" => Ok(Self::Model),
            "color" => Ok(Self::Color),
            "currency" => Ok(Self::Currency),
            "price" => Ok(Self::Price),
            "stock" => Ok(Self::Stock),
            "source_created_at" => Ok(Self::SourceCreatedAt),
            "source_updated_at" => Ok(Self::SourceUpdatedAt),
            "created_at" => Ok(Self::CreatedAt),
            "updated_at" => Ok(Self::UpdatedAt),
            "deleted_at" => Ok(Self::DeletedAt),
            _ => Err(format!("unknown product column: {value}")),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub name: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub color: Option<String>,
    pub currency: Option<String>,
    pub sku: Option<String>,
    pub price: Option<Decimal>,
    pub price_min: Option<Decimal>,
    pub price_max: Option<Decimal>,
    pub stock: Option<i32>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ProductFilter {
    pub fn effective_limit(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_PAGE_LIMIT)
            .clamp(1, MAX_PAGE_LIMIT)
    }

    pub fn effective_offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}
