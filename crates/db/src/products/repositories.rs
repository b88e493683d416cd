use async_trait::async_trait;
use uuid::Uuid;

use crate::products::models::{
    NewProduct, Product, ProductFilter, ProductPatch, ProductUpsert, UpsertOutcome,
};
use catalog_common::error::CatalogResult;
use catalog_common::types::Page;

#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Active products matching `filter`, newest first.
    async fn search(&self, filter: &ProductFilter) -> CatalogResult<Page<Product>>;
    async fn get_active(&self, id: Uuid) -> CatalogResult<Option<Product>>;
    async fn create(&self, product: &NewProduct) -> CatalogResult<Product>;
    /// Fails with `NotFound` when the row is missing or soft-deleted.
    async fn update(&self, id: Uuid, patch: &ProductPatch) -> CatalogResult<Product>;
    async fn soft_delete(&self, id: Uuid) -> CatalogResult<()>;
}

/// Write path used by source synchronization.
#[async_trait]
pub trait ProductUpsertRepository: Send + Sync {
    /// Update the live row for `record.contentful_id`, or insert it if none
    /// exists. Never touches a soft-deleted row.
    async fn upsert_from_source(&self, record: &ProductUpsert) -> CatalogResult<UpsertOutcome>;
}
