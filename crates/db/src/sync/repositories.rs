use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::sync::models::SyncState;
use catalog_common::error::CatalogResult;

#[async_trait]
pub trait SyncStateRepository: Send + Sync {
    /// Return the cursor row for `source`, creating it with a null watermark if missing.
    async fn get_or_create(&self, source: &str) -> CatalogResult<SyncState>;

    /// Current watermark for `source` (creates the row lazily).
    async fn get_cursor(&self, source: &str) -> CatalogResult<Option<DateTime<Utc>>> {
        Ok(self.get_or_create(source).await?.last_updated_at)
    }

    /// Advance the watermark to `candidate` only if it is strictly later than the
    /// stored value (or nothing is stored). `None` is a no-op.
    /// Returns `true` when the stored value changed.
    async fn bump_if_later(
        &self,
        source: &str,
        candidate: Option<DateTime<Utc>>,
    ) -> CatalogResult<bool>;
}
