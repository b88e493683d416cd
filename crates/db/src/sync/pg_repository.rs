use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgRow, PgPool, Row};

use crate::sync::models::SyncState;
use crate::sync::repositories::SyncStateRepository;
use catalog_common::error::{CatalogError, CatalogResult};

#[derive(Clone)]
pub struct PgSyncStateRepository {
    pool: PgPool,
}

impl PgSyncStateRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn map_row(row: PgRow) -> SyncState {
        SyncState {
            source: row.get("source"),
            last_updated_at: row.get("last_updated_at"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }
}

#[async_trait]
impl SyncStateRepository for PgSyncStateRepository {
    async fn get_or_create(&self, source: &str) -> CatalogResult<SyncState> {
        // Losing an insert race is fine: the follow-up select sees the winner's row.
        sqlx::query(
            "insert into sync_state (source, last_updated_at)
             values ($1, null)
             on conflict (source) do nothing",
        )
        .bind(source)
        .execute(&self.pool)
        .await
        .map_err(|e| CatalogError::Database(e.to_string()))?;

        let row = sqlx::query(
            "select source, last_updated_at, created_at, updated_at
             from sync_state where source = $1",
        )
        .bind(source)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| CatalogError::Database(e.to_string()))?;

        Ok(Self::map_row(row))
    }

    async fn bump_if_later(
        &self,
        source: &str,
        candidate: Option<DateTime<Utc>>,
    ) -> CatalogResult<bool> {
        let Some(candidate) = candidate else {
            return Ok(false);
        };

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| CatalogError::Database(e.to_string()))?;

        sqlx::query(
            "insert into sync_state (source, last_updated_at)
             values ($1, null)
             on conflict (source) do nothing",
        )
        .bind(source)
        .execute(&mut *tx)
        .await
        .map_err(|e| CatalogError::Database(e.to_string()))?;

        let current: Option<DateTime<Utc>> = sqlx::query_scalar(
            "select last_updated_at from sync_state where source = $1 for update",
        )
        .bind(source)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| CatalogError::Database(e.to_string()))?;

        if matches!(current, Some(stored) if stored >= candidate) {
            tx.commit()
                .await
                .map_err(|e| CatalogError::Database(e.to_string()))?;
            return Ok(false);
        }

        let result = sqlx::query(
            "update sync_state
             set last_updated_at = $2, updated_at = now()
             where source = $1 and (last_updated_at is null or last_updated_at < $2)",
        )
        .bind(source)
        .bind(candidate)
        .execute(&mut *tx)
        .await
        .map_err(|e| CatalogError::Database(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| CatalogError::Database(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}
