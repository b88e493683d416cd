pub mod products;
pub mod reports;
pub mod sync;

use catalog_common::error::{CatalogError, CatalogResult};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Create a Postgres connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> CatalogResult<PgPool> {
    tracing::info!("connecting to database");
    PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
        .map_err(|e| CatalogError::Database(e.to_string()))
}

/// Apply the embedded migrations in `crates/db/migrations`.
pub async fn run_migrations(pool: &PgPool) -> CatalogResult<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| CatalogError::Database(format!("migration failed: {e}")))?;
    tracing::info!("database migrations applied");
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Pool against `TEST_DATABASE_URL` with migrations applied, or `None`
    /// when no test database is configured.
    pub async fn test_pool() -> Option<PgPool> {
        let url = std::env::var("TEST_DATABASE_URL").ok()?;
        let pool = create_pool(&url).await.expect("db should connect");
        run_migrations(&pool).await.expect("migrations should apply");
        Some(pool)
    }
}
