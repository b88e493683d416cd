use std::process::ExitCode;

use catalog_config::init_tracing;
use catalog_db::products::pg_repository::PgProductRepository;
use catalog_db::sync::pg_repository::PgSyncStateRepository;
use catalog_ingest::contentful::client::{ContentfulClient, ContentfulClientConfig};
use catalog_ingest::sync::service::{ContentfulSyncer, SyncConfig};

/// One-shot sync for external schedulers: exits non-zero when the run fails.
#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    init_tracing("info");

    tracing::info!(service = "catalog-ingest", "starting");

    match run().await {
        Ok(()) => {
            tracing::info!("ingest finished");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "ingest failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let database_url =
        std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL is required but not set")?;

    let client_config = match ContentfulClientConfig::from_env()? {
        Some(cfg) => cfg,
        None => return Err("CONTENTFUL_SPACE_ID and CONTENTFUL_ACCESS_TOKEN must be set".into()),
    };
    tracing::info!(config = ?client_config, "contentful connector configured");

    let pool = catalog_db::create_pool(&database_url).await?;
    catalog_db::run_migrations(&pool).await?;

    let syncer = ContentfulSyncer::new(
        ContentfulClient::new(client_config)?,
        PgProductRepository::new(pool.clone()),
        PgSyncStateRepository::new(pool),
        SyncConfig::from_env(),
    );

    let result = syncer.run_once().await?;
    tracing::info!(
        source = %result.source,
        processed = result.processed,
        inserted = result.inserted,
        updated = result.updated,
        skipped = result.skipped,
        watermark = ?result.watermark,
        "sync completed"
    );
    Ok(())
}
