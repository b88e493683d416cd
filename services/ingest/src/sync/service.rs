use std::fmt;
use std::time::Instant;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use catalog_common::error::CatalogError;
use catalog_config::env_parse_or;
use catalog_db::products::models::UpsertOutcome;
use catalog_db::products::repositories::ProductUpsertRepository;
use catalog_db::sync::repositories::SyncStateRepository;

use super::guard::RunGuard;
use super::transform::entry_to_upsert;
use crate::connector::{Connector, SyncResult};
use crate::contentful::client::{ContentfulClient, ContentfulClientError, EntriesQuery};

pub const SOURCE_KEY: &str = "contentful:product";
pub const DEFAULT_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Copy)]
pub struct SyncConfig {
    pub page_size: u32,
}

impl SyncConfig {
    pub fn from_env() -> Self {
        Self {
            page_size: env_parse_or("SYNC_PAGE_SIZE", DEFAULT_PAGE_SIZE).max(1),
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    Idle,
    LoadingCursor,
    FetchingPage,
    Transforming,
    Upserting,
    AdvancingCursor,
    Done,
}

impl SyncPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::LoadingCursor => "loading_cursor",
            Self::FetchingPage => "fetching_page",
            Self::Transforming => "transforming",
            Self::Upserting => "upserting",
            Self::AdvancingCursor => "advancing_cursor",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for SyncPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("a sync run is already in progress")]
    AlreadyRunning,

    #[error("contentful fetch failed: {0}")]
    Fetch(#[from] ContentfulClientError),

    #[error("{phase} failed: {source}")]
    Store {
        phase: SyncPhase,
        #[source]
        source: CatalogError,
    },
}

impl SyncError {
    /// Phase the run was in when it failed.
    pub fn phase(&self) -> SyncPhase {
        match self {
            Self::AlreadyRunning => SyncPhase::Idle,
            Self::Fetch(_) => SyncPhase::FetchingPage,
            Self::Store { phase, .. } => *phase,
        }
    }

    fn store(phase: SyncPhase) -> impl FnOnce(CatalogError) -> Self {
        move |source| Self::Store { phase, source }
    }
}

/// Counters accumulated while a run is in flight.
#[derive(Debug, Default)]
struct RunStats {
    processed: usize,
    inserted: usize,
    updated: usize,
    skipped: usize,
    pages: usize,
}

impl RunStats {
    fn record(&mut self, outcome: UpsertOutcome) {
        self.processed += 1;
        match outcome {
            UpsertOutcome::Inserted => self.inserted += 1,
            UpsertOutcome::Updated => self.updated += 1,
            UpsertOutcome::Skipped => self.skipped += 1,
        }
    }
}

/// Incremental Contentful -> products pull, bounded below by the stored cursor.
pub struct ContentfulSyncer<P, S> {
    client: ContentfulClient,
    products: P,
    cursor: S,
    config: SyncConfig,
    guard: RunGuard,
}

impl<P, S> ContentfulSyncer<P, S>
where
    P: ProductUpsertRepository,
    S: SyncStateRepository,
{
    pub fn new(client: ContentfulClient, products: P, cursor: S, config: SyncConfig) -> Self {
        Self {
            client,
            products,
            cursor,
            config,
            guard: RunGuard::new(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.guard.is_running()
    }

    /// Run one full sync. Rejected with [`SyncError::AlreadyRunning`] while
    /// another run on this syncer is active.
    pub async fn run_once(&self) -> Result<SyncResult, SyncError> {
        let _permit = match self.guard.try_acquire() {
            Some(permit) => permit,
            None => {
                tracing::info!(source = SOURCE_KEY, "contentful sync already running, skipping");
                return Err(SyncError::AlreadyRunning);
            }
        };

        let started = Instant::now();
        let mut stats = RunStats::default();

        match self.execute(&mut stats).await {
            Ok((watermark, advanced)) => {
                let result = SyncResult {
                    source: SOURCE_KEY.to_string(),
                    processed: stats.processed,
                    inserted: stats.inserted,
                    updated: stats.updated,
                    skipped: stats.skipped,
                    pages: stats.pages,
                    watermark,
                    advanced,
                    elapsed_ms: started.elapsed().as_millis() as u64,
                };
                tracing::info!(
                    source = SOURCE_KEY,
                    phase = %SyncPhase::Done,
                    processed = result.processed,
                    inserted = result.inserted,
                    updated = result.updated,
                    skipped = result.skipped,
                    pages = result.pages,
                    watermark = ?result.watermark,
                    elapsed_ms = result.elapsed_ms,
                    "contentful sync completed"
                );
                Ok(result)
            }
            Err(e) => {
                tracing::error!(
                    source = SOURCE_KEY,
                    phase = %e.phase(),
                    processed = stats.processed,
                    pages = stats.pages,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    error = %e,
                    "contentful sync failed"
                );
                Err(e)
            }
        }
    }

    async fn execute(
        &self,
        stats: &mut RunStats,
    ) -> Result<(Option<DateTime<Utc>>, bool), SyncError> {
        let since = self
            .cursor
            .get_cursor(SOURCE_KEY)
            .await
            .map_err(SyncError::store(SyncPhase::LoadingCursor))?;

        tracing::info!(
            source = SOURCE_KEY,
            since = ?since,
            page_size = self.config.page_size,
            content_type = %self.client.config().content_type,
            "contentful sync started"
        );

        let max_seen = self.pull(since, stats).await?;

        let advanced = self
            .cursor
            .bump_if_later(SOURCE_KEY, max_seen)
            .await
            .map_err(SyncError::store(SyncPhase::AdvancingCursor))?;
        let watermark = self
            .cursor
            .get_cursor(SOURCE_KEY)
            .await
            .map_err(SyncError::store(SyncPhase::AdvancingCursor))?;

        Ok((watermark, advanced))
    }

    /// Page through everything updated at or after `since`, upserting each
    /// entry in order. Returns the highest `sys.updatedAt` seen, seeded with `since`.
    async fn pull(
        &self,
        since: Option<DateTime<Utc>>,
        stats: &mut RunStats,
    ) -> Result<Option<DateTime<Utc>>, SyncError> {
        let mut max_seen = since;
        let mut skip: u64 = 0;

        loop {
            let page = self
                .client
                .list_entries(&EntriesQuery {
                    limit: self.config.page_size,
                    skip,
                    updated_since: since,
                })
                .await?;

            if page.items.is_empty() {
                break;
            }
            stats.pages += 1;

            tracing::debug!(
                phase = %SyncPhase::FetchingPage,
                page = stats.pages,
                skip,
                items = page.items.len(),
                total = page.total,
                "processing contentful page"
            );

            for entry in &page.items {
                let record = entry_to_upsert(entry);
                tracing::trace!(
                    phase = %SyncPhase::Transforming,
                    contentful_id = %record.contentful_id,
                    "entry transformed"
                );

                let outcome = match self.products.upsert_from_source(&record).await {
                    Ok(outcome) => outcome,
                    Err(e) => {
                        tracing::error!(
                            phase = %SyncPhase::Upserting,
                            contentful_id = %record.contentful_id,
                            error = %e,
                            "failed to upsert contentful entry"
                        );
                        return Err(SyncError::store(SyncPhase::Upserting)(e));
                    }
                };
                stats.record(outcome);

                if let Some(updated) = record.source_updated_at {
                    if max_seen.map_or(true, |current| updated > current) {
                        max_seen = Some(updated);
                    }
                }
            }

            skip += page.items.len() as u64;
            if skip >= page.total {
                break;
            }
        }

        Ok(max_seen)
    }
}

#[async_trait]
impl<P, S> Connector for ContentfulSyncer<P, S>
where
    P: ProductUpsertRepository,
    S: SyncStateRepository,
{
    fn source_name(&self) -> &str {
        SOURCE_KEY
    }

    async fn sync(&self) -> Result<SyncResult, SyncError> {
        self.run_once().await
    }
}
