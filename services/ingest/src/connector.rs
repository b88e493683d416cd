use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::sync::service::SyncError;

/// Outcome of one completed sync run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncResult {
    pub source: String,
    pub processed: usize,
    pub inserted: usize,
    pub updated: usize,
    pub skipped: usize,
    pub pages: usize,
    /// Cursor value after the run.
    pub watermark: Option<DateTime<Utc>>,
    pub advanced: bool,
    pub elapsed_ms: u64,
}

#[async_trait]
pub trait Connector: Send + Sync {
    fn source_name(&self) -> &str;
    async fn sync(&self) -> Result<SyncResult, SyncError>;
}
