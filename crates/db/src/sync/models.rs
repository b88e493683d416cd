use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-source synchronization cursor. `last_updated_at` is the highest
/// upstream `updatedAt` that has been fully applied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncState {
    pub source: String,
    pub last_updated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
