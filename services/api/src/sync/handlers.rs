use axum::extract::State;
use axum::Json;
use catalog_common::error::CatalogError;
use catalog_ingest::connector::SyncResult;

use crate::envelope::{ok, Envelope};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::AppState;

/// Run the connector now and return its report.
pub async fn run_sync(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Envelope<SyncResult>>, ApiError> {
    let connector = state.sync.as_ref().ok_or_else(|| {
        CatalogError::Unavailable("contentful sync is not configured".to_string())
    })?;

    tracing::info!(source = connector.source_name(), user = %user.sub, "on-demand sync requested");
    let result = connector.sync().await?;
    Ok(ok(result))
}
