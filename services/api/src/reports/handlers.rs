use axum::extract::{Query, State};
use axum::Json;
use catalog_db::reports::models::{CategoryCount, OverviewReport};
use catalog_db::reports::repositories::ReportRepository;
use chrono::Utc;

use crate::envelope::{ok, Envelope};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::reports::requests::ReportsQueryParams;
use crate::AppState;

pub async fn overview(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<ReportsQueryParams>,
) -> Result<Json<Envelope<OverviewReport>>, ApiError> {
    let query = params.to_query()?;
    // Inverted ranges are rejected before any query runs.
    query.window(Utc::now())?;
    let report = state.reports.overview(&query).await?;
    Ok(ok(report))
}

pub async fn by_category(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<ReportsQueryParams>,
) -> Result<Json<Envelope<Vec<CategoryCount>>>, ApiError> {
    let query = params.to_query()?;
    query.window(Utc::now())?;
    let rows = state.reports.by_category(&query).await?;
    Ok(ok(rows))
}
