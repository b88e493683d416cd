use async_trait::async_trait;

use crate::reports::models::{CategoryCount, OverviewReport, ReportsQuery};
use catalog_common::error::CatalogResult;

#[async_trait]
pub trait ReportRepository: Send + Sync {
    async fn overview(&self, query: &ReportsQuery) -> CatalogResult<OverviewReport>;
    async fn by_category(&self, query: &ReportsQuery) -> CatalogResult<Vec<CategoryCount>>;
}
