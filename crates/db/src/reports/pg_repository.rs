use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};

use crate::reports::models::{
    percentage, CategoryCount, OverviewReport, ReportWindow, ReportsQuery,
};
use crate::reports::repositories::ReportRepository;
use catalog_common::error::{CatalogError, CatalogResult};

#[derive(Clone)]
pub struct PgReportRepository {
    pool: PgPool,
}

impl PgReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn push_between(qb: &mut QueryBuilder<'_, Postgres>, column: &str, window: ReportWindow) {
        qb.push(format!("{column} between "))
            .push_bind(window.from)
            .push(" and ")
            .push_bind(window.to);
    }

    fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, query: &ReportsQuery) {
        for (column, value) in query.filters() {
            if let Some(value) = value {
                qb.push(format!(
                    " and lower(immutable_unaccent({column})) = lower(immutable_unaccent("
                ))
                .push_bind(value.to_owned())
                .push("))");
            }
        }
    }
}

#[async_trait]
impl ReportRepository for PgReportRepository {
    async fn overview(&self, query: &ReportsQuery) -> CatalogResult<OverviewReport> {
        let window = query.window(Utc::now())?;
        let col = query.date_field.column();

        // Universe is rows whose date column falls in the window; deletions are
        // always counted by deleted_at in the same window.
        let mut qb = QueryBuilder::new("select count(*) filter (where ");
        Self::push_between(&mut qb, col, window);
        qb.push(") as total, count(*) filter (where deleted_at is not null and ");
        Self::push_between(&mut qb, "deleted_at", window);
        qb.push(") as deleted_count, count(*) filter (where price is not null and ");
        Self::push_between(&mut qb, col, window);
        qb.push(") as priced_count, min(price::float8) filter (where ");
        Self::push_between(&mut qb, col, window);
        qb.push(") as price_min, max(price::float8) filter (where ");
        Self::push_between(&mut qb, col, window);
        qb.push(") as price_max, avg(price::float8) filter (where ");
        Self::push_between(&mut qb, col, window);
        qb.push(") as price_avg from products where true");
        Self::push_filters(&mut qb, query);

        let row = qb
            .build()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| CatalogError::Database(e.to_string()))?;

        let total: i64 = row.get("total");
        let deleted_count: i64 = row.get("deleted_count");
        let priced_count: i64 = row.get("priced_count");
        let no_price_count = total - priced_count;

        Ok(OverviewReport {
            total,
            deleted_count,
            deleted_pct: percentage(deleted_count, total),
            priced_count,
            priced_pct: percentage(priced_count, total),
            no_price_count,
            no_price_pct: percentage(no_price_count, total),
            price_min: row.get("price_min"),
            price_max: row.get("price_max"),
            price_avg: row.get("price_avg"),
        })
    }

    async fn by_category(&self, query: &ReportsQuery) -> CatalogResult<Vec<CategoryCount>> {
        let window = query.window(Utc::now())?;

        let mut qb = QueryBuilder::new("select category, count(*) as total from products where ");
        Self::push_between(&mut qb, query.date_field.column(), window);
        Self::push_filters(&mut qb, query);
        qb.push(" group by category order by total desc, category asc nulls first");

        let rows = qb
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| CatalogError::Database(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|row| CategoryCount {
                category: row.get("category"),
                total: row.get("total"),
            })
            .collect())
    }
}
