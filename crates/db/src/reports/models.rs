use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use catalog_common::error::{CatalogError, CatalogResult};

pub const DEFAULT_WINDOW_DAYS: i64 = 30;

/// Timestamp column a report window is applied to.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DateField {
    CreatedAt,
    #[default]
    UpdatedAt,
    DeletedAt,
    SourceUpdatedAt,
}

impl DateField {
    pub fn column(&self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
            Self::DeletedAt => "deleted_at",
            Self::SourceUpdatedAt => "source_updated_at",
        }
    }

    /// Lenient parse: anything outside the whitelist falls back to `updated_at`.
    pub fn from_param(value: Option<&str>) -> Self {
        value.and_then(|v| v.trim().parse().ok()).unwrap_or_default()
    }
}

impl FromStr for DateField {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "created_at" | "createdAt" => Ok(Self::CreatedAt),
            "updated_at" | "updatedAt" => Ok(Self::UpdatedAt),
            "deleted_at" | "deletedAt" => Ok(Self::DeletedAt),
            "source_updated_at" | "sourceUpdatedAt" => Ok(Self::SourceUpdatedAt),
            _ => Err(format!("unknown date field: {value}")),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReportsQuery {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub date_field: DateField,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub color: Option<String>,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl ReportsQuery {
    /// Inclusive window, defaulting to the last 30 days ending at `now`.
    pub fn window(&self, now: DateTime<Utc>) -> CatalogResult<ReportWindow> {
        let to = self.to.unwrap_or(now);
        let from = self
            .from
            .unwrap_or_else(|| now - Duration::days(DEFAULT_WINDOW_DAYS));
        if from > to {
            return Err(CatalogError::Validation(
                "\"from\" must be <= \"to\"".to_owned(),
            ));
        }
        Ok(ReportWindow { from, to })
    }

    pub fn filters(&self) -> [(&'static str, Option<&str>); 5] {
        [
            ("category", self.category.as_deref()),
            ("brand", self.brand.as_deref()),
            ("model", self.model.as_deref()),
            ("color", self.color.as_deref()),
            ("currency", self.currency.as_deref()),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OverviewReport {
    pub total: i64,
    pub deleted_count: i64,
    pub deleted_pct: f64,
    pub priced_count: i64,
    pub priced_pct: f64,
    pub no_price_count: i64,
    pub no_price_pct: f64,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub price_avg: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryCount {
    pub category: Option<String>,
    pub total: i64,
}

/// Share of `num` in `den` as a percentage rounded to two decimals; 0 when `den` is 0.
pub fn percentage(num: i64, den: i64) -> f64 {
    if den <= 0 {
        return 0.0;
    }
    let raw = num as f64 * 100.0 / den as f64;
    (raw * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn date_field_falls_back_to_updated_at() {
        assert_eq!(DateField::from_param(None), DateField::UpdatedAt);
        assert_eq!(DateField::from_param(Some("price")), DateField::UpdatedAt);
        assert_eq!(
            DateField::from_param(Some("source_updated_at")),
            DateField::SourceUpdatedAt
        );
        assert_eq!(DateField::from_param(Some("createdAt")), DateField::CreatedAt);
    }

    #[test]
    fn window_defaults_to_last_thirty_days() {
        let now = Utc.with_ymd_and_hms(2025, 9, 30, 12, 0, 0).unwrap();
        let w = ReportsQuery::default().window(now).expect("window");
        assert_eq!(w.to, now);
        assert_eq!(w.from, Utc.with_ymd_and_hms(2025, 8, 31, 12, 0, 0).unwrap());
    }

    #[test]
    fn window_rejects_inverted_range() {
        let q = ReportsQuery {
            from: Some(Utc.with_ymd_and_hms(2025, 9, 2, 0, 0, 0).unwrap()),
            to: Some(Utc.with_ymd_and_hms(2025, 9, 1, 0, 0, 0).unwrap()),
            ..Default::default()
        };
        let err = q.window(Utc::now()).unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));
    }

    #[test]
    fn percentage_rounds_to_two_decimals() {
        assert_eq!(percentage(1, 3), 33.33);
        assert_eq!(percentage(2, 3), 66.67);
        assert_eq!(percentage(8, 120), 6.67);
        assert_eq!(percentage(5, 0), 0.0);
    }
}
