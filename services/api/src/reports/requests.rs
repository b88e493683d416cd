use chrono::{DateTime, Utc};
use catalog_common::error::{CatalogError, CatalogResult};
use catalog_common::sanitize::clean_string;
use catalog_db::reports::models::{DateField, ReportsQuery};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct ReportsQueryParams {
    pub from: Option<String>,
    pub to: Option<String>,
    #[serde(alias = "dateField")]
    pub date_field: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub color: Option<String>,
    pub currency: Option<String>,
}

impl ReportsQueryParams {
    pub fn to_query(&self) -> CatalogResult<ReportsQuery> {
        Ok(ReportsQuery {
            from: timestamp("from", self.from.as_deref())?,
            to: timestamp("to", self.to.as_deref())?,
            date_field: DateField::from_param(self.date_field.as_deref()),
            category: clean_string(self.category.as_deref()),
            brand: clean_string(self.brand.as_deref()),
            model: clean_string(self.model.as_deref()),
            color: clean_string(self.color.as_deref()),
            currency: clean_string(self.currency.as_deref()),
        })
    }
}

fn timestamp(key: &str, raw: Option<&str>) -> CatalogResult<Option<DateTime<Utc>>> {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => DateTime::parse_from_rfc3339(v)
            .map(|dt| Some(dt.with_timezone(&Utc)))
            .map_err(|_| CatalogError::Validation(format!("{key} must be an RFC 3339 timestamp"))),
    }
}
