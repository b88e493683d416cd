use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity block returned by `GET /info`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub service: String,
    pub version: String,
    pub instance_id: Uuid,
}

impl ServiceInfo {
    pub fn new(service: &str) -> Self {
        Self {
            service: service.to_owned(),
            version: env!("CARGO_PKG_VERSION").to_owned(),
            instance_id: Uuid::new_v4(),
        }
    }
}

/// One offset/limit window of a listing together with the unpaginated total.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub offset: i64,
    pub limit: i64,
    pub total: i64,
    pub data: Vec<T>,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            offset: self.offset,
            limit: self.limit,
            total: self.total,
            data: self.data.into_iter().map(f).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_info_carries_crate_version() {
        let info = ServiceInfo::new("catalog-api");
        assert_eq!(info.service, "catalog-api");
        assert!(!info.version.is_empty());
    }

    #[test]
    fn page_map_keeps_window() {
        let page = Page {
            offset: 5,
            limit: 5,
            total: 12,
            data: vec![1, 2, 3],
        };
        let mapped = page.map(|n| n * 10);
        assert_eq!(mapped.offset, 5);
        assert_eq!(mapped.total, 12);
        assert_eq!(mapped.data, vec![10, 20, 30]);
    }
}
