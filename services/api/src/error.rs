use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use catalog_common::error::CatalogError;
use catalog_ingest::sync::service::SyncError;

pub struct ApiError(pub CatalogError);

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        Self(err)
    }
}

impl From<SyncError> for ApiError {
    fn from(err: SyncError) -> Self {
        match err {
            SyncError::AlreadyRunning => Self(CatalogError::Conflict(err.to_string())),
            SyncError::Fetch(_) => Self(CatalogError::Unavailable(err.to_string())),
            SyncError::Store { source, .. } => Self(source),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            CatalogError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            CatalogError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            CatalogError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            CatalogError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            CatalogError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
            other => {
                tracing::error!(error = %other, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        let body = serde_json::json!({ "ok": false, "error": message });
        (status, Json(body)).into_response()
    }
}
