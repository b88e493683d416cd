use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::Json;
use catalog_common::error::CatalogError;
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::AppState;

/// Caller identity taken from a valid `Authorization: Bearer <jwt>` header.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub sub: String,
    pub email: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(|| CatalogError::Unauthorized("missing bearer token".to_string()))?;

        let value = header
            .to_str()
            .map_err(|_| CatalogError::Unauthorized("invalid authorization header".to_string()))?;

        let token = value
            .strip_prefix("Bearer ")
            .or_else(|| value.strip_prefix("bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| CatalogError::Unauthorized("missing bearer token".to_string()))?;

        let claims = state.auth.verify(token)?;
        Ok(AuthUser {
            sub: claims.sub,
            email: claims.email,
        })
    }
}

/// `Json<T>` whose rejections use the API error body instead of axum's plain text.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rej| CatalogError::Validation(rej.body_text()))?;
        Ok(Self(value))
    }
}
