use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use catalog_common::error::CatalogError;

use crate::auth::requests::LoginRequest;
use crate::auth::responses::LoginResponse;
use crate::envelope::{ok, Envelope};
use crate::error::ApiError;
use crate::AppState;

pub const DEFAULT_LOGIN_EMAIL: &str = "test@example.com";

/// Stub login: any caller gets a token for the supplied (or default) email.
pub async fn login(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Envelope<LoginResponse>>, ApiError> {
    let req: LoginRequest = if body.iter().all(u8::is_ascii_whitespace) {
        LoginRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| CatalogError::Validation(format!("invalid login body: {e}")))?
    };

    let email = req
        .email
        .map(|e| e.trim().to_owned())
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| DEFAULT_LOGIN_EMAIL.to_owned());

    let access_token = state.auth.issue(&email)?;
    tracing::info!(%email, "issued access token");
    Ok(ok(LoginResponse { access_token }))
}
