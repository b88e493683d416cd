pub mod handlers;
pub mod jwt;
pub mod requests;
pub mod responses;

use axum::routing::post;
use axum::Router;

use crate::AppState;

pub use jwt::AuthSettings;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/auth/login", post(handlers::login))
}
