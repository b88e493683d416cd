pub mod handlers;
pub mod requests;

use axum::routing::get;
use axum::Router;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/reports/overview", get(handlers::overview))
        .route("/api/reports/by-category", get(handlers::by_category))
}
