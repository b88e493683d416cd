pub mod handlers;
pub mod requests;
pub mod responses;

use axum::routing::{delete, get, patch};
use axum::Router;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/products",
            get(handlers::list_products).post(handlers::create_product),
        )
        .route("/api/products/{id}", patch(handlers::update_product))
        .route("/api/products/id/{id}", delete(handlers::delete_product))
}
