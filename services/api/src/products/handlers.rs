use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use catalog_common::error::CatalogError;
use catalog_common::types::Page;
use catalog_db::products::models::Product;
use catalog_db::products::repositories::ProductRepository;
use serde_json::Value;
use uuid::Uuid;

use crate::envelope::{ok, Envelope};
use crate::error::ApiError;
use crate::extractors::{AuthUser, JsonBody};
use crate::products::requests::{CreateProductRequest, ListProductsQuery, UpdateProductRequest};
use crate::products::responses::{project, DeleteProductResponse};
use crate::AppState;

fn parse_id(raw: &str) -> Result<Uuid, CatalogError> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| CatalogError::Validation(format!("invalid product id: {raw}")))
}

pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ListProductsQuery>,
) -> Result<Json<Envelope<Page<Value>>>, ApiError> {
    let filter = query.to_filter()?;
    let columns = query.columns();

    let page = state.products.search(&filter).await?;
    let data = page
        .data
        .iter()
        .map(|p| project(p, &columns))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ok(Page {
        offset: page.offset,
        limit: page.limit,
        total: page.total,
        data,
    }))
}

pub async fn create_product(
    State(state): State<AppState>,
    user: AuthUser,
    JsonBody(body): JsonBody<CreateProductRequest>,
) -> Result<(StatusCode, Json<Envelope<Product>>), ApiError> {
    let new_product = body.into_new_product()?;
    let product = state.products.create(&new_product).await?;
    tracing::info!(id = %product.id, contentful_id = %product.contentful_id, user = %user.email, "product created");
    Ok((StatusCode::CREATED, ok(product)))
}

pub async fn update_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<UpdateProductRequest>,
) -> Result<Json<Envelope<Product>>, ApiError> {
    let id = parse_id(&id)?;
    let patch = body.into_patch()?;
    let product = state.products.update(id, &patch).await?;
    tracing::info!(%id, user = %user.email, "product updated");
    Ok(ok(product))
}

pub async fn delete_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Envelope<DeleteProductResponse>>, ApiError> {
    let id = parse_id(&id)?;
    state.products.soft_delete(id).await?;
    tracing::info!(%id, user = %user.email, "product soft-deleted");
    Ok(ok(DeleteProductResponse { id, deleted: true }))
}
