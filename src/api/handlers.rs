//! API handlers

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::extract::JsonOrForm;
use crate::api::{view, AppState};
use crate::types::{NewProduct, Product, ProductPatch};
use crate::Error;

const DEFAULT_LIMIT: i64 = 100;
const MAX_LIMIT: i64 = 1000;

/// Fixed plain-text endpoint.
pub async fn plain_text() -> &'static str {
    "Hello, world!"
}

/// Fixed JSON greeting.
pub async fn json_hello() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Hello, world from JSON serialization endpoint!"
    }))
}

/// Catalog page: up to 100 products rendered as HTML.
pub async fn fortune(State(state): State<AppState>) -> Result<Html<String>, Error> {
    let products = state.store.list(DEFAULT_LIMIT, 0).await?;
    Ok(Html(view::render_catalog(&products)))
}

/// Health check with catalog size
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, Error> {
    let products = state.store.count().await?;

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        products,
    }))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub products: i64,
}

/// Create a product
pub async fn create_product(
    State(state): State<AppState>,
    JsonOrForm(payload): JsonOrForm<NewProduct>,
) -> Result<(StatusCode, Json<Product>), Error> {
    let product = state.store.create(payload).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Fetch a product by identifier
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Product>, Error> {
    let product = state.store.get(id).await?.ok_or(Error::ProductNotFound)?;
    Ok(Json(product))
}

/// Paging parameters, kept as raw strings: unparseable values fall back to
/// the defaults instead of rejecting the request.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl ListParams {
    fn limit(&self) -> i64 {
        match self.limit.as_deref().and_then(|s| s.parse::<i64>().ok()) {
            Some(limit) if limit > 0 => limit.min(MAX_LIMIT),
            _ => DEFAULT_LIMIT,
        }
    }

    fn offset(&self) -> i64 {
        match self.offset.as_deref().and_then(|s| s.parse::<i64>().ok()) {
            Some(offset) if offset >= 0 => offset,
            _ => 0,
        }
    }
}

/// List products in ascending identifier order
pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Product>>, Error> {
    let products = state.store.list(params.limit(), params.offset()).await?;
    Ok(Json(products))
}

/// Apply a partial update to a product
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    JsonOrForm(patch): JsonOrForm<ProductPatch>,
) -> Result<Json<Product>, Error> {
    let product = state.store.update(id, patch).await?;
    Ok(Json(product))
}

/// Delete a product
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<DeleteResponse>, Error> {
    state.store.delete(id).await?;
    Ok(Json(DeleteResponse { ok: true }))
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub ok: bool,
}
