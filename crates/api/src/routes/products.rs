//! Product catalog CRUD endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use common::ProductId;
use domain::{Money, NewProduct, Product, ProductPatch};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::orders::AppState;
use crate::error::ApiError;

// -- Request types --

#[derive(Deserialize)]
pub struct CreateProductRequest {
    pub sku: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price_cents: i64,
    pub stock_quantity: u32,
    #[serde(default)]
    pub category: String,
}

#[derive(Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price_cents: Option<i64>,
    pub stock_quantity: Option<u32>,
    pub category: Option<String>,
    pub active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct ListProductsParams {
    pub category: Option<String>,
    pub active: Option<bool>,
}

// -- Response types --

#[derive(Serialize)]
pub struct ProductResponse {
    pub id: String,
    pub sku: String,
    pub name: String,
    pub description: String,
    pub price_cents: i64,
    pub stock_quantity: u32,
    pub category: String,
    pub active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id.to_string(),
            sku: product.sku,
            name: product.name,
            description: product.description,
            price_cents: product.price.cents(),
            stock_quantity: product.stock_quantity,
            category: product.category,
            active: product.active,
            created_at: product.created_at.to_rfc3339(),
            updated_at: product.updated_at.to_rfc3339(),
        }
    }
}

// -- Handlers --

/// POST /products — add a product to the catalog.
#[tracing::instrument(skip(state, req))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), ApiError> {
    let product = state
        .catalog
        .create_product(NewProduct {
            sku: req.sku,
            name: req.name,
            description: req.description,
            price: Money::from_cents(req.price_cents),
            stock_quantity: req.stock_quantity,
            category: req.category,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(product.into())))
}

/// GET /products/{id} — load one product.
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProductResponse>, ApiError> {
    let product = state.catalog.get_product(ProductId::from_uuid(id)).await?;
    Ok(Json(product.into()))
}

/// GET /products — list products, optionally filtered by category or
/// active flag.
#[tracing::instrument(skip(state))]
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListProductsParams>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    let products = match (params.category, params.active) {
        (Some(category), _) => state.catalog.products_in_category(&category).await?,
        (None, Some(active)) => state.catalog.products_by_active(active).await?,
        (None, None) => state.catalog.all_products().await?,
    };

    Ok(Json(products.into_iter().map(Into::into).collect()))
}

/// PATCH /products/{id} — partially update a product.
#[tracing::instrument(skip(state, req))]
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateProductRequest>,
) -> Result<Json<ProductResponse>, ApiError> {
    let patch = ProductPatch {
        name: req.name,
        description: req.description,
        price: req.price_cents.map(Money::from_cents),
        stock_quantity: req.stock_quantity,
        category: req.category,
        active: req.active,
    };

    let product = state
        .catalog
        .update_product(ProductId::from_uuid(id), patch)
        .await?;
    Ok(Json(product.into()))
}

/// DELETE /products/{id} — soft-delete a product by deactivating it.
#[tracing::instrument(skip(state))]
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state
        .catalog
        .deactivate_product(ProductId::from_uuid(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
