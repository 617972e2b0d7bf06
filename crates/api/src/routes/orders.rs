//! Order placement, lifecycle, and lookup endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use common::{CustomerId, OrderId, ProductId};
use domain::{
    CatalogService, CustomerService, LineRequest, Order, OrderService, OrderStatus, PlaceOrder,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub orders: OrderService,
    pub catalog: CatalogService,
    pub customers: CustomerService,
}

// -- Request types --

#[derive(Deserialize)]
pub struct PlaceOrderRequest {
    pub customer_id: Uuid,
    #[serde(default)]
    pub is_prepaid: Option<bool>,
    #[serde(default)]
    pub order_lines: Vec<OrderLineRequest>,
}

#[derive(Deserialize)]
pub struct OrderLineRequest {
    pub product_id: Uuid,
    pub quantity: u32,
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Deserialize)]
pub struct ListOrdersParams {
    pub status: Option<OrderStatus>,
}

// -- Response types --

/// External projection of an order aggregate, flattened with customer and
/// product names joined in.
#[derive(Serialize)]
pub struct OrderResponse {
    pub id: String,
    pub order_number: String,
    pub date_received: String,
    pub is_prepaid: bool,
    pub total_price_cents: i64,
    pub status: String,
    pub customer_id: String,
    pub customer_name: String,
    pub order_lines: Vec<OrderLineResponse>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Serialize)]
pub struct OrderLineResponse {
    pub id: String,
    pub product_id: String,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price_cents: i64,
    pub line_total_cents: i64,
}

/// Builds the external projection for one order, joining in the customer
/// name and the product name per line with explicit lookups.
pub(crate) async fn project_order(state: &AppState, order: &Order) -> Result<OrderResponse, ApiError> {
    let customer = state.customers.get_customer(order.customer_id).await?;

    let mut order_lines = Vec::with_capacity(order.lines.len());
    for line in &order.lines {
        let product = state.catalog.get_product(line.product_id).await?;
        order_lines.push(OrderLineResponse {
            id: line.id.to_string(),
            product_id: line.product_id.to_string(),
            product_name: product.name,
            quantity: line.quantity,
            unit_price_cents: line.unit_price.cents(),
            line_total_cents: line.line_total().cents(),
        });
    }

    Ok(OrderResponse {
        id: order.id.to_string(),
        order_number: order.number.to_string(),
        date_received: order.date_received.to_rfc3339(),
        is_prepaid: order.prepaid,
        total_price_cents: order.total_price.cents(),
        status: order.status.to_string(),
        customer_id: order.customer_id.to_string(),
        customer_name: customer.name,
        order_lines,
        created_at: order.created_at.to_rfc3339(),
        updated_at: order.updated_at.to_rfc3339(),
    })
}

async fn project_orders(
    state: &AppState,
    orders: Vec<Order>,
) -> Result<Vec<OrderResponse>, ApiError> {
    let mut responses = Vec::with_capacity(orders.len());
    for order in &orders {
        responses.push(project_order(state, order).await?);
    }
    Ok(responses)
}

// -- Handlers --

/// POST /orders — place a new order.
#[tracing::instrument(skip(state, req))]
pub async fn place(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PlaceOrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError> {
    let lines = req
        .order_lines
        .iter()
        .map(|line| LineRequest::new(ProductId::from_uuid(line.product_id), line.quantity))
        .collect();
    let cmd = PlaceOrder::new(
        CustomerId::from_uuid(req.customer_id),
        req.is_prepaid.unwrap_or(false),
        lines,
    );

    let order = state.orders.place_order(cmd).await?;
    let response = project_order(&state, &order).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /orders/{id} — load one order.
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order = state.orders.get_order(OrderId::from_uuid(id)).await?;
    Ok(Json(project_order(&state, &order).await?))
}

/// GET /orders — list all orders, optionally filtered by status.
#[tracing::instrument(skip(state))]
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListOrdersParams>,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    let orders = match params.status {
        Some(status) => state.orders.orders_with_status(status).await?,
        None => state.orders.all_orders().await?,
    };
    Ok(Json(project_orders(&state, orders).await?))
}

/// GET /orders/customer/{customer_id} — list a customer's orders.
///
/// An unknown customer yields an empty list, not an error.
#[tracing::instrument(skip(state))]
pub async fn by_customer(
    State(state): State<Arc<AppState>>,
    Path(customer_id): Path<Uuid>,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    let orders = state
        .orders
        .orders_for_customer(CustomerId::from_uuid(customer_id))
        .await?;
    Ok(Json(project_orders(&state, orders).await?))
}

/// DELETE /orders/{id} — cancel an order.
///
/// 404 if the order does not exist, 409 if it is already cancelled or
/// delivered.
#[tracing::instrument(skip(state))]
pub async fn cancel(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order = state.orders.cancel_order(OrderId::from_uuid(id)).await?;
    Ok(Json(project_order(&state, &order).await?))
}

/// PATCH /orders/{id}/status — overwrite an order's status.
#[tracing::instrument(skip(state, req))]
pub async fn change_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order = state
        .orders
        .change_status(OrderId::from_uuid(id), req.status)
        .await?;
    Ok(Json(project_order(&state, &order).await?))
}
