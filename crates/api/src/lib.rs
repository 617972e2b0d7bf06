//! HTTP API server for the online-store backend.
//!
//! Provides REST endpoints for orders, products, and customers, with
//! structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, patch, post};
use domain::repository::{CustomerRepository, OrderRepository, ProductRepository};
use domain::{CatalogService, CustomerService, OrderService};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::orders::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route(
            "/orders",
            post(routes::orders::place).get(routes::orders::list),
        )
        .route(
            "/orders/{id}",
            get(routes::orders::get).delete(routes::orders::cancel),
        )
        .route("/orders/{id}/status", patch(routes::orders::change_status))
        .route(
            "/orders/customer/{customer_id}",
            get(routes::orders::by_customer),
        )
        .route(
            "/products",
            post(routes::products::create).get(routes::products::list),
        )
        .route(
            "/products/{id}",
            get(routes::products::get)
                .patch(routes::products::update)
                .delete(routes::products::delete),
        )
        .route(
            "/customers",
            post(routes::customers::register).get(routes::customers::list),
        )
        .route("/customers/{id}", get(routes::customers::get))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the application state over a single store backend.
///
/// The store implements all three repository ports; the services receive
/// them as explicit trait objects at construction.
pub fn create_state<S>(store: S) -> Arc<AppState>
where
    S: CustomerRepository + ProductRepository + OrderRepository + Clone + 'static,
{
    let customers: Arc<dyn CustomerRepository> = Arc::new(store.clone());
    let products: Arc<dyn ProductRepository> = Arc::new(store.clone());
    let orders: Arc<dyn OrderRepository> = Arc::new(store);

    Arc::new(AppState {
        orders: OrderService::new(orders, customers.clone(), products.clone()),
        catalog: CatalogService::new(products),
        customers: CustomerService::new(customers),
    })
}
