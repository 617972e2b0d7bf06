//! PostgreSQL integration tests
//!
//! These tests use a shared PostgreSQL container for efficiency.
//! Run with:
//!
//! ```bash
//! cargo test -p store --test postgres_integration
//! ```

use std::sync::Arc;

use common::{CustomerId, OrderId, ProductId};
use domain::repository::{CustomerRepository, OrderRepository, ProductRepository};
use domain::{
    Customer, CustomerKind, Money, Order, OrderLine, OrderStatus, Product, ProductPatch,
};
use serial_test::serial;
use sqlx::PgPool;
use store::PostgresStore;
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

/// Global shared container
static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            // Create a temporary pool just for migrations
            let temp_pool = PgPool::connect(&connection_string).await.unwrap();

            sqlx::raw_sql(include_str!(
                "../../../migrations/001_create_store_tables.sql"
            ))
            .execute(&temp_pool)
            .await
            .unwrap();

            temp_pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

/// Get a fresh store with its own pool and cleared tables
async fn get_test_store() -> PostgresStore {
    let info = get_container_info().await;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&info.connection_string)
        .await
        .unwrap();

    // Clear tables for test isolation
    sqlx::query("TRUNCATE TABLE order_lines, orders, products, customers")
        .execute(&pool)
        .await
        .unwrap();

    PostgresStore::new(pool)
}

fn test_customer() -> Customer {
    Customer::new(
        "Ada",
        "1 Main St",
        "A",
        CustomerKind::Corporate {
            contact_name: "B. Counter".to_string(),
            credit_limit: Money::from_dollars(5000),
        },
    )
}

fn test_product(sku: &str) -> Product {
    Product::new(
        sku,
        "Widget",
        "A basic widget",
        Money::from_cents(1000),
        5,
        "gadgets",
    )
}

#[tokio::test]
#[serial]
async fn customer_roundtrip_preserves_kind() {
    let store = get_test_store().await;
    let customer = test_customer();

    CustomerRepository::insert(&store, &customer).await.unwrap();

    let loaded = CustomerRepository::find_by_id(&store, customer.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(loaded.name, "Ada");
    assert_eq!(loaded.kind, customer.kind);

    let missing = CustomerRepository::find_by_id(&store, CustomerId::new())
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
#[serial]
async fn product_sku_lookup_and_update() {
    let store = get_test_store().await;
    let mut product = test_product("SKU-001");
    ProductRepository::insert(&store, &product).await.unwrap();

    let found = store.find_by_sku("SKU-001").await.unwrap().unwrap();
    assert_eq!(found.id, product.id);
    assert_eq!(found.price.cents(), 1000);

    product.apply(ProductPatch {
        price: Some(Money::from_cents(1500)),
        active: Some(false),
        ..Default::default()
    });
    ProductRepository::update(&store, &product).await.unwrap();

    let reloaded = ProductRepository::find_by_id(&store, product.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reloaded.price.cents(), 1500);
    assert!(!reloaded.active);
}

#[tokio::test]
#[serial]
async fn product_category_and_active_filters() {
    let store = get_test_store().await;

    let gadget = test_product("SKU-001");
    let mut tool = test_product("SKU-002");
    tool.category = "tools".to_string();
    tool.active = false;

    ProductRepository::insert(&store, &gadget).await.unwrap();
    ProductRepository::insert(&store, &tool).await.unwrap();

    let gadgets = store.find_by_category("gadgets").await.unwrap();
    assert_eq!(gadgets.len(), 1);
    assert_eq!(gadgets[0].sku, "SKU-001");

    let active = store.find_by_active(true).await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].sku, "SKU-001");
}

#[tokio::test]
#[serial]
async fn order_aggregate_roundtrip_preserves_line_order() {
    let store = get_test_store().await;
    let customer = test_customer();
    CustomerRepository::insert(&store, &customer).await.unwrap();

    let first = test_product("SKU-001");
    let second = test_product("SKU-002");
    ProductRepository::insert(&store, &first).await.unwrap();
    ProductRepository::insert(&store, &second).await.unwrap();

    let lines = vec![
        OrderLine::new(first.id, 2, Money::from_cents(1000)),
        OrderLine::new(second.id, 1, Money::from_cents(500)),
    ];
    let order = Order::place(customer.id, true, lines);

    OrderRepository::insert(&store, &order).await.unwrap();

    let loaded = OrderRepository::find_by_id(&store, order.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(loaded.number, order.number);
    assert_eq!(loaded.total_price.cents(), 2500);
    assert!(loaded.prepaid);
    assert_eq!(loaded.lines.len(), 2);
    assert_eq!(loaded.lines[0].product_id, first.id);
    assert_eq!(loaded.lines[1].product_id, second.id);
    assert_eq!(loaded.status, OrderStatus::Pending);
}

#[tokio::test]
#[serial]
async fn order_status_update_persists() {
    let store = get_test_store().await;
    let customer = test_customer();
    CustomerRepository::insert(&store, &customer).await.unwrap();

    let mut order = Order::place(customer.id, false, vec![]);
    OrderRepository::insert(&store, &order).await.unwrap();

    order.cancel().unwrap();
    OrderRepository::update(&store, &order).await.unwrap();

    let loaded = OrderRepository::find_by_id(&store, order.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(loaded.status, OrderStatus::Cancelled);
}

#[tokio::test]
#[serial]
async fn order_queries_by_customer_and_status() {
    let store = get_test_store().await;
    let ada = test_customer();
    let mut bob = test_customer();
    bob.name = "Bob".to_string();
    CustomerRepository::insert(&store, &ada).await.unwrap();
    CustomerRepository::insert(&store, &bob).await.unwrap();

    let mut cancelled = Order::place(ada.id, false, vec![]);
    cancelled.cancel().unwrap();
    let pending = Order::place(ada.id, false, vec![]);
    let other = Order::place(bob.id, false, vec![]);

    OrderRepository::insert(&store, &cancelled).await.unwrap();
    OrderRepository::insert(&store, &pending).await.unwrap();
    OrderRepository::insert(&store, &other).await.unwrap();

    let adas = store.find_by_customer(ada.id).await.unwrap();
    assert_eq!(adas.len(), 2);

    let pendings = store.find_by_status(OrderStatus::Pending).await.unwrap();
    assert_eq!(pendings.len(), 2);

    let all = OrderRepository::find_all(&store).await.unwrap();
    assert_eq!(all.len(), 3);

    let none = store.find_by_customer(CustomerId::new()).await.unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
#[serial]
async fn missing_order_is_none() {
    let store = get_test_store().await;
    let missing = OrderRepository::find_by_id(&store, OrderId::new())
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
#[serial]
async fn order_insert_rejects_unknown_customer() {
    let store = get_test_store().await;

    // No customer row; the FK makes the transactional insert fail whole.
    let order = Order::place(CustomerId::new(), false, vec![]);
    let result = OrderRepository::insert(&store, &order).await;
    assert!(result.is_err());

    let all = OrderRepository::find_all(&store).await.unwrap();
    assert!(all.is_empty());
}

#[tokio::test]
#[serial]
async fn order_insert_is_atomic_across_lines() {
    let store = get_test_store().await;
    let customer = test_customer();
    CustomerRepository::insert(&store, &customer).await.unwrap();

    let product = test_product("SKU-001");
    ProductRepository::insert(&store, &product).await.unwrap();

    // Second line references a product that does not exist, so the whole
    // aggregate insert must roll back.
    let lines = vec![
        OrderLine::new(product.id, 1, Money::from_cents(1000)),
        OrderLine::new(ProductId::new(), 1, Money::from_cents(500)),
    ];
    let order = Order::place(customer.id, false, lines);

    let result = OrderRepository::insert(&store, &order).await;
    assert!(result.is_err());

    let all = OrderRepository::find_all(&store).await.unwrap();
    assert!(all.is_empty());

    let line_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM order_lines")
        .fetch_one(store.pool())
        .await
        .unwrap();
    assert_eq!(line_count, 0);
}
