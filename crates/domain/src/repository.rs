//! Repository ports implemented by the store crate.

use async_trait::async_trait;
use common::{CustomerId, OrderId, ProductId};

use crate::customer::Customer;
use crate::error::Result;
use crate::order::{Order, OrderStatus};
use crate::product::Product;

/// Persistence port for customers.
///
/// All implementations must be thread-safe (Send + Sync). Lookups return
/// `Ok(None)` on a miss; services translate that into a typed NotFound.
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Persists a new customer.
    async fn insert(&self, customer: &Customer) -> Result<()>;

    /// Finds a customer by ID.
    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>>;

    /// Lists all customers.
    async fn find_all(&self) -> Result<Vec<Customer>>;
}

/// Persistence port for catalog products.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Persists a new product.
    async fn insert(&self, product: &Product) -> Result<()>;

    /// Persists changes to an existing product.
    async fn update(&self, product: &Product) -> Result<()>;

    /// Finds a product by ID.
    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>>;

    /// Finds a product by its unique SKU.
    async fn find_by_sku(&self, sku: &str) -> Result<Option<Product>>;

    /// Lists products in a category.
    async fn find_by_category(&self, category: &str) -> Result<Vec<Product>>;

    /// Lists products filtered by the active flag.
    async fn find_by_active(&self, active: bool) -> Result<Vec<Product>>;

    /// Lists all products.
    async fn find_all(&self) -> Result<Vec<Product>>;
}

/// Persistence port for order aggregates.
///
/// An order and its lines form one consistency unit: `insert` stores the
/// whole aggregate atomically, and reads return it fully materialized with
/// lines eagerly loaded in placement order.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persists a new order together with all of its lines.
    ///
    /// Either the whole aggregate is durably stored or none of it is.
    async fn insert(&self, order: &Order) -> Result<()>;

    /// Persists changes to an existing order (status, timestamps).
    ///
    /// Lines are immutable after placement and are not written here.
    async fn update(&self, order: &Order) -> Result<()>;

    /// Finds an order by ID.
    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>>;

    /// Lists all orders placed by a customer.
    async fn find_by_customer(&self, customer_id: CustomerId) -> Result<Vec<Order>>;

    /// Lists all orders currently in the given status.
    async fn find_by_status(&self, status: OrderStatus) -> Result<Vec<Order>>;

    /// Lists all orders.
    async fn find_all(&self) -> Result<Vec<Order>>;
}
