use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::{CustomerId, OrderId, ProductId};
use domain::repository::{CustomerRepository, OrderRepository, ProductRepository};
use domain::{Customer, Order, OrderStatus, Product, Result};
use tokio::sync::RwLock;

/// In-memory store implementation.
///
/// Backs all three repository ports with HashMaps behind async locks. Used
/// by tests and as the run mode when no database is configured; provides
/// the same interface as the PostgreSQL implementation.
#[derive(Clone, Default)]
pub struct MemoryStore {
    customers: Arc<RwLock<HashMap<CustomerId, Customer>>>,
    products: Arc<RwLock<HashMap<ProductId, Product>>>,
    orders: Arc<RwLock<HashMap<OrderId, Order>>>,
}

impl MemoryStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored orders.
    pub async fn order_count(&self) -> usize {
        self.orders.read().await.len()
    }

    /// Returns the number of stored products.
    pub async fn product_count(&self) -> usize {
        self.products.read().await.len()
    }

    /// Returns the number of stored customers.
    pub async fn customer_count(&self) -> usize {
        self.customers.read().await.len()
    }

    /// Clears all stored data.
    pub async fn clear(&self) {
        self.customers.write().await.clear();
        self.products.write().await.clear();
        self.orders.write().await.clear();
    }
}

fn sorted_by_creation<T>(mut items: Vec<T>, key: impl Fn(&T) -> chrono::DateTime<chrono::Utc>) -> Vec<T> {
    items.sort_by_key(|item| key(item));
    items
}

#[async_trait]
impl CustomerRepository for MemoryStore {
    async fn insert(&self, customer: &Customer) -> Result<()> {
        self.customers
            .write()
            .await
            .insert(customer.id, customer.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>> {
        Ok(self.customers.read().await.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Customer>> {
        let customers = self.customers.read().await.values().cloned().collect();
        Ok(sorted_by_creation(customers, |c: &Customer| c.created_at))
    }
}

#[async_trait]
impl ProductRepository for MemoryStore {
    async fn insert(&self, product: &Product) -> Result<()> {
        self.products
            .write()
            .await
            .insert(product.id, product.clone());
        Ok(())
    }

    async fn update(&self, product: &Product) -> Result<()> {
        self.products
            .write()
            .await
            .insert(product.id, product.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>> {
        Ok(self.products.read().await.get(&id).cloned())
    }

    async fn find_by_sku(&self, sku: &str) -> Result<Option<Product>> {
        Ok(self
            .products
            .read()
            .await
            .values()
            .find(|p| p.sku == sku)
            .cloned())
    }

    async fn find_by_category(&self, category: &str) -> Result<Vec<Product>> {
        let products = self
            .products
            .read()
            .await
            .values()
            .filter(|p| p.category == category)
            .cloned()
            .collect();
        Ok(sorted_by_creation(products, |p: &Product| p.created_at))
    }

    async fn find_by_active(&self, active: bool) -> Result<Vec<Product>> {
        let products = self
            .products
            .read()
            .await
            .values()
            .filter(|p| p.active == active)
            .cloned()
            .collect();
        Ok(sorted_by_creation(products, |p: &Product| p.created_at))
    }

    async fn find_all(&self) -> Result<Vec<Product>> {
        let products = self.products.read().await.values().cloned().collect();
        Ok(sorted_by_creation(products, |p: &Product| p.created_at))
    }
}

#[async_trait]
impl OrderRepository for MemoryStore {
    async fn insert(&self, order: &Order) -> Result<()> {
        // A single map write holds the whole aggregate, so the insert is
        // all-or-nothing just like the SQL transaction in PostgresStore.
        self.orders.write().await.insert(order.id, order.clone());
        Ok(())
    }

    async fn update(&self, order: &Order) -> Result<()> {
        self.orders.write().await.insert(order.id, order.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>> {
        Ok(self.orders.read().await.get(&id).cloned())
    }

    async fn find_by_customer(&self, customer_id: CustomerId) -> Result<Vec<Order>> {
        let orders = self
            .orders
            .read()
            .await
            .values()
            .filter(|o| o.customer_id == customer_id)
            .cloned()
            .collect();
        Ok(sorted_by_creation(orders, |o: &Order| o.created_at))
    }

    async fn find_by_status(&self, status: OrderStatus) -> Result<Vec<Order>> {
        let orders = self
            .orders
            .read()
            .await
            .values()
            .filter(|o| o.status == status)
            .cloned()
            .collect();
        Ok(sorted_by_creation(orders, |o: &Order| o.created_at))
    }

    async fn find_all(&self) -> Result<Vec<Order>> {
        let orders = self.orders.read().await.values().cloned().collect();
        Ok(sorted_by_creation(orders, |o: &Order| o.created_at))
    }
}
