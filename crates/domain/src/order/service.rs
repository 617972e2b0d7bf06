//! Order transaction engine.

use std::sync::Arc;

use common::{CustomerId, OrderId, ProductId};

use super::aggregate::{Order, OrderLine};
use super::state::OrderStatus;
use crate::error::{DomainError, Result};
use crate::repository::{CustomerRepository, OrderRepository, ProductRepository};

/// Command to place a new order.
#[derive(Debug, Clone)]
pub struct PlaceOrder {
    pub customer_id: CustomerId,
    pub prepaid: bool,
    pub lines: Vec<LineRequest>,
}

impl PlaceOrder {
    /// Creates a new place-order command.
    pub fn new(customer_id: CustomerId, prepaid: bool, lines: Vec<LineRequest>) -> Self {
        Self {
            customer_id,
            prepaid,
            lines,
        }
    }
}

/// One requested line: a product and how many of it.
#[derive(Debug, Clone)]
pub struct LineRequest {
    pub product_id: ProductId,
    pub quantity: u32,
}

impl LineRequest {
    /// Creates a new line request.
    pub fn new(product_id: ProductId, quantity: u32) -> Self {
        Self {
            product_id,
            quantity,
        }
    }
}

/// Service for placing orders and governing their lifecycle.
///
/// Holds the three store ports it reads and writes; each operation runs as
/// one unit of work against them, with aggregate atomicity provided by
/// [`OrderRepository::insert`].
pub struct OrderService {
    orders: Arc<dyn OrderRepository>,
    customers: Arc<dyn CustomerRepository>,
    products: Arc<dyn ProductRepository>,
}

impl OrderService {
    /// Creates a new order service over the given repositories.
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        customers: Arc<dyn CustomerRepository>,
        products: Arc<dyn ProductRepository>,
    ) -> Self {
        Self {
            orders,
            customers,
            products,
        }
    }

    /// Places a new order.
    ///
    /// Resolves the customer and every requested product, validates stock
    /// sufficiency, snapshots unit prices, and persists the aggregate with
    /// status `Pending`. All validation precedes the single write, so a
    /// failure persists nothing. An empty line list is allowed and produces
    /// a zero-total order.
    #[tracing::instrument(skip(self, cmd), fields(customer_id = %cmd.customer_id))]
    pub async fn place_order(&self, cmd: PlaceOrder) -> Result<Order> {
        let customer = self
            .customers
            .find_by_id(cmd.customer_id)
            .await?
            .ok_or(DomainError::CustomerNotFound(cmd.customer_id))?;

        let mut lines = Vec::with_capacity(cmd.lines.len());
        for request in &cmd.lines {
            let product = self
                .products
                .find_by_id(request.product_id)
                .await?
                .ok_or(DomainError::ProductNotFound(request.product_id))?;

            if request.quantity == 0 {
                return Err(DomainError::InvalidQuantity {
                    quantity: request.quantity,
                });
            }

            if product.stock_quantity < request.quantity {
                return Err(DomainError::InsufficientStock {
                    product: product.name.clone(),
                    requested: request.quantity,
                    available: product.stock_quantity,
                });
            }

            // Unit price is a snapshot of the catalog price at placement.
            lines.push(OrderLine::new(product.id, request.quantity, product.price));
        }

        // TODO: stock is only validated here; whether placement should also
        // decrement stock_quantity is still an open product decision.
        let order = Order::place(customer.id, cmd.prepaid, lines);
        self.orders.insert(&order).await?;

        metrics::counter!("orders_placed_total").increment(1);
        tracing::info!(
            order_id = %order.id,
            number = %order.number,
            total_cents = order.total_price.cents(),
            "order placed"
        );
        Ok(order)
    }

    /// Cancels an order.
    ///
    /// Fails with `OrderNotFound` if the ID does not resolve and with
    /// `InvalidTransition` if the order is already cancelled or delivered.
    /// Stock is not restored to products.
    #[tracing::instrument(skip(self))]
    pub async fn cancel_order(&self, order_id: OrderId) -> Result<Order> {
        let mut order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or(DomainError::OrderNotFound(order_id))?;

        order.cancel()?;
        self.orders.update(&order).await?;

        metrics::counter!("orders_cancelled_total").increment(1);
        tracing::info!(order_id = %order.id, "order cancelled");
        Ok(order)
    }

    /// Overwrites an order's status.
    ///
    /// Accepts any status value; only cancellation goes through the guarded
    /// path. Fails with `OrderNotFound` if the ID does not resolve.
    #[tracing::instrument(skip(self))]
    pub async fn change_status(&self, order_id: OrderId, new_status: OrderStatus) -> Result<Order> {
        let mut order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or(DomainError::OrderNotFound(order_id))?;

        order.set_status(new_status);
        self.orders.update(&order).await?;

        tracing::info!(order_id = %order.id, status = %new_status, "order status changed");
        Ok(order)
    }

    /// Loads an order by ID.
    #[tracing::instrument(skip(self))]
    pub async fn get_order(&self, order_id: OrderId) -> Result<Order> {
        self.orders
            .find_by_id(order_id)
            .await?
            .ok_or(DomainError::OrderNotFound(order_id))
    }

    /// Lists all orders placed by a customer; empty if there are none.
    pub async fn orders_for_customer(&self, customer_id: CustomerId) -> Result<Vec<Order>> {
        self.orders.find_by_customer(customer_id).await
    }

    /// Lists all orders.
    pub async fn all_orders(&self) -> Result<Vec<Order>> {
        self.orders.find_all().await
    }

    /// Lists all orders currently in the given status.
    pub async fn orders_with_status(&self, status: OrderStatus) -> Result<Vec<Order>> {
        self.orders.find_by_status(status).await
    }
}
