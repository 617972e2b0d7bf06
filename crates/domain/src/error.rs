//! Domain error types.

use common::{CustomerId, OrderId, ProductId};
use thiserror::Error;

use crate::order::OrderStatus;

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The referenced customer does not exist.
    #[error("Customer not found: {0}")]
    CustomerNotFound(CustomerId),

    /// The referenced product does not exist.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// The referenced order does not exist.
    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),

    /// A requested quantity exceeds the product's available stock.
    #[error("Insufficient stock for {product}: requested {requested}, available {available}")]
    InsufficientStock {
        product: String,
        requested: u32,
        available: u32,
    },

    /// The order is not in a state that permits the attempted transition.
    #[error("Invalid state transition: cannot {action} from {status} status")]
    InvalidTransition {
        status: OrderStatus,
        action: &'static str,
    },

    /// Invalid line quantity.
    #[error("Invalid quantity: {quantity} (must be greater than 0)")]
    InvalidQuantity { quantity: u32 },

    /// A product with the same SKU already exists.
    #[error("Product with SKU {sku} already exists")]
    DuplicateSku { sku: String },

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for domain operations.
pub type Result<T> = std::result::Result<T, DomainError>;
