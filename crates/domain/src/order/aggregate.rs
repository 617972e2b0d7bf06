//! Order aggregate: an order and the lines it owns.

use chrono::{DateTime, Utc};
use common::{CustomerId, OrderId, OrderLineId, ProductId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::state::OrderStatus;
use crate::error::DomainError;
use crate::money::Money;

/// Externally visible order number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderNumber(String);

impl OrderNumber {
    /// Generates a fresh order number: `ORD-` followed by the first eight
    /// hex characters of a random UUID, uppercased.
    ///
    /// Collision probability is treated as negligible and not checked.
    pub fn generate() -> Self {
        let token = Uuid::new_v4().simple().to_string();
        Self(format!("ORD-{}", token[..8].to_uppercase()))
    }

    /// Returns the order number as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for OrderNumber {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single line item within an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub id: OrderLineId,

    /// The product this line refers to. The order references the product;
    /// it does not own it.
    pub product_id: ProductId,

    /// Quantity ordered.
    pub quantity: u32,

    /// Price per unit captured at placement time. Later catalog price
    /// changes never affect it.
    pub unit_price: Money,
}

impl OrderLine {
    /// Creates a new order line.
    pub fn new(product_id: ProductId, quantity: u32, unit_price: Money) -> Self {
        Self {
            id: OrderLineId::new(),
            product_id,
            quantity,
            unit_price,
        }
    }

    /// Returns quantity × unit price.
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }
}

/// Order aggregate root.
///
/// The order exclusively owns its lines: they are persisted and loaded with
/// it, and deleting the order deletes them. New orders come only from
/// [`Order::place`]; status afterwards moves through [`Order::cancel`] and
/// [`Order::set_status`]. Orders are never physically deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub number: OrderNumber,
    pub date_received: DateTime<Utc>,
    pub prepaid: bool,

    /// Denormalized sum of the line totals, fixed at placement.
    pub total_price: Money,
    pub status: OrderStatus,
    pub customer_id: CustomerId,
    pub lines: Vec<OrderLine>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Creates a new pending order owning the given lines.
    ///
    /// The total price is computed here as the sum of the line totals and is
    /// never recomputed afterwards. An empty line list yields a zero-total
    /// order.
    pub fn place(customer_id: CustomerId, prepaid: bool, lines: Vec<OrderLine>) -> Self {
        let now = Utc::now();
        let total_price = lines.iter().map(OrderLine::line_total).sum();

        Self {
            id: OrderId::new(),
            number: OrderNumber::generate(),
            date_received: now,
            prepaid,
            total_price,
            status: OrderStatus::Pending,
            customer_id,
            lines,
            created_at: now,
            updated_at: now,
        }
    }

    /// Cancels the order.
    ///
    /// Fails if the order is already cancelled or has been delivered; the
    /// status is left unchanged in that case.
    pub fn cancel(&mut self) -> Result<(), DomainError> {
        if !self.status.can_cancel() {
            return Err(DomainError::InvalidTransition {
                status: self.status,
                action: "cancel",
            });
        }

        self.status = OrderStatus::Cancelled;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Overwrites the status with any value, without a legality check.
    ///
    /// Cancellation is the only guarded transition.
    pub fn set_status(&mut self, status: OrderStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    /// Returns the number of lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Returns true if the order is in a terminal status.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_line_order() -> Order {
        let lines = vec![
            OrderLine::new(ProductId::new(), 3, Money::from_cents(1000)),
            OrderLine::new(ProductId::new(), 2, Money::from_cents(500)),
        ];
        Order::place(CustomerId::new(), false, lines)
    }

    #[test]
    fn test_place_computes_total_from_lines() {
        let order = two_line_order();
        assert_eq!(order.total_price.cents(), 4000);
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.line_count(), 2);
    }

    #[test]
    fn test_place_with_no_lines_yields_zero_total() {
        let order = Order::place(CustomerId::new(), true, vec![]);
        assert!(order.total_price.is_zero());
        assert_eq!(order.line_count(), 0);
        assert!(order.prepaid);
    }

    #[test]
    fn test_order_number_format() {
        let number = OrderNumber::generate();
        let s = number.as_str();
        assert!(s.starts_with("ORD-"));
        assert_eq!(s.len(), 12);
        assert!(s[4..].chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_order_numbers_are_unique() {
        assert_ne!(OrderNumber::generate(), OrderNumber::generate());
    }

    #[test]
    fn test_line_total() {
        let line = OrderLine::new(ProductId::new(), 4, Money::from_cents(250));
        assert_eq!(line.line_total().cents(), 1000);
    }

    #[test]
    fn test_cancel_pending_order() {
        let mut order = two_line_order();
        order.cancel().unwrap();
        assert_eq!(order.status, OrderStatus::Cancelled);
        assert!(order.is_terminal());
    }

    #[test]
    fn test_cancel_cancelled_order_fails() {
        let mut order = two_line_order();
        order.cancel().unwrap();

        let result = order.cancel();
        assert!(matches!(
            result,
            Err(DomainError::InvalidTransition { action: "cancel", .. })
        ));
        assert_eq!(order.status, OrderStatus::Cancelled);
    }

    #[test]
    fn test_cancel_delivered_order_fails() {
        let mut order = two_line_order();
        order.set_status(OrderStatus::Delivered);

        let result = order.cancel();
        assert!(matches!(result, Err(DomainError::InvalidTransition { .. })));
        assert_eq!(order.status, OrderStatus::Delivered);
    }

    #[test]
    fn test_set_status_is_unguarded() {
        let mut order = two_line_order();

        // Forward, backward, and out of terminal states are all accepted.
        order.set_status(OrderStatus::Delivered);
        assert_eq!(order.status, OrderStatus::Delivered);

        order.set_status(OrderStatus::Pending);
        assert_eq!(order.status, OrderStatus::Pending);

        order.set_status(OrderStatus::Cancelled);
        order.set_status(OrderStatus::Shipped);
        assert_eq!(order.status, OrderStatus::Shipped);
    }

    #[test]
    fn test_unit_price_is_a_snapshot() {
        let order = two_line_order();
        let before: Vec<i64> = order.lines.iter().map(|l| l.unit_price.cents()).collect();

        // The aggregate holds copies; there is no live link to the catalog.
        assert_eq!(before, vec![1000, 500]);
    }

    #[test]
    fn test_serialization_roundtrip() {
        let order = two_line_order();
        let json = serde_json::to_string(&order).unwrap();
        let deserialized: Order = serde_json::from_str(&json).unwrap();
        assert_eq!(order, deserialized);
    }
}
