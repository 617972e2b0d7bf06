//! Product entity.

use chrono::{DateTime, Utc};
use common::ProductId;
use serde::{Deserialize, Serialize};

use crate::money::Money;

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    /// Business key, unique across the catalog.
    pub sku: String,
    pub name: String,
    pub description: String,
    pub price: Money,
    pub stock_quantity: u32,
    pub category: String,
    /// Soft-delete flag; inactive products stay in the catalog.
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Creates a new active product with a fresh identity.
    pub fn new(
        sku: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        price: Money,
        stock_quantity: u32,
        category: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ProductId::new(),
            sku: sku.into(),
            name: name.into(),
            description: description.into(),
            price,
            stock_quantity,
            category: category.into(),
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies a partial update; absent fields are left untouched.
    pub fn apply(&mut self, patch: ProductPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(stock_quantity) = patch.stock_quantity {
            self.stock_quantity = stock_quantity;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(active) = patch.active {
            self.active = active;
        }
        self.updated_at = Utc::now();
    }
}

/// Field-by-field partial update for a product.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Money>,
    pub stock_quantity: Option<u32>,
    pub category: Option<String>,
    pub active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget() -> Product {
        Product::new(
            "SKU-001",
            "Widget",
            "A basic widget",
            Money::from_cents(1000),
            5,
            "gadgets",
        )
    }

    #[test]
    fn new_product_is_active() {
        let product = widget();
        assert!(product.active);
        assert_eq!(product.stock_quantity, 5);
        assert_eq!(product.price.cents(), 1000);
    }

    #[test]
    fn patch_updates_only_present_fields() {
        let mut product = widget();
        product.apply(ProductPatch {
            price: Some(Money::from_cents(1200)),
            active: Some(false),
            ..Default::default()
        });

        assert_eq!(product.price.cents(), 1200);
        assert!(!product.active);
        assert_eq!(product.name, "Widget");
        assert_eq!(product.stock_quantity, 5);
    }

    #[test]
    fn patch_touches_updated_at() {
        let mut product = widget();
        let before = product.updated_at;
        product.apply(ProductPatch::default());
        assert!(product.updated_at >= before);
    }
}
