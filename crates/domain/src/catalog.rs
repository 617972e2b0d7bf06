//! Product catalog operations.

use std::sync::Arc;

use common::ProductId;

use crate::error::{DomainError, Result};
use crate::money::Money;
use crate::product::{Product, ProductPatch};
use crate::repository::ProductRepository;

/// Command to add a product to the catalog.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub sku: String,
    pub name: String,
    pub description: String,
    pub price: Money,
    pub stock_quantity: u32,
    pub category: String,
}

/// Service for managing the product catalog.
pub struct CatalogService {
    products: Arc<dyn ProductRepository>,
}

impl CatalogService {
    /// Creates a new catalog service backed by the given repository.
    pub fn new(products: Arc<dyn ProductRepository>) -> Self {
        Self { products }
    }

    /// Adds a new product; the SKU must not already be in use.
    #[tracing::instrument(skip(self, cmd), fields(sku = %cmd.sku))]
    pub async fn create_product(&self, cmd: NewProduct) -> Result<Product> {
        if self.products.find_by_sku(&cmd.sku).await?.is_some() {
            return Err(DomainError::DuplicateSku { sku: cmd.sku });
        }

        let product = Product::new(
            cmd.sku,
            cmd.name,
            cmd.description,
            cmd.price,
            cmd.stock_quantity,
            cmd.category,
        );
        self.products.insert(&product).await?;

        tracing::info!(product_id = %product.id, "product created");
        Ok(product)
    }

    /// Applies a partial update to a product.
    #[tracing::instrument(skip(self, patch))]
    pub async fn update_product(&self, id: ProductId, patch: ProductPatch) -> Result<Product> {
        let mut product = self
            .products
            .find_by_id(id)
            .await?
            .ok_or(DomainError::ProductNotFound(id))?;

        product.apply(patch);
        self.products.update(&product).await?;
        Ok(product)
    }

    /// Loads a product by ID.
    #[tracing::instrument(skip(self))]
    pub async fn get_product(&self, id: ProductId) -> Result<Product> {
        self.products
            .find_by_id(id)
            .await?
            .ok_or(DomainError::ProductNotFound(id))
    }

    /// Lists all products.
    pub async fn all_products(&self) -> Result<Vec<Product>> {
        self.products.find_all().await
    }

    /// Lists products in a category.
    pub async fn products_in_category(&self, category: &str) -> Result<Vec<Product>> {
        self.products.find_by_category(category).await
    }

    /// Lists products filtered by the active flag.
    pub async fn products_by_active(&self, active: bool) -> Result<Vec<Product>> {
        self.products.find_by_active(active).await
    }

    /// Soft-deletes a product by clearing its active flag.
    ///
    /// The product row is kept; existing orders keep referencing it.
    #[tracing::instrument(skip(self))]
    pub async fn deactivate_product(&self, id: ProductId) -> Result<()> {
        let mut product = self
            .products
            .find_by_id(id)
            .await?
            .ok_or(DomainError::ProductNotFound(id))?;

        product.apply(ProductPatch {
            active: Some(false),
            ..Default::default()
        });
        self.products.update(&product).await
    }
}
