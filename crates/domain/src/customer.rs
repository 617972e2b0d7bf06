//! Customer entity and directory service.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use common::CustomerId;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, Result};
use crate::money::Money;
use crate::repository::CustomerRepository;

/// The kind of account a customer holds.
///
/// A tagged variant over the common customer record; personal and corporate
/// accounts differ only in their payment arrangement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CustomerKind {
    /// Individual account paying by card.
    Personal { credit_card_id: String },

    /// Business account with a named contact and a negotiated credit line.
    Corporate {
        contact_name: String,
        credit_limit: Money,
    },
}

/// A customer of the store.
///
/// Identity is immutable; the remaining attributes may change over time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub address: String,
    pub credit_rating: String,
    pub kind: CustomerKind,
    pub created_at: DateTime<Utc>,
}

impl Customer {
    /// Creates a new customer with a fresh identity.
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        credit_rating: impl Into<String>,
        kind: CustomerKind,
    ) -> Self {
        Self {
            id: CustomerId::new(),
            name: name.into(),
            address: address.into(),
            credit_rating: credit_rating.into(),
            kind,
            created_at: Utc::now(),
        }
    }
}

/// Command to register a new customer.
#[derive(Debug, Clone)]
pub struct RegisterCustomer {
    pub name: String,
    pub address: String,
    pub credit_rating: String,
    pub kind: CustomerKind,
}

/// Service for managing the customer directory.
pub struct CustomerService {
    customers: Arc<dyn CustomerRepository>,
}

impl CustomerService {
    /// Creates a new customer service backed by the given repository.
    pub fn new(customers: Arc<dyn CustomerRepository>) -> Self {
        Self { customers }
    }

    /// Registers a new customer and persists it.
    #[tracing::instrument(skip(self, cmd), fields(name = %cmd.name))]
    pub async fn register_customer(&self, cmd: RegisterCustomer) -> Result<Customer> {
        let customer = Customer::new(cmd.name, cmd.address, cmd.credit_rating, cmd.kind);
        self.customers.insert(&customer).await?;
        tracing::info!(customer_id = %customer.id, "customer registered");
        Ok(customer)
    }

    /// Loads a customer by ID.
    #[tracing::instrument(skip(self))]
    pub async fn get_customer(&self, id: CustomerId) -> Result<Customer> {
        self.customers
            .find_by_id(id)
            .await?
            .ok_or(DomainError::CustomerNotFound(id))
    }

    /// Lists all customers.
    pub async fn all_customers(&self) -> Result<Vec<Customer>> {
        self.customers.find_all().await
    }
}
