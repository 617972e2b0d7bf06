//! Customer directory endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::CustomerId;
use domain::{Customer, CustomerKind, Money, RegisterCustomer};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::orders::AppState;
use crate::error::ApiError;

// -- Request types --

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CustomerKindRequest {
    Personal {
        credit_card_id: String,
    },
    Corporate {
        contact_name: String,
        credit_limit_cents: i64,
    },
}

impl From<CustomerKindRequest> for CustomerKind {
    fn from(kind: CustomerKindRequest) -> Self {
        match kind {
            CustomerKindRequest::Personal { credit_card_id } => {
                CustomerKind::Personal { credit_card_id }
            }
            CustomerKindRequest::Corporate {
                contact_name,
                credit_limit_cents,
            } => CustomerKind::Corporate {
                contact_name,
                credit_limit: Money::from_cents(credit_limit_cents),
            },
        }
    }
}

#[derive(Deserialize)]
pub struct RegisterCustomerRequest {
    pub name: String,
    pub address: String,
    pub credit_rating: String,
    pub kind: CustomerKindRequest,
}

// -- Response types --

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CustomerKindResponse {
    Personal {
        credit_card_id: String,
    },
    Corporate {
        contact_name: String,
        credit_limit_cents: i64,
    },
}

#[derive(Serialize)]
pub struct CustomerResponse {
    pub id: String,
    pub name: String,
    pub address: String,
    pub credit_rating: String,
    pub kind: CustomerKindResponse,
    pub created_at: String,
}

impl From<Customer> for CustomerResponse {
    fn from(customer: Customer) -> Self {
        let kind = match customer.kind {
            CustomerKind::Personal { credit_card_id } => {
                CustomerKindResponse::Personal { credit_card_id }
            }
            CustomerKind::Corporate {
                contact_name,
                credit_limit,
            } => CustomerKindResponse::Corporate {
                contact_name,
                credit_limit_cents: credit_limit.cents(),
            },
        };

        Self {
            id: customer.id.to_string(),
            name: customer.name,
            address: customer.address,
            credit_rating: customer.credit_rating,
            kind,
            created_at: customer.created_at.to_rfc3339(),
        }
    }
}

// -- Handlers --

/// POST /customers — register a new customer.
#[tracing::instrument(skip(state, req))]
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterCustomerRequest>,
) -> Result<(StatusCode, Json<CustomerResponse>), ApiError> {
    let customer = state
        .customers
        .register_customer(RegisterCustomer {
            name: req.name,
            address: req.address,
            credit_rating: req.credit_rating,
            kind: req.kind.into(),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(customer.into())))
}

/// GET /customers/{id} — load one customer.
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<CustomerResponse>, ApiError> {
    let customer = state
        .customers
        .get_customer(CustomerId::from_uuid(id))
        .await?;
    Ok(Json(customer.into()))
}

/// GET /customers — list all customers.
#[tracing::instrument(skip(state))]
pub async fn list(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CustomerResponse>>, ApiError> {
    let customers = state.customers.all_customers().await?;
    Ok(Json(customers.into_iter().map(Into::into).collect()))
}
