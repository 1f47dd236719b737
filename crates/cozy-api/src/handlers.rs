//! # Request Handlers
//!
//! Axum request handlers for the payment relay.
//! Validation errors answer 400 directly; everything else goes through
//! `error_response`, the single generic failure path.

use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use cozy_core::{IntentInput, PaymentIntentResult, RelayError};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Create payment intent request.
///
/// Which field is read depends on the configured pricing policy.
#[derive(Debug, Default, Deserialize)]
pub struct CreatePaymentIntentRequest {
    /// Product IDs to charge for (server-computed pricing)
    #[serde(default)]
    pub products: Option<Vec<String>>,
    /// Total in minor units (client-supplied pricing)
    #[serde(default)]
    pub total: Option<i64>,
}

impl From<CreatePaymentIntentRequest> for IntentInput {
    fn from(request: CreatePaymentIntentRequest) -> Self {
        IntentInput {
            products: request.products,
            total: request.total,
        }
    }
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Map a relay error to its HTTP response, logging anything that is not the caller's fault.
pub fn error_response(err: RelayError) -> ApiError {
    if err.is_validation() {
        warn!("Rejected request: {}", err);
    } else {
        error!("Request failed: {}", err);
    }

    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorResponse::new(err.to_string())))
}

fn rejection_response(rejection: JsonRejection) -> ApiError {
    warn!("Rejected request body: {}", rejection);
    (rejection.status(), Json(ErrorResponse::new(rejection.body_text())))
}

// =============================================================================
// Handlers
// =============================================================================

/// Liveness probe
pub async fn root() -> &'static str {
    "Cozy Threads payment relay is running"
}

/// Health check endpoint
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "cozy-threads",
        "version": env!("CARGO_PKG_VERSION"),
        "provider": state.gateway.provider_name(),
        "pricing_policy": state.config.pricing_policy,
    }))
}

/// List customers as the payment API returns them
#[instrument(skip(state))]
pub async fn list_customers(
    State(state): State<AppState>,
) -> Result<Json<Vec<serde_json::Value>>, ApiError> {
    let customers = state.gateway.list_customers().await.map_err(error_response)?;
    Ok(Json(customers))
}

/// List products with their default price expanded
#[instrument(skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<serde_json::Value>>, ApiError> {
    let products = state.gateway.list_products().await.map_err(error_response)?;
    Ok(Json(products))
}

/// Create a payment intent
#[instrument(skip(state, payload))]
pub async fn create_payment_intent(
    State(state): State<AppState>,
    payload: Result<Json<CreatePaymentIntentRequest>, JsonRejection>,
) -> Result<Json<PaymentIntentResult>, ApiError> {
    let Json(request) = payload.map_err(rejection_response)?;

    info!(
        "Creating payment intent: products={}, policy={}",
        request.products.as_ref().map_or(0, Vec::len),
        state.intents.policy()
    );

    let result = state
        .intents
        .create(request.into())
        .await
        .map_err(error_response)?;

    Ok(Json(result))
}
