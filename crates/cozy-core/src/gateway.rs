//! # Payment Gateway Trait
//!
//! The seam between the relay and the external payment API.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   PaymentGateway (trait)                    │
//! │  ├── list_customers()                                       │
//! │  ├── list_products()                                        │
//! │  ├── retrieve_product() / retrieve_price()                  │
//! │  └── create_payment_intent()                                │
//! └─────────────────────────────────────────────────────────────┘
//!                            ▲
//!                    ┌───────┴───────┐
//!                    │ StripeGateway │
//!                    └───────────────┘
//! ```
//!
//! Handlers never reach a module-level client; they receive a
//! `BoxedPaymentGateway` through application state.

use crate::error::RelayResult;
use crate::intent::PaymentIntentRequest;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A field that holds either an object id or, once expanded, the object itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Expandable<T> {
    Id(String),
    Object(Box<T>),
}

impl<T> Expandable<T> {
    /// The expanded object, if the provider returned one
    pub fn as_object(&self) -> Option<&T> {
        match self {
            Expandable::Id(_) => None,
            Expandable::Object(obj) => Some(obj),
        }
    }
}

impl Expandable<CatalogPrice> {
    /// The price id, whether or not the price was expanded
    pub fn id(&self) -> &str {
        match self {
            Expandable::Id(id) => id,
            Expandable::Object(price) => &price.id,
        }
    }
}

/// Catalog product as seen by the relay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogProduct {
    pub id: String,

    #[serde(default)]
    pub name: Option<String>,

    /// Price used when none is specified explicitly
    #[serde(default)]
    pub default_price: Option<Expandable<CatalogPrice>>,
}

/// Catalog price record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogPrice {
    pub id: String,

    /// Amount in minor units; absent for custom or tiered prices
    #[serde(default)]
    pub unit_amount: Option<i64>,

    #[serde(default)]
    pub currency: Option<String>,
}

/// Payment intent as returned by the provider after creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedIntent {
    pub id: String,

    #[serde(default)]
    pub client_secret: Option<String>,

    pub amount: i64,

    pub currency: String,
}

/// Operations the relay needs from a payment provider.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Customer records, relayed verbatim.
    async fn list_customers(&self) -> RelayResult<Vec<serde_json::Value>>;

    /// Product records with their default price expanded, relayed verbatim.
    async fn list_products(&self) -> RelayResult<Vec<serde_json::Value>>;

    /// Fetch a single catalog product.
    async fn retrieve_product(&self, product_id: &str) -> RelayResult<CatalogProduct>;

    /// Fetch a single price record.
    async fn retrieve_price(&self, price_id: &str) -> RelayResult<CatalogPrice>;

    /// Create a payment intent. Every call creates a new intent.
    async fn create_payment_intent(
        &self,
        request: &PaymentIntentRequest,
    ) -> RelayResult<CreatedIntent>;

    /// Provider name (for logging and error attribution).
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a shared gateway (dynamic dispatch)
pub type BoxedPaymentGateway = Arc<dyn PaymentGateway>;
