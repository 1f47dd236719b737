//! # Intent Builder
//!
//! Turns a create-payment-intent request into a provider payment intent.
//!
//! The total is either computed from catalog prices (`ServerComputed`) or
//! taken from the caller as-is (`ClientSupplied`). The latter trusts the
//! client with the charged amount and only exists for older storefronts.

use crate::catalog::CatalogReader;
use crate::error::{RelayError, RelayResult};
use crate::gateway::BoxedPaymentGateway;
use crate::money::{sum_minor_units, Currency};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{info, instrument};

/// How the charged total is determined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingPolicy {
    /// Sum of the catalog default prices of the requested products
    #[default]
    ServerComputed,
    /// Total supplied by the caller, unverified
    ClientSupplied,
}

impl PricingPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            PricingPolicy::ServerComputed => "server",
            PricingPolicy::ClientSupplied => "client",
        }
    }
}

impl FromStr for PricingPolicy {
    type Err = RelayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "server" | "server_computed" | "server-computed" => Ok(PricingPolicy::ServerComputed),
            "client" | "client_supplied" | "client-supplied" => Ok(PricingPolicy::ClientSupplied),
            other => Err(RelayError::Configuration(format!(
                "unknown pricing policy '{}' (expected 'server' or 'client')",
                other
            ))),
        }
    }
}

impl std::fmt::Display for PricingPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller input for intent creation
#[derive(Debug, Clone, Default)]
pub struct IntentInput {
    /// Product references (server-computed pricing)
    pub products: Option<Vec<String>>,
    /// Pre-computed total in minor units (client-supplied pricing)
    pub total: Option<i64>,
}

impl IntentInput {
    pub fn for_products<I, S>(products: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            products: Some(products.into_iter().map(Into::into).collect()),
            total: None,
        }
    }

    pub fn for_total(total: i64) -> Self {
        Self {
            products: None,
            total: Some(total),
        }
    }
}

/// Creation request sent to the provider. Built once per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentIntentRequest {
    amount: i64,
    currency: Currency,
}

impl PaymentIntentRequest {
    /// Intents are always charged in USD
    pub fn usd(amount: i64) -> Self {
        Self {
            amount,
            currency: Currency::USD,
        }
    }

    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }
}

/// What the storefront gets back
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentIntentResult {
    /// Opaque secret the client uses to confirm the payment
    pub client_secret: String,
    /// Display amount (minor units / 100)
    pub amount: f64,
}

/// Computes the total and creates the payment intent.
#[derive(Clone)]
pub struct IntentBuilder {
    catalog: CatalogReader,
    gateway: BoxedPaymentGateway,
    policy: PricingPolicy,
}

impl IntentBuilder {
    pub fn new(gateway: BoxedPaymentGateway, policy: PricingPolicy) -> Self {
        Self {
            catalog: CatalogReader::new(gateway.clone()),
            gateway,
            policy,
        }
    }

    pub fn policy(&self) -> PricingPolicy {
        self.policy
    }

    /// Resolve the total and create a fresh payment intent for it.
    ///
    /// Validation failures return before any provider call is made.
    #[instrument(skip(self, input), fields(policy = %self.policy))]
    pub async fn create(&self, input: IntentInput) -> RelayResult<PaymentIntentResult> {
        let total = self.total_for(input).await?;
        let request = PaymentIntentRequest::usd(total);

        let intent = self.gateway.create_payment_intent(&request).await?;

        let client_secret = intent.client_secret.ok_or_else(|| RelayError::ExternalApi {
            provider: self.gateway.provider_name().to_string(),
            message: format!("payment intent {} has no client_secret", intent.id),
            status: None,
        })?;

        info!(
            "Created payment intent: id={}, amount={} {}",
            intent.id,
            request.amount(),
            request.currency()
        );

        Ok(PaymentIntentResult {
            client_secret,
            amount: request.currency().from_smallest_unit(request.amount()),
        })
    }

    /// Total in minor units according to the pricing policy
    pub async fn total_for(&self, input: IntentInput) -> RelayResult<i64> {
        match self.policy {
            PricingPolicy::ServerComputed => {
                let product_ids = input.products.unwrap_or_default();
                if product_ids.is_empty() {
                    return Err(RelayError::NoProducts);
                }

                let prices = self.catalog.resolve_all(&product_ids).await?;
                sum_minor_units(prices.iter().map(|p| p.amount))
            }
            PricingPolicy::ClientSupplied => {
                let total = input
                    .total
                    .ok_or_else(|| RelayError::InvalidRequest("No total provided".to_string()))?;

                if total <= 0 {
                    return Err(RelayError::InvalidAmount(format!(
                        "total must be positive, got {}",
                        total
                    )));
                }

                Ok(total)
            }
        }
    }
}
