//! # Catalog Reader
//!
//! Resolves product references to their current default price.

use crate::error::{RelayError, RelayResult};
use crate::gateway::{BoxedPaymentGateway, Expandable};
use futures::future::try_join_all;
use serde::Serialize;
use tracing::{debug, instrument};

/// A default price resolved for one product reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedPrice {
    /// Product reference the caller supplied
    pub product_id: String,
    /// Price record the amount came from
    pub price_id: String,
    /// Amount in minor currency units
    pub amount: i64,
}

/// Read-only view of the provider's catalog.
#[derive(Clone)]
pub struct CatalogReader {
    gateway: BoxedPaymentGateway,
}

impl CatalogReader {
    pub fn new(gateway: BoxedPaymentGateway) -> Self {
        Self { gateway }
    }

    /// Resolve a single product to its default price amount.
    ///
    /// Fails with `MissingPrice` when the product has no default price and
    /// with `PriceUnset` when the price carries no unit amount.
    #[instrument(skip(self))]
    pub async fn resolve_price(&self, product_id: &str) -> RelayResult<ResolvedPrice> {
        if product_id.trim().is_empty() {
            return Err(RelayError::InvalidRequest(
                "Product reference must not be empty".to_string(),
            ));
        }

        let product = self.gateway.retrieve_product(product_id).await?;

        let default_price = product.default_price.ok_or_else(|| RelayError::MissingPrice {
            product_id: product_id.to_string(),
        })?;

        let price = match default_price {
            Expandable::Object(price) => *price,
            Expandable::Id(price_id) => self.gateway.retrieve_price(&price_id).await?,
        };

        let amount = price.unit_amount.ok_or_else(|| RelayError::PriceUnset {
            price_id: price.id.clone(),
        })?;

        debug!("Resolved {} -> {} ({})", product_id, price.id, amount);

        Ok(ResolvedPrice {
            product_id: product_id.to_string(),
            price_id: price.id,
            amount,
        })
    }

    /// Resolve every reference concurrently, preserving input order.
    ///
    /// The first failure is returned as soon as it happens; lookups still in
    /// flight are dropped and no partial result is produced.
    #[instrument(skip(self, product_ids), fields(count = product_ids.len()))]
    pub async fn resolve_all(&self, product_ids: &[String]) -> RelayResult<Vec<ResolvedPrice>> {
        if product_ids.is_empty() {
            return Err(RelayError::NoProducts);
        }

        try_join_all(product_ids.iter().map(|id| self.resolve_price(id))).await
    }
}
