//! In-memory gateway for unit tests.

use crate::error::{RelayError, RelayResult};
use crate::gateway::{CatalogPrice, CatalogProduct, CreatedIntent, Expandable, PaymentGateway};
use crate::intent::PaymentIntentRequest;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Default)]
pub struct FakeGateway {
    products: HashMap<String, CatalogProduct>,
    prices: HashMap<String, CatalogPrice>,
    stalled: HashSet<String>,
    omit_client_secret: bool,
    product_lookups: AtomicUsize,
    price_lookups: AtomicUsize,
    created: Mutex<Vec<i64>>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_product(mut self, id: &str, default_price: Option<&str>) -> Self {
        self.products.insert(
            id.to_string(),
            CatalogProduct {
                id: id.to_string(),
                name: None,
                default_price: default_price.map(|p| Expandable::Id(p.to_string())),
            },
        );
        self
    }

    pub fn with_expanded_product(mut self, id: &str, price_id: &str, unit_amount: i64) -> Self {
        let price = CatalogPrice {
            id: price_id.to_string(),
            unit_amount: Some(unit_amount),
            currency: Some("usd".to_string()),
        };
        self.products.insert(
            id.to_string(),
            CatalogProduct {
                id: id.to_string(),
                name: None,
                default_price: Some(Expandable::Object(Box::new(price))),
            },
        );
        self
    }

    pub fn with_price(mut self, id: &str, unit_amount: Option<i64>) -> Self {
        self.prices.insert(
            id.to_string(),
            CatalogPrice {
                id: id.to_string(),
                unit_amount,
                currency: Some("usd".to_string()),
            },
        );
        self
    }

    /// Lookups of this product never complete
    pub fn with_stalled_product(mut self, id: &str) -> Self {
        self.stalled.insert(id.to_string());
        self
    }

    pub fn without_client_secret(mut self) -> Self {
        self.omit_client_secret = true;
        self
    }

    pub fn product_lookups(&self) -> usize {
        self.product_lookups.load(Ordering::SeqCst)
    }

    pub fn price_lookups(&self) -> usize {
        self.price_lookups.load(Ordering::SeqCst)
    }

    pub fn intents_created(&self) -> usize {
        self.created.lock().unwrap().len()
    }

    pub fn created_amounts(&self) -> Vec<i64> {
        self.created.lock().unwrap().clone()
    }

    fn not_found(kind: &str, id: &str) -> RelayError {
        RelayError::ExternalApi {
            provider: "fake".to_string(),
            message: format!("No such {}: '{}'", kind, id),
            status: Some(404),
        }
    }
}

#[async_trait]
impl PaymentGateway for FakeGateway {
    async fn list_customers(&self) -> RelayResult<Vec<serde_json::Value>> {
        Ok(Vec::new())
    }

    async fn list_products(&self) -> RelayResult<Vec<serde_json::Value>> {
        self.products
            .values()
            .map(|p| serde_json::to_value(p).map_err(|e| RelayError::Serialization(e.to_string())))
            .collect()
    }

    async fn retrieve_product(&self, product_id: &str) -> RelayResult<CatalogProduct> {
        self.product_lookups.fetch_add(1, Ordering::SeqCst);

        if self.stalled.contains(product_id) {
            return futures::future::pending().await;
        }

        self.products
            .get(product_id)
            .cloned()
            .ok_or_else(|| Self::not_found("product", product_id))
    }

    async fn retrieve_price(&self, price_id: &str) -> RelayResult<CatalogPrice> {
        self.price_lookups.fetch_add(1, Ordering::SeqCst);

        self.prices
            .get(price_id)
            .cloned()
            .ok_or_else(|| Self::not_found("price", price_id))
    }

    async fn create_payment_intent(
        &self,
        request: &PaymentIntentRequest,
    ) -> RelayResult<CreatedIntent> {
        let mut created = self.created.lock().unwrap();
        created.push(request.amount());
        let id = format!("pi_fake_{}", created.len());

        Ok(CreatedIntent {
            client_secret: (!self.omit_client_secret).then(|| format!("{}_secret_test", id)),
            id,
            amount: request.amount(),
            currency: request.currency().as_str().to_string(),
        })
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }
}
