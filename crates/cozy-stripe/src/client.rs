//! # Stripe Gateway
//!
//! `PaymentGateway` implementation over the Stripe REST API.
//! Customers, products and prices are read; payment intents are created.

use crate::config::StripeConfig;
use async_trait::async_trait;
use cozy_core::{
    CatalogPrice, CatalogProduct, CreatedIntent, PaymentGateway, PaymentIntentRequest, RelayError,
    RelayResult,
};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, error, info, instrument};

const PROVIDER: &str = "stripe";

/// Stripe-backed payment gateway.
///
/// Holds one pooled HTTP client; cheap to share behind an `Arc`.
pub struct StripeGateway {
    config: StripeConfig,
    client: Client,
}

impl StripeGateway {
    /// Create a new gateway from explicit configuration
    pub fn new(config: StripeConfig) -> RelayResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                RelayError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> RelayResult<Self> {
        let config = StripeConfig::from_env()?;
        Self::new(config)
    }

    pub fn config(&self) -> &StripeConfig {
        &self.config
    }

    /// Build `{base}/v1/{segments...}`, percent-encoding each segment
    fn endpoint(&self, segments: &[&str]) -> RelayResult<Url> {
        let mut url = Url::parse(&self.config.api_base_url).map_err(|e| {
            RelayError::Configuration(format!(
                "Invalid Stripe API base URL '{}': {}",
                self.config.api_base_url, e
            ))
        })?;

        url.path_segments_mut()
            .map_err(|_| {
                RelayError::Configuration(format!(
                    "Stripe API base URL cannot take a path: {}",
                    self.config.api_base_url
                ))
            })?
            .pop_if_empty()
            .push("v1")
            .extend(segments);

        Ok(url)
    }

    /// Authenticate, send and decode a Stripe request
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> RelayResult<T> {
        let response = request
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
            .send()
            .await
            .map_err(|e| RelayError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RelayError::Network(e.to_string()))?;

        if !status.is_success() {
            error!("Stripe API error: status={}, body={}", status, body);

            let message = serde_json::from_str::<StripeErrorResponse>(&body)
                .ok()
                .and_then(|r| r.error.message)
                .unwrap_or_else(|| format!("HTTP {}: {}", status, body));

            return Err(RelayError::ExternalApi {
                provider: PROVIDER.to_string(),
                message,
                status: Some(status.as_u16()),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            RelayError::Serialization(format!("Failed to parse Stripe response: {}", e))
        })
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    #[instrument(skip(self))]
    async fn list_customers(&self) -> RelayResult<Vec<serde_json::Value>> {
        let url = self.endpoint(&["customers"])?;
        let list: StripeList<serde_json::Value> = self.send(self.client.get(url)).await?;

        debug!("Listed {} customers", list.data.len());
        Ok(list.data)
    }

    #[instrument(skip(self))]
    async fn list_products(&self) -> RelayResult<Vec<serde_json::Value>> {
        let url = self.endpoint(&["products"])?;
        let request = self
            .client
            .get(url)
            .query(&[("expand[]", "data.default_price")]);
        let list: StripeList<serde_json::Value> = self.send(request).await?;

        debug!("Listed {} products", list.data.len());
        Ok(list.data)
    }

    #[instrument(skip(self))]
    async fn retrieve_product(&self, product_id: &str) -> RelayResult<CatalogProduct> {
        let url = self.endpoint(&["products", product_id])?;
        self.send(self.client.get(url)).await
    }

    #[instrument(skip(self))]
    async fn retrieve_price(&self, price_id: &str) -> RelayResult<CatalogPrice> {
        let url = self.endpoint(&["prices", price_id])?;
        self.send(self.client.get(url)).await
    }

    #[instrument(skip(self, request), fields(amount = request.amount()))]
    async fn create_payment_intent(
        &self,
        request: &PaymentIntentRequest,
    ) -> RelayResult<CreatedIntent> {
        let url = self.endpoint(&["payment_intents"])?;

        let form_params = [
            ("amount", request.amount().to_string()),
            ("currency", request.currency().as_str().to_string()),
        ];

        let intent: CreatedIntent = self.send(self.client.post(url).form(&form_params)).await?;

        info!("Created Stripe payment intent: id={}", intent.id);
        Ok(intent)
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

// =============================================================================
// Stripe API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct StripeList<T> {
    data: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeApiError,
}

#[derive(Debug, Deserialize)]
struct StripeApiError {
    #[serde(default)]
    message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use cozy_core::Expandable;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn gateway_for(server: &MockServer) -> StripeGateway {
        let config = StripeConfig::new("sk_test_abc123").with_api_base_url(server.uri());
        StripeGateway::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_list_customers_returns_data_verbatim() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/customers"))
            .and(header("Authorization", "Bearer sk_test_abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "object": "list",
                "has_more": false,
                "data": [
                    {"id": "cus_1", "object": "customer", "email": "ada@example.com"},
                    {"id": "cus_2", "object": "customer", "email": null}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let customers = gateway_for(&server).await.list_customers().await.unwrap();

        assert_eq!(customers.len(), 2);
        assert_eq!(customers[0]["email"], "ada@example.com");
        assert!(customers[1]["email"].is_null());
    }

    #[tokio::test]
    async fn test_list_products_expands_default_price() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/products"))
            .and(query_param("expand[]", "data.default_price"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "object": "list",
                "data": [{
                    "id": "prod_1",
                    "name": "Wool Scarf",
                    "default_price": {"id": "price_1", "unit_amount": 2500, "currency": "usd"}
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let products = gateway_for(&server).await.list_products().await.unwrap();

        assert_eq!(products.len(), 1);
        assert_eq!(products[0]["default_price"]["unit_amount"], 2500);
    }

    #[tokio::test]
    async fn test_retrieve_product_and_price() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/products/prod_1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "prod_1",
                "object": "product",
                "name": "Wool Scarf",
                "default_price": "price_1"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/prices/price_1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "price_1",
                "object": "price",
                "unit_amount": 2500,
                "currency": "usd"
            })))
            .mount(&server)
            .await;

        let gateway = gateway_for(&server).await;
        let product = gateway.retrieve_product("prod_1").await.unwrap();
        assert_eq!(product.default_price, Some(Expandable::Id("price_1".to_string())));

        let price = gateway.retrieve_price("price_1").await.unwrap();
        assert_eq!(price.unit_amount, Some(2500));
    }

    #[tokio::test]
    async fn test_create_payment_intent_posts_form() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/payment_intents"))
            .and(body_string_contains("amount=2500"))
            .and(body_string_contains("currency=usd"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "pi_1",
                "object": "payment_intent",
                "amount": 2500,
                "currency": "usd",
                "client_secret": "pi_1_secret_xyz",
                "status": "requires_payment_method"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let intent = gateway_for(&server)
            .await
            .create_payment_intent(&PaymentIntentRequest::usd(2500))
            .await
            .unwrap();

        assert_eq!(intent.id, "pi_1");
        assert_eq!(intent.client_secret.as_deref(), Some("pi_1_secret_xyz"));
    }

    #[tokio::test]
    async fn test_stripe_error_message_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/products/prod_missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": {
                    "type": "invalid_request_error",
                    "code": "resource_missing",
                    "message": "No such product: 'prod_missing'"
                }
            })))
            .mount(&server)
            .await;

        let err = gateway_for(&server)
            .await
            .retrieve_product("prod_missing")
            .await
            .unwrap_err();

        match err {
            RelayError::ExternalApi {
                provider,
                message,
                status,
            } => {
                assert_eq!(provider, "stripe");
                assert_eq!(message, "No such product: 'prod_missing'");
                assert_eq!(status, Some(404));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_json_error_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/customers"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
            .mount(&server)
            .await;

        let err = gateway_for(&server).await.list_customers().await.unwrap_err();

        assert!(
            matches!(err, RelayError::ExternalApi { ref message, status: Some(500), .. } if message.contains("upstream exploded"))
        );
    }

    #[tokio::test]
    async fn test_malformed_success_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/prices/price_1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = gateway_for(&server)
            .await
            .retrieve_price("price_1")
            .await
            .unwrap_err();

        assert!(matches!(err, RelayError::Serialization(_)));
    }

    #[tokio::test]
    async fn test_product_id_is_path_encoded() {
        let server = MockServer::start().await;
        let gateway = gateway_for(&server).await;

        let url = gateway.endpoint(&["products", "../customers"]).unwrap();

        assert!(url.path().ends_with("/v1/products/..%2Fcustomers"));
    }
}
