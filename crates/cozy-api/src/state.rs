//! # Application State
//!
//! Shared state for the Axum application.
//! Holds the payment gateway, the intent builder and runtime configuration.

use axum::http::HeaderValue;
use cozy_core::{BoxedPaymentGateway, IntentBuilder, PricingPolicy, RelayError, RelayResult};
use cozy_stripe::{StripeConfig, StripeGateway};
use std::sync::Arc;
use tracing::warn;

const DEFAULT_ALLOWED_ORIGINS: &str =
    "http://localhost:5173,https://cozy-threads-app.onrender.com";

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Origins allowed to call the API from a browser
    pub allowed_origins: Vec<String>,
    /// How payment intent totals are determined
    pub pricing_policy: PricingPolicy,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> RelayResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build from a variable lookup; unset keys fall back to defaults
    pub fn from_vars<F>(lookup: F) -> RelayResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| {
                RelayError::Configuration(format!("PORT must be a port number, got '{}'", raw))
            })?,
            None => 3000,
        };

        let pricing_policy = match lookup("PRICING_POLICY") {
            Some(raw) => raw.parse()?,
            None => PricingPolicy::default(),
        };

        let allowed_origins = parse_origins(
            &lookup("CORS_ALLOWED_ORIGINS").unwrap_or_else(|| DEFAULT_ALLOWED_ORIGINS.to_string()),
        )?;

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            allowed_origins,
            pricing_policy,
        })
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> RelayResult<std::net::SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| {
                RelayError::Configuration(format!(
                    "Invalid socket address {}:{}: {}",
                    self.host, self.port, e
                ))
            })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            environment: "development".to_string(),
            allowed_origins: DEFAULT_ALLOWED_ORIGINS
                .split(',')
                .map(String::from)
                .collect(),
            pricing_policy: PricingPolicy::default(),
        }
    }
}

/// Split a comma-separated origin list, rejecting values that cannot be sent as a header.
pub fn parse_origins(raw: &str) -> RelayResult<Vec<String>> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| -> RelayResult<String> {
            let origin = origin.trim_end_matches('/');
            HeaderValue::from_str(origin).map_err(|_| {
                RelayError::Configuration(format!("Invalid CORS origin: {}", origin))
            })?;
            Ok(origin.to_string())
        })
        .collect()
}

/// A live key should only ever run with `ENVIRONMENT=production`.
fn live_key_outside_production(config: &AppConfig, stripe: &StripeConfig) -> bool {
    !stripe.is_test_mode() && !config.is_production()
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Payment API client
    pub gateway: BoxedPaymentGateway,
    /// Intent builder bound to the configured pricing policy
    pub intents: IntentBuilder,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create a new AppState backed by Stripe, with keys from the environment
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let gateway = StripeGateway::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to initialize Stripe: {}", e))?;

        if live_key_outside_production(&config, gateway.config()) {
            warn!(
                "Live Stripe key in use with ENVIRONMENT={}; payments will be real",
                config.environment
            );
        }

        Ok(Self::with_gateway(config, Arc::new(gateway)))
    }

    /// Create state around an existing gateway
    pub fn with_gateway(config: AppConfig, gateway: BoxedPaymentGateway) -> Self {
        let intents = IntentBuilder::new(gateway.clone(), config.pricing_policy);

        Self {
            gateway,
            intents,
            config,
        }
    }
}
