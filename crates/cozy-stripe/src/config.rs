//! # Stripe Configuration
//!
//! Configuration management for the Stripe gateway.
//! The secret key comes from the environment (or a local `.env` file).

use cozy_core::RelayError;
use std::env;
use std::time::Duration;

const DEFAULT_API_BASE_URL: &str = "https://api.stripe.com";
const DEFAULT_API_VERSION: &str = "2024-12-18.acacia";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

const KEY_PREFIXES: &[&str] = &["sk_test_", "sk_live_", "rk_test_", "rk_live_"];

/// Stripe API configuration
#[derive(Clone)]
pub struct StripeConfig {
    /// Secret or restricted API key (sk_... / rk_...)
    pub secret_key: String,

    /// API base URL (for testing/mocking)
    pub api_base_url: String,

    /// Pinned API version
    pub api_version: String,

    /// Per-request timeout for outbound calls
    pub timeout: Duration,
}

impl StripeConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `STRIPE_SECRET_KEY`
    ///
    /// Optional:
    /// - `STRIPE_API_BASE_URL`
    /// - `STRIPE_TIMEOUT_SECS` (default 30)
    pub fn from_env() -> Result<Self, RelayError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let secret_key = env::var("STRIPE_SECRET_KEY")
            .map_err(|_| RelayError::Configuration("STRIPE_SECRET_KEY not set".to_string()))?;

        validate_secret_key(&secret_key)?;

        let mut config = Self::new(secret_key);
        if let Ok(url) = env::var("STRIPE_API_BASE_URL") {
            config = config.with_api_base_url(url);
        }
        if let Ok(raw) = env::var("STRIPE_TIMEOUT_SECS") {
            config = config.with_timeout(parse_timeout(&raw)?);
        }

        Ok(config)
    }

    /// Create config with an explicit key (for testing)
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Check if using test keys
    pub fn is_test_mode(&self) -> bool {
        self.secret_key.starts_with("sk_test_") || self.secret_key.starts_with("rk_test_")
    }

    /// Get authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.secret_key)
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Builder: set the outbound request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// Keeps the secret key out of logs.
impl std::fmt::Debug for StripeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeConfig")
            .field("secret_key", &"<redacted>")
            .field("api_base_url", &self.api_base_url)
            .field("api_version", &self.api_version)
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn validate_secret_key(key: &str) -> Result<(), RelayError> {
    if KEY_PREFIXES.iter().any(|prefix| key.starts_with(prefix)) {
        Ok(())
    } else {
        Err(RelayError::Configuration(
            "STRIPE_SECRET_KEY must start with sk_test_, sk_live_, rk_test_ or rk_live_".to_string(),
        ))
    }
}

fn parse_timeout(raw: &str) -> Result<Duration, RelayError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(RelayError::Configuration(format!(
            "STRIPE_TIMEOUT_SECS must be a positive number of seconds, got '{}'",
            raw
        ))),
    }
}
