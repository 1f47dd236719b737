//! # Relay Error Types
//!
//! Typed error handling for the payment relay.
//! Every relay operation returns `Result<T, RelayError>`.

use thiserror::Error;

/// Message returned when a server-priced intent is requested without products.
pub const NO_PRODUCTS_MESSAGE: &str = "No products provided";

/// Core error type for all relay operations
#[derive(Debug, Error)]
pub enum RelayError {
    /// No product references supplied for a server-priced intent
    #[error("{}", NO_PRODUCTS_MESSAGE)]
    NoProducts,

    /// Invalid request data
    #[error("{0}")]
    InvalidRequest(String),

    /// Total amount missing, non-positive or out of range
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Catalog product has no default price configured
    #[error("No price set for product {product_id}")]
    MissingPrice { product_id: String },

    /// Price record exists but carries no unit amount
    #[error("Price not set for {price_id}")]
    PriceUnset { price_id: String },

    /// Payment provider API error
    #[error("Provider error [{provider}]: {message}")]
    ExternalApi {
        provider: String,
        message: String,
        status: Option<u16>,
    },

    /// Network/HTTP error communicating with provider
    #[error("Network error: {0}")]
    Network(String),

    /// Provider response could not be decoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration errors (missing keys, invalid values)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RelayError {
    /// Returns true for errors caused by the caller's input.
    ///
    /// Validation errors are answered directly with a 400; everything else
    /// goes through the generic failure path.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            RelayError::NoProducts | RelayError::InvalidRequest(_) | RelayError::InvalidAmount(_)
        )
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            RelayError::NoProducts => 400,
            RelayError::InvalidRequest(_) => 400,
            RelayError::InvalidAmount(_) => 400,
            RelayError::MissingPrice { .. } => 422,
            RelayError::PriceUnset { .. } => 422,
            RelayError::ExternalApi { .. } => 502,
            RelayError::Network(_) => 503,
            RelayError::Serialization(_) => 500,
            RelayError::Configuration(_) => 500,
            RelayError::Internal(_) => 500,
        }
    }
}

/// Result type alias for relay operations
pub type RelayResult<T> = Result<T, RelayError>;
