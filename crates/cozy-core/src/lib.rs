//! # cozy-core
//!
//! Core types and logic for the Cozy Threads payment relay.
//!
//! This crate provides:
//! - `PaymentGateway` trait, the seam to the external payment API
//! - `CatalogReader` for resolving products to default prices
//! - `IntentBuilder` and `PricingPolicy` for payment intent creation
//! - `RelayError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use cozy_core::{IntentBuilder, IntentInput, PricingPolicy};
//!
//! let builder = IntentBuilder::new(gateway, PricingPolicy::ServerComputed);
//!
//! let result = builder
//!     .create(IntentInput::for_products(["prod_scarf", "prod_socks"]))
//!     .await?;
//!
//! // Hand result.client_secret to the storefront
//! ```

pub mod catalog;
pub mod error;
pub mod gateway;
pub mod intent;
pub mod money;

#[cfg(test)]
pub(crate) mod testing;

// Re-exports for convenience
pub use catalog::{CatalogReader, ResolvedPrice};
pub use error::{RelayError, RelayResult, NO_PRODUCTS_MESSAGE};
pub use gateway::{
    BoxedPaymentGateway, CatalogPrice, CatalogProduct, CreatedIntent, Expandable, PaymentGateway,
};
pub use intent::{
    IntentBuilder, IntentInput, PaymentIntentRequest, PaymentIntentResult, PricingPolicy,
};
pub use money::{sum_minor_units, Currency};
