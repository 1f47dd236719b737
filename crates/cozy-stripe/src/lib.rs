//! # cozy-stripe
//!
//! Stripe payment gateway for the Cozy Threads payment relay.
//!
//! `StripeGateway` implements `cozy_core::PaymentGateway` over the Stripe
//! REST API using a single pooled `reqwest` client:
//!
//! - `GET  /v1/customers`
//! - `GET  /v1/products?expand[]=data.default_price`
//! - `GET  /v1/products/{id}` and `GET /v1/prices/{id}`
//! - `POST /v1/payment_intents`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cozy_stripe::StripeGateway;
//! use cozy_core::{IntentBuilder, PricingPolicy};
//! use std::sync::Arc;
//!
//! let gateway = Arc::new(StripeGateway::from_env()?);
//! let builder = IntentBuilder::new(gateway, PricingPolicy::ServerComputed);
//! ```

pub mod client;
pub mod config;

// Re-exports
pub use client::StripeGateway;
pub use config::StripeConfig;
