//! # cozy-api
//!
//! HTTP API layer for the Cozy Threads payment relay.
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/` | Liveness text |
//! | GET | `/health` | Health check |
//! | GET | `/cozy-threads/customers` | List customers |
//! | GET | `/cozy-threads/products` | List products with default price |
//! | POST | `/cozy-threads/create-payment-intent` | Create payment intent |

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
