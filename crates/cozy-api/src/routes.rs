//! # Routes
//!
//! Axum router configuration for the payment relay.

use crate::handlers;
use crate::state::AppState;
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};
use tracing::warn;

/// Sent on every response, not only on preflight.
const ALLOWED_METHODS: &str = "GET, POST, PUT, DELETE";
const ALLOWED_HEADERS: &str = "Content-Type";

/// Create the main application router
///
/// Routes:
///   - GET  / - Liveness text
///   - GET  /health - Health check
///   - GET  /cozy-threads/customers - List customers
///   - GET  /cozy-threads/products - List products (default price expanded)
///   - POST /cozy-threads/create-payment-intent - Create payment intent
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.allowed_origins);

    let relay_routes = Router::new()
        .route("/customers", get(handlers::list_customers))
        .route("/products", get(handlers::list_products))
        .route("/create-payment-intent", post(handlers::create_payment_intent));

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .nest("/cozy-threads", relay_routes)
        // Middleware
        .layer(cors)
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS),
        ))
        .layer(TraceLayer::new_for_http())
        // State
        .with_state(state)
}

/// CORS for the storefront: listed origins are reflected, anything else gets no
/// `Access-Control-Allow-Origin` header.
///
/// The methods and headers set here answer preflight requests; `create_router`
/// also stamps them onto every other response.
pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}
