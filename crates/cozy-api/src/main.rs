//! # Cozy Threads payment relay
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export STRIPE_SECRET_KEY=sk_test_...
//! export PORT=3000
//!
//! # Run the server
//! cozy-threads
//! ```

use cozy_api::{routes, state::{AppConfig, AppState}};
use cozy_core::PricingPolicy;
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    // Initialize logging: JSON lines in production, human-readable otherwise
    let json = config.is_production();
    tracing_subscriber::registry()
        .with(json.then(|| fmt::layer().json()))
        .with((!json).then(fmt::layer))
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Initialize application state
    let state = AppState::new(config)?;

    let addr = state.config.socket_addr()?;

    info!("Environment: {}", state.config.environment);
    info!("Payment provider: {}", state.gateway.provider_name());
    info!("Pricing policy: {}", state.config.pricing_policy);
    info!("Allowed origins: {:?}", state.config.allowed_origins);

    if state.config.pricing_policy == PricingPolicy::ClientSupplied {
        warn!("Client-supplied totals are charged without checking catalog prices");
    }

    // Create router
    let app = routes::create_router(state);

    // Start server
    info!("[server]: Server is running at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
