//! StoreBridge - in-store order capture orchestration service
//!
//! Main entry point: loads the environment, initializes tracing, builds the
//! application context and warms the price cache, then stays resident for
//! the embedding UI shell.

use storebridge_api::AppContext;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging FIRST so we can see .env loading
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load environment variables from .env file
    match dotenvy::dotenv() {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(err) => warn!(error = %err, "could not load .env file"),
    }

    info!("StoreBridge starting...");

    let context = AppContext::from_env()?;

    // Initial price cache population; failure is logged, not fatal.
    context.warm_up().await;

    info!("StoreBridge initialized successfully");

    // Stay resident until the embedding shell shuts the process down.
    tokio::signal::ctrl_c().await?;
    info!("shutdown signal received, exiting");
    Ok(())
}
