//! Application context - dependency injection container
//!
//! All adapters and services are constructed exactly once per process and
//! shared via `Arc`; no module-level singletons. The UI layer consumes the
//! two facades (`catalog`, `checkout`) and nothing below them.

use std::sync::Arc;

use storebridge_core::{CatalogService, CheckoutService};
use storebridge_domain::Result;
use storebridge_infra::{AuthGateway, CredentialResolver, OmfClient, OmsaClient, OppsClient, S4Client};

/// Application context - holds all services and dependencies
pub struct AppContext {
    pub catalog: Arc<CatalogService>,
    pub checkout: Arc<CheckoutService>,

    /// Kept for startup warm-up and operational refresh triggers
    pub pricing: Arc<OppsClient>,
}

impl AppContext {
    /// Build the full service graph from the process environment.
    pub fn from_env() -> Result<Self> {
        let resolver = Arc::new(CredentialResolver::new());
        Self::with_resolver(resolver)
    }

    /// Build the service graph with an explicit credential resolver
    /// (integration tests inject fixed credentials here).
    pub fn with_resolver(resolver: Arc<CredentialResolver>) -> Result<Self> {
        let gateway = Arc::new(AuthGateway::new(resolver.clone())?);

        let pricing = Arc::new(OppsClient::new(gateway.clone(), resolver.clone())?);
        let omsa = Arc::new(OmsaClient::new(gateway.clone(), resolver.clone())?);
        let omf = Arc::new(OmfClient::new(gateway, resolver)?);
        let products = Arc::new(S4Client::from_env()?);

        let catalog =
            Arc::new(CatalogService::new(products, pricing.clone(), omsa.clone()));
        let checkout = Arc::new(CheckoutService::new(omsa, omf));

        Ok(Self { catalog, checkout, pricing })
    }

    /// Startup warm-up: populate the price cache. Failures are logged inside
    /// the adapter and never abort startup.
    pub async fn warm_up(&self) {
        self.pricing.warm_up().await;
    }
}
