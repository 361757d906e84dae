//! OMSA sourcing/availability client
//!
//! Implements `SourcingPort` and `AvailabilityPort`. Both paths degrade
//! gracefully: sourcing failures come back as structured values and
//! availability failures as zero-stock stand-ins, so neither can break cart
//! or product rendering.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use moka::future::Cache;
use reqwest::Method;
use storebridge_core::{AvailabilityPort, SourcingPort};
use storebridge_domain::constants::{
    AVAILABILITY_CACHE_MAX_CAPACITY, AVAILABILITY_CACHE_TTL_SECS, AVAILABILITY_TIMEOUT_SECS,
    DEFAULT_COUNTRY_CODE, DEFAULT_UNIT, SOURCING_CACHE_TTL_SECS, SOURCING_TIMEOUT_SECS,
};
use storebridge_domain::{
    AvailabilityResult, AvailabilitySource, BackendSystem, CartItem, Result, SourcingResult,
    SourcingSource, StoreBridgeError, SystemCredentials,
};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::types::{
    aggregate_availability, AvailabilityRequest, AvailabilityResponse, SourcingRequest,
};
use crate::auth::AuthGateway;
use crate::config::CredentialResolver;
use crate::http::HttpClient;

/// OMSA cache configuration
///
/// Override via `OMSA_SOURCING_CACHE_TTL_SECS` and
/// `OMSA_AVAILABILITY_CACHE_TTL_SECS`.
#[derive(Debug, Clone)]
pub struct OmsaCacheConfig {
    /// Validity window of the cached sourcing result
    pub sourcing_ttl: Duration,

    /// Time-to-live of per-product availability entries
    pub availability_ttl: Duration,

    /// Maximum number of availability entries
    pub availability_max_capacity: u64,
}

impl Default for OmsaCacheConfig {
    fn default() -> Self {
        fn env_u64(key: &str, default: u64) -> u64 {
            std::env::var(key).ok().and_then(|s| s.parse().ok()).unwrap_or(default)
        }

        Self {
            sourcing_ttl: Duration::from_secs(env_u64(
                "OMSA_SOURCING_CACHE_TTL_SECS",
                SOURCING_CACHE_TTL_SECS,
            )),
            availability_ttl: Duration::from_secs(env_u64(
                "OMSA_AVAILABILITY_CACHE_TTL_SECS",
                AVAILABILITY_CACHE_TTL_SECS,
            )),
            availability_max_capacity: AVAILABILITY_CACHE_MAX_CAPACITY,
        }
    }
}

impl OmsaCacheConfig {
    /// Create config with custom windows (useful for testing)
    pub fn with_ttls(sourcing_ttl: Duration, availability_ttl: Duration) -> Self {
        Self {
            sourcing_ttl,
            availability_ttl,
            availability_max_capacity: AVAILABILITY_CACHE_MAX_CAPACITY,
        }
    }
}

/// Sourcing/availability adapter against the OMSA backend.
pub struct OmsaClient {
    gateway: Arc<AuthGateway>,
    resolver: Arc<CredentialResolver>,
    http_availability: HttpClient,
    http_sourcing: HttpClient,
    sourcing_cache: RwLock<Option<SourcingResult>>,
    availability_cache: Cache<String, AvailabilityResult>,
    config: OmsaCacheConfig,
}

impl OmsaClient {
    /// Create a new OMSA client with default cache configuration.
    pub fn new(gateway: Arc<AuthGateway>, resolver: Arc<CredentialResolver>) -> Result<Self> {
        Self::with_cache_config(gateway, resolver, OmsaCacheConfig::default())
    }

    /// Create a new OMSA client with custom cache configuration.
    pub fn with_cache_config(
        gateway: Arc<AuthGateway>,
        resolver: Arc<CredentialResolver>,
        config: OmsaCacheConfig,
    ) -> Result<Self> {
        let http_availability = HttpClient::builder()
            .timeout(Duration::from_secs(AVAILABILITY_TIMEOUT_SECS))
            .build()?;
        let http_sourcing =
            HttpClient::builder().timeout(Duration::from_secs(SOURCING_TIMEOUT_SECS)).build()?;

        let availability_cache = Cache::builder()
            .time_to_live(config.availability_ttl)
            .max_capacity(config.availability_max_capacity)
            .build();

        Ok(Self {
            gateway,
            resolver,
            http_availability,
            http_sourcing,
            sourcing_cache: RwLock::new(None),
            availability_cache,
            config,
        })
    }

    /// Resolve OMSA credentials, treating an empty base URL as unconfigured.
    fn configured_credentials(&self) -> Option<SystemCredentials> {
        match self.resolver.resolve(BackendSystem::Omsa) {
            Ok(creds) if !creds.base_url.trim().is_empty() => Some(creds),
            Ok(_) => None,
            Err(err) => {
                debug!(error = %err, "OMSA credentials unavailable");
                None
            }
        }
    }

    async fn submit_sourcing(
        &self,
        creds: &SystemCredentials,
        request: &SourcingRequest,
    ) -> Result<serde_json::Value> {
        let url = format!("{}/v1/sourcing", creds.base_url.trim_end_matches('/'));

        let response = self
            .gateway
            .send_authenticated(BackendSystem::Omsa, &self.http_sourcing, |http, token| {
                http.request(Method::POST, &url).bearer_auth(token).json(request)
            })
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreBridgeError::Network(format!(
                "OMSA sourcing returned HTTP {}",
                status
            )));
        }

        response.json().await.map_err(|err| {
            StoreBridgeError::Internal(format!("failed to parse sourcing response: {}", err))
        })
    }

    async fn fetch_availability(
        &self,
        creds: &SystemCredentials,
        product_id: &str,
    ) -> Result<AvailabilityResult> {
        let url =
            format!("{}/v1/inventory/availableToSellBySite", creds.base_url.trim_end_matches('/'));
        let request = AvailabilityRequest::for_product(product_id, DEFAULT_UNIT);

        let response = self
            .gateway
            .send_authenticated(BackendSystem::Omsa, &self.http_availability, |http, token| {
                http.request(Method::POST, &url).bearer_auth(token).json(&request)
            })
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreBridgeError::Network(format!(
                "OMSA availability returned HTTP {}",
                status
            )));
        }

        let parsed: AvailabilityResponse = response.json().await.map_err(|err| {
            StoreBridgeError::Internal(format!("failed to parse availability response: {}", err))
        })?;

        Ok(aggregate_availability(product_id, parsed))
    }
}

#[async_trait]
impl SourcingPort for OmsaClient {
    async fn perform_cart_sourcing(&self, cart_items: &[CartItem]) -> SourcingResult {
        if cart_items.is_empty() {
            *self.sourcing_cache.write().await = None;
            info!("cart empty, sourcing cache cleared");
            return SourcingResult::cart_empty();
        }

        let Some(creds) = self.configured_credentials() else {
            return SourcingResult::failure(cart_items, "OMSA is not configured");
        };

        let request = SourcingRequest::for_cart(cart_items, DEFAULT_COUNTRY_CODE);
        match self.submit_sourcing(&creds, &request).await {
            Ok(raw) => {
                let result = SourcingResult {
                    success: true,
                    cart_empty: false,
                    data: Some(raw),
                    cart_snapshot: cart_items.to_vec(),
                    source: SourcingSource::Live,
                    last_updated: Utc::now(),
                    error: None,
                };
                *self.sourcing_cache.write().await = Some(result.clone());
                info!(item_count = cart_items.len(), "cart sourcing cached");
                result
            }
            Err(err) => {
                warn!(error = %err, "cart sourcing failed");
                SourcingResult::failure(cart_items, err.to_string())
            }
        }
    }

    async fn cached_sourcing(&self) -> Option<SourcingResult> {
        let cached = self.sourcing_cache.read().await.clone()?;
        let age = (Utc::now() - cached.last_updated).to_std().unwrap_or_default();
        if age > self.config.sourcing_ttl {
            debug!(age_secs = age.as_secs(), "cached sourcing result is stale");
            return None;
        }
        Some(cached)
    }
}

#[async_trait]
impl AvailabilityPort for OmsaClient {
    async fn product_availability(&self, product_id: &str) -> AvailabilityResult {
        if let Some(hit) = self.availability_cache.get(product_id).await {
            debug!(product_id, "availability cache hit");
            return hit.as_cached();
        }

        let Some(creds) = self.configured_credentials() else {
            debug!(product_id, "OMSA not configured, returning zero availability");
            return AvailabilityResult::unavailable(product_id, AvailabilitySource::NotConfigured);
        };

        match self.fetch_availability(&creds, product_id).await {
            Ok(result) => {
                self.availability_cache.insert(product_id.to_string(), result.clone()).await;
                result
            }
            Err(err) => {
                warn!(product_id, error = %err, "availability lookup failed");
                AvailabilityResult::unavailable(product_id, AvailabilitySource::Error)
            }
        }
    }
}
