//! In-memory price table with session-aware expiry policy
//!
//! The table is refreshed as a whole from the bulk endpoint. Expiry fires on
//! whichever condition hits first:
//! - an explicit `force_refresh`
//! - the table was never populated
//! - the request counter hits a session boundary (1st, 11th, 21st, ...
//!   request with the default window of 10)
//! - the session window (default 5 minutes) elapsed since the last refresh
//! - the full TTL (default 30 minutes) elapsed since the last bulk fetch
//!
//! Metadata entries share the table's generation: a refresh replaces both.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use storebridge_domain::constants::{
    PRICE_CACHE_FULL_TTL_SECS, PRICE_SESSION_REFRESH_EVERY, PRICE_SESSION_WINDOW_SECS,
};
use storebridge_domain::{PriceMetadataEntry, PriceRecord};
use tokio::sync::RwLock;
use tracing::debug;

/// Price cache configuration
///
/// Override via `OPPS_CACHE_SESSION_REFRESH_EVERY`,
/// `OPPS_CACHE_SESSION_WINDOW_SECS` and `OPPS_CACHE_FULL_TTL_SECS`.
#[derive(Debug, Clone)]
pub struct OppsCacheConfig {
    /// Refresh on every Nth request (1st, N+1th, ...)
    pub session_refresh_every: u64,

    /// Session window after which the next request refreshes
    pub session_window: Duration,

    /// Hard TTL for the bulk table
    pub full_ttl: Duration,
}

impl Default for OppsCacheConfig {
    fn default() -> Self {
        fn env_u64(key: &str, default: u64) -> u64 {
            std::env::var(key).ok().and_then(|s| s.parse().ok()).unwrap_or(default)
        }

        Self {
            session_refresh_every: env_u64(
                "OPPS_CACHE_SESSION_REFRESH_EVERY",
                PRICE_SESSION_REFRESH_EVERY,
            ),
            session_window: Duration::from_secs(env_u64(
                "OPPS_CACHE_SESSION_WINDOW_SECS",
                PRICE_SESSION_WINDOW_SECS,
            )),
            full_ttl: Duration::from_secs(env_u64(
                "OPPS_CACHE_FULL_TTL_SECS",
                PRICE_CACHE_FULL_TTL_SECS,
            )),
        }
    }
}

impl OppsCacheConfig {
    /// Create config with custom windows (useful for testing)
    pub fn with_windows(session_refresh_every: u64, session_window: Duration, full_ttl: Duration) -> Self {
        Self { session_refresh_every, session_window, full_ttl }
    }

    /// Log configuration at startup
    pub fn log_config(&self) {
        tracing::info!(
            session_refresh_every = self.session_refresh_every,
            session_window_secs = self.session_window.as_secs(),
            full_ttl_secs = self.full_ttl.as_secs(),
            "price cache configuration loaded"
        );
    }
}

#[derive(Default)]
struct PriceTable {
    prices: HashMap<String, Vec<PriceRecord>>,
    metadata: HashMap<String, Vec<PriceMetadataEntry>>,
    last_full_fetch: Option<DateTime<Utc>>,
    last_session_refresh: Option<DateTime<Utc>>,
    request_counter: u64,
}

/// Process-wide price table guarded by an async lock.
pub struct PriceCache {
    table: RwLock<PriceTable>,
    config: OppsCacheConfig,
}

impl PriceCache {
    /// Create an empty cache.
    pub fn new(config: OppsCacheConfig) -> Self {
        config.log_config();
        Self { table: RwLock::new(PriceTable::default()), config }
    }

    /// Register an incoming pricing request and return its 1-based number.
    pub async fn begin_request(&self) -> u64 {
        let mut table = self.table.write().await;
        table.request_counter += 1;
        table.request_counter
    }

    /// Evaluate the expiry policy for the current request.
    pub async fn is_expired(&self, force_refresh: bool) -> bool {
        if force_refresh {
            return true;
        }

        let table = self.table.read().await;
        let Some(last_fetch) = table.last_full_fetch else {
            return true;
        };

        if (table.request_counter.saturating_sub(1)) % self.config.session_refresh_every.max(1)
            == 0
        {
            debug!(request = table.request_counter, "session boundary hit, price cache expired");
            return true;
        }

        let now = Utc::now();
        if let Some(session) = table.last_session_refresh {
            if (now - session).to_std().unwrap_or_default() > self.config.session_window {
                return true;
            }
        }

        (now - last_fetch).to_std().unwrap_or_default() > self.config.full_ttl
    }

    /// Swap in a freshly fetched generation of prices and metadata.
    pub async fn replace(
        &self,
        prices: HashMap<String, Vec<PriceRecord>>,
        metadata: HashMap<String, Vec<PriceMetadataEntry>>,
    ) {
        let mut table = self.table.write().await;
        table.prices = prices;
        table.metadata = metadata;
        let now = Utc::now();
        table.last_full_fetch = Some(now);
        table.last_session_refresh = Some(now);
    }

    /// Whether the table has ever been populated.
    pub async fn is_populated(&self) -> bool {
        self.table.read().await.last_full_fetch.is_some()
    }

    /// All price records for a product, in backend response order.
    pub async fn records_for(&self, product_id: &str) -> Vec<PriceRecord> {
        self.table.read().await.prices.get(product_id).cloned().unwrap_or_default()
    }

    /// All metadata entries for a product.
    pub async fn metadata_for(&self, product_id: &str) -> Vec<PriceMetadataEntry> {
        self.table.read().await.metadata.get(product_id).cloned().unwrap_or_default()
    }

    /// Number of products with at least one cached price.
    pub async fn product_count(&self) -> usize {
        self.table.read().await.prices.len()
    }
}
