//! OPPS pricing client
//!
//! Implements the `PricingPort`: bulk cache refresh per the expiry policy,
//! real-time single-product override through the cached metadata URI, and
//! static fallback records for products without a cache entry.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Method;
use storebridge_core::PricingPort;
use storebridge_domain::constants::{
    DEFAULT_CURRENCY, DEFAULT_UNIT, FALLBACK_LIST_PRICE, PRICING_TIMEOUT_SECS,
};
use storebridge_domain::{
    product_id_to_item_id, BackendSystem, PriceRecord, PriceSource, PricingOptions, Result,
    StoreBridgeError,
};
use tracing::{debug, info, warn};

use super::cache::{OppsCacheConfig, PriceCache};
use super::types::{transform_row, BasePriceEnvelope, SingleItemEnvelope};
use crate::auth::AuthGateway;
use crate::config::CredentialResolver;
use crate::http::HttpClient;

/// Pricing adapter against the OPPS backend.
pub struct OppsClient {
    gateway: Arc<AuthGateway>,
    resolver: Arc<CredentialResolver>,
    http: HttpClient,
    cache: PriceCache,
}

impl OppsClient {
    /// Create a new OPPS client with default cache configuration.
    pub fn new(gateway: Arc<AuthGateway>, resolver: Arc<CredentialResolver>) -> Result<Self> {
        Self::with_cache_config(gateway, resolver, OppsCacheConfig::default())
    }

    /// Create a new OPPS client with custom cache configuration (testing and
    /// tuning).
    pub fn with_cache_config(
        gateway: Arc<AuthGateway>,
        resolver: Arc<CredentialResolver>,
        config: OppsCacheConfig,
    ) -> Result<Self> {
        let http =
            HttpClient::builder().timeout(Duration::from_secs(PRICING_TIMEOUT_SECS)).build()?;

        Ok(Self { gateway, resolver, http, cache: PriceCache::new(config) })
    }

    /// Initial cache population at process start. Failures are logged, never
    /// fatal: per-request refresh and fallback pricing cover the gap.
    pub async fn warm_up(&self) {
        match self.fetch_all_prices().await {
            Ok(count) => info!(row_count = count, "price cache warmed up"),
            Err(err) => {
                warn!(error = %err, "initial price cache population failed, falling back to per-request pricing");
            }
        }
    }

    /// Pull the full base-price table and swap it into the cache.
    pub async fn fetch_all_prices(&self) -> Result<usize> {
        let creds = self.resolver.resolve(BackendSystem::Opps)?;
        let url = format!("{}/BasePrices", creds.base_url.trim_end_matches('/'));

        let response = self
            .gateway
            .send_authenticated(BackendSystem::Opps, &self.http, |http, token| {
                http.request(Method::GET, &url).bearer_auth(token)
            })
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreBridgeError::Network(format!(
                "OPPS BasePrices returned HTTP {}",
                status
            )));
        }

        let envelope: BasePriceEnvelope = response.json().await.map_err(|err| {
            StoreBridgeError::Internal(format!("failed to parse BasePrices response: {}", err))
        })?;

        let rows = envelope.into_rows();
        let row_count = rows.len();

        let mut prices: std::collections::HashMap<String, Vec<PriceRecord>> = Default::default();
        let mut metadata: std::collections::HashMap<String, Vec<_>> = Default::default();
        for row in rows {
            let (record, meta) = transform_row(row, PriceSource::BulkCache);
            if let Some(meta) = meta {
                metadata.entry(record.product_id.clone()).or_default().push(meta);
            }
            prices.entry(record.product_id.clone()).or_default().push(record);
        }

        let product_count = prices.len();
        self.cache.replace(prices, metadata).await;
        info!(row_count, product_count, "price cache refreshed from bulk endpoint");
        Ok(row_count)
    }

    /// Real-time lookup through the cached absolute metadata URI.
    ///
    /// Selects the entry matching the requested business unit when present,
    /// else the first entry for the product. Deliberately permissive: any
    /// failure (no metadata, network, auth, parse) returns `None` so callers
    /// fall back to the bulk cache without surfacing an error.
    async fn real_time_pricing(
        &self,
        product_id: &str,
        business_unit_id: Option<&str>,
    ) -> Option<PriceRecord> {
        let entries = self.cache.metadata_for(product_id).await;
        let entry = business_unit_id
            .and_then(|unit| {
                entries.iter().find(|entry| entry.business_unit_id.as_deref() == Some(unit))
            })
            .or_else(|| entries.first())?;

        let uri = entry.uri.clone();
        let response = self
            .gateway
            .send_authenticated(BackendSystem::Opps, &self.http, |http, token| {
                http.request(Method::GET, &uri).bearer_auth(token)
            })
            .await
            .map_err(|err| debug!(product_id, error = %err, "real-time price lookup failed"))
            .ok()?;

        if !response.status().is_success() {
            debug!(product_id, status = %response.status(), "real-time price lookup rejected");
            return None;
        }

        let envelope: SingleItemEnvelope = response
            .json()
            .await
            .map_err(|err| debug!(product_id, error = %err, "real-time price unparsable"))
            .ok()?;

        let (record, _) = transform_row(envelope.into_row(), PriceSource::RealTime);
        Some(record)
    }

    /// Bulk-cache lookup with business-unit selection, or the static
    /// fallback record when the product has no cache entry.
    async fn cached_or_fallback(
        &self,
        product_id: &str,
        business_unit_id: Option<&str>,
    ) -> PriceRecord {
        let records = self.cache.records_for(product_id).await;
        let selected = business_unit_id
            .and_then(|unit| {
                records.iter().find(|record| record.business_unit_id.as_deref() == Some(unit))
            })
            .or_else(|| records.first());

        match selected {
            Some(record) => record.clone(),
            None => fallback_record(product_id),
        }
    }
}

/// Static fallback price for products missing from the cache.
fn fallback_record(product_id: &str) -> PriceRecord {
    PriceRecord {
        product_id: product_id.to_string(),
        original_item_id: product_id_to_item_id(product_id),
        list_price: FALLBACK_LIST_PRICE,
        sale_price: FALLBACK_LIST_PRICE,
        currency: DEFAULT_CURRENCY.to_string(),
        unit_of_measure: DEFAULT_UNIT.to_string(),
        price_classification: None,
        business_unit_id: None,
        business_unit_type: None,
        effective_date: None,
        expiry_date: None,
        last_updated: Utc::now(),
        source: PriceSource::Fallback,
    }
}

#[async_trait]
impl PricingPort for OppsClient {
    async fn product_pricing(
        &self,
        product_ids: &[String],
        options: &PricingOptions,
    ) -> Result<Vec<PriceRecord>> {
        let request_number = self.cache.begin_request().await;

        if self.cache.is_expired(options.force_refresh).await {
            debug!(request_number, "price cache expired, refreshing");
            if let Err(err) = self.fetch_all_prices().await {
                warn!(error = %err, "bulk price refresh failed, serving cached or fallback prices");
            }
        }

        let single_lookup = product_ids.len() == 1 && !options.batch;

        let mut records = Vec::with_capacity(product_ids.len());
        for product_id in product_ids {
            if single_lookup {
                if let Some(real_time) = self
                    .real_time_pricing(product_id, options.business_unit_id.as_deref())
                    .await
                {
                    records.push(real_time);
                    continue;
                }
            }
            records
                .push(self.cached_or_fallback(product_id, options.business_unit_id.as_deref()).await);
        }

        Ok(records)
    }
}
