//! Availability types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fulfillment-site category. Store sites feed the in-store total, the online
/// site feeds the online total.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SiteType {
    Store,
    Online,
}

/// Per-site stock figure contributing to an [`AvailabilityResult`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SiteStock {
    pub site_id: String,
    pub site_type: SiteType,
    pub quantity: f64,
}

/// Origin of an availability answer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AvailabilitySource {
    #[serde(rename = "OMSA-Live")]
    Live,
    #[serde(rename = "OMSA-Cache")]
    Cache,
    #[serde(rename = "OMSA-NotConfigured")]
    NotConfigured,
    #[serde(rename = "OMSA-Error")]
    Error,
}

/// Aggregated availability for one product across the fixed site topology.
///
/// Derived per request; short-lived cache only. `has_data` is false whenever
/// the figures are a graceful stand-in rather than a backend answer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AvailabilityResult {
    pub product_id: String,
    pub in_store_stock: f64,
    pub online_stock: f64,
    pub total_stock: f64,
    pub is_available: bool,
    pub sites: Vec<SiteStock>,
    pub source: AvailabilitySource,
    pub last_updated: DateTime<Utc>,
    pub has_data: bool,
}

impl AvailabilityResult {
    /// Zero-stock stand-in used whenever the backend cannot be asked or
    /// answered with an error. Availability must never block product display.
    pub fn unavailable(product_id: impl Into<String>, source: AvailabilitySource) -> Self {
        Self {
            product_id: product_id.into(),
            in_store_stock: 0.0,
            online_stock: 0.0,
            total_stock: 0.0,
            is_available: false,
            sites: Vec::new(),
            source,
            last_updated: Utc::now(),
            has_data: false,
        }
    }

    /// Re-tag a cached value so callers can tell it apart from a live answer.
    pub fn as_cached(mut self) -> Self {
        self.source = AvailabilitySource::Cache;
        self
    }
}
