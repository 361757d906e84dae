//! Product, price and catalog types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Canonical product shape returned to the UI layer.
///
/// Merged from ERP product master data, the price cache and the availability
/// adapter; stock fields stay zero until availability enrichment runs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: String,
    pub ean: Option<String>,
    pub description: String,
    pub list_price: f64,
    pub unit: String,
    pub image: Option<String>,
    pub in_store_stock: f64,
    pub online_stock: f64,
    pub is_available: bool,
}

/// Origin of a price value handed to callers. Never omitted; callers must be
/// able to tell real-time, cached and fallback prices apart.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PriceSource {
    #[serde(rename = "OPPS-RealTime")]
    RealTime,
    #[serde(rename = "OPPS-BulkCache")]
    BulkCache,
    #[serde(rename = "fallback")]
    Fallback,
}

/// One price row for a product. A product may carry several records, one per
/// business unit; insertion order follows the backend response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceRecord {
    pub product_id: String,
    /// Zero-padded 18-character id as delivered by the backend
    pub original_item_id: String,
    pub list_price: f64,
    pub sale_price: f64,
    pub currency: String,
    pub unit_of_measure: String,
    pub price_classification: Option<String>,
    pub business_unit_id: Option<String>,
    pub business_unit_type: Option<String>,
    pub effective_date: Option<String>,
    pub expiry_date: Option<String>,
    pub last_updated: DateTime<Utc>,
    pub source: PriceSource,
}

/// Pointer to the per-item backend URI enabling a later real-time lookup.
/// Lifetime is tied to the price-cache generation that produced it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PriceMetadataEntry {
    pub uri: String,
    pub id: String,
    #[serde(rename = "type")]
    pub entry_type: String,
    pub product_id: String,
    pub business_unit_id: Option<String>,
    pub business_unit_type: Option<String>,
}

/// Options for a pricing lookup.
#[derive(Debug, Clone, Default)]
pub struct PricingOptions {
    /// Bypass the expiry policy and refresh the bulk cache first
    pub force_refresh: bool,
    /// Batch requests never attempt the real-time single-product path
    pub batch: bool,
    /// Preferred business unit when several price records exist
    pub business_unit_id: Option<String>,
}

/// Origin of a catalog (search/detail) result.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CatalogSource {
    #[serde(rename = "S4-Live")]
    Live,
    #[serde(rename = "fallback")]
    Fallback,
}

/// Paginated product search result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub source: CatalogSource,
}
