//! Catalog port interfaces

use async_trait::async_trait;
use storebridge_domain::{AvailabilityResult, PriceRecord, PricingOptions, Product, Result};

/// ERP product master access (reached through the connectivity proxy).
///
/// Failures propagate; the catalog service owns the fallback list.
#[async_trait]
pub trait ProductMasterPort: Send + Sync {
    /// Query-parameterized product listing.
    async fn search_products(
        &self,
        query: &str,
        page: usize,
        page_size: usize,
    ) -> Result<Vec<Product>>;

    /// Single-product detail fetch. `Ok(None)` when the ERP has no such id.
    async fn product_by_id(&self, id: &str) -> Result<Option<Product>>;
}

/// Price lookup against the pricing cache.
///
/// Returns one record per requested product; products without a cache entry
/// receive a fallback-tagged record, so the result length always matches the
/// request length.
#[async_trait]
pub trait PricingPort: Send + Sync {
    async fn product_pricing(
        &self,
        product_ids: &[String],
        options: &PricingOptions,
    ) -> Result<Vec<PriceRecord>>;
}

/// Availability lookup. Degrades gracefully: the adapter answers with a
/// zero-stock stand-in instead of failing, so the signature is infallible.
#[async_trait]
pub trait AvailabilityPort: Send + Sync {
    async fn product_availability(&self, product_id: &str) -> AvailabilityResult;
}
