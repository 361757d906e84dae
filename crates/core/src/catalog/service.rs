//! Catalog orchestration service - product search and detail

use std::sync::Arc;

use storebridge_domain::{
    CatalogSource, PriceRecord, PriceSource, PricingOptions, Product, ProductPage, Result,
    StoreBridgeError,
};
use tracing::{debug, warn};

use super::fallback::{fallback_products, filter_products};
use super::ports::{AvailabilityPort, PricingPort, ProductMasterPort};

/// Product catalog facade consumed by the UI layer.
///
/// Merges ERP product master data with the price cache and the availability
/// adapter. Search and detail are read paths: ERP failures are substituted
/// with the fallback catalog so the UI always has something to render.
pub struct CatalogService {
    products: Arc<dyn ProductMasterPort>,
    pricing: Arc<dyn PricingPort>,
    availability: Arc<dyn AvailabilityPort>,
}

impl CatalogService {
    /// Create a new catalog service.
    pub fn new(
        products: Arc<dyn ProductMasterPort>,
        pricing: Arc<dyn PricingPort>,
        availability: Arc<dyn AvailabilityPort>,
    ) -> Self {
        Self { products, pricing, availability }
    }

    /// Search the product catalog, enriched with cached prices.
    ///
    /// On ERP failure the fixed fallback list is filtered by the same query
    /// and paginated locally; the result is tagged so the UI can surface the
    /// degraded mode.
    pub async fn search_products(
        &self,
        query: &str,
        page: usize,
        page_size: usize,
    ) -> Result<ProductPage> {
        let page_size = page_size.max(1);

        match self.products.search_products(query, page, page_size).await {
            Ok(mut products) => {
                self.apply_pricing(&mut products, true).await;
                let total = products.len();
                Ok(ProductPage { products, total, page, page_size, source: CatalogSource::Live })
            }
            Err(err) => {
                warn!(error = %err, query, "product master search failed, serving fallback catalog");
                let filtered = filter_products(fallback_products(), query);
                let total = filtered.len();
                let products: Vec<Product> =
                    filtered.into_iter().skip(page * page_size).take(page_size).collect();
                Ok(ProductPage {
                    products,
                    total,
                    page,
                    page_size,
                    source: CatalogSource::Fallback,
                })
            }
        }
    }

    /// Fetch one product with price and availability enrichment.
    ///
    /// Returns `NotFound` only when the id is absent from both the live
    /// catalog and the fallback list.
    pub async fn product_by_id(&self, id: &str) -> Result<Product> {
        let mut product = match self.products.product_by_id(id).await {
            Ok(Some(product)) => product,
            Ok(None) => {
                return fallback_products()
                    .into_iter()
                    .find(|product| product.id == id)
                    .ok_or_else(|| StoreBridgeError::NotFound(format!("product {} not found", id)));
            }
            Err(err) => {
                warn!(error = %err, product_id = id, "product master fetch failed, trying fallback catalog");
                fallback_products()
                    .into_iter()
                    .find(|product| product.id == id)
                    .ok_or_else(|| StoreBridgeError::NotFound(format!("product {} not found", id)))?
            }
        };

        self.apply_pricing(std::slice::from_mut(&mut product), false).await;

        let availability = self.availability.product_availability(id).await;
        product.in_store_stock = availability.in_store_stock;
        product.online_stock = availability.online_stock;
        product.is_available = availability.is_available;

        Ok(product)
    }

    async fn apply_pricing(&self, products: &mut [Product], batch: bool) {
        if products.is_empty() {
            return;
        }

        let ids: Vec<String> = products.iter().map(|product| product.id.clone()).collect();
        let options = PricingOptions { batch, ..PricingOptions::default() };

        match self.pricing.product_pricing(&ids, &options).await {
            Ok(records) => {
                for product in products.iter_mut() {
                    if let Some(record) =
                        records.iter().find(|record| record.product_id == product.id)
                    {
                        apply_price(product, record);
                    }
                }
            }
            Err(err) => {
                debug!(error = %err, "pricing enrichment failed, keeping product master prices");
            }
        }
    }
}

/// Apply a price record to a product. A fallback record never overrides a
/// usable product-master price.
fn apply_price(product: &mut Product, record: &PriceRecord) {
    if record.source == PriceSource::Fallback && product.list_price > 0.0 {
        return;
    }
    product.list_price =
        if record.sale_price > 0.0 { record.sale_price } else { record.list_price };
}
