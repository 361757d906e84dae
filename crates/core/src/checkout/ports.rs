//! Checkout port interfaces

use async_trait::async_trait;
use storebridge_domain::{
    CanonicalOrder, CartItem, FulfillmentStatus, OrderDraft, PaymentStatus, Result, SourcingResult,
};

/// Cart sourcing against the sourcing/availability backend.
///
/// Sourcing failures are returned as structured values, never thrown, so the
/// cart keeps rendering.
#[async_trait]
pub trait SourcingPort: Send + Sync {
    /// Run sourcing for the given cart contents and cache the outcome. An
    /// empty cart clears the cache and reports `cart_empty`.
    async fn perform_cart_sourcing(&self, cart_items: &[CartItem]) -> SourcingResult;

    /// The latest sourcing result, if one exists and is still within its
    /// validity window. Staleness does not auto-refresh.
    async fn cached_sourcing(&self) -> Option<SourcingResult>;
}

/// Order management backend operations.
///
/// `create_order` is the single write path and always propagates failures.
/// The read/status operations answer with fallback-tagged stand-ins instead,
/// so their signatures are infallible.
#[async_trait]
pub trait OrderPort: Send + Sync {
    async fn create_order(
        &self,
        draft: &OrderDraft,
        sourcing: Option<&SourcingResult>,
    ) -> Result<CanonicalOrder>;

    async fn order(&self, order_id: &str) -> CanonicalOrder;

    async fn update_order_status(&self, order_id: &str, status: &str) -> CanonicalOrder;

    async fn cancel_order(&self, order_id: &str) -> CanonicalOrder;

    async fn order_fulfillment(&self, order_id: &str) -> FulfillmentStatus;

    async fn process_payment(&self, order_id: &str) -> PaymentStatus;

    async fn search_orders(&self, query: &str) -> Vec<CanonicalOrder>;
}
