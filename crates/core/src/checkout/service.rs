//! Checkout orchestration service - sourcing trigger and order placement

use std::sync::Arc;

use storebridge_domain::{CanonicalOrder, CartItem, OrderDraft, Result, SourcingResult};
use tracing::{debug, info};

use super::ports::{OrderPort, SourcingPort};

/// Checkout facade consumed by the UI layer.
///
/// Re-triggers sourcing on every cart mutation and feeds the latest valid
/// sourcing result into order placement. Order placement has no facade-level
/// fallback; adapter errors surface unchanged.
pub struct CheckoutService {
    sourcing: Arc<dyn SourcingPort>,
    orders: Arc<dyn OrderPort>,
}

impl CheckoutService {
    /// Create a new checkout service.
    pub fn new(sourcing: Arc<dyn SourcingPort>, orders: Arc<dyn OrderPort>) -> Self {
        Self { sourcing, orders }
    }

    /// Run sourcing for the current cart contents. Invoked on every cart
    /// mutation; the adapter caches the latest result.
    pub async fn trigger_sourcing(&self, cart_items: &[CartItem]) -> SourcingResult {
        debug!(item_count = cart_items.len(), "triggering cart sourcing");
        self.sourcing.perform_cart_sourcing(cart_items).await
    }

    /// Submit an order. The cached sourcing result is attached only when it
    /// was computed for exactly the draft's items; a stale or mismatching
    /// cache entry is ignored rather than trusted.
    pub async fn place_order(&self, draft: &OrderDraft) -> Result<CanonicalOrder> {
        let sourcing = self
            .sourcing
            .cached_sourcing()
            .await
            .filter(|result| result.success && result.matches_cart(&draft.items));

        if sourcing.is_none() {
            debug!("no valid cached sourcing for current cart, submitting order without sourcing");
        }

        let order = self.orders.create_order(draft, sourcing.as_ref()).await?;
        info!(order_id = %order.order_id, order_number = %order.order_number, "order placed");
        Ok(order)
    }

    /// Fetch one order (read path, adapter-level fallback).
    pub async fn order(&self, order_id: &str) -> CanonicalOrder {
        self.orders.order(order_id).await
    }

    /// Search orders (read path, adapter-level fallback).
    pub async fn search_orders(&self, query: &str) -> Vec<CanonicalOrder> {
        self.orders.search_orders(query).await
    }
}
