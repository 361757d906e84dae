//! OMF order client
//!
//! Implements the `OrderPort`. `create_order` is the write path: it fails
//! fast without a configured base URL and surfaces submission failures as
//! structured errors carrying the backend code when one is available. The
//! read/status operations each degrade to a fallback-tagged stand-in.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use storebridge_core::OrderPort;
use storebridge_domain::constants::ORDER_TIMEOUT_SECS;
use storebridge_domain::{
    BackendSystem, CanonicalOrder, FulfillmentStatus, OrderDraft, PaymentStatus, Result,
    SourcingResult, StoreBridgeError, SystemCredentials,
};
use tracing::{info, warn};

use super::payload::build_order_payload;
use super::types::{
    fallback_order, normalize_order, parse_error_body, OmfFulfillmentResponse, OmfOrderResponse,
    OmfPaymentResponse, OmfSearchEnvelope,
};
use crate::auth::AuthGateway;
use crate::config::CredentialResolver;
use crate::http::HttpClient;

/// Order adapter against the OMF backend.
pub struct OmfClient {
    gateway: Arc<AuthGateway>,
    resolver: Arc<CredentialResolver>,
    http: HttpClient,
}

impl OmfClient {
    /// Create a new OMF client.
    pub fn new(gateway: Arc<AuthGateway>, resolver: Arc<CredentialResolver>) -> Result<Self> {
        let http =
            HttpClient::builder().timeout(Duration::from_secs(ORDER_TIMEOUT_SECS)).build()?;
        Ok(Self { gateway, resolver, http })
    }

    /// Resolve OMF credentials, requiring a usable base URL.
    fn configured_credentials(&self) -> Result<SystemCredentials> {
        let creds = self.resolver.resolve(BackendSystem::Omf)?;
        if creds.base_url.trim().is_empty() {
            return Err(StoreBridgeError::Config(
                "OMF base URL is not configured, order operations unavailable".to_string(),
            ));
        }
        Ok(creds)
    }

    async fn request_json<T>(&self, method: Method, url: String, body: Option<serde_json::Value>) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self
            .gateway
            .send_authenticated(BackendSystem::Omf, &self.http, |http, token| {
                let mut builder = http.request(method.clone(), &url).bearer_auth(token);
                if let Some(body) = &body {
                    builder = builder.json(body);
                }
                builder
            })
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreBridgeError::Network(format!(
                "OMF returned HTTP {} for {}",
                status, url
            )));
        }

        response.json().await.map_err(|err| {
            StoreBridgeError::Internal(format!("failed to parse OMF response: {}", err))
        })
    }

    async fn try_order(&self, order_id: &str) -> Result<CanonicalOrder> {
        let creds = self.configured_credentials()?;
        let url = format!("{}/api/v1/orders/{}", creds.base_url.trim_end_matches('/'), order_id);
        let response: OmfOrderResponse = self.request_json(Method::GET, url, None).await?;
        Ok(normalize_order(response, None, None, None))
    }

    async fn try_update_status(&self, order_id: &str, status: &str) -> Result<CanonicalOrder> {
        let creds = self.configured_credentials()?;
        let url =
            format!("{}/api/v1/orders/{}/status", creds.base_url.trim_end_matches('/'), order_id);
        let body = serde_json::json!({ "status": status });
        let response: OmfOrderResponse = self.request_json(Method::PUT, url, Some(body)).await?;
        Ok(normalize_order(response, None, None, None))
    }

    async fn try_cancel(&self, order_id: &str) -> Result<CanonicalOrder> {
        let creds = self.configured_credentials()?;
        let url =
            format!("{}/api/v1/orders/{}/cancel", creds.base_url.trim_end_matches('/'), order_id);
        let response: OmfOrderResponse = self.request_json(Method::POST, url, None).await?;
        Ok(normalize_order(response, None, None, None))
    }

    async fn try_fulfillment(&self, order_id: &str) -> Result<FulfillmentStatus> {
        let creds = self.configured_credentials()?;
        let url = format!(
            "{}/api/v1/orders/{}/fulfillment",
            creds.base_url.trim_end_matches('/'),
            order_id
        );
        let response: OmfFulfillmentResponse = self.request_json(Method::GET, url, None).await?;
        Ok(FulfillmentStatus {
            status: response.status.unwrap_or_else(|| "UNKNOWN".to_string()),
            shipment_count: response.shipments.len() as u32,
        })
    }

    async fn try_process_payment(&self, order_id: &str) -> Result<PaymentStatus> {
        let creds = self.configured_credentials()?;
        let url =
            format!("{}/api/v1/orders/{}/payment", creds.base_url.trim_end_matches('/'), order_id);
        let response: OmfPaymentResponse = self.request_json(Method::POST, url, None).await?;
        Ok(PaymentStatus {
            method: response.method.unwrap_or_else(|| "Bank".to_string()),
            status: response.status.unwrap_or_else(|| "PENDING".to_string()),
        })
    }

    async fn try_search(&self, query: &str) -> Result<Vec<CanonicalOrder>> {
        let creds = self.configured_credentials()?;
        let url = format!(
            "{}/api/v1/orders?search={}",
            creds.base_url.trim_end_matches('/'),
            urlencode(query)
        );
        let envelope: OmfSearchEnvelope = self.request_json(Method::GET, url, None).await?;
        Ok(envelope
            .into_orders()
            .into_iter()
            .map(|response| normalize_order(response, None, None, None))
            .collect())
    }
}

/// Minimal query-component encoding for the search parameter.
fn urlencode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

#[async_trait]
impl OrderPort for OmfClient {
    async fn create_order(
        &self,
        draft: &OrderDraft,
        sourcing: Option<&SourcingResult>,
    ) -> Result<CanonicalOrder> {
        let creds = self.configured_credentials()?;
        let url = format!("{}/api/v2/orders", creds.base_url.trim_end_matches('/'));

        let payload = build_order_payload(draft, sourcing);
        let external_number = payload.external_number.clone();
        let shipment_count =
            payload.sourcing.as_ref().map(|sourcing| sourcing.shipments.len() as u32);
        let body = serde_json::to_value(&payload).map_err(|err| {
            StoreBridgeError::Internal(format!("failed to serialize order payload: {}", err))
        })?;

        let response = self
            .gateway
            .send_authenticated(BackendSystem::Omf, &self.http, |http, token| {
                http.request(Method::POST, &url).bearer_auth(token).json(&body)
            })
            .await
            .map_err(|err| match err {
                // No silent fallback on the write path: everything becomes a
                // visible submission error.
                StoreBridgeError::OrderSubmission { .. } => err,
                other => StoreBridgeError::order_submission(other.to_string()),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body_text =
                response.text().await.unwrap_or_else(|_| "unknown error".to_string());
            let (code, message) = parse_error_body(&body_text);
            warn!(%status, code = code.as_deref().unwrap_or("-"), "order submission rejected");
            return Err(StoreBridgeError::OrderSubmission {
                code,
                message: format!("OMF rejected order (HTTP {}): {}", status, message),
            });
        }

        let parsed: OmfOrderResponse = response.json().await.map_err(|err| {
            StoreBridgeError::order_submission(format!(
                "order accepted but response unparsable: {}",
                err
            ))
        })?;

        let order = normalize_order(parsed, Some(draft), Some(external_number), shipment_count);
        info!(
            order_id = %order.order_id,
            order_number = %order.order_number,
            item_count = order.items.len(),
            "order created"
        );
        Ok(order)
    }

    async fn order(&self, order_id: &str) -> CanonicalOrder {
        match self.try_order(order_id).await {
            Ok(order) => order,
            Err(err) => {
                warn!(order_id, error = %err, "order fetch failed, serving fallback");
                fallback_order(order_id, "UNKNOWN")
            }
        }
    }

    async fn update_order_status(&self, order_id: &str, status: &str) -> CanonicalOrder {
        match self.try_update_status(order_id, status).await {
            Ok(order) => order,
            Err(err) => {
                warn!(order_id, error = %err, "order status update failed, serving fallback");
                fallback_order(order_id, status)
            }
        }
    }

    async fn cancel_order(&self, order_id: &str) -> CanonicalOrder {
        match self.try_cancel(order_id).await {
            Ok(order) => order,
            Err(err) => {
                warn!(order_id, error = %err, "order cancellation failed, serving fallback");
                fallback_order(order_id, "CANCELLED")
            }
        }
    }

    async fn order_fulfillment(&self, order_id: &str) -> FulfillmentStatus {
        match self.try_fulfillment(order_id).await {
            Ok(fulfillment) => fulfillment,
            Err(err) => {
                warn!(order_id, error = %err, "fulfillment fetch failed, serving fallback");
                FulfillmentStatus { status: "UNKNOWN".to_string(), shipment_count: 0 }
            }
        }
    }

    async fn process_payment(&self, order_id: &str) -> PaymentStatus {
        match self.try_process_payment(order_id).await {
            Ok(payment) => payment,
            Err(err) => {
                warn!(order_id, error = %err, "payment processing failed, serving fallback");
                PaymentStatus { method: "Bank".to_string(), status: "PENDING".to_string() }
            }
        }
    }

    async fn search_orders(&self, query: &str) -> Vec<CanonicalOrder> {
        match self.try_search(query).await {
            Ok(orders) => orders,
            Err(err) => {
                warn!(query, error = %err, "order search failed, serving empty result");
                Vec::new()
            }
        }
    }
}
