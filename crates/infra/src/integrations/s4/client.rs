//! S/4HANA product master client
//!
//! Implements the `ProductMasterPort`. Failures propagate unchanged; the
//! catalog service owns the fallback list, so this client stays free of
//! fallback policy.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, StatusCode};
use storebridge_core::ProductMasterPort;
use storebridge_domain::constants::PRODUCT_MASTER_TIMEOUT_SECS;
use storebridge_domain::{Product, Result, StoreBridgeError};
use tracing::{debug, warn};

use super::types::{to_product, ProductEnvelope, ProductListEnvelope};
use crate::http::HttpClient;

/// Connectivity configuration for the ERP behind the corporate proxy.
#[derive(Debug, Clone)]
pub struct S4Config {
    pub base_url: String,
    /// Value for the proxy `Proxy-Authorization` header, when the
    /// connectivity proxy requires one.
    pub proxy_authorization: Option<String>,
}

impl S4Config {
    /// Read configuration from `S4_BASE_URL` / `S4_PROXY_AUTHORIZATION`.
    pub fn from_env() -> Option<Self> {
        let base_url = std::env::var("S4_BASE_URL").ok().filter(|url| !url.trim().is_empty())?;
        Some(Self {
            base_url,
            proxy_authorization: std::env::var("S4_PROXY_AUTHORIZATION").ok(),
        })
    }
}

/// Product master adapter against the ERP.
pub struct S4Client {
    http: HttpClient,
    config: Option<Arc<S4Config>>,
}

impl S4Client {
    /// Create a client from the environment. A missing base URL is logged
    /// and every lookup then fails, which the catalog service absorbs with
    /// its fallback list.
    pub fn from_env() -> Result<Self> {
        let config = S4Config::from_env();
        if config.is_none() {
            warn!("S4_BASE_URL not set, product master lookups will serve fallback data");
        }
        Self::with_config(config)
    }

    /// Create a client with explicit configuration.
    pub fn with_config(config: Option<S4Config>) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(PRODUCT_MASTER_TIMEOUT_SECS))
            .build()?;
        Ok(Self { http, config: config.map(Arc::new) })
    }

    fn config(&self) -> Result<&S4Config> {
        self.config.as_deref().ok_or_else(|| {
            StoreBridgeError::Config("S4 product master is not configured".to_string())
        })
    }

    fn apply_proxy_auth(&self, builder: RequestBuilder, config: &S4Config) -> RequestBuilder {
        match &config.proxy_authorization {
            Some(value) => builder.header("Proxy-Authorization", value.clone()),
            None => builder,
        }
    }
}

#[async_trait]
impl ProductMasterPort for S4Client {
    async fn search_products(
        &self,
        query: &str,
        page: usize,
        page_size: usize,
    ) -> Result<Vec<Product>> {
        let config = self.config()?;
        let url = format!("{}/A_Product", config.base_url.trim_end_matches('/'));

        let builder = self
            .http
            .request(Method::GET, &url)
            .query(&[("search", query)])
            .query(&[("$skip", page * page_size), ("$top", page_size)]);
        let response = self.http.send(self.apply_proxy_auth(builder, config)).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreBridgeError::Network(format!(
                "product master search returned HTTP {}",
                status
            )));
        }

        let envelope: ProductListEnvelope = response.json().await.map_err(|err| {
            StoreBridgeError::Internal(format!("failed to parse product list: {}", err))
        })?;

        let products: Vec<Product> = envelope.into_rows().into_iter().map(to_product).collect();
        debug!(query, count = products.len(), "product master search");
        Ok(products)
    }

    async fn product_by_id(&self, id: &str) -> Result<Option<Product>> {
        let config = self.config()?;
        let url = format!("{}/A_Product('{}')", config.base_url.trim_end_matches('/'), id);

        let builder = self.http.request(Method::GET, &url);
        let response = self.http.send(self.apply_proxy_auth(builder, config)).await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(StoreBridgeError::Network(format!(
                "product master detail returned HTTP {}",
                status
            )));
        }

        let envelope: ProductEnvelope = response.json().await.map_err(|err| {
            StoreBridgeError::Internal(format!("failed to parse product detail: {}", err))
        })?;

        Ok(Some(to_product(envelope.into_row())))
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client_for(server: &MockServer) -> S4Client {
        S4Client::with_config(Some(S4Config {
            base_url: server.uri(),
            proxy_authorization: Some("Bearer proxy-token".to_string()),
        }))
        .expect("client")
    }

    #[tokio::test]
    async fn search_sends_query_and_paging_parameters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/A_Product"))
            .and(query_param("search", "scanner"))
            .and(query_param("$skip", "20"))
            .and(query_param("$top", "20"))
            .and(header("Proxy-Authorization", "Bearer proxy-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "value": [{
                    "id": "29",
                    "description": "Wireless Barcode Scanner",
                    "standardId": "4006381333931",
                    "baseUnit": "PCE",
                    "netPriceAmount": "89.99"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let products = client.search_products("scanner", 1, 20).await.expect("products");

        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id, "29");
    }

    #[tokio::test]
    async fn detail_returns_none_on_404() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let product = client.product_by_id("999").await.expect("lookup");

        assert!(product.is_none());
    }

    #[tokio::test]
    async fn detail_parses_odata_wrapped_entity() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/A_Product('29')"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "d": { "Product": "29", "ProductDescription": "Scanner", "BaseUnit": "PCE" }
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let product = client.product_by_id("29").await.expect("lookup").expect("product");

        assert_eq!(product.description, "Scanner");
    }

    #[tokio::test]
    async fn unconfigured_client_fails_with_config_error() {
        let client = S4Client::with_config(None).expect("client");

        let err = client.search_products("scanner", 0, 20).await.expect_err("should fail");
        assert!(matches!(err, StoreBridgeError::Config(_)));
    }
}
