//! Token cache and authenticated-request gateway
//!
//! Obtains and caches OAuth2 client-credentials bearer tokens per backend
//! system. Token lifecycle per system: `NoToken → Valid → (near-expiry|401)
//! → NoToken`.
//!
//! - A cached token is served only while `now + 5min < expires_at`.
//! - Refreshes are serialized per system: concurrent callers wait on the
//!   system's slot mutex instead of stampeding the token endpoint.
//! - [`AuthGateway::send_authenticated`] wraps a request with a bounded
//!   retry: exactly one retry, triggered only by a 401 response. This is the
//!   only automatic retry in the system.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use storebridge_domain::constants::{
    DEFAULT_TOKEN_TTL_SECS, TOKEN_ENDPOINT_TIMEOUT_SECS, TOKEN_EXPIRY_BUFFER_SECS,
};
use storebridge_domain::{BackendSystem, Result, StoreBridgeError};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::CredentialResolver;
use crate::http::HttpClient;

/// A bearer token cached for one backend system.
#[derive(Debug, Clone)]
pub struct CachedToken {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

impl CachedToken {
    /// Create a token expiring `expires_in_secs` from now.
    pub fn new(access_token: String, expires_in_secs: i64) -> Self {
        Self { access_token, expires_at: Utc::now() + Duration::seconds(expires_in_secs) }
    }

    /// Whether the token is expired or will expire within the buffer.
    pub fn is_expired(&self, buffer_seconds: i64) -> bool {
        Utc::now() + Duration::seconds(buffer_seconds) >= self.expires_at
    }
}

/// Token response from the client-credentials endpoint (RFC 6749).
#[derive(Debug, Deserialize)]
struct TokenEndpointResponse {
    access_token: String,
    expires_in: Option<i64>,
}

/// Per-system token cache and authenticated-request primitive.
pub struct AuthGateway {
    resolver: Arc<CredentialResolver>,
    http: HttpClient,
    tokens: HashMap<BackendSystem, Mutex<Option<CachedToken>>>,
}

impl AuthGateway {
    /// Create a gateway with empty token slots for all systems.
    pub fn new(resolver: Arc<CredentialResolver>) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(StdDuration::from_secs(TOKEN_ENDPOINT_TIMEOUT_SECS))
            .build()?;

        let tokens =
            BackendSystem::ALL.into_iter().map(|system| (system, Mutex::new(None))).collect();

        Ok(Self { resolver, http, tokens })
    }

    fn slot(&self, system: BackendSystem) -> Result<&Mutex<Option<CachedToken>>> {
        self.tokens.get(&system).ok_or_else(|| {
            StoreBridgeError::Internal(format!("no token slot for system {}", system))
        })
    }

    /// Get a valid access token for the system, fetching a fresh one when
    /// the cached token is absent or within the expiry buffer.
    pub async fn access_token(&self, system: BackendSystem) -> Result<String> {
        let mut guard = self.slot(system)?.lock().await;

        if let Some(token) = guard.as_ref() {
            if !token.is_expired(TOKEN_EXPIRY_BUFFER_SECS) {
                return Ok(token.access_token.clone());
            }
            debug!(%system, "cached token within expiry buffer, refreshing");
        }

        let token = self.fetch_token(system).await?;
        let access_token = token.access_token.clone();
        *guard = Some(token);
        Ok(access_token)
    }

    /// Drop the cached token for a system.
    pub async fn invalidate(&self, system: BackendSystem) -> Result<()> {
        *self.slot(system)?.lock().await = None;
        debug!(%system, "token cache cleared");
        Ok(())
    }

    /// Issue an authenticated request, retrying exactly once on a 401.
    ///
    /// `build` receives the client and the current bearer token and must
    /// produce a fresh request builder each time so the retry can be
    /// re-issued. A second 401 clears the cache and fails with `Auth`.
    pub async fn send_authenticated<F>(
        &self,
        system: BackendSystem,
        http: &HttpClient,
        build: F,
    ) -> Result<Response>
    where
        F: Fn(&HttpClient, &str) -> RequestBuilder + Send + Sync,
    {
        let token = self.access_token(system).await?;
        let response = http.send(build(http, &token)).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        warn!(%system, "request rejected with 401, refreshing token and retrying once");
        self.invalidate(system).await?;

        let fresh = self.access_token(system).await?;
        let retried = http.send(build(http, &fresh)).await?;
        if retried.status() == StatusCode::UNAUTHORIZED {
            self.invalidate(system).await?;
            return Err(StoreBridgeError::Auth(format!(
                "{} rejected the request with 401 twice, token cache cleared",
                system
            )));
        }

        Ok(retried)
    }

    /// Fetch a fresh token from the system's token endpoint.
    async fn fetch_token(&self, system: BackendSystem) -> Result<CachedToken> {
        let creds = self.resolver.resolve(system)?;

        let builder = self
            .http
            .request(reqwest::Method::POST, &creds.token_url)
            .basic_auth(&creds.client_id, Some(&creds.client_secret))
            .form(&[("grant_type", "client_credentials")]);

        let response = self.http.send(builder).await.map_err(|err| {
            StoreBridgeError::Auth(format!("{} token endpoint unreachable: {}", system, err))
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "unknown error".to_string());
            return Err(StoreBridgeError::Auth(format!(
                "{} token endpoint returned HTTP {}: {}",
                system, status, body
            )));
        }

        let parsed: TokenEndpointResponse = response.json().await.map_err(|err| {
            StoreBridgeError::Auth(format!("{} token response unparsable: {}", system, err))
        })?;

        let expires_in = parsed.expires_in.unwrap_or(DEFAULT_TOKEN_TTL_SECS);
        info!(%system, expires_in, "obtained access token");
        Ok(CachedToken::new(parsed.access_token, expires_in))
    }

    /// Seed a token directly (expiry-policy tests).
    #[cfg(test)]
    async fn seed_token(&self, system: BackendSystem, token: CachedToken) {
        if let Ok(slot) = self.slot(system) {
            *slot.lock().await = Some(token);
        }
    }
}
