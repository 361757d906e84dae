//! Per-system OAuth credential resolution
//!
//! Resolves client id/secret, token URL and base URL for each backend system
//! (OPPS, OMSA, OMF).
//!
//! ## Resolution strategy
//! 1. For OPPS and OMSA: a bound-service descriptor from the `VCAP_SERVICES`
//!    environment variable, matched by the well-known service name
//!    `<system>-credentials`. A missing variable, a parse error or an absent
//!    entry falls through silently.
//! 2. Environment variables `<SYSTEM>_CLIENT_ID`, `<SYSTEM>_CLIENT_SECRET`,
//!    `<SYSTEM>_TOKEN_URL`, `<SYSTEM>_BASE_URL`. OMF is env-only.
//!
//! All four fields must be non-empty; validation failures name exactly the
//! missing fields. Successfully resolved credentials are cached for the
//! process lifetime and re-resolved only while resolution keeps failing.

use std::collections::HashMap;
use std::sync::RwLock;

use serde_json::Value;
use storebridge_domain::{BackendSystem, Result, StoreBridgeError, SystemCredentials};
use tracing::{debug, warn};

/// Environment variable holding bound-service descriptors (JSON).
const BOUND_SERVICES_VAR: &str = "VCAP_SERVICES";

/// Resolves and caches backend credentials.
pub struct CredentialResolver {
    cache: RwLock<HashMap<BackendSystem, SystemCredentials>>,
}

impl CredentialResolver {
    /// Create a resolver with an empty cache.
    pub fn new() -> Self {
        Self { cache: RwLock::new(HashMap::new()) }
    }

    /// Create a resolver pre-populated with fixed credentials. Entries never
    /// expire, so neither bound services nor the environment are consulted
    /// for the seeded systems.
    pub fn with_credentials(
        entries: impl IntoIterator<Item = (BackendSystem, SystemCredentials)>,
    ) -> Self {
        Self { cache: RwLock::new(entries.into_iter().collect()) }
    }

    /// Resolve credentials for one system, consulting the cache first.
    pub fn resolve(&self, system: BackendSystem) -> Result<SystemCredentials> {
        if let Ok(cache) = self.cache.read() {
            if let Some(creds) = cache.get(&system) {
                return Ok(creds.clone());
            }
        }

        let creds = self.resolve_uncached(system)?;

        if let Ok(mut cache) = self.cache.write() {
            cache.insert(system, creds.clone());
        }
        Ok(creds)
    }

    fn resolve_uncached(&self, system: BackendSystem) -> Result<SystemCredentials> {
        let creds = if system.uses_bound_services() {
            match from_bound_services(system) {
                Some(creds) => {
                    debug!(%system, "credentials resolved from bound service descriptor");
                    creds
                }
                None => from_env(system),
            }
        } else {
            from_env(system)
        };

        validate(system, &creds)?;
        Ok(creds)
    }
}

impl Default for CredentialResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Look up the `<system>-credentials` entry across all bound-service arrays.
/// Any miss or parse problem yields `None` so the env fallback applies.
fn from_bound_services(system: BackendSystem) -> Option<SystemCredentials> {
    let raw = std::env::var(BOUND_SERVICES_VAR).ok()?;
    let parsed: Value = match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(err) => {
            warn!(%system, error = %err, "failed to parse bound service descriptors");
            return None;
        }
    };

    let entry = parsed
        .as_object()?
        .values()
        .filter_map(Value::as_array)
        .flatten()
        .find(|service| {
            service.get("name").and_then(Value::as_str) == Some(system.service_name())
        })?;

    let credentials = entry.get("credentials")?;
    let field = |keys: &[&str]| -> String {
        keys.iter()
            .find_map(|key| credentials.get(*key).and_then(Value::as_str))
            .unwrap_or_default()
            .to_string()
    };

    Some(SystemCredentials {
        client_id: field(&["clientId", "clientid"]),
        client_secret: field(&["clientSecret", "clientsecret"]),
        token_url: field(&["tokenUrl", "url"]),
        base_url: field(&["baseUrl", "endpoint"]),
    })
}

/// Environment lookup; absent variables resolve to empty strings so that the
/// validation step can report them by name.
fn from_env(system: BackendSystem) -> SystemCredentials {
    let prefix = system.env_prefix();
    let var = |suffix: &str| std::env::var(format!("{}_{}", prefix, suffix)).unwrap_or_default();

    SystemCredentials {
        client_id: var("CLIENT_ID"),
        client_secret: var("CLIENT_SECRET"),
        token_url: var("TOKEN_URL"),
        base_url: var("BASE_URL"),
    }
}

/// Require all four fields to be non-empty, naming the absent ones.
fn validate(system: BackendSystem, creds: &SystemCredentials) -> Result<()> {
    let prefix = system.env_prefix();
    let mut missing = Vec::new();

    if creds.client_id.trim().is_empty() {
        missing.push(format!("{}_CLIENT_ID", prefix));
    }
    if creds.client_secret.trim().is_empty() {
        missing.push(format!("{}_CLIENT_SECRET", prefix));
    }
    if creds.token_url.trim().is_empty() {
        missing.push(format!("{}_TOKEN_URL", prefix));
    }
    if creds.base_url.trim().is_empty() {
        missing.push(format!("{}_BASE_URL", prefix));
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(StoreBridgeError::Config(format!(
            "{} credentials incomplete, missing: {}",
            system,
            missing.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use once_cell::sync::Lazy;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    fn clear_system_env(prefix: &str) {
        for suffix in ["CLIENT_ID", "CLIENT_SECRET", "TOKEN_URL", "BASE_URL"] {
            std::env::remove_var(format!("{}_{}", prefix, suffix));
        }
    }

    fn set_system_env(prefix: &str) {
        std::env::set_var(format!("{}_CLIENT_ID", prefix), "client");
        std::env::set_var(format!("{}_CLIENT_SECRET", prefix), "secret");
        std::env::set_var(format!("{}_TOKEN_URL", prefix), "https://auth.example.com/oauth/token");
        std::env::set_var(format!("{}_BASE_URL", prefix), "https://api.example.com");
    }

    #[test]
    fn resolves_from_environment() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        std::env::remove_var(BOUND_SERVICES_VAR);
        set_system_env("OMF");

        let resolver = CredentialResolver::new();
        let creds = resolver.resolve(BackendSystem::Omf).expect("credentials");

        assert_eq!(creds.client_id, "client");
        assert_eq!(creds.base_url, "https://api.example.com");

        clear_system_env("OMF");
    }

    #[test]
    fn missing_fields_are_named_exactly() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        std::env::remove_var(BOUND_SERVICES_VAR);
        clear_system_env("OMSA");
        std::env::set_var("OMSA_CLIENT_ID", "client");
        std::env::set_var("OMSA_BASE_URL", "https://api.example.com");

        let resolver = CredentialResolver::new();
        let err = resolver.resolve(BackendSystem::Omsa).expect_err("should fail");

        match err {
            StoreBridgeError::Config(message) => {
                assert!(message.contains("OMSA_CLIENT_SECRET"));
                assert!(message.contains("OMSA_TOKEN_URL"));
                assert!(!message.contains("OMSA_CLIENT_ID,"));
                assert!(!message.contains("OMSA_BASE_URL"));
            }
            other => panic!("expected config error, got {:?}", other),
        }

        clear_system_env("OMSA");
    }

    #[test]
    fn bound_service_descriptor_wins_for_opps() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_system_env("OPPS");
        std::env::set_var(
            BOUND_SERVICES_VAR,
            serde_json::json!({
                "user-provided": [{
                    "name": "opps-credentials",
                    "credentials": {
                        "clientId": "bound-client",
                        "clientSecret": "bound-secret",
                        "url": "https://bound.example.com/oauth/token",
                        "baseUrl": "https://bound.example.com"
                    }
                }]
            })
            .to_string(),
        );

        let resolver = CredentialResolver::new();
        let creds = resolver.resolve(BackendSystem::Opps).expect("credentials");

        assert_eq!(creds.client_id, "bound-client");
        assert_eq!(creds.token_url, "https://bound.example.com/oauth/token");

        std::env::remove_var(BOUND_SERVICES_VAR);
    }

    #[test]
    fn malformed_descriptor_falls_back_to_environment() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        std::env::set_var(BOUND_SERVICES_VAR, "{not json");
        set_system_env("OPPS");

        let resolver = CredentialResolver::new();
        let creds = resolver.resolve(BackendSystem::Opps).expect("credentials");

        assert_eq!(creds.client_id, "client");

        std::env::remove_var(BOUND_SERVICES_VAR);
        clear_system_env("OPPS");
    }

    #[test]
    fn successful_resolution_is_cached() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        std::env::remove_var(BOUND_SERVICES_VAR);
        set_system_env("OMF");

        let resolver = CredentialResolver::new();
        resolver.resolve(BackendSystem::Omf).expect("credentials");

        // Environment changes no longer affect the cached entry.
        clear_system_env("OMF");
        let creds = resolver.resolve(BackendSystem::Omf).expect("cached credentials");
        assert_eq!(creds.client_id, "client");
    }
}
