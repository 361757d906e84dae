//! Backend system identity and credentials

use std::fmt;

use serde::{Deserialize, Serialize};

/// The three OAuth-protected backend systems the orchestration layer talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BackendSystem {
    /// Pricing / promotion service
    Opps,
    /// Sourcing / availability service
    Omsa,
    /// Order management / fulfillment service
    Omf,
}

impl BackendSystem {
    /// All systems, in resolution order.
    pub const ALL: [BackendSystem; 3] =
        [BackendSystem::Opps, BackendSystem::Omsa, BackendSystem::Omf];

    /// Uppercase prefix used for environment-variable lookup
    /// (`OPPS_CLIENT_ID`, `OMSA_TOKEN_URL`, ...).
    pub fn env_prefix(&self) -> &'static str {
        match self {
            Self::Opps => "OPPS",
            Self::Omsa => "OMSA",
            Self::Omf => "OMF",
        }
    }

    /// Well-known bound-service descriptor name (`<system>-credentials`).
    pub fn service_name(&self) -> &'static str {
        match self {
            Self::Opps => "opps-credentials",
            Self::Omsa => "omsa-credentials",
            Self::Omf => "omf-credentials",
        }
    }

    /// Whether bound-service descriptors are consulted before the
    /// environment. OMF is provisioned through the environment only.
    pub fn uses_bound_services(&self) -> bool {
        matches!(self, Self::Opps | Self::Omsa)
    }
}

impl fmt::Display for BackendSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.env_prefix())
    }
}

/// OAuth client-credentials configuration for one backend system.
///
/// Immutable once resolved for the process lifetime; the resolver re-resolves
/// lazily only when a system has never been resolved successfully.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub token_url: String,
    pub base_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_prefix_and_service_name_are_consistent() {
        for system in BackendSystem::ALL {
            assert_eq!(system.service_name(), format!("{}-credentials", system.env_prefix().to_lowercase()));
        }
    }

    #[test]
    fn only_opps_and_omsa_use_bound_services() {
        assert!(BackendSystem::Opps.uses_bound_services());
        assert!(BackendSystem::Omsa.uses_bound_services());
        assert!(!BackendSystem::Omf.uses_bound_services());
    }
}
