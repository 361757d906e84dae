//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for StoreBridge
#[derive(Error, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum StoreBridgeError {
    /// Missing or invalid credentials / base URL. Fatal for the affected
    /// system's operations until corrected.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Token endpoint failure or repeated 401 from a backend.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Timeout, transport failure or 5xx on a read path.
    #[error("Network error: {0}")]
    Network(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Order POST failure. Carries the backend error code when the response
    /// body contained one. Never substituted with fallback data.
    #[error("Order submission failed: {message}")]
    OrderSubmission { code: Option<String>, message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl StoreBridgeError {
    /// Build an order submission error without a backend code.
    pub fn order_submission(message: impl Into<String>) -> Self {
        Self::OrderSubmission { code: None, message: message.into() }
    }
}

/// Result type alias for StoreBridge operations
pub type Result<T> = std::result::Result<T, StoreBridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_submission_error_carries_backend_code() {
        let err = StoreBridgeError::OrderSubmission {
            code: Some("OMF-4711".to_string()),
            message: "duplicate external number".to_string(),
        };

        let rendered = err.to_string();
        assert!(rendered.contains("duplicate external number"));
        match err {
            StoreBridgeError::OrderSubmission { code, .. } => {
                assert_eq!(code.as_deref(), Some("OMF-4711"));
            }
            other => panic!("expected order submission error, got {:?}", other),
        }
    }

    #[test]
    fn errors_serialize_with_type_tag() {
        let err = StoreBridgeError::Config("missing OPPS_CLIENT_ID".to_string());
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["type"], "Config");
        assert_eq!(json["message"], "missing OPPS_CLIENT_ID");
    }
}
