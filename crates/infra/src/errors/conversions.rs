//! Conversions from external infrastructure errors into domain errors.

use reqwest::Error as HttpError;
use storebridge_domain::StoreBridgeError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub StoreBridgeError);

impl From<InfraError> for StoreBridgeError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<StoreBridgeError> for InfraError {
    fn from(value: StoreBridgeError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoStoreBridgeError {
    fn into_storebridge(self) -> StoreBridgeError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → StoreBridgeError */
/* -------------------------------------------------------------------------- */

impl IntoStoreBridgeError for HttpError {
    fn into_storebridge(self) -> StoreBridgeError {
        if self.is_timeout() {
            return StoreBridgeError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return StoreBridgeError::Network("HTTP connection failure".into());
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 | 403 => StoreBridgeError::Auth(message),
                404 => StoreBridgeError::NotFound(message),
                429 => StoreBridgeError::Network(message),
                400..=499 => StoreBridgeError::InvalidInput(message),
                500..=599 => StoreBridgeError::Network(message),
                _ => StoreBridgeError::Network(message),
            };
        }

        StoreBridgeError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_storebridge())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
