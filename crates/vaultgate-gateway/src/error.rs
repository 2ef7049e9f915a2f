//! Gateway error types.

use thiserror::Error;
use vaultgate_auth::AuthError;
use vaultgate_storage::{SecureOpError, StoreError};

/// Errors reported to the caller of the method surface.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// A required parameter was absent. Raised before any storage or auth
    /// interaction.
    #[error("Missing parameter: {0}")]
    MissingParameter(&'static str),

    /// Parameters were present but malformed.
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    /// The device failed the integrity assessment.
    #[error("Invalid state")]
    InvalidState,

    /// No value stored under the requested key.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Opaque storage failure, detail passed through stringified.
    #[error("Storage failure: {0}")]
    StorageFailure(String),

    /// The platform reported a failed credential check.
    #[error("Authentication failed")]
    AuthenticationFailed,

    /// User-initiated authentication exceeded the retry ceiling.
    #[error("Maximum authentication retries exceeded (vault)")]
    MaxAuthRetriesVault,

    /// Storage-triggered authentication exceeded the retry ceiling.
    #[error("Maximum authentication retries exceeded (system)")]
    MaxAuthRetriesSystem,

    /// Unknown method name.
    #[error("Method not found: {0}")]
    MethodNotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Stable error code reported across the bridge.
    pub fn code(&self) -> i32 {
        match self {
            Self::MethodNotFound(_) => -32601,
            Self::MissingParameter(_) | Self::InvalidParams(_) => -32602,
            Self::AuthenticationFailed => -32001,
            Self::MaxAuthRetriesVault => -32002,
            Self::MaxAuthRetriesSystem => -32003,
            Self::InvalidState => -32004,
            Self::NotFound(_) => -32005,
            Self::StorageFailure(_) => -32006,
            Self::Internal(_) => -32603,
        }
    }
}

impl From<AuthError> for GatewayError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::AuthenticationFailed => Self::AuthenticationFailed,
            AuthError::MaxRetriesVault => Self::MaxAuthRetriesVault,
            AuthError::MaxRetriesSystem => Self::MaxAuthRetriesSystem,
        }
    }
}

impl From<SecureOpError> for GatewayError {
    fn from(e: SecureOpError) -> Self {
        match e {
            SecureOpError::InvalidState => Self::InvalidState,
            SecureOpError::Auth(auth) => auth.into(),
            SecureOpError::Store(StoreError::NotFound(key)) => Self::NotFound(key),
            SecureOpError::Store(other) => Self::StorageFailure(other.to_string()),
        }
    }
}

impl From<vaultgate_core::Error> for GatewayError {
    fn from(e: vaultgate_core::Error) -> Self {
        Self::Internal(e.to_string())
    }
}

/// Convenience result alias for gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;
