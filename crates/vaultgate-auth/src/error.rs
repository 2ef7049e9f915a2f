//! Error types for the authentication gate.

use thiserror::Error;

/// Errors produced by the authentication gate.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// The platform reported a failed credential check.
    #[error("Authentication failed")]
    AuthenticationFailed,

    /// User-initiated authentication exceeded the retry ceiling.
    #[error("Maximum authentication retries exceeded (vault)")]
    MaxRetriesVault,

    /// Storage-triggered authentication exceeded the retry ceiling.
    #[error("Maximum authentication retries exceeded (system)")]
    MaxRetriesSystem,
}

/// Convenience result alias for gate operations.
pub type Result<T> = std::result::Result<T, AuthError>;
