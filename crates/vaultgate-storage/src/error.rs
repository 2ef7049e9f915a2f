//! Error types for secure storage engines.

use thiserror::Error;

/// Errors reported by a storage engine.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No value stored under the key.
    #[error("Key not found: {0}")]
    NotFound(String),

    /// The engine demands a fresh device credential check before it will
    /// perform this operation. Carries the engine's attempt number; the
    /// dispatcher re-enters the gate and retries the same call.
    #[error("Authentication required (attempt {attempt})")]
    AuthenticationRequired { attempt: u32 },

    /// Paranoia mode was used before its password was set up, or set up twice.
    #[error("Paranoia password error: {0}")]
    Paranoia(String),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    /// Opaque engine failure with no structured reason.
    #[error("Storage failure: {0}")]
    Failure(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience result alias for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;
