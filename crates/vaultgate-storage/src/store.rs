//! Storage collaborator traits.
//!
//! A [`SecureStore`] is one logical namespace of encrypted values, opened by
//! alias and mode through a [`StoreProvider`]. The dispatcher orchestrates
//! these; it never assumes anything about the engine beyond this contract.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use vaultgate_core::SecretString;

use crate::error::Result;

/// Maximum allowed length for a key or alias.
pub(crate) const MAX_NAME_LEN: usize = 128;

/// Opaque token that lets a user recover a value written with
/// [`SecureStore::write_recoverable_string`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryKey(String);

impl RecoveryKey {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecoveryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One logical secret-storage namespace.
///
/// Engines may demand a fresh device credential check for individual reads
/// and writes by returning [`StoreError::AuthenticationRequired`]; the
/// dispatcher authenticates and retries the same call.
///
/// [`StoreError::AuthenticationRequired`]: crate::error::StoreError::AuthenticationRequired
#[async_trait]
pub trait SecureStore: Send + Sync {
    /// Read and decrypt the value stored under `key`.
    async fn read_string(&self, key: &str) -> Result<SecretString>;

    /// Encrypt and store `value` under `key`, overwriting any existing value.
    async fn write_string(&self, key: &str, value: &str) -> Result<()>;

    /// Like [`write_string`](Self::write_string), additionally producing a
    /// recovery token under which the value can be restored.
    async fn write_recoverable_string(&self, key: &str, value: &str) -> Result<RecoveryKey>;

    /// Remove the value stored under `key`.
    async fn remove_string(&self, key: &str) -> Result<()>;

    /// Initialize paranoia mode for this namespace.
    ///
    /// Calling this on a namespace that already has a paranoia password
    /// fails with [`StoreError::Paranoia`]; silently succeeding could mask a
    /// caller bug that replaced a user's password.
    ///
    /// [`StoreError::Paranoia`]: crate::error::StoreError::Paranoia
    async fn setup_paranoia_password(&self) -> Result<()>;
}

/// Opens stores by alias and performs bulk erase.
#[async_trait]
pub trait StoreProvider: Send + Sync {
    /// Open (creating if necessary) the store for `(alias, is_paranoia)`.
    async fn open(&self, alias: &str, is_paranoia: bool) -> Result<Arc<dyn SecureStore>>;

    /// Erase everything stored under `alias`, both modes. Plain
    /// success/failure; the engine reports no structured reason.
    async fn remove_all(&self, alias: &str) -> bool;

    /// Erase the entire storage root.
    async fn destroy(&self) -> bool;
}

/// Validate a key or alias: non-empty, bounded, filesystem-safe characters.
pub(crate) fn validate_name(name: &str) -> Result<()> {
    use crate::error::StoreError;

    if name.is_empty() {
        return Err(StoreError::InvalidKey("name must not be empty".to_string()));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(StoreError::InvalidKey(format!(
            "name exceeds maximum length of {MAX_NAME_LEN} characters"
        )));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(StoreError::InvalidKey(format!(
            "name contains invalid characters (allowed: alphanumeric, underscore, hyphen): {name}"
        )));
    }
    Ok(())
}
