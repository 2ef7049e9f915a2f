//! Secure-operation dispatcher.
//!
//! Every storage request runs through [`SecureOperations`]: device integrity
//! first, then the authentication gate (prompting when the session expired),
//! then the storage engine. When the engine demands a credential check
//! mid-operation the gate is re-entered with [`AuthOrigin::System`] and the
//! same call is retried, bounded by the gate's three-attempt ceiling.

use std::future::Future;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;
use vaultgate_auth::{integrity_assessment, AuthError, AuthGate, AuthOrigin, DeviceEnvironment};
use vaultgate_core::SecretString;

use crate::error::StoreError;
use crate::store::{RecoveryKey, StoreProvider};

/// Errors surfaced by the dispatcher.
#[derive(Debug, Error)]
pub enum SecureOpError {
    /// The device failed the integrity assessment.
    #[error("Invalid state")]
    InvalidState,

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Dispatcher wrapping storage operations with integrity and auth policy.
pub struct SecureOperations {
    provider: Arc<dyn StoreProvider>,
    gate: Arc<AuthGate>,
    device: Arc<dyn DeviceEnvironment>,
}

impl SecureOperations {
    pub fn new(
        provider: Arc<dyn StoreProvider>,
        gate: Arc<AuthGate>,
        device: Arc<dyn DeviceEnvironment>,
    ) -> Self {
        Self {
            provider,
            gate,
            device,
        }
    }

    /// Reject the operation before touching storage or auth when the device
    /// is untrusted. Root state can change at runtime, so this is evaluated
    /// fresh on every call.
    fn assess_integrity(&self) -> Result<(), SecureOpError> {
        if !integrity_assessment(self.device.as_ref()) {
            return Err(SecureOpError::InvalidState);
        }
        Ok(())
    }

    /// Integrity check followed by the session gate. Prompts only when the
    /// session has expired or was invalidated.
    async fn admit(&self) -> Result<(), SecureOpError> {
        self.assess_integrity()?;
        self.gate.authenticate_or_continue(AuthOrigin::Vault).await?;
        Ok(())
    }

    /// Run `op`, authenticating and retrying when the engine demands it.
    ///
    /// The engine supplies the attempt number; a local count keeps the loop
    /// bounded even if an engine repeats attempt numbers.
    async fn with_auth_retry<T, F, Fut>(&self, mut op: F) -> Result<T, SecureOpError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = crate::error::Result<T>>,
    {
        let mut seen = 0u32;
        loop {
            match op().await {
                Err(StoreError::AuthenticationRequired { attempt }) => {
                    seen += 1;
                    let attempt = attempt.max(seen);
                    debug!(attempt, "storage demanded re-authentication");
                    self.gate.authenticate(AuthOrigin::System, attempt).await?;
                }
                other => return Ok(other?),
            }
        }
    }

    /// Read the value stored under `(alias, is_paranoia, key)`.
    pub async fn read(
        &self,
        alias: &str,
        is_paranoia: bool,
        key: &str,
    ) -> Result<SecretString, SecureOpError> {
        self.admit().await?;
        let store = self.provider.open(alias, is_paranoia).await?;
        self.with_auth_retry(|| store.read_string(key)).await
    }

    /// Write `value` under `(alias, is_paranoia, key)`, overwriting.
    pub async fn write(
        &self,
        alias: &str,
        is_paranoia: bool,
        key: &str,
        value: &str,
    ) -> Result<(), SecureOpError> {
        self.admit().await?;
        let store = self.provider.open(alias, is_paranoia).await?;
        self.with_auth_retry(|| store.write_string(key, value)).await
    }

    /// Remove the value under `(alias, is_paranoia, key)`. No mid-operation
    /// auth-retry path; engines do not demand re-authentication for deletes.
    pub async fn remove(
        &self,
        alias: &str,
        is_paranoia: bool,
        key: &str,
    ) -> Result<(), SecureOpError> {
        self.admit().await?;
        let store = self.provider.open(alias, is_paranoia).await?;
        Ok(store.remove_string(key).await?)
    }

    /// Erase everything stored under `alias`. Erase stays available even on
    /// devices that fail the integrity assessment.
    pub async fn remove_all(&self, alias: &str) -> Result<(), SecureOpError> {
        if !self.provider.remove_all(alias).await {
            return Err(StoreError::Failure("removeAll: failure".to_string()).into());
        }
        Ok(())
    }

    /// Erase the entire storage root.
    pub async fn destroy(&self) -> Result<(), SecureOpError> {
        if !self.provider.destroy().await {
            return Err(StoreError::Failure("destroy: failure".to_string()).into());
        }
        Ok(())
    }

    /// Initialize paranoia mode for `alias`. Fails on re-setup.
    pub async fn setup_paranoia_password(
        &self,
        alias: &str,
        is_paranoia: bool,
    ) -> Result<(), SecureOpError> {
        self.admit().await?;
        let store = self.provider.open(alias, is_paranoia).await?;
        Ok(store.setup_paranoia_password().await?)
    }

    /// Write a value and return the engine-generated recovery token.
    pub async fn setup_recovery_password(
        &self,
        alias: &str,
        is_paranoia: bool,
        key: &str,
        value: &str,
    ) -> Result<RecoveryKey, SecureOpError> {
        self.admit().await?;
        let store = self.provider.open(alias, is_paranoia).await?;
        self.with_auth_retry(|| store.write_recoverable_string(key, value))
            .await
    }
}
