//! In-memory storage engine.
//!
//! Process-lifetime map used by tests and by hosts without a filesystem.
//! Per-item authentication demands can be scripted to exercise the
//! dispatcher's re-auth retry path, standing in for a platform keystore
//! that requires a credential check per use.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::debug;
use vaultgate_core::SecretString;

use crate::error::{Result, StoreError};
use crate::store::{validate_name, RecoveryKey, SecureStore, StoreProvider};

#[derive(Debug, Default)]
struct AuthScript {
    remaining: u32,
    attempts: u32,
}

/// One in-memory namespace.
pub struct MemorySecureStore {
    is_paranoia: bool,
    paranoia_configured: AtomicBool,
    values: Mutex<HashMap<String, String>>,
    auth_scripts: Mutex<HashMap<String, AuthScript>>,
}

impl MemorySecureStore {
    pub fn new(is_paranoia: bool) -> Self {
        Self {
            is_paranoia,
            paranoia_configured: AtomicBool::new(false),
            values: Mutex::new(HashMap::new()),
            auth_scripts: Mutex::new(HashMap::new()),
        }
    }

    /// Script the next `times` reads/writes of `key` to demand a credential
    /// check, with monotonically increasing attempt numbers.
    pub fn demand_auth(&self, key: &str, times: u32) {
        self.auth_scripts
            .lock()
            .entry(key.to_string())
            .or_default()
            .remaining += times;
    }

    fn check_auth(&self, key: &str) -> Result<()> {
        let mut scripts = self.auth_scripts.lock();
        if let Some(script) = scripts.get_mut(key) {
            if script.remaining > 0 {
                script.remaining -= 1;
                script.attempts += 1;
                return Err(StoreError::AuthenticationRequired {
                    attempt: script.attempts,
                });
            }
        }
        Ok(())
    }

    fn check_mode(&self) -> Result<()> {
        if self.is_paranoia && !self.paranoia_configured.load(Ordering::SeqCst) {
            return Err(StoreError::Paranoia(
                "paranoia password not configured".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl SecureStore for MemorySecureStore {
    async fn read_string(&self, key: &str) -> Result<SecretString> {
        self.check_mode()?;
        self.check_auth(key)?;
        self.values
            .lock()
            .get(key)
            .map(SecretString::new)
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    async fn write_string(&self, key: &str, value: &str) -> Result<()> {
        self.check_mode()?;
        self.check_auth(key)?;
        self.values.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn write_recoverable_string(&self, key: &str, value: &str) -> Result<RecoveryKey> {
        self.check_mode()?;
        self.check_auth(key)?;
        self.values.lock().insert(key.to_string(), value.to_string());
        Ok(RecoveryKey::new(uuid::Uuid::new_v4().to_string()))
    }

    async fn remove_string(&self, key: &str) -> Result<()> {
        self.check_mode()?;
        self.values.lock().remove(key);
        Ok(())
    }

    async fn setup_paranoia_password(&self) -> Result<()> {
        if self.paranoia_configured.swap(true, Ordering::SeqCst) {
            return Err(StoreError::Paranoia(
                "paranoia password already configured".to_string(),
            ));
        }
        Ok(())
    }
}

/// Provider handing out [`MemorySecureStore`] namespaces.
#[derive(Default)]
pub struct MemoryStoreProvider {
    stores: Mutex<HashMap<(String, bool), Arc<MemorySecureStore>>>,
    fail_bulk_ops: AtomicBool,
    opens: AtomicUsize,
}

impl MemoryStoreProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `remove_all` and `destroy` report failure, for error-path tests.
    pub fn fail_bulk_ops(&self, value: bool) {
        self.fail_bulk_ops.store(value, Ordering::SeqCst);
    }

    /// How many times a store has been opened.
    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    /// Direct handle to a namespace, for scripting auth demands in tests.
    pub fn store(&self, alias: &str, is_paranoia: bool) -> Arc<MemorySecureStore> {
        self.stores
            .lock()
            .entry((alias.to_string(), is_paranoia))
            .or_insert_with(|| Arc::new(MemorySecureStore::new(is_paranoia)))
            .clone()
    }
}

#[async_trait]
impl StoreProvider for MemoryStoreProvider {
    async fn open(&self, alias: &str, is_paranoia: bool) -> Result<Arc<dyn SecureStore>> {
        validate_name(alias)?;
        self.opens.fetch_add(1, Ordering::SeqCst);
        Ok(self.store(alias, is_paranoia))
    }

    async fn remove_all(&self, alias: &str) -> bool {
        if self.fail_bulk_ops.load(Ordering::SeqCst) {
            return false;
        }
        let mut stores = self.stores.lock();
        stores.remove(&(alias.to_string(), false));
        stores.remove(&(alias.to_string(), true));
        debug!(alias, "removed all values for alias");
        true
    }

    async fn destroy(&self) -> bool {
        if self.fail_bulk_ops.load(Ordering::SeqCst) {
            return false;
        }
        self.stores.lock().clear();
        debug!("destroyed storage root");
        true
    }
}
