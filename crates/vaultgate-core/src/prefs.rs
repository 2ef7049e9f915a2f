//! Durable security preferences.
//!
//! Defines the [`PreferenceStore`] trait and provides [`FilePreferenceStore`],
//! a JSON-file-backed implementation under `~/.vaultgate/`, plus an in-memory
//! store for tests. Preferences survive process restarts; the only setting
//! today is the automatic-authentication toggle (default `false`).

use std::path::PathBuf;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

/// Key under which the automatic-authentication flag is persisted.
const KEY_AUTOMATIC_AUTHENTICATION: &str = "autoauth";

/// Async trait for durable preference storage.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Whether authentication should be triggered automatically on resume.
    async fn automatic_authentication(&self) -> Result<bool>;

    /// Persist the automatic-authentication toggle.
    async fn set_automatic_authentication(&self, value: bool) -> Result<()>;
}

/// On-disk representation of the preferences file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Preferences {
    #[serde(rename = "autoauth", default)]
    automatic_authentication: bool,
}

/// A JSON-file-backed preference store.
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    /// Create a store persisting to the given file.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Create a store at the default location (`~/.vaultgate/securityutils.json`).
    pub fn from_default_path() -> Result<Self> {
        Ok(Self::new(crate::paths::preferences_file()?))
    }

    async fn load(&self) -> Result<Preferences> {
        if !self.path.exists() {
            return Ok(Preferences::default());
        }
        let data = tokio::fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&data)?)
    }

    async fn save(&self, prefs: &Preferences) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(prefs)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }
}

#[async_trait]
impl PreferenceStore for FilePreferenceStore {
    async fn automatic_authentication(&self) -> Result<bool> {
        Ok(self.load().await?.automatic_authentication)
    }

    async fn set_automatic_authentication(&self, value: bool) -> Result<()> {
        let mut prefs = self.load().await?;
        prefs.automatic_authentication = value;
        debug!(key = KEY_AUTOMATIC_AUTHENTICATION, value, "writing preference");
        self.save(&prefs).await
    }
}

/// An in-memory preference store for tests.
#[derive(Default)]
pub struct MemoryPreferenceStore {
    automatic_authentication: Mutex<bool>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PreferenceStore for MemoryPreferenceStore {
    async fn automatic_authentication(&self) -> Result<bool> {
        Ok(*self.automatic_authentication.lock())
    }

    async fn set_automatic_authentication(&self, value: bool) -> Result<()> {
        *self.automatic_authentication.lock() = value;
        Ok(())
    }
}
