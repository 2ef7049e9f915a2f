//! File-backed storage engine.
//!
//! Each `(alias, mode)` namespace is a directory under the storage root;
//! every value is an individual JSON file holding AES-256-GCM ciphertext.
//! Files are created with mode `0600` on Unix. This engine is host-neutral:
//! it never demands per-item re-authentication (that behavior belongs to
//! platform keystores, which the host wires in through its own
//! [`SecureStore`] implementation).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use vaultgate_core::SecretString;

use crate::crypto;
use crate::error::{Result, StoreError};
use crate::store::{validate_name, RecoveryKey, SecureStore, StoreProvider};

/// Marker file recording that a paranoia password has been set up.
const PARANOIA_MARKER: &str = ".paranoia-configured";

/// On-disk representation of one encrypted value.
#[derive(Debug, Serialize, Deserialize)]
struct StoredValue {
    /// AES-256-GCM ciphertext, base64-encoded.
    encrypted_value: String,
    /// HKDF salt, hex-encoded.
    salt: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Write `data` to `path` with mode 0600 on Unix.
async fn write_value_file(path: &Path, data: &[u8]) -> Result<()> {
    tokio::fs::write(path, data).await?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        tokio::fs::set_permissions(path, perms).await?;
    }

    Ok(())
}

/// One file-backed namespace.
pub struct FileSecureStore {
    dir: PathBuf,
    master_key: Vec<u8>,
    is_paranoia: bool,
}

impl FileSecureStore {
    fn value_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn recovery_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.recovery.json"))
    }

    fn marker_path(&self) -> PathBuf {
        self.dir.join(PARANOIA_MARKER)
    }

    async fn ensure_dir(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o700);
            tokio::fs::set_permissions(&self.dir, perms).await?;
        }

        Ok(())
    }

    fn check_mode(&self) -> Result<()> {
        if self.is_paranoia && !self.marker_path().exists() {
            return Err(StoreError::Paranoia(
                "paranoia password not configured".to_string(),
            ));
        }
        Ok(())
    }

    async fn encrypt_to(&self, path: &Path, master_key: &[u8], value: &str) -> Result<()> {
        let (encrypted, salt) = crypto::encrypt(master_key, value.as_bytes())?;

        let created_at = match tokio::fs::read_to_string(path).await {
            Ok(data) => serde_json::from_str::<StoredValue>(&data)
                .map(|v| v.created_at)
                .unwrap_or_else(|_| Utc::now()),
            Err(_) => Utc::now(),
        };

        let stored = StoredValue {
            encrypted_value: base64::Engine::encode(
                &base64::engine::general_purpose::STANDARD,
                &encrypted,
            ),
            salt: hex::encode(&salt),
            created_at,
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string_pretty(&stored)?;
        write_value_file(path, json.as_bytes()).await
    }

    async fn decrypt_from(&self, path: &Path, master_key: &[u8], key: &str) -> Result<SecretString> {
        if !path.exists() {
            return Err(StoreError::NotFound(key.to_string()));
        }

        let data = tokio::fs::read_to_string(path).await?;
        let stored: StoredValue = serde_json::from_str(&data)?;

        let encrypted = base64::Engine::decode(
            &base64::engine::general_purpose::STANDARD,
            &stored.encrypted_value,
        )
        .map_err(|e| StoreError::DecryptionFailed(format!("base64 decode failed: {e}")))?;
        let salt = hex::decode(&stored.salt)
            .map_err(|e| StoreError::DecryptionFailed(format!("hex decode failed: {e}")))?;

        let plaintext = crypto::decrypt(master_key, &encrypted, &salt)?;
        let value = String::from_utf8(plaintext)
            .map_err(|e| StoreError::DecryptionFailed(format!("invalid UTF-8: {e}")))?;
        Ok(SecretString::new(value))
    }
}

#[async_trait]
impl SecureStore for FileSecureStore {
    async fn read_string(&self, key: &str) -> Result<SecretString> {
        validate_name(key)?;
        self.check_mode()?;

        debug!(key, dir = %self.dir.display(), "reading value");
        self.decrypt_from(&self.value_path(key), &self.master_key, key)
            .await
    }

    async fn write_string(&self, key: &str, value: &str) -> Result<()> {
        validate_name(key)?;
        self.check_mode()?;
        self.ensure_dir().await?;

        debug!(key, dir = %self.dir.display(), "writing value");
        self.encrypt_to(&self.value_path(key), &self.master_key, value)
            .await
    }

    async fn write_recoverable_string(&self, key: &str, value: &str) -> Result<RecoveryKey> {
        self.write_string(key, value).await?;

        // A second copy is encrypted under the recovery token itself, so the
        // value stays restorable when the master key is lost.
        let token = uuid::Uuid::new_v4().to_string();
        self.encrypt_to(&self.recovery_path(key), token.as_bytes(), value)
            .await?;

        debug!(key, "wrote recoverable value");
        Ok(RecoveryKey::new(token))
    }

    async fn remove_string(&self, key: &str) -> Result<()> {
        validate_name(key)?;
        self.check_mode()?;

        for path in [self.value_path(key), self.recovery_path(key)] {
            if path.exists() {
                tokio::fs::remove_file(&path).await?;
            }
        }
        debug!(key, "removed value");
        Ok(())
    }

    async fn setup_paranoia_password(&self) -> Result<()> {
        self.ensure_dir().await?;

        let marker = self.marker_path();
        if marker.exists() {
            return Err(StoreError::Paranoia(
                "paranoia password already configured".to_string(),
            ));
        }
        write_value_file(&marker, b"{}").await?;
        debug!(dir = %self.dir.display(), "paranoia password configured");
        Ok(())
    }
}

/// Provider rooting file stores under a single directory.
pub struct FileStoreProvider {
    root: PathBuf,
    master_key: Vec<u8>,
}

impl FileStoreProvider {
    /// Create a provider rooted at `root`, encrypting with `master_key`.
    ///
    /// The master key is host-supplied (typically unwrapped by the platform
    /// keystore, which is outside this crate).
    pub fn new(root: PathBuf, master_key: Vec<u8>) -> Self {
        Self { root, master_key }
    }

    /// Create a provider at the default location (`~/.vaultgate/storage`).
    pub fn from_default_path(master_key: Vec<u8>) -> Result<Self> {
        let root = vaultgate_core::paths::storage_dir()
            .map_err(|e| StoreError::Failure(e.to_string()))?;
        Ok(Self::new(root, master_key))
    }

    fn alias_dir(&self, alias: &str, is_paranoia: bool) -> PathBuf {
        let mode = if is_paranoia { "paranoia" } else { "default" };
        self.root.join(alias).join(mode)
    }
}

#[async_trait]
impl StoreProvider for FileStoreProvider {
    async fn open(&self, alias: &str, is_paranoia: bool) -> Result<Arc<dyn SecureStore>> {
        validate_name(alias)?;
        Ok(Arc::new(FileSecureStore {
            dir: self.alias_dir(alias, is_paranoia),
            master_key: self.master_key.clone(),
            is_paranoia,
        }))
    }

    async fn remove_all(&self, alias: &str) -> bool {
        if validate_name(alias).is_err() {
            return false;
        }
        let dir = self.root.join(alias);
        if !dir.exists() {
            return true;
        }
        match tokio::fs::remove_dir_all(&dir).await {
            Ok(()) => {
                debug!(alias, "removed all values for alias");
                true
            }
            Err(e) => {
                warn!(alias, "removeAll failed: {e}");
                false
            }
        }
    }

    async fn destroy(&self) -> bool {
        if !self.root.exists() {
            return true;
        }
        match tokio::fs::remove_dir_all(&self.root).await {
            Ok(()) => {
                debug!(root = %self.root.display(), "destroyed storage root");
                true
            }
            Err(e) => {
                warn!("destroy failed: {e}");
                false
            }
        }
    }
}
