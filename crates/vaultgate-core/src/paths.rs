//! Path resolution utilities.

use crate::error::{Error, Result};
use std::path::PathBuf;

/// Get the VaultGate base directory (~/.vaultgate).
pub fn base_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or(Error::NoHomeDir)?;
    Ok(home.join(".vaultgate"))
}

/// Get the security preferences file path (~/.vaultgate/securityutils.json).
pub fn preferences_file() -> Result<PathBuf> {
    Ok(base_dir()?.join("securityutils.json"))
}

/// Get the secure storage root (~/.vaultgate/storage).
pub fn storage_dir() -> Result<PathBuf> {
    Ok(base_dir()?.join("storage"))
}
