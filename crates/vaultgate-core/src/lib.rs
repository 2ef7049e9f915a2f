//! # vaultgate-core
//!
//! Shared types and utilities for VaultGate, the secure-storage and
//! re-authentication gate backing the wallet host:
//!
//! - **Errors**: base error enums shared across the workspace
//! - **Preferences**: durable key-value persistence for security settings
//! - **Secrets**: zero-on-drop string handling for plaintext wallet material
//! - **Paths**: base-directory resolution for on-disk state

pub mod error;
pub mod paths;
pub mod prefs;
pub mod secret;

pub use error::{Error, Result};
pub use prefs::{FilePreferenceStore, MemoryPreferenceStore, PreferenceStore};
pub use secret::SecretString;
