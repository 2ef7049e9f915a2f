//! Secure storage for VaultGate.
//!
//! Provides the [`SecureStore`]/[`StoreProvider`] collaborator traits, two
//! engines (an AES-256-GCM file store and a scriptable in-memory store), and
//! [`SecureOperations`], the dispatcher that runs every storage request
//! through the device integrity check and the authentication gate.

pub mod crypto;
pub mod dispatcher;
pub mod error;
pub mod fs;
pub mod memory;
pub mod store;

pub use dispatcher::{SecureOpError, SecureOperations};
pub use error::{Result, StoreError};
pub use fs::FileStoreProvider;
pub use memory::{MemorySecureStore, MemoryStoreProvider};
pub use store::{RecoveryKey, SecureStore, StoreProvider};
