//! Re-authentication gate for VaultGate.
//!
//! Decides when a secure-storage operation must be preceded by a device
//! credential check, enforces the retry ceiling, and tracks the time-boxed
//! session across app foreground/background transitions. The platform
//! credential UI and rooted-device detection are injected boundaries.

pub mod clock;
pub mod error;
pub mod gate;
pub mod integrity;
pub mod prompt;

pub use clock::AuthClock;
pub use error::{AuthError, Result};
pub use gate::{AuthGate, AuthOrigin, MAX_AUTH_TRIES};
pub use integrity::{integrity_assessment, DeviceEnvironment, FakeDevice, HostEnvironment};
pub use prompt::{CredentialProvider, PromptOutcome, ScriptedCredentialProvider, ScriptedPrompt};
