//! The security bridge facade.
//!
//! Owns the gate, the dispatcher, and the method registry; the host wires in
//! its storage engine, credential provider, device environment, and
//! preference store, then forwards plugin calls and app lifecycle events
//! here.

use std::sync::Arc;

use tracing::warn;
use vaultgate_auth::{AuthGate, AuthOrigin, CredentialProvider, DeviceEnvironment};
use vaultgate_core::PreferenceStore;
use vaultgate_storage::{SecureOperations, StoreProvider};

use crate::error::Result;
use crate::handlers::{self, HandlerContext};
use crate::methods::MethodRegistry;

/// In-process plugin bridge for the wallet host.
pub struct SecurityBridge {
    registry: MethodRegistry,
    gate: Arc<AuthGate>,
    prefs: Arc<dyn PreferenceStore>,
}

impl SecurityBridge {
    /// Assemble a bridge from the host-provided collaborators.
    pub async fn new(
        provider: Arc<dyn StoreProvider>,
        credential: Arc<dyn CredentialProvider>,
        device: Arc<dyn DeviceEnvironment>,
        prefs: Arc<dyn PreferenceStore>,
    ) -> Self {
        let gate = Arc::new(AuthGate::new(credential));
        let ops = SecureOperations::new(provider, gate.clone(), device.clone());

        let registry = MethodRegistry::new();
        handlers::register_all(
            &registry,
            HandlerContext {
                ops,
                gate: gate.clone(),
                device,
                prefs: prefs.clone(),
            },
        )
        .await;

        Self {
            registry,
            gate,
            prefs,
        }
    }

    /// Dispatch one plugin call.
    pub async fn call(
        &self,
        method: &str,
        params: Option<serde_json::Value>,
    ) -> Result<serde_json::Value> {
        self.registry.call(method, params).await
    }

    /// App went to the background: start the invalidation clock.
    pub fn handle_pause(&self) {
        self.gate.note_backgrounded();
    }

    /// App came to the foreground: when the automatic-authentication
    /// preference is on, run the gate right away. Failures are logged, not
    /// surfaced; the next secure operation re-prompts anyway.
    pub async fn handle_resume(&self) {
        let automatic = self
            .prefs
            .automatic_authentication()
            .await
            .unwrap_or(false);
        if !automatic {
            return;
        }
        if let Err(e) = self.gate.authenticate_or_continue(AuthOrigin::Vault).await {
            warn!("automatic authentication on resume failed: {e}");
        }
    }

    /// The gate, for hosts that need direct session queries.
    pub fn gate(&self) -> &Arc<AuthGate> {
        &self.gate
    }

    /// Registered method names.
    pub async fn methods(&self) -> Vec<String> {
        self.registry.list().await
    }
}
