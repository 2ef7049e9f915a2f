//! Shared fixtures for the integration test binaries.

use std::sync::Arc;

use vaultgate_auth::{FakeDevice, ScriptedCredentialProvider, ScriptedPrompt};
use vaultgate_core::MemoryPreferenceStore;
use vaultgate_gateway::SecurityBridge;
use vaultgate_storage::{MemoryStoreProvider, StoreProvider};

/// A bridge plus handles on its test collaborators.
pub struct BridgeHarness {
    pub bridge: SecurityBridge,
    pub prompts: Arc<ScriptedCredentialProvider>,
    pub device: Arc<FakeDevice>,
    pub prefs: Arc<MemoryPreferenceStore>,
}

/// Assemble a bridge over the given storage engine with a scripted prompt
/// sequence, a trusted device, and in-memory preferences.
pub async fn bridge_over(
    provider: Arc<dyn StoreProvider>,
    script: impl IntoIterator<Item = ScriptedPrompt>,
) -> BridgeHarness {
    let prompts = Arc::new(ScriptedCredentialProvider::new(script));
    let device = FakeDevice::trusted();
    let prefs = Arc::new(MemoryPreferenceStore::new());
    let bridge = SecurityBridge::new(
        provider,
        prompts.clone(),
        device.clone(),
        prefs.clone(),
    )
    .await;
    BridgeHarness {
        bridge,
        prompts,
        device,
        prefs,
    }
}

/// Memory-backed harness, returning the provider for auth-demand scripting.
pub async fn memory_bridge(
    script: impl IntoIterator<Item = ScriptedPrompt>,
) -> (BridgeHarness, Arc<MemoryStoreProvider>) {
    let provider = Arc::new(MemoryStoreProvider::new());
    let harness = bridge_over(provider.clone(), script).await;
    (harness, provider)
}

/// Params for the item-level storage methods, plain mode.
pub fn item_params(alias: &str, key: &str) -> serde_json::Value {
    serde_json::json!({ "alias": alias, "isParanoia": false, "key": key })
}

/// Params for `setItem`/`setupRecoveryPassword`, plain mode.
pub fn value_params(alias: &str, key: &str, value: &str) -> serde_json::Value {
    serde_json::json!({
        "alias": alias, "isParanoia": false, "key": key, "value": value
    })
}
