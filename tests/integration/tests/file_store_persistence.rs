//! Bridge flows over the file-backed storage engine.

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::json;
use tempfile::TempDir;
use vaultgate_auth::ScriptedPrompt;
use vaultgate_gateway::GatewayError;
use vaultgate_integration_tests::{bridge_over, item_params, value_params, BridgeHarness};
use vaultgate_storage::{crypto, FileStoreProvider};

async fn file_bridge(
    root: PathBuf,
    master_key: Vec<u8>,
    script: impl IntoIterator<Item = ScriptedPrompt>,
) -> BridgeHarness {
    bridge_over(Arc::new(FileStoreProvider::new(root, master_key)), script).await
}

#[tokio::test]
async fn test_values_survive_process_restart() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("storage");
    let master_key = crypto::generate_master_key();

    let h = file_bridge(root.clone(), master_key.clone(), [ScriptedPrompt::Confirm]).await;
    h.bridge
        .call("setItem", Some(value_params("wallet1", "seed", "durable")))
        .await
        .unwrap();
    drop(h);

    // Fresh bridge, fresh gate: the restart forgets the session but not the data.
    let h = file_bridge(root, master_key, [ScriptedPrompt::Confirm]).await;
    let result = h
        .bridge
        .call("getItem", Some(item_params("wallet1", "seed")))
        .await
        .unwrap();
    assert_eq!(result["value"], "durable");
    assert_eq!(h.prompts.prompts_shown(), 1, "restart required a new prompt");
}

#[tokio::test]
async fn test_values_are_ciphertext_on_disk() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("storage");

    let h = file_bridge(root.clone(), crypto::generate_master_key(), [ScriptedPrompt::Confirm])
        .await;
    h.bridge
        .call("setItem", Some(value_params("wallet1", "seed", "plaintext-marker")))
        .await
        .unwrap();

    let raw = std::fs::read_to_string(root.join("wallet1/default/seed.json")).unwrap();
    assert!(!raw.contains("plaintext-marker"));
}

#[tokio::test]
async fn test_destroy_wipes_the_storage_root() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("storage");

    let h = file_bridge(root.clone(), crypto::generate_master_key(), [ScriptedPrompt::Confirm])
        .await;
    h.bridge
        .call("setItem", Some(value_params("wallet1", "seed", "x")))
        .await
        .unwrap();

    h.bridge.call("destroy", None).await.unwrap();
    assert!(!root.exists());

    let result = h
        .bridge
        .call("getItem", Some(item_params("wallet1", "seed")))
        .await;
    assert!(matches!(result, Err(GatewayError::NotFound(_))));
}

#[tokio::test]
async fn test_paranoia_setup_persists_across_restart() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("storage");
    let master_key = crypto::generate_master_key();

    let h = file_bridge(root.clone(), master_key.clone(), [ScriptedPrompt::Confirm]).await;
    h.bridge
        .call(
            "initStorage",
            Some(json!({ "alias": "wallet1", "isParanoia": true })),
        )
        .await
        .unwrap();
    drop(h);

    // The marker survived, so a second setup is rejected.
    let h = file_bridge(root, master_key, [ScriptedPrompt::Confirm]).await;
    let result = h
        .bridge
        .call(
            "setupParanoiaPassword",
            Some(json!({ "alias": "wallet1", "isParanoia": true })),
        )
        .await;
    assert!(matches!(result, Err(GatewayError::StorageFailure(_))));
}

#[tokio::test]
async fn test_recovery_key_round_trip() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("storage");
    let master_key = crypto::generate_master_key();

    let h = file_bridge(root.clone(), master_key.clone(), [ScriptedPrompt::Confirm]).await;
    let result = h
        .bridge
        .call(
            "setupRecoveryPassword",
            Some(value_params("wallet1", "seed", "recover me")),
        )
        .await
        .unwrap();
    let recovery = result["recoveryKey"].as_str().unwrap();
    assert!(!recovery.is_empty());

    // The value reads back normally, and a recovery copy exists on disk.
    let read = h
        .bridge
        .call("getItem", Some(item_params("wallet1", "seed")))
        .await
        .unwrap();
    assert_eq!(read["value"], "recover me");
    assert!(root.join("wallet1/default/seed.recovery.json").exists());
}
