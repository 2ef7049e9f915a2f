//! End-to-end tests of the plugin method surface over in-memory storage.

use serde_json::json;
use vaultgate_auth::ScriptedPrompt;
use vaultgate_gateway::GatewayError;
use vaultgate_integration_tests::{item_params, memory_bridge, value_params};

#[tokio::test]
async fn test_set_then_get_round_trips() {
    let (h, _provider) = memory_bridge([ScriptedPrompt::Confirm]).await;

    h.bridge
        .call("setItem", Some(value_params("wallet1", "seed", "abandon about")))
        .await
        .unwrap();
    let result = h
        .bridge
        .call("getItem", Some(item_params("wallet1", "seed")))
        .await
        .unwrap();

    assert_eq!(result["value"], "abandon about");
    // One prompt unlocked the session; the read reused it.
    assert_eq!(h.prompts.prompts_shown(), 1);
}

#[tokio::test]
async fn test_remove_item_then_get_is_not_found() {
    let (h, _provider) = memory_bridge([ScriptedPrompt::Confirm]).await;

    h.bridge
        .call("setItem", Some(value_params("wallet1", "seed", "x")))
        .await
        .unwrap();
    h.bridge
        .call("removeItem", Some(item_params("wallet1", "seed")))
        .await
        .unwrap();

    let result = h
        .bridge
        .call("getItem", Some(item_params("wallet1", "seed")))
        .await;
    assert!(matches!(result, Err(GatewayError::NotFound(_))));
}

#[tokio::test]
async fn test_storage_demanded_reauthentication_retries_until_success() {
    let (h, provider) = memory_bridge([
        ScriptedPrompt::Confirm, // unlock the session
        ScriptedPrompt::Confirm, // storage demand, attempt 1
        ScriptedPrompt::Confirm, // storage demand, attempt 2
    ])
    .await;

    h.bridge
        .call("setItem", Some(value_params("wallet1", "seed", "guarded")))
        .await
        .unwrap();
    provider.store("wallet1", false).demand_auth("seed", 2);

    let result = h
        .bridge
        .call("getItem", Some(item_params("wallet1", "seed")))
        .await
        .unwrap();
    assert_eq!(result["value"], "guarded");
    assert_eq!(h.prompts.prompts_shown(), 3);
}

#[tokio::test]
async fn test_storage_demanded_reauthentication_hits_system_ceiling() {
    let (h, provider) = memory_bridge([
        ScriptedPrompt::Confirm,
        ScriptedPrompt::Confirm,
        ScriptedPrompt::Confirm,
        ScriptedPrompt::Confirm,
    ])
    .await;

    h.bridge
        .call("setItem", Some(value_params("wallet1", "seed", "x")))
        .await
        .unwrap();
    provider.store("wallet1", false).demand_auth("seed", 10);

    let result = h
        .bridge
        .call("getItem", Some(item_params("wallet1", "seed")))
        .await;
    assert!(matches!(result, Err(GatewayError::MaxAuthRetriesSystem)));
    // Session unlock plus three system attempts; the fourth aborts unprompted.
    assert_eq!(h.prompts.prompts_shown(), 4);
}

#[tokio::test]
async fn test_denied_authentication_hits_vault_ceiling() {
    let (h, _provider) = memory_bridge([
        ScriptedPrompt::Deny,
        ScriptedPrompt::Deny,
        ScriptedPrompt::Deny,
    ])
    .await;

    for _ in 0..3 {
        let result = h.bridge.call("authenticate", None).await;
        assert!(matches!(result, Err(GatewayError::AuthenticationFailed)));
    }

    let result = h.bridge.call("authenticate", None).await;
    assert!(matches!(result, Err(GatewayError::MaxAuthRetriesVault)));
    assert_eq!(h.prompts.prompts_shown(), 3, "4th attempt must not prompt");
}

#[tokio::test]
async fn test_rooted_device_blocks_items_but_not_bulk_erase() {
    let (h, _provider) = memory_bridge([ScriptedPrompt::Confirm]).await;

    h.bridge
        .call("setItem", Some(value_params("wallet1", "seed", "x")))
        .await
        .unwrap();
    h.device.set_rooted(true);

    let result = h
        .bridge
        .call("getItem", Some(item_params("wallet1", "seed")))
        .await;
    assert!(matches!(result, Err(GatewayError::InvalidState)));

    // Wiping must stay possible on a compromised device.
    h.bridge
        .call("removeAll", Some(json!({ "alias": "wallet1" })))
        .await
        .unwrap();
    h.bridge.call("destroy", None).await.unwrap();
}

#[tokio::test]
async fn test_debuggable_build_passes_integrity_even_when_rooted() {
    let (h, _provider) = memory_bridge([ScriptedPrompt::Confirm]).await;
    h.device.set_rooted(true);
    h.device.set_debuggable(true);

    h.bridge
        .call("setItem", Some(value_params("wallet1", "seed", "x")))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_bulk_erase_failure_is_storage_failure() {
    let (h, provider) = memory_bridge([]).await;
    provider.fail_bulk_ops(true);

    let result = h
        .bridge
        .call("removeAll", Some(json!({ "alias": "wallet1" })))
        .await;
    assert!(matches!(result, Err(GatewayError::StorageFailure(_))));

    let result = h.bridge.call("destroy", None).await;
    assert!(matches!(result, Err(GatewayError::StorageFailure(_))));
}

#[tokio::test]
async fn test_paranoia_lifecycle_over_methods() {
    let (h, _provider) = memory_bridge([ScriptedPrompt::Confirm]).await;
    let paranoia = |key: &str| {
        json!({ "alias": "wallet1", "isParanoia": true, "key": key, "value": "hidden" })
    };

    // Writing before setup is rejected.
    let result = h.bridge.call("setItem", Some(paranoia("seed"))).await;
    assert!(matches!(result, Err(GatewayError::StorageFailure(_))));

    h.bridge
        .call(
            "setupParanoiaPassword",
            Some(json!({ "alias": "wallet1", "isParanoia": true })),
        )
        .await
        .unwrap();
    h.bridge.call("setItem", Some(paranoia("seed"))).await.unwrap();

    let result = h
        .bridge
        .call(
            "getItem",
            Some(json!({ "alias": "wallet1", "isParanoia": true, "key": "seed" })),
        )
        .await
        .unwrap();
    assert_eq!(result["value"], "hidden");
}

#[tokio::test]
async fn test_missing_parameters_name_each_field() {
    let (h, _provider) = memory_bridge([]).await;

    for (params, expected) in [
        (json!({}), "alias"),
        (json!({ "alias": "wallet1" }), "isParanoia"),
        (json!({ "alias": "wallet1", "isParanoia": false }), "key"),
        (
            json!({ "alias": "wallet1", "isParanoia": false, "key": "seed" }),
            "value",
        ),
    ] {
        match h.bridge.call("setItem", Some(params)).await {
            Err(GatewayError::MissingParameter(field)) => assert_eq!(field, expected),
            other => panic!("unexpected result: {other:?}"),
        }
    }
    assert_eq!(h.prompts.prompts_shown(), 0);
}

#[tokio::test]
async fn test_error_codes_are_distinct() {
    let codes = [
        GatewayError::MissingParameter("key").code(),
        GatewayError::InvalidState.code(),
        GatewayError::NotFound("seed".into()).code(),
        GatewayError::StorageFailure("detail".into()).code(),
        GatewayError::AuthenticationFailed.code(),
        GatewayError::MaxAuthRetriesVault.code(),
        GatewayError::MaxAuthRetriesSystem.code(),
        GatewayError::MethodNotFound("nope".into()).code(),
    ];
    for (i, a) in codes.iter().enumerate() {
        for b in &codes[i + 1..] {
            assert_ne!(a, b);
        }
    }
}
