//! Session timeout and app lifecycle behavior at the method surface.

use chrono::{Duration, Utc};
use serde_json::json;
use vaultgate_auth::ScriptedPrompt;
use vaultgate_gateway::GatewayError;
use vaultgate_integration_tests::{item_params, memory_bridge, value_params};

#[tokio::test]
async fn test_expired_background_timeout_reprompts_on_next_operation() {
    let (h, _provider) = memory_bridge([ScriptedPrompt::Confirm, ScriptedPrompt::Confirm]).await;

    h.bridge
        .call("setItem", Some(value_params("wallet1", "seed", "x")))
        .await
        .unwrap();
    assert_eq!(h.prompts.prompts_shown(), 1);

    // Backgrounded longer than the 10 s default.
    h.bridge
        .gate()
        .note_backgrounded_at(Utc::now() - Duration::seconds(11));

    h.bridge
        .call("getItem", Some(item_params("wallet1", "seed")))
        .await
        .unwrap();
    assert_eq!(h.prompts.prompts_shown(), 2);
}

#[tokio::test]
async fn test_brief_backgrounding_keeps_the_session() {
    let (h, _provider) = memory_bridge([ScriptedPrompt::Confirm]).await;

    h.bridge
        .call("setItem", Some(value_params("wallet1", "seed", "x")))
        .await
        .unwrap();
    h.bridge
        .gate()
        .note_backgrounded_at(Utc::now() - Duration::seconds(2));

    h.bridge
        .call("getItem", Some(item_params("wallet1", "seed")))
        .await
        .unwrap();
    assert_eq!(h.prompts.prompts_shown(), 1, "session survived the pause");
}

#[tokio::test]
async fn test_zero_timeout_invalidates_on_every_pause() {
    let (h, _provider) = memory_bridge([ScriptedPrompt::Confirm, ScriptedPrompt::Confirm]).await;

    h.bridge
        .call("setInvalidationTimeout", Some(json!({ "timeout": 0 })))
        .await
        .unwrap();
    h.bridge
        .call("setItem", Some(value_params("wallet1", "seed", "x")))
        .await
        .unwrap();

    h.bridge.handle_pause();

    h.bridge
        .call("getItem", Some(item_params("wallet1", "seed")))
        .await
        .unwrap();
    assert_eq!(h.prompts.prompts_shown(), 2);
}

#[tokio::test]
async fn test_invalidate_forces_reauthentication_before_read() {
    let (h, _provider) = memory_bridge([ScriptedPrompt::Confirm, ScriptedPrompt::Confirm]).await;

    h.bridge
        .call("setItem", Some(value_params("wallet1", "seed", "x")))
        .await
        .unwrap();
    h.bridge.call("invalidate", None).await.unwrap();

    h.bridge
        .call("getItem", Some(item_params("wallet1", "seed")))
        .await
        .unwrap();
    assert_eq!(h.prompts.prompts_shown(), 2);
}

#[tokio::test]
async fn test_resume_with_automatic_authentication_prompts_immediately() {
    let (h, _provider) = memory_bridge([ScriptedPrompt::Confirm]).await;

    h.bridge
        .call(
            "toggleAutomaticAuthentication",
            Some(json!({ "automatic": true })),
        )
        .await
        .unwrap();

    h.bridge.handle_pause();
    h.bridge.handle_resume().await;

    assert_eq!(h.prompts.prompts_shown(), 1);
    assert!(!h.bridge.gate().needs_authentication());
}

#[tokio::test]
async fn test_resume_without_automatic_authentication_defers_to_next_operation() {
    let (h, _provider) = memory_bridge([ScriptedPrompt::Confirm]).await;

    h.bridge.handle_pause();
    h.bridge.handle_resume().await;
    assert_eq!(h.prompts.prompts_shown(), 0);

    // The deferred prompt fires on the first secure operation instead.
    h.bridge
        .call("setItem", Some(value_params("wallet1", "seed", "x")))
        .await
        .unwrap();
    assert_eq!(h.prompts.prompts_shown(), 1);
}

#[tokio::test]
async fn test_denied_prompt_leaves_session_locked() {
    let (h, _provider) = memory_bridge([ScriptedPrompt::Deny, ScriptedPrompt::Confirm]).await;

    let result = h
        .bridge
        .call("setItem", Some(value_params("wallet1", "seed", "x")))
        .await;
    assert!(matches!(result, Err(GatewayError::AuthenticationFailed)));
    assert!(h.bridge.gate().needs_authentication());

    // A later attempt can still succeed.
    h.bridge
        .call("setItem", Some(value_params("wallet1", "seed", "x")))
        .await
        .unwrap();
    assert!(!h.bridge.gate().needs_authentication());
}
