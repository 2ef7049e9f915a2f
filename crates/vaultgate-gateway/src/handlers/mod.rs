//! Bridge method handlers.
//!
//! One handler per plugin method. Every handler validates its required
//! parameters first and fails with `MissingParameter` naming the field
//! before any storage or auth interaction.

pub mod auth;
pub mod device;
pub mod storage;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use vaultgate_auth::{AuthGate, DeviceEnvironment};
use vaultgate_core::PreferenceStore;
use vaultgate_storage::SecureOperations;

use crate::error::{GatewayError, Result};
use crate::methods::MethodRegistry;

pub use auth::{
    AuthenticateHandler, InvalidateHandler, SetAuthenticationReasonHandler,
    SetInvalidationTimeoutHandler, ToggleAutomaticAuthenticationHandler,
};
pub use device::{AssessDeviceIntegrityHandler, IsDeviceSecureHandler};
pub use storage::{
    DestroyHandler, GetItemHandler, InitStorageHandler, RemoveAllHandler, RemoveItemHandler,
    SetItemHandler, SetupParanoiaPasswordHandler, SetupRecoveryPasswordHandler,
};

/// Shared state handed to every handler.
pub struct HandlerContext {
    pub ops: SecureOperations,
    pub gate: Arc<AuthGate>,
    pub device: Arc<dyn DeviceEnvironment>,
    pub prefs: Arc<dyn PreferenceStore>,
}

/// Deserialize the optional params object into a struct of `Option` fields.
///
/// Absent params deserialize to all-`None`; individual fields are then
/// checked with [`require`] so the caller learns which one is missing.
pub(crate) fn parse_params<T: DeserializeOwned>(params: Option<serde_json::Value>) -> Result<T> {
    let value = params.unwrap_or_else(|| serde_json::json!({}));
    serde_json::from_value(value).map_err(|e| GatewayError::InvalidParams(e.to_string()))
}

/// Extract a required field or fail naming it.
pub(crate) fn require<T>(value: Option<T>, field: &'static str) -> Result<T> {
    value.ok_or(GatewayError::MissingParameter(field))
}

/// Register every plugin method.
pub async fn register_all(registry: &MethodRegistry, context: HandlerContext) {
    let ctx = Arc::new(context);

    // Secure storage
    registry
        .register("initStorage", Arc::new(InitStorageHandler::new(ctx.clone())))
        .await;
    registry
        .register("getItem", Arc::new(GetItemHandler::new(ctx.clone())))
        .await;
    registry
        .register("setItem", Arc::new(SetItemHandler::new(ctx.clone())))
        .await;
    registry
        .register("removeItem", Arc::new(RemoveItemHandler::new(ctx.clone())))
        .await;
    registry
        .register("removeAll", Arc::new(RemoveAllHandler::new(ctx.clone())))
        .await;
    registry
        .register("destroy", Arc::new(DestroyHandler::new(ctx.clone())))
        .await;
    registry
        .register(
            "setupParanoiaPassword",
            Arc::new(SetupParanoiaPasswordHandler::new(ctx.clone())),
        )
        .await;
    registry
        .register(
            "setupRecoveryPassword",
            Arc::new(SetupRecoveryPasswordHandler::new(ctx.clone())),
        )
        .await;

    // Local authentication
    registry
        .register("authenticate", Arc::new(AuthenticateHandler::new(ctx.clone())))
        .await;
    registry
        .register(
            "setInvalidationTimeout",
            Arc::new(SetInvalidationTimeoutHandler::new(ctx.clone())),
        )
        .await;
    registry
        .register("invalidate", Arc::new(InvalidateHandler::new(ctx.clone())))
        .await;
    registry
        .register(
            "toggleAutomaticAuthentication",
            Arc::new(ToggleAutomaticAuthenticationHandler::new(ctx.clone())),
        )
        .await;
    registry
        .register(
            "setAuthenticationReason",
            Arc::new(SetAuthenticationReasonHandler::new(ctx.clone())),
        )
        .await;

    // Device integrity
    registry
        .register("isDeviceSecure", Arc::new(IsDeviceSecureHandler::new(ctx.clone())))
        .await;
    registry
        .register(
            "assessDeviceIntegrity",
            Arc::new(AssessDeviceIntegrityHandler::new(ctx.clone())),
        )
        .await;
}
