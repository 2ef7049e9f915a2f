//! Device integrity method handlers.

use std::sync::Arc;

use async_trait::async_trait;
use vaultgate_auth::integrity_assessment;

use super::HandlerContext;
use crate::error::Result;
use crate::methods::MethodHandler;

/// `isDeviceSecure{}` -> `{value: 0|1}`: whether a device credential is
/// configured. Numeric for host-bridge compatibility.
pub struct IsDeviceSecureHandler {
    context: Arc<HandlerContext>,
}

impl IsDeviceSecureHandler {
    pub fn new(context: Arc<HandlerContext>) -> Self {
        Self { context }
    }
}

#[async_trait]
impl MethodHandler for IsDeviceSecureHandler {
    async fn call(&self, _params: Option<serde_json::Value>) -> Result<serde_json::Value> {
        let secure = if self.context.device.is_device_secure() {
            1
        } else {
            0
        };
        Ok(serde_json::json!({ "value": secure }))
    }
}

/// `assessDeviceIntegrity{}` -> `{value: bool}`.
pub struct AssessDeviceIntegrityHandler {
    context: Arc<HandlerContext>,
}

impl AssessDeviceIntegrityHandler {
    pub fn new(context: Arc<HandlerContext>) -> Self {
        Self { context }
    }
}

#[async_trait]
impl MethodHandler for AssessDeviceIntegrityHandler {
    async fn call(&self, _params: Option<serde_json::Value>) -> Result<serde_json::Value> {
        let trusted = integrity_assessment(self.context.device.as_ref());
        Ok(serde_json::json!({ "value": trusted }))
    }
}
