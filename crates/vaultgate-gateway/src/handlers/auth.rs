//! Local authentication method handlers.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;
use vaultgate_auth::AuthOrigin;

use super::{parse_params, require, HandlerContext};
use crate::error::Result;
use crate::methods::MethodHandler;

/// `authenticate{}`: user-initiated vault unlock.
pub struct AuthenticateHandler {
    context: Arc<HandlerContext>,
}

impl AuthenticateHandler {
    pub fn new(context: Arc<HandlerContext>) -> Self {
        Self { context }
    }
}

#[async_trait]
impl MethodHandler for AuthenticateHandler {
    async fn call(&self, _params: Option<serde_json::Value>) -> Result<serde_json::Value> {
        self.context
            .gate
            .authenticate_or_continue(AuthOrigin::Vault)
            .await?;
        Ok(serde_json::json!({}))
    }
}

#[derive(Debug, Default, Deserialize)]
struct TimeoutParams {
    timeout: Option<u64>,
}

/// `setInvalidationTimeout{timeout}`: seconds a backgrounded session stays
/// valid. Zero forces re-authentication after any backgrounding.
pub struct SetInvalidationTimeoutHandler {
    context: Arc<HandlerContext>,
}

impl SetInvalidationTimeoutHandler {
    pub fn new(context: Arc<HandlerContext>) -> Self {
        Self { context }
    }
}

#[async_trait]
impl MethodHandler for SetInvalidationTimeoutHandler {
    async fn call(&self, params: Option<serde_json::Value>) -> Result<serde_json::Value> {
        let params: TimeoutParams = parse_params(params)?;
        let timeout = require(params.timeout, "timeout")?;

        self.context.gate.set_invalidation_timeout(timeout);
        debug!(timeout, "invalidation timeout updated");
        Ok(serde_json::json!({}))
    }
}

/// `invalidate{}`: force the session unauthenticated now.
pub struct InvalidateHandler {
    context: Arc<HandlerContext>,
}

impl InvalidateHandler {
    pub fn new(context: Arc<HandlerContext>) -> Self {
        Self { context }
    }
}

#[async_trait]
impl MethodHandler for InvalidateHandler {
    async fn call(&self, _params: Option<serde_json::Value>) -> Result<serde_json::Value> {
        self.context.gate.invalidate();
        Ok(serde_json::json!({}))
    }
}

#[derive(Debug, Default, Deserialize)]
struct AutomaticParams {
    automatic: Option<bool>,
}

/// `toggleAutomaticAuthentication{automatic}`: persist whether resume should
/// trigger authentication automatically.
pub struct ToggleAutomaticAuthenticationHandler {
    context: Arc<HandlerContext>,
}

impl ToggleAutomaticAuthenticationHandler {
    pub fn new(context: Arc<HandlerContext>) -> Self {
        Self { context }
    }
}

#[async_trait]
impl MethodHandler for ToggleAutomaticAuthenticationHandler {
    async fn call(&self, params: Option<serde_json::Value>) -> Result<serde_json::Value> {
        let params: AutomaticParams = parse_params(params)?;
        let automatic = require(params.automatic, "automatic")?;

        self.context
            .prefs
            .set_automatic_authentication(automatic)
            .await?;
        Ok(serde_json::json!({}))
    }
}

/// `setAuthenticationReason{}`: accepted no-op; the platform credential
/// prompt on this host takes no reason string.
pub struct SetAuthenticationReasonHandler {
    _context: Arc<HandlerContext>,
}

impl SetAuthenticationReasonHandler {
    pub fn new(context: Arc<HandlerContext>) -> Self {
        Self { _context: context }
    }
}

#[async_trait]
impl MethodHandler for SetAuthenticationReasonHandler {
    async fn call(&self, _params: Option<serde_json::Value>) -> Result<serde_json::Value> {
        Ok(serde_json::json!({}))
    }
}
