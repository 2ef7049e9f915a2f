//! Secure-storage method handlers.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::{parse_params, require, HandlerContext};
use crate::error::Result;
use crate::methods::MethodHandler;

/// Parameters shared by the item-level storage methods.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemParams {
    alias: Option<String>,
    is_paranoia: Option<bool>,
    key: Option<String>,
    value: Option<String>,
}

/// `initStorage{alias, isParanoia}`: for paranoia mode this sets up the
/// password; plain mode has nothing to initialize.
pub struct InitStorageHandler {
    context: Arc<HandlerContext>,
}

impl InitStorageHandler {
    pub fn new(context: Arc<HandlerContext>) -> Self {
        Self { context }
    }
}

#[async_trait]
impl MethodHandler for InitStorageHandler {
    async fn call(&self, params: Option<serde_json::Value>) -> Result<serde_json::Value> {
        let params: ItemParams = parse_params(params)?;
        let alias = require(params.alias, "alias")?;
        let is_paranoia = require(params.is_paranoia, "isParanoia")?;

        if is_paranoia {
            self.context
                .ops
                .setup_paranoia_password(&alias, is_paranoia)
                .await?;
        }
        debug!(alias, is_paranoia, "storage initialized");
        Ok(serde_json::json!({}))
    }
}

/// `getItem{alias, isParanoia, key}` -> `{value}`.
pub struct GetItemHandler {
    context: Arc<HandlerContext>,
}

impl GetItemHandler {
    pub fn new(context: Arc<HandlerContext>) -> Self {
        Self { context }
    }
}

#[async_trait]
impl MethodHandler for GetItemHandler {
    async fn call(&self, params: Option<serde_json::Value>) -> Result<serde_json::Value> {
        let params: ItemParams = parse_params(params)?;
        let alias = require(params.alias, "alias")?;
        let is_paranoia = require(params.is_paranoia, "isParanoia")?;
        let key = require(params.key, "key")?;

        let value = self.context.ops.read(&alias, is_paranoia, &key).await?;
        debug!(alias, key, "getItem: success");
        Ok(serde_json::json!({ "value": value.expose_secret() }))
    }
}

/// `setItem{alias, isParanoia, key, value}`.
pub struct SetItemHandler {
    context: Arc<HandlerContext>,
}

impl SetItemHandler {
    pub fn new(context: Arc<HandlerContext>) -> Self {
        Self { context }
    }
}

#[async_trait]
impl MethodHandler for SetItemHandler {
    async fn call(&self, params: Option<serde_json::Value>) -> Result<serde_json::Value> {
        let params: ItemParams = parse_params(params)?;
        let alias = require(params.alias, "alias")?;
        let is_paranoia = require(params.is_paranoia, "isParanoia")?;
        let key = require(params.key, "key")?;
        let value = require(params.value, "value")?;

        self.context
            .ops
            .write(&alias, is_paranoia, &key, &value)
            .await?;
        debug!(alias, key, "setItem: success");
        Ok(serde_json::json!({}))
    }
}

/// `removeItem{alias, isParanoia, key}`.
pub struct RemoveItemHandler {
    context: Arc<HandlerContext>,
}

impl RemoveItemHandler {
    pub fn new(context: Arc<HandlerContext>) -> Self {
        Self { context }
    }
}

#[async_trait]
impl MethodHandler for RemoveItemHandler {
    async fn call(&self, params: Option<serde_json::Value>) -> Result<serde_json::Value> {
        let params: ItemParams = parse_params(params)?;
        let alias = require(params.alias, "alias")?;
        let is_paranoia = require(params.is_paranoia, "isParanoia")?;
        let key = require(params.key, "key")?;

        self.context.ops.remove(&alias, is_paranoia, &key).await?;
        debug!(alias, key, "removeItem: success");
        Ok(serde_json::json!({}))
    }
}

/// `removeAll{alias}`: bulk-erase one alias, both modes.
pub struct RemoveAllHandler {
    context: Arc<HandlerContext>,
}

impl RemoveAllHandler {
    pub fn new(context: Arc<HandlerContext>) -> Self {
        Self { context }
    }
}

#[async_trait]
impl MethodHandler for RemoveAllHandler {
    async fn call(&self, params: Option<serde_json::Value>) -> Result<serde_json::Value> {
        let params: ItemParams = parse_params(params)?;
        let alias = require(params.alias, "alias")?;

        self.context.ops.remove_all(&alias).await?;
        Ok(serde_json::json!({}))
    }
}

/// `destroy{}`: erase the entire storage root.
pub struct DestroyHandler {
    context: Arc<HandlerContext>,
}

impl DestroyHandler {
    pub fn new(context: Arc<HandlerContext>) -> Self {
        Self { context }
    }
}

#[async_trait]
impl MethodHandler for DestroyHandler {
    async fn call(&self, _params: Option<serde_json::Value>) -> Result<serde_json::Value> {
        self.context.ops.destroy().await?;
        Ok(serde_json::json!({}))
    }
}

/// `setupParanoiaPassword{alias, isParanoia}`. Fails on re-setup.
pub struct SetupParanoiaPasswordHandler {
    context: Arc<HandlerContext>,
}

impl SetupParanoiaPasswordHandler {
    pub fn new(context: Arc<HandlerContext>) -> Self {
        Self { context }
    }
}

#[async_trait]
impl MethodHandler for SetupParanoiaPasswordHandler {
    async fn call(&self, params: Option<serde_json::Value>) -> Result<serde_json::Value> {
        let params: ItemParams = parse_params(params)?;
        let alias = require(params.alias, "alias")?;
        let is_paranoia = require(params.is_paranoia, "isParanoia")?;

        self.context
            .ops
            .setup_paranoia_password(&alias, is_paranoia)
            .await?;
        debug!(alias, "paranoia setup: success");
        Ok(serde_json::json!({}))
    }
}

/// `setupRecoveryPassword{alias, isParanoia, key, value}` -> `{recoveryKey}`.
pub struct SetupRecoveryPasswordHandler {
    context: Arc<HandlerContext>,
}

impl SetupRecoveryPasswordHandler {
    pub fn new(context: Arc<HandlerContext>) -> Self {
        Self { context }
    }
}

#[async_trait]
impl MethodHandler for SetupRecoveryPasswordHandler {
    async fn call(&self, params: Option<serde_json::Value>) -> Result<serde_json::Value> {
        let params: ItemParams = parse_params(params)?;
        let alias = require(params.alias, "alias")?;
        let is_paranoia = require(params.is_paranoia, "isParanoia")?;
        let key = require(params.key, "key")?;
        let value = require(params.value, "value")?;

        let recovery = self
            .context
            .ops
            .setup_recovery_password(&alias, is_paranoia, &key, &value)
            .await?;
        debug!(alias, key, "written recoverable: success");
        Ok(serde_json::json!({ "recoveryKey": recovery.as_str() }))
    }
}
