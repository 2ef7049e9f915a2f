//! Method registry.
//!
//! Dispatches bridge calls by method name to the handlers in
//! [`crate::handlers`].

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{GatewayError, Result};

/// Trait for bridge method handlers.
#[async_trait]
pub trait MethodHandler: Send + Sync {
    /// Handle the method call.
    async fn call(&self, params: Option<serde_json::Value>) -> Result<serde_json::Value>;
}

/// Registry of bridge methods.
#[derive(Default)]
pub struct MethodRegistry {
    methods: RwLock<HashMap<String, Arc<dyn MethodHandler>>>,
}

impl MethodRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a method handler.
    pub async fn register(&self, name: impl Into<String>, handler: Arc<dyn MethodHandler>) {
        self.methods.write().await.insert(name.into(), handler);
    }

    /// Call a method by name.
    pub async fn call(
        &self,
        name: &str,
        params: Option<serde_json::Value>,
    ) -> Result<serde_json::Value> {
        let handler = {
            let methods = self.methods.read().await;
            methods
                .get(name)
                .cloned()
                .ok_or_else(|| GatewayError::MethodNotFound(name.to_string()))?
        };

        debug!(method = name, "dispatching");
        handler.call(params).await
    }

    /// List registered method names.
    pub async fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.methods.read().await.keys().cloned().collect();
        names.sort();
        names
    }
}
