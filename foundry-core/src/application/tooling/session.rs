use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use super::error::ProtocolError;
use super::spec::ToolServerSpec;

#[derive(Debug, Clone, PartialEq)]
pub struct ServerToolInfo {
    pub name: String,
    pub description: Option<String>,
    pub input_schema: Option<Value>,
}

/// A started tool provider that completed its handshake.
#[async_trait]
pub trait ToolSession: Send + Sync {
    async fn list_tools(&self) -> Result<Vec<ServerToolInfo>, ProtocolError>;

    async fn call_tool(&self, tool: &str, arguments: Value) -> Result<Value, ProtocolError>;

    /// Terminate the provider. Called at most once per session.
    async fn shutdown(&self) -> Result<(), ProtocolError>;

    /// Whether the provider can still answer requests.
    fn is_alive(&self) -> bool;
}

/// Starts tool providers from a [`ToolServerSpec`].
#[async_trait]
pub trait ServerConnector: Send + Sync {
    async fn connect(&self, spec: &ToolServerSpec) -> Result<Arc<dyn ToolSession>, ProtocolError>;
}
