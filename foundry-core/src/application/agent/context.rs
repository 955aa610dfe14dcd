use super::errors::AgentRuntimeError;
use crate::application::tooling::ToolServerHandle;
use crate::model::ToolDefinition;
use serde_json::{Value, json};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Tools advertised to the model, and which handle owns each one.
#[derive(Debug, Default)]
pub struct ToolContext {
    definitions: Vec<ToolDefinition>,
    owners: HashMap<String, ToolServerHandle>,
}

impl ToolContext {
    /// Collect the tools of every handle. On a name clash the first server
    /// listed keeps the tool.
    pub async fn collect(handles: &[ToolServerHandle]) -> Result<Self, AgentRuntimeError> {
        let mut context = ToolContext::default();

        for handle in handles {
            let tools = handle
                .list_tools()
                .await
                .map_err(|source| AgentRuntimeError::Tool {
                    server: handle.display_name().to_string(),
                    source,
                })?;

            for tool in tools {
                if let Some(owner) = context.owners.get(&tool.name) {
                    warn!(
                        tool = %tool.name,
                        kept = %owner.display_name(),
                        ignored = %handle.display_name(),
                        "duplicate tool name across servers"
                    );
                    continue;
                }
                context.definitions.push(ToolDefinition {
                    name: tool.name.clone(),
                    description: tool.description,
                    parameters: tool
                        .input_schema
                        .unwrap_or_else(|| json!({"type": "object", "properties": {}})),
                });
                context.owners.insert(tool.name, handle.clone());
            }
        }

        debug!(tools = context.definitions.len(), "tool context collected");
        Ok(context)
    }

    pub fn definitions(&self) -> &[ToolDefinition] {
        &self.definitions
    }

    pub fn owner(&self, tool: &str) -> Option<&ToolServerHandle> {
        self.owners.get(tool)
    }
}

/// Flatten an MCP `tools/call` result into the text fed back to the model.
///
/// Text items are joined by newlines; other content items are kept as JSON.
/// A result flagged `isError` is prefixed with `Error: `.
pub fn render_tool_result(result: &Value) -> String {
    let text = match result.get("content").and_then(Value::as_array) {
        Some(items) => items
            .iter()
            .map(|item| match item.get("text").and_then(Value::as_str) {
                Some(text) if item.get("type").and_then(Value::as_str) == Some("text") => {
                    text.to_string()
                }
                _ => item.to_string(),
            })
            .collect::<Vec<_>>()
            .join("\n"),
        None => result.to_string(),
    };

    if result.get("isError").and_then(Value::as_bool) == Some(true) {
        format!("Error: {text}")
    } else {
        text
    }
}
