//! Message adapters - convert to and from the OpenAI chat format

use super::types::ToolDefinition;
use crate::types::{ChatMessage, MessageRole, ToolCall};
use serde::Deserialize;
use serde_json::{Map, Value, json};

/// Adapter for converting messages to the OpenAI chat-completions format
pub struct MessageAdapter;

impl MessageAdapter {
    /// Convert messages to OpenAI-style format.
    ///
    /// Assistant turns that requested tools carry `tool_calls` and a null
    /// `content` when empty; tool results carry `tool_call_id`.
    pub fn to_openai_format(messages: &[ChatMessage]) -> Vec<Value> {
        messages.iter().map(Self::message_to_openai).collect()
    }

    fn message_to_openai(msg: &ChatMessage) -> Value {
        let mut value = Map::new();
        value.insert("role".into(), json!(msg.role.as_str()));

        match msg.role {
            MessageRole::Assistant if msg.requests_tools() => {
                let content = if msg.content.is_empty() {
                    Value::Null
                } else {
                    json!(msg.content)
                };
                value.insert("content".into(), content);
                let calls: Vec<Value> = msg
                    .tool_calls
                    .iter()
                    .map(|call| {
                        json!({
                            "id": call.id,
                            "type": "function",
                            "function": {
                                "name": call.name,
                                "arguments": call.arguments,
                            }
                        })
                    })
                    .collect();
                value.insert("tool_calls".into(), Value::Array(calls));
            }
            MessageRole::Tool => {
                value.insert("content".into(), json!(msg.content));
                if let Some(id) = &msg.tool_call_id {
                    value.insert("tool_call_id".into(), json!(id));
                }
            }
            _ => {
                value.insert("content".into(), json!(msg.content));
            }
        }

        Value::Object(value)
    }

    /// Convert tool definitions to the `tools` array.
    pub fn tools_to_openai_format(tools: &[ToolDefinition]) -> Vec<Value> {
        tools
            .iter()
            .map(|tool| {
                let mut function = Map::new();
                function.insert("name".into(), json!(tool.name));
                if let Some(description) = &tool.description {
                    function.insert("description".into(), json!(description));
                }
                function.insert("parameters".into(), tool.parameters.clone());
                json!({ "type": "function", "function": Value::Object(function) })
            })
            .collect()
    }

    /// Convert a response `message` object back into a [`ChatMessage`].
    pub fn from_openai_message(message: OpenAIMessage) -> ChatMessage {
        let tool_calls = message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|call| ToolCall {
                id: call.id,
                name: call.function.name,
                arguments: call.function.arguments,
            })
            .collect();
        ChatMessage::assistant(message.content.unwrap_or_default()).with_tool_calls(tool_calls)
    }
}

#[derive(Debug, Deserialize)]
pub struct OpenAIMessage {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Option<Vec<OpenAIToolCall>>,
}

#[derive(Debug, Deserialize)]
pub struct OpenAIToolCall {
    pub id: String,
    pub function: OpenAIFunctionCall,
}

#[derive(Debug, Deserialize)]
pub struct OpenAIFunctionCall {
    pub name: String,
    #[serde(default)]
    pub arguments: String,
}
