//! Model types - Request, Response, and Error types

use crate::config::ConnectionDescriptor;
use crate::types::ChatMessage;
use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// A function the model may call.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDefinition {
    pub name: String,
    pub description: Option<String>,
    /// JSON Schema for the arguments object.
    pub parameters: Value,
}

/// Model request for one chat completion
#[derive(Debug, Clone)]
pub struct ModelRequest {
    pub connection: ConnectionDescriptor,
    pub messages: Vec<ChatMessage>,
    pub tools: Vec<ToolDefinition>,
}

/// Model response: one assistant message, possibly carrying tool calls
#[derive(Debug, Clone)]
pub struct ModelResponse {
    pub message: ChatMessage,
}

impl ModelResponse {
    pub fn new(message: ChatMessage) -> Self {
        Self { message }
    }
}

/// Model errors
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("network error calling deployment '{deployment}': {source}")]
    Network {
        deployment: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("deployment '{deployment}' returned invalid response: {reason}")]
    InvalidResponse { deployment: String, reason: String },
}

impl ModelError {
    pub fn network(deployment: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            deployment: deployment.into(),
            source,
        }
    }

    pub fn invalid_response(deployment: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidResponse {
            deployment: deployment.into(),
            reason: reason.into(),
        }
    }

    /// Short remedy for the person running the demo.
    pub fn user_message(&self) -> String {
        match self {
            ModelError::Network { deployment, source } => {
                if source.is_connect() {
                    "cannot reach the chat endpoint; check AZURE_OPENAI_ENDPOINT".to_string()
                } else if source.is_timeout() {
                    format!("the request to '{deployment}' timed out; try again")
                } else if let Some(status) = source.status() {
                    match status {
                        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                            "the endpoint rejected the key; check AZURE_OPENAI_API_KEY".to_string()
                        }
                        StatusCode::NOT_FOUND => format!(
                            "deployment '{deployment}' was not found; check AZURE_OPENAI_CHAT_DEPLOYMENT_NAME and AZURE_OPENAI_API_VERSION"
                        ),
                        StatusCode::TOO_MANY_REQUESTS => {
                            "the deployment is rate limited; wait and try again".to_string()
                        }
                        _ => format!("the endpoint answered with status {}", status.as_u16()),
                    }
                } else {
                    "network error talking to the chat endpoint".to_string()
                }
            }
            ModelError::InvalidResponse { .. } => {
                "the chat endpoint returned a response the demos cannot read".to_string()
            }
        }
    }
}
