use super::context::{ToolContext, render_tool_result};
use super::descriptor::AgentDescriptor;
use super::errors::AgentRuntimeError;
use crate::constants::DEFAULT_MAX_TURNS;
use crate::model::{ModelProvider, ModelRequest};
use crate::types::{ChatMessage, ToolCall};
use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info, warn};

/// Executes one natural-language input against an agent.
#[async_trait]
pub trait AgentRuntime: Send + Sync {
    async fn run(
        &self,
        agent: &AgentDescriptor,
        input: &str,
    ) -> Result<RunOutcome, AgentRuntimeError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToolStep {
    pub server: String,
    pub tool: String,
    pub success: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    pub final_output: String,
    pub steps: Vec<ToolStep>,
}

impl RunOutcome {
    pub fn text(final_output: impl Into<String>) -> Self {
        Self {
            final_output: final_output.into(),
            steps: Vec::new(),
        }
    }
}

/// Chat-completion loop: advertises MCP tools as functions, routes each tool
/// call to the owning server and stops at the first reply without calls.
pub struct ChatAgentRunner<P: ModelProvider> {
    provider: P,
    max_turns: usize,
}

impl<P: ModelProvider> ChatAgentRunner<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            max_turns: DEFAULT_MAX_TURNS,
        }
    }

    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.max_turns = max_turns.max(1);
        self
    }

    async fn invoke(&self, context: &ToolContext, call: &ToolCall) -> (String, Option<ToolStep>) {
        let Some(handle) = context.owner(&call.name) else {
            warn!(tool = %call.name, "model requested an unknown tool");
            return (format!("Error: unknown tool '{}'", call.name), None);
        };

        let step = |success| ToolStep {
            server: handle.display_name().to_string(),
            tool: call.name.clone(),
            success,
        };

        let arguments = match parse_arguments(&call.arguments) {
            Ok(arguments) => arguments,
            Err(err) => {
                warn!(tool = %call.name, %err, "model sent malformed tool arguments");
                return (
                    format!("Error: invalid arguments for '{}': {err}", call.name),
                    Some(step(false)),
                );
            }
        };

        info!(server = %handle.display_name(), tool = %call.name, "calling tool");
        match handle.call_tool(&call.name, arguments).await {
            Ok(result) => {
                let failed = result.get("isError").and_then(Value::as_bool) == Some(true);
                (render_tool_result(&result), Some(step(!failed)))
            }
            Err(err) => {
                warn!(server = %handle.display_name(), tool = %call.name, %err, "tool call failed");
                (format!("Error: {err}"), Some(step(false)))
            }
        }
    }
}

#[async_trait]
impl<P: ModelProvider> AgentRuntime for ChatAgentRunner<P> {
    async fn run(
        &self,
        agent: &AgentDescriptor,
        input: &str,
    ) -> Result<RunOutcome, AgentRuntimeError> {
        if let Some(closed) = agent.tool_servers().iter().find(|h| !h.is_running()) {
            return Err(AgentRuntimeError::ServerClosed {
                server: closed.display_name().to_string(),
            });
        }

        info!(agent = agent.name(), "Agent run started");
        let context = ToolContext::collect(agent.tool_servers()).await?;
        let mut messages = vec![
            ChatMessage::system(agent.instructions()),
            ChatMessage::user(input),
        ];
        let mut steps = Vec::new();

        for turn in 1..=self.max_turns {
            debug!(agent = agent.name(), turn, "submitting turn to model");
            let response = self
                .provider
                .chat(ModelRequest {
                    connection: agent.connection().clone(),
                    messages: messages.clone(),
                    tools: context.definitions().to_vec(),
                })
                .await?;

            let reply = response.message;
            if !reply.requests_tools() {
                info!(agent = agent.name(), turns = turn, "Agent returned final response");
                return Ok(RunOutcome {
                    final_output: reply.content,
                    steps,
                });
            }

            let calls = reply.tool_calls.clone();
            messages.push(reply);
            for call in &calls {
                let (text, step) = self.invoke(&context, call).await;
                steps.extend(step);
                messages.push(ChatMessage::tool_result(&call.id, text));
            }
        }

        warn!(agent = agent.name(), max_turns = self.max_turns, "Agent exceeded max turns");
        Err(AgentRuntimeError::MaxTurnsExceeded {
            max_turns: self.max_turns,
        })
    }
}

/// Empty argument text means "no arguments".
fn parse_arguments(raw: &str) -> Result<Value, serde_json::Error> {
    if raw.trim().is_empty() {
        return Ok(Value::Object(Default::default()));
    }
    serde_json::from_str(raw)
}
