//! Scripted fakes for the connector, locator, model and runtime seams.
//!
//! Compiled for unit tests and behind the `test-support` feature for the
//! integration tests crate.

use crate::agent::{AgentDescriptor, AgentRuntime, AgentRuntimeError, RunOutcome};
use crate::model::{ModelError, ModelProvider, ModelRequest, ModelResponse};
use crate::tooling::{
    ProgramLocator, ProtocolError, ServerConnector, ServerToolInfo, ToolServerSpec, ToolSession,
};
use crate::types::{ChatMessage, ToolCall};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct ConnectorState {
    failing: HashSet<String>,
    failing_shutdown: HashSet<String>,
    tools: HashMap<String, Vec<ServerToolInfo>>,
    attempts: Vec<String>,
    shutdowns: HashMap<String, usize>,
    live: usize,
    calls: Vec<(String, String, Value)>,
    crashed: HashSet<String>,
}

/// In-memory [`ServerConnector`]. Records every connect attempt, shutdown and
/// tool call; clones share the same record.
#[derive(Clone, Default)]
pub struct ScriptedConnector {
    state: Arc<Mutex<ConnectorState>>,
}

impl ScriptedConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every connect for `server` fail with a transport error.
    pub fn failing(self, server: &str) -> Self {
        self.lock().failing.insert(server.to_string());
        self
    }

    /// Make shutdown of `server` report an error.
    pub fn failing_shutdown(self, server: &str) -> Self {
        self.lock().failing_shutdown.insert(server.to_string());
        self
    }

    /// Override the tool list of `server`.
    pub fn with_tools(self, server: &str, tools: Vec<ServerToolInfo>) -> Self {
        self.lock().tools.insert(server.to_string(), tools);
        self
    }

    /// Simulate `server` exiting on its own: its sessions stop being alive.
    pub fn crash(&self, server: &str) {
        self.lock().crashed.insert(server.to_string());
    }

    /// Display names passed to `connect`, in order.
    pub fn attempts(&self) -> Vec<String> {
        self.lock().attempts.clone()
    }

    pub fn shutdowns(&self, server: &str) -> usize {
        self.lock().shutdowns.get(server).copied().unwrap_or(0)
    }

    /// Sessions connected and not yet shut down.
    pub fn live_sessions(&self) -> usize {
        self.lock().live
    }

    /// `(server, tool, arguments)` for every tool call, in order.
    pub fn calls(&self) -> Vec<(String, String, Value)> {
        self.lock().calls.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ConnectorState> {
        self.state.lock().expect("connector state lock")
    }
}

pub fn default_tools() -> Vec<ServerToolInfo> {
    ["read_file", "write_file", "list_directory"]
        .into_iter()
        .map(|name| ServerToolInfo {
            name: name.to_string(),
            description: Some(format!("Scripted {name}")),
            input_schema: Some(json!({
                "type": "object",
                "properties": {"path": {"type": "string"}}
            })),
        })
        .collect()
}

#[async_trait]
impl ServerConnector for ScriptedConnector {
    async fn connect(&self, spec: &ToolServerSpec) -> Result<Arc<dyn ToolSession>, ProtocolError> {
        let server = spec.display_name.clone();
        let mut state = self.lock();
        state.attempts.push(server.clone());
        if state.failing.contains(&server) {
            return Err(ProtocolError::Transport {
                server,
                message: "scripted launch failure".to_string(),
            });
        }
        state.live += 1;
        let tools = state.tools.get(&server).cloned().unwrap_or_else(default_tools);
        Ok(Arc::new(ScriptedSession {
            server,
            tools,
            state: self.state.clone(),
        }))
    }
}

struct ScriptedSession {
    server: String,
    tools: Vec<ServerToolInfo>,
    state: Arc<Mutex<ConnectorState>>,
}

#[async_trait]
impl ToolSession for ScriptedSession {
    async fn list_tools(&self) -> Result<Vec<ServerToolInfo>, ProtocolError> {
        Ok(self.tools.clone())
    }

    async fn call_tool(&self, tool: &str, arguments: Value) -> Result<Value, ProtocolError> {
        self.state.lock().expect("connector state lock").calls.push((
            self.server.clone(),
            tool.to_string(),
            arguments.clone(),
        ));
        Ok(json!({
            "content": [{"type": "text", "text": format!("{tool} ok: {arguments}")}]
        }))
    }

    async fn shutdown(&self) -> Result<(), ProtocolError> {
        let mut state = self.state.lock().expect("connector state lock");
        *state.shutdowns.entry(self.server.clone()).or_default() += 1;
        state.live = state.live.saturating_sub(1);
        if state.failing_shutdown.contains(&self.server) {
            return Err(ProtocolError::Transport {
                server: self.server.clone(),
                message: "scripted shutdown failure".to_string(),
            });
        }
        Ok(())
    }

    fn is_alive(&self) -> bool {
        !self
            .state
            .lock()
            .expect("connector state lock")
            .crashed
            .contains(&self.server)
    }
}

/// [`ProgramLocator`] that finds every program except the listed ones.
#[derive(Debug, Clone, Default)]
pub struct ScriptedLocator {
    missing: HashSet<String>,
}

impl ScriptedLocator {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn missing<I, S>(programs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            missing: programs.into_iter().map(Into::into).collect(),
        }
    }
}

impl ProgramLocator for ScriptedLocator {
    fn locate(&self, program: &str) -> Option<PathBuf> {
        (!self.missing.contains(program)).then(|| PathBuf::from("/usr/bin").join(program))
    }
}

/// [`ModelProvider`] replaying canned replies in order. Once the script runs
/// out it answers `"done"`.
#[derive(Default)]
pub struct ScriptedModel {
    replies: Mutex<VecDeque<ChatMessage>>,
    requests: Mutex<Vec<ModelRequest>>,
}

impl ScriptedModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply_text(self, text: &str) -> Self {
        self.push(ChatMessage::assistant(text))
    }

    pub fn reply_tool_call(self, id: &str, tool: &str, arguments: &str) -> Self {
        self.push(ChatMessage::assistant("").with_tool_calls(vec![ToolCall {
            id: id.to_string(),
            name: tool.to_string(),
            arguments: arguments.to_string(),
        }]))
    }

    pub fn requests(&self) -> Vec<ModelRequest> {
        self.requests.lock().expect("model requests lock").clone()
    }

    fn push(self, message: ChatMessage) -> Self {
        self.replies
            .lock()
            .expect("model replies lock")
            .push_back(message);
        self
    }
}

#[async_trait]
impl ModelProvider for ScriptedModel {
    async fn chat(&self, request: ModelRequest) -> Result<ModelResponse, ModelError> {
        self.requests
            .lock()
            .expect("model requests lock")
            .push(request);
        let reply = self
            .replies
            .lock()
            .expect("model replies lock")
            .pop_front()
            .unwrap_or_else(|| ChatMessage::assistant("done"));
        Ok(ModelResponse::new(reply))
    }
}

/// [`AgentRuntime`] that echoes its input. Records `(agent, input)` pairs.
#[derive(Clone, Default)]
pub struct ScriptedRuntime {
    runs: Arc<Mutex<Vec<(String, String)>>>,
    failing_on: Option<String>,
}

impl ScriptedRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail with [`AgentRuntimeError::MaxTurnsExceeded`] when `input` is
    /// submitted.
    pub fn failing_on(mut self, input: &str) -> Self {
        self.failing_on = Some(input.to_string());
        self
    }

    pub fn runs(&self) -> Vec<(String, String)> {
        self.runs.lock().expect("runtime runs lock").clone()
    }

    pub fn inputs(&self) -> Vec<String> {
        self.runs().into_iter().map(|(_, input)| input).collect()
    }
}

#[async_trait]
impl AgentRuntime for ScriptedRuntime {
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
        self.runs
            .lock()
            .expect("runtime runs lock")
            .push((agent.name().to_string(), input.to_string()));
        if self.failing_on.as_deref() == Some(input) {
            return Err(AgentRuntimeError::MaxTurnsExceeded { max_turns: 0 });
        }
        Ok(RunOutcome::text(format!("[{}] {input}", agent.name())))
    }
}
