use super::error::ProtocolError;
use super::session::{ServerConnector, ServerToolInfo, ToolSession};
use super::spec::ToolServerSpec;
use crate::constants::{PROTOCOL_VERSION, SHUTDOWN_GRACE_MS};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::process::{Child, ChildStderr, ChildStdin, ChildStdout, Command};
use tokio::sync::{Mutex as AsyncMutex, oneshot};
use tracing::{debug, info, warn};

type PendingRequests = HashMap<String, oneshot::Sender<Result<Value, ProtocolError>>>;

/// Starts tool providers as child processes speaking MCP over stdio.
#[derive(Debug, Clone)]
pub struct StdioConnector {
    request_timeout: Duration,
}

impl StdioConnector {
    pub fn new(request_timeout: Duration) -> Self {
        Self { request_timeout }
    }
}

#[async_trait]
impl ServerConnector for StdioConnector {
    async fn connect(&self, spec: &ToolServerSpec) -> Result<Arc<dyn ToolSession>, ProtocolError> {
        let process = McpProcess::new(spec.clone(), self.request_timeout);
        process.start().await?;
        Ok(Arc::new(process))
    }
}

/// One MCP server child process and its JSON-RPC channel.
#[derive(Clone)]
pub struct McpProcess {
    inner: Arc<McpProcessInner>,
}

struct McpProcessInner {
    spec: ToolServerSpec,
    request_timeout: Duration,
    child: AsyncMutex<Option<Child>>,
    writer: AsyncMutex<Option<BufWriter<ChildStdin>>>,
    pending: AsyncMutex<PendingRequests>,
    id_counter: AtomicU64,
    stdout_closed: AtomicBool,
    tool_cache: AsyncMutex<Vec<ServerToolInfo>>,
}

impl McpProcess {
    pub fn new(spec: ToolServerSpec, request_timeout: Duration) -> Self {
        Self {
            inner: Arc::new(McpProcessInner {
                spec,
                request_timeout,
                child: AsyncMutex::new(None),
                writer: AsyncMutex::new(None),
                pending: AsyncMutex::new(HashMap::new()),
                id_counter: AtomicU64::new(1),
                stdout_closed: AtomicBool::new(false),
                tool_cache: AsyncMutex::new(Vec::new()),
            }),
        }
    }

    /// Spawn the process and complete the MCP handshake. On failure the child
    /// is terminated before the error is returned.
    pub async fn start(&self) -> Result<(), ProtocolError> {
        self.inner.spawn().await?;
        match self.inner.initialize_sequence().await {
            Ok(()) => {
                info!(server = %self.inner.spec.display_name, "MCP server ready");
                Ok(())
            }
            Err(err) => {
                if let Err(shutdown_err) = self.inner.terminate().await {
                    debug!(
                        server = %self.inner.spec.display_name,
                        %shutdown_err,
                        "failed to clean up MCP server after handshake failure"
                    );
                }
                Err(err)
            }
        }
    }

    /// Whether a child process is currently attached.
    pub async fn is_attached(&self) -> bool {
        self.inner.child.lock().await.is_some()
    }
}

#[async_trait]
impl ToolSession for McpProcess {
    async fn list_tools(&self) -> Result<Vec<ServerToolInfo>, ProtocolError> {
        Ok(self.inner.tool_cache.lock().await.clone())
    }

    async fn call_tool(&self, tool: &str, arguments: Value) -> Result<Value, ProtocolError> {
        self.inner.call_tool(tool, arguments).await
    }

    async fn shutdown(&self) -> Result<(), ProtocolError> {
        self.inner.terminate().await
    }

    /// False once the server closed its stdout.
    fn is_alive(&self) -> bool {
        !self.inner.stdout_closed.load(Ordering::SeqCst)
    }
}

impl McpProcessInner {
    async fn spawn(self: &Arc<Self>) -> Result<(), ProtocolError> {
        let mut command = Command::new(&self.spec.command);
        command
            .args(&self.spec.args)
            .envs(&self.spec.extra_env)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        debug!(
            server = %self.spec.display_name,
            command = %self.spec.command,
            args = ?self.spec.args,
            "spawning MCP server"
        );
        let mut child = command.spawn().map_err(|source| ProtocolError::Spawn {
            server: self.spec.display_name.clone(),
            source,
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| self.transport_error("failed to capture server stdin"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| self.transport_error("failed to capture server stdout"))?;
        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(forward_stderr(self.spec.display_name.clone(), stderr));
        }

        *self.writer.lock().await = Some(BufWriter::new(stdin));
        *self.child.lock().await = Some(child);

        tokio::spawn(reader_loop(Arc::downgrade(self), stdout));
        Ok(())
    }

    async fn initialize_sequence(self: &Arc<Self>) -> Result<(), ProtocolError> {
        let params = json!({
            "protocolVersion": PROTOCOL_VERSION,
            "clientInfo": {
                "name": env!("CARGO_PKG_NAME"),
                "version": env!("CARGO_PKG_VERSION"),
                "title": "Foundry MCP Demos"
            },
            "capabilities": {}
        });
        let init_result = self.send_request("initialize", params).await?;
        debug!(
            server = %self.spec.display_name,
            protocol = init_result.get("protocolVersion").and_then(serde_json::Value::as_str),
            "MCP server initialized"
        );
        self.send_notification("notifications/initialized", json!({}))
            .await?;

        self.refresh_tools().await
    }

    async fn call_tool(&self, tool: &str, arguments: Value) -> Result<Value, ProtocolError> {
        let params = json!({
            "name": tool,
            "arguments": match arguments {
                Value::Null => Value::Object(Default::default()),
                other => other,
            }
        });
        self.send_request("tools/call", params).await
    }

    async fn refresh_tools(&self) -> Result<(), ProtocolError> {
        let result = self.send_request("tools/list", json!({})).await?;
        self.populate_tool_cache(result).await;
        Ok(())
    }

    async fn process_inbound_message(self: &Arc<Self>, value: Value) -> Result<(), ProtocolError> {
        match (value.get("id").cloned(), value.get("method").is_some()) {
            (Some(id), true) => self.handle_server_request(id, value).await,
            (Some(id), false) => self.handle_response(id, value).await,
            (None, true) => {
                self.handle_notification(value);
                Ok(())
            }
            (None, false) => Ok(()),
        }
    }

    async fn handle_response(&self, id: Value, value: Value) -> Result<(), ProtocolError> {
        let Some(key) = response_key(&id) else {
            return Ok(());
        };

        let responder = self.pending.lock().await.remove(&key);
        let Some(sender) = responder else {
            debug!(
                server = %self.spec.display_name,
                response_id = key,
                "received response for unknown request"
            );
            return Ok(());
        };

        let outcome = match value.get("error") {
            Some(error) => {
                let code = error.get("code").and_then(Value::as_i64).unwrap_or(-32000);
                let message = error
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown error")
                    .to_string();
                Err(ProtocolError::Rpc {
                    server: self.spec.display_name.clone(),
                    code,
                    message,
                })
            }
            None => Ok(value.get("result").cloned().unwrap_or(Value::Null)),
        };
        let _ = sender.send(outcome);
        Ok(())
    }

    async fn handle_server_request(&self, id: Value, value: Value) -> Result<(), ProtocolError> {
        let method = value
            .get("method")
            .and_then(Value::as_str)
            .unwrap_or_default();
        if method == "ping" {
            return self.send_response(id, json!({})).await;
        }

        warn!(
            server = %self.spec.display_name,
            method,
            "server sent unsupported request"
        );
        let error = json!({
            "code": -32601,
            "message": format!("client does not implement method '{method}'"),
        });
        self.send_error(id, error).await
    }

    fn handle_notification(self: &Arc<Self>, value: Value) {
        let Some(method) = value.get("method").and_then(Value::as_str) else {
            return;
        };
        debug!(
            server = %self.spec.display_name,
            method,
            "received notification from server"
        );
        if method == "notifications/tools/list_changed" {
            // The reader task must stay free to deliver the tools/list reply.
            let this = Arc::clone(self);
            tokio::spawn(async move {
                if let Err(err) = this.refresh_tools().await {
                    warn!(
                        server = %this.spec.display_name,
                        %err,
                        "failed to refresh tool catalogue"
                    );
                }
            });
        }
    }

    async fn send_request(&self, method: &str, params: Value) -> Result<Value, ProtocolError> {
        let id = self.next_id();
        let (tx, rx) = oneshot::channel();
        self.pending.lock().await.insert(id.clone(), tx);

        let payload = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params
        });
        if let Err(err) = self.write_message(&payload).await {
            self.pending.lock().await.remove(&id);
            return Err(err);
        }
        // The reader may have drained `pending` before this request was added.
        if self.stdout_closed.load(Ordering::SeqCst) {
            self.pending.lock().await.remove(&id);
            return Err(ProtocolError::Terminated {
                server: self.spec.display_name.clone(),
            });
        }

        match tokio::time::timeout(self.request_timeout, rx).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(_)) => Err(ProtocolError::Cancelled {
                server: self.spec.display_name.clone(),
            }),
            Err(_) => {
                self.pending.lock().await.remove(&id);
                Err(ProtocolError::Timeout {
                    server: self.spec.display_name.clone(),
                    method: method.to_string(),
                    after: self.request_timeout,
                })
            }
        }
    }

    async fn send_notification(&self, method: &str, params: Value) -> Result<(), ProtocolError> {
        let payload = json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params
        });
        self.write_message(&payload).await
    }

    async fn send_response(&self, id: Value, result: Value) -> Result<(), ProtocolError> {
        let payload = json!({
            "jsonrpc": "2.0",
            "id": id,
            "result": result
        });
        self.write_message(&payload).await
    }

    async fn send_error(&self, id: Value, error: Value) -> Result<(), ProtocolError> {
        let payload = json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": error
        });
        self.write_message(&payload).await
    }

    async fn write_message(&self, message: &Value) -> Result<(), ProtocolError> {
        let mut encoded =
            serde_json::to_string(message).map_err(|source| ProtocolError::InvalidJson {
                server: self.spec.display_name.clone(),
                source,
            })?;
        encoded.push('\n');

        let mut writer = self.writer.lock().await;
        let stream = writer.as_mut().ok_or_else(|| ProtocolError::Closed {
            server: self.spec.display_name.clone(),
        })?;
        stream
            .write_all(encoded.as_bytes())
            .await
            .map_err(|source| self.transport_error(source.to_string()))?;
        stream
            .flush()
            .await
            .map_err(|source| self.transport_error(source.to_string()))
    }

    /// Close stdin, give the server a moment to exit on its own, then kill it.
    async fn terminate(&self) -> Result<(), ProtocolError> {
        self.writer.lock().await.take();

        let child = self.child.lock().await.take();
        let result = match child {
            Some(mut child) => {
                let grace = Duration::from_millis(SHUTDOWN_GRACE_MS);
                match tokio::time::timeout(grace, child.wait()).await {
                    Ok(Ok(status)) => {
                        debug!(server = %self.spec.display_name, %status, "MCP server exited");
                        Ok(())
                    }
                    Ok(Err(err)) => Err(self.transport_error(err.to_string())),
                    Err(_) => {
                        debug!(
                            server = %self.spec.display_name,
                            "MCP server ignored stdin close; killing"
                        );
                        child
                            .kill()
                            .await
                            .map_err(|err| self.transport_error(err.to_string()))
                    }
                }
            }
            None => Ok(()),
        };

        self.fail_all_pending().await;
        self.tool_cache.lock().await.clear();
        result
    }

    async fn fail_all_pending(&self) {
        let mut pending = self.pending.lock().await;
        for (_, sender) in pending.drain() {
            let _ = sender.send(Err(ProtocolError::Terminated {
                server: self.spec.display_name.clone(),
            }));
        }
    }

    async fn populate_tool_cache(&self, result: Value) {
        let Some(array) = result.get("tools").and_then(Value::as_array) else {
            return;
        };
        let tools = array
            .iter()
            .filter_map(|tool| {
                let name = tool.get("name").and_then(Value::as_str)?;
                Some(ServerToolInfo {
                    name: name.to_string(),
                    description: tool
                        .get("description")
                        .and_then(Value::as_str)
                        .map(str::to_string),
                    input_schema: tool.get("inputSchema").cloned(),
                })
            })
            .collect::<Vec<_>>();
        debug!(
            server = %self.spec.display_name,
            tools = tools.len(),
            "tool catalogue refreshed"
        );
        *self.tool_cache.lock().await = tools;
    }

    fn next_id(&self) -> String {
        let id = self.id_counter.fetch_add(1, Ordering::SeqCst);
        format!("req-{id}")
    }

    fn transport_error(&self, message: impl Into<String>) -> ProtocolError {
        ProtocolError::Transport {
            server: self.spec.display_name.clone(),
            message: message.into(),
        }
    }
}

async fn reader_loop(process: Weak<McpProcessInner>, stdout: ChildStdout) {
    let mut reader = BufReader::new(stdout);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {}
            Err(err) => {
                if let Some(process) = process.upgrade() {
                    warn!(server = %process.spec.display_name, %err, "failed to read MCP server stdout");
                }
                break;
            }
        }
        let Some(process) = process.upgrade() else {
            return;
        };
        // Servers may log in a legacy encoding; such lines fail JSON parsing below.
        let raw = String::from_utf8_lossy(&buf);
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.starts_with('\u{1b}') {
            debug!(
                server = %process.spec.display_name,
                line = trimmed,
                "skipping non-JSON ANSI log line from MCP server"
            );
            continue;
        }
        match serde_json::from_str::<Value>(trimmed) {
            Ok(value) => {
                if let Err(err) = process.process_inbound_message(value).await {
                    warn!(
                        server = %process.spec.display_name,
                        %err,
                        "failed to process message from MCP server"
                    );
                }
            }
            Err(source) => {
                warn!(
                    server = %process.spec.display_name,
                    line = trimmed,
                    %source,
                    "received invalid JSON from MCP server"
                );
            }
        }
    }

    if let Some(process) = process.upgrade() {
        debug!(server = %process.spec.display_name, "MCP server closed stdout");
        process.stdout_closed.store(true, Ordering::SeqCst);
        process.fail_all_pending().await;
    }
}

async fn forward_stderr(server: String, stderr: ChildStderr) {
    let mut reader = BufReader::new(stderr);
    let mut buf = Vec::new();
    while matches!(reader.read_until(b'\n', &mut buf).await, Ok(n) if n > 0) {
        let line = String::from_utf8_lossy(&buf);
        debug!(server = %server, "{}", line.trim_end());
        buf.clear();
    }
}

fn response_key(id: &Value) -> Option<String> {
    match id {
        Value::String(value) => Some(value.clone()),
        Value::Number(num) => Some(num.to_string()),
        _ => None,
    }
}
