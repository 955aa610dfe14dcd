use super::error::{LaunchFailure, ProtocolError};
use super::session::{ServerConnector, ServerToolInfo, ToolSession};
use super::spec::ToolServerSpec;
use serde_json::Value;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, warn};

/// Lifecycle of a tool-server handle.
///
/// `NotStarted -> Starting -> Running -> Closing -> Closed`, with `Failed`
/// reachable only from `Starting`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    NotStarted,
    Starting,
    Running,
    Closing,
    Closed,
    Failed,
}

/// Shared reference to one tool-provider subprocess.
///
/// Clones refer to the same process; closing any clone closes all of them.
#[derive(Clone)]
pub struct ToolServerHandle {
    inner: Arc<HandleInner>,
}

struct HandleInner {
    spec: ToolServerSpec,
    state: Mutex<ServerState>,
    session: Mutex<Option<Arc<dyn ToolSession>>>,
}

impl ToolServerHandle {
    pub fn new(spec: ToolServerSpec) -> Self {
        Self {
            inner: Arc::new(HandleInner {
                spec,
                state: Mutex::new(ServerState::NotStarted),
                session: Mutex::new(None),
            }),
        }
    }

    pub fn display_name(&self) -> &str {
        &self.inner.spec.display_name
    }

    /// Current state. A running handle whose provider went away on its own
    /// reports `Closed`; [`close`](Self::close) still reaps the process.
    pub fn state(&self) -> ServerState {
        let state = *self.inner.state.lock().expect("handle state lock");
        if state == ServerState::Running && !self.session_alive() {
            return ServerState::Closed;
        }
        state
    }

    pub fn is_running(&self) -> bool {
        self.state() == ServerState::Running
    }

    /// Run the start sequence through `connector`. Only valid from
    /// `NotStarted`.
    pub async fn start(&self, connector: &dyn ServerConnector) -> Result<(), LaunchFailure> {
        {
            let mut state = self.inner.state.lock().expect("handle state lock");
            if *state != ServerState::NotStarted {
                return Err(LaunchFailure {
                    server: self.display_name().to_string(),
                    error: ProtocolError::Transport {
                        server: self.display_name().to_string(),
                        message: format!("cannot start a handle in state {:?}", *state),
                    },
                });
            }
            *state = ServerState::Starting;
        }
        debug!(server = %self.display_name(), state = ?ServerState::Starting, "starting tool server");

        match connector.connect(&self.inner.spec).await {
            Ok(session) => {
                *self.inner.session.lock().expect("handle session lock") = Some(session);
                self.set_state(ServerState::Running);
                info!(server = %self.display_name(), "tool server connected");
                Ok(())
            }
            Err(error) => {
                self.set_state(ServerState::Failed);
                warn!(server = %self.display_name(), %error, "tool server failed to start");
                Err(LaunchFailure {
                    server: self.display_name().to_string(),
                    error,
                })
            }
        }
    }

    pub async fn list_tools(&self) -> Result<Vec<ServerToolInfo>, ProtocolError> {
        self.session()?.list_tools().await
    }

    pub async fn call_tool(&self, tool: &str, arguments: Value) -> Result<Value, ProtocolError> {
        self.session()?.call_tool(tool, arguments).await
    }

    /// Terminate the subprocess. Only the first call from `Running` does any
    /// work; later calls and calls on never-started handles are no-ops.
    /// Shutdown errors are logged, not returned.
    pub async fn close(&self) {
        {
            let mut state = self.inner.state.lock().expect("handle state lock");
            if *state != ServerState::Running {
                return;
            }
            *state = ServerState::Closing;
        }

        let session = self.inner.session.lock().expect("handle session lock").take();
        if let Some(session) = session {
            if let Err(err) = session.shutdown().await {
                warn!(server = %self.display_name(), %err, "error while shutting down tool server");
            }
        }
        self.set_state(ServerState::Closed);
        info!(server = %self.display_name(), "tool server closed");
    }

    fn session(&self) -> Result<Arc<dyn ToolSession>, ProtocolError> {
        let closed = || ProtocolError::Closed {
            server: self.display_name().to_string(),
        };
        if !self.is_running() {
            return Err(closed());
        }
        self.inner
            .session
            .lock()
            .expect("handle session lock")
            .clone()
            .ok_or_else(closed)
    }

    fn session_alive(&self) -> bool {
        self.inner
            .session
            .lock()
            .expect("handle session lock")
            .as_ref()
            .is_some_and(|session| session.is_alive())
    }

    fn set_state(&self, next: ServerState) {
        *self.inner.state.lock().expect("handle state lock") = next;
    }
}

impl fmt::Debug for ToolServerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolServerHandle")
            .field("server", &self.display_name())
            .field("state", &self.state())
            .finish()
    }
}

impl Drop for HandleInner {
    fn drop(&mut self) {
        let state = *self.state.get_mut().unwrap_or_else(PoisonError::into_inner);
        if state == ServerState::Running {
            // Dropping the session kills the child (kill_on_drop).
            warn!(server = %self.spec.display_name, "tool server handle dropped without close");
        }
    }
}
