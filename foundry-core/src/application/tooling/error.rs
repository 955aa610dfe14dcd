use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Failure talking to a single MCP server process.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("failed to spawn MCP server '{server}': {source}")]
    Spawn {
        server: String,
        #[source]
        source: std::io::Error,
    },
    #[error("MCP server '{server}' transport error: {message}")]
    Transport { server: String, message: String },
    #[error("MCP server '{server}' returned invalid JSON: {source}")]
    InvalidJson {
        server: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("MCP server '{server}' returned JSON-RPC error {code}: {message}")]
    Rpc {
        server: String,
        code: i64,
        message: String,
    },
    #[error("MCP server '{server}' terminated unexpectedly")]
    Terminated { server: String },
    #[error("MCP server '{server}' request cancelled")]
    Cancelled { server: String },
    #[error("MCP server '{server}' did not answer '{method}' within {}s", after.as_secs_f32())]
    Timeout {
        server: String,
        method: String,
        after: Duration,
    },
    #[error("MCP server '{server}' is not running")]
    Closed { server: String },
}

/// One failed start attempt, tagged with the display name of the spec tried.
#[derive(Debug)]
pub struct LaunchFailure {
    pub server: String,
    pub error: ProtocolError,
}

impl fmt::Display for LaunchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.server, self.error)
    }
}

/// Errors surfaced by tool-server acquisition.
#[derive(Debug, Error)]
pub enum ToolServerError {
    #[error("cannot start '{server}': launcher '{program}' was not found on PATH")]
    LauncherUnavailable { server: String, program: String },

    #[error("cannot start '{server}': {variable} is not configured")]
    MissingCredential {
        server: String,
        variable: &'static str,
    },

    #[error("failed to launch tool server '{server}': {}", render_failures(failures))]
    LaunchFailed {
        server: String,
        failures: Vec<LaunchFailure>,
    },
}

impl ToolServerError {
    /// Every start attempt that failed, in the order they were made.
    pub fn failures(&self) -> &[LaunchFailure] {
        match self {
            ToolServerError::LaunchFailed { failures, .. } => failures,
            _ => &[],
        }
    }
}

fn render_failures(failures: &[LaunchFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; then ")
}
