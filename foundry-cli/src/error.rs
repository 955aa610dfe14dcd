use foundry_core::agent::AgentRuntimeError;
use foundry_core::config::ConfigError;
use foundry_core::tooling::ToolServerError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DemoError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    ToolServer(#[from] ToolServerError),
    #[error(transparent)]
    Agent(#[from] AgentRuntimeError),
    #[error("terminal I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DemoError {
    /// What the person running the demo can do about it.
    pub fn hint(&self) -> Option<String> {
        match self {
            DemoError::Config(ConfigError::MissingConfiguration { variables }) => Some(format!(
                "set {} in .env or in the environment",
                variables.join(", ")
            )),
            DemoError::Config(ConfigError::EnvFileNotFound { path }) => {
                Some(format!("check the --env-file path {}", path.display()))
            }
            DemoError::Config(ConfigError::EnvFile { path, .. }) => {
                Some(format!("fix the syntax of {}", path.display()))
            }
            DemoError::ToolServer(err) => Some(tool_server_hint(err)),
            DemoError::Agent(err) => Some(err.user_message()),
            DemoError::Io(_) => None,
        }
    }
}

fn tool_server_hint(err: &ToolServerError) -> String {
    match err {
        ToolServerError::LauncherUnavailable { program, .. } if program == "uvx" => {
            "install uv (https://docs.astral.sh/uv/) so that `uvx` is on PATH".to_string()
        }
        ToolServerError::LauncherUnavailable { program, .. } if program == "npx" => {
            "install Node.js and npm so that `npx` is on PATH".to_string()
        }
        ToolServerError::LauncherUnavailable { program, .. } => {
            format!("make sure `{program}` is on PATH")
        }
        ToolServerError::MissingCredential { variable, .. } => {
            format!("set {variable} in your .env file")
        }
        ToolServerError::LaunchFailed { .. } => {
            "run with -v to see the server's output; raise --handshake-timeout if the package is still downloading"
                .to_string()
        }
    }
}
