use crate::application::tooling::ProtocolError;
use crate::model::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentRuntimeError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("tool server '{server}' is no longer running")]
    ServerClosed { server: String },
    #[error("tool server '{server}' failed: {source}")]
    Tool {
        server: String,
        #[source]
        source: ProtocolError,
    },
    #[error("agent did not finish within {max_turns} model turns")]
    MaxTurnsExceeded { max_turns: usize },
}

impl AgentRuntimeError {
    pub fn user_message(&self) -> String {
        match self {
            AgentRuntimeError::Model(err) => err.user_message(),
            AgentRuntimeError::ServerClosed { server } => {
                format!("'{server}' was shut down; start the scenario again")
            }
            AgentRuntimeError::Tool { server, .. } => {
                format!("'{server}' stopped answering; run with -v to see its log")
            }
            AgentRuntimeError::MaxTurnsExceeded { .. } => {
                "the agent kept calling tools; raise --max-turns or simplify the request"
                    .to_string()
            }
        }
    }
}
