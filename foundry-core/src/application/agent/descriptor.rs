use super::instructions::AgentKind;
use crate::application::tooling::ToolServerHandle;
use crate::config::ConnectionDescriptor;

/// Name, instructions, model connection and tool servers for one scenario.
///
/// Holds clones of the handles, not ownership: closing the scope that opened
/// them makes the descriptor unusable, and runtimes refuse to run it.
#[derive(Debug, Clone)]
pub struct AgentDescriptor {
    kind: AgentKind,
    connection: ConnectionDescriptor,
    tool_servers: Vec<ToolServerHandle>,
}

impl AgentDescriptor {
    /// Pairs the fixed name and instructions for `kind` with the given
    /// servers. Does not check that the servers match the kind.
    pub fn build(
        kind: AgentKind,
        tool_servers: Vec<ToolServerHandle>,
        connection: ConnectionDescriptor,
    ) -> Self {
        Self {
            kind,
            connection,
            tool_servers,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind.display_name()
    }

    pub fn instructions(&self) -> &'static str {
        self.kind.instructions()
    }

    pub fn connection(&self) -> &ConnectionDescriptor {
        &self.connection
    }

    pub fn tool_servers(&self) -> &[ToolServerHandle] {
        &self.tool_servers
    }
}
