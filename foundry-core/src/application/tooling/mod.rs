mod error;
mod handle;
mod locator;
mod manager;
mod process;
mod session;
mod spec;

pub use error::{LaunchFailure, ProtocolError, ToolServerError};
pub use handle::{ServerState, ToolServerHandle};
pub use locator::{ProgramLocator, SystemPath};
pub use manager::{ServerManager, ServerScope};
pub use process::{McpProcess, StdioConnector};
pub use session::{ServerConnector, ServerToolInfo, ToolSession};
pub use spec::{ServerCatalog, ToolServerKind, ToolServerSpec};
