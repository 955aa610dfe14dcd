//! Application constants
//!
//! Single source of truth for environment variable names, default paths and
//! timeouts.

/// Chat-completion endpoint URL
pub const ENDPOINT_VAR: &str = "AZURE_OPENAI_ENDPOINT";

/// API key for the chat-completion endpoint
pub const API_KEY_VAR: &str = "AZURE_OPENAI_API_KEY";

/// API version string sent as the `api-version` query parameter
pub const API_VERSION_VAR: &str = "AZURE_OPENAI_API_VERSION";

/// Name of the chat model deployment
pub const DEPLOYMENT_VAR: &str = "AZURE_OPENAI_CHAT_DEPLOYMENT_NAME";

/// Token handed to the source-control tool server
pub const GITHUB_TOKEN_VAR: &str = "GITHUB_TOKEN";

/// Default environment file path
pub const ENV_PATH: &str = ".env";

/// Directory the filesystem tool server is rooted at
pub const DEFAULT_SAMPLES_DIR: &str = "sample_files";

/// Upper bound for spawning a tool server and completing the MCP handshake.
/// `npx -y` may download the package on first use.
pub const DEFAULT_HANDSHAKE_TIMEOUT_SECS: u64 = 60;

/// Grace period between closing a server's stdin and killing it
pub const SHUTDOWN_GRACE_MS: u64 = 2_000;

/// Model round-trips allowed for a single agent input
pub const DEFAULT_MAX_TURNS: usize = 10;

/// MCP protocol revision announced during `initialize`
pub const PROTOCOL_VERSION: &str = "2025-06-18";
