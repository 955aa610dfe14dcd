use super::error::ToolServerError;
use crate::config::{AppConfig, LaunchOptions};
use crate::constants::GITHUB_TOKEN_VAR;
use secrecy::{ExposeSecret, SecretString};
use std::collections::HashMap;
use std::fmt;

/// How to start one tool-provider subprocess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolServerSpec {
    pub display_name: String,
    pub command: String,
    pub args: Vec<String>,
    pub extra_env: HashMap<String, String>,
}

impl ToolServerSpec {
    pub fn new(display_name: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            command: command.into(),
            args: Vec::new(),
            extra_env: HashMap::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_env.insert(key.into(), value.into());
        self
    }
}

/// The tool providers the demos know how to start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolServerKind {
    Filesystem,
    WebAutomation,
    SourceControl,
    StructuredReasoning,
    HttpFetch,
}

impl ToolServerKind {
    pub const ALL: [ToolServerKind; 5] = [
        ToolServerKind::Filesystem,
        ToolServerKind::WebAutomation,
        ToolServerKind::SourceControl,
        ToolServerKind::StructuredReasoning,
        ToolServerKind::HttpFetch,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            ToolServerKind::Filesystem => "Filesystem Server",
            ToolServerKind::WebAutomation => "Playwright Server",
            ToolServerKind::SourceControl => "GitHub Server",
            ToolServerKind::StructuredReasoning => "Sequential Thinking Server",
            ToolServerKind::HttpFetch => "Fetch Server",
        }
    }
}

impl fmt::Display for ToolServerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Maps a [`ToolServerKind`] to concrete command lines.
#[derive(Debug, Clone)]
pub struct ServerCatalog {
    launch: LaunchOptions,
    source_control_token: Option<SecretString>,
}

impl ServerCatalog {
    pub fn new(launch: LaunchOptions, source_control_token: Option<SecretString>) -> Self {
        Self {
            launch,
            source_control_token,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.launch.clone(), config.source_control_token.clone())
    }

    /// The spec tried first for `kind`.
    ///
    /// Fails with [`ToolServerError::MissingCredential`] when the source-control
    /// server is requested without a token.
    pub fn primary(&self, kind: ToolServerKind) -> Result<ToolServerSpec, ToolServerError> {
        let spec = ToolServerSpec::new(kind.display_name(), "npx");
        let spec = match kind {
            ToolServerKind::Filesystem => spec.args([
                "-y".to_string(),
                "@modelcontextprotocol/server-filesystem".to_string(),
                self.launch.samples_dir.to_string_lossy().into_owned(),
            ]),
            ToolServerKind::WebAutomation => {
                let mut spec = spec.args(["-y", "@playwright/mcp@latest"]);
                if self.launch.headless {
                    spec = spec.arg("--headless");
                }
                spec.args(["--browser", self.launch.browser.as_str()])
            }
            ToolServerKind::SourceControl => {
                let token = self.source_control_token.as_ref().ok_or_else(|| {
                    ToolServerError::MissingCredential {
                        server: kind.display_name().to_string(),
                        variable: GITHUB_TOKEN_VAR,
                    }
                })?;
                spec.args(["-y", "@skhatri/github-mcp"])
                    .env(GITHUB_TOKEN_VAR, token.expose_secret())
            }
            ToolServerKind::StructuredReasoning => {
                spec.args(["-y", "@modelcontextprotocol/server-sequential-thinking"])
            }
            ToolServerKind::HttpFetch => {
                ToolServerSpec::new(kind.display_name(), "uvx").arg("mcp-server-fetch")
            }
        };
        Ok(spec)
    }

    /// A second package for the same capability, tried once when the primary
    /// fails. Only the web-automation server has one.
    pub fn alternate(&self, kind: ToolServerKind) -> Option<ToolServerSpec> {
        match kind {
            ToolServerKind::WebAutomation => Some(
                ToolServerSpec::new("Playwright Server Alt", "npx")
                    .args(["-y", "@microsoft/playwright-mcp"]),
            ),
            _ => None,
        }
    }
}
