use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, CommandFactory, Parser, ValueEnum};
use foundry_core::config::{Browser, LaunchOptions};
use foundry_core::constants::{
    DEFAULT_HANDSHAKE_TIMEOUT_SECS, DEFAULT_MAX_TURNS, DEFAULT_SAMPLES_DIR,
};

const REQUIREMENTS: &str = "\
Requirements:
  - Node.js with npx on PATH (filesystem, playwright, github, thinking)
  - uv with uvx on PATH (fetch)
  - AZURE_OPENAI_ENDPOINT, AZURE_OPENAI_API_KEY, AZURE_OPENAI_API_VERSION and
    AZURE_OPENAI_CHAT_DEPLOYMENT_NAME in the environment or in .env
  - GITHUB_TOKEN for the source-control demo

Examples:
  foundry-demos filesystem
  foundry-demos playwright --headed --browser firefox
  foundry-demos interactive -v";

#[derive(Parser, Debug)]
#[command(
    name = "foundry-demos",
    version,
    about = "Azure OpenAI agents driving MCP tool servers",
    after_long_help = REQUIREMENTS
)]
pub struct Cli {
    /// Demo to run; prints this help when omitted
    #[arg(value_enum)]
    pub scenario: Option<Scenario>,

    /// Environment file loaded before reading configuration
    #[arg(long, value_name = "PATH")]
    pub env_file: Option<PathBuf>,

    /// Directory exposed to the filesystem server (`~` and `$VAR` expand)
    #[arg(long, value_name = "DIR", default_value = DEFAULT_SAMPLES_DIR)]
    pub samples_dir: String,

    /// Show the browser window during web automation
    #[arg(long)]
    pub headed: bool,

    /// Browser engine for web automation
    #[arg(long, value_enum, default_value_t = BrowserArg::Chromium)]
    pub browser: BrowserArg,

    /// Seconds allowed for a tool server to start and answer the handshake
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_HANDSHAKE_TIMEOUT_SECS)]
    pub handshake_timeout: u64,

    /// Model round-trips allowed per request
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_TURNS)]
    pub max_turns: usize,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn launch_options(&self) -> LaunchOptions {
        LaunchOptions::default()
            .with_samples_dir(&self.samples_dir)
            .with_headless(!self.headed)
            .with_browser(self.browser.into())
    }

    pub fn handshake_timeout(&self) -> Duration {
        Duration::from_secs(self.handshake_timeout)
    }

    /// Full help text, including requirements and examples.
    pub fn usage() -> String {
        Cli::command().render_long_help().to_string()
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum Scenario {
    /// List, create and read files in the samples directory
    Filesystem,
    /// Ask the web automation agent about its browser tools
    #[value(alias = "playwright")]
    WebAutomation,
    /// Analyze your GitHub profile and open issues
    #[value(alias = "github")]
    SourceControl,
    /// Step-by-step analysis of two design problems
    #[value(alias = "thinking")]
    StructuredReasoning,
    /// List HTTP tools and fetch a JSON document
    #[value(alias = "fetch")]
    HttpFetch,
    /// Filesystem and web automation servers together
    Combined,
    /// Ask an agent to describe the filesystem server's tools
    #[value(alias = "tools")]
    ToolInspection,
    /// Pick a server setup and chat with the agent
    Interactive,
    /// Print this help
    Help,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum BrowserArg {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl From<BrowserArg> for Browser {
    fn from(value: BrowserArg) -> Self {
        match value {
            BrowserArg::Chromium => Browser::Chromium,
            BrowserArg::Firefox => Browser::Firefox,
            BrowserArg::Webkit => Browser::Webkit,
        }
    }
}
