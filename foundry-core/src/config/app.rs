use super::connection::ConnectionDescriptor;
use super::error::ConfigError;
use super::launch::LaunchOptions;
use crate::constants::{DEFAULT_HANDSHAKE_TIMEOUT_SECS, DEFAULT_MAX_TURNS, GITHUB_TOKEN_VAR};
use secrecy::SecretString;
use std::env;
use std::time::Duration;

/// Process-wide configuration, built once at start-up and passed by reference.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub connection: ConnectionDescriptor,
    pub source_control_token: Option<SecretString>,
    pub launch: LaunchOptions,
    pub handshake_timeout: Duration,
    pub max_turns: usize,
}

impl AppConfig {
    pub fn new(connection: ConnectionDescriptor) -> Self {
        Self {
            connection,
            source_control_token: None,
            launch: LaunchOptions::default(),
            handshake_timeout: Duration::from_secs(DEFAULT_HANDSHAKE_TIMEOUT_SECS),
            max_turns: DEFAULT_MAX_TURNS,
        }
    }

    /// Resolve from the process environment.
    pub fn from_env(launch: LaunchOptions) -> Result<Self, ConfigError> {
        Self::from_lookup(launch, |key| env::var(key).ok())
    }

    pub fn from_lookup<F>(launch: LaunchOptions, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let connection = ConnectionDescriptor::resolve_with(&lookup)?;
        let token = lookup(GITHUB_TOKEN_VAR)
            .filter(|value| !value.trim().is_empty())
            .map(SecretString::from);
        Ok(Self::new(connection)
            .with_launch(launch)
            .with_source_control_token(token))
    }

    pub fn with_launch(mut self, launch: LaunchOptions) -> Self {
        self.launch = launch;
        self
    }

    pub fn with_source_control_token(mut self, token: Option<SecretString>) -> Self {
        self.source_control_token = token;
        self
    }

    pub fn with_handshake_timeout(mut self, timeout: Duration) -> Self {
        self.handshake_timeout = timeout;
        self
    }

    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.max_turns = max_turns.max(1);
        self
    }
}
