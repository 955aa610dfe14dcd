use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when resolving configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable(s): {}", variables.join(", "))]
    MissingConfiguration { variables: Vec<&'static str> },

    #[error("environment file {path:?} does not exist")]
    EnvFileNotFound { path: PathBuf },

    #[error("failed to load environment file {path:?}: {source}")]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },
}

impl ConfigError {
    pub fn missing(variables: Vec<&'static str>) -> Self {
        Self::MissingConfiguration { variables }
    }

    /// Names of the variables that were absent or empty, if any.
    pub fn missing_variables(&self) -> &[&'static str] {
        match self {
            ConfigError::MissingConfiguration { variables } => variables,
            ConfigError::EnvFileNotFound { .. } | ConfigError::EnvFile { .. } => &[],
        }
    }
}
