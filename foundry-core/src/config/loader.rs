use super::error::ConfigError;
use crate::constants::ENV_PATH;
use std::path::Path;
use std::sync::Once;
use tracing::{debug, warn};

static ENV_LOADER: Once = Once::new();

/// Ensures environment variables are loaded from the env file, once per
/// process. Variables already present in the process environment always win.
///
/// Later calls are no-ops and return `Ok(())`.
pub fn ensure_env_loaded(path: Option<&Path>) -> Result<(), ConfigError> {
    let mut outcome = Ok(());
    ENV_LOADER.call_once(|| outcome = load_requested_env(path));
    outcome
}

/// Load the env file the user asked for, or the default `.env`.
///
/// A file named explicitly must exist and parse. Problems with the default
/// file are logged and ignored.
pub fn load_requested_env(path: Option<&Path>) -> Result<(), ConfigError> {
    match path {
        Some(path) => {
            if load_env_file(path)? {
                Ok(())
            } else {
                Err(ConfigError::EnvFileNotFound {
                    path: path.to_path_buf(),
                })
            }
        }
        None => {
            if let Err(err) = load_env_file(Path::new(ENV_PATH)) {
                warn!(%err, "Ignoring unreadable environment file");
            }
            Ok(())
        }
    }
}

/// Load variables from a dotenv file without overriding existing ones.
///
/// Returns `Ok(false)` when the file does not exist.
pub fn load_env_file(path: &Path) -> Result<bool, ConfigError> {
    match dotenvy::from_path(path) {
        Ok(()) => {
            debug!(path = %path.display(), "Loaded environment file");
            Ok(true)
        }
        Err(err) if err.not_found() => {
            debug!(path = %path.display(), "No environment file found");
            Ok(false)
        }
        Err(source) => Err(ConfigError::EnvFile {
            path: path.to_path_buf(),
            source,
        }),
    }
}
