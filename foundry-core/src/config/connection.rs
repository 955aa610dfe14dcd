use super::error::ConfigError;
use crate::constants::{API_KEY_VAR, API_VERSION_VAR, DEPLOYMENT_VAR, ENDPOINT_VAR};
use secrecy::{ExposeSecret, SecretString};
use std::env;
use std::fmt;

/// Everything needed to reach the chat-completion deployment.
///
/// Built in one step from the environment; a descriptor with an empty field
/// cannot exist.
#[derive(Clone)]
pub struct ConnectionDescriptor {
    endpoint: String,
    api_version: String,
    credential: SecretString,
    deployment: String,
}

impl ConnectionDescriptor {
    /// Resolve from the process environment. Re-reads the environment on every
    /// call.
    pub fn resolve() -> Result<Self, ConfigError> {
        Self::resolve_with(|key| env::var(key).ok())
    }

    /// Resolve using an arbitrary variable lookup.
    pub fn resolve_with<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &'static str| lookup(key).filter(|value| !value.trim().is_empty());

        let endpoint = read(ENDPOINT_VAR);
        let credential = read(API_KEY_VAR);
        let api_version = read(API_VERSION_VAR);
        let deployment = read(DEPLOYMENT_VAR);

        match (endpoint, credential, api_version, deployment) {
            (Some(endpoint), Some(credential), Some(api_version), Some(deployment)) => Ok(Self {
                endpoint,
                api_version,
                credential: SecretString::from(credential),
                deployment,
            }),
            (endpoint, credential, api_version, deployment) => {
                let missing = [
                    (ENDPOINT_VAR, endpoint.is_none()),
                    (API_KEY_VAR, credential.is_none()),
                    (API_VERSION_VAR, api_version.is_none()),
                    (DEPLOYMENT_VAR, deployment.is_none()),
                ]
                .into_iter()
                .filter_map(|(name, absent)| absent.then_some(name))
                .collect();
                Err(ConfigError::missing(missing))
            }
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn credential(&self) -> &SecretString {
        &self.credential
    }

    pub fn deployment(&self) -> &str {
        &self.deployment
    }
}

impl PartialEq for ConnectionDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.endpoint == other.endpoint
            && self.api_version == other.api_version
            && self.deployment == other.deployment
            && self.credential.expose_secret() == other.credential.expose_secret()
    }
}

impl Eq for ConnectionDescriptor {}

impl fmt::Debug for ConnectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionDescriptor")
            .field("endpoint", &self.endpoint)
            .field("api_version", &self.api_version)
            .field("credential", &"[REDACTED]")
            .field("deployment", &self.deployment)
            .finish()
    }
}
