use super::error::{LaunchFailure, ToolServerError};
use super::handle::ToolServerHandle;
use super::locator::{ProgramLocator, SystemPath};
use super::process::StdioConnector;
use super::session::ServerConnector;
use super::spec::{ServerCatalog, ToolServerKind, ToolServerSpec};
use crate::config::AppConfig;
use futures::future::join_all;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Acquires tool servers and owns the fallback policy.
pub struct ServerManager {
    catalog: ServerCatalog,
    connector: Arc<dyn ServerConnector>,
    locator: Arc<dyn ProgramLocator>,
}

impl ServerManager {
    pub fn new(
        catalog: ServerCatalog,
        connector: Arc<dyn ServerConnector>,
        locator: Arc<dyn ProgramLocator>,
    ) -> Self {
        Self {
            catalog,
            connector,
            locator,
        }
    }

    /// Stdio connector and `PATH` lookup, configured from `config`.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            ServerCatalog::from_config(config),
            Arc::new(StdioConnector::new(config.handshake_timeout)),
            Arc::new(SystemPath),
        )
    }

    /// Start one tool server of `kind`.
    ///
    /// The caller owns the returned handle and must [`close`](ToolServerHandle::close)
    /// it; prefer [`ServerManager::scoped`].
    pub async fn acquire(&self, kind: ToolServerKind) -> Result<ToolServerHandle, ToolServerError> {
        let primary = self.catalog.primary(kind)?;
        self.ensure_launcher(&primary)?;

        let primary_failure = match self.start(primary).await {
            Ok(handle) => return Ok(handle),
            Err(failure) => failure,
        };

        let Some(alternate) = self.catalog.alternate(kind) else {
            return Err(ToolServerError::LaunchFailed {
                server: kind.display_name().to_string(),
                failures: vec![primary_failure],
            });
        };

        warn!(
            server = %kind,
            alternate = %alternate.display_name,
            error = %primary_failure.error,
            "primary tool server failed; trying alternate"
        );
        self.ensure_launcher(&alternate)?;
        match self.start(alternate).await {
            Ok(handle) => Ok(handle),
            Err(alternate_failure) => Err(ToolServerError::LaunchFailed {
                server: kind.display_name().to_string(),
                failures: vec![primary_failure, alternate_failure],
            }),
        }
    }

    /// Start every server in `kinds` concurrently. All-or-nothing: when any
    /// start fails, the ones that succeeded are closed before the first error
    /// is returned.
    pub async fn open(&self, kinds: &[ToolServerKind]) -> Result<ServerScope, ToolServerError> {
        let results = join_all(kinds.iter().map(|kind| self.acquire(*kind))).await;

        let mut handles = Vec::with_capacity(results.len());
        let mut first_error = None;
        for result in results {
            match result {
                Ok(handle) => handles.push(handle),
                Err(err) if first_error.is_none() => first_error = Some(err),
                Err(err) => debug!(%err, "additional tool server failure"),
            }
        }

        let scope = ServerScope { handles };
        match first_error {
            None => Ok(scope),
            Some(err) => {
                if !scope.handles.is_empty() {
                    info!(
                        started = scope.handles.len(),
                        "closing tool servers started before the failure"
                    );
                }
                scope.close().await;
                Err(err)
            }
        }
    }

    /// Open `kinds`, run `body` with the handles, then close every handle
    /// whether `body` succeeded or not. The body's result is returned as is.
    pub async fn scoped<F, Fut, T, E>(&self, kinds: &[ToolServerKind], body: F) -> Result<T, E>
    where
        F: FnOnce(Vec<ToolServerHandle>) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: From<ToolServerError>,
    {
        let scope = self.open(kinds).await?;
        let result = body(scope.handles().to_vec()).await;
        scope.close().await;
        result
    }

    fn ensure_launcher(&self, spec: &ToolServerSpec) -> Result<(), ToolServerError> {
        match self.locator.locate(&spec.command) {
            Some(path) => {
                debug!(server = %spec.display_name, launcher = %path.display(), "launcher found");
                Ok(())
            }
            None => Err(ToolServerError::LauncherUnavailable {
                server: spec.display_name.clone(),
                program: spec.command.clone(),
            }),
        }
    }

    async fn start(&self, spec: ToolServerSpec) -> Result<ToolServerHandle, LaunchFailure> {
        let handle = ToolServerHandle::new(spec);
        handle.start(self.connector.as_ref()).await?;
        Ok(handle)
    }
}

/// Handles opened together, closed together.
#[derive(Debug)]
pub struct ServerScope {
    handles: Vec<ToolServerHandle>,
}

impl ServerScope {
    pub fn handles(&self) -> &[ToolServerHandle] {
        &self.handles
    }

    pub async fn close(self) {
        for handle in &self.handles {
            handle.close().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::tooling::ServerState;
    use crate::config::LaunchOptions;
    use crate::testing::{ScriptedConnector, ScriptedLocator};
    use secrecy::SecretString;

    fn manager(connector: &ScriptedConnector, locator: ScriptedLocator) -> ServerManager {
        let catalog = ServerCatalog::new(
            LaunchOptions::default(),
            Some(SecretString::from("ghp_test")),
        );
        ServerManager::new(catalog, Arc::new(connector.clone()), Arc::new(locator))
    }

    #[tokio::test]
    async fn missing_launcher_fails_before_spawning() {
        let connector = ScriptedConnector::new();
        let manager = manager(&connector, ScriptedLocator::missing(["npx"]));

        let err = manager
            .acquire(ToolServerKind::Filesystem)
            .await
            .expect_err("npx missing");
        assert!(matches!(
            err,
            ToolServerError::LauncherUnavailable { ref program, .. } if program == "npx"
        ));
        assert!(connector.attempts().is_empty());
    }

    #[tokio::test]
    async fn fetch_server_only_needs_uvx() {
        let connector = ScriptedConnector::new();
        let manager = manager(&connector, ScriptedLocator::missing(["npx"]));

        let handle = manager.acquire(ToolServerKind::HttpFetch).await.expect("uvx present");
        assert_eq!(handle.display_name(), "Fetch Server");
        handle.close().await;
    }

    #[tokio::test]
    async fn missing_token_fails_before_spawning() {
        let connector = ScriptedConnector::new();
        let catalog = ServerCatalog::new(LaunchOptions::default(), None);
        let manager = ServerManager::new(
            catalog,
            Arc::new(connector.clone()),
            Arc::new(ScriptedLocator::all()),
        );

        let err = manager
            .acquire(ToolServerKind::SourceControl)
            .await
            .expect_err("token missing");
        assert!(matches!(err, ToolServerError::MissingCredential { .. }));
        assert!(connector.attempts().is_empty());
    }

    #[tokio::test]
    async fn web_automation_falls_back_once() {
        let connector = ScriptedConnector::new().failing("Playwright Server");
        let manager = manager(&connector, ScriptedLocator::all());

        let handle = manager
            .acquire(ToolServerKind::WebAutomation)
            .await
            .expect("alternate succeeds");

        assert_eq!(handle.display_name(), "Playwright Server Alt");
        assert!(handle.is_running());
        assert_eq!(
            connector.attempts(),
            vec!["Playwright Server", "Playwright Server Alt"]
        );
        handle.close().await;
    }

    #[tokio::test]
    async fn web_automation_reports_both_failures() {
        let connector = ScriptedConnector::new()
            .failing("Playwright Server")
            .failing("Playwright Server Alt");
        let manager = manager(&connector, ScriptedLocator::all());

        let err = manager
            .acquire(ToolServerKind::WebAutomation)
            .await
            .expect_err("both fail");

        let servers: Vec<_> = err.failures().iter().map(|f| f.server.as_str()).collect();
        assert_eq!(servers, vec!["Playwright Server", "Playwright Server Alt"]);
        let message = err.to_string();
        assert!(message.contains("Playwright Server:"));
        assert!(message.contains("Playwright Server Alt:"));
        assert_eq!(connector.attempts().len(), 2);
    }

    #[tokio::test]
    async fn other_kinds_never_retry() {
        for kind in ToolServerKind::ALL {
            if kind == ToolServerKind::WebAutomation {
                continue;
            }
            let connector = ScriptedConnector::new().failing(kind.display_name());
            let manager = manager(&connector, ScriptedLocator::all());

            let err = manager.acquire(kind).await.expect_err("scripted failure");
            assert_eq!(err.failures().len(), 1, "{kind}");
            assert_eq!(connector.attempts(), vec![kind.display_name()], "{kind}");
        }
    }

    #[tokio::test]
    async fn combined_open_closes_survivors_on_failure() {
        let connector = ScriptedConnector::new()
            .failing("Playwright Server")
            .failing("Playwright Server Alt");
        let manager = manager(&connector, ScriptedLocator::all());

        let err = manager
            .open(&[ToolServerKind::Filesystem, ToolServerKind::WebAutomation])
            .await
            .expect_err("web automation fails");

        assert!(matches!(err, ToolServerError::LaunchFailed { .. }));
        assert_eq!(connector.shutdowns("Filesystem Server"), 1);
        assert_eq!(connector.live_sessions(), 0);
    }

    #[tokio::test]
    async fn scope_closes_handles_on_success() {
        let connector = ScriptedConnector::new();
        let manager = manager(&connector, ScriptedLocator::all());

        let handles = manager
            .scoped(
                &[ToolServerKind::Filesystem, ToolServerKind::WebAutomation],
                |handles| async move { Ok::<_, ToolServerError>(handles) },
            )
            .await
            .expect("scope");

        assert_eq!(handles.len(), 2);
        assert!(handles.iter().all(|h| h.state() == ServerState::Closed));
        assert_eq!(connector.live_sessions(), 0);
    }

    #[tokio::test]
    async fn scope_closes_handles_on_error() {
        #[derive(Debug)]
        enum BodyError {
            Server,
            Body(Vec<ToolServerHandle>),
        }
        impl From<ToolServerError> for BodyError {
            fn from(_: ToolServerError) -> Self {
                BodyError::Server
            }
        }

        let connector = ScriptedConnector::new();
        let manager = manager(&connector, ScriptedLocator::all());

        let err = manager
            .scoped(&[ToolServerKind::StructuredReasoning], |handles| async move {
                Err::<(), _>(BodyError::Body(handles))
            })
            .await
            .expect_err("body fails");

        let BodyError::Body(handles) = err else {
            panic!("expected the body's error");
        };
        assert_eq!(handles[0].state(), ServerState::Closed);
        assert_eq!(connector.shutdowns("Sequential Thinking Server"), 1);
    }
}
