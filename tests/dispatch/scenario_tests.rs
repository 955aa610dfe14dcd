// Scenario dispatch tests - scripted demos against in-memory servers
//
// Drives the dispatcher end to end with a scripted connector and runtime and
// checks what gets printed, started and released.

use foundry_cli::{DemoError, Dispatcher, Scenario, exit_status};
use foundry_core::config::{AppConfig, LaunchOptions};
use foundry_core::testing::{ScriptedConnector, ScriptedLocator, ScriptedRuntime};
use foundry_core::tooling::{ServerCatalog, ServerManager, ToolServerError};
use std::sync::Arc;

fn config(token: Option<&str>) -> AppConfig {
    AppConfig::from_lookup(LaunchOptions::default(), |key| match key {
        "GITHUB_TOKEN" => token.map(str::to_string),
        _ => Some(format!("dummy-{key}")),
    })
    .expect("dummy configuration")
}

fn dispatcher(
    config: &AppConfig,
    connector: &ScriptedConnector,
    locator: ScriptedLocator,
    runtime: &ScriptedRuntime,
) -> Dispatcher<Vec<u8>> {
    let catalog = ServerCatalog::from_config(config);
    let manager = ServerManager::new(catalog, Arc::new(connector.clone()), Arc::new(locator));
    Dispatcher::new(
        manager,
        Arc::new(runtime.clone()),
        config.connection.clone(),
        Vec::new(),
    )
}

fn output(dispatcher: Dispatcher<Vec<u8>>) -> String {
    String::from_utf8(dispatcher.into_output()).expect("utf-8 output")
}

#[tokio::test]
async fn filesystem_demo_prints_inputs_in_order() {
    let config = config(None);
    let connector = ScriptedConnector::new();
    let runtime = ScriptedRuntime::new();
    let mut dispatcher = dispatcher(&config, &connector, ScriptedLocator::all(), &runtime);

    let result = dispatcher.dispatch(Scenario::Filesystem, &b""[..]).await;
    assert_eq!(exit_status(&result), 0);
    result.expect("filesystem demo completes");

    let inputs = runtime.inputs();
    assert_eq!(inputs.len(), 3);
    let printed = output(dispatcher);
    let positions: Vec<usize> = inputs
        .iter()
        .map(|input| printed.find(&format!("> {input}")).expect("input printed"))
        .collect();
    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    assert!(printed.starts_with("AI Foundry Agents Samples\n"));
    assert!(printed.contains("Starting filesystem demo..."));
    assert!(printed.contains("[Filesystem Assistant] What is my #1 favorite book?"));
    assert!(printed.trim_end().ends_with("Demo completed successfully"));

    assert_eq!(connector.attempts(), vec!["Filesystem Server"]);
    assert_eq!(connector.shutdowns("Filesystem Server"), 1);
    assert_eq!(connector.live_sessions(), 0);
}

#[tokio::test]
async fn source_control_without_token_never_spawns() {
    let config = config(None);
    let connector = ScriptedConnector::new();
    let runtime = ScriptedRuntime::new();
    let mut dispatcher = dispatcher(&config, &connector, ScriptedLocator::all(), &runtime);

    let result = dispatcher.dispatch(Scenario::SourceControl, &b""[..]).await;
    assert_ne!(exit_status(&result), 0);
    let err = result.expect_err("token required");

    assert!(matches!(
        err,
        DemoError::ToolServer(ToolServerError::MissingCredential { .. })
    ));
    assert!(err.hint().is_some_and(|hint| hint.contains("GITHUB_TOKEN")));
    assert!(connector.attempts().is_empty());
    assert!(runtime.runs().is_empty());
    assert!(!output(dispatcher).contains("Demo completed successfully"));
}

#[tokio::test]
async fn source_control_with_token_runs_both_steps() {
    let config = config(Some("ghp_example"));
    let connector = ScriptedConnector::new();
    let runtime = ScriptedRuntime::new();
    let mut dispatcher = dispatcher(&config, &connector, ScriptedLocator::all(), &runtime);

    dispatcher
        .dispatch(Scenario::SourceControl, &b""[..])
        .await
        .expect("source-control demo completes");

    assert_eq!(connector.attempts(), vec!["GitHub Server"]);
    assert_eq!(runtime.runs().len(), 2);
    assert!(runtime.runs().iter().all(|(agent, _)| agent == "GitHub Assistant"));
}

#[tokio::test]
async fn web_automation_falls_back_to_alternate_package() {
    let config = config(None);
    let connector = ScriptedConnector::new().failing("Playwright Server");
    let runtime = ScriptedRuntime::new();
    let mut dispatcher = dispatcher(&config, &connector, ScriptedLocator::all(), &runtime);

    dispatcher
        .dispatch(Scenario::WebAutomation, &b""[..])
        .await
        .expect("alternate package starts");

    assert_eq!(
        connector.attempts(),
        vec!["Playwright Server", "Playwright Server Alt"]
    );
    assert_eq!(connector.shutdowns("Playwright Server Alt"), 1);
    assert_eq!(runtime.runs().len(), 1);
}

#[tokio::test]
async fn combined_demo_releases_started_server_when_second_fails() {
    let config = config(None);
    let connector = ScriptedConnector::new()
        .failing("Playwright Server")
        .failing("Playwright Server Alt");
    let runtime = ScriptedRuntime::new();
    let mut dispatcher = dispatcher(&config, &connector, ScriptedLocator::all(), &runtime);

    let err = dispatcher
        .dispatch(Scenario::Combined, &b""[..])
        .await
        .expect_err("web automation cannot start");

    match err {
        DemoError::ToolServer(ToolServerError::LaunchFailed { ref failures, .. }) => {
            assert_eq!(failures.len(), 2);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(runtime.runs().is_empty());
    assert_eq!(connector.live_sessions(), 0);
}

#[tokio::test]
async fn missing_uvx_blocks_fetch_demo() {
    let config = config(None);
    let connector = ScriptedConnector::new();
    let runtime = ScriptedRuntime::new();
    let mut dispatcher = dispatcher(
        &config,
        &connector,
        ScriptedLocator::missing(["uvx"]),
        &runtime,
    );

    let err = dispatcher
        .dispatch(Scenario::HttpFetch, &b""[..])
        .await
        .expect_err("uvx missing");

    assert!(matches!(
        err,
        DemoError::ToolServer(ToolServerError::LauncherUnavailable { .. })
    ));
    assert!(err.hint().is_some_and(|hint| hint.contains("uv")));
    assert!(connector.attempts().is_empty());
}

#[tokio::test]
async fn interactive_session_runs_selected_setup() {
    let config = config(None);
    let connector = ScriptedConnector::new();
    let runtime = ScriptedRuntime::new();
    let mut dispatcher = dispatcher(&config, &connector, ScriptedLocator::all(), &runtime);

    dispatcher
        .dispatch(
            Scenario::Interactive,
            &b"5\nfetch https://example.com\n\nsalir\nignored\n"[..],
        )
        .await
        .expect("interactive session");

    assert_eq!(
        runtime.runs(),
        vec![(
            "HTTP/API Assistant".to_string(),
            "fetch https://example.com".to_string()
        )]
    );
    assert_eq!(connector.attempts(), vec!["Fetch Server"]);
    assert_eq!(connector.live_sessions(), 0);
    let printed = output(dispatcher);
    assert!(printed.contains("Selection (1-6): "));
    assert!(printed.contains("Goodbye!"));
}
