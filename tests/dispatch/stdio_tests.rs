// Stdio dispatch tests - real subprocesses speaking MCP over stdin/stdout
//
// Every server command is swapped for a small shell script that answers the
// handshake and tool calls, so the full launch, call and shutdown path runs
// without Node.js or network access.

#![cfg(unix)]

use async_trait::async_trait;
use foundry_cli::{DemoError, Dispatcher, Scenario};
use foundry_core::agent::ChatAgentRunner;
use foundry_core::config::{AppConfig, LaunchOptions};
use foundry_core::testing::{ScriptedLocator, ScriptedModel};
use foundry_core::tooling::{
    ProtocolError, ServerCatalog, ServerConnector, ServerManager, StdioConnector,
    ToolServerError, ToolServerSpec, ToolSession,
};
use foundry_core::types::MessageRole;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Replies to `initialize`, `tools/list` and `tools/call`, echoing the
/// request id back.
const STUB_SERVER: &str = r#"
while IFS= read -r line; do
  id=$(printf '%s' "$line" | sed -n 's/.*"id":"\(req-[0-9]*\)".*/\1/p')
  case "$line" in
    *'"method":"initialize"'*)
      printf '{"jsonrpc":"2.0","id":"%s","result":{"protocolVersion":"2025-06-18","capabilities":{"tools":{}},"serverInfo":{"name":"stub","version":"0"}}}\n' "$id" ;;
    *'"method":"tools/list"'*)
      printf '{"jsonrpc":"2.0","id":"%s","result":{"tools":[{"name":"read_file","description":"Read a file","inputSchema":{"type":"object","properties":{"path":{"type":"string"}}}}]}}\n' "$id" ;;
    *'"method":"tools/call"'*)
      printf '{"jsonrpc":"2.0","id":"%s","result":{"content":[{"type":"text","text":"1. Dune"}]}}\n' "$id" ;;
  esac
done
"#;

/// Starts every requested server as the stub script, or as `sh -c "exit 1"`
/// for names listed in `broken`.
#[derive(Default)]
struct StubConnector {
    broken: Vec<&'static str>,
    launched: Mutex<Vec<ToolServerSpec>>,
}

impl StubConnector {
    fn launched(&self) -> Vec<ToolServerSpec> {
        self.launched.lock().expect("launched lock").clone()
    }
}

#[async_trait]
impl ServerConnector for StubConnector {
    async fn connect(&self, spec: &ToolServerSpec) -> Result<Arc<dyn ToolSession>, ProtocolError> {
        self.launched
            .lock()
            .expect("launched lock")
            .push(spec.clone());
        let script = if self.broken.contains(&spec.display_name.as_str()) {
            "exit 1"
        } else {
            STUB_SERVER
        };
        let stub = ToolServerSpec::new(spec.display_name.clone(), "sh").args(["-c", script]);
        StdioConnector::new(Duration::from_secs(10))
            .connect(&stub)
            .await
    }
}

fn config() -> AppConfig {
    AppConfig::from_lookup(LaunchOptions::default(), |key| Some(format!("dummy-{key}")))
        .expect("dummy configuration")
}

fn dispatcher(
    connector: Arc<StubConnector>,
    model: Arc<ScriptedModel>,
) -> Dispatcher<Vec<u8>> {
    let config = config();
    let manager = ServerManager::new(
        ServerCatalog::from_config(&config),
        connector,
        Arc::new(ScriptedLocator::all()),
    );
    let runtime = ChatAgentRunner::new(model).with_max_turns(config.max_turns);
    Dispatcher::new(manager, Arc::new(runtime), config.connection.clone(), Vec::new())
}

#[tokio::test]
async fn filesystem_demo_calls_tools_over_stdio() {
    let connector = Arc::new(StubConnector::default());
    let model = Arc::new(
        ScriptedModel::new()
            .reply_text("sample_files contains favorite_books.txt")
            .reply_text("Created demo_hello.py")
            .reply_tool_call(
                "call-1",
                "read_file",
                r#"{"path":"sample_files/favorite_books.txt"}"#,
            )
            .reply_text("Your favorite book is Dune"),
    );
    let mut dispatcher = dispatcher(connector.clone(), model.clone());

    dispatcher
        .dispatch(Scenario::Filesystem, &b""[..])
        .await
        .expect("filesystem demo over stdio");

    let launched = connector.launched();
    assert_eq!(launched.len(), 1);
    assert_eq!(launched[0].command, "npx");

    let requests = model.requests();
    assert_eq!(requests.len(), 4);
    assert!(requests.iter().all(|request| request.tools.len() == 1));
    assert_eq!(requests[0].tools[0].name, "read_file");

    let tool_reply = requests[3]
        .messages
        .iter()
        .find(|message| message.role == MessageRole::Tool)
        .expect("tool result fed back");
    assert_eq!(tool_reply.content, "1. Dune");
    assert_eq!(tool_reply.tool_call_id.as_deref(), Some("call-1"));

    let printed = String::from_utf8(dispatcher.into_output()).expect("utf-8");
    assert!(printed.contains("Your favorite book is Dune"));
    assert!(printed.trim_end().ends_with("Demo completed successfully"));
}

#[tokio::test]
async fn web_automation_alternate_runs_over_stdio() {
    let connector = Arc::new(StubConnector {
        broken: vec!["Playwright Server"],
        ..StubConnector::default()
    });
    let model = Arc::new(ScriptedModel::new().reply_text("I can navigate and click."));
    let mut dispatcher = dispatcher(connector.clone(), model);

    dispatcher
        .dispatch(Scenario::WebAutomation, &b""[..])
        .await
        .expect("alternate package answers");

    let names: Vec<String> = connector
        .launched()
        .into_iter()
        .map(|spec| spec.display_name)
        .collect();
    assert_eq!(names, vec!["Playwright Server", "Playwright Server Alt"]);
    let printed = String::from_utf8(dispatcher.into_output()).expect("utf-8");
    assert!(printed.contains("I can navigate and click."));
}

#[tokio::test]
async fn broken_primary_and_alternate_report_both_attempts() {
    let connector = Arc::new(StubConnector {
        broken: vec!["Playwright Server", "Playwright Server Alt"],
        ..StubConnector::default()
    });
    let model = Arc::new(ScriptedModel::new());
    let mut dispatcher = dispatcher(connector, model.clone());

    let err = dispatcher
        .dispatch(Scenario::WebAutomation, &b""[..])
        .await
        .expect_err("neither package starts");

    let DemoError::ToolServer(err @ ToolServerError::LaunchFailed { .. }) = &err else {
        panic!("unexpected error: {err:?}");
    };
    let servers: Vec<&str> = err
        .failures()
        .iter()
        .map(|failure| failure.server.as_str())
        .collect();
    assert_eq!(servers, vec!["Playwright Server", "Playwright Server Alt"]);
    assert!(model.requests().is_empty());
}
