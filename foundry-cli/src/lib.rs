pub mod cli;
pub mod dispatcher;
pub mod error;
pub mod interactive;
pub mod scripts;

pub use cli::{Cli, Scenario};
pub use dispatcher::Dispatcher;
pub use error::DemoError;

use foundry_core::agent::ChatAgentRunner;
use foundry_core::config::{AppConfig, ensure_env_loaded};
use foundry_core::model::AzureOpenAIClient;
use foundry_core::tooling::ServerManager;
use std::sync::Arc;
use tokio::io::{self, AsyncWriteExt, BufReader};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt};

/// Run the selected scenario against the real endpoint and tool servers.
pub async fn run(cli: Cli) -> Result<(), DemoError> {
    let scenario = match cli.scenario {
        None | Some(Scenario::Help) => {
            let mut stdout = io::stdout();
            stdout.write_all(Cli::usage().as_bytes()).await?;
            stdout.flush().await?;
            return Ok(());
        }
        Some(scenario) => scenario,
    };

    ensure_env_loaded(cli.env_file.as_deref())?;
    let config = AppConfig::from_env(cli.launch_options())?
        .with_handshake_timeout(cli.handshake_timeout())
        .with_max_turns(cli.max_turns);
    debug!(
        scenario = ?scenario,
        samples_dir = %config.launch.samples_dir.display(),
        headless = config.launch.headless,
        browser = config.launch.browser.as_str(),
        handshake_timeout = ?config.handshake_timeout,
        max_turns = config.max_turns,
        "configuration resolved"
    );

    let manager = ServerManager::from_config(&config);
    let runtime = ChatAgentRunner::new(AzureOpenAIClient::new()).with_max_turns(config.max_turns);
    let mut dispatcher = Dispatcher::new(
        manager,
        Arc::new(runtime),
        config.connection.clone(),
        io::stdout(),
    );

    info!(scenario = ?scenario, "running scenario");
    dispatcher
        .dispatch(scenario, BufReader::new(io::stdin()))
        .await
}

/// Process exit status for a finished run: 0 on success, 1 on any failure.
pub fn exit_status(result: &Result<(), DemoError>) -> u8 {
    match result {
        Ok(()) => 0,
        Err(_) => 1,
    }
}

/// Log to stderr so demo output on stdout stays readable. `RUST_LOG` wins
/// over `-v`.
pub fn init_tracing(verbose: u8) {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let default_level = match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        };
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_level));
        fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_level(true)
            .with_writer(std::io::stderr)
            .init();
    });
}
