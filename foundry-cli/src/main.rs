use clap::Parser;
use foundry_cli::{Cli, exit_status, init_tracing, run};
use std::process::ExitCode;
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = run(cli).await;
    if let Err(err) = &result {
        error!(%err, "demo failed");
        eprintln!("\nError during execution: {err}");
        if let Some(hint) = err.hint() {
            eprintln!("Hint: {hint}");
        }
    }
    ExitCode::from(exit_status(&result))
}
