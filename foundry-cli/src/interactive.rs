use crate::cli::Scenario;
use crate::dispatcher::write_line;
use foundry_core::agent::{AgentDescriptor, AgentRuntime};
use tokio::io::{self, AsyncBufRead, AsyncWrite, AsyncWriteExt, Lines};
use tokio::signal;
use tracing::{error, info};

const RULE: &str = "----------------------------------------";

/// Server setups offered by the interactive menu, in menu order.
pub const MENU: [(&str, Scenario); 6] = [
    ("Filesystem only", Scenario::Filesystem),
    ("Playwright only", Scenario::WebAutomation),
    ("GitHub only", Scenario::SourceControl),
    ("Sequential Thinking only", Scenario::StructuredReasoning),
    ("Fetch only (HTTP/API)", Scenario::HttpFetch),
    ("Combined (filesystem + Playwright)", Scenario::Combined),
];

pub fn parse_selection(choice: &str) -> Option<Scenario> {
    let index: usize = choice.trim().parse().ok()?;
    MENU.get(index.checked_sub(1)?).map(|(_, scenario)| *scenario)
}

pub async fn print_menu<W: AsyncWrite + Unpin>(out: &mut W) -> io::Result<()> {
    write_line(out, "Select the server setup:").await?;
    for (index, (label, _)) in MENU.iter().enumerate() {
        write_line(out, &format!("{}. {label}", index + 1)).await?;
    }
    out.write_all(b"Selection (1-6): ").await?;
    out.flush().await
}

fn is_exit_command(input: &str) -> bool {
    matches!(
        input.to_ascii_lowercase().as_str(),
        "quit" | "exit" | "salir"
    )
}

/// Read questions until `quit`, end of input or Ctrl-C. Runtime errors are
/// printed and the loop continues.
pub async fn chat_loop<R, W>(
    agent: &AgentDescriptor,
    runtime: &dyn AgentRuntime,
    lines: &mut Lines<R>,
    out: &mut W,
) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    write_line(out, "\nInteractive mode started. Type 'quit' to leave.").await?;
    write_line(out, &"=".repeat(60)).await?;

    loop {
        out.write_all(b"\nYour question: ").await?;
        out.flush().await?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            Ok(()) = signal::ctrl_c() => {
                info!("interrupted during read");
                write_line(out, "").await?;
                break;
            }
        };
        let Some(line) = line else {
            break;
        };

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if is_exit_command(input) {
            break;
        }

        write_line(out, "\nAnswer:").await?;
        write_line(out, RULE).await?;
        match runtime.run(agent, input).await {
            Ok(outcome) => write_line(out, &outcome.final_output).await?,
            Err(err) => {
                error!(%err, agent = agent.name(), "interactive request failed");
                write_line(out, &format!("Error: {err}")).await?;
            }
        }
        write_line(out, RULE).await?;
    }

    write_line(out, "\nGoodbye!").await?;
    out.flush().await
}
