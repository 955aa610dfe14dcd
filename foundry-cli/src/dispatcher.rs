use crate::cli::{Cli, Scenario};
use crate::error::DemoError;
use crate::interactive;
use crate::scripts::{Script, script_for};
use foundry_core::agent::{AgentDescriptor, AgentRuntime};
use foundry_core::config::ConnectionDescriptor;
use foundry_core::tooling::ServerManager;
use std::sync::Arc;
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

/// Runs scenarios: acquire servers, build the agent, submit inputs in order,
/// print each result, release the servers.
pub struct Dispatcher<W> {
    manager: ServerManager,
    runtime: Arc<dyn AgentRuntime>,
    connection: ConnectionDescriptor,
    out: W,
}

impl<W> Dispatcher<W>
where
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(
        manager: ServerManager,
        runtime: Arc<dyn AgentRuntime>,
        connection: ConnectionDescriptor,
        out: W,
    ) -> Self {
        Self {
            manager,
            runtime,
            connection,
            out,
        }
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Run `scenario`. `input` is only read in interactive mode.
    pub async fn dispatch<R>(&mut self, scenario: Scenario, input: R) -> Result<(), DemoError>
    where
        R: AsyncBufRead + Unpin + Send,
    {
        debug!(?scenario, "dispatching scenario");
        match scenario {
            Scenario::Help => {
                write_line(&mut self.out, &Cli::usage()).await?;
                self.out.flush().await?;
                Ok(())
            }
            Scenario::Interactive => {
                self.print_header().await?;
                self.interactive(input).await
            }
            runnable => match script_for(runnable) {
                Some(script) => {
                    self.print_header().await?;
                    self.run_script(script).await
                }
                None => Ok(()),
            },
        }
    }

    /// Submit every step of `script` against freshly started servers. The
    /// first error aborts the remaining steps; servers are closed either way.
    pub async fn run_script(&mut self, script: &Script) -> Result<(), DemoError> {
        write_line(&mut self.out, &format!("Starting {} demo...", script.title)).await?;
        info!(demo = script.title, servers = script.servers.len(), "starting demo");

        let Self {
            manager,
            runtime,
            connection,
            out,
        } = &mut *self;
        manager
            .scoped(script.servers, |handles| async move {
                let agent = AgentDescriptor::build(script.agent, handles, connection.clone());
                for step in script.steps {
                    write_line(out, &format!("\n== {} ==", step.banner)).await?;
                    write_line(out, &format!("> {}", step.input)).await?;
                    out.flush().await?;
                    let outcome = runtime.run(&agent, step.input).await?;
                    write_line(out, &outcome.final_output).await?;
                }
                Ok::<_, DemoError>(())
            })
            .await?;

        write_line(&mut self.out, "\nDemo completed successfully").await?;
        self.out.flush().await?;
        Ok(())
    }

    async fn interactive<R>(&mut self, input: R) -> Result<(), DemoError>
    where
        R: AsyncBufRead + Unpin + Send,
    {
        let mut lines = input.lines();
        interactive::print_menu(&mut self.out).await?;
        let choice = lines.next_line().await?.unwrap_or_default();

        let Some(script) = interactive::parse_selection(&choice).and_then(script_for) else {
            write_line(&mut self.out, "\nInvalid selection").await?;
            self.out.flush().await?;
            return Ok(());
        };
        info!(setup = script.title, "interactive setup selected");

        let Self {
            manager,
            runtime,
            connection,
            out,
        } = &mut *self;
        manager
            .scoped(script.servers, |handles| async move {
                let agent = AgentDescriptor::build(script.agent, handles, connection.clone());
                interactive::chat_loop(&agent, runtime.as_ref(), &mut lines, out).await?;
                Ok::<_, DemoError>(())
            })
            .await
    }

    async fn print_header(&mut self) -> io::Result<()> {
        write_line(&mut self.out, "AI Foundry Agents Samples").await?;
        write_line(&mut self.out, &"=".repeat(50)).await
    }
}

pub(crate) async fn write_line<W: AsyncWrite + Unpin>(out: &mut W, line: &str) -> io::Result<()> {
    out.write_all(line.as_bytes()).await?;
    out.write_all(b"\n").await?;
    Ok(())
}
