use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::domain::is_blank;
use crate::{AuditRequestState, SubmitRejection, SAMPLE_SNIPPET};

use super::super::{AuditView, Container};

const HELP: &str = "\
Type or paste code; every line is appended to the buffer.
  :run     audit the buffer
  :retry   clear a failure
  :sample  load the sample snippet
  :clear   empty the buffer
  :quit    exit (Ctrl-C cancels a running audit, or exits at the prompt)";

/// Line-oriented audit panel. One session lives for the whole loop.
pub struct ReplController<'a> {
    container: &'a Container,
}

impl<'a> ReplController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    /// Run with Ctrl-C as the interrupt source.
    pub async fn run<R, W>(&self, input: R, output: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let (tx, rx) = mpsc::channel(4);
        let listener = tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                if tx.send(()).await.is_err() {
                    break;
                }
            }
        });

        let result = self.run_with_interrupts(input, output, rx).await;
        listener.abort();
        result
    }

    /// Each message on `interrupts` cancels the running audit, or ends the
    /// loop when none is running.
    pub async fn run_with_interrupts<R, W>(
        &self,
        input: R,
        mut output: W,
        mut interrupts: mpsc::Receiver<()>,
    ) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let session = self.container.session();
        let mut buffer = String::new();
        let mut lines = input.lines();

        info!("Interactive session started ({})", session.provider_name());
        write_block(
            &mut output,
            &format!(
                "codeaudit [{}]  :help for commands\n\n{}",
                session.provider_name(),
                AuditView::render_text(&session.state())
            ),
        )
        .await?;

        loop {
            let line = tokio::select! {
                line = lines.next_line() => match line? {
                    Some(line) => line,
                    None => break,
                },
                Some(()) = interrupts.recv() => {
                    info!("Interrupted at prompt, leaving session");
                    break;
                }
            };

            match line.trim() {
                ":quit" | ":q" => break,
                ":help" => write_block(&mut output, HELP).await?,
                ":clear" => buffer.clear(),
                ":sample" => {
                    buffer = format!("{SAMPLE_SNIPPET}\n");
                    write_block(
                        &mut output,
                        &format!("Loaded sample snippet ({} lines).", buffer.lines().count()),
                    )
                    .await?;
                }
                ":retry" => {
                    if session.reset() {
                        write_block(&mut output, &AuditView::render_text(&session.state()))
                            .await?;
                    }
                }
                ":run" => {
                    if !is_blank(&buffer) {
                        write_block(&mut output, "Analyzing Attack Vectors...").await?;
                    }

                    // Dropping the submit future on interrupt returns the session to idle.
                    let submitted = tokio::select! {
                        submitted = session.submit(&buffer) => Some(submitted),
                        Some(()) = interrupts.recv() => None,
                    };

                    match submitted {
                        Some(Ok(state)) => {
                            let mut block = AuditView::render_text(&state);
                            if let AuditRequestState::Failed { .. } = state {
                                block.push_str("\n    :retry to reset, or :run to try again");
                            }
                            write_block(&mut output, &block).await?;
                        }
                        Some(Err(SubmitRejection::BlankInput)) => {
                            debug!("Empty buffer, nothing to run")
                        }
                        Some(Err(rejection)) => debug!("Submission ignored: {}", rejection),
                        None => {
                            write_block(
                                &mut output,
                                &format!(
                                    "Audit cancelled.\n\n{}",
                                    AuditView::render_text(&session.state())
                                ),
                            )
                            .await?;
                        }
                    }
                }
                _ => {
                    buffer.push_str(&line);
                    buffer.push('\n');
                }
            }
        }

        output.flush().await?;
        Ok(())
    }
}

async fn write_block<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> Result<()> {
    output.write_all(text.as_bytes()).await?;
    output.write_all(b"\n\n").await?;
    output.flush().await?;
    Ok(())
}
