use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::io::AsyncReadExt;
use tracing::debug;

use crate::cli::OutputFormat;
use crate::SAMPLE_SNIPPET;

use super::super::{AuditView, CommandOutput, Container};

pub struct AuditController<'a> {
    container: &'a Container,
}

impl<'a> AuditController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn audit(
        &self,
        path: Option<PathBuf>,
        sample: bool,
        format: OutputFormat,
    ) -> Result<CommandOutput> {
        let source = if sample {
            SAMPLE_SNIPPET.to_string()
        } else {
            read_source(path.as_deref()).await?
        };

        self.audit_text(&source, format).await
    }

    /// Run one submission through a fresh session and render where it settled.
    ///
    /// Blank input renders the waiting panel and counts as success.
    pub async fn audit_text(&self, source: &str, format: OutputFormat) -> Result<CommandOutput> {
        let session = self.container.session();
        let state = match session.submit(source).await {
            Ok(state) => state,
            Err(rejection) => {
                debug!("Nothing to audit: {}", rejection);
                session.state()
            }
        };

        let text = AuditView::render(&state, format)?;
        Ok(if state.is_failed() {
            CommandOutput::failed(text)
        } else {
            CommandOutput::ok(text)
        })
    }
}

async fn read_source(path: Option<&Path>) -> Result<String> {
    match path {
        Some(p) if p != Path::new("-") => tokio::fs::read_to_string(p)
            .await
            .with_context(|| format!("failed to read {}", p.display())),
        _ => {
            let mut source = String::new();
            tokio::io::stdin()
                .read_to_string(&mut source)
                .await
                .context("failed to read stdin")?;
            Ok(source)
        }
    }
}
