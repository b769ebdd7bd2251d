use anyhow::Result;

use crate::Commands;

use super::container::Container;
use super::controller::{AuditController, SampleController};

/// Rendered command result. `success` is false when an audit settled in `Failed`.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub text: String,
    pub success: bool,
}

impl CommandOutput {
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            success: true,
        }
    }

    pub fn failed(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            success: false,
        }
    }
}

pub struct Router<'a> {
    audit_controller: AuditController<'a>,
    sample_controller: SampleController,
}

impl<'a> Router<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self {
            audit_controller: AuditController::new(container),
            sample_controller: SampleController::new(),
        }
    }

    pub async fn route(&self, command: Commands) -> Result<CommandOutput> {
        match command {
            Commands::Audit {
                path,
                sample,
                format,
            } => self.audit_controller.audit(path, sample, format).await,
            Commands::Sample => self.sample_controller.sample().await,
            Commands::Repl => unreachable!("REPL command is handled separately in main"),
        }
    }
}
