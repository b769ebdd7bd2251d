use anyhow::Result;

use crate::cli::OutputFormat;
use crate::{AuditRequestState, AuditResult};

const RULE: &str = "==================================================";

/// Terminal rendition of the audit panel: waiting, pending, report or error.
pub struct AuditView;

impl AuditView {
    pub fn render(state: &AuditRequestState, format: OutputFormat) -> Result<String> {
        Ok(match format {
            OutputFormat::Json => serde_json::to_string_pretty(state)?,
            OutputFormat::Text => Self::render_text(state),
        })
    }

    pub fn render_text(state: &AuditRequestState) -> String {
        match state {
            AuditRequestState::Idle => "Waiting for Input\n\
                 Enter code in the terminal to initialize scanning sequence."
                .to_string(),
            AuditRequestState::Pending { .. } => "Analyzing Attack Vectors...".to_string(),
            AuditRequestState::Succeeded { result } => Self::format_report(result),
            AuditRequestState::Failed { message } => format!("[!] {message}"),
        }
    }

    fn format_report(result: &AuditResult) -> String {
        let mut output = format!("Analysis Report ({} THREAT)\n{RULE}\n", result.severity());
        output.push_str(result.vulnerability());
        output.push('\n');
        output.push_str(&indent(result.explanation()));
        output.push_str("\n\nProposed Remediation\n");
        output.push_str(&indent(result.remediation()));
        output
    }
}

fn indent(text: &str) -> String {
    text.lines()
        .map(|l| format!("  {}", l))
        .collect::<Vec<_>>()
        .join("\n")
}
