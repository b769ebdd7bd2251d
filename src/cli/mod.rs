use std::path::PathBuf;

use clap::{Subcommand, ValueEnum};

#[derive(Subcommand)]
pub enum Commands {
    /// Audit one snippet read from a file, or stdin when PATH is omitted or `-`
    Audit {
        path: Option<PathBuf>,

        /// Audit the built-in sample snippet instead of reading input
        #[arg(long, conflicts_with = "path")]
        sample: bool,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Print the sample snippet
    Sample,

    /// Interactive session: type code, `:run` to audit, `:retry`, `:sample`, `:clear`, `:quit`
    Repl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProviderKind {
    Gemini,
    Anthropic,
    Mock,
}
