use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tokio::io::BufReader;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use codeaudit::connector::api::controller::ReplController;
use codeaudit::connector::api::{Container, ContainerConfig, Router};
use codeaudit::{Commands, ProviderKind, DEFAULT_TIMEOUT};

#[derive(Parser)]
#[command(name = "codeaudit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    #[arg(long, global = true, value_enum, default_value_t = ProviderKind::Gemini)]
    provider: ProviderKind,

    /// Model override (default comes from GEMINI_MODEL / ANTHROPIC_MODEL)
    #[arg(long, global = true)]
    model: Option<String>,

    /// Provider base URL override
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Seconds to wait for the provider; 0 waits indefinitely
    #[arg(long, global = true, default_value_t = DEFAULT_TIMEOUT.as_secs())]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let container = Container::new(ContainerConfig {
        provider: cli.provider,
        model: cli.model,
        base_url: cli.base_url,
        timeout: (cli.timeout > 0).then(|| Duration::from_secs(cli.timeout)),
    });

    if let Commands::Repl = cli.command {
        let controller = ReplController::new(&container);
        controller
            .run(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await?;
        return Ok(ExitCode::SUCCESS);
    }

    let router = Router::new(&container);
    let output = router.route(cli.command).await?;
    println!("{}", output.text);

    Ok(if output.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

#[cfg(test)]
mod cli_tests {
    use super::*;

    #[test]
    fn defaults_to_gemini_with_timeout() {
        let cli = Cli::try_parse_from(["codeaudit", "sample"]).unwrap();
        assert_eq!(cli.provider, ProviderKind::Gemini);
        assert_eq!(cli.timeout, DEFAULT_TIMEOUT.as_secs());
    }

    #[test]
    fn sample_flag_conflicts_with_path() {
        let res = Cli::try_parse_from(["codeaudit", "audit", "a.sol", "--sample"]);
        assert!(res.is_err());
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let res = Cli::try_parse_from(["codeaudit", "--provider", "openai", "sample"]);
        assert!(res.is_err());
    }
}
