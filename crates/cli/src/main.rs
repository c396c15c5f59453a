//! TellerBot CLI: the main entry point.
//!
//! With no arguments, asks the bank agent for the balance of account 12345
//! on behalf of a fixed demo account and prints the structured answer.

use std::path::PathBuf;

use clap::Parser;

mod commands;

#[derive(Parser)]
#[command(
    name = "tellerbot",
    about = "TellerBot: a guardrail-gated banking agent",
    version
)]
struct Cli {
    /// Query to send instead of the default balance check
    #[arg(short, long)]
    input: Option<String>,

    /// Use this config file instead of ~/.tellerbot/config.toml
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // A missing .env is fine; the environment may already carry the key
    dotenvy::dotenv().ok();

    // Initialize tracing. Stdout is reserved for the answer.
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    commands::agent::run(cli.input, cli.config).await
}
