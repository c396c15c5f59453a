//! `tellerbot`: run one query through the guarded bank agent.

use std::path::PathBuf;

use tellerbot_agent::{ModelSettings, Runner, bank_agent};
use tellerbot_config::{API_KEY_ENV, AppConfig};
use tellerbot_tools::Account;
use tracing::info;

/// The query sent when none is given on the command line.
pub const DEFAULT_QUERY: &str = "Check balance for account 12345";

/// The caller every query is made on behalf of.
fn demo_account() -> Account {
    Account::new("Alice", 1234)
}

pub async fn run(
    input: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &config_path {
        Some(path) => AppConfig::load_with_env(path),
        None => AppConfig::load(),
    }
    .map_err(|e| format!("Failed to load config: {e}"))?;

    // Check for the credential early, before any model call
    if !config.has_api_key() {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set {API_KEY_ENV} in your environment or in a .env file,");
        eprintln!("  or add api_key to {}", AppConfig::config_dir().join("config.toml").display());
        eprintln!();
    }
    let provider = tellerbot_providers::build_from_config(&config)?;

    let agent = bank_agent(provider, &ModelSettings::from_config(&config));
    let account = demo_account();
    let query = input.unwrap_or_else(|| DEFAULT_QUERY.to_string());

    info!(agent = %agent.name(), account = %account.name, query = %query, "Running query");

    let result = match Runner::run(&agent, &query, &account).await {
        Ok(result) => result,
        Err(e) if e.is_guardrail_rejection() => {
            eprintln!("  Request rejected: the query is not related to banking.");
            return Err(e.into());
        }
        Err(e) => return Err(e.into()),
    };

    println!("Final Output: {}", serde_json::to_string(&result.final_output)?);
    Ok(())
}
