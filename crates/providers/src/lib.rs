//! Model client implementations for TellerBot.
//!
//! All providers implement the `tellerbot_core::Provider` trait.

pub mod openai_compat;

use std::sync::Arc;
use std::time::Duration;

use tellerbot_config::AppConfig;
use tellerbot_core::error::ProviderError;
use tellerbot_core::provider::Provider;

pub use openai_compat::{GEMINI_BASE_URL, OpenAiCompatProvider};

/// Build the configured provider.
///
/// Fails with `NotConfigured` when no credential is available, so a missing
/// `GEMINI_API_KEY` stops the program before any model call is attempted.
pub fn build_from_config(config: &AppConfig) -> Result<Arc<dyn Provider>, ProviderError> {
    let api_key = config
        .require_api_key()
        .map_err(|e| ProviderError::NotConfigured(e.to_string()))?;

    let provider = OpenAiCompatProvider::with_timeout(
        &config.provider,
        &config.base_url,
        api_key,
        Duration::from_secs(config.request_timeout_secs),
    )?;

    tracing::debug!(
        provider = %config.provider,
        base_url = %config.base_url,
        model = %config.model,
        "Provider configured"
    );

    Ok(Arc::new(provider))
}
