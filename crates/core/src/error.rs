//! Error types for the TellerBot domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Every failure of a run surfaces to the caller as one of these; nothing is
//! retried or recovered inside the runtime.

use thiserror::Error;

/// The top-level error type for all TellerBot operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Transport ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Guardrails ---
    #[error("Input guardrail '{guardrail}' tripped: {output_info}")]
    InputGuardrailTriggered {
        guardrail: String,
        output_info: serde_json::Value,
    },

    // --- Structured output ---
    #[error("Agent '{agent}' produced output that does not match its schema: {reason}")]
    OutputValidation { agent: String, reason: String },

    #[error("Agent '{agent}' exceeded the maximum of {max_turns} turns")]
    MaxTurnsExceeded { agent: String, max_turns: u32 },

    // --- Tool errors ---
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether the request was refused by an input guardrail rather than failing.
    pub fn is_guardrail_rejection(&self) -> bool {
        matches!(self, Error::InputGuardrailTriggered { .. })
    }
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Tool '{tool_name}' is not enabled for agent '{agent}'")]
    Disabled { tool_name: String, agent: String },

    #[error("Tool execution failed: {tool_name}: {reason}")]
    ExecutionFailed { tool_name: String, reason: String },

    #[error("Invalid tool arguments: {0}")]
    InvalidArguments(String),
}
