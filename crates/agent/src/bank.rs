//! The banking assistant: a topic guardrail in front of a balance agent.

use std::sync::Arc;

use tellerbot_config::AppConfig;
use tellerbot_core::provider::Provider;
use tellerbot_tools::{Account, BalanceResult, bank_registry};

use crate::agent::{Agent, DEFAULT_MAX_TURNS};
use crate::guardrail::{BankTopicGuardrail, GuardrailVerdict, InputGuardrail};
use crate::output::AgentOutput;

pub const BANK_AGENT_NAME: &str = "BankAgent";
pub const BANK_AGENT_INSTRUCTIONS: &str =
    "You are a bank agent. You can check account balance and perform transactions.";

pub const GUARDRAIL_AGENT_NAME: &str = "GuardrailAgent";
pub const GUARDRAIL_AGENT_INSTRUCTIONS: &str =
    "You are a guardrail agent. Return true if the query is NOT related to banking.";

impl AgentOutput for BalanceResult {
    fn schema_name() -> &'static str {
        "BalanceResult"
    }

    fn json_schema() -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "balance": { "type": "string" }
            },
            "required": ["balance"],
            "additionalProperties": false
        })
    }
}

/// Model settings shared by every agent of the assistant.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    pub max_turns: u32,
}

impl ModelSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            max_turns: config.max_turns,
        }
    }
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            model: "gemini-2.0-flash".into(),
            temperature: 0.7,
            max_tokens: None,
            max_turns: DEFAULT_MAX_TURNS,
        }
    }
}

fn configured<O: AgentOutput>(agent: Agent<Account, O>, settings: &ModelSettings) -> Agent<Account, O> {
    agent
        .with_temperature(settings.temperature)
        .with_max_tokens(settings.max_tokens)
        .with_max_turns(settings.max_turns)
}

/// The topic classifier behind the bank agent's guardrail. It has no tools.
pub fn guardrail_agent(
    provider: Arc<dyn Provider>,
    settings: &ModelSettings,
) -> Agent<Account, GuardrailVerdict> {
    configured(
        Agent::new(
            GUARDRAIL_AGENT_NAME,
            GUARDRAIL_AGENT_INSTRUCTIONS,
            provider,
            &settings.model,
        ),
        settings,
    )
}

/// The bank agent, guarded by [`BankTopicGuardrail`] on the same provider.
pub fn bank_agent(provider: Arc<dyn Provider>, settings: &ModelSettings) -> Agent<Account, BalanceResult> {
    let guardrail = BankTopicGuardrail::new(guardrail_agent(provider.clone(), settings));
    bank_agent_with_guardrail(provider, guardrail, settings)
}

/// The bank agent with a caller-supplied input guardrail.
pub fn bank_agent_with_guardrail(
    provider: Arc<dyn Provider>,
    guardrail: impl InputGuardrail<Account> + 'static,
    settings: &ModelSettings,
) -> Agent<Account, BalanceResult> {
    configured(
        Agent::new(BANK_AGENT_NAME, BANK_AGENT_INSTRUCTIONS, provider, &settings.model),
        settings,
    )
    .with_tools(bank_registry())
    .with_input_guardrail(guardrail)
}
