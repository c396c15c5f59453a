//! Input guardrails: checks that run before an agent is allowed to work on a
//! request.
//!
//! A guardrail inspects the raw input (and the run context) and reports a
//! [`GuardrailOutput`]. If `tripwire_triggered` is set the runner rejects the
//! request with `Error::InputGuardrailTriggered` and the agent's model is
//! never asked to handle it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tellerbot_core::error::Result;
use tracing::info;

use crate::agent::Agent;
use crate::output::AgentOutput;
use crate::runner::Runner;

/// What a guardrail reports back to the runner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuardrailOutput {
    /// Free-form detail about the decision, surfaced on rejection.
    pub output_info: serde_json::Value,
    pub tripwire_triggered: bool,
}

/// A guardrail's output, tagged with the guardrail's name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputGuardrailResult {
    pub guardrail: String,
    pub output: GuardrailOutput,
}

#[async_trait]
pub trait InputGuardrail<C>: Send + Sync {
    fn name(&self) -> &str;

    /// Evaluate `input` on behalf of the agent named `agent_name`.
    ///
    /// An `Err` aborts the run; it is not treated as a pass or a trip.
    async fn check(&self, context: &C, agent_name: &str, input: &str) -> Result<GuardrailOutput>;
}

/// The topic classifier's verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardrailVerdict {
    pub is_not_bank_related: bool,
}

impl AgentOutput for GuardrailVerdict {
    fn schema_name() -> &'static str {
        "GuardrailVerdict"
    }

    fn json_schema() -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "is_not_bank_related": {
                    "type": "boolean",
                    "description": "True when the query has nothing to do with banking"
                }
            },
            "required": ["is_not_bank_related"],
            "additionalProperties": false
        })
    }
}

/// Trips on queries that are not about banking.
///
/// Classification is delegated to a dedicated agent run through the same
/// [`Runner`], with the parent's context. A fresh verdict is computed for
/// every request.
pub struct BankTopicGuardrail<C> {
    classifier: Agent<C, GuardrailVerdict>,
}

impl<C> BankTopicGuardrail<C> {
    pub const NAME: &'static str = "check_bank_related";

    pub fn new(classifier: Agent<C, GuardrailVerdict>) -> Self {
        Self { classifier }
    }
}

#[async_trait]
impl<C: Sync + 'static> InputGuardrail<C> for BankTopicGuardrail<C> {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn check(&self, context: &C, agent_name: &str, input: &str) -> Result<GuardrailOutput> {
        let result = Runner::run(&self.classifier, input, context).await?;
        let verdict = result.final_output;

        info!(
            agent = agent_name,
            classifier = %self.classifier.name(),
            is_not_bank_related = verdict.is_not_bank_related,
            "Guardrail verdict"
        );

        Ok(GuardrailOutput {
            output_info: serde_json::to_value(verdict)?,
            tripwire_triggered: verdict.is_not_bank_related,
        })
    }
}
