//! The agent runtime of TellerBot.
//!
//! A run follows a **Guard → Plan → Act → Validate** cycle:
//!
//! 1. **Receive** the user's input and the caller's context
//! 2. **Guard**: input guardrails run in order; the first tripwire rejects
//!    the request
//! 3. **Send to LLM** with the tools enabled for this context and the
//!    agent's output schema
//! 4. **If tool calls**: execute tools, append results, loop back to step 3
//! 5. **If a final answer**: parse it into the agent's output type
//!
//! The loop continues until the LLM answers without tool calls or the turn
//! limit is reached.

pub mod agent;
pub mod bank;
pub mod guardrail;
pub mod output;
pub mod run_state;
pub mod runner;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use agent::{Agent, DEFAULT_MAX_TURNS};
pub use bank::{ModelSettings, bank_agent, bank_agent_with_guardrail, guardrail_agent};
pub use guardrail::{
    BankTopicGuardrail, GuardrailOutput, GuardrailVerdict, InputGuardrail, InputGuardrailResult,
};
pub use output::{AgentOutput, output_instructions};
pub use run_state::{RunPhase, RunState};
pub use runner::{RunResult, Runner};
