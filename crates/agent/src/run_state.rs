//! The per-run state machine.
//!
//! ```text
//! Received → GuardrailCheck ─┬─▶ Rejected
//!                            └─▶ Planning ⇄ ToolInvocation
//!                                   │
//!                                   ▼
//!                            OutputValidation → Completed
//!
//! any non-terminal phase ──▶ Failed
//! ```

use serde::{Deserialize, Serialize};
use tellerbot_core::Error;
use tracing::debug;

/// Where a single agent run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    /// Input and context captured
    Received,
    /// Input guardrails running in sequence
    GuardrailCheck,
    /// A guardrail tripped; the model was never asked to do the task
    Rejected,
    /// Waiting on the model to answer or request tools
    Planning,
    /// Executing the tool calls of the last model turn
    ToolInvocation,
    /// Parsing the final answer into the output type
    OutputValidation,
    Completed,
    Failed,
}

impl RunPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, RunPhase::Rejected | RunPhase::Completed | RunPhase::Failed)
    }

    pub fn can_transition_to(self, next: RunPhase) -> bool {
        use RunPhase::*;
        match (self, next) {
            (from, Failed) => !from.is_terminal(),
            (Received, GuardrailCheck)
            | (GuardrailCheck, Rejected)
            | (GuardrailCheck, Planning)
            | (Planning, ToolInvocation)
            | (Planning, OutputValidation)
            | (ToolInvocation, Planning)
            | (OutputValidation, Completed) => true,
            _ => false,
        }
    }
}

/// Tracks the phase of one run and the path it took.
#[derive(Debug)]
pub struct RunState {
    agent: String,
    phase: RunPhase,
    history: Vec<RunPhase>,
}

impl RunState {
    pub fn new(agent: impl Into<String>) -> Self {
        Self {
            agent: agent.into(),
            phase: RunPhase::Received,
            history: vec![RunPhase::Received],
        }
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Every phase visited so far, starting with `Received`.
    pub fn history(&self) -> &[RunPhase] {
        &self.history
    }

    /// Move to `next`, refusing transitions the machine does not allow.
    pub fn advance(&mut self, next: RunPhase) -> Result<(), Error> {
        if !self.phase.can_transition_to(next) {
            return Err(Error::Internal(format!(
                "agent '{}' cannot move from {:?} to {:?}",
                self.agent, self.phase, next
            )));
        }
        debug!(agent = %self.agent, from = ?self.phase, to = ?next, "Run phase transition");
        self.phase = next;
        self.history.push(next);
        Ok(())
    }

    /// Mark the run failed unless it already ended.
    pub fn fail(&mut self) {
        if !self.phase.is_terminal() {
            debug!(agent = %self.agent, from = ?self.phase, "Run failed");
            self.phase = RunPhase::Failed;
            self.history.push(RunPhase::Failed);
        }
    }
}
