//! The runner: drives one agent run from input to typed output.
//!
//! A run checks the input guardrails in order, then alternates model turns
//! and tool invocations until the model answers without requesting tools.
//! That answer is parsed into the agent's output type. Every failure ends the
//! run; nothing is retried.

use tellerbot_core::error::{Error, Result};
use tellerbot_core::message::{Conversation, Message, MessageToolCall};
use tellerbot_core::provider::{ProviderResponse, Usage};
use tellerbot_core::tool::ToolCall;
use tracing::{debug, info, warn};

use crate::agent::Agent;
use crate::guardrail::InputGuardrailResult;
use crate::output::AgentOutput;
use crate::run_state::{RunPhase, RunState};

/// The outcome of a completed run.
#[derive(Debug)]
pub struct RunResult<O> {
    /// The parsed final answer
    pub final_output: O,

    /// Name of the agent that produced the answer
    pub agent_name: String,

    /// Full transcript: system prompt, input, model turns and tool results
    pub conversation: Conversation,

    /// One entry per guardrail that ran, in order
    pub input_guardrail_results: Vec<InputGuardrailResult>,

    /// Token usage summed over every model call of this run
    pub usage: Usage,

    /// Number of model calls made
    pub turns: u32,

    /// Phases the run went through
    pub phases: Vec<RunPhase>,
}

impl<O> RunResult<O> {
    /// Every tool call the model requested during the run.
    pub fn tool_calls(&self) -> impl Iterator<Item = &MessageToolCall> {
        self.conversation.tool_calls()
    }
}

pub struct Runner;

impl Runner {
    /// Run `agent` on `input` with the caller's `context`.
    ///
    /// A tripped guardrail returns `Error::InputGuardrailTriggered` before the
    /// agent's model is called.
    pub async fn run<C, O>(agent: &Agent<C, O>, input: &str, context: &C) -> Result<RunResult<O>>
    where
        C: Sync + 'static,
        O: AgentOutput,
    {
        info!(agent = %agent.name(), model = %agent.model(), "Starting agent run");

        let mut state = RunState::new(agent.name());
        let outcome = Self::drive(agent, input, context, &mut state).await;

        match &outcome {
            Ok(result) => info!(
                agent = %agent.name(),
                turns = result.turns,
                total_tokens = result.usage.total_tokens,
                "Agent run completed"
            ),
            Err(e) if e.is_guardrail_rejection() => {
                info!(agent = %agent.name(), error = %e, "Agent run rejected by input guardrail");
            }
            Err(e) => {
                state.fail();
                warn!(agent = %agent.name(), phase = ?state.phase(), error = %e, "Agent run ended without output");
            }
        }

        outcome
    }

    /// Blocking form of [`Runner::run`].
    ///
    /// Builds a current-thread runtime for the call. Fails with
    /// `Error::Internal` when invoked from inside a tokio runtime.
    pub fn run_sync<C, O>(agent: &Agent<C, O>, input: &str, context: &C) -> Result<RunResult<O>>
    where
        C: Sync + 'static,
        O: AgentOutput,
    {
        if tokio::runtime::Handle::try_current().is_ok() {
            return Err(Error::Internal(
                "Runner::run_sync called from inside an async runtime; use Runner::run".into(),
            ));
        }

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| Error::Internal(format!("failed to start runtime: {e}")))?;

        runtime.block_on(Self::run(agent, input, context))
    }

    async fn drive<C, O>(
        agent: &Agent<C, O>,
        input: &str,
        context: &C,
        state: &mut RunState,
    ) -> Result<RunResult<O>>
    where
        C: Sync + 'static,
        O: AgentOutput,
    {
        state.advance(RunPhase::GuardrailCheck)?;
        let input_guardrail_results = Self::check_input(agent, input, context, state).await?;
        state.advance(RunPhase::Planning)?;

        let mut conversation = Conversation::new();
        conversation.push(Message::system(agent.system_prompt()));
        conversation.push(Message::user(input));

        let mut usage = Usage::default();
        let mut turns = 0u32;

        loop {
            if turns >= agent.max_turns() {
                return Err(Error::MaxTurnsExceeded {
                    agent: agent.name().to_string(),
                    max_turns: agent.max_turns(),
                });
            }
            turns += 1;

            let request = agent.build_request(&conversation, context);
            debug!(
                agent = %agent.name(),
                turn = turns,
                tools = request.tools.len(),
                "Calling model"
            );

            let ProviderResponse {
                message,
                usage: turn_usage,
                ..
            } = agent.provider().complete(request).await?;
            if let Some(turn_usage) = &turn_usage {
                usage.add(turn_usage);
            }

            if message.tool_calls.is_empty() {
                state.advance(RunPhase::OutputValidation)?;
                let text = message.content.clone();
                conversation.push(message);

                let final_output = O::parse(&text).map_err(|reason| Error::OutputValidation {
                    agent: agent.name().to_string(),
                    reason,
                })?;
                state.advance(RunPhase::Completed)?;

                return Ok(RunResult {
                    final_output,
                    agent_name: agent.name().to_string(),
                    conversation,
                    input_guardrail_results,
                    usage,
                    turns,
                    phases: state.history().to_vec(),
                });
            }

            state.advance(RunPhase::ToolInvocation)?;
            let tool_calls = message.tool_calls.clone();
            conversation.push(message);

            for tc in &tool_calls {
                let output = Self::invoke_tool(agent, context, tc).await;
                conversation.push(Message::tool_result(&tc.id, output));
            }

            state.advance(RunPhase::Planning)?;
        }
    }

    /// Run every input guardrail in order, stopping at the first tripwire.
    async fn check_input<C, O>(
        agent: &Agent<C, O>,
        input: &str,
        context: &C,
        state: &mut RunState,
    ) -> Result<Vec<InputGuardrailResult>>
    where
        C: Sync + 'static,
        O: AgentOutput,
    {
        let mut results = Vec::with_capacity(agent.input_guardrails().len());

        for guardrail in agent.input_guardrails() {
            let output = guardrail.check(context, agent.name(), input).await?;
            debug!(
                agent = %agent.name(),
                guardrail = %guardrail.name(),
                tripped = output.tripwire_triggered,
                "Input guardrail evaluated"
            );

            if output.tripwire_triggered {
                state.advance(RunPhase::Rejected)?;
                info!(agent = %agent.name(), guardrail = %guardrail.name(), "Input rejected by guardrail");
                return Err(Error::InputGuardrailTriggered {
                    guardrail: guardrail.name().to_string(),
                    output_info: output.output_info,
                });
            }

            results.push(InputGuardrailResult {
                guardrail: guardrail.name().to_string(),
                output,
            });
        }

        Ok(results)
    }

    /// Execute one requested tool call and render its result for the model.
    ///
    /// Tool failures become an `Error: ...` tool message so the model can
    /// react to them.
    async fn invoke_tool<C, O>(agent: &Agent<C, O>, context: &C, tc: &MessageToolCall) -> String
    where
        C: Sync + 'static,
        O: AgentOutput,
    {
        let arguments = match parse_arguments(&tc.arguments) {
            Ok(arguments) => arguments,
            Err(e) => {
                warn!(tool = %tc.name, error = %e, "Tool call has malformed arguments");
                return format!("Error: invalid arguments for tool '{}': {e}", tc.name);
            }
        };

        let call = ToolCall {
            id: tc.id.clone(),
            name: tc.name.clone(),
            arguments,
        };

        match agent.tools().execute(context, agent.name(), &call).await {
            Ok(result) => {
                debug!(tool = %tc.name, success = result.success, "Tool executed");
                result.output
            }
            Err(e) => {
                warn!(tool = %tc.name, error = %e, "Tool execution failed");
                format!("Error: {e}")
            }
        }
    }
}

fn parse_arguments(raw: &str) -> std::result::Result<serde_json::Value, serde_json::Error> {
    if raw.trim().is_empty() {
        return Ok(serde_json::json!({}));
    }
    serde_json::from_str(raw)
}
