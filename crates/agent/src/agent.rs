//! Agent definition: instructions, model settings, tools and guardrails.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use tellerbot_core::message::Conversation;
use tellerbot_core::provider::{Provider, ProviderRequest};
use tellerbot_core::tool::{Tool, ToolRegistry};

use crate::guardrail::InputGuardrail;
use crate::output::{AgentOutput, output_instructions};

/// Model calls allowed per run unless overridden.
pub const DEFAULT_MAX_TURNS: u32 = 10;

/// An LLM-backed agent over run context `C`, answering with `O`.
///
/// Immutable once built; run it with [`crate::Runner`].
pub struct Agent<C, O> {
    name: String,
    instructions: String,
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    max_turns: u32,
    tools: ToolRegistry<C>,
    input_guardrails: Vec<Box<dyn InputGuardrail<C>>>,
    _output: PhantomData<fn() -> O>,
}

impl<C: Sync + 'static, O: AgentOutput> Agent<C, O> {
    pub fn new(
        name: impl Into<String>,
        instructions: impl Into<String>,
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            instructions: instructions.into(),
            provider,
            model: model.into(),
            temperature: 0.7,
            max_tokens: None,
            max_turns: DEFAULT_MAX_TURNS,
            tools: ToolRegistry::new(),
            input_guardrails: Vec::new(),
            _output: PhantomData,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the maximum number of model calls per run (at least one).
    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns.max(1);
        self
    }

    /// Replace the tool registry.
    pub fn with_tools(mut self, tools: ToolRegistry<C>) -> Self {
        self.tools = tools;
        self
    }

    /// Add one always-enabled tool.
    pub fn with_tool(mut self, tool: impl Tool<C> + 'static) -> Self {
        self.tools.register(Box::new(tool));
        self
    }

    /// Append an input guardrail. Guardrails run in the order they were added.
    pub fn with_input_guardrail(mut self, guardrail: impl InputGuardrail<C> + 'static) -> Self {
        self.input_guardrails.push(Box::new(guardrail));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn max_turns(&self) -> u32 {
        self.max_turns
    }

    pub fn provider(&self) -> &Arc<dyn Provider> {
        &self.provider
    }

    pub fn tools(&self) -> &ToolRegistry<C> {
        &self.tools
    }

    pub fn input_guardrails(&self) -> &[Box<dyn InputGuardrail<C>>] {
        &self.input_guardrails
    }

    /// Instructions plus the description of the expected output, if any.
    pub fn system_prompt(&self) -> String {
        match output_instructions::<O>() {
            Some(note) => format!("{}\n\n{}", self.instructions, note),
            None => self.instructions.clone(),
        }
    }

    /// Request for the next model turn, offering only the tools enabled for
    /// `context`.
    pub fn build_request(&self, conversation: &Conversation, context: &C) -> ProviderRequest {
        let mut request = ProviderRequest::new(&self.model, conversation.messages.clone());
        request.temperature = self.temperature;
        request.max_tokens = self.max_tokens;
        request.tools = self.tools.definitions_for(context, &self.name);
        request.response_format = O::response_format();
        request
    }
}

impl<C, O> fmt::Debug for Agent<C, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Agent")
            .field("name", &self.name)
            .field("model", &self.model)
            .field("provider", &self.provider.name())
            .field("max_turns", &self.max_turns)
            .field("tools", &self.tools.len())
            .field("input_guardrails", &self.input_guardrails.len())
            .finish()
    }
}
