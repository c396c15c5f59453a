//! Tool trait and registry.
//!
//! A tool is a structured function the model may elect to call. Every tool
//! receives the run's context explicitly, and every registration carries an
//! enablement predicate deciding whether the tool is exposed for a given
//! context and agent.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::ToolError;
use crate::provider::ToolDefinition;

/// A request to execute a tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique call ID (matches the LLM's tool_call.id)
    pub id: String,

    /// Name of the tool to execute
    pub name: String,

    /// Arguments as a JSON value
    pub arguments: serde_json::Value,
}

/// The result of a tool execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// The call ID this result is for
    pub call_id: String,

    /// Whether the tool executed successfully
    pub success: bool,

    /// The output content fed back to the model
    pub output: String,

    /// Optional structured data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

/// The core Tool trait, generic over the run context `C`.
///
/// Context is borrowed immutably: a tool can read it but never change it.
#[async_trait]
pub trait Tool<C>: Send + Sync {
    /// The unique name of this tool (e.g., "check_balance").
    fn name(&self) -> &str;

    /// A description of what this tool does (sent to the LLM).
    fn description(&self) -> &str;

    /// JSON Schema describing this tool's parameters.
    fn parameters_schema(&self) -> serde_json::Value;

    /// Execute the tool with the given arguments.
    async fn execute(
        &self,
        context: &C,
        arguments: serde_json::Value,
    ) -> std::result::Result<ToolResult, ToolError>;

    /// Convert this tool into a ToolDefinition for sending to the LLM.
    fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}

/// Decides, per request, whether a tool is offered to the model.
///
/// Receives the run context and the name of the agent about to call the model.
pub type EnablementPredicate<C> = Box<dyn Fn(&C, &str) -> bool + Send + Sync>;

struct RegisteredTool<C> {
    tool: Box<dyn Tool<C>>,
    is_enabled: EnablementPredicate<C>,
}

/// A registry mapping tool name to {enablement predicate, schema, handler}.
///
/// Built once when an agent is assembled. The agent loop uses it to:
/// 1. Get the definitions of the tools enabled for this request
/// 2. Look up and execute tools when the LLM requests them
pub struct ToolRegistry<C> {
    tools: HashMap<String, RegisteredTool<C>>,
}

impl<C: Sync + 'static> ToolRegistry<C> {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool that is always enabled.
    pub fn register(&mut self, tool: Box<dyn Tool<C>>) {
        self.register_with(tool, |_: &C, _: &str| true);
    }

    /// Register a tool behind an enablement predicate. Replaces any existing
    /// tool with the same name.
    pub fn register_with<F>(&mut self, tool: Box<dyn Tool<C>>, is_enabled: F)
    where
        F: Fn(&C, &str) -> bool + Send + Sync + 'static,
    {
        let name = tool.name().to_string();
        self.tools.insert(
            name,
            RegisteredTool {
                tool,
                is_enabled: Box::new(is_enabled),
            },
        );
    }

    /// Get a tool by name, regardless of whether it is enabled.
    pub fn get(&self, name: &str) -> Option<&dyn Tool<C>> {
        self.tools.get(name).map(|t| t.tool.as_ref())
    }

    /// Whether `name` is registered and enabled for this context and agent.
    pub fn is_enabled(&self, name: &str, context: &C, agent: &str) -> bool {
        self.tools
            .get(name)
            .is_some_and(|t| (t.is_enabled)(context, agent))
    }

    /// Definitions of the tools enabled for this context, sorted by name.
    pub fn definitions_for(&self, context: &C, agent: &str) -> Vec<ToolDefinition> {
        let mut defs: Vec<ToolDefinition> = self
            .tools
            .values()
            .filter(|t| (t.is_enabled)(context, agent))
            .map(|t| t.tool.to_definition())
            .collect();
        defs.sort_by(|a, b| a.name.cmp(&b.name));
        defs
    }

    /// Execute a tool call. Disabled tools are refused without running.
    pub async fn execute(
        &self,
        context: &C,
        agent: &str,
        call: &ToolCall,
    ) -> std::result::Result<ToolResult, ToolError> {
        let entry = self
            .tools
            .get(&call.name)
            .ok_or_else(|| ToolError::NotFound(call.name.clone()))?;

        if !(entry.is_enabled)(context, agent) {
            tracing::debug!(tool = %call.name, agent, "Refusing disabled tool");
            return Err(ToolError::Disabled {
                tool_name: call.name.clone(),
                agent: agent.to_string(),
            });
        }

        let mut result = entry.tool.execute(context, call.arguments.clone()).await?;
        result.call_id = call.id.clone();
        Ok(result)
    }
}

impl<C> ToolRegistry<C> {
    /// List all registered tool names.
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(|s| s.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl<C: Sync + 'static> Default for ToolRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Ctx {
        allowed: bool,
    }

    /// Echoes back the input and counts its invocations.
    struct EchoTool {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Tool<Ctx> for EchoTool {
        fn name(&self) -> &str { "echo" }
        fn description(&self) -> &str { "Echoes back the input" }
        fn parameters_schema(&self) -> serde_json::Value {
            serde_json::json!({
                "type": "object",
                "properties": {
                    "text": { "type": "string" }
                },
                "required": ["text"]
            })
        }
        async fn execute(
            &self,
            _context: &Ctx,
            arguments: serde_json::Value,
        ) -> std::result::Result<ToolResult, ToolError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let text = arguments["text"].as_str().unwrap_or("").to_string();
            Ok(ToolResult {
                call_id: String::new(),
                success: true,
                output: text,
                data: None,
            })
        }
    }

    fn gated_registry(calls: Arc<AtomicUsize>) -> ToolRegistry<Ctx> {
        let mut registry: ToolRegistry<Ctx> = ToolRegistry::new();
        registry.register_with(Box::new(EchoTool { calls }), |ctx: &Ctx, _agent: &str| {
            ctx.allowed
        });
        registry
    }

    fn echo_call() -> ToolCall {
        ToolCall {
            id: "call_1".into(),
            name: "echo".into(),
            arguments: serde_json::json!({"text": "hello world"}),
        }
    }

    #[test]
    fn registry_register_and_lookup() {
        let registry = gated_registry(Arc::default());
        assert!(registry.get("echo").is_some());
        assert!(registry.get("nonexistent").is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn definitions_follow_predicate() {
        let registry = gated_registry(Arc::default());
        let defs = registry.definitions_for(&Ctx { allowed: true }, "agent");
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].name, "echo");

        assert!(registry.definitions_for(&Ctx { allowed: false }, "agent").is_empty());
        assert!(!registry.is_enabled("echo", &Ctx { allowed: false }, "agent"));
    }

    #[test]
    fn predicate_sees_agent_name() {
        let mut registry: ToolRegistry<Ctx> = ToolRegistry::new();
        registry.register_with(
            Box::new(EchoTool { calls: Arc::default() }),
            |_: &Ctx, agent: &str| agent == "BankAgent",
        );
        let ctx = Ctx { allowed: true };
        assert!(registry.is_enabled("echo", &ctx, "BankAgent"));
        assert!(!registry.is_enabled("echo", &ctx, "GuardrailAgent"));
    }

    #[tokio::test]
    async fn registry_execute_tool() {
        let calls = Arc::new(AtomicUsize::new(0));
        let registry = gated_registry(calls.clone());

        let result = registry
            .execute(&Ctx { allowed: true }, "agent", &echo_call())
            .await
            .unwrap();
        assert!(result.success);
        assert_eq!(result.output, "hello world");
        assert_eq!(result.call_id, "call_1");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn disabled_tool_is_never_invoked() {
        let calls = Arc::new(AtomicUsize::new(0));
        let registry = gated_registry(calls.clone());

        let err = registry
            .execute(&Ctx { allowed: false }, "agent", &echo_call())
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Disabled { .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn registry_execute_missing_tool() {
        let registry: ToolRegistry<Ctx> = ToolRegistry::new();
        let call = ToolCall {
            id: "call_1".into(),
            name: "nonexistent".into(),
            arguments: serde_json::json!({}),
        };
        let err = registry
            .execute(&Ctx { allowed: true }, "agent", &call)
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::NotFound(_)));
    }
}
