//! # TellerBot Core
//!
//! Domain types, traits, and error definitions for the TellerBot agent runtime.
//! Nothing in here talks to the network: the crate defines the model that the
//! provider, tool, and agent crates implement against.
//!
//! ## Design Philosophy
//!
//! Every seam is a trait here. Implementations live in their respective
//! crates, which keeps the dependency graph pointing inward and lets tests
//! swap in scripted providers and stub tools.

pub mod error;
pub mod message;
pub mod provider;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use error::{Error, ProviderError, Result, ToolError};
pub use message::{Conversation, ConversationId, Message, MessageToolCall, Role};
pub use provider::{Provider, ProviderRequest, ProviderResponse, ResponseFormat, ToolDefinition, Usage};
pub use tool::{EnablementPredicate, Tool, ToolCall, ToolRegistry, ToolResult};
