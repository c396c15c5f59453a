//! Balance lookup tool: a stub that returns a constant balance.
//!
//! There is no ledger behind it: every account number reports the same
//! balance so the guardrail and agent loop can be exercised end-to-end.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tellerbot_core::error::ToolError;
use tellerbot_core::tool::{Tool, ToolResult};
use tracing::debug;

/// The balance every lookup reports.
pub const STUB_BALANCE: &str = "100000";

/// The caller's identity for one request. Read-only for the whole run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub name: String,
    pub pin: i64,
}

impl Account {
    pub fn new(name: impl Into<String>, pin: i64) -> Self {
        Self {
            name: name.into(),
            pin,
        }
    }
}

/// A balance, as reported by the tool and as the bank agent's final answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceResult {
    pub balance: String,
}

/// Enablement predicate for `check_balance`.
///
/// Always enabled for now; this is where per-account authorization would go.
pub fn check_user(_account: &Account, _agent: &str) -> bool {
    true
}

pub struct CheckBalanceTool;

#[async_trait]
impl<C: Sync> Tool<C> for CheckBalanceTool {
    fn name(&self) -> &str {
        "check_balance"
    }

    fn description(&self) -> &str {
        "Check the current balance of a bank account by its account number."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "account_number": {
                    "type": "string",
                    "description": "The account number to look up"
                }
            },
            "required": ["account_number"]
        })
    }

    async fn execute(&self, _context: &C, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let account_number = arguments["account_number"].as_str().ok_or_else(|| {
            ToolError::InvalidArguments("Missing 'account_number' argument".into())
        })?;

        debug!(account_number, "Balance lookup");

        let result = BalanceResult {
            balance: STUB_BALANCE.to_string(),
        };
        let data = serde_json::to_value(&result).map_err(|e| ToolError::ExecutionFailed {
            tool_name: "check_balance".into(),
            reason: e.to_string(),
        })?;

        Ok(ToolResult {
            call_id: String::new(),
            success: true,
            output: data.to_string(),
            data: Some(data),
        })
    }
}
