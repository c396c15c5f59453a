//! Tool implementations for TellerBot.
//!
//! Tools give the bank agent access to account data. Each is registered with
//! an enablement predicate that sees the caller's `Account`.

pub mod bank;

use tellerbot_core::tool::ToolRegistry;

pub use bank::{Account, BalanceResult, CheckBalanceTool, STUB_BALANCE, check_user};

/// Create the bank agent's tool registry: `check_balance`, gated by `check_user`.
pub fn bank_registry() -> ToolRegistry<Account> {
    let mut registry: ToolRegistry<Account> = ToolRegistry::new();
    registry.register_with(Box::new(CheckBalanceTool), check_user);
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_offers_check_balance() {
        let registry = bank_registry();
        let defs = registry.definitions_for(&Account::new("Alice", 1234), "BankAgent");
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].name, "check_balance");
    }
}
