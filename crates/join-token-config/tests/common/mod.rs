// crates/join-token-config/tests/common/mod.rs
// ============================================================================
// Module: Common Config Test Helpers
// Description: Shared assertions for join-token-config tests.
// Purpose: Keep error matching consistent across config tests.
// Dependencies: join-token-config
// ============================================================================

//! Shared assertion helpers for config tests.

#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]

use join_token_config::ConfigError;

/// Result type shared by fallible tests.
pub type TestResult = Result<(), String>;

/// Asserts that a result is an error whose message contains `needle`.
pub fn assert_invalid<T>(result: Result<T, ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(_) => Err("expected invalid config".to_string()),
    }
}
