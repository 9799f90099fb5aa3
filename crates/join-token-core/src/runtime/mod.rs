// crates/join-token-core/src/runtime/mod.rs
// ============================================================================
// Module: Join Token Runtime
// Description: Defaulting, validation dispatch, and audit sinks.
// Purpose: Turn raw token input into validated tokens.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! Runtime helpers run the token pipeline: defaults are applied, the join
//! method is resolved, and the validator dispatches to the method's schema.
//! Validation retains no state between calls.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod audit;
pub mod defaults;
pub mod validator;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::FileAuditSink;
pub use audit::MemoryAuditSink;
pub use audit::NoopAuditSink;
pub use audit::StderrAuditSink;
pub use defaults::apply_defaults;
pub use defaults::default_join_method;
pub use validator::TokenValidator;
pub use validator::create_token;
pub use validator::new_provision_token;
