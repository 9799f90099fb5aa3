// crates/join-token-core/src/lib.rs
// ============================================================================
// Module: Join Token Core Library
// Description: Public API surface for join token validation and defaulting.
// Purpose: Expose token types, the join method registry, and the validator.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Join token core validates the credentials that let new nodes and workloads
//! authenticate into a cluster. A token declares a join method and, depending
//! on that method, allow rules or a federated provider configuration. This
//! crate owns the per-method validation and default-resolution policy only;
//! storage, the join handshake, and cryptographic verification of identity
//! documents live with the callers.
//!
//! Security posture: token inputs are untrusted. Validation is fail-closed and
//! a token is either fully valid or rejected wholesale.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use interfaces::TokenAuditEvent;
pub use interfaces::TokenAuditOutcome;
pub use interfaces::TokenAuditSink;
pub use interfaces::TokenOperation;
pub use runtime::FileAuditSink;
pub use runtime::MemoryAuditSink;
pub use runtime::NoopAuditSink;
pub use runtime::StderrAuditSink;
pub use runtime::TokenValidator;
pub use runtime::apply_defaults;
pub use runtime::create_token;
pub use runtime::default_join_method;
pub use runtime::new_provision_token;
