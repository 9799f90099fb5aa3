// crates/join-token-core/src/interfaces/mod.rs
// ============================================================================
// Module: Join Token Interfaces
// Description: Audit contract consumed by the token validator.
// Purpose: Let hosts route validation outcomes without hard dependencies.
// Dependencies: crate::core, serde
// ============================================================================

//! ## Overview
//! The validator reports every accepted or rejected operation as one
//! [`TokenAuditEvent`]. Events never include the token name, because for the
//! shared-secret method the name is the credential.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::core::join_method::JoinMethod;
use crate::core::roles::SystemRoles;

// ============================================================================
// SECTION: Audit Events
// ============================================================================

/// Token operation being audited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenOperation {
    /// New token construction.
    Create,
    /// Re-validation of an existing token.
    Validate,
    /// Update of an existing token's specification.
    Update,
    /// Reconstruction from the legacy shape.
    FromLegacy,
    /// Load of a stored record.
    Load,
}

/// Outcome of an audited operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenAuditOutcome {
    /// The token is valid.
    Accepted,
    /// The token was rejected.
    Rejected,
}

/// Token validation audit event payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Audited operation.
    pub operation: TokenOperation,
    /// Requested join method, after the unspecified-method heuristic.
    pub join_method: JoinMethod,
    /// Requested roles.
    pub roles: Vec<String>,
    /// Operation outcome.
    pub outcome: TokenAuditOutcome,
    /// Rejection message when rejected.
    pub error: Option<String>,
    /// Redaction classification.
    pub redaction: &'static str,
}

impl TokenAuditEvent {
    /// Creates a new audit event with a consistent timestamp.
    #[must_use]
    pub fn new(
        operation: TokenOperation,
        join_method: JoinMethod,
        roles: &SystemRoles,
        error: Option<String>,
    ) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        let outcome =
            if error.is_some() { TokenAuditOutcome::Rejected } else { TokenAuditOutcome::Accepted };
        Self {
            event: "token_validation",
            timestamp_ms,
            operation,
            join_method,
            roles: roles.names(),
            outcome,
            error,
            redaction: "token_name_omitted",
        }
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for token validation events.
pub trait TokenAuditSink: Send + Sync {
    /// Record an audit event.
    fn record(&self, event: &TokenAuditEvent);
}
