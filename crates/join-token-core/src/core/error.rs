// crates/join-token-core/src/core/error.rs
// ============================================================================
// Module: Join Token Errors
// Description: Error type shared by every token validation path.
// Purpose: Surface deterministic, human-readable validation failures.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! All validation failures share one error kind. Messages name the offending
//! field, join method, or rule so callers can correct their input; failures
//! are deterministic and never worth retrying.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Token validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// The token or one of its method configurations is invalid.
    #[error("invalid token configuration: {0}")]
    InvalidConfiguration(String),
}

impl TokenError {
    /// Builds an [`TokenError::InvalidConfiguration`] from a message.
    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }

    /// Returns the message without the error-kind prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::InvalidConfiguration(message) => message,
        }
    }
}
