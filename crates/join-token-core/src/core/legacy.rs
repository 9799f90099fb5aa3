// crates/join-token-core/src/core/legacy.rs
// ============================================================================
// Module: Legacy Token Shape
// Description: Reduced token representation used by older callers and records.
// Purpose: Convert between the legacy shape and validated tokens.
// Dependencies: crate::core::{error, roles, token}, crate::runtime, serde, time
// ============================================================================

//! ## Overview
//! The legacy shape knows only a name, roles, and an expiry. Converting to it
//! drops labels and method configuration; converting from it rebuilds a
//! shared-secret token and re-runs full validation, so a legacy bot token
//! (which cannot carry a bot name) is rejected rather than half-restored.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use time::OffsetDateTime;

use crate::core::error::TokenError;
use crate::core::roles::SystemRoles;
use crate::core::token::ProvisionToken;
use crate::core::token::format_expiry;
use crate::runtime::validator::TokenValidator;

// ============================================================================
// SECTION: Legacy Shape
// ============================================================================

/// Legacy provisioning token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionTokenV1 {
    /// Token name and secret.
    pub token: String,
    /// Roles granted on join.
    #[serde(default)]
    pub roles: SystemRoles,
    /// Expiry instant; absent means never.
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub expires: Option<OffsetDateTime>,
}

impl ProvisionTokenV1 {
    /// Rebuilds a current token with `validator`.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidConfiguration`] when the rebuilt token
    /// fails validation.
    pub fn to_v2_with(&self, validator: &TokenValidator) -> Result<ProvisionToken, TokenError> {
        validator.build_from_legacy(self)
    }

    /// Rebuilds a current token under the default policy only.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidConfiguration`] when the rebuilt token
    /// fails validation.
    pub fn to_v2(&self) -> Result<ProvisionToken, TokenError> {
        self.to_v2_with(&TokenValidator::default())
    }
}

impl fmt::Display for ProvisionTokenV1 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProvisionToken(Roles={}, Expires={})", self.roles, format_expiry(self.expires))
    }
}

impl ProvisionToken {
    /// Projects the token onto the legacy shape.
    #[must_use]
    pub fn to_legacy(&self) -> ProvisionTokenV1 {
        ProvisionTokenV1 {
            token: self.name().to_string(),
            roles: self.roles().clone(),
            expires: self.expiry(),
        }
    }

    /// Rebuilds a token from the legacy shape under the default policy only.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidConfiguration`] when the rebuilt token
    /// fails validation.
    pub fn from_legacy(legacy: &ProvisionTokenV1) -> Result<Self, TokenError> {
        legacy.to_v2()
    }
}

// ============================================================================
// SECTION: Batch Conversion
// ============================================================================

/// Converts tokens to the legacy shape.
#[must_use]
pub fn tokens_to_legacy(tokens: &[ProvisionToken]) -> Vec<ProvisionTokenV1> {
    tokens.iter().map(ProvisionToken::to_legacy).collect()
}

/// Converts legacy tokens under the default policy; the first failure wins.
///
/// Configured hosts use [`TokenValidator::build_all_from_legacy`].
///
/// # Errors
///
/// Returns [`TokenError::InvalidConfiguration`] for the first legacy token
/// that fails validation.
pub fn tokens_from_legacy(tokens: &[ProvisionTokenV1]) -> Result<Vec<ProvisionToken>, TokenError> {
    TokenValidator::default().build_all_from_legacy(tokens)
}
