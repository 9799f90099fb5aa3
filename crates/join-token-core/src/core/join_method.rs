// crates/join-token-core/src/core/join_method.rs
// ============================================================================
// Module: Join Method Registry
// Description: Closed set of supported join methods and their config contract.
// Purpose: Centralize method identifiers for parsing, dispatch, and errors.
// Dependencies: crate::core::{error, policy}, serde
// ============================================================================

//! ## Overview
//! The registry is process-wide and read-only: methods are enum variants, not
//! runtime registrations. Adding a method means adding a variant here, one
//! arm to the validator dispatch, and (for structured rules) one schema in
//! [`crate::core::rules`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use crate::core::error::TokenError;
use crate::core::policy::ValidationLimits;

// ============================================================================
// SECTION: Join Methods
// ============================================================================

/// Mechanism a node uses to redeem a join token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum JoinMethod {
    /// Shared secret: the token name is presented directly.
    Token,
    /// Signed EC2 instance identity document.
    Ec2,
    /// Signed AWS STS `GetCallerIdentity` request.
    Iam,
    /// GitHub Actions OIDC identity token.
    GitHub,
    /// `CircleCI` OIDC identity token.
    CircleCi,
    /// Kubernetes service account token.
    Kubernetes,
}

impl JoinMethod {
    /// Every supported join method in canonical order.
    pub const ALL: [Self; 6] =
        [Self::Token, Self::Ec2, Self::Iam, Self::GitHub, Self::CircleCi, Self::Kubernetes];

    /// Returns the canonical wire identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Token => "token",
            Self::Ec2 => "ec2",
            Self::Iam => "iam",
            Self::GitHub => "github",
            Self::CircleCi => "circleci",
            Self::Kubernetes => "kubernetes",
        }
    }

    /// Returns true when the method is configured through the shared
    /// cloud allow-rule list.
    #[must_use]
    pub const fn requires_allow_rules(self) -> bool {
        matches!(self, Self::Ec2 | Self::Iam)
    }

    /// Returns true when the method is configured through its own
    /// federated provider block.
    #[must_use]
    pub const fn requires_provider_config(self) -> bool {
        matches!(self, Self::GitHub | Self::CircleCi | Self::Kubernetes)
    }

    /// Returns the supported identifiers joined by `", "`.
    #[must_use]
    pub fn supported_list() -> String {
        Self::ALL.iter().map(|method| method.as_str()).collect::<Vec<_>>().join(", ")
    }
}

impl fmt::Display for JoinMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JoinMethod {
    type Err = TokenError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|method| method.as_str() == value).ok_or_else(|| {
            TokenError::invalid(format!("join method must be one of {}", Self::supported_list()))
        })
    }
}

impl TryFrom<String> for JoinMethod {
    type Error = TokenError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<JoinMethod> for String {
    fn from(value: JoinMethod) -> Self {
        value.as_str().to_string()
    }
}

/// Checks that `value` names a supported join method.
///
/// # Errors
///
/// Returns [`TokenError::InvalidConfiguration`] listing every supported
/// method when `value` is not recognized.
pub fn validate_join_method(value: &str) -> Result<JoinMethod, TokenError> {
    value.parse()
}

// ============================================================================
// SECTION: Configuration Contract
// ============================================================================

/// Contract satisfied by every per-method configuration.
///
/// Implementations are pure: they inspect their own rules and either accept
/// them or return the first violation.
pub trait JoinMethodConfig {
    /// Join method this configuration belongs to.
    fn join_method(&self) -> JoinMethod;

    /// Validates the configuration's rules against the method's field policy.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidConfiguration`] naming the method and the
    /// violated constraint.
    fn check(&self, limits: &ValidationLimits) -> Result<(), TokenError>;
}
