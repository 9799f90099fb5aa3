// crates/join-token-core/src/core/spec.rs
// ============================================================================
// Module: Token Specification
// Description: Raw token input shape and the resolved per-method configuration.
// Purpose: Separate untrusted wire input from the validated sum type.
// Dependencies: crate::core::{error, join_method, labels, roles, rules}, serde
// ============================================================================

//! ## Overview
//! [`TokenSpec`] is the flat shape callers and storage records use: every
//! method's configuration sits side by side and most fields are optional.
//! [`JoinConfig`] is what survives validation: one variant per join method,
//! each carrying only that method's configuration.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;

use crate::core::error::TokenError;
use crate::core::join_method::JoinMethod;
use crate::core::join_method::JoinMethodConfig;
use crate::core::labels::Labels;
use crate::core::policy::ValidationLimits;
use crate::core::roles::SystemRoles;
use crate::core::rules::CircleCiProviderConfig;
use crate::core::rules::Ec2JoinConfig;
use crate::core::rules::GitHubProviderConfig;
use crate::core::rules::IamJoinConfig;
use crate::core::rules::KubernetesProviderConfig;
use crate::core::rules::TokenRule;

// ============================================================================
// SECTION: Raw Specification
// ============================================================================

/// Raw token specification as supplied by callers or stored records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSpec {
    /// Roles granted on a successful join.
    #[serde(default)]
    pub roles: SystemRoles,
    /// Cloud allow rules (EC2 and IAM methods).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allow: Vec<TokenRule>,
    /// EC2 instance identity document TTL in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_iid_ttl_secs: Option<u64>,
    /// Join method; `None` (or an empty string on the wire) is unspecified.
    #[serde(
        default,
        deserialize_with = "deserialize_join_method",
        skip_serializing_if = "Option::is_none"
    )]
    pub join_method: Option<JoinMethod>,
    /// Bot name; required exactly when `roles` includes the bot role.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot_name: Option<String>,
    /// Labels a joining resource should apply to itself.
    #[serde(default, skip_serializing_if = "Labels::is_empty")]
    pub suggested_labels: Labels,
    /// Labels an agent using this token should watch for.
    #[serde(default, skip_serializing_if = "Labels::is_empty")]
    pub suggested_agent_matcher_labels: Labels,
    /// GitHub Actions provider configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<GitHubProviderConfig>,
    /// `CircleCI` provider configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub circleci: Option<CircleCiProviderConfig>,
    /// Kubernetes provider configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kubernetes: Option<KubernetesProviderConfig>,
}

impl TokenSpec {
    /// Creates a spec granting `roles` with every other field unset.
    #[must_use]
    pub fn new(roles: impl Into<SystemRoles>) -> Self {
        Self { roles: roles.into(), ..Self::default() }
    }

    /// Sets the join method.
    #[must_use]
    pub const fn with_join_method(mut self, method: JoinMethod) -> Self {
        self.join_method = Some(method);
        self
    }

    /// Sets the cloud allow rules.
    #[must_use]
    pub fn with_allow(mut self, allow: Vec<TokenRule>) -> Self {
        self.allow = allow;
        self
    }

    /// Sets the bot name.
    #[must_use]
    pub fn with_bot_name(mut self, bot_name: impl Into<String>) -> Self {
        self.bot_name = Some(bot_name.into());
        self
    }

    /// Sets the GitHub provider configuration.
    #[must_use]
    pub fn with_github(mut self, github: GitHubProviderConfig) -> Self {
        self.github = Some(github);
        self
    }

    /// Sets the `CircleCI` provider configuration.
    #[must_use]
    pub fn with_circleci(mut self, circleci: CircleCiProviderConfig) -> Self {
        self.circleci = Some(circleci);
        self
    }

    /// Sets the Kubernetes provider configuration.
    #[must_use]
    pub fn with_kubernetes(mut self, kubernetes: KubernetesProviderConfig) -> Self {
        self.kubernetes = Some(kubernetes);
        self
    }

    /// Returns the bot name when it is set and non-empty.
    #[must_use]
    pub fn effective_bot_name(&self) -> Option<&str> {
        self.bot_name.as_deref().filter(|name| !name.is_empty())
    }
}

/// Deserializes a join method, mapping an empty string to unspecified.
fn deserialize_join_method<'de, D>(deserializer: D) -> Result<Option<JoinMethod>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    match value.as_deref() {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

// ============================================================================
// SECTION: Resolved Configuration
// ============================================================================

/// Validated per-method join configuration.
///
/// # Invariants
/// - Exactly one method applies; other methods' configuration is gone.
/// - Cloud rules cannot carry fields their method forbids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinConfig {
    /// Shared secret; carries no rules.
    Token,
    /// EC2 instance identity.
    Ec2(Ec2JoinConfig),
    /// AWS IAM identity.
    Iam(IamJoinConfig),
    /// GitHub Actions OIDC.
    GitHub(GitHubProviderConfig),
    /// `CircleCI` OIDC.
    CircleCi(CircleCiProviderConfig),
    /// Kubernetes service account.
    Kubernetes(KubernetesProviderConfig),
}

impl JoinConfig {
    /// Returns the join method of this configuration.
    #[must_use]
    pub const fn join_method(&self) -> JoinMethod {
        match self {
            Self::Token => JoinMethod::Token,
            Self::Ec2(_) => JoinMethod::Ec2,
            Self::Iam(_) => JoinMethod::Iam,
            Self::GitHub(_) => JoinMethod::GitHub,
            Self::CircleCi(_) => JoinMethod::CircleCi,
            Self::Kubernetes(_) => JoinMethod::Kubernetes,
        }
    }

    /// Selects `method`'s configuration out of a defaulted raw spec.
    ///
    /// Configuration belonging to other methods is ignored, except that cloud
    /// allow rules are rejected outright for the shared-secret method.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidConfiguration`] when the method's required
    /// configuration is missing or a rule carries a forbidden field.
    pub fn resolve(method: JoinMethod, spec: &TokenSpec) -> Result<Self, TokenError> {
        match method {
            JoinMethod::Token => {
                if !spec.allow.is_empty() {
                    return Err(TokenError::invalid(format!(
                        "allow rules are not compatible with the \"{method}\" join method"
                    )));
                }
                Ok(Self::Token)
            }
            JoinMethod::Ec2 => {
                let allow = spec
                    .allow
                    .iter()
                    .cloned()
                    .map(TokenRule::into_ec2)
                    .collect::<Result<Vec<_>, _>>()?;
                let iid_ttl = Duration::from_secs(spec.aws_iid_ttl_secs.unwrap_or_default());
                Ok(Self::Ec2(Ec2JoinConfig { allow, iid_ttl }))
            }
            JoinMethod::Iam => {
                let allow = spec
                    .allow
                    .iter()
                    .cloned()
                    .map(TokenRule::into_iam)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Self::Iam(IamJoinConfig { allow }))
            }
            JoinMethod::GitHub => {
                spec.github.clone().map(Self::GitHub).ok_or_else(|| missing_provider(method))
            }
            JoinMethod::CircleCi => {
                spec.circleci.clone().map(Self::CircleCi).ok_or_else(|| missing_provider(method))
            }
            JoinMethod::Kubernetes => spec
                .kubernetes
                .clone()
                .map(Self::Kubernetes)
                .ok_or_else(|| missing_provider(method)),
        }
    }

    /// Dispatches to the method's allow-rule schema.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidConfiguration`] from the method's schema.
    pub fn check(&self, limits: &ValidationLimits) -> Result<(), TokenError> {
        match self {
            Self::Token => Ok(()),
            Self::Ec2(config) => config.check(limits),
            Self::Iam(config) => config.check(limits),
            Self::GitHub(config) => config.check(limits),
            Self::CircleCi(config) => config.check(limits),
            Self::Kubernetes(config) => config.check(limits),
        }
    }

    /// Returns the cloud allow rules in their raw shape (empty for other methods).
    #[must_use]
    pub fn allow_rules(&self) -> Vec<TokenRule> {
        match self {
            Self::Ec2(config) => config.allow.iter().map(TokenRule::from).collect(),
            Self::Iam(config) => config.allow.iter().map(TokenRule::from).collect(),
            Self::Token | Self::GitHub(_) | Self::CircleCi(_) | Self::Kubernetes(_) => Vec::new(),
        }
    }

    /// Writes this configuration into the method fields of a raw spec.
    pub(crate) fn write_into(&self, spec: &mut TokenSpec) {
        spec.join_method = Some(self.join_method());
        spec.allow = self.allow_rules();
        spec.aws_iid_ttl_secs = None;
        spec.github = None;
        spec.circleci = None;
        spec.kubernetes = None;
        match self {
            Self::Token | Self::Iam(_) => {}
            Self::Ec2(config) => spec.aws_iid_ttl_secs = Some(config.iid_ttl.as_secs()),
            Self::GitHub(config) => spec.github = Some(config.clone()),
            Self::CircleCi(config) => spec.circleci = Some(config.clone()),
            Self::Kubernetes(config) => spec.kubernetes = Some(config.clone()),
        }
    }
}

/// Error for a federated method whose provider block is absent.
fn missing_provider(method: JoinMethod) -> TokenError {
    TokenError::invalid(format!(
        "\"{method}\" configuration must be provided for join method \"{method}\""
    ))
}
