// crates/join-token-core/src/core/token.rs
// ============================================================================
// Module: Provision Token
// Description: Validated join token entity and its persistence record.
// Purpose: Expose read-only projections of a token that passed validation.
// Dependencies: crate::core::*, crate::runtime::validator, serde, time
// ============================================================================

//! ## Overview
//! A [`ProvisionToken`] only exists after defaulting and validation succeed.
//! Mutators re-run the validator and leave the token untouched on failure,
//! so a token visible to other components is always complete.
//!
//! Stored tokens use [`ProvisionTokenRecord`]; deserializing a token goes
//! through the record and the default validator, so invalid records fail to
//! load. Configured hosts load records with [`TokenValidator::load`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;
use time::OffsetDateTime;
use time::UtcOffset;
use time::format_description::well_known::Rfc3339;

use crate::core::error::TokenError;
use crate::core::join_method::JoinMethod;
use crate::core::labels::Labels;
use crate::core::metadata::KIND_TOKEN;
use crate::core::metadata::Metadata;
use crate::core::metadata::VERSION_V2;
use crate::core::roles::SystemRoles;
use crate::core::rules::TokenRule;
use crate::core::spec::JoinConfig;
use crate::core::spec::TokenSpec;
use crate::runtime::validator::TokenValidator;

// ============================================================================
// SECTION: Token Entity
// ============================================================================

/// Validated provisioning token.
///
/// # Invariants
/// - `roles` is non-empty and duplicate-free.
/// - `bot_name` is set exactly when `roles` includes the bot role.
/// - `join` satisfies its method's allow-rule schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ProvisionTokenRecord", into = "ProvisionTokenRecord")]
pub struct ProvisionToken {
    /// Resource metadata with defaults applied.
    metadata: Metadata,
    /// Roles granted on join.
    roles: SystemRoles,
    /// Bot name for bot tokens.
    bot_name: Option<String>,
    /// Resolved join method configuration.
    join: JoinConfig,
    /// Labels the joining resource should apply.
    suggested_labels: Labels,
    /// Labels agents using this token should watch.
    suggested_agent_matcher_labels: Labels,
}

impl ProvisionToken {
    /// Assembles a token from parts the validator has already checked.
    pub(crate) const fn from_validated_parts(
        metadata: Metadata,
        roles: SystemRoles,
        bot_name: Option<String>,
        join: JoinConfig,
        suggested_labels: Labels,
        suggested_agent_matcher_labels: Labels,
    ) -> Self {
        Self { metadata, roles, bot_name, join, suggested_labels, suggested_agent_matcher_labels }
    }

    /// Returns the token name (the secret for the shared-secret method).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Returns the resource metadata.
    #[must_use]
    pub const fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Returns the resource kind stamp.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        KIND_TOKEN
    }

    /// Returns the resource version stamp.
    #[must_use]
    pub const fn version(&self) -> &'static str {
        VERSION_V2
    }

    /// Returns the roles granted on join.
    #[must_use]
    pub const fn roles(&self) -> &SystemRoles {
        &self.roles
    }

    /// Returns the join method.
    #[must_use]
    pub const fn join_method(&self) -> JoinMethod {
        self.join.join_method()
    }

    /// Returns the resolved join configuration.
    #[must_use]
    pub const fn join_config(&self) -> &JoinConfig {
        &self.join
    }

    /// Returns the cloud allow rules in their raw shape.
    #[must_use]
    pub fn allow_rules(&self) -> Vec<TokenRule> {
        self.join.allow_rules()
    }

    /// Returns the EC2 identity document TTL for EC2 tokens.
    #[must_use]
    pub const fn aws_iid_ttl(&self) -> Option<Duration> {
        match &self.join {
            JoinConfig::Ec2(config) => Some(config.iid_ttl),
            _ => None,
        }
    }

    /// Returns the bot name for bot tokens.
    #[must_use]
    pub fn bot_name(&self) -> Option<&str> {
        self.bot_name.as_deref()
    }

    /// Returns the labels a joining resource should apply to itself.
    #[must_use]
    pub const fn suggested_labels(&self) -> &Labels {
        &self.suggested_labels
    }

    /// Returns the labels agents using this token should watch for.
    #[must_use]
    pub const fn suggested_agent_matcher_labels(&self) -> &Labels {
        &self.suggested_agent_matcher_labels
    }

    /// Returns the expiry; `None` means the token never expires.
    #[must_use]
    pub const fn expiry(&self) -> Option<OffsetDateTime> {
        self.metadata.expires
    }

    /// Sets the expiry, normalized to UTC.
    pub fn set_expiry(&mut self, expires: Option<OffsetDateTime>) {
        self.metadata.expires = expires.map(|value| value.to_offset(UtcOffset::UTC));
    }

    /// Projects the token back into its raw specification.
    #[must_use]
    pub fn to_spec(&self) -> TokenSpec {
        let mut spec = TokenSpec {
            roles: self.roles.clone(),
            bot_name: self.bot_name.clone(),
            suggested_labels: self.suggested_labels.clone(),
            suggested_agent_matcher_labels: self.suggested_agent_matcher_labels.clone(),
            ..TokenSpec::default()
        };
        self.join.write_into(&mut spec);
        spec
    }

    /// Re-checks every invariant with `validator`.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidConfiguration`] for the first violation.
    pub fn validate_with(&self, validator: &TokenValidator) -> Result<(), TokenError> {
        validator.validate(self)
    }

    /// Re-checks every invariant under the default policy only.
    ///
    /// Tokens built by a configured validator should use
    /// [`ProvisionToken::validate_with`].
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidConfiguration`] for the first violation.
    pub fn validate(&self) -> Result<(), TokenError> {
        self.validate_with(&TokenValidator::default())
    }

    /// Replaces the roles under the default policy only.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidConfiguration`] and leaves the token
    /// unchanged when the new roles are invalid.
    pub fn set_roles(&mut self, roles: SystemRoles) -> Result<(), TokenError> {
        TokenValidator::default().set_roles(self, roles)
    }

    /// Applies `edit` to the raw specification and re-validates with
    /// `validator`.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidConfiguration`] and leaves the token
    /// unchanged when the edited specification is invalid.
    pub fn update_spec_with<F>(
        &mut self,
        validator: &TokenValidator,
        edit: F,
    ) -> Result<(), TokenError>
    where
        F: FnOnce(&mut TokenSpec),
    {
        validator.update(self, edit)
    }

    /// Applies `edit` to the raw specification under the default policy only.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidConfiguration`] and leaves the token
    /// unchanged when the edited specification is invalid.
    pub fn update_spec<F>(&mut self, edit: F) -> Result<(), TokenError>
    where
        F: FnOnce(&mut TokenSpec),
    {
        self.update_spec_with(&TokenValidator::default(), edit)
    }
}

impl fmt::Display for ProvisionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProvisionToken(Roles={}, Expires={})", self.roles, format_expiry(self.expiry()))
    }
}

/// Formats an optional expiry, using `never` for tokens without one.
pub(crate) fn format_expiry(expires: Option<OffsetDateTime>) -> String {
    expires
        .and_then(|value| value.format(&Rfc3339).ok())
        .unwrap_or_else(|| "never".to_string())
}

// ============================================================================
// SECTION: Persistence Record
// ============================================================================

/// Serialized form of a token as handed to storage.
///
/// Deserializing a [`ProvisionToken`] directly validates under the default
/// policy; use [`TokenValidator::load`] for records written under a
/// configured policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionTokenRecord {
    /// Resource kind; overwritten with `token` on load.
    #[serde(default)]
    pub kind: String,
    /// Resource version; overwritten with `v2` on load.
    #[serde(default)]
    pub version: String,
    /// Resource metadata.
    pub metadata: Metadata,
    /// Raw token specification.
    #[serde(default)]
    pub spec: TokenSpec,
}

impl TryFrom<ProvisionTokenRecord> for ProvisionToken {
    type Error = TokenError;

    fn try_from(record: ProvisionTokenRecord) -> Result<Self, Self::Error> {
        TokenValidator::default().build(record.metadata, record.spec)
    }
}

impl From<ProvisionToken> for ProvisionTokenRecord {
    fn from(token: ProvisionToken) -> Self {
        let spec = token.to_spec();
        Self {
            kind: KIND_TOKEN.to_string(),
            version: VERSION_V2.to_string(),
            metadata: token.metadata,
            spec,
        }
    }
}
