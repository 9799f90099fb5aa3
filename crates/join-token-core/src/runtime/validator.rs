// crates/join-token-core/src/runtime/validator.rs
// ============================================================================
// Module: Token Validator
// Description: Single chokepoint that defaults, validates, and builds tokens.
// Purpose: Enforce method-independent rules and dispatch per join method.
// Dependencies: crate::{core, interfaces, runtime::defaults}, time
// ============================================================================

//! ## Overview
//! Every token construction, update, record load, and legacy import passes
//! through [`TokenValidator`]. The pipeline is:
//!
//! 1. metadata defaults and checks,
//! 2. implicit defaults ([`apply_defaults`]),
//! 3. method-independent checks (roles, bot name coupling, labels),
//! 4. join method resolution into a [`JoinConfig`],
//! 5. the method's allow-rule schema.
//!
//! The first failure is returned; there is no aggregate reporting. The
//! validator holds no per-call state, so it is safe to share across threads.
//!
//! A token must be re-validated, updated, and reloaded by a validator with
//! the same policy that built it. The shorthands on [`ProvisionToken`] and
//! the serde implementation use the default policy only.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use time::OffsetDateTime;

use crate::core::error::TokenError;
use crate::core::join_method::JoinMethod;
use crate::core::labels::Labels;
use crate::core::legacy::ProvisionTokenV1;
use crate::core::metadata::Metadata;
use crate::core::policy::ValidationLimits;
use crate::core::policy::ValidationPolicy;
use crate::core::roles::SystemRole;
use crate::core::roles::SystemRoles;
use crate::core::spec::JoinConfig;
use crate::core::spec::TokenSpec;
use crate::core::token::ProvisionToken;
use crate::core::token::ProvisionTokenRecord;
use crate::interfaces::TokenAuditEvent;
use crate::interfaces::TokenAuditSink;
use crate::interfaces::TokenOperation;
use crate::runtime::audit::NoopAuditSink;
use crate::runtime::defaults::apply_defaults;
use crate::runtime::defaults::default_join_method;

// ============================================================================
// SECTION: Validator
// ============================================================================

/// Token validator configured with a policy and an audit sink.
#[derive(Clone)]
pub struct TokenValidator {
    /// Defaults and limits.
    policy: ValidationPolicy,
    /// Destination for audit events.
    audit: Arc<dyn TokenAuditSink>,
}

impl Default for TokenValidator {
    fn default() -> Self {
        Self::new(ValidationPolicy::default())
    }
}

impl TokenValidator {
    /// Creates a validator that discards audit events.
    #[must_use]
    pub fn new(policy: ValidationPolicy) -> Self {
        Self { policy, audit: Arc::new(NoopAuditSink) }
    }

    /// Routes audit events to `sink`.
    #[must_use]
    pub fn with_audit_sink(mut self, sink: Arc<dyn TokenAuditSink>) -> Self {
        self.audit = sink;
        self
    }

    /// Returns the active policy.
    #[must_use]
    pub const fn policy(&self) -> &ValidationPolicy {
        &self.policy
    }

    /// Creates a token from a name, an optional expiry, and a raw spec.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidConfiguration`] for the first violation.
    pub fn create_token(
        &self,
        name: impl Into<String>,
        expires: Option<OffsetDateTime>,
        spec: TokenSpec,
    ) -> Result<ProvisionToken, TokenError> {
        self.build(Metadata::new(name, expires), spec)
    }

    /// Builds a token from full metadata and a raw spec.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidConfiguration`] for the first violation.
    pub fn build(&self, metadata: Metadata, spec: TokenSpec) -> Result<ProvisionToken, TokenError> {
        let method = requested_method(&spec);
        let roles = spec.roles.clone();
        let result = self.resolve(metadata, spec);
        self.emit(TokenOperation::Create, method, &roles, result.as_ref().err());
        result
    }

    /// Re-checks every invariant of an existing token.
    ///
    /// Validation is idempotent: a token built by this validator always
    /// passes.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidConfiguration`] for the first violation.
    pub fn validate(&self, token: &ProvisionToken) -> Result<(), TokenError> {
        let result = self.check_token(token);
        self.emit(
            TokenOperation::Validate,
            token.join_method(),
            token.roles(),
            result.as_ref().err(),
        );
        result
    }

    /// Applies `edit` to a token's raw spec and rebuilds it.
    ///
    /// The token is replaced only when the edited spec validates.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidConfiguration`] for the first violation.
    pub fn update<F>(&self, token: &mut ProvisionToken, edit: F) -> Result<(), TokenError>
    where
        F: FnOnce(&mut TokenSpec),
    {
        let mut spec = token.to_spec();
        edit(&mut spec);
        let method = requested_method(&spec);
        let roles = spec.roles.clone();
        let result = self.resolve(token.metadata().clone(), spec);
        self.emit(TokenOperation::Update, method, &roles, result.as_ref().err());
        *token = result?;
        Ok(())
    }

    /// Replaces a token's roles and rebuilds it.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidConfiguration`] and leaves the token
    /// unchanged when the new roles are invalid.
    pub fn set_roles(
        &self,
        token: &mut ProvisionToken,
        roles: SystemRoles,
    ) -> Result<(), TokenError> {
        self.update(token, |spec| spec.roles = roles)
    }

    /// Loads a stored record, applying defaults and full validation.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidConfiguration`] for the first violation.
    pub fn load(&self, record: ProvisionTokenRecord) -> Result<ProvisionToken, TokenError> {
        let method = requested_method(&record.spec);
        let roles = record.spec.roles.clone();
        let result = self.resolve(record.metadata, record.spec);
        self.emit(TokenOperation::Load, method, &roles, result.as_ref().err());
        result
    }

    /// Rebuilds a shared-secret token from the legacy shape.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidConfiguration`] for the first violation.
    pub fn build_from_legacy(
        &self,
        legacy: &ProvisionTokenV1,
    ) -> Result<ProvisionToken, TokenError> {
        let metadata = Metadata::new(legacy.token.clone(), legacy.expires);
        let spec = TokenSpec::new(legacy.roles.clone()).with_join_method(JoinMethod::Token);
        let result = self.resolve(metadata, spec);
        self.emit(
            TokenOperation::FromLegacy,
            JoinMethod::Token,
            &legacy.roles,
            result.as_ref().err(),
        );
        result
    }

    /// Rebuilds legacy tokens in order; the first failure wins.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidConfiguration`] for the first legacy token
    /// that fails validation.
    pub fn build_all_from_legacy(
        &self,
        tokens: &[ProvisionTokenV1],
    ) -> Result<Vec<ProvisionToken>, TokenError> {
        tokens.iter().map(|legacy| self.build_from_legacy(legacy)).collect()
    }

    /// Runs the full pipeline without auditing.
    fn resolve(
        &self,
        mut metadata: Metadata,
        mut spec: TokenSpec,
    ) -> Result<ProvisionToken, TokenError> {
        metadata.check_and_set_defaults()?;
        let method = apply_defaults(&mut spec, &self.policy);
        check_common(
            &spec.roles,
            spec.effective_bot_name(),
            &spec.suggested_labels,
            &spec.suggested_agent_matcher_labels,
            &self.policy.limits,
        )?;
        let join = JoinConfig::resolve(method, &spec)?;
        join.check(&self.policy.limits)?;
        let bot_name = spec.effective_bot_name().map(str::to_string);
        Ok(ProvisionToken::from_validated_parts(
            metadata,
            spec.roles,
            bot_name,
            join,
            spec.suggested_labels,
            spec.suggested_agent_matcher_labels,
        ))
    }

    /// Checks an existing token without auditing.
    fn check_token(&self, token: &ProvisionToken) -> Result<(), TokenError> {
        token.metadata().check()?;
        check_common(
            token.roles(),
            token.bot_name(),
            token.suggested_labels(),
            token.suggested_agent_matcher_labels(),
            &self.policy.limits,
        )?;
        token.join_config().check(&self.policy.limits)
    }

    /// Emits one audit event for an operation.
    fn emit(
        &self,
        operation: TokenOperation,
        join_method: JoinMethod,
        roles: &SystemRoles,
        error: Option<&TokenError>,
    ) {
        let event = TokenAuditEvent::new(
            operation,
            join_method,
            roles,
            error.map(|err| err.message().to_string()),
        );
        self.audit.record(&event);
    }
}

// ============================================================================
// SECTION: Convenience Constructors
// ============================================================================

/// Creates a token with the default validator.
///
/// # Errors
///
/// Returns [`TokenError::InvalidConfiguration`] for the first violation.
pub fn create_token(
    name: impl Into<String>,
    expires: Option<OffsetDateTime>,
    spec: TokenSpec,
) -> Result<ProvisionToken, TokenError> {
    TokenValidator::default().create_token(name, expires, spec)
}

/// Creates a shared-secret token granting `roles`.
///
/// # Errors
///
/// Returns [`TokenError::InvalidConfiguration`] for the first violation.
pub fn new_provision_token(
    name: impl Into<String>,
    roles: SystemRoles,
    expires: Option<OffsetDateTime>,
) -> Result<ProvisionToken, TokenError> {
    create_token(name, expires, TokenSpec::new(roles))
}

// ============================================================================
// SECTION: Method-Independent Checks
// ============================================================================

/// Returns the join method a spec will resolve to.
fn requested_method(spec: &TokenSpec) -> JoinMethod {
    spec.join_method.unwrap_or_else(|| default_join_method(spec))
}

/// Checks roles, bot name coupling, and label shape.
fn check_common(
    roles: &SystemRoles,
    bot_name: Option<&str>,
    suggested_labels: &Labels,
    suggested_agent_matcher_labels: &Labels,
    limits: &ValidationLimits,
) -> Result<(), TokenError> {
    if roles.is_empty() {
        return Err(TokenError::invalid("provisioning token is missing roles"));
    }
    if roles.len() > limits.max_roles {
        return Err(TokenError::invalid(format!(
            "provisioning token has more than {} roles",
            limits.max_roles
        )));
    }
    roles.check()?;
    let is_bot = roles.include(SystemRole::Bot);
    match bot_name {
        None if is_bot => {
            return Err(TokenError::invalid(format!(
                "token with role \"{}\" must set bot_name",
                SystemRole::Bot
            )));
        }
        Some(_) if !is_bot => {
            return Err(TokenError::invalid(format!(
                "can only set bot_name on token with role \"{}\"",
                SystemRole::Bot
            )));
        }
        Some(name) if name.len() > limits.max_field_length => {
            return Err(TokenError::invalid(format!(
                "bot_name longer than {} bytes",
                limits.max_field_length
            )));
        }
        _ => {}
    }
    suggested_labels.check("suggested_labels", limits)?;
    suggested_agent_matcher_labels.check("suggested_agent_matcher_labels", limits)
}
