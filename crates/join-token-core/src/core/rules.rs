// crates/join-token-core/src/core/rules.rs
// ============================================================================
// Module: Allow-Rule Schemas
// Description: Per-method allow rules and provider configurations.
// Purpose: Enforce each join method's legal field combinations.
// Dependencies: crate::core::{error, join_method, policy}, serde
// ============================================================================

//! ## Overview
//! The cloud methods share one wire shape, [`TokenRule`], but each method
//! accepts a different subset of its fields. Conversion into the typed
//! per-method rule ([`Ec2AllowRule`], [`IamAllowRule`]) is where forbidden
//! fields are rejected; once converted, a forbidden field cannot be carried.
//! Federated methods own a provider block with their own rule type.
//!
//! Every schema is pure: it inspects its rules and returns the first
//! violation. Empty strings are treated as unset throughout.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

use crate::core::error::TokenError;
use crate::core::join_method::JoinMethod;
use crate::core::join_method::JoinMethodConfig;
use crate::core::policy::ValidationLimits;

// ============================================================================
// SECTION: Shared Cloud Rule Shape
// ============================================================================

/// Raw cloud allow rule as stored and exchanged on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRule {
    /// AWS account identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_account: Option<String>,
    /// AWS regions the instance may run in (EC2 only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aws_regions: Vec<String>,
    /// AWS role the auth server assumes to describe instances (EC2 only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_role: Option<String>,
    /// AWS ARN of the joining identity (IAM only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_arn: Option<String>,
}

impl TokenRule {
    /// Converts the rule into an EC2 rule.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidConfiguration`] when `aws_arn` is set.
    pub fn into_ec2(self) -> Result<Ec2AllowRule, TokenError> {
        if is_set(self.aws_arn.as_ref()) {
            return Err(unsupported_parameter(JoinMethod::Ec2, "aws_arn"));
        }
        Ok(Ec2AllowRule {
            aws_account: non_empty(self.aws_account),
            aws_role: non_empty(self.aws_role),
            aws_regions: self.aws_regions,
        })
    }

    /// Converts the rule into an IAM rule.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidConfiguration`] when `aws_role` or
    /// `aws_regions` is set.
    pub fn into_iam(self) -> Result<IamAllowRule, TokenError> {
        if is_set(self.aws_role.as_ref()) {
            return Err(unsupported_parameter(JoinMethod::Iam, "aws_role"));
        }
        if !self.aws_regions.is_empty() {
            return Err(unsupported_parameter(JoinMethod::Iam, "aws_regions"));
        }
        Ok(IamAllowRule {
            aws_account: non_empty(self.aws_account),
            aws_arn: non_empty(self.aws_arn),
        })
    }
}

// ============================================================================
// SECTION: EC2
// ============================================================================

/// EC2 allow rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ec2AllowRule {
    /// AWS account identifier.
    pub aws_account: Option<String>,
    /// AWS role used to describe the joining instance.
    pub aws_role: Option<String>,
    /// Allowed AWS regions; empty allows any region.
    pub aws_regions: Vec<String>,
}

impl From<&Ec2AllowRule> for TokenRule {
    fn from(rule: &Ec2AllowRule) -> Self {
        Self {
            aws_account: rule.aws_account.clone(),
            aws_regions: rule.aws_regions.clone(),
            aws_role: rule.aws_role.clone(),
            aws_arn: None,
        }
    }
}

/// EC2 join method configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ec2JoinConfig {
    /// Allow rules; at least one is required.
    pub allow: Vec<Ec2AllowRule>,
    /// Maximum accepted age of an instance identity document.
    pub iid_ttl: Duration,
}

impl JoinMethodConfig for Ec2JoinConfig {
    fn join_method(&self) -> JoinMethod {
        JoinMethod::Ec2
    }

    fn check(&self, limits: &ValidationLimits) -> Result<(), TokenError> {
        let method = self.join_method();
        check_cloud_rule_count(method, self.allow.len(), limits)?;
        for rule in &self.allow {
            if !is_set(rule.aws_account.as_ref()) && !is_set(rule.aws_role.as_ref()) {
                return Err(TokenError::invalid(format!(
                    "allow rule for \"{method}\" join method must set \"aws_account\" or \
                     \"aws_role\""
                )));
            }
            check_field(method, "aws_account", rule.aws_account.as_deref(), limits)?;
            check_field(method, "aws_role", rule.aws_role.as_deref(), limits)?;
            for region in &rule.aws_regions {
                if region.is_empty() {
                    return Err(TokenError::invalid(format!(
                        "allow rule for \"{method}\" join method has an empty \"aws_regions\" \
                         entry"
                    )));
                }
                check_field(method, "aws_regions", Some(region.as_str()), limits)?;
            }
        }
        if self.iid_ttl.is_zero() {
            return Err(TokenError::invalid(format!(
                "the \"{method}\" join method requires a non-zero \"aws_iid_ttl\""
            )));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: IAM
// ============================================================================

/// IAM allow rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IamAllowRule {
    /// AWS account identifier.
    pub aws_account: Option<String>,
    /// AWS ARN of the joining identity; may contain wildcards.
    pub aws_arn: Option<String>,
}

impl From<&IamAllowRule> for TokenRule {
    fn from(rule: &IamAllowRule) -> Self {
        Self {
            aws_account: rule.aws_account.clone(),
            aws_regions: Vec::new(),
            aws_role: None,
            aws_arn: rule.aws_arn.clone(),
        }
    }
}

/// IAM join method configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IamJoinConfig {
    /// Allow rules; at least one is required.
    pub allow: Vec<IamAllowRule>,
}

impl JoinMethodConfig for IamJoinConfig {
    fn join_method(&self) -> JoinMethod {
        JoinMethod::Iam
    }

    fn check(&self, limits: &ValidationLimits) -> Result<(), TokenError> {
        let method = self.join_method();
        check_cloud_rule_count(method, self.allow.len(), limits)?;
        for rule in &self.allow {
            if !is_set(rule.aws_account.as_ref()) && !is_set(rule.aws_arn.as_ref()) {
                return Err(TokenError::invalid(format!(
                    "allow rule for \"{method}\" join method must set \"aws_account\" or \
                     \"aws_arn\""
                )));
            }
            check_field(method, "aws_account", rule.aws_account.as_deref(), limits)?;
            check_field(method, "aws_arn", rule.aws_arn.as_deref(), limits)?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: GitHub Actions
// ============================================================================

/// GitHub Actions allow rule matched against ID token claims.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitHubAllowRule {
    /// `sub` claim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Repository in `owner/name` form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    /// Repository owner (user or organization).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository_owner: Option<String>,
    /// Workflow name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow: Option<String>,
    /// Deployment environment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    /// Actor that triggered the workflow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,
    /// Git ref that triggered the workflow.
    #[serde(default, rename = "ref", skip_serializing_if = "Option::is_none")]
    pub git_ref: Option<String>,
    /// Type of `ref` (`branch` or `tag`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_type: Option<String>,
}

impl GitHubAllowRule {
    /// Returns every field paired with its wire name.
    fn fields(&self) -> [(&'static str, Option<&str>); 8] {
        [
            ("sub", self.sub.as_deref()),
            ("repository", self.repository.as_deref()),
            ("repository_owner", self.repository_owner.as_deref()),
            ("workflow", self.workflow.as_deref()),
            ("environment", self.environment.as_deref()),
            ("actor", self.actor.as_deref()),
            ("ref", self.git_ref.as_deref()),
            ("ref_type", self.ref_type.as_deref()),
        ]
    }
}

/// GitHub Actions provider configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitHubProviderConfig {
    /// Allow rules; at least one is required.
    #[serde(default)]
    pub allow: Vec<GitHubAllowRule>,
}

impl JoinMethodConfig for GitHubProviderConfig {
    fn join_method(&self) -> JoinMethod {
        JoinMethod::GitHub
    }

    fn check(&self, limits: &ValidationLimits) -> Result<(), TokenError> {
        let method = self.join_method();
        if self.allow.is_empty() {
            return Err(TokenError::invalid(format!(
                "the \"{method}\" join method requires at least one token allow rule"
            )));
        }
        check_rule_limit(method, self.allow.len(), limits)?;
        for rule in &self.allow {
            let identifying = is_set(rule.sub.as_ref())
                || is_set(rule.repository.as_ref())
                || is_set(rule.repository_owner.as_ref());
            if !identifying {
                return Err(TokenError::invalid(format!(
                    "allow rule for \"{method}\" must include at least one of \"repository\", \
                     \"repository_owner\" or \"sub\""
                )));
            }
            for (field, value) in rule.fields() {
                check_field(method, field, value, limits)?;
            }
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: CircleCI
// ============================================================================

/// `CircleCI` allow rule matched against OIDC token claims.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircleCiAllowRule {
    /// Project identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    /// Context identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_id: Option<String>,
}

/// `CircleCI` provider configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircleCiProviderConfig {
    /// Organization identifier the OIDC issuer is scoped to.
    #[serde(default)]
    pub organization_id: String,
    /// Allow rules; at least one is required.
    #[serde(default)]
    pub allow: Vec<CircleCiAllowRule>,
}

impl JoinMethodConfig for CircleCiProviderConfig {
    fn join_method(&self) -> JoinMethod {
        JoinMethod::CircleCi
    }

    fn check(&self, limits: &ValidationLimits) -> Result<(), TokenError> {
        let method = self.join_method();
        if self.allow.is_empty() {
            return Err(TokenError::invalid(format!(
                "the \"{method}\" join method requires at least one token allow rule"
            )));
        }
        if self.organization_id.is_empty() {
            return Err(TokenError::invalid(format!(
                "the \"{method}\" join method requires 'organization_id' to be set"
            )));
        }
        check_field(method, "organization_id", Some(self.organization_id.as_str()), limits)?;
        check_rule_limit(method, self.allow.len(), limits)?;
        for rule in &self.allow {
            if !is_set(rule.project_id.as_ref()) && !is_set(rule.context_id.as_ref()) {
                return Err(TokenError::invalid(format!(
                    "allow rule for \"{method}\" must include at least \"project_id\" or \
                     \"context_id\""
                )));
            }
            check_field(method, "project_id", rule.project_id.as_deref(), limits)?;
            check_field(method, "context_id", rule.context_id.as_deref(), limits)?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Kubernetes
// ============================================================================

/// Kubernetes allow rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KubernetesAllowRule {
    /// Service account in `namespace:name` form.
    #[serde(default)]
    pub service_account: String,
}

impl KubernetesAllowRule {
    /// Creates a rule for `namespace:name`.
    #[must_use]
    pub fn new(service_account: impl Into<String>) -> Self {
        Self { service_account: service_account.into() }
    }

    /// Splits the service account into namespace and name.
    ///
    /// Returns `None` unless the value has exactly one `:` with non-empty
    /// text on both sides.
    #[must_use]
    pub fn namespace_and_name(&self) -> Option<(&str, &str)> {
        let mut parts = self.service_account.split(':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(namespace), Some(name), None) if !namespace.is_empty() && !name.is_empty() => {
                Some((namespace, name))
            }
            _ => None,
        }
    }
}

/// Kubernetes provider configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KubernetesProviderConfig {
    /// Allow rules; at least one is required.
    #[serde(default)]
    pub allow: Vec<KubernetesAllowRule>,
}

impl JoinMethodConfig for KubernetesProviderConfig {
    fn join_method(&self) -> JoinMethod {
        JoinMethod::Kubernetes
    }

    fn check(&self, limits: &ValidationLimits) -> Result<(), TokenError> {
        let method = self.join_method();
        if self.allow.is_empty() {
            return Err(TokenError::invalid(format!(
                "the \"{method}\" join method requires defined kubernetes allow rules"
            )));
        }
        check_rule_limit(method, self.allow.len(), limits)?;
        for rule in &self.allow {
            if rule.service_account.is_empty() {
                return Err(TokenError::invalid(format!(
                    "the \"{method}\" join method requires kubernetes allow rules with non-empty \
                     service account name"
                )));
            }
            check_field(method, "service_account", Some(rule.service_account.as_str()), limits)?;
            if rule.namespace_and_name().is_none() {
                return Err(TokenError::invalid(format!(
                    "the \"{method}\" join method service account rule format is \
                     \"namespace:service_account\", got \"{}\" instead",
                    rule.service_account
                )));
            }
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns true when an optional field holds a non-empty value.
fn is_set(value: Option<&String>) -> bool {
    value.is_some_and(|value| !value.is_empty())
}

/// Collapses empty strings to `None`.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}

/// Error for a field the method structurally cannot carry.
fn unsupported_parameter(method: JoinMethod, field: &str) -> TokenError {
    TokenError::invalid(format!(
        "the \"{method}\" join method does not support the \"{field}\" parameter"
    ))
}

/// Requires at least one cloud allow rule and bounds the rule count.
fn check_cloud_rule_count(
    method: JoinMethod,
    count: usize,
    limits: &ValidationLimits,
) -> Result<(), TokenError> {
    if count == 0 {
        return Err(TokenError::invalid(format!(
            "the \"{method}\" join method requires defined token allow rules"
        )));
    }
    check_rule_limit(method, count, limits)
}

/// Bounds the number of allow rules for a method.
fn check_rule_limit(
    method: JoinMethod,
    count: usize,
    limits: &ValidationLimits,
) -> Result<(), TokenError> {
    if count > limits.max_allow_rules {
        return Err(TokenError::invalid(format!(
            "the \"{method}\" join method allows at most {} allow rules, got {count}",
            limits.max_allow_rules
        )));
    }
    Ok(())
}

/// Bounds the length of a single rule field.
fn check_field(
    method: JoinMethod,
    field: &str,
    value: Option<&str>,
    limits: &ValidationLimits,
) -> Result<(), TokenError> {
    match value {
        Some(value) if value.len() > limits.max_field_length => Err(TokenError::invalid(format!(
            "allow rule for \"{method}\" has \"{field}\" longer than {} bytes",
            limits.max_field_length
        ))),
        _ => Ok(()),
    }
}
