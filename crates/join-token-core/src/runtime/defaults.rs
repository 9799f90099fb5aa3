// crates/join-token-core/src/runtime/defaults.rs
// ============================================================================
// Module: Token Defaulting
// Description: Implicit defaults applied to raw token specs before validation.
// Purpose: Keep backward-compatibility heuristics isolated from validation.
// Dependencies: crate::core::{join_method, policy, spec}
// ============================================================================

//! ## Overview
//! Defaulting is the only step that mutates caller input. The join-method
//! heuristic exists for backward compatibility with tokens created before
//! join methods were explicit; it is not a design preference and can be
//! removed here without touching the validator.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::join_method::JoinMethod;
use crate::core::policy::ValidationPolicy;
use crate::core::spec::TokenSpec;

// ============================================================================
// SECTION: Defaulting
// ============================================================================

/// Returns the join method an unspecified token resolves to.
///
/// Tokens that carry cloud allow rules predate explicit methods and were
/// EC2 tokens; every other unspecified token is a shared-secret token.
#[must_use]
pub fn default_join_method(spec: &TokenSpec) -> JoinMethod {
    if spec.allow.is_empty() { JoinMethod::Token } else { JoinMethod::Ec2 }
}

/// Fills in implicit defaults.
///
/// - An unspecified join method resolves via [`default_join_method`].
/// - EC2 tokens without a TTL (or with a zero TTL) get the policy default.
/// - An empty bot name is cleared.
///
/// Returns the resolved join method.
pub fn apply_defaults(spec: &mut TokenSpec, policy: &ValidationPolicy) -> JoinMethod {
    let method = spec.join_method.unwrap_or_else(|| default_join_method(spec));
    spec.join_method = Some(method);
    if method == JoinMethod::Ec2 && spec.aws_iid_ttl_secs.unwrap_or_default() == 0 {
        spec.aws_iid_ttl_secs = Some(policy.ec2_iid_ttl_default.as_secs());
    }
    if spec.bot_name.as_deref().is_some_and(str::is_empty) {
        spec.bot_name = None;
    }
    method
}
