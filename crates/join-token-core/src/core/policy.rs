// crates/join-token-core/src/core/policy.rs
// ============================================================================
// Module: Join Token Validation Policy
// Description: Defaults and hard limits applied during token validation.
// Purpose: Keep validation bounded and defaults explicit and configurable.
// Dependencies: std
// ============================================================================

//! ## Overview
//! A [`ValidationPolicy`] carries the implicit defaults the defaulting step
//! fills in and the hard limits every token must respect. Policies are plain
//! values; operators typically build one from `join-token-config`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default TTL accepted for EC2 instance identity documents.
pub const DEFAULT_EC2_IID_TTL: Duration = Duration::from_secs(5 * 60);
/// Default maximum number of roles on one token.
pub const DEFAULT_MAX_ROLES: usize = 32;
/// Default maximum number of allow rules for one join method.
pub const DEFAULT_MAX_ALLOW_RULES: usize = 256;
/// Default maximum length of any single rule field.
pub const DEFAULT_MAX_FIELD_LENGTH: usize = 1024;
/// Default maximum number of suggested label entries per label set.
pub const DEFAULT_MAX_SUGGESTED_LABELS: usize = 256;

// ============================================================================
// SECTION: Policy Types
// ============================================================================

/// Hard limits enforced on every token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationLimits {
    /// Maximum number of roles.
    pub max_roles: usize,
    /// Maximum number of allow rules for the selected join method.
    pub max_allow_rules: usize,
    /// Maximum length in bytes of any rule field.
    pub max_field_length: usize,
    /// Maximum number of keys in each suggested label set.
    pub max_suggested_labels: usize,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            max_roles: DEFAULT_MAX_ROLES,
            max_allow_rules: DEFAULT_MAX_ALLOW_RULES,
            max_field_length: DEFAULT_MAX_FIELD_LENGTH,
            max_suggested_labels: DEFAULT_MAX_SUGGESTED_LABELS,
        }
    }
}

/// Defaults and limits used when validating tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationPolicy {
    /// TTL applied to EC2 tokens that do not set one.
    pub ec2_iid_ttl_default: Duration,
    /// Hard limits.
    pub limits: ValidationLimits,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self { ec2_iid_ttl_default: DEFAULT_EC2_IID_TTL, limits: ValidationLimits::default() }
    }
}
