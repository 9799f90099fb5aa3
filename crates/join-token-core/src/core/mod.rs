// crates/join-token-core/src/core/mod.rs
// ============================================================================
// Module: Join Token Core Types
// Description: Canonical join token, allow rule, and legacy record structures.
// Purpose: Provide stable, serializable types for provisioning tokens.
// Dependencies: serde, thiserror, time
// ============================================================================

//! ## Overview
//! Core types define the token resource, its metadata, the closed set of join
//! methods and system roles, and the per-method allow-rule schemas. These
//! types are the canonical source of truth for any persisted token record.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod error;
pub mod join_method;
pub mod labels;
pub mod legacy;
pub mod metadata;
pub mod policy;
pub mod roles;
pub mod rules;
pub mod spec;
pub mod token;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use error::TokenError;
pub use join_method::JoinMethod;
pub use join_method::JoinMethodConfig;
pub use join_method::validate_join_method;
pub use labels::Labels;
pub use legacy::ProvisionTokenV1;
pub use legacy::tokens_from_legacy;
pub use legacy::tokens_to_legacy;
pub use metadata::DEFAULT_NAMESPACE;
pub use metadata::KIND_TOKEN;
pub use metadata::Metadata;
pub use metadata::VERSION_V2;
pub use policy::ValidationLimits;
pub use policy::ValidationPolicy;
pub use roles::SystemRole;
pub use roles::SystemRoles;
pub use rules::CircleCiAllowRule;
pub use rules::CircleCiProviderConfig;
pub use rules::Ec2AllowRule;
pub use rules::Ec2JoinConfig;
pub use rules::GitHubAllowRule;
pub use rules::GitHubProviderConfig;
pub use rules::IamAllowRule;
pub use rules::IamJoinConfig;
pub use rules::KubernetesAllowRule;
pub use rules::KubernetesProviderConfig;
pub use rules::TokenRule;
pub use spec::JoinConfig;
pub use spec::TokenSpec;
pub use token::ProvisionToken;
pub use token::ProvisionTokenRecord;
