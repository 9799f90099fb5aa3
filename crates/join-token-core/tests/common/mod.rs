// crates/join-token-core/tests/common/mod.rs
// ============================================================================
// Module: Common Test Fixtures
// Description: Shared token specs and assertion helpers for core tests.
// Purpose: Keep per-method fixtures consistent across test files.
// Dependencies: join-token-core
// ============================================================================

//! ## Overview
//! Fixtures return minimal valid specs for each join method. Tests start
//! from a valid spec and break exactly one field.

#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]

// ============================================================================
// SECTION: Imports
// ============================================================================

use join_token_core::CircleCiAllowRule;
use join_token_core::CircleCiProviderConfig;
use join_token_core::GitHubAllowRule;
use join_token_core::GitHubProviderConfig;
use join_token_core::JoinMethod;
use join_token_core::KubernetesAllowRule;
use join_token_core::KubernetesProviderConfig;
use join_token_core::SystemRole;
use join_token_core::TokenError;
use join_token_core::TokenRule;
use join_token_core::TokenSpec;

// ============================================================================
// SECTION: Assertions
// ============================================================================

/// Result type shared by fallible tests.
pub type TestResult = Result<(), String>;

/// Asserts that a result is an error whose message contains `needle`.
pub fn assert_invalid<T>(result: Result<T, TokenError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error '{message}' did not contain '{needle}'"))
            }
        }
        Ok(_) => Err(format!("expected error containing '{needle}'")),
    }
}

// ============================================================================
// SECTION: Rule Fixtures
// ============================================================================

/// Cloud rule with only an account set.
pub fn account_rule(account: &str) -> TokenRule {
    TokenRule { aws_account: Some(account.to_string()), ..TokenRule::default() }
}

/// EC2 rule with an account and a region.
pub fn ec2_rule() -> TokenRule {
    TokenRule {
        aws_account: Some("123456789012".to_string()),
        aws_regions: vec!["us-west-2".to_string()],
        ..TokenRule::default()
    }
}

/// IAM rule with an account and an ARN.
pub fn iam_rule() -> TokenRule {
    TokenRule {
        aws_account: Some("123456789012".to_string()),
        aws_arn: Some("arn:aws:iam::123456789012:role/deploy-*".to_string()),
        ..TokenRule::default()
    }
}

/// GitHub rule scoped to one repository.
pub fn github_rule() -> GitHubAllowRule {
    GitHubAllowRule {
        repository: Some("example/infra".to_string()),
        ..GitHubAllowRule::default()
    }
}

/// `CircleCI` rule scoped to one project.
pub fn circleci_rule() -> CircleCiAllowRule {
    CircleCiAllowRule { project_id: Some("project-1".to_string()), context_id: None }
}

// ============================================================================
// SECTION: Spec Fixtures
// ============================================================================

/// Valid shared-secret spec for a node.
pub fn token_spec() -> TokenSpec {
    TokenSpec::new([SystemRole::Node])
}

/// Valid EC2 spec.
pub fn ec2_spec() -> TokenSpec {
    TokenSpec::new([SystemRole::Node])
        .with_join_method(JoinMethod::Ec2)
        .with_allow(vec![ec2_rule()])
}

/// Valid IAM spec.
pub fn iam_spec() -> TokenSpec {
    TokenSpec::new([SystemRole::Node])
        .with_join_method(JoinMethod::Iam)
        .with_allow(vec![iam_rule()])
}

/// Valid GitHub spec.
pub fn github_spec() -> TokenSpec {
    TokenSpec::new([SystemRole::Bot])
        .with_join_method(JoinMethod::GitHub)
        .with_bot_name("ci-bot")
        .with_github(GitHubProviderConfig { allow: vec![github_rule()] })
}

/// Valid `CircleCI` spec.
pub fn circleci_spec() -> TokenSpec {
    TokenSpec::new([SystemRole::Bot])
        .with_join_method(JoinMethod::CircleCi)
        .with_bot_name("ci-bot")
        .with_circleci(CircleCiProviderConfig {
            organization_id: "org-1".to_string(),
            allow: vec![circleci_rule()],
        })
}

/// Valid Kubernetes spec.
pub fn kubernetes_spec() -> TokenSpec {
    TokenSpec::new([SystemRole::Kube])
        .with_join_method(JoinMethod::Kubernetes)
        .with_kubernetes(KubernetesProviderConfig {
            allow: vec![KubernetesAllowRule::new("teleport:agent")],
        })
}

/// One valid spec per join method.
pub fn valid_specs() -> Vec<TokenSpec> {
    vec![token_spec(), ec2_spec(), iam_spec(), github_spec(), circleci_spec(), kubernetes_spec()]
}
