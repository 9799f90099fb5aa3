// crates/join-token-core/tests/proptest_validation.rs
// ============================================================================
// Module: Token Validation Property-Based Tests
// Description: Property tests for validation determinism and rule parsing.
// Purpose: Detect panics and invariant breaks across wide input ranges.
// ============================================================================

//! Property-based tests for token validation invariants.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use join_token_core::JoinMethod;
use join_token_core::KubernetesAllowRule;
use join_token_core::KubernetesProviderConfig;
use join_token_core::SystemRole;
use join_token_core::SystemRoles;
use join_token_core::TokenRule;
use join_token_core::TokenSpec;
use join_token_core::create_token;
use proptest::prelude::*;

mod common;

fn role_strategy() -> impl Strategy<Value = SystemRole> {
    prop::sample::select(SystemRole::ALL.to_vec())
}

fn method_strategy() -> impl Strategy<Value = JoinMethod> {
    prop::sample::select(JoinMethod::ALL.to_vec())
}

fn rule_strategy() -> impl Strategy<Value = TokenRule> {
    (
        prop::option::of("[0-9]{0,12}"),
        prop::collection::vec("[a-z0-9-]{0,12}", 0 .. 3),
        prop::option::of("[a-z]{0,8}"),
        prop::option::of("arn:[a-z:/*]{0,16}"),
    )
        .prop_map(|(aws_account, aws_regions, aws_role, aws_arn)| TokenRule {
            aws_account,
            aws_regions,
            aws_role,
            aws_arn,
        })
}

fn spec_strategy() -> impl Strategy<Value = TokenSpec> {
    (
        prop::collection::vec(role_strategy(), 0 .. 4),
        prop::option::of(method_strategy()),
        prop::collection::vec(rule_strategy(), 0 .. 3),
        prop::option::of(0u64 .. 1_000),
        prop::option::of("[a-z]{0,6}"),
    )
        .prop_map(|(roles, join_method, allow, aws_iid_ttl_secs, bot_name)| {
            let mut spec = match join_method {
                Some(JoinMethod::GitHub) => common::github_spec(),
                Some(JoinMethod::CircleCi) => common::circleci_spec(),
                Some(JoinMethod::Kubernetes) => common::kubernetes_spec(),
                _ => TokenSpec::default(),
            };
            spec.roles = SystemRoles::from(roles);
            spec.join_method = join_method;
            spec.allow = allow;
            spec.aws_iid_ttl_secs = aws_iid_ttl_secs;
            spec.bot_name = bot_name;
            spec
        })
}

proptest! {
    #[test]
    fn accepted_tokens_always_revalidate(spec in spec_strategy()) {
        if let Ok(token) = create_token("prop", None, spec) {
            prop_assert!(token.validate().is_ok());
            prop_assert!(token.validate().is_ok());
            let rebuilt = create_token("prop", None, token.to_spec());
            prop_assert_eq!(rebuilt, Ok(token));
        }
    }

    #[test]
    fn validation_is_deterministic(spec in spec_strategy()) {
        let first = create_token("prop", None, spec.clone());
        let second = create_token("prop", None, spec);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn bot_coupling_is_enforced(spec in spec_strategy()) {
        let has_bot = spec.roles.include(SystemRole::Bot);
        let has_name = spec.bot_name.as_deref().is_some_and(|name| !name.is_empty());
        if has_bot != has_name {
            prop_assert!(create_token("prop", None, spec).is_err());
        }
    }

    #[test]
    fn unspecified_method_follows_rule_presence(spec in spec_strategy()) {
        let mut spec = spec;
        spec.join_method = None;
        let expected = if spec.allow.is_empty() { JoinMethod::Token } else { JoinMethod::Ec2 };
        if let Ok(token) = create_token("prop", None, spec) {
            prop_assert_eq!(token.join_method(), expected);
        }
    }

    #[test]
    fn ec2_rules_with_arn_never_validate(rule in rule_strategy()) {
        let mut rule = rule;
        rule.aws_arn = Some("arn:aws:iam::1:role/x".to_string());
        let spec = common::ec2_spec().with_allow(vec![rule]);
        prop_assert!(create_token("prop", None, spec).is_err());
    }

    #[test]
    fn kubernetes_requires_one_separator(service_account in "[a-z]{0,4}(:[a-z]{0,4}){0,3}") {
        let parts: Vec<&str> = service_account.split(':').collect();
        let well_formed = parts.len() == 2 && parts.iter().all(|part| !part.is_empty());
        let spec = TokenSpec::new([SystemRole::Kube])
            .with_join_method(JoinMethod::Kubernetes)
            .with_kubernetes(KubernetesProviderConfig {
                allow: vec![KubernetesAllowRule::new(service_account)],
            });
        prop_assert_eq!(create_token("prop", None, spec).is_ok(), well_formed);
    }
}
