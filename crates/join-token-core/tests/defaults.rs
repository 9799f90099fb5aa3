// crates/join-token-core/tests/defaults.rs
// ============================================================================
// Module: Token Defaulting Tests
// Description: Tests for implicit join method and TTL defaults.
// Purpose: Pin the backward-compatible defaulting heuristics.
// ============================================================================

//! Defaulting tests for raw token specs.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    clippy::indexing_slicing,
    reason = "Test-only assertions and helpers are permitted."
)]

use std::time::Duration;

use join_token_core::JoinMethod;
use join_token_core::SystemRole;
use join_token_core::TokenSpec;
use join_token_core::ValidationPolicy;
use join_token_core::apply_defaults;
use join_token_core::create_token;
use join_token_core::default_join_method;

mod common;

use common::TestResult;

// ============================================================================
// SECTION: Join Method Heuristic
// ============================================================================

#[test]
fn spec_without_rules_defaults_to_token() {
    let spec = TokenSpec::new([SystemRole::Node]);
    assert_eq!(default_join_method(&spec), JoinMethod::Token);
}

#[test]
fn spec_with_rules_defaults_to_ec2() {
    let spec = TokenSpec::new([SystemRole::Node]).with_allow(vec![common::account_rule("1234")]);
    assert_eq!(default_join_method(&spec), JoinMethod::Ec2);
}

#[test]
fn explicit_method_is_kept() {
    let mut spec = common::iam_spec();
    let method = apply_defaults(&mut spec, &ValidationPolicy::default());
    assert_eq!(method, JoinMethod::Iam);
    assert_eq!(spec.join_method, Some(JoinMethod::Iam));
    assert_eq!(spec.aws_iid_ttl_secs, None);
}

#[test]
fn rule_bearing_token_without_method_builds_as_ec2() -> TestResult {
    let spec = TokenSpec::new([SystemRole::Node]).with_allow(vec![common::ec2_rule()]);
    let token = create_token("legacy-ec2", None, spec).map_err(|err| err.to_string())?;
    assert_eq!(token.join_method(), JoinMethod::Ec2);
    Ok(())
}

// ============================================================================
// SECTION: Field Defaults
// ============================================================================

#[test]
fn ec2_ttl_defaults_to_five_minutes() -> TestResult {
    let token = create_token("ec2", None, common::ec2_spec()).map_err(|err| err.to_string())?;
    assert_eq!(token.aws_iid_ttl(), Some(Duration::from_secs(300)));
    Ok(())
}

#[test]
fn zero_ec2_ttl_is_replaced_by_policy_default() {
    let mut spec = common::ec2_spec();
    spec.aws_iid_ttl_secs = Some(0);
    let policy = ValidationPolicy {
        ec2_iid_ttl_default: Duration::from_secs(90),
        ..ValidationPolicy::default()
    };
    apply_defaults(&mut spec, &policy);
    assert_eq!(spec.aws_iid_ttl_secs, Some(90));
}

#[test]
fn explicit_ec2_ttl_is_kept() -> TestResult {
    let mut spec = common::ec2_spec();
    spec.aws_iid_ttl_secs = Some(60);
    let token = create_token("ec2", None, spec).map_err(|err| err.to_string())?;
    assert_eq!(token.aws_iid_ttl(), Some(Duration::from_secs(60)));
    Ok(())
}

#[test]
fn empty_bot_name_is_cleared() {
    let mut spec = TokenSpec::new([SystemRole::Node]).with_bot_name("");
    apply_defaults(&mut spec, &ValidationPolicy::default());
    assert_eq!(spec.bot_name, None);
}

#[test]
fn namespace_and_stamps_are_filled() -> TestResult {
    let token = create_token("node", None, common::token_spec()).map_err(|err| err.to_string())?;
    assert_eq!(token.metadata().namespace, join_token_core::DEFAULT_NAMESPACE);
    assert_eq!(token.kind(), join_token_core::KIND_TOKEN);
    assert_eq!(token.version(), join_token_core::VERSION_V2);
    Ok(())
}
