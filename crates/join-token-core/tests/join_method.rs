// crates/join-token-core/tests/join_method.rs
// ============================================================================
// Module: Join Method Registry Tests
// Description: Tests for join method identifiers and system role parsing.
// Purpose: Ensure the closed registries reject unknown values descriptively.
// ============================================================================

//! Join method and system role registry tests.

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

use join_token_core::JoinMethod;
use join_token_core::SystemRole;
use join_token_core::SystemRoles;
use join_token_core::validate_join_method;

mod common;

use common::TestResult;
use common::assert_invalid;

// ============================================================================
// SECTION: Join Methods
// ============================================================================

#[test]
fn every_method_parses_from_its_identifier() -> TestResult {
    for method in JoinMethod::ALL {
        let parsed = validate_join_method(method.as_str()).map_err(|err| err.to_string())?;
        if parsed != method {
            return Err(format!("{method} parsed as {parsed}"));
        }
    }
    Ok(())
}

#[test]
fn unknown_method_lists_every_supported_method() -> TestResult {
    assert_invalid(
        validate_join_method("saml"),
        "join method must be one of token, ec2, iam, github, circleci, kubernetes",
    )
}

#[test]
fn method_identifiers_are_case_sensitive() -> TestResult {
    assert_invalid(validate_join_method("EC2"), "join method must be one of")?;
    assert_invalid(validate_join_method(""), "join method must be one of")
}

#[test]
fn method_families_are_disjoint() {
    for method in JoinMethod::ALL {
        let cloud = method.requires_allow_rules();
        let federated = method.requires_provider_config();
        assert!(!(cloud && federated), "{method} belongs to both families");
        assert_eq!(method == JoinMethod::Token, !cloud && !federated);
    }
}

#[test]
fn method_serializes_as_identifier() -> TestResult {
    let value = serde_json::to_value(JoinMethod::CircleCi).map_err(|err| err.to_string())?;
    assert_eq!(value, serde_json::json!("circleci"));
    let parsed: JoinMethod =
        serde_json::from_str("\"kubernetes\"").map_err(|err| err.to_string())?;
    assert_eq!(parsed, JoinMethod::Kubernetes);
    Ok(())
}

// ============================================================================
// SECTION: System Roles
// ============================================================================

#[test]
fn roles_parse_case_insensitively() -> TestResult {
    let roles = SystemRoles::parse_list("node, PROXY,bot").map_err(|err| err.to_string())?;
    assert_eq!(roles.as_slice(), &[SystemRole::Node, SystemRole::Proxy, SystemRole::Bot]);
    assert_eq!(roles.to_string(), "Node,Proxy,Bot");
    Ok(())
}

#[test]
fn unknown_role_is_named_in_error() -> TestResult {
    assert_invalid(SystemRoles::parse_list("node,wizard"), "unknown system role \"wizard\"")
}

#[test]
fn duplicate_roles_are_rejected() -> TestResult {
    let roles = SystemRoles::from([SystemRole::Node, SystemRole::Proxy, SystemRole::Node]);
    assert_invalid(roles.check(), "duplicate system role \"Node\"")
}

#[test]
fn every_role_round_trips_through_its_name() -> TestResult {
    for role in SystemRole::ALL {
        let parsed = role.as_str().parse::<SystemRole>().map_err(|err| err.to_string())?;
        assert_eq!(parsed, role);
    }
    Ok(())
}
