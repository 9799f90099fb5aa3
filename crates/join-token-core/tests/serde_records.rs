// crates/join-token-core/tests/serde_records.rs
// ============================================================================
// Module: Token Record Serialization Tests
// Description: Tests for the persisted token record shape.
// Purpose: Ensure stored records load only when they validate.
// ============================================================================

//! Persistence record tests.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use join_token_core::JoinMethod;
use join_token_core::ProvisionToken;
use join_token_core::ProvisionTokenRecord;
use join_token_core::SystemRole;
use join_token_core::create_token;
use serde_json::json;

mod common;

use common::TestResult;

/// Asserts that a JSON document fails to load as a token.
fn assert_load_fails(value: serde_json::Value, needle: &str) -> TestResult {
    match serde_json::from_value::<ProvisionToken>(value) {
        Err(err) => {
            let message = err.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error '{message}' did not contain '{needle}'"))
            }
        }
        Ok(_) => Err("expected record to fail loading".to_string()),
    }
}

// ============================================================================
// SECTION: Serialization
// ============================================================================

#[test]
fn token_serializes_with_stamps_and_defaults() -> TestResult {
    let token =
        create_token("node-token", None, common::ec2_spec()).map_err(|err| err.to_string())?;
    let value = serde_json::to_value(&token).map_err(|err| err.to_string())?;
    assert_eq!(value["kind"], json!("token"));
    assert_eq!(value["version"], json!("v2"));
    assert_eq!(value["metadata"]["namespace"], json!("default"));
    assert_eq!(value["spec"]["join_method"], json!("ec2"));
    assert_eq!(value["spec"]["aws_iid_ttl_secs"], json!(300));
    assert_eq!(value["spec"]["roles"], json!(["Node"]));
    Ok(())
}

#[test]
fn every_method_round_trips_through_json() -> TestResult {
    for spec in common::valid_specs() {
        let token = create_token("n", None, spec).map_err(|err| err.to_string())?;
        let text = serde_json::to_string(&token).map_err(|err| err.to_string())?;
        let loaded: ProvisionToken = serde_json::from_str(&text).map_err(|err| err.to_string())?;
        if loaded != token {
            return Err(format!("{} token changed through json", token.join_method()));
        }
    }
    Ok(())
}

#[test]
fn github_ref_uses_wire_name() -> TestResult {
    let mut spec = common::github_spec();
    if let Some(github) = spec.github.as_mut() {
        github.allow[0].git_ref = Some("refs/heads/main".to_string());
    }
    let token = create_token("n", None, spec).map_err(|err| err.to_string())?;
    let value = serde_json::to_value(&token).map_err(|err| err.to_string())?;
    assert_eq!(value["spec"]["github"]["allow"][0]["ref"], json!("refs/heads/main"));
    Ok(())
}

// ============================================================================
// SECTION: Loading
// ============================================================================

#[test]
fn record_with_blank_method_defaults_on_load() -> TestResult {
    let value = json!({
        "kind": "something-else",
        "metadata": { "name": "legacy" },
        "spec": { "roles": ["node"], "join_method": "", "allow": [{ "aws_account": "1234" }] }
    });
    let token: ProvisionToken = serde_json::from_value(value).map_err(|err| err.to_string())?;
    assert_eq!(token.join_method(), JoinMethod::Ec2);
    assert_eq!(token.kind(), "token");
    assert!(token.roles().include(SystemRole::Node));
    let record = ProvisionTokenRecord::from(token);
    assert_eq!(record.kind, "token");
    assert_eq!(record.version, "v2");
    Ok(())
}

#[test]
fn record_with_unknown_method_lists_supported_methods() -> TestResult {
    assert_load_fails(
        json!({
            "metadata": { "name": "n" },
            "spec": { "roles": ["Node"], "join_method": "saml" }
        }),
        "join method must be one of token, ec2, iam, github, circleci, kubernetes",
    )
}

#[test]
fn record_with_unknown_role_fails() -> TestResult {
    assert_load_fails(
        json!({ "metadata": { "name": "n" }, "spec": { "roles": ["Wizard"] } }),
        "unknown system role \"Wizard\"",
    )
}

#[test]
fn invalid_record_fails_to_load() -> TestResult {
    assert_load_fails(
        json!({
            "metadata": { "name": "n" },
            "spec": { "roles": ["Node"], "join_method": "iam", "allow": [{ "aws_role": "r" }] }
        }),
        "the \"iam\" join method does not support the \"aws_role\" parameter",
    )?;
    assert_load_fails(
        json!({ "metadata": { "name": "n" }, "spec": { "roles": [] } }),
        "provisioning token is missing roles",
    )
}

#[test]
fn record_expiry_is_normalized_to_utc() -> TestResult {
    let value = json!({
        "metadata": { "name": "n", "expires": "2030-01-01T02:00:00+02:00" },
        "spec": { "roles": ["Proxy"] }
    });
    let token: ProvisionToken = serde_json::from_value(value).map_err(|err| err.to_string())?;
    let value = serde_json::to_value(&token).map_err(|err| err.to_string())?;
    assert_eq!(value["metadata"]["expires"], json!("2030-01-01T00:00:00Z"));
    Ok(())
}
