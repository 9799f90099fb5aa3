// crates/join-token-core/src/testing.rs
// ============================================================================
// Module: Join Token Test Support
// Description: Panicking constructors for test suites.
// Purpose: Keep unwrap-and-fail helpers out of library code paths.
// Dependencies: crate::{core, runtime}, time
// ============================================================================

//! ## Overview
//! Compiled only for this crate's tests or with the `test-support` feature.
//! Library code uses the `Result`-returning constructors instead.

#![allow(clippy::panic, reason = "Test helpers fail the calling test on invalid input.")]

// ============================================================================
// SECTION: Imports
// ============================================================================

use time::OffsetDateTime;

use crate::core::roles::SystemRoles;
use crate::core::spec::TokenSpec;
use crate::core::token::ProvisionToken;
use crate::runtime::validator::create_token;
use crate::runtime::validator::new_provision_token;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Creates a shared-secret token or fails the calling test.
///
/// # Panics
///
/// Panics when the token is invalid.
#[track_caller]
#[must_use]
pub fn must_create_token(
    name: &str,
    roles: SystemRoles,
    expires: Option<OffsetDateTime>,
) -> ProvisionToken {
    match new_provision_token(name, roles, expires) {
        Ok(token) => token,
        Err(err) => panic!("test token {name} is invalid: {err}"),
    }
}

/// Creates a token from a spec or fails the calling test.
///
/// # Panics
///
/// Panics when the token is invalid.
#[track_caller]
#[must_use]
pub fn must_create_token_from_spec(
    name: &str,
    expires: Option<OffsetDateTime>,
    spec: TokenSpec,
) -> ProvisionToken {
    match create_token(name, expires, spec) {
        Ok(token) => token,
        Err(err) => panic!("test token {name} is invalid: {err}"),
    }
}
