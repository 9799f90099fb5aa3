// crates/join-token-core/src/core/metadata.rs
// ============================================================================
// Module: Token Metadata
// Description: Resource header fields shared by every stored token.
// Purpose: Validate names, namespaces, labels, and expiry before use.
// Dependencies: crate::core::error, serde, time
// ============================================================================

//! ## Overview
//! Metadata identifies the token resource. For the shared-secret method the
//! name is itself the secret, so it must never be echoed into displays or
//! audit records.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use time::OffsetDateTime;
use time::UtcOffset;

use crate::core::error::TokenError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Resource kind stamped on every token.
pub const KIND_TOKEN: &str = "token";
/// Resource version stamped on every token.
pub const VERSION_V2: &str = "v2";
/// Namespace applied when none is provided.
pub const DEFAULT_NAMESPACE: &str = "default";

// ============================================================================
// SECTION: Metadata
// ============================================================================

/// Resource metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Unique resource name.
    pub name: String,
    /// Resource namespace.
    #[serde(default)]
    pub namespace: String,
    /// Optional human-readable description.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Resource labels.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    /// Expiry instant; absent means the token never expires.
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub expires: Option<OffsetDateTime>,
    /// Opaque storage revision maintained by the persistence layer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
}

impl Metadata {
    /// Creates metadata with a name and optional expiry.
    #[must_use]
    pub fn new(name: impl Into<String>, expires: Option<OffsetDateTime>) -> Self {
        Self { name: name.into(), expires, ..Self::default() }
    }

    /// Fills in the default namespace, normalizes expiry to UTC, then checks
    /// the result.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidConfiguration`] when a required field is
    /// missing or malformed.
    pub fn check_and_set_defaults(&mut self) -> Result<(), TokenError> {
        if self.namespace.is_empty() {
            self.namespace = DEFAULT_NAMESPACE.to_string();
        }
        if let Some(expires) = self.expires {
            self.expires = Some(expires.to_offset(UtcOffset::UTC));
        }
        self.check()
    }

    /// Checks metadata without applying defaults.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidConfiguration`] when a required field is
    /// missing or malformed.
    pub fn check(&self) -> Result<(), TokenError> {
        if self.name.trim().is_empty() {
            return Err(TokenError::invalid("missing parameter name"));
        }
        if !is_valid_namespace(&self.namespace) {
            return Err(TokenError::invalid(format!("invalid namespace \"{}\"", self.namespace)));
        }
        for key in self.labels.keys() {
            if !is_valid_label_key(key) {
                return Err(TokenError::invalid(format!("invalid label key \"{key}\"")));
            }
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns true for non-empty namespaces of ASCII alphanumerics, `-`, or `_`.
fn is_valid_namespace(namespace: &str) -> bool {
    !namespace.is_empty()
        && namespace.bytes().all(|byte| byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_'))
}

/// Returns true for label keys made of ASCII alphanumerics and `/._:*-`.
fn is_valid_label_key(key: &str) -> bool {
    !key.is_empty()
        && key.bytes().all(|byte| {
            byte.is_ascii_alphanumeric() || matches!(byte, b'/' | b'.' | b'_' | b':' | b'*' | b'-')
        })
}
