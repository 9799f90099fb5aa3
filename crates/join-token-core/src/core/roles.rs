// crates/join-token-core/src/core/roles.rs
// ============================================================================
// Module: System Roles
// Description: Closed set of cluster roles a join token can grant.
// Purpose: Parse, display, and check role sets for join tokens.
// Dependencies: crate::core::error, serde
// ============================================================================

//! ## Overview
//! System roles are the identities granted to a node after a successful join.
//! Parsing is case-insensitive; display always uses the canonical spelling.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use crate::core::error::TokenError;

// ============================================================================
// SECTION: System Role
// ============================================================================

/// Role granted to a joining node or workload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SystemRole {
    /// Auth service.
    Auth,
    /// SSH node.
    Node,
    /// Proxy service.
    Proxy,
    /// Administrative role.
    Admin,
    /// Token provisioning role.
    ProvisionToken,
    /// Trusted cluster role.
    TrustedCluster,
    /// User signup role.
    Signup,
    /// Role with no permissions.
    Nop,
    /// Proxy of a remote cluster.
    RemoteProxy,
    /// Kubernetes service.
    Kube,
    /// Application service.
    App,
    /// Database service.
    Db,
    /// Windows desktop service.
    WindowsDesktop,
    /// Machine identity bot.
    Bot,
    /// Multi-service instance.
    Instance,
    /// Discovery service.
    Discovery,
    /// Okta integration service.
    Okta,
}

impl SystemRole {
    /// Every known system role.
    pub const ALL: [Self; 17] = [
        Self::Auth,
        Self::Node,
        Self::Proxy,
        Self::Admin,
        Self::ProvisionToken,
        Self::TrustedCluster,
        Self::Signup,
        Self::Nop,
        Self::RemoteProxy,
        Self::Kube,
        Self::App,
        Self::Db,
        Self::WindowsDesktop,
        Self::Bot,
        Self::Instance,
        Self::Discovery,
        Self::Okta,
    ];

    /// Returns the canonical role name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auth => "Auth",
            Self::Node => "Node",
            Self::Proxy => "Proxy",
            Self::Admin => "Admin",
            Self::ProvisionToken => "ProvisionToken",
            Self::TrustedCluster => "TrustedCluster",
            Self::Signup => "Signup",
            Self::Nop => "Nop",
            Self::RemoteProxy => "RemoteProxy",
            Self::Kube => "Kube",
            Self::App => "App",
            Self::Db => "Db",
            Self::WindowsDesktop => "WindowsDesktop",
            Self::Bot => "Bot",
            Self::Instance => "Instance",
            Self::Discovery => "Discovery",
            Self::Okta => "Okta",
        }
    }
}

impl fmt::Display for SystemRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SystemRole {
    type Err = TokenError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| TokenError::invalid(format!("unknown system role \"{trimmed}\"")))
    }
}

impl TryFrom<String> for SystemRole {
    type Error = TokenError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SystemRole> for String {
    fn from(value: SystemRole) -> Self {
        value.as_str().to_string()
    }
}

// ============================================================================
// SECTION: Role Sets
// ============================================================================

/// Ordered list of roles granted by a token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SystemRoles(Vec<SystemRole>);

impl SystemRoles {
    /// Creates a role list.
    #[must_use]
    pub const fn new(roles: Vec<SystemRole>) -> Self {
        Self(roles)
    }

    /// Parses a comma-separated role list such as `"node,proxy"`.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidConfiguration`] for unknown roles.
    pub fn parse_list(value: &str) -> Result<Self, TokenError> {
        value
            .split(',')
            .filter(|part| !part.trim().is_empty())
            .map(SystemRole::from_str)
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    /// Returns true when `role` is present.
    #[must_use]
    pub fn include(&self, role: SystemRole) -> bool {
        self.0.contains(&role)
    }

    /// Returns the roles as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[SystemRole] {
        &self.0
    }

    /// Returns the number of roles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when no roles are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the canonical role names.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.0.iter().map(|role| role.as_str().to_string()).collect()
    }

    /// Checks the role set is well formed (no duplicates).
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidConfiguration`] naming the duplicated role.
    pub fn check(&self) -> Result<(), TokenError> {
        let mut seen = BTreeSet::new();
        for role in &self.0 {
            if !seen.insert(*role) {
                return Err(TokenError::invalid(format!("duplicate system role \"{role}\"")));
            }
        }
        Ok(())
    }
}

impl fmt::Display for SystemRoles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.names().join(","))
    }
}

impl From<Vec<SystemRole>> for SystemRoles {
    fn from(value: Vec<SystemRole>) -> Self {
        Self(value)
    }
}

impl<const N: usize> From<[SystemRole; N]> for SystemRoles {
    fn from(value: [SystemRole; N]) -> Self {
        Self(value.to_vec())
    }
}

impl FromIterator<SystemRole> for SystemRoles {
    fn from_iter<T: IntoIterator<Item = SystemRole>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
