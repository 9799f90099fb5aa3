// crates/join-token-core/src/core/labels.rs
// ============================================================================
// Module: Suggested Labels
// Description: Free-form label hints carried by join tokens.
// Purpose: Provide a deterministic, serializable label map.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Suggested labels are hints consumed by joining agents. They are not
//! interpreted here; validation only bounds their shape.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::core::error::TokenError;
use crate::core::policy::ValidationLimits;

// ============================================================================
// SECTION: Labels
// ============================================================================

/// Label map from key to one or more values.
///
/// # Invariants
/// - Keys are ordered, so serialization is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Labels(BTreeMap<String, Vec<String>>);

impl Labels {
    /// Creates an empty label map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value under `key`, keeping existing values.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.entry(key.into()).or_default().push(value.into());
    }

    /// Returns the values stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.0.get(key).map(Vec::as_slice)
    }

    /// Returns the number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when no labels are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates labels in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.0.iter()
    }

    /// Checks label shape: bounded size and non-empty keys.
    pub(crate) fn check(&self, field: &str, limits: &ValidationLimits) -> Result<(), TokenError> {
        if self.0.len() > limits.max_suggested_labels {
            return Err(TokenError::invalid(format!(
                "{field} exceeds {} keys",
                limits.max_suggested_labels
            )));
        }
        if self.0.keys().any(|key| key.trim().is_empty()) {
            return Err(TokenError::invalid(format!("{field} keys must be non-empty")));
        }
        Ok(())
    }
}

impl<K, V> FromIterator<(K, V)> for Labels
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut labels = Self::new();
        for (key, value) in iter {
            labels.insert(key, value);
        }
        labels
    }
}
