// crates/join-token-config/src/config.rs
// ============================================================================
// Module: Join Token Configuration
// Description: Configuration loading and validation for join token policy.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: join-token-core, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! It controls the validator's implicit defaults, its hard limits, and where
//! audit events are written. Missing sections fall back to defaults; invalid
//! values fail closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use join_token_core::FileAuditSink;
use join_token_core::StderrAuditSink;
use join_token_core::TokenValidator;
use join_token_core::ValidationLimits;
use join_token_core::ValidationPolicy;
use join_token_core::core::policy::DEFAULT_EC2_IID_TTL;
use join_token_core::core::policy::DEFAULT_MAX_ALLOW_RULES;
use join_token_core::core::policy::DEFAULT_MAX_FIELD_LENGTH;
use join_token_core::core::policy::DEFAULT_MAX_ROLES;
use join_token_core::core::policy::DEFAULT_MAX_SUGGESTED_LABELS;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "join-token.toml";
/// Environment variable used to override the config path.
pub(crate) const CONFIG_ENV_VAR: &str = "JOIN_TOKEN_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Default EC2 identity document TTL in seconds.
pub(crate) const DEFAULT_EC2_IID_TTL_SECS: u64 = DEFAULT_EC2_IID_TTL.as_secs();
/// Maximum EC2 identity document TTL in seconds.
pub(crate) const MAX_EC2_IID_TTL_SECS: u64 = 86_400;
/// Hard cap on configurable role count.
pub(crate) const MAX_ROLES_CAP: usize = 64;
/// Hard cap on configurable allow rules per method.
pub(crate) const MAX_ALLOW_RULES_CAP: usize = 4096;
/// Hard cap on configurable rule field length.
pub(crate) const MAX_FIELD_LENGTH_CAP: usize = 64 * 1024;
/// Hard cap on configurable suggested label keys.
pub(crate) const MAX_SUGGESTED_LABELS_CAP: usize = 4096;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Join token operator configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JoinTokenConfig {
    /// Implicit defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,
    /// Hard validation limits.
    #[serde(default)]
    pub limits: LimitsConfig,
    /// Audit routing.
    #[serde(default)]
    pub audit: AuditConfig,
}

impl JoinTokenConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml_str(content)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.defaults.validate()?;
        self.limits.validate()?;
        self.audit.validate()?;
        Ok(())
    }

    /// Returns the validation policy described by this configuration.
    #[must_use]
    pub fn validation_policy(&self) -> ValidationPolicy {
        ValidationPolicy {
            ec2_iid_ttl_default: Duration::from_secs(self.defaults.ec2_iid_ttl_secs),
            limits: ValidationLimits {
                max_roles: self.limits.max_roles,
                max_allow_rules: self.limits.max_allow_rules,
                max_field_length: self.limits.max_field_length,
                max_suggested_labels: self.limits.max_suggested_labels,
            },
        }
    }

    /// Builds a validator wired to the configured audit sink.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the audit log cannot be opened.
    pub fn build_validator(&self) -> Result<TokenValidator, ConfigError> {
        let validator = TokenValidator::new(self.validation_policy());
        if !self.audit.enabled {
            return Ok(validator);
        }
        match &self.audit.path {
            Some(path) => {
                let sink = FileAuditSink::new(Path::new(path))
                    .map_err(|err| ConfigError::Io(err.to_string()))?;
                Ok(validator.with_audit_sink(Arc::new(sink)))
            }
            None => Ok(validator.with_audit_sink(Arc::new(StderrAuditSink))),
        }
    }
}

/// Implicit defaults applied during token defaulting.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DefaultsConfig {
    /// EC2 identity document TTL applied when a token sets none.
    #[serde(default = "default_ec2_iid_ttl_secs")]
    pub ec2_iid_ttl_secs: u64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self { ec2_iid_ttl_secs: default_ec2_iid_ttl_secs() }
    }
}

impl DefaultsConfig {
    /// Validates defaults.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.ec2_iid_ttl_secs == 0 || self.ec2_iid_ttl_secs > MAX_EC2_IID_TTL_SECS {
            return Err(ConfigError::Invalid(format!(
                "defaults.ec2_iid_ttl_secs must be between 1 and {MAX_EC2_IID_TTL_SECS}"
            )));
        }
        Ok(())
    }
}

/// Hard limits enforced on every token.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LimitsConfig {
    /// Maximum roles per token.
    #[serde(default = "default_max_roles")]
    pub max_roles: usize,
    /// Maximum allow rules per join method.
    #[serde(default = "default_max_allow_rules")]
    pub max_allow_rules: usize,
    /// Maximum length in bytes of a rule field.
    #[serde(default = "default_max_field_length")]
    pub max_field_length: usize,
    /// Maximum keys per suggested label set.
    #[serde(default = "default_max_suggested_labels")]
    pub max_suggested_labels: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_roles: default_max_roles(),
            max_allow_rules: default_max_allow_rules(),
            max_field_length: default_max_field_length(),
            max_suggested_labels: default_max_suggested_labels(),
        }
    }
}

impl LimitsConfig {
    /// Validates limits.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_limit("limits.max_roles", self.max_roles, MAX_ROLES_CAP)?;
        validate_limit("limits.max_allow_rules", self.max_allow_rules, MAX_ALLOW_RULES_CAP)?;
        validate_limit("limits.max_field_length", self.max_field_length, MAX_FIELD_LENGTH_CAP)?;
        validate_limit(
            "limits.max_suggested_labels",
            self.max_suggested_labels,
            MAX_SUGGESTED_LABELS_CAP,
        )
    }
}

/// Audit routing for validation events.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Enable audit events.
    #[serde(default)]
    pub enabled: bool,
    /// Optional JSON-lines file; stderr when unset.
    #[serde(default)]
    pub path: Option<String>,
}

impl AuditConfig {
    /// Validates audit settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.path {
            validate_path_string("audit.path", path)?;
        }
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        let component_value = component.as_os_str().to_string_lossy();
        if component_value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Validates a non-zero limit against its hard cap.
fn validate_limit(field: &str, value: usize, cap: usize) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::Invalid(format!("{field} must be greater than zero")));
    }
    if value > cap {
        return Err(ConfigError::Invalid(format!("{field} must be at most {cap}")));
    }
    Ok(())
}

/// Default EC2 identity document TTL in seconds.
const fn default_ec2_iid_ttl_secs() -> u64 {
    DEFAULT_EC2_IID_TTL_SECS
}

/// Default maximum roles per token.
const fn default_max_roles() -> usize {
    DEFAULT_MAX_ROLES
}

/// Default maximum allow rules per method.
const fn default_max_allow_rules() -> usize {
    DEFAULT_MAX_ALLOW_RULES
}

/// Default maximum rule field length.
const fn default_max_field_length() -> usize {
    DEFAULT_MAX_FIELD_LENGTH
}

/// Default maximum suggested label keys.
const fn default_max_suggested_labels() -> usize {
    DEFAULT_MAX_SUGGESTED_LABELS
}
