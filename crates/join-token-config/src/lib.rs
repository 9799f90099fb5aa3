// crates/join-token-config/src/lib.rs
// ============================================================================
// Module: Join Token Config Library
// Description: Operator configuration model and validation for join tokens.
// Purpose: Single source of truth for join-token.toml semantics.
// Dependencies: join-token-core, serde, toml
// ============================================================================

//! ## Overview
//! `join-token-config` defines the operator configuration for join token
//! validation: implicit defaults, hard limits, and audit routing. It provides
//! strict, fail-closed validation and builds a ready-to-use validator.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
