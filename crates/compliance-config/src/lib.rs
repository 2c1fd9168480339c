// crates/compliance-config/src/lib.rs
// ============================================================================
// Module: Compliance Config Library
// Description: Harness configuration model, validation, and env overrides.
// Purpose: Single source of truth for compliance-harness.toml semantics.
// Dependencies: compliance-core, serde, toml, url
// ============================================================================

//! ## Overview
//! `compliance-config` loads the harness configuration: the target under
//! test, the resource catalog, routing assumptions, workflow scenarios, and
//! audit output. Validation is strict and fails closed; environment overrides
//! are parsed with strict UTF-8 enforcement.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod env;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use env::HarnessEnv;
pub use env::HarnessEnvOverrides;
pub use env::read_env_strict;
