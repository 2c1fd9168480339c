// crates/compliance-config/src/env.rs
// ============================================================================
// Module: Harness Environment
// Description: Environment-backed overrides for the harness configuration.
// Purpose: Centralize env parsing with strict UTF-8 validation.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Environment values are parsed with strict UTF-8 enforcement to avoid silent
//! misconfiguration. Invalid UTF-8 or empty values fail closed. Parsing takes
//! a lookup function so callers and tests can supply values without touching
//! the process environment.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::ffi::OsString;
use std::time::Duration;

use crate::config::ConfigError;

// ============================================================================
// SECTION: Environment Constants
// ============================================================================

/// Environment keys recognised by the harness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarnessEnv {
    /// Config file path override.
    ConfigPath,
    /// Target base URL override.
    BaseUrl,
    /// Exchange timeout override in seconds (positive integer).
    TimeoutSeconds,
    /// Concurrency override (positive integer).
    Concurrency,
}

impl HarnessEnv {
    /// Returns the canonical environment variable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ConfigPath => "COMPLIANCE_HARNESS_CONFIG",
            Self::BaseUrl => "COMPLIANCE_HARNESS_BASE_URL",
            Self::TimeoutSeconds => "COMPLIANCE_HARNESS_TIMEOUT_SEC",
            Self::Concurrency => "COMPLIANCE_HARNESS_CONCURRENCY",
        }
    }
}

// ============================================================================
// SECTION: Overrides
// ============================================================================

/// Typed overrides derived from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HarnessEnvOverrides {
    /// Target base URL.
    pub base_url: Option<String>,
    /// Exchange timeout.
    pub timeout: Option<Duration>,
    /// Maximum concurrent exchanges.
    pub max_concurrency: Option<usize>,
}

impl HarnessEnvOverrides {
    /// Loads overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a value is not valid UTF-8, is
    /// empty, or fails numeric validation.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(process_var)
    }

    /// Loads overrides through a variable lookup function.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a value is not valid UTF-8, is
    /// empty, or fails numeric validation.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<OsString>) -> Result<Self, ConfigError> {
        let read = |key: HarnessEnv| read_nonempty(key.as_str(), lookup(key.as_str()));
        let base_url = read(HarnessEnv::BaseUrl)?.map(|value| value.trim().to_string());
        let timeout = read(HarnessEnv::TimeoutSeconds)?
            .map(|value| parse_positive(HarnessEnv::TimeoutSeconds.as_str(), &value))
            .transpose()?
            .map(Duration::from_secs);
        let max_concurrency = read(HarnessEnv::Concurrency)?
            .map(|value| parse_positive(HarnessEnv::Concurrency.as_str(), &value))
            .transpose()?
            .map(|value| usize::try_from(value).unwrap_or(usize::MAX));
        Ok(Self {
            base_url,
            timeout,
            max_concurrency,
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads an environment variable and enforces UTF-8 validity.
///
/// # Errors
///
/// Returns an error when the environment variable contains invalid UTF-8.
pub fn read_env_strict(name: &str) -> Result<Option<String>, String> {
    decode(name, std::env::var_os(name))
}

/// Looks up a variable in the process environment.
fn process_var(name: &str) -> Option<OsString> {
    std::env::var_os(name)
}

/// Decodes a raw value as UTF-8.
fn decode(name: &str, raw: Option<OsString>) -> Result<Option<String>, String> {
    raw.map_or(Ok(None), |raw| {
        raw.into_string().map(Some).map_err(|_| format!("{name} must be valid UTF-8"))
    })
}

/// Decodes a raw value and rejects empty values.
fn read_nonempty(name: &str, raw: Option<OsString>) -> Result<Option<String>, ConfigError> {
    match decode(name, raw).map_err(ConfigError::Invalid)? {
        Some(value) if value.trim().is_empty() => {
            Err(ConfigError::Invalid(format!("{name} must not be empty")))
        }
        Some(value) => Ok(Some(value)),
        None => Ok(None),
    }
}

/// Parses a positive integer.
fn parse_positive(name: &str, raw: &str) -> Result<u64, ConfigError> {
    let value: u64 = raw
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid(format!("{name} must be a positive integer")))?;
    if value == 0 {
        return Err(ConfigError::Invalid(format!("{name} must be greater than zero")));
    }
    Ok(value)
}
