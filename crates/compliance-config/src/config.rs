// crates/compliance-config/src/config.rs
// ============================================================================
// Module: Compliance Harness Configuration
// Description: Configuration loading and validation for the harness.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: compliance-core, serde, toml, url
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! When no file is named and the default file is absent, built-in defaults
//! describe a stock deployment on `127.0.0.1:8082`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use compliance_core::DeletePolicy;
use compliance_core::ElementId;
use compliance_core::MatrixPolicy;
use compliance_core::PathClassifier;
use compliance_core::RecipientId;
use compliance_core::ResourceDescriptor;
use compliance_core::WorkflowScenario;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::env::HarnessEnv;
use crate::env::HarnessEnvOverrides;
use crate::env::read_env_strict;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "compliance-harness.toml";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Default target base URL.
pub(crate) const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8082";
/// Default per-exchange timeout in milliseconds.
pub(crate) const DEFAULT_TIMEOUT_MS: u64 = 10_000;
/// Maximum per-exchange timeout in milliseconds.
pub(crate) const MAX_TIMEOUT_MS: u64 = 300_000;
/// Default number of concurrent exchanges.
pub(crate) const DEFAULT_MAX_CONCURRENCY: usize = 4;
/// Maximum number of concurrent exchanges.
pub(crate) const MAX_CONCURRENCY: usize = 64;
/// Maximum number of catalog resources.
pub(crate) const MAX_RESOURCES: usize = 256;
/// Maximum length of a resource path.
pub(crate) const MAX_RESOURCE_PATH_LENGTH: usize = 2048;
/// Maximum length of a content type.
pub(crate) const MAX_CONTENT_TYPE_LENGTH: usize = 256;
/// Maximum number of rejected path characters.
pub(crate) const MAX_REJECTED_PATH_CHARS: usize = 32;
/// Maximum number of selectable recipients.
pub(crate) const MAX_RECIPIENTS: usize = 64;
/// Maximum number of configured workflow scenarios.
pub(crate) const MAX_SCENARIOS: usize = 64;
/// Maximum number of steps in one scenario.
pub(crate) const MAX_SCENARIO_STEPS: usize = 256;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Compliance harness configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HarnessConfig {
    /// Service under test.
    #[serde(default)]
    pub target: TargetConfig,
    /// Resource catalog; replaces the default catalog when present.
    #[serde(default = "default_resources")]
    pub resources: Vec<ResourceConfig>,
    /// Routing assumptions used to derive expected outcomes.
    #[serde(default)]
    pub routing: RoutingConfig,
    /// Submission workflow configuration.
    #[serde(default)]
    pub workflow: WorkflowConfig,
    /// Audit output configuration.
    #[serde(default)]
    pub audit: AuditConfig,
    /// Directory of the loaded file, used to resolve relative paths.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            target: TargetConfig::default(),
            resources: default_resources(),
            routing: RoutingConfig::default(),
            workflow: WorkflowConfig::default(),
            audit: AuditConfig::default(),
            base_dir: None,
        }
    }
}

impl HarnessConfig {
    /// Loads configuration using the default resolution rules.
    ///
    /// An explicit `path` wins, then `COMPLIANCE_HARNESS_CONFIG`, then
    /// `compliance-harness.toml` in the working directory. Built-in defaults
    /// apply only when none of those is named and the default file is absent.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let env_path = read_env_strict(HarnessEnv::ConfigPath.as_str())
            .map_err(ConfigError::Invalid)?;
        match resolve_path(path, env_path.as_deref())? {
            Some(resolved) => Self::load_from(&resolved),
            None => {
                let config = Self::default();
                config.validate()?;
                Ok(config)
            }
        }
    }

    /// Loads configuration from an explicit file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read, parsed, or
    /// validated.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        validate_path(path)?;
        let bytes = fs::read(path).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let mut config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates configuration text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        if content.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
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
        self.target.validate()?;
        validate_resources(&self.resources)?;
        self.routing.validate()?;
        self.workflow.validate()?;
        self.audit.validate()?;
        Ok(())
    }

    /// Applies environment overrides on top of file values.
    pub fn apply_env(&mut self, overrides: &HarnessEnvOverrides) {
        if let Some(base_url) = &overrides.base_url {
            self.target.base_url.clone_from(base_url);
        }
        if let Some(timeout) = overrides.timeout {
            self.target.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        }
        if let Some(max_concurrency) = overrides.max_concurrency {
            self.target.max_concurrency = max_concurrency;
        }
    }

    /// Returns the resource catalog as core descriptors.
    #[must_use]
    pub fn catalog(&self) -> Vec<ResourceDescriptor> {
        self.resources.iter().map(ResourceConfig::descriptor).collect()
    }

    /// Returns the routing policy used to derive expected outcomes.
    #[must_use]
    pub fn matrix_policy(&self) -> MatrixPolicy {
        MatrixPolicy {
            classifier: PathClassifier::new(self.routing.rejected_path_chars.chars()),
            delete: self.routing.delete_policy,
        }
    }

    /// Returns the selectable recipients.
    #[must_use]
    pub fn roster(&self) -> Vec<RecipientId> {
        self.workflow.recipients.iter().map(|id| RecipientId::new(id.as_str())).collect()
    }

    /// Returns the built-in scenario followed by configured scenarios.
    #[must_use]
    pub fn scenarios(&self) -> Vec<WorkflowScenario> {
        let mut scenarios = vec![WorkflowScenario::submission_blocked_until_recipient()];
        scenarios.extend(self.workflow.scenarios.iter().cloned());
        scenarios
    }

    /// Resolves a configured path relative to the config file directory.
    #[must_use]
    pub fn resolve_relative(&self, value: &str) -> PathBuf {
        let path = Path::new(value);
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

/// Target service configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetConfig {
    /// Base URL of the service under test.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-exchange timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Maximum concurrent exchanges.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }
}

impl TargetConfig {
    /// Returns the parsed base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the URL is not an absolute http(s) URL.
    pub fn parsed_base_url(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(self.base_url.trim()).map_err(|err| {
            ConfigError::Invalid(format!("target.base_url is not a valid url: {err}"))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid(
                "target.base_url must use http:// or https://".to_string(),
            ));
        }
        if url.host_str().is_none_or(str::is_empty) {
            return Err(ConfigError::Invalid("target.base_url must include a host".to_string()));
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(ConfigError::Invalid(
                "target.base_url must not include a query or fragment".to_string(),
            ));
        }
        Ok(url)
    }

    /// Validates target configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        self.parsed_base_url()?;
        if self.timeout_ms == 0 || self.timeout_ms > MAX_TIMEOUT_MS {
            return Err(ConfigError::Invalid(format!(
                "target.timeout_ms must be between 1 and {MAX_TIMEOUT_MS}"
            )));
        }
        if self.max_concurrency == 0 || self.max_concurrency > MAX_CONCURRENCY {
            return Err(ConfigError::Invalid(format!(
                "target.max_concurrency must be between 1 and {MAX_CONCURRENCY}"
            )));
        }
        Ok(())
    }
}

/// Catalog resource entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResourceConfig {
    /// Request path.
    pub path: String,
    /// Content type served on success.
    pub content_type: String,
    /// Status served on success.
    pub status: u16,
    /// Optional JSON schema file for the response body.
    #[serde(default)]
    pub schema: Option<String>,
}

impl ResourceConfig {
    /// Returns the core descriptor for this entry.
    #[must_use]
    pub fn descriptor(&self) -> ResourceDescriptor {
        ResourceDescriptor::new(self.path.as_str(), self.content_type.as_str(), self.status)
    }

    /// Validates a single resource entry.
    fn validate(&self, index: usize) -> Result<(), ConfigError> {
        let field = format!("resources[{index}]");
        if !self.path.starts_with('/') {
            return Err(ConfigError::Invalid(format!("{field}.path must start with '/'")));
        }
        if self.path.len() > MAX_RESOURCE_PATH_LENGTH {
            return Err(ConfigError::Invalid(format!("{field}.path exceeds max length")));
        }
        if self.path.chars().any(|ch| ch.is_control()) {
            return Err(ConfigError::Invalid(format!(
                "{field}.path must not contain control characters"
            )));
        }
        let content_type = self.content_type.trim();
        if content_type.is_empty() || content_type.len() > MAX_CONTENT_TYPE_LENGTH {
            return Err(ConfigError::Invalid(format!(
                "{field}.content_type must be 1..={MAX_CONTENT_TYPE_LENGTH} characters"
            )));
        }
        if !(100 ..= 599).contains(&self.status) {
            return Err(ConfigError::Invalid(format!("{field}.status must be between 100 and 599")));
        }
        if let Some(schema) = &self.schema {
            validate_path_string(&format!("{field}.schema"), schema)?;
            if !self.descriptor().declares_json() {
                return Err(ConfigError::Invalid(format!(
                    "{field}.schema requires a json content_type"
                )));
            }
        }
        Ok(())
    }
}

/// Routing assumptions about the service under test.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoutingConfig {
    /// Characters the router rejects before method dispatch.
    #[serde(default = "default_rejected_path_chars")]
    pub rejected_path_chars: String,
    /// Expected DELETE behaviour on valid paths.
    #[serde(default)]
    pub delete_policy: DeletePolicy,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            rejected_path_chars: default_rejected_path_chars(),
            delete_policy: DeletePolicy::default(),
        }
    }
}

impl RoutingConfig {
    /// Validates routing configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.rejected_path_chars.chars().count() > MAX_REJECTED_PATH_CHARS {
            return Err(ConfigError::Invalid(format!(
                "routing.rejected_path_chars exceeds {MAX_REJECTED_PATH_CHARS} characters"
            )));
        }
        if self.rejected_path_chars.contains('/') {
            return Err(ConfigError::Invalid(
                "routing.rejected_path_chars must not contain '/'".to_string(),
            ));
        }
        Ok(())
    }
}

/// Submission workflow configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkflowConfig {
    /// Selectable recipient element ids.
    #[serde(default = "default_recipients")]
    pub recipients: Vec<String>,
    /// Additional scenarios replayed after the built-in one.
    #[serde(default)]
    pub scenarios: Vec<WorkflowScenario>,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            recipients: default_recipients(),
            scenarios: Vec::new(),
        }
    }
}

impl WorkflowConfig {
    /// Validates workflow configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.recipients.is_empty() || self.recipients.len() > MAX_RECIPIENTS {
            return Err(ConfigError::Invalid(format!(
                "workflow.recipients must list 1..={MAX_RECIPIENTS} recipients"
            )));
        }
        let mut seen = BTreeSet::new();
        for recipient in &self.recipients {
            if !matches!(ElementId::parse(recipient), Ok(ElementId::Recipient(_))) {
                return Err(ConfigError::Invalid(format!(
                    "workflow.recipients entry {recipient} must look like receiver-<n>"
                )));
            }
            if !seen.insert(recipient.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "workflow.recipients entry {recipient} is duplicated"
                )));
            }
        }
        if self.scenarios.len() > MAX_SCENARIOS {
            return Err(ConfigError::Invalid(format!(
                "workflow.scenarios exceeds {MAX_SCENARIOS} entries"
            )));
        }
        let mut names = BTreeSet::new();
        for scenario in &self.scenarios {
            validate_scenario(scenario)?;
            if !names.insert(scenario.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "workflow scenario {} is duplicated",
                    scenario.name
                )));
            }
        }
        Ok(())
    }
}

/// Audit sink selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditMode {
    /// JSON lines on stderr.
    #[default]
    Stderr,
    /// JSON lines appended to a file.
    File,
    /// Audit output disabled.
    Off,
}

/// Audit output configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Sink selection.
    #[serde(default)]
    pub mode: AuditMode,
    /// Audit log path for file mode (JSON lines).
    #[serde(default)]
    pub path: Option<String>,
}

impl AuditConfig {
    /// Validates audit configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        match (self.mode, &self.path) {
            (AuditMode::File, None) => {
                Err(ConfigError::Invalid("audit.path is required when mode is file".to_string()))
            }
            (_, Some(path)) => validate_path_string("audit.path", path),
            (_, None) => Ok(()),
        }
    }
}

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Returns the default target base URL.
fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

/// Returns the default exchange timeout.
const fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

/// Returns the default concurrency.
const fn default_max_concurrency() -> usize {
    DEFAULT_MAX_CONCURRENCY
}

/// Returns the default catalog as config entries.
fn default_resources() -> Vec<ResourceConfig> {
    ResourceDescriptor::default_catalog()
        .into_iter()
        .map(|descriptor| ResourceConfig {
            path: descriptor.path,
            content_type: descriptor.expected_content_type,
            status: descriptor.expected_success_status,
            schema: None,
        })
        .collect()
}

/// Returns the default rejected path characters.
fn default_rejected_path_chars() -> String {
    compliance_core::runtime::matrix::DEFAULT_REJECTED_PATH_CHARS.to_string()
}

/// Returns the default recipient roster.
fn default_recipients() -> Vec<String> {
    vec!["receiver-0".to_string()]
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
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

/// Resolves the config path from the CLI flag, the environment, or the
/// default file name. Returns `None` when only the default applies and the
/// default file does not exist.
///
/// # Errors
///
/// Returns [`ConfigError`] when the environment path exceeds length limits.
pub fn resolve_path(
    path: Option<&Path>,
    env_path: Option<&str>,
) -> Result<Option<PathBuf>, ConfigError> {
    if let Some(path) = path {
        return Ok(Some(path.to_path_buf()));
    }
    if let Some(env_path) = env_path {
        if env_path.trim().is_empty() {
            return Err(ConfigError::Invalid(format!(
                "{} must not be empty",
                HarnessEnv::ConfigPath.as_str()
            )));
        }
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(Some(PathBuf::from(env_path)));
    }
    let default = PathBuf::from(DEFAULT_CONFIG_NAME);
    Ok(default.is_file().then_some(default))
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
        if component.as_os_str().to_string_lossy().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Validates the catalog: bounds, per-entry rules, and unique paths.
fn validate_resources(resources: &[ResourceConfig]) -> Result<(), ConfigError> {
    if resources.is_empty() {
        return Err(ConfigError::Invalid("resources must not be empty".to_string()));
    }
    if resources.len() > MAX_RESOURCES {
        return Err(ConfigError::Invalid(format!("resources exceeds {MAX_RESOURCES} entries")));
    }
    let mut seen = BTreeSet::new();
    for (index, resource) in resources.iter().enumerate() {
        resource.validate(index)?;
        if !seen.insert(resource.path.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "resources[{index}].path {} is duplicated",
                resource.path
            )));
        }
    }
    Ok(())
}

/// Validates one workflow scenario.
fn validate_scenario(scenario: &WorkflowScenario) -> Result<(), ConfigError> {
    if scenario.name.trim().is_empty() {
        return Err(ConfigError::Invalid("workflow scenario name must be non-empty".to_string()));
    }
    if scenario.steps.is_empty() || scenario.steps.len() > MAX_SCENARIO_STEPS {
        return Err(ConfigError::Invalid(format!(
            "workflow scenario {} must have 1..={MAX_SCENARIO_STEPS} steps",
            scenario.name
        )));
    }
    for (index, step) in scenario.steps.iter().enumerate() {
        ElementId::parse(step.element()).map_err(|err| {
            ConfigError::Invalid(format!(
                "workflow scenario {} step {index}: {err}",
                scenario.name
            ))
        })?;
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
