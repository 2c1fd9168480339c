// crates/compliance-cli/src/schema.rs
// ============================================================================
// Module: Body Schema Registry
// Description: JSON-schema validation of response bodies by resource path.
// Purpose: Turn configured schema files into a core body validator.
// Dependencies: compliance-core, compliance-config, jsonschema, serde_json
// ============================================================================

//! ## Overview
//! Resources may name a JSON schema file in configuration. Each file is
//! compiled once (draft 2020-12) and keyed by resource path. Resources
//! without a schema answer "not performed", which the comparator turns into
//! an explicit annotation rather than a pass.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::path::Path;

use compliance_config::HarnessConfig;
use compliance_core::BodyValidation;
use compliance_core::BodyValidator;
use compliance_core::ResourceDescriptor;
use jsonschema::Draft;
use jsonschema::Validator;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum schema file size in bytes.
pub const MAX_SCHEMA_FILE_BYTES: u64 = 1024 * 1024;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Schema loading errors.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Schema file could not be read.
    #[error("schema {path}: io error: {error}")]
    Io {
        /// Schema file path.
        path: String,
        /// Underlying error.
        error: String,
    },
    /// Schema file exceeds the size limit.
    #[error("schema {path}: exceeds size limit ({size} > {limit} bytes)")]
    TooLarge {
        /// Schema file path.
        path: String,
        /// Actual size.
        size: u64,
        /// Size limit.
        limit: u64,
    },
    /// Schema file is not JSON.
    #[error("schema {path}: parse error: {error}")]
    Parse {
        /// Schema file path.
        path: String,
        /// Underlying error.
        error: String,
    },
    /// Schema document failed to compile.
    #[error("schema {path}: compile error: {error}")]
    Compile {
        /// Schema file path or label.
        path: String,
        /// Underlying error.
        error: String,
    },
}

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Compiled schema plus the label used in verdicts.
struct CompiledSchema {
    /// Label reported in annotations and violations.
    label: String,
    /// Compiled validator.
    validator: Validator,
}

/// Body validator backed by compiled JSON schemas.
#[derive(Default)]
pub struct SchemaRegistry {
    /// Compiled schemas keyed by resource path.
    schemas: BTreeMap<String, CompiledSchema>,
}

impl SchemaRegistry {
    /// Creates an empty registry; every resource answers "not performed".
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads and compiles every schema named in `[[resources]]`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] when a schema file cannot be read, parsed, or
    /// compiled.
    pub fn from_config(config: &HarnessConfig) -> Result<Self, SchemaError> {
        let mut registry = Self::new();
        for resource in &config.resources {
            let Some(schema) = resource.schema.as_deref() else {
                continue;
            };
            let document = read_schema(&config.resolve_relative(schema))?;
            registry.insert(&resource.path, schema, &document)?;
        }
        Ok(registry)
    }

    /// Compiles `schema` and binds it to a resource path.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Compile`] when the schema is not a valid draft
    /// 2020-12 document.
    pub fn insert(&mut self, path: &str, label: &str, schema: &Value) -> Result<(), SchemaError> {
        let validator = jsonschema::options()
            .with_draft(Draft::Draft202012)
            .build(schema)
            .map_err(|err| SchemaError::Compile {
                path: label.to_string(),
                error: err.to_string(),
            })?;
        self.schemas.insert(
            path.to_string(),
            CompiledSchema {
                label: label.to_string(),
                validator,
            },
        );
        Ok(())
    }

    /// Returns the number of bound schemas.
    #[must_use]
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Returns true when no schema is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

impl BodyValidator for SchemaRegistry {
    fn validate(&self, descriptor: &ResourceDescriptor, body: &[u8]) -> BodyValidation {
        let Some(compiled) = self.schemas.get(&descriptor.path) else {
            return BodyValidation::NotPerformed;
        };
        let instance: Value = match serde_json::from_slice(body) {
            Ok(instance) => instance,
            Err(err) => {
                return BodyValidation::Invalid {
                    schema: compiled.label.clone(),
                    detail: format!("body is not valid JSON: {err}"),
                };
            }
        };
        match compiled.validator.validate(&instance) {
            Ok(()) => BodyValidation::Valid {
                schema: compiled.label.clone(),
            },
            Err(err) => BodyValidation::Invalid {
                schema: compiled.label.clone(),
                detail: err.to_string(),
            },
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads a schema file with a size limit.
fn read_schema(path: &Path) -> Result<Value, SchemaError> {
    let label = path.display().to_string();
    let metadata = std::fs::metadata(path).map_err(|err| SchemaError::Io {
        path: label.clone(),
        error: err.to_string(),
    })?;
    if metadata.len() > MAX_SCHEMA_FILE_BYTES {
        return Err(SchemaError::TooLarge {
            path: label,
            size: metadata.len(),
            limit: MAX_SCHEMA_FILE_BYTES,
        });
    }
    let bytes = std::fs::read(path).map_err(|err| SchemaError::Io {
        path: label.clone(),
        error: err.to_string(),
    })?;
    serde_json::from_slice(&bytes).map_err(|err| SchemaError::Parse {
        path: label,
        error: err.to_string(),
    })
}
