// crates/compliance-core/src/interfaces/mod.rs
// ============================================================================
// Module: Compliance Interfaces
// Description: Collaborator seams used by the comparator.
// Purpose: Keep body validation backends out of the core.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! The core never parses bodies itself. A [`BodyValidator`] decides whether a
//! body was checked; "not performed" is a first-class answer so that an
//! unchecked dimension is reported as such instead of passing silently.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::ResourceDescriptor;

// ============================================================================
// SECTION: Body Validation
// ============================================================================

/// Result of validating a response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyValidation {
    /// No validation was performed for this resource.
    NotPerformed,
    /// Body satisfied the named schema.
    Valid {
        /// Schema label.
        schema: String,
    },
    /// Body violated the named schema.
    Invalid {
        /// Schema label.
        schema: String,
        /// First validation error.
        detail: String,
    },
}

/// Validates response bodies of JSON resources.
pub trait BodyValidator {
    /// Validates the body returned for `descriptor`.
    fn validate(&self, descriptor: &ResourceDescriptor, body: &[u8]) -> BodyValidation;
}

/// Validator that never validates anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBodyValidation;

impl BodyValidator for NoBodyValidation {
    fn validate(&self, _descriptor: &ResourceDescriptor, _body: &[u8]) -> BodyValidation {
        BodyValidation::NotPerformed
    }
}
