// crates/compliance-core/src/core/verdict.rs
// ============================================================================
// Module: Compliance Verdicts
// Description: Violations, annotations, transport failures, and verdicts.
// Purpose: Keep compliance failures, skipped checks, and flaky infrastructure apart.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! A verdict is the outcome of one (resource, verb) exchange. Compliance
//! failures, transport failures, and unchecked dimensions are distinct types
//! so aggregate counts never mix them: a transport failure is
//! `Inconclusive`, and an unvalidated JSON body is an [`Annotation`], never a
//! pass.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;
use thiserror::Error;

use crate::core::resource::ResourceDescriptor;
use crate::core::resource::Verb;
use crate::core::resource::VerbOutcome;

// ============================================================================
// SECTION: Compliance Violations
// ============================================================================

/// Expected-versus-observed mismatch on a single dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ComplianceViolation {
    /// Status code differs.
    #[error("status: expected {expected}, got {actual}")]
    Status {
        /// Expected status.
        expected: u16,
        /// Observed status.
        actual: u16,
    },
    /// Content type differs or is absent.
    #[error("content-type: expected \"{expected}\", got {}", display_optional(actual.as_deref()))]
    ContentType {
        /// Expected content type.
        expected: String,
        /// Observed content type.
        actual: Option<String>,
    },
    /// A required security header is absent.
    #[error("header {name}: expected \"{expected}\", header missing")]
    MissingHeader {
        /// Header name as documented.
        name: String,
        /// Required value.
        expected: String,
    },
    /// A required security header carries the wrong value.
    #[error("header {name}: expected \"{expected}\", got \"{actual}\"")]
    HeaderValue {
        /// Header name as documented.
        name: String,
        /// Required value.
        expected: String,
        /// Observed value.
        actual: String,
    },
    /// Response body failed its configured schema.
    #[error("body schema {schema}: {detail}")]
    BodySchema {
        /// Schema label.
        schema: String,
        /// First validation error.
        detail: String,
    },
}

impl ComplianceViolation {
    /// Returns the name of the failing field or header.
    #[must_use]
    pub fn subject(&self) -> &str {
        match self {
            Self::Status {
                ..
            } => "status",
            Self::ContentType {
                ..
            } => "content-type",
            Self::MissingHeader {
                name, ..
            }
            | Self::HeaderValue {
                name, ..
            } => name,
            Self::BodySchema {
                ..
            } => "body",
        }
    }
}

/// Formats an optional observed value for messages.
fn display_optional(value: Option<&str>) -> String {
    value.map_or_else(|| "nothing".to_string(), |value| format!("\"{value}\""))
}

// ============================================================================
// SECTION: Annotations
// ============================================================================

/// Non-failing note attached to a verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Annotation {
    /// The body is JSON but no schema was available, so it was not checked.
    SchemaValidationNotPerformed {
        /// Content type that would require validation.
        content_type: String,
    },
    /// The body was validated against a configured schema.
    SchemaValidated {
        /// Schema label.
        schema: String,
    },
}

impl Annotation {
    /// Returns a stable label for reports.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::SchemaValidationNotPerformed {
                ..
            } => "schema validation not performed",
            Self::SchemaValidated {
                ..
            } => "schema validated",
        }
    }
}

// ============================================================================
// SECTION: Transport Failures
// ============================================================================

/// Classification of infrastructure failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportFailureKind {
    /// Exchange exceeded its deadline.
    Timeout,
    /// Connection could not be established.
    Connect,
    /// Response could not be read or decoded.
    Protocol,
    /// Any other transport error.
    Other,
}

impl TransportFailureKind {
    /// Returns a stable label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Connect => "connect",
            Self::Protocol => "protocol",
            Self::Other => "other",
        }
    }
}

/// Network or driver error reaching the system under test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("transport {}: {message}", kind.as_str())]
pub struct TransportFailure {
    /// Failure classification.
    pub kind: TransportFailureKind,
    /// Transport-provided detail.
    pub message: String,
}

impl TransportFailure {
    /// Creates a transport failure.
    #[must_use]
    pub fn new(kind: TransportFailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

// ============================================================================
// SECTION: Outcomes
// ============================================================================

/// Outcome of one (resource, verb) exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CheckOutcome {
    /// Every asserted dimension matched.
    Pass,
    /// At least one dimension mismatched.
    ///
    /// # Invariants
    /// - `violations` is non-empty and ordered status, content type, headers, body.
    Fail {
        /// Violations in deterministic order.
        violations: Vec<ComplianceViolation>,
    },
    /// The exchange could not be completed.
    Inconclusive {
        /// Transport failure detail.
        failure: TransportFailure,
    },
}

impl CheckOutcome {
    /// Returns a stable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail {
                ..
            } => "fail",
            Self::Inconclusive {
                ..
            } => "inconclusive",
        }
    }

    /// Returns the first violation for failed outcomes.
    #[must_use]
    pub fn first_violation(&self) -> Option<&ComplianceViolation> {
        match self {
            Self::Fail {
                violations,
            } => violations.first(),
            _ => None,
        }
    }
}

/// Verdict for one (resource, verb) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    /// Resource under test.
    pub resource: ResourceDescriptor,
    /// Verb used.
    pub verb: Verb,
    /// Expected outcome that was asserted.
    pub expected: VerbOutcome,
    /// Observed status when a response arrived.
    pub observed_status: Option<u16>,
    /// Verdict outcome.
    pub outcome: CheckOutcome,
    /// Non-failing annotations.
    pub annotations: Vec<Annotation>,
}

impl Verdict {
    /// Creates an inconclusive verdict for a failed exchange.
    #[must_use]
    pub const fn inconclusive(
        resource: ResourceDescriptor,
        verb: Verb,
        expected: VerbOutcome,
        failure: TransportFailure,
    ) -> Self {
        Self {
            resource,
            verb,
            expected,
            observed_status: None,
            outcome: CheckOutcome::Inconclusive {
                failure,
            },
            annotations: Vec::new(),
        }
    }
}
