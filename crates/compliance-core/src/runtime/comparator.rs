// crates/compliance-core/src/runtime/comparator.rs
// ============================================================================
// Module: Compliance Comparator
// Description: Compares observed responses against expected outcomes.
// Purpose: Turn a response and its expectation into violations and annotations.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! Comparison order is fixed: status, content type (when constrained), each
//! security header in table order, then the body. [`check`] reports the first
//! mismatch in that order; [`check_all`] batches every mismatch for reporting
//! without changing which one comes first.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::Annotation;
use crate::core::CheckOutcome;
use crate::core::ComplianceViolation;
use crate::core::ObservedResponse;
use crate::core::SecurityHeaderSet;
use crate::core::Verdict;
use crate::core::VerbOutcome;
use crate::interfaces::BodyValidation;
use crate::interfaces::BodyValidator;
use crate::runtime::matrix::PlannedCheck;

// ============================================================================
// SECTION: Check Report
// ============================================================================

/// Batched comparison result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckReport {
    /// Violations in comparison order.
    pub violations: Vec<ComplianceViolation>,
    /// Non-failing annotations.
    pub annotations: Vec<Annotation>,
}

impl CheckReport {
    /// Returns true when no violations were found.
    #[must_use]
    pub const fn passed(&self) -> bool {
        self.violations.is_empty()
    }

    /// Converts the report into the first violation, if any.
    ///
    /// # Errors
    ///
    /// Returns the first [`ComplianceViolation`] in comparison order.
    pub fn into_result(self) -> Result<Vec<Annotation>, ComplianceViolation> {
        match self.violations.into_iter().next() {
            Some(violation) => Err(violation),
            None => Ok(self.annotations),
        }
    }

    /// Converts the report into a verdict outcome.
    #[must_use]
    pub fn outcome(&self) -> CheckOutcome {
        if self.violations.is_empty() {
            CheckOutcome::Pass
        } else {
            CheckOutcome::Fail {
                violations: self.violations.clone(),
            }
        }
    }
}

// ============================================================================
// SECTION: Comparison
// ============================================================================

/// Checks status, content type, and headers, reporting the first mismatch.
///
/// # Errors
///
/// Returns the first [`ComplianceViolation`] found.
pub fn check(
    observed: &ObservedResponse,
    expected: &VerbOutcome,
    headers: &SecurityHeaderSet,
) -> Result<(), ComplianceViolation> {
    compare_envelope(observed, expected, headers).into_iter().next().map_or(Ok(()), Err)
}

/// Checks status, content type, and headers, collecting every mismatch.
#[must_use]
pub fn check_all(
    observed: &ObservedResponse,
    expected: &VerbOutcome,
    headers: &SecurityHeaderSet,
) -> Vec<ComplianceViolation> {
    compare_envelope(observed, expected, headers)
}

/// Runs the full comparison, including body validation, and returns a report.
#[must_use]
pub fn check_response<V: BodyValidator + ?Sized>(
    check: &PlannedCheck,
    observed: &ObservedResponse,
    headers: &SecurityHeaderSet,
    validator: &V,
) -> CheckReport {
    let mut report = CheckReport {
        violations: compare_envelope(observed, &check.expected, headers),
        annotations: Vec::new(),
    };
    if !check.expected.expects_json() {
        return report;
    }
    match validator.validate(&check.descriptor, &observed.body) {
        BodyValidation::NotPerformed => {
            report.annotations.push(Annotation::SchemaValidationNotPerformed {
                content_type: check.descriptor.expected_content_type.clone(),
            });
        }
        BodyValidation::Valid {
            schema,
        } => report.annotations.push(Annotation::SchemaValidated {
            schema,
        }),
        BodyValidation::Invalid {
            schema,
            detail,
        } => report.violations.push(ComplianceViolation::BodySchema {
            schema,
            detail,
        }),
    }
    report
}

/// Builds the verdict for a completed exchange.
#[must_use]
pub fn verdict_for<V: BodyValidator + ?Sized>(
    check: &PlannedCheck,
    observed: &ObservedResponse,
    headers: &SecurityHeaderSet,
    validator: &V,
) -> Verdict {
    let report = check_response(check, observed, headers, validator);
    Verdict {
        resource: check.descriptor.clone(),
        verb: check.verb,
        expected: check.expected.clone(),
        observed_status: Some(observed.status),
        outcome: report.outcome(),
        annotations: report.annotations,
    }
}

/// Compares status, content type, and headers in fixed order.
fn compare_envelope(
    observed: &ObservedResponse,
    expected: &VerbOutcome,
    headers: &SecurityHeaderSet,
) -> Vec<ComplianceViolation> {
    let mut violations = Vec::new();
    if observed.status != expected.expected_status {
        violations.push(ComplianceViolation::Status {
            expected: expected.expected_status,
            actual: observed.status,
        });
    }
    if let Some(content_type) = expected.expected_content_type.as_exact()
        && observed.declared_content_type.as_deref() != Some(content_type)
    {
        violations.push(ComplianceViolation::ContentType {
            expected: content_type.to_string(),
            actual: observed.declared_content_type.clone(),
        });
    }
    for header in headers.entries() {
        match observed.headers.get(header.name) {
            None => violations.push(ComplianceViolation::MissingHeader {
                name: header.name.to_string(),
                expected: header.value.to_string(),
            }),
            Some(actual) if actual != header.value => {
                violations.push(ComplianceViolation::HeaderValue {
                    name: header.name.to_string(),
                    expected: header.value.to_string(),
                    actual,
                });
            }
            Some(_) => {}
        }
    }
    violations
}
