// crates/compliance-core/src/runtime/report.rs
// ============================================================================
// Module: Harness Summary
// Description: Aggregates matrix and workflow verdicts into one summary.
// Purpose: Keep pass, fail, and inconclusive counts separate for reporting.
// Dependencies: crate::{core, runtime::scenario}, serde
// ============================================================================

//! ## Overview
//! Folds matrix verdicts and scenario verdicts into a [`HarnessSummary`].
//! Any failure wins over inconclusive results; only a fully passing run
//! reports [`SummaryStatus::Pass`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;

use crate::core::Annotation;
use crate::core::CheckOutcome;
use crate::core::Verdict;
use crate::runtime::scenario::ScenarioVerdict;

// ============================================================================
// SECTION: Summary
// ============================================================================

/// Overall harness status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryStatus {
    /// Every verdict passed.
    Pass,
    /// At least one compliance or workflow failure.
    Fail,
    /// No failures, but at least one exchange could not complete.
    Inconclusive,
}

impl SummaryStatus {
    /// Returns the process exit code for this status.
    #[must_use]
    pub const fn exit_code(self) -> u8 {
        match self {
            Self::Pass => 0,
            Self::Fail => 1,
            Self::Inconclusive => 2,
        }
    }

    /// Returns a stable label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::Inconclusive => "inconclusive",
        }
    }
}

/// Aggregate counts over one harness run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HarnessSummary {
    /// Matrix verdicts evaluated.
    pub checks: usize,
    /// Matrix verdicts that passed.
    pub passed: usize,
    /// Matrix verdicts that failed.
    pub failed: usize,
    /// Matrix verdicts that were inconclusive.
    pub inconclusive: usize,
    /// Verdicts carrying a schema-not-performed annotation.
    pub schema_not_performed: usize,
    /// Workflow scenarios replayed.
    pub scenarios: usize,
    /// Workflow scenarios that failed.
    pub scenarios_failed: usize,
}

impl HarnessSummary {
    /// Aggregates matrix and scenario verdicts.
    #[must_use]
    pub fn from_results(verdicts: &[Verdict], scenarios: &[ScenarioVerdict]) -> Self {
        let mut summary = Self {
            checks: verdicts.len(),
            scenarios: scenarios.len(),
            scenarios_failed: scenarios.iter().filter(|verdict| !verdict.passed()).count(),
            ..Self::default()
        };
        for verdict in verdicts {
            match verdict.outcome {
                CheckOutcome::Pass => summary.passed += 1,
                CheckOutcome::Fail {
                    ..
                } => summary.failed += 1,
                CheckOutcome::Inconclusive {
                    ..
                } => summary.inconclusive += 1,
            }
            if verdict
                .annotations
                .iter()
                .any(|annotation| matches!(annotation, Annotation::SchemaValidationNotPerformed { .. }))
            {
                summary.schema_not_performed += 1;
            }
        }
        summary
    }

    /// Returns the overall status; failures outrank inconclusive exchanges.
    #[must_use]
    pub const fn status(&self) -> SummaryStatus {
        if self.failed > 0 || self.scenarios_failed > 0 {
            SummaryStatus::Fail
        } else if self.inconclusive > 0 {
            SummaryStatus::Inconclusive
        } else {
            SummaryStatus::Pass
        }
    }
}
