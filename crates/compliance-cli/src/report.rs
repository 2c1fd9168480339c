// crates/compliance-cli/src/report.rs
// ============================================================================
// Module: Report Rendering
// Description: Text and JSON rendering of plans, verdicts, and summaries.
// Purpose: Give the binary one place that turns results into output.
// Dependencies: compliance-core, clap, serde, serde_json
// ============================================================================

//! ## Overview
//! Text output prints one line per verdict with the first offending detail
//! for failures, followed by a single summary line. JSON output serializes
//! the same data for machine consumption.

// ============================================================================
// SECTION: Imports
// ============================================================================

use clap::ValueEnum;
use compliance_core::Annotation;
use compliance_core::CheckOutcome;
use compliance_core::HarnessSummary;
use compliance_core::PlannedCheck;
use compliance_core::ScenarioVerdict;
use compliance_core::SummaryStatus;
use compliance_core::Verdict;
use serde::Serialize;

use crate::t;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Output format for harness reports.
#[derive(ValueEnum, Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

impl OutputFormat {
    /// Returns a stable label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Json => "json",
        }
    }
}

/// JSON document emitted for a run.
#[derive(Serialize)]
struct RunDocument<'a> {
    /// Overall status.
    status: SummaryStatus,
    /// Aggregate counts.
    summary: &'a HarnessSummary,
    /// Matrix verdicts in plan order.
    verdicts: &'a [Verdict],
    /// Workflow scenario verdicts.
    scenarios: &'a [ScenarioVerdict],
}

// ============================================================================
// SECTION: Rendering
// ============================================================================

/// Renders the expected outcome of every planned check.
///
/// # Errors
///
/// Returns an error when JSON serialization fails.
pub fn render_plan(
    checks: &[PlannedCheck],
    format: OutputFormat,
) -> Result<String, serde_json::Error> {
    if format == OutputFormat::Json {
        return serde_json::to_string_pretty(checks);
    }
    let mut output = t!("report.plan.header", count = checks.len());
    for check in checks {
        let content_type = check
            .expected
            .expected_content_type
            .as_exact()
            .map_or_else(|| t!("report.plan.unconstrained"), ToString::to_string);
        output.push('\n');
        output.push_str(&t!(
            "report.plan.entry",
            verb = check.verb.as_str(),
            path = check.descriptor.path,
            status = check.expected.expected_status,
            content_type = content_type
        ));
    }
    Ok(output)
}

/// Renders verdicts, scenario results, and the summary line.
///
/// # Errors
///
/// Returns an error when JSON serialization fails.
pub fn render_run(
    verdicts: &[Verdict],
    scenarios: &[ScenarioVerdict],
    summary: &HarnessSummary,
    format: OutputFormat,
) -> Result<String, serde_json::Error> {
    if format == OutputFormat::Json {
        return serde_json::to_string_pretty(&RunDocument {
            status: summary.status(),
            summary,
            verdicts,
            scenarios,
        });
    }
    let mut lines = Vec::new();
    for verdict in verdicts {
        lines.push(verdict_line(verdict));
        lines.extend(verdict.annotations.iter().map(annotation_line));
    }
    lines.extend(scenarios.iter().map(scenario_line));
    lines.push(summary_line(summary));
    Ok(lines.join("\n"))
}

/// Renders the headline for one verdict.
fn verdict_line(verdict: &Verdict) -> String {
    let verb = verdict.verb.as_str();
    let path = verdict.resource.path.as_str();
    match &verdict.outcome {
        CheckOutcome::Pass => t!(
            "report.verdict.pass",
            verb = verb,
            path = path,
            status = verdict.observed_status.unwrap_or(verdict.expected.expected_status)
        ),
        CheckOutcome::Fail {
            violations,
        } => {
            let first = violations.first().map(ToString::to_string).unwrap_or_default();
            match violations.len().saturating_sub(1) {
                0 => t!("report.verdict.fail", verb = verb, path = path, violation = first),
                more => t!(
                    "report.verdict.fail_more",
                    verb = verb,
                    path = path,
                    violation = first,
                    more = more
                ),
            }
        }
        CheckOutcome::Inconclusive {
            failure,
        } => t!("report.verdict.inconclusive", verb = verb, path = path, failure = failure),
    }
}

/// Renders an annotation under its verdict.
fn annotation_line(annotation: &Annotation) -> String {
    let detail = match annotation {
        Annotation::SchemaValidationNotPerformed {
            content_type,
        } => content_type,
        Annotation::SchemaValidated {
            schema,
        } => schema,
    };
    t!("report.annotation", label = annotation.label(), detail = detail)
}

/// Renders one scenario result.
fn scenario_line(verdict: &ScenarioVerdict) -> String {
    match &verdict.failure {
        None => t!(
            "report.scenario.pass",
            name = verdict.scenario,
            phase = verdict.final_phase,
            transitions = verdict.transitions.len()
        ),
        Some(failure) => t!(
            "report.scenario.fail",
            name = verdict.scenario,
            step = failure.step,
            action = failure.action,
            element = failure.element,
            reason = failure.reason
        ),
    }
}

/// Renders the closing summary.
fn summary_line(summary: &HarnessSummary) -> String {
    t!(
        "report.summary",
        status = summary.status().as_str(),
        checks = summary.checks,
        passed = summary.passed,
        failed = summary.failed,
        inconclusive = summary.inconclusive,
        schema = summary.schema_not_performed,
        scenarios = summary.scenarios,
        scenarios_failed = summary.scenarios_failed
    )
}

// ============================================================================
// SECTION: Tests
// ============================================================================
