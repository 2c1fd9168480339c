// crates/compliance-cli/src/audit.rs
// ============================================================================
// Module: Harness Audit Logging
// Description: Structured audit events for matrix checks and workflow replays.
// Purpose: Emit one JSON line per verdict without a hard logging dependency.
// Dependencies: compliance-core, compliance-config, serde, serde_json
// ============================================================================

//! ## Overview
//! Audit events are plain serializable records written as JSON lines. The
//! sink is chosen by `[audit] mode`; deployments can route stderr or the file
//! into whatever pipeline they already run.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use compliance_config::AuditMode;
use compliance_config::HarnessConfig;
use compliance_core::CheckOutcome;
use compliance_core::HarnessSummary;
use compliance_core::ScenarioVerdict;
use compliance_core::SummaryStatus;
use compliance_core::Verb;
use compliance_core::Verdict;
use serde::Serialize;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Audit record for one (resource, verb) verdict.
#[derive(Debug, Clone, Serialize)]
pub struct MatrixVerdictEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Resource path.
    pub resource: String,
    /// Verb used.
    pub verb: Verb,
    /// Expected status code.
    pub expected_status: u16,
    /// Observed status code when a response arrived.
    pub observed_status: Option<u16>,
    /// Outcome label.
    pub outcome: &'static str,
    /// First violation or transport failure, rendered.
    pub detail: Option<String>,
    /// Annotation labels.
    pub annotations: Vec<&'static str>,
}

/// Audit record for one replayed workflow scenario.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowScenarioEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Scenario name.
    pub scenario: String,
    /// Outcome label.
    pub outcome: &'static str,
    /// Gate phase when the replay stopped.
    pub final_phase: &'static str,
    /// Zero-based index of the failing step.
    pub failed_step: Option<usize>,
    /// Failure reason.
    pub reason: Option<String>,
    /// Number of gate transitions journaled.
    pub transitions: usize,
}

/// Audit record closing one harness invocation.
#[derive(Debug, Clone, Serialize)]
pub struct HarnessRunEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Command that produced the run.
    pub command: &'static str,
    /// Overall status.
    pub status: SummaryStatus,
    /// Aggregate counts.
    pub summary: HarnessSummary,
}

impl MatrixVerdictEvent {
    /// Builds an event from a verdict.
    #[must_use]
    pub fn new(verdict: &Verdict) -> Self {
        let detail = match &verdict.outcome {
            CheckOutcome::Pass => None,
            CheckOutcome::Fail {
                violations,
            } => violations.first().map(ToString::to_string),
            CheckOutcome::Inconclusive {
                failure,
            } => Some(failure.to_string()),
        };
        Self {
            event: "matrix_verdict",
            timestamp_ms: now_ms(),
            resource: verdict.resource.path.clone(),
            verb: verdict.verb,
            expected_status: verdict.expected.expected_status,
            observed_status: verdict.observed_status,
            outcome: verdict.outcome.label(),
            detail,
            annotations: verdict.annotations.iter().map(|note| note.label()).collect(),
        }
    }
}

impl WorkflowScenarioEvent {
    /// Builds an event from a scenario verdict.
    #[must_use]
    pub fn new(verdict: &ScenarioVerdict) -> Self {
        Self {
            event: "workflow_scenario",
            timestamp_ms: now_ms(),
            scenario: verdict.scenario.clone(),
            outcome: if verdict.passed() { "pass" } else { "fail" },
            final_phase: verdict.final_phase,
            failed_step: verdict.failure.as_ref().map(|failure| failure.step),
            reason: verdict.failure.as_ref().map(|failure| failure.reason.clone()),
            transitions: verdict.transitions.len(),
        }
    }
}

impl HarnessRunEvent {
    /// Builds the closing event for a command.
    #[must_use]
    pub fn new(command: &'static str, summary: HarnessSummary) -> Self {
        Self {
            event: "harness_run",
            timestamp_ms: now_ms(),
            command,
            status: summary.status(),
            summary,
        }
    }
}

/// Milliseconds since the Unix epoch.
fn now_ms() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis()
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for harness events.
pub trait HarnessAuditSink: Send + Sync {
    /// Record a matrix verdict.
    fn record_verdict(&self, event: &MatrixVerdictEvent);

    /// Record a workflow scenario replay.
    fn record_scenario(&self, _event: &WorkflowScenarioEvent) {}

    /// Record the end of a run.
    fn record_run(&self, _event: &HarnessRunEvent) {}
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl StderrAuditSink {
    /// Writes one event as a JSON line.
    fn emit<T: Serialize>(event: &T) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

impl HarnessAuditSink for StderrAuditSink {
    fn record_verdict(&self, event: &MatrixVerdictEvent) {
        Self::emit(event);
    }

    fn record_scenario(&self, event: &WorkflowScenarioEvent) {
        Self::emit(event);
    }

    fn record_run(&self, event: &HarnessRunEvent) {
        Self::emit(event);
    }
}

/// Audit sink that appends JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    /// Appends one event as a JSON line.
    fn append<T: Serialize>(&self, event: &T) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

impl HarnessAuditSink for FileAuditSink {
    fn record_verdict(&self, event: &MatrixVerdictEvent) {
        self.append(event);
    }

    fn record_scenario(&self, event: &WorkflowScenarioEvent) {
        self.append(event);
    }

    fn record_run(&self, event: &HarnessRunEvent) {
        self.append(event);
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl HarnessAuditSink for NoopAuditSink {
    fn record_verdict(&self, _event: &MatrixVerdictEvent) {}
}

// ============================================================================
// SECTION: Construction
// ============================================================================

/// Builds the sink selected by `[audit]`.
///
/// Relative file paths resolve against the config file's directory.
///
/// # Errors
///
/// Returns an error when file mode is selected and the file cannot be opened.
pub fn build_audit_sink(config: &HarnessConfig) -> io::Result<Arc<dyn HarnessAuditSink>> {
    match config.audit.mode {
        AuditMode::Stderr => Ok(Arc::new(StderrAuditSink)),
        AuditMode::Off => Ok(Arc::new(NoopAuditSink)),
        AuditMode::File => {
            let path = config.audit.path.as_deref().ok_or_else(|| {
                io::Error::new(io::ErrorKind::InvalidInput, "audit.path is required in file mode")
            })?;
            let sink = FileAuditSink::new(&config.resolve_relative(path))?;
            Ok(Arc::new(sink))
        }
    }
}
