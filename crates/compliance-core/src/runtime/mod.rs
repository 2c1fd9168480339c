// crates/compliance-core/src/runtime/mod.rs
// ============================================================================
// Module: Compliance Runtime
// Description: Evaluators, comparator, workflow gate, and aggregation.
// Purpose: Implement the behaviour behind the core data model.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! Runtime logic is synchronous and deterministic. Network exchange happens
//! elsewhere; this module only derives expectations, compares observations,
//! and steps the submission gate.

pub mod comparator;
pub mod gate;
pub mod matrix;
pub mod report;
pub mod scenario;
pub mod ui;

pub use comparator::CheckReport;
pub use comparator::check;
pub use comparator::check_all;
pub use comparator::check_response;
pub use comparator::verdict_for;
pub use gate::SubmissionGate;
pub use matrix::DeletePolicy;
pub use matrix::HTML_ERROR_CONTENT_TYPE;
pub use matrix::MatrixPolicy;
pub use matrix::PathClass;
pub use matrix::PathClassifier;
pub use matrix::PlannedCheck;
pub use matrix::evaluate;
pub use matrix::plan;
pub use report::HarnessSummary;
pub use report::SummaryStatus;
pub use scenario::ScenarioFailure;
pub use scenario::ScenarioStep;
pub use scenario::ScenarioVerdict;
pub use scenario::WorkflowScenario;
pub use ui::ElementId;
pub use ui::UiAction;
pub use ui::UiAdapter;
pub use ui::UiError;
