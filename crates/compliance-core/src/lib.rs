// crates/compliance-core/src/lib.rs
// ============================================================================
// Module: Compliance Core Library
// Description: Public API surface for the compliance harness core.
// Purpose: Expose the compliance matrix, workflow gate, and verdict types.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Compliance core encodes the contract a disclosure-submission service must
//! satisfy: a resource/verb header-compliance matrix and a step-gated
//! submission wizard. Everything here is synchronous and transport-agnostic;
//! network exchange and browser driving are supplied by callers through
//! [`interfaces`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::*;

pub use interfaces::BodyValidation;
pub use interfaces::BodyValidator;
pub use interfaces::NoBodyValidation;
pub use runtime::CheckReport;
pub use runtime::HTML_ERROR_CONTENT_TYPE;
pub use runtime::DeletePolicy;
pub use runtime::ElementId;
pub use runtime::HarnessSummary;
pub use runtime::MatrixPolicy;
pub use runtime::PathClass;
pub use runtime::PathClassifier;
pub use runtime::PlannedCheck;
pub use runtime::ScenarioFailure;
pub use runtime::ScenarioStep;
pub use runtime::ScenarioVerdict;
pub use runtime::SubmissionGate;
pub use runtime::SummaryStatus;
pub use runtime::UiAction;
pub use runtime::UiAdapter;
pub use runtime::UiError;
pub use runtime::WorkflowScenario;
pub use runtime::check;
pub use runtime::check_all;
pub use runtime::check_response;
pub use runtime::evaluate;
pub use runtime::plan;
pub use runtime::verdict_for;
