// crates/compliance-core/src/core/mod.rs
// ============================================================================
// Module: Compliance Core Types
// Description: Canonical data model for the compliance harness.
// Purpose: Provide stable, serializable types shared by evaluator and gate.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Core types describe resources, observed responses, the fixed security
//! header contract, verdicts, and the submission wizard's states. They carry
//! no behaviour beyond construction and lookup; evaluation lives in
//! [`crate::runtime`].

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod headers;
pub mod resource;
pub mod response;
pub mod verdict;
pub mod workflow;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use headers::SECURITY_HEADERS;
pub use headers::SecurityHeader;
pub use headers::SecurityHeaderSet;
pub use resource::ContentTypeExpectation;
pub use resource::ResourceDescriptor;
pub use resource::Verb;
pub use resource::VerbOutcome;
pub use response::ObservedHeaders;
pub use response::ObservedResponse;
pub use verdict::Annotation;
pub use verdict::CheckOutcome;
pub use verdict::ComplianceViolation;
pub use verdict::TransportFailure;
pub use verdict::TransportFailureKind;
pub use verdict::Verdict;
pub use workflow::FieldId;
pub use workflow::FieldIdError;
pub use workflow::GateOperation;
pub use workflow::PreconditionViolation;
pub use workflow::RecipientId;
pub use workflow::SubmissionReceipt;
pub use workflow::TransitionRecord;
pub use workflow::WizardPhase;
pub use workflow::WizardState;
pub use workflow::WizardStep;
