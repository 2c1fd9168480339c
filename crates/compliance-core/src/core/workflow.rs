// crates/compliance-core/src/core/workflow.rs
// ============================================================================
// Module: Submission Workflow Types
// Description: Wizard steps, phases, identifiers, and precondition errors.
// Purpose: Provide the vocabulary used by the submission gate state machine.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! These types describe the submission wizard independently of any rendering
//! technology. The state machine itself lives in
//! [`crate::runtime::SubmissionGate`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Steps and Phases
// ============================================================================

/// Wizard step that can be active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    /// First questionnaire step.
    Step0,
    /// Recipient selection step.
    RecipientSelection,
}

impl WizardStep {
    /// Returns the numeric step index used in element identifiers.
    #[must_use]
    pub const fn index(self) -> Option<u32> {
        match self {
            Self::Step0 => Some(0),
            Self::RecipientSelection => None,
        }
    }

    /// Returns a stable label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Step0 => "step_0",
            Self::RecipientSelection => "recipient_selection",
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named state of the submission gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum WizardPhase {
    /// Wizard entered; no input yet.
    Step0,
    /// Input was entered but the form cannot be completed; error panel shown.
    ErrorsShown,
    /// Recipient selection step is active.
    RecipientSelection {
        /// Recipient chosen but not yet confirmed by advancing.
        selected: Option<RecipientId>,
    },
    /// Recipient confirmed; final submit is permitted.
    ReadyToSubmit {
        /// Confirmed recipient.
        recipient: RecipientId,
    },
    /// Submission completed; the wizard is closed.
    Submitted,
    /// Wizard abandoned; the wizard is closed.
    Abandoned,
}

impl WizardPhase {
    /// Returns a stable label.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Step0 => "step_0",
            Self::ErrorsShown => "errors_shown",
            Self::RecipientSelection {
                ..
            } => "recipient_selection",
            Self::ReadyToSubmit {
                ..
            } => "ready_to_submit",
            Self::Submitted => "submitted",
            Self::Abandoned => "abandoned",
        }
    }

    /// Returns true once the wizard has been submitted or abandoned.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        matches!(self, Self::Submitted | Self::Abandoned)
    }
}

impl fmt::Display for WizardPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Observable wizard state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WizardState {
    /// Active step, absent once the wizard is closed.
    pub active_step: Option<WizardStep>,
    /// Whether the validation error panel is visible.
    pub errors_visible: bool,
    /// Whether the final submit action is enabled.
    pub submit_enabled: bool,
}

// ============================================================================
// SECTION: Identifiers
// ============================================================================

/// Selectable recipient identifier (for example `receiver-0`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipientId(String);

impl RecipientId {
    /// Creates a recipient identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecipientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for RecipientId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Errors raised when a field identifier is malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldIdError {
    /// Identifier does not follow `step-<n>-field-<row>-<col>-input-<k>`.
    #[error("field id {0} is not of the form step-<n>-field-<row>-<col>-input-<k>")]
    Malformed(String),
}

/// Questionnaire field identifier (`step-<n>-field-<row>-<col>-input-<k>`).
///
/// # Invariants
/// - The textual form always parses; the step index is cached.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct FieldId {
    /// Canonical textual form.
    raw: String,
    /// Step index parsed from the identifier.
    #[serde(skip)]
    step: u32,
}

impl FieldId {
    /// Parses a field identifier.
    ///
    /// # Errors
    ///
    /// Returns [`FieldIdError::Malformed`] when the identifier does not match
    /// the expected shape.
    pub fn parse(raw: &str) -> Result<Self, FieldIdError> {
        let malformed = || FieldIdError::Malformed(raw.to_string());
        let parts: Vec<&str> = raw.split('-').collect();
        let [step_kw, step, field_kw, row, col, input_kw, input] = parts.as_slice() else {
            return Err(malformed());
        };
        if *step_kw != "step" || *field_kw != "field" || *input_kw != "input" {
            return Err(malformed());
        }
        let step = parse_index(step).ok_or_else(malformed)?;
        for part in [row, col, input] {
            parse_index(part).ok_or_else(malformed)?;
        }
        Ok(Self {
            raw: raw.to_string(),
            step,
        })
    }

    /// Returns the step index encoded in the identifier.
    #[must_use]
    pub const fn step_index(&self) -> u32 {
        self.step
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.raw.fmt(f)
    }
}

/// Parses a decimal index with no sign or leading zeros.
fn parse_index(value: &str) -> Option<u32> {
    if value.is_empty() || !value.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    if value.len() > 1 && value.starts_with('0') {
        return None;
    }
    value.parse().ok()
}

// ============================================================================
// SECTION: Operations and Journal
// ============================================================================

/// Gate operation names recorded in the transition journal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum GateOperation {
    /// Step navigation link activated.
    OpenStep {
        /// Requested step.
        step: WizardStep,
    },
    /// Field input.
    EnterField {
        /// Field written.
        field: FieldId,
    },
    /// Error panel recovery action.
    DismissErrorPanel,
    /// Recipient chosen.
    SelectRecipient {
        /// Chosen recipient.
        recipient: RecipientId,
    },
    /// Next-step action.
    AdvanceStep,
    /// Final submission.
    Submit,
    /// Wizard abandoned.
    Abandon,
}

impl GateOperation {
    /// Returns a stable label.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OpenStep {
                ..
            } => "open_step",
            Self::EnterField {
                ..
            } => "enter_field",
            Self::DismissErrorPanel => "dismiss_error_panel",
            Self::SelectRecipient {
                ..
            } => "select_recipient",
            Self::AdvanceStep => "advance_step",
            Self::Submit => "submit",
            Self::Abandon => "abandon",
        }
    }
}

/// Accepted transition captured for audit output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransitionRecord {
    /// Phase label before the operation.
    pub from: &'static str,
    /// Phase label after the operation.
    pub to: &'static str,
    /// Operation applied.
    pub operation: GateOperation,
}

/// Receipt produced by a successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionReceipt {
    /// Recipient the submission was addressed to.
    pub recipient: RecipientId,
    /// Field values entered during the wizard, keyed by field id.
    pub fields: BTreeMap<String, String>,
}

// ============================================================================
// SECTION: Precondition Violations
// ============================================================================

/// Workflow operation invoked in a state that forbids it.
///
/// # Invariants
/// - Returning a violation never changes gate state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PreconditionViolation {
    /// Operation targets a step that is not active.
    #[error("{operation} requires step {required} but {phase} is active")]
    StepNotActive {
        /// Operation label.
        operation: &'static str,
        /// Step the operation needs.
        required: WizardStep,
        /// Current phase label.
        phase: &'static str,
    },
    /// Field belongs to a different step than the one named.
    #[error("field {field} does not belong to step {step}")]
    FieldStepMismatch {
        /// Field identifier.
        field: String,
        /// Step named by the caller.
        step: WizardStep,
    },
    /// Field value is empty after trimming.
    #[error("field {field} requires a non-empty value")]
    EmptyFieldValue {
        /// Field identifier.
        field: String,
    },
    /// Error panel recovery invoked while no errors are visible.
    #[error("error panel is not visible in phase {phase}")]
    ErrorPanelNotVisible {
        /// Current phase label.
        phase: &'static str,
    },
    /// Recipient is not on the roster.
    #[error("recipient {recipient} is not selectable")]
    UnknownRecipient {
        /// Requested recipient.
        recipient: String,
    },
    /// Step cannot be completed yet.
    #[error("step {step} is incomplete: {reason}")]
    StepIncomplete {
        /// Step that cannot be left.
        step: WizardStep,
        /// Missing precondition.
        reason: &'static str,
    },
    /// Advance invoked on the final step.
    #[error("no step follows the current phase {phase}")]
    NoNextStep {
        /// Current phase label.
        phase: &'static str,
    },
    /// Submit invoked before submission is enabled.
    #[error("submission is not enabled in phase {phase}")]
    SubmissionNotEnabled {
        /// Current phase label.
        phase: &'static str,
    },
    /// Any operation after submission or abandonment.
    #[error("wizard is closed ({phase})")]
    WizardClosed {
        /// Terminal phase label.
        phase: &'static str,
    },
}
