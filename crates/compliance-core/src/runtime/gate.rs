// crates/compliance-core/src/runtime/gate.rs
// ============================================================================
// Module: Submission Gate
// Description: Explicit state machine for the submission wizard.
// Purpose: Enforce that final submission requires a confirmed recipient.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! The gate models the wizard as named phases with guarded transitions:
//!
//! ```text
//! Step0 --enter_field--> ErrorsShown --dismiss_error_panel--> RecipientSelection
//! RecipientSelection --select_recipient + advance_step--> ReadyToSubmit
//! ReadyToSubmit --submit--> Submitted
//! ```
//!
//! Selecting a recipient alone never enables submission; the step must also
//! be advanced. Operations that the current phase forbids return a
//! [`PreconditionViolation`] and leave the gate untouched.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use crate::core::FieldId;
use crate::core::GateOperation;
use crate::core::PreconditionViolation;
use crate::core::RecipientId;
use crate::core::SubmissionReceipt;
use crate::core::TransitionRecord;
use crate::core::WizardPhase;
use crate::core::WizardState;
use crate::core::WizardStep;

// ============================================================================
// SECTION: Gate
// ============================================================================

/// Submission wizard state machine.
///
/// # Invariants
/// - `can_submit` is true only in [`WizardPhase::ReadyToSubmit`].
/// - A rejected operation leaves phase, fields, and journal unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionGate {
    /// Current phase.
    phase: WizardPhase,
    /// Recipients that may be selected.
    roster: Vec<RecipientId>,
    /// Field values entered so far.
    fields: BTreeMap<FieldId, String>,
    /// Accepted transitions.
    journal: Vec<TransitionRecord>,
}

impl SubmissionGate {
    /// Enters the wizard with the given selectable recipients.
    #[must_use]
    pub fn new(roster: impl IntoIterator<Item = RecipientId>) -> Self {
        Self {
            phase: WizardPhase::Step0,
            roster: roster.into_iter().collect(),
            fields: BTreeMap::new(),
            journal: Vec::new(),
        }
    }

    /// Returns the current phase.
    #[must_use]
    pub const fn phase(&self) -> &WizardPhase {
        &self.phase
    }

    /// Returns the selectable recipients.
    #[must_use]
    pub fn roster(&self) -> &[RecipientId] {
        &self.roster
    }

    /// Returns the value entered for a field.
    #[must_use]
    pub fn field(&self, field: &FieldId) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Returns accepted transitions in order.
    #[must_use]
    pub fn journal(&self) -> &[TransitionRecord] {
        &self.journal
    }

    /// Returns the observable wizard state.
    #[must_use]
    pub const fn state(&self) -> WizardState {
        let active_step = match &self.phase {
            WizardPhase::Step0 | WizardPhase::ErrorsShown => Some(WizardStep::Step0),
            WizardPhase::RecipientSelection {
                ..
            }
            | WizardPhase::ReadyToSubmit {
                ..
            } => Some(WizardStep::RecipientSelection),
            WizardPhase::Submitted | WizardPhase::Abandoned => None,
        };
        WizardState {
            active_step,
            errors_visible: matches!(self.phase, WizardPhase::ErrorsShown),
            submit_enabled: self.can_submit(),
        }
    }

    /// Returns true only when final submission is permitted.
    #[must_use]
    pub const fn can_submit(&self) -> bool {
        matches!(self.phase, WizardPhase::ReadyToSubmit { .. })
    }

    /// Focuses a step through its navigation link.
    ///
    /// The wizard is linear, so only the active step may be focused.
    ///
    /// # Errors
    ///
    /// Returns [`PreconditionViolation`] when the step is not active or the
    /// wizard is closed.
    pub fn open_step(&mut self, step: WizardStep) -> Result<(), PreconditionViolation> {
        self.ensure_open()?;
        let operation = GateOperation::OpenStep {
            step,
        };
        if self.state().active_step != Some(step) {
            return Err(self.step_not_active(&operation, step));
        }
        let next = self.phase.clone();
        self.commit(operation, next);
        Ok(())
    }

    /// Records input for a questionnaire field.
    ///
    /// Entering a value while no recipient is confirmed leaves the form
    /// incomplete, so the error panel is shown.
    ///
    /// # Errors
    ///
    /// Returns [`PreconditionViolation`] when the step is not active, the
    /// field belongs to another step, the value is blank, or the wizard is
    /// closed.
    pub fn enter_field(
        &mut self,
        step: WizardStep,
        field: FieldId,
        value: &str,
    ) -> Result<(), PreconditionViolation> {
        self.ensure_open()?;
        if step.index() != Some(field.step_index()) {
            return Err(PreconditionViolation::FieldStepMismatch {
                field: field.to_string(),
                step,
            });
        }
        let operation = GateOperation::EnterField {
            field: field.clone(),
        };
        if self.state().active_step != Some(step) {
            return Err(self.step_not_active(&operation, step));
        }
        if value.trim().is_empty() {
            return Err(PreconditionViolation::EmptyFieldValue {
                field: field.to_string(),
            });
        }
        self.fields.insert(field, value.to_string());
        self.commit(operation, WizardPhase::ErrorsShown);
        Ok(())
    }

    /// Follows the error panel's recovery link to recipient selection.
    ///
    /// # Errors
    ///
    /// Returns [`PreconditionViolation`] when the panel is not visible.
    pub fn dismiss_error_panel(&mut self) -> Result<(), PreconditionViolation> {
        self.ensure_open()?;
        if self.phase != WizardPhase::ErrorsShown {
            return Err(PreconditionViolation::ErrorPanelNotVisible {
                phase: self.phase.as_str(),
            });
        }
        self.commit(
            GateOperation::DismissErrorPanel,
            WizardPhase::RecipientSelection {
                selected: None,
            },
        );
        Ok(())
    }

    /// Chooses a recipient on the recipient selection step.
    ///
    /// # Errors
    ///
    /// Returns [`PreconditionViolation`] when recipient selection is not the
    /// pending step or the recipient is not on the roster.
    pub fn select_recipient(&mut self, recipient: RecipientId) -> Result<(), PreconditionViolation> {
        self.ensure_open()?;
        let operation = GateOperation::SelectRecipient {
            recipient: recipient.clone(),
        };
        if !matches!(self.phase, WizardPhase::RecipientSelection { .. }) {
            return Err(self.step_not_active(&operation, WizardStep::RecipientSelection));
        }
        if !self.roster.contains(&recipient) {
            return Err(PreconditionViolation::UnknownRecipient {
                recipient: recipient.to_string(),
            });
        }
        self.commit(
            operation,
            WizardPhase::RecipientSelection {
                selected: Some(recipient),
            },
        );
        Ok(())
    }

    /// Completes the active step and moves forward.
    ///
    /// # Errors
    ///
    /// Returns [`PreconditionViolation`] when the active step is incomplete or
    /// no step follows.
    pub fn advance_step(&mut self) -> Result<(), PreconditionViolation> {
        self.ensure_open()?;
        let next = match &self.phase {
            WizardPhase::Step0 | WizardPhase::ErrorsShown => {
                return Err(PreconditionViolation::StepIncomplete {
                    step: WizardStep::Step0,
                    reason: "no recipient selected",
                });
            }
            WizardPhase::RecipientSelection {
                selected: None,
            } => {
                return Err(PreconditionViolation::StepIncomplete {
                    step: WizardStep::RecipientSelection,
                    reason: "no recipient selected",
                });
            }
            WizardPhase::RecipientSelection {
                selected: Some(recipient),
            } => WizardPhase::ReadyToSubmit {
                recipient: recipient.clone(),
            },
            WizardPhase::ReadyToSubmit {
                ..
            }
            | WizardPhase::Submitted
            | WizardPhase::Abandoned => {
                return Err(PreconditionViolation::NoNextStep {
                    phase: self.phase.as_str(),
                });
            }
        };
        self.commit(GateOperation::AdvanceStep, next);
        Ok(())
    }

    /// Submits the wizard and closes it.
    ///
    /// # Errors
    ///
    /// Returns [`PreconditionViolation::SubmissionNotEnabled`] unless the gate
    /// is ready to submit.
    pub fn submit(&mut self) -> Result<SubmissionReceipt, PreconditionViolation> {
        self.ensure_open()?;
        let WizardPhase::ReadyToSubmit {
            recipient,
        } = &self.phase
        else {
            return Err(PreconditionViolation::SubmissionNotEnabled {
                phase: self.phase.as_str(),
            });
        };
        let receipt = SubmissionReceipt {
            recipient: recipient.clone(),
            fields: self
                .fields
                .iter()
                .map(|(field, value)| (field.to_string(), value.clone()))
                .collect(),
        };
        self.commit(GateOperation::Submit, WizardPhase::Submitted);
        Ok(receipt)
    }

    /// Abandons the wizard.
    ///
    /// # Errors
    ///
    /// Returns [`PreconditionViolation::WizardClosed`] when already closed.
    pub fn abandon(&mut self) -> Result<(), PreconditionViolation> {
        self.ensure_open()?;
        self.commit(GateOperation::Abandon, WizardPhase::Abandoned);
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Internal helpers
    // ------------------------------------------------------------------------

    /// Rejects operations on a closed wizard.
    fn ensure_open(&self) -> Result<(), PreconditionViolation> {
        if self.phase.is_closed() {
            return Err(PreconditionViolation::WizardClosed {
                phase: self.phase.as_str(),
            });
        }
        Ok(())
    }

    /// Builds a step-not-active violation for the current phase.
    fn step_not_active(
        &self,
        operation: &GateOperation,
        required: WizardStep,
    ) -> PreconditionViolation {
        PreconditionViolation::StepNotActive {
            operation: operation.as_str(),
            required,
            phase: self.phase.as_str(),
        }
    }

    /// Applies a transition and journals it.
    fn commit(&mut self, operation: GateOperation, next: WizardPhase) {
        let from = self.phase.as_str();
        self.phase = next;
        self.journal.push(TransitionRecord {
            from,
            to: self.phase.as_str(),
            operation,
        });
    }
}
