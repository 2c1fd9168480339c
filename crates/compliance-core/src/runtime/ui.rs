// crates/compliance-core/src/runtime/ui.rs
// ============================================================================
// Module: Wizard UI Adapter
// Description: Maps stable element identifiers onto gate operations.
// Purpose: Let UI-level scripts drive the submission gate.
// Dependencies: crate::{core, runtime::gate}, thiserror
// ============================================================================

//! ## Overview
//! The wizard's element identifiers are its public contract surface. The
//! adapter resolves each identifier to an [`ElementId`], forwards clicks and
//! key input to [`SubmissionGate`], and answers visibility/enabled queries
//! from the gate's observable state. It holds no state of its own beyond the
//! last submission receipt.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use thiserror::Error;

use crate::core::FieldId;
use crate::core::PreconditionViolation;
use crate::core::RecipientId;
use crate::core::SubmissionReceipt;
use crate::core::WizardPhase;
use crate::core::WizardStep;
use crate::runtime::gate::SubmissionGate;

// ============================================================================
// SECTION: Element Identifiers
// ============================================================================

/// Wizard container.
const SUBMISSION_FORM: &str = "submissionForm";
/// Step 0 navigation link.
const STEP_0_LINK: &str = "step-0-link";
/// Validation error panel.
const SUBMISSION_ERRORS: &str = "SubmissionErrors";
/// Error panel recovery link.
const ERROR_PANEL_LINK: &str = "#SubmissionErrors span.err-link";
/// Next-step button.
const NEXT_STEP_BUTTON: &str = "NextStepButton";
/// Final submit button.
const SUBMIT_BUTTON: &str = "SubmitButton";
/// Prefix of recipient checkboxes.
const RECIPIENT_PREFIX: &str = "receiver-";

/// Addressable wizard element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementId {
    /// `submissionForm`.
    SubmissionForm,
    /// `step-0-link`.
    StepLink(WizardStep),
    /// `step-<n>-field-<row>-<col>-input-<k>`.
    Field(FieldId),
    /// `SubmissionErrors`.
    SubmissionErrors,
    /// `#SubmissionErrors span.err-link`.
    ErrorPanelLink,
    /// `receiver-<n>`.
    Recipient(RecipientId),
    /// `NextStepButton`.
    NextStepButton,
    /// `SubmitButton`.
    SubmitButton,
}

impl ElementId {
    /// Resolves an element identifier.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::UnknownElement`] when the identifier is not part of
    /// the wizard surface.
    pub fn parse(raw: &str) -> Result<Self, UiError> {
        let element = match raw {
            SUBMISSION_FORM => Self::SubmissionForm,
            STEP_0_LINK => Self::StepLink(WizardStep::Step0),
            SUBMISSION_ERRORS => Self::SubmissionErrors,
            ERROR_PANEL_LINK => Self::ErrorPanelLink,
            NEXT_STEP_BUTTON => Self::NextStepButton,
            SUBMIT_BUTTON => Self::SubmitButton,
            _ => {
                if let Some(index) = raw.strip_prefix(RECIPIENT_PREFIX)
                    && !index.is_empty()
                    && index.bytes().all(|byte| byte.is_ascii_digit())
                {
                    Self::Recipient(RecipientId::new(raw))
                } else if raw.starts_with("step-") {
                    FieldId::parse(raw)
                        .map(Self::Field)
                        .map_err(|_| UiError::UnknownElement(raw.to_string()))?
                } else {
                    return Err(UiError::UnknownElement(raw.to_string()));
                }
            }
        };
        Ok(element)
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SubmissionForm => f.write_str(SUBMISSION_FORM),
            Self::StepLink(step) => match step.index() {
                Some(index) => write!(f, "step-{index}-link"),
                None => write!(f, "step-{step}-link"),
            },
            Self::Field(field) => field.fmt(f),
            Self::SubmissionErrors => f.write_str(SUBMISSION_ERRORS),
            Self::ErrorPanelLink => f.write_str(ERROR_PANEL_LINK),
            Self::Recipient(recipient) => recipient.fmt(f),
            Self::NextStepButton => f.write_str(NEXT_STEP_BUTTON),
            Self::SubmitButton => f.write_str(SUBMIT_BUTTON),
        }
    }
}

// ============================================================================
// SECTION: Actions and Errors
// ============================================================================

/// User action on an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    /// Mouse click.
    Click,
    /// Keyboard input.
    SendKeys(String),
}

impl UiAction {
    /// Returns a stable label.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::SendKeys(_) => "send_keys",
        }
    }
}

/// Errors raised by the UI adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UiError {
    /// Identifier is not part of the wizard surface.
    #[error("unknown element {0}")]
    UnknownElement(String),
    /// Element does not accept the action.
    #[error("element {element} does not accept {action}")]
    UnsupportedAction {
        /// Element identifier.
        element: String,
        /// Action label.
        action: &'static str,
    },
    /// Gate rejected the mapped operation.
    #[error(transparent)]
    Precondition(#[from] PreconditionViolation),
}

// ============================================================================
// SECTION: Adapter
// ============================================================================

/// Thin driver translating element actions into gate operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiAdapter {
    /// Driven gate.
    gate: SubmissionGate,
    /// Receipt of the last successful submission.
    receipt: Option<SubmissionReceipt>,
}

impl UiAdapter {
    /// Wraps a gate.
    #[must_use]
    pub const fn new(gate: SubmissionGate) -> Self {
        Self {
            gate,
            receipt: None,
        }
    }

    /// Returns the driven gate.
    #[must_use]
    pub const fn gate(&self) -> &SubmissionGate {
        &self.gate
    }

    /// Returns the submission receipt once the wizard was submitted.
    #[must_use]
    pub const fn receipt(&self) -> Option<&SubmissionReceipt> {
        self.receipt.as_ref()
    }

    /// Consumes the adapter and returns the gate.
    #[must_use]
    pub fn into_gate(self) -> SubmissionGate {
        self.gate
    }

    /// Performs an action on an element.
    ///
    /// Clicks on passive elements (the form, the panel, a field) are accepted
    /// without changing state.
    ///
    /// # Errors
    ///
    /// Returns [`UiError`] when the element does not accept the action or the
    /// gate rejects the mapped operation.
    pub fn perform(&mut self, element: &ElementId, action: &UiAction) -> Result<(), UiError> {
        match (element, action) {
            (ElementId::StepLink(step), UiAction::Click) => self.gate.open_step(*step)?,
            (ElementId::ErrorPanelLink, UiAction::Click) => self.gate.dismiss_error_panel()?,
            (ElementId::Recipient(recipient), UiAction::Click) => {
                self.gate.select_recipient(recipient.clone())?;
            }
            (ElementId::NextStepButton, UiAction::Click) => self.gate.advance_step()?,
            (ElementId::SubmitButton, UiAction::Click) => {
                self.receipt = Some(self.gate.submit()?);
            }
            (ElementId::Field(field), UiAction::SendKeys(text)) => {
                let step = self.gate.state().active_step.unwrap_or(WizardStep::Step0);
                self.gate.enter_field(step, field.clone(), text)?;
            }
            (
                ElementId::SubmissionForm | ElementId::SubmissionErrors | ElementId::Field(_),
                UiAction::Click,
            ) => {}
            (_, UiAction::SendKeys(_)) => {
                return Err(UiError::UnsupportedAction {
                    element: element.to_string(),
                    action: action.as_str(),
                });
            }
        }
        Ok(())
    }

    /// Returns true when the element is displayed.
    #[must_use]
    pub fn is_visible(&self, element: &ElementId) -> bool {
        let state = self.gate.state();
        let Some(active) = state.active_step else {
            return false;
        };
        match element {
            ElementId::SubmissionForm
            | ElementId::NextStepButton
            | ElementId::SubmitButton
            | ElementId::StepLink(_) => true,
            ElementId::Field(field) => active.index() == Some(field.step_index()),
            ElementId::SubmissionErrors | ElementId::ErrorPanelLink => state.errors_visible,
            ElementId::Recipient(recipient) => {
                matches!(
                    self.gate.phase(),
                    WizardPhase::RecipientSelection { .. } | WizardPhase::ReadyToSubmit { .. }
                ) && self.gate.roster().contains(recipient)
            }
        }
    }

    /// Returns true when the element accepts interaction.
    #[must_use]
    pub fn is_enabled(&self, element: &ElementId) -> bool {
        match element {
            ElementId::SubmitButton => self.gate.can_submit(),
            ElementId::NextStepButton => {
                self.is_visible(element)
                    && !matches!(self.gate.phase(), WizardPhase::ReadyToSubmit { .. })
            }
            _ => self.is_visible(element),
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::ElementId;
    use super::UiError;

    #[test]
    fn element_ids_round_trip_through_display() {
        for raw in [
            "submissionForm",
            "step-0-link",
            "step-0-field-0-0-input-0",
            "SubmissionErrors",
            "#SubmissionErrors span.err-link",
            "receiver-0",
            "receiver-12",
            "NextStepButton",
            "SubmitButton",
        ] {
            let element = ElementId::parse(raw);
            assert_eq!(element.map(|element| element.to_string()), Ok(raw.to_string()));
        }
    }

    #[test]
    fn unknown_elements_are_rejected() {
        for raw in ["", "receiver-", "receiver-x", "step-1-link", "step-0-field-0", "submit"] {
            assert_eq!(ElementId::parse(raw), Err(UiError::UnknownElement(raw.to_string())));
        }
    }
}
