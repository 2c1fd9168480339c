// crates/compliance-core/src/runtime/scenario.rs
// ============================================================================
// Module: Workflow Scenarios
// Description: Scripted UI walks replayed against a fresh submission gate.
// Purpose: Express wizard expectations as data and judge them.
// Dependencies: crate::{core, runtime::{gate, ui}}, serde
// ============================================================================

//! ## Overview
//! A [`WorkflowScenario`] is an ordered list of element-level steps. Replay
//! stops at the first step that fails and reports its index and reason; a
//! rejected action counts as a failure, never as a crash.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::RecipientId;
use crate::core::TransitionRecord;
use crate::runtime::gate::SubmissionGate;
use crate::runtime::ui::ElementId;
use crate::runtime::ui::UiAction;
use crate::runtime::ui::UiAdapter;

// ============================================================================
// SECTION: Scenario Model
// ============================================================================

/// One scripted UI step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case", deny_unknown_fields)]
pub enum ScenarioStep {
    /// Click an element.
    Click {
        /// Element identifier.
        element: String,
    },
    /// Type text into an element.
    SendKeys {
        /// Element identifier.
        element: String,
        /// Text to type.
        text: String,
    },
    /// Assert element visibility.
    ExpectVisible {
        /// Element identifier.
        element: String,
        /// Expected visibility.
        #[serde(default = "default_true")]
        visible: bool,
    },
    /// Assert whether an element is enabled.
    ExpectEnabled {
        /// Element identifier.
        element: String,
        /// Expected enabled state.
        #[serde(default = "default_true")]
        enabled: bool,
    },
}

impl ScenarioStep {
    /// Returns the element the step addresses.
    #[must_use]
    pub fn element(&self) -> &str {
        match self {
            Self::Click {
                element,
            }
            | Self::SendKeys {
                element, ..
            }
            | Self::ExpectVisible {
                element, ..
            }
            | Self::ExpectEnabled {
                element, ..
            } => element,
        }
    }

    /// Returns a stable action label.
    #[must_use]
    pub const fn action(&self) -> &'static str {
        match self {
            Self::Click {
                ..
            } => "click",
            Self::SendKeys {
                ..
            } => "send_keys",
            Self::ExpectVisible {
                ..
            } => "expect_visible",
            Self::ExpectEnabled {
                ..
            } => "expect_enabled",
        }
    }
}

/// Serde default for boolean expectations.
const fn default_true() -> bool {
    true
}

/// Named, ordered UI script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkflowScenario {
    /// Scenario name.
    pub name: String,
    /// Steps in replay order.
    pub steps: Vec<ScenarioStep>,
}

impl WorkflowScenario {
    /// Built-in walk: submission stays blocked until a recipient is selected
    /// and the step is advanced.
    #[must_use]
    pub fn submission_blocked_until_recipient() -> Self {
        let click = |element: &str| ScenarioStep::Click {
            element: element.to_string(),
        };
        let expect_visible = |element: &str, visible: bool| ScenarioStep::ExpectVisible {
            element: element.to_string(),
            visible,
        };
        let expect_enabled = |element: &str, enabled: bool| ScenarioStep::ExpectEnabled {
            element: element.to_string(),
            enabled,
        };
        Self {
            name: "submission blocked until recipient selected".to_string(),
            steps: vec![
                expect_visible("submissionForm", true),
                click("step-0-link"),
                ScenarioStep::SendKeys {
                    element: "step-0-field-0-0-input-0".to_string(),
                    text: "err-panel test".to_string(),
                },
                expect_visible("SubmissionErrors", true),
                expect_enabled("SubmitButton", false),
                click("#SubmissionErrors span.err-link"),
                expect_visible("receiver-0", true),
                click("receiver-0"),
                expect_enabled("SubmitButton", false),
                click("NextStepButton"),
                expect_enabled("SubmitButton", true),
            ],
        }
    }

    /// Replays the scenario against a fresh gate.
    #[must_use]
    pub fn run(&self, roster: &[RecipientId]) -> ScenarioVerdict {
        let mut adapter = UiAdapter::new(SubmissionGate::new(roster.iter().cloned()));
        let failure = self
            .steps
            .iter()
            .enumerate()
            .find_map(|(index, step)| {
                apply_step(&mut adapter, step).err().map(|reason| ScenarioFailure {
                    step: index,
                    action: step.action(),
                    element: step.element().to_string(),
                    reason,
                })
            });
        ScenarioVerdict {
            scenario: self.name.clone(),
            final_phase: adapter.gate().phase().as_str(),
            transitions: adapter.gate().journal().to_vec(),
            failure,
        }
    }
}

/// Applies one step, describing the failure when it does not hold.
fn apply_step(adapter: &mut UiAdapter, step: &ScenarioStep) -> Result<(), String> {
    let element = ElementId::parse(step.element()).map_err(|err| err.to_string())?;
    match step {
        ScenarioStep::Click {
            ..
        } => adapter.perform(&element, &UiAction::Click).map_err(|err| err.to_string()),
        ScenarioStep::SendKeys {
            text, ..
        } => adapter
            .perform(&element, &UiAction::SendKeys(text.clone()))
            .map_err(|err| err.to_string()),
        ScenarioStep::ExpectVisible {
            visible, ..
        } => expect_flag("visible", *visible, adapter.is_visible(&element)),
        ScenarioStep::ExpectEnabled {
            enabled, ..
        } => expect_flag("enabled", *enabled, adapter.is_enabled(&element)),
    }
}

/// Compares an observed element flag with its expectation.
fn expect_flag(flag: &str, expected: bool, actual: bool) -> Result<(), String> {
    if expected == actual {
        Ok(())
    } else {
        Err(format!("expected {flag}={expected}, observed {flag}={actual}"))
    }
}

// ============================================================================
// SECTION: Scenario Verdicts
// ============================================================================

/// First failing step of a scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioFailure {
    /// Zero-based step index.
    pub step: usize,
    /// Action label of the failing step.
    pub action: &'static str,
    /// Element the step addressed.
    pub element: String,
    /// Failure reason.
    pub reason: String,
}

/// Result of replaying one scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioVerdict {
    /// Scenario name.
    pub scenario: String,
    /// Phase label when replay stopped.
    pub final_phase: &'static str,
    /// Accepted gate transitions.
    pub transitions: Vec<TransitionRecord>,
    /// First failing step, absent when every step held.
    pub failure: Option<ScenarioFailure>,
}

impl ScenarioVerdict {
    /// Returns true when every step held.
    #[must_use]
    pub const fn passed(&self) -> bool {
        self.failure.is_none()
    }
}
