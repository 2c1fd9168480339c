// crates/compliance-core/src/runtime/matrix.rs
// ============================================================================
// Module: Compliance Matrix
// Description: Path classification and expected outcome derivation.
// Purpose: Derive the expected status and content type for every (resource, verb) pair.
// Dependencies: crate::core, serde
// ============================================================================

//! ## Overview
//! Expected outcomes are a pure function of a descriptor and a verb. Routing
//! rejects malformed paths before any method check, so a malformed path is a
//! 404 for every verb; a valid path answers GET/DELETE with its declared
//! contract and refuses POST/PUT with 405.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::ContentTypeExpectation;
use crate::core::ResourceDescriptor;
use crate::core::Verb;
use crate::core::VerbOutcome;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Content type served with routing-level error pages.
pub const HTML_ERROR_CONTENT_TYPE: &str = "text/html; charset=UTF-8";
/// Status for paths the router cannot resolve.
pub const STATUS_NOT_FOUND: u16 = 404;
/// Status for verbs a resource does not accept.
pub const STATUS_METHOD_NOT_ALLOWED: u16 = 405;
/// Characters the routing layer rejects by default.
pub const DEFAULT_REJECTED_PATH_CHARS: &str = "@";

// ============================================================================
// SECTION: Path Classification
// ============================================================================

/// Routing classification of a catalog path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PathClass {
    /// Maps to a real resource, including the catch-all not-found page.
    Valid,
    /// Rejected by the router before method dispatch.
    Malformed,
}

/// Classifies paths the way the routing layer does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathClassifier {
    /// Characters that make a path malformed.
    rejected: Vec<char>,
}

impl PathClassifier {
    /// Creates a classifier rejecting the given characters.
    #[must_use]
    pub fn new(rejected: impl IntoIterator<Item = char>) -> Self {
        let mut rejected: Vec<char> = rejected.into_iter().collect();
        rejected.sort_unstable();
        rejected.dedup();
        Self {
            rejected,
        }
    }

    /// Returns the rejected character set.
    #[must_use]
    pub fn rejected(&self) -> &[char] {
        &self.rejected
    }

    /// Classifies a request path.
    #[must_use]
    pub fn classify(&self, path: &str) -> PathClass {
        if !path.starts_with('/') {
            return PathClass::Malformed;
        }
        let malformed = path.chars().any(|ch| {
            ch.is_ascii_control() || ch.is_whitespace() || self.rejected.contains(&ch)
        });
        if malformed { PathClass::Malformed } else { PathClass::Valid }
    }
}

impl Default for PathClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_REJECTED_PATH_CHARS.chars())
    }
}

// ============================================================================
// SECTION: Matrix Policy
// ============================================================================

/// Expected behaviour of DELETE on a valid path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletePolicy {
    /// DELETE answers like GET with the declared contract.
    #[default]
    MirrorGet,
    /// DELETE is refused with 405.
    MethodNotAllowed,
}

/// Routing assumptions used to derive expected outcomes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatrixPolicy {
    /// Path classifier.
    pub classifier: PathClassifier,
    /// DELETE behaviour on valid paths.
    pub delete: DeletePolicy,
}

impl MatrixPolicy {
    /// Derives the expected outcome for a descriptor and verb.
    #[must_use]
    pub fn evaluate(&self, descriptor: &ResourceDescriptor, verb: Verb) -> VerbOutcome {
        if self.classifier.classify(&descriptor.path) == PathClass::Malformed {
            return VerbOutcome {
                expected_status: STATUS_NOT_FOUND,
                expected_content_type: ContentTypeExpectation::Exact(
                    HTML_ERROR_CONTENT_TYPE.to_string(),
                ),
            };
        }
        match (verb, self.delete) {
            (Verb::Get, _) | (Verb::Delete, DeletePolicy::MirrorGet) => VerbOutcome {
                expected_status: descriptor.expected_success_status,
                expected_content_type: ContentTypeExpectation::Exact(
                    descriptor.expected_content_type.clone(),
                ),
            },
            (Verb::Post | Verb::Put, _) | (Verb::Delete, DeletePolicy::MethodNotAllowed) => {
                VerbOutcome {
                    expected_status: STATUS_METHOD_NOT_ALLOWED,
                    expected_content_type: ContentTypeExpectation::Unconstrained,
                }
            }
        }
    }

    /// Expands a catalog into every (resource, verb) check in matrix order.
    #[must_use]
    pub fn plan(&self, catalog: &[ResourceDescriptor]) -> Vec<PlannedCheck> {
        catalog
            .iter()
            .flat_map(|descriptor| {
                Verb::ALL.into_iter().map(move |verb| PlannedCheck {
                    descriptor: descriptor.clone(),
                    verb,
                    expected: self.evaluate(descriptor, verb),
                })
            })
            .collect()
    }
}

/// One planned exchange with its expected outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedCheck {
    /// Resource under test.
    pub descriptor: ResourceDescriptor,
    /// Verb to issue.
    pub verb: Verb,
    /// Expected outcome.
    pub expected: VerbOutcome,
}

// ============================================================================
// SECTION: Free Functions
// ============================================================================

/// Derives the expected outcome under the default routing policy.
#[must_use]
pub fn evaluate(descriptor: &ResourceDescriptor, verb: Verb) -> VerbOutcome {
    MatrixPolicy::default().evaluate(descriptor, verb)
}

/// Expands a catalog under the default routing policy.
#[must_use]
pub fn plan(catalog: &[ResourceDescriptor]) -> Vec<PlannedCheck> {
    MatrixPolicy::default().plan(catalog)
}
