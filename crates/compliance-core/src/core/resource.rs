// crates/compliance-core/src/core/resource.rs
// ============================================================================
// Module: Resource Descriptors
// Description: Catalog entries, HTTP verbs, and derived verb outcomes.
// Purpose: Describe what each public resource promises on success.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`ResourceDescriptor`] is one publicly routable endpoint together with
//! its success contract. [`VerbOutcome`] is never stored: it is derived from a
//! descriptor and a [`Verb`] by [`crate::runtime::evaluate`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Verbs
// ============================================================================

/// HTTP verbs exercised against every catalog resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verb {
    /// Non-mutating read.
    Get,
    /// Create.
    Post,
    /// Replace.
    Put,
    /// Remove.
    Delete,
}

impl Verb {
    /// All verbs in matrix order.
    pub const ALL: [Self; 4] = [Self::Get, Self::Post, Self::Put, Self::Delete];

    /// Returns the canonical method token.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Resource Descriptor
// ============================================================================

/// Publicly routable endpoint and its success contract.
///
/// # Invariants
/// - Immutable once placed in a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    /// Request path, including the leading slash.
    pub path: String,
    /// Content type served on success.
    pub expected_content_type: String,
    /// Status code served on success.
    pub expected_success_status: u16,
}

impl ResourceDescriptor {
    /// Creates a descriptor.
    #[must_use]
    pub fn new(
        path: impl Into<String>,
        expected_content_type: impl Into<String>,
        expected_success_status: u16,
    ) -> Self {
        Self {
            path: path.into(),
            expected_content_type: expected_content_type.into(),
            expected_success_status,
        }
    }

    /// Returns the catalog of public resources served by a stock deployment.
    #[must_use]
    pub fn default_catalog() -> Vec<Self> {
        vec![
            Self::new("/", "text/html", 200),
            Self::new("/index.html", "text/html", 200),
            Self::new("/public", "application/json", 200),
            Self::new("/unexistent", "text/html; charset=UTF-8", 404),
            Self::new("/@invalid@", "text/html; charset=UTF-8", 404),
        ]
    }

    /// Returns true when the declared content type is a JSON media type.
    #[must_use]
    pub fn declares_json(&self) -> bool {
        is_json_media_type(&self.expected_content_type)
    }
}

// ============================================================================
// SECTION: Verb Outcome
// ============================================================================

/// Content type expectation for a single exchange.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ContentTypeExpectation {
    /// Observed content type must equal this string exactly.
    Exact(String),
    /// Content type is not asserted for this exchange.
    Unconstrained,
}

impl ContentTypeExpectation {
    /// Returns the exact content type when constrained.
    #[must_use]
    pub fn as_exact(&self) -> Option<&str> {
        match self {
            Self::Exact(value) => Some(value),
            Self::Unconstrained => None,
        }
    }
}

/// Expected status and content type for one (resource, verb) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VerbOutcome {
    /// Expected HTTP status code.
    pub expected_status: u16,
    /// Expected content type.
    pub expected_content_type: ContentTypeExpectation,
}

impl VerbOutcome {
    /// Returns true when the expected body is a JSON document.
    #[must_use]
    pub fn expects_json(&self) -> bool {
        self.expected_content_type.as_exact().is_some_and(is_json_media_type)
    }
}

/// Returns true when a content type names a JSON media type.
fn is_json_media_type(content_type: &str) -> bool {
    let essence = content_type.split(';').next().unwrap_or_default().trim();
    essence.eq_ignore_ascii_case("application/json")
        || essence.to_ascii_lowercase().ends_with("+json")
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::is_json_media_type;

    #[test]
    fn json_media_type_ignores_parameters_and_case() {
        assert!(is_json_media_type("application/json"));
        assert!(is_json_media_type("Application/JSON; charset=utf-8"));
        assert!(is_json_media_type("application/problem+json"));
        assert!(!is_json_media_type("text/html; charset=UTF-8"));
        assert!(!is_json_media_type(""));
    }
}
