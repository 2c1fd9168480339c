// crates/compliance-core/src/core/headers.rs
// ============================================================================
// Module: Security Header Contract
// Description: Fixed security header names and literal values.
// Purpose: Hold the single immutable header expectation table.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Every response from the service under test must carry these headers with
//! these exact values, whatever the verb, path, or status. Names are matched
//! case-insensitively by the comparator; values are matched byte for byte.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;

// ============================================================================
// SECTION: Header Table
// ============================================================================

/// Required security header entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SecurityHeader {
    /// Header name as documented (compared case-insensitively).
    pub name: &'static str,
    /// Required literal value.
    pub value: &'static str,
}

impl SecurityHeader {
    /// Creates a header entry.
    #[must_use]
    pub const fn new(name: &'static str, value: &'static str) -> Self {
        Self {
            name,
            value,
        }
    }
}

/// Header contract asserted on every public response.
pub const SECURITY_HEADERS: &[SecurityHeader] = &[
    SecurityHeader::new("X-XSS-Protection", "1; mode=block"),
    SecurityHeader::new("X-Content-Type-Options", "nosniff"),
    SecurityHeader::new("Expires", "-1"),
    SecurityHeader::new("Server", "globaleaks"),
    SecurityHeader::new("Pragma", "no-cache"),
    SecurityHeader::new("Cache-control", "no-cache, no-store, must-revalidate"),
    SecurityHeader::new("Referrer-Policy", "no-referrer"),
    SecurityHeader::new("X-Frame-Options", "sameorigin"),
];

// ============================================================================
// SECTION: Header Set
// ============================================================================

/// Immutable view over a header contract table.
///
/// # Invariants
/// - Entries keep their declaration order; comparator output follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecurityHeaderSet {
    /// Backing header table.
    entries: &'static [SecurityHeader],
}

impl SecurityHeaderSet {
    /// Returns the standard eight-entry contract.
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            entries: SECURITY_HEADERS,
        }
    }

    /// Returns the header entries in declaration order.
    #[must_use]
    pub const fn entries(&self) -> &'static [SecurityHeader] {
        self.entries
    }

    /// Returns the number of required headers.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no headers are required.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up the required value for a header name, ignoring ASCII case.
    #[must_use]
    pub fn required_value(&self, name: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|entry| entry.name.eq_ignore_ascii_case(name))
            .map(|entry| entry.value)
    }
}

impl Default for SecurityHeaderSet {
    fn default() -> Self {
        Self::standard()
    }
}
