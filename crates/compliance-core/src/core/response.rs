// crates/compliance-core/src/core/response.rs
// ============================================================================
// Module: Observed Responses
// Description: Transport-neutral record of a received HTTP response.
// Purpose: Give the comparator a uniform view of status, headers, and body.
// Dependencies: std
// ============================================================================

//! ## Overview
//! The transport collaborator converts whatever it received into an
//! [`ObservedResponse`]. Header names are matched ignoring ASCII case and
//! repeated names fold into one comma-joined value, matching HTTP list
//! semantics, so a duplicated header never equals its single literal value.

// ============================================================================
// SECTION: Headers
// ============================================================================

/// Ordered response header list with case-insensitive lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservedHeaders {
    /// Header entries in arrival order.
    entries: Vec<(String, String)>,
}

impl ObservedHeaders {
    /// Creates an empty header list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends a header entry, keeping earlier entries with the same name.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    /// Returns the folded value for a header name, ignoring ASCII case.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<String> {
        let mut values = self
            .entries
            .iter()
            .filter(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str());
        let first = values.next()?;
        let mut folded = first.to_string();
        for value in values {
            folded.push_str(", ");
            folded.push_str(value);
        }
        Some(folded)
    }

    /// Returns the number of raw entries.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no headers were received.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over raw entries in arrival order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for ObservedHeaders
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Self::new();
        for (name, value) in iter {
            headers.append(name, value);
        }
        headers
    }
}

// ============================================================================
// SECTION: Response
// ============================================================================

/// Response record supplied by the transport collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservedResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: ObservedHeaders,
    /// Raw response body.
    pub body: Vec<u8>,
    /// Content type declared by the response, if any.
    pub declared_content_type: Option<String>,
}

impl ObservedResponse {
    /// Builds a response record, deriving the declared content type from the
    /// `Content-Type` header.
    #[must_use]
    pub fn new(status: u16, headers: ObservedHeaders, body: Vec<u8>) -> Self {
        let declared_content_type = headers.get("content-type");
        Self {
            status,
            headers,
            body,
            declared_content_type,
        }
    }
}
