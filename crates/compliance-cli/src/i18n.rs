// crates/compliance-cli/src/i18n.rs
// ============================================================================
// Module: Harness Message Catalog
// Description: Message catalog and translation utilities for the harness CLI.
// Purpose: Centralize user-facing strings for reports and errors.
// Dependencies: Standard library collections and formatting utilities.
// ============================================================================

//! ## Overview
//! Every line the harness prints to a human goes through the [`t!`](crate::t)
//! macro so wording stays consistent between the binary and report rendering.
//!
//! ## Invariants
//! - The catalog is initialized once and read-only thereafter.
//! - Missing keys fall back to the key itself.
//! - Placeholder substitutions apply in argument order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// SECTION: Types
// ============================================================================

/// A formatted message argument captured by the [`macro@crate::t`] macro.
#[derive(Clone)]
pub struct MessageArg {
    /// The placeholder name used in message templates (e.g., `"path"`).
    pub key: &'static str,
    /// The formatted string value to substitute for this placeholder.
    pub value: String,
}

impl MessageArg {
    /// Constructs a new [`MessageArg`] from a key and displayable value.
    pub fn new(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Static catalog entries.
const CATALOG_ITEMS: &[(&str, &str)] = &[
    ("main.version", "compliance-harness {version}"),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.stream.unknown", "output"),
    ("output.write_failed", "Failed to write to {stream}: {error}"),
    ("output.render_failed", "Failed to render {format} output: {error}"),
    ("config.load_failed", "Failed to load config: {error}"),
    ("config.env_failed", "Invalid environment override: {error}"),
    ("config.override_failed", "Invalid command-line override: {error}"),
    (
        "config.validate.ok",
        "Config valid: {resources} resources, {checks} planned checks, {scenarios} workflow \
         scenarios.",
    ),
    ("audit.open_failed", "Failed to open audit log {path}: {error}"),
    ("schema.load_failed", "Failed to load body schemas: {error}"),
    ("transport.build_failed", "Failed to build HTTP transport: {error}"),
    ("report.plan.header", "Planned checks: {count}"),
    ("report.plan.entry", "{verb} {path} -> {status} {content_type}"),
    ("report.plan.unconstrained", "(content type unconstrained)"),
    ("report.verdict.pass", "PASS {verb} {path} ({status})"),
    ("report.verdict.fail", "FAIL {verb} {path}: {violation}"),
    ("report.verdict.fail_more", "FAIL {verb} {path}: {violation} (+{more} more)"),
    ("report.verdict.inconclusive", "INCONCLUSIVE {verb} {path}: {failure}"),
    ("report.annotation", "  note: {label} ({detail})"),
    (
        "report.scenario.pass",
        "PASS scenario \"{name}\" (final phase {phase}, {transitions} transitions)",
    ),
    (
        "report.scenario.fail",
        "FAIL scenario \"{name}\" at step {step} ({action} {element}): {reason}",
    ),
    (
        "report.summary",
        "Summary: {status}; checks {checks}, passed {passed}, failed {failed}, inconclusive \
         {inconclusive}, schema not performed {schema}; scenarios {scenarios}, failed \
         {scenarios_failed}.",
    ),
];

// ============================================================================
// SECTION: Translation
// ============================================================================

/// Translates `key` using the English catalog while substituting `args`.
#[must_use]
pub fn translate(key: &str, args: Vec<MessageArg>) -> String {
    let template = catalog().get(key).copied().unwrap_or(key);
    if args.is_empty() {
        return template.to_string();
    }

    let mut result = template.to_string();
    for arg in args {
        let placeholder = format!("{{{}}}", arg.key);
        result = result.replace(&placeholder, &arg.value);
    }
    result
}

/// Returns the static English catalog.
fn catalog() -> &'static HashMap<&'static str, &'static str> {
    static CATALOG: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();

    CATALOG.get_or_init(|| CATALOG_ITEMS.iter().copied().collect())
}

// ============================================================================
// SECTION: Macro
// ============================================================================

/// Formats a localized message from a key and named arguments.
///
/// # Arguments
///
/// - `$key` must match a catalog entry.
/// - Named arguments are substituted into `{placeholder}` positions.
#[macro_export]
macro_rules! t {
    ($key:literal $(, $name:ident = $value:expr )* $(,)?) => {{
        let args = ::std::vec![
            $(
                $crate::i18n::MessageArg::new(stringify!($name), $value.to_string()),
            )*
        ];
        $crate::i18n::translate($key, args)
    }};
}

// ============================================================================
// SECTION: Tests
// ============================================================================
