// crates/compliance-cli/src/lib.rs
// ============================================================================
// Module: Compliance Harness Library
// Description: Transport, runners, audit, and reporting for the harness CLI.
// Purpose: Keep the binary thin and let integration tests drive real exchanges.
// Dependencies: compliance-core, compliance-config, reqwest, tokio, jsonschema
// ============================================================================

//! ## Overview
//! The harness binary (`src/main.rs`) wires configuration into the pieces
//! defined here: an HTTP transport over `reqwest`, a bounded concurrent
//! matrix runner, a JSON-schema body validator, JSON-line audit sinks, report
//! rendering, and the message catalog used for all user-facing output.
//!
//! Security posture: the target is untrusted; response bodies are size
//! limited and never interpreted beyond optional schema validation.

// ============================================================================
// SECTION: Modules
// ============================================================================

/// Structured audit events and sinks.
pub mod audit;
/// Internationalization helpers and message catalog.
pub mod i18n;
/// Text and JSON rendering of harness results.
pub mod report;
/// Concurrent matrix runner and workflow scenario replay.
pub mod runner;
/// JSON-schema body validation keyed by resource path.
pub mod schema;
/// HTTP transport collaborator.
pub mod transport;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::FileAuditSink;
pub use audit::HarnessAuditSink;
pub use audit::HarnessRunEvent;
pub use audit::MatrixVerdictEvent;
pub use audit::NoopAuditSink;
pub use audit::StderrAuditSink;
pub use audit::WorkflowScenarioEvent;
pub use audit::build_audit_sink;
pub use report::OutputFormat;
pub use report::render_plan;
pub use report::render_run;
pub use runner::MatrixRunner;
pub use runner::run_scenarios;
pub use schema::SchemaError;
pub use schema::SchemaRegistry;
pub use transport::ExchangeTransport;
pub use transport::HttpTransport;
