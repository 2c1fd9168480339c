//! Load and validation tests for compliance-config.
// crates/compliance-config/tests/load_validation.rs
// =============================================================================
// Module: Load Validation Tests
// Description: Defaults, file loading, and validation limits.
// Purpose: Ensure configuration fails closed on invalid input.
// =============================================================================

use compliance_config::AuditMode;
use compliance_config::HarnessConfig;
use compliance_core::DeletePolicy;
use compliance_core::PathClass;
use compliance_core::Verb;

mod common;

use common::TestResult;
use common::assert_invalid;
use common::config_from_toml;
use common::write_config;

// ============================================================================
// SECTION: Defaults
// ============================================================================

#[test]
fn empty_config_uses_stock_defaults() -> TestResult {
    let config = config_from_toml("").map_err(|err| err.to_string())?;
    if config != HarnessConfig::default() {
        return Err("empty config should equal defaults".to_string());
    }
    if config.target.base_url != "http://127.0.0.1:8082" {
        return Err(format!("unexpected base url {}", config.target.base_url));
    }
    if config.target.timeout_ms != 10_000 || config.target.max_concurrency != 4 {
        return Err("unexpected target limits".to_string());
    }
    let paths: Vec<String> = config.catalog().into_iter().map(|entry| entry.path).collect();
    if paths != ["/", "/index.html", "/public", "/unexistent", "/@invalid@"] {
        return Err(format!("unexpected default catalog {}", paths.join(",")));
    }
    if config.audit.mode != AuditMode::Stderr {
        return Err("audit should default to stderr".to_string());
    }
    let roster: Vec<String> = config.roster().iter().map(ToString::to_string).collect();
    if roster != ["receiver-0"] {
        return Err(format!("unexpected roster {}", roster.join(",")));
    }
    if config.scenarios().len() != 1 {
        return Err("built-in scenario should always be present".to_string());
    }
    Ok(())
}

#[test]
fn full_config_round_trips_into_core_types() -> TestResult {
    let config = config_from_toml(
        r#"
[target]
base_url = "https://disclosure.example.org/"
timeout_ms = 2500
max_concurrency = 8

[[resources]]
path = "/public"
content_type = "application/json"
status = 200
schema = "schemas/public.json"

[[resources]]
path = "/!bang"
content_type = "text/html; charset=UTF-8"
status = 404

[routing]
rejected_path_chars = "@!"
delete_policy = "method_not_allowed"

[workflow]
recipients = ["receiver-0", "receiver-1"]

[[workflow.scenarios]]
name = "submit disabled on entry"

[[workflow.scenarios.steps]]
action = "expect_enabled"
element = "SubmitButton"
enabled = false

[audit]
mode = "file"
path = "audit/harness.jsonl"
"#,
    )
    .map_err(|err| err.to_string())?;

    let policy = config.matrix_policy();
    if policy.delete != DeletePolicy::MethodNotAllowed {
        return Err("delete policy not applied".to_string());
    }
    if policy.classifier.classify("/!bang") != PathClass::Malformed {
        return Err("custom rejected characters not applied".to_string());
    }
    let catalog = config.catalog();
    if policy.evaluate(&catalog[0], Verb::Delete).expected_status != 405 {
        return Err("strict delete should expect 405".to_string());
    }
    if config.scenarios().len() != 2 || config.roster().len() != 2 {
        return Err("workflow section not applied".to_string());
    }
    if config.audit.mode != AuditMode::File {
        return Err("audit mode not applied".to_string());
    }
    Ok(())
}

#[test]
fn relative_paths_resolve_against_config_directory() -> TestResult {
    let (dir, path) = write_config(
        r#"
[[resources]]
path = "/public"
content_type = "application/json"
status = 200
schema = "public.schema.json"
"#,
    )?;
    let config = HarnessConfig::load(Some(&path)).map_err(|err| err.to_string())?;
    let resolved = config.resolve_relative("public.schema.json");
    if resolved != dir.path().join("public.schema.json") {
        return Err(format!("unexpected resolution {}", resolved.display()));
    }
    Ok(())
}

// ============================================================================
// SECTION: Loading Failures
// ============================================================================

#[test]
fn explicit_missing_file_is_an_io_error() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let missing = dir.path().join("absent.toml");
    assert_invalid(HarnessConfig::load(Some(&missing)), "config io error")
}

#[test]
fn unknown_fields_are_rejected() -> TestResult {
    assert_invalid(config_from_toml("[target]\nbase = \"http://x\"\n"), "config parse error")?;
    assert_invalid(config_from_toml("[extras]\n"), "config parse error")
}

#[test]
fn non_utf8_file_is_rejected() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, [0xff_u8, 0xfe, 0x00]).map_err(|err| err.to_string())?;
    assert_invalid(HarnessConfig::load_from(&path), "utf-8")
}

#[test]
fn oversized_file_is_rejected() -> TestResult {
    let padding = format!("# {}\n", "x".repeat(1024 * 1024));
    let (_dir, path) = write_config(&padding)?;
    assert_invalid(HarnessConfig::load_from(&path), "size limit")
}

// ============================================================================
// SECTION: Field Validation
// ============================================================================

#[test]
fn target_limits_are_enforced() -> TestResult {
    assert_invalid(config_from_toml("[target]\ntimeout_ms = 0\n"), "target.timeout_ms")?;
    assert_invalid(config_from_toml("[target]\ntimeout_ms = 300001\n"), "target.timeout_ms")?;
    config_from_toml("[target]\ntimeout_ms = 300000\n").map_err(|err| err.to_string())?;
    assert_invalid(config_from_toml("[target]\nmax_concurrency = 0\n"), "max_concurrency")?;
    assert_invalid(config_from_toml("[target]\nmax_concurrency = 65\n"), "max_concurrency")?;
    config_from_toml("[target]\nmax_concurrency = 64\n").map_err(|err| err.to_string())?;
    Ok(())
}

#[test]
fn base_url_must_be_http_with_host() -> TestResult {
    assert_invalid(config_from_toml("[target]\nbase_url = \"ftp://x\"\n"), "http")?;
    assert_invalid(config_from_toml("[target]\nbase_url = \"not a url\"\n"), "base_url")?;
    assert_invalid(
        config_from_toml("[target]\nbase_url = \"http://host/?q=1\"\n"),
        "query or fragment",
    )
}

#[test]
fn resource_entries_are_validated() -> TestResult {
    let entry = |path: &str, content_type: &str, status: u16| {
        format!(
            "[[resources]]\npath = \"{path}\"\ncontent_type = \"{content_type}\"\nstatus = {status}\n"
        )
    };
    assert_invalid(config_from_toml(&entry("public", "text/html", 200)), "must start with '/'")?;
    assert_invalid(config_from_toml(&entry("/", "  ", 200)), "content_type")?;
    assert_invalid(config_from_toml(&entry("/", "text/html", 99)), "status")?;
    assert_invalid(config_from_toml(&entry("/", "text/html", 600)), "status")?;
    let duplicated = format!("{}{}", entry("/a", "text/html", 200), entry("/a", "text/html", 200));
    assert_invalid(config_from_toml(&duplicated), "duplicated")?;
    assert_invalid(
        config_from_toml(&format!("{}schema = \"s.json\"\n", entry("/", "text/html", 200))),
        "json content_type",
    )
}

#[test]
fn resource_count_is_bounded() -> TestResult {
    let entries = |count: usize| {
        (0 .. count)
            .map(|index| {
                format!("[[resources]]\npath = \"/r{index}\"\ncontent_type = \"text/html\"\nstatus = 200\n")
            })
            .collect::<String>()
    };
    config_from_toml(&entries(256)).map_err(|err| err.to_string())?;
    assert_invalid(config_from_toml(&entries(257)), "resources exceeds 256")
}

#[test]
fn routing_and_workflow_are_validated() -> TestResult {
    assert_invalid(config_from_toml("[routing]\nrejected_path_chars = \"@/\"\n"), "'/'")?;
    assert_invalid(config_from_toml("[routing]\ndelete_policy = \"sometimes\"\n"), "parse")?;
    assert_invalid(config_from_toml("[workflow]\nrecipients = []\n"), "workflow.recipients")?;
    assert_invalid(config_from_toml("[workflow]\nrecipients = [\"alice\"]\n"), "receiver-<n>")?;
    assert_invalid(
        config_from_toml("[workflow]\nrecipients = [\"receiver-0\", \"receiver-0\"]\n"),
        "duplicated",
    )?;
    assert_invalid(
        config_from_toml(
            "[[workflow.scenarios]]\nname = \"bad\"\n[[workflow.scenarios.steps]]\naction = \"click\"\nelement = \"Nowhere\"\n",
        ),
        "unknown element Nowhere",
    )?;
    assert_invalid(
        config_from_toml("[[workflow.scenarios]]\nname = \"empty\"\nsteps = []\n"),
        "1..=256 steps",
    )
}

#[test]
fn audit_file_mode_requires_path() -> TestResult {
    assert_invalid(config_from_toml("[audit]\nmode = \"file\"\n"), "audit.path")?;
    config_from_toml("[audit]\nmode = \"off\"\n").map_err(|err| err.to_string())?;
    Ok(())
}
