// crates/compliance-core/tests/comparator.rs
// ============================================================================
// Module: Comparator Tests
// Description: Observed-response comparison against the default catalog.
// Purpose: Pin violation ordering, header matching, and body annotations.
// ============================================================================

//! Comparator behaviour for the stock resource catalog.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use compliance_core::Annotation;
use compliance_core::BodyValidation;
use compliance_core::BodyValidator;
use compliance_core::CheckOutcome;
use compliance_core::ComplianceViolation;
use compliance_core::NoBodyValidation;
use compliance_core::ObservedHeaders;
use compliance_core::ObservedResponse;
use compliance_core::PlannedCheck;
use compliance_core::ResourceDescriptor;
use compliance_core::SECURITY_HEADERS;
use compliance_core::SecurityHeaderSet;
use compliance_core::Verb;
use compliance_core::check;
use compliance_core::check_all;
use compliance_core::evaluate;
use compliance_core::verdict_for;

fn security_headers() -> ObservedHeaders {
    SECURITY_HEADERS.iter().map(|header| (header.name, header.value)).collect()
}

fn response(status: u16, content_type: Option<&str>) -> ObservedResponse {
    let mut headers = security_headers();
    if let Some(content_type) = content_type {
        headers.append("content-type", content_type);
    }
    ObservedResponse::new(status, headers, b"{}".to_vec())
}

fn planned(path: &str, content_type: &str, status: u16, verb: Verb) -> PlannedCheck {
    let descriptor = ResourceDescriptor::new(path, content_type, status);
    let expected = evaluate(&descriptor, verb);
    PlannedCheck {
        descriptor,
        verb,
        expected,
    }
}

struct FixedValidator(BodyValidation);

impl BodyValidator for FixedValidator {
    fn validate(&self, _descriptor: &ResourceDescriptor, _body: &[u8]) -> BodyValidation {
        self.0.clone()
    }
}

#[test]
fn get_root_passes_with_html_and_headers() {
    let planned = planned("/", "text/html", 200, Verb::Get);
    let observed = response(200, Some("text/html"));
    assert_eq!(check(&observed, &planned.expected, &SecurityHeaderSet::standard()), Ok(()));
}

#[test]
fn get_public_passes_with_json_and_headers() {
    let planned = planned("/public", "application/json", 200, Verb::Get);
    let observed = response(200, Some("application/json"));
    assert_eq!(check(&observed, &planned.expected, &SecurityHeaderSet::standard()), Ok(()));
}

#[test]
fn post_public_passes_with_405_and_any_content_type() {
    let planned = planned("/public", "application/json", 200, Verb::Post);
    for content_type in [None, Some("text/plain"), Some("application/json")] {
        let observed = response(405, content_type);
        assert_eq!(check(&observed, &planned.expected, &SecurityHeaderSet::standard()), Ok(()));
    }
}

#[test]
fn get_invalid_path_passes_with_404_html() {
    let planned = planned("/@invalid@", "text/html; charset=UTF-8", 404, Verb::Get);
    let observed = response(404, Some("text/html; charset=UTF-8"));
    assert_eq!(check(&observed, &planned.expected, &SecurityHeaderSet::standard()), Ok(()));
}

#[test]
fn status_is_reported_before_content_type_and_headers() {
    let planned = planned("/", "text/html", 200, Verb::Get);
    let observed = ObservedResponse::new(
        500,
        [("Content-Type", "application/json"), ("Server", "nginx")].into_iter().collect(),
        Vec::new(),
    );
    let headers = SecurityHeaderSet::standard();
    assert_eq!(
        check(&observed, &planned.expected, &headers),
        Err(ComplianceViolation::Status {
            expected: 200,
            actual: 500,
        })
    );

    let violations = check_all(&observed, &planned.expected, &headers);
    let subjects: Vec<&str> = violations.iter().map(ComplianceViolation::subject).collect();
    assert_eq!(
        subjects,
        vec![
            "status",
            "content-type",
            "X-XSS-Protection",
            "X-Content-Type-Options",
            "Expires",
            "Server",
            "Pragma",
            "Cache-control",
            "Referrer-Policy",
            "X-Frame-Options",
        ]
    );
    assert_eq!(
        violations[5],
        ComplianceViolation::HeaderValue {
            name: "Server".to_string(),
            expected: "globaleaks".to_string(),
            actual: "nginx".to_string(),
        }
    );
}

#[test]
fn content_type_is_compared_exactly() {
    let planned = planned("/", "text/html", 200, Verb::Get);
    let observed = response(200, Some("text/html; charset=UTF-8"));
    assert_eq!(
        check(&observed, &planned.expected, &SecurityHeaderSet::standard()),
        Err(ComplianceViolation::ContentType {
            expected: "text/html".to_string(),
            actual: Some("text/html; charset=UTF-8".to_string()),
        })
    );

    let missing = response(200, None);
    assert_eq!(
        check(&missing, &planned.expected, &SecurityHeaderSet::standard()),
        Err(ComplianceViolation::ContentType {
            expected: "text/html".to_string(),
            actual: None,
        })
    );
}

#[test]
fn header_values_are_case_sensitive() {
    let planned = planned("/", "text/html", 200, Verb::Get);
    let mut headers: ObservedHeaders = SECURITY_HEADERS
        .iter()
        .filter(|header| header.name != "X-Frame-Options")
        .map(|header| (header.name, header.value))
        .collect();
    headers.append("x-frame-options", "SAMEORIGIN");
    headers.append("Content-Type", "text/html");
    let observed = ObservedResponse::new(200, headers, Vec::new());
    assert_eq!(
        check(&observed, &planned.expected, &SecurityHeaderSet::standard()),
        Err(ComplianceViolation::HeaderValue {
            name: "X-Frame-Options".to_string(),
            expected: "sameorigin".to_string(),
            actual: "SAMEORIGIN".to_string(),
        })
    );
}

#[test]
fn duplicated_security_header_does_not_match() {
    let planned = planned("/", "text/html", 200, Verb::Get);
    let mut observed = response(200, Some("text/html"));
    observed.headers.append("Pragma", "no-cache");
    assert_eq!(
        check(&observed, &planned.expected, &SecurityHeaderSet::standard()),
        Err(ComplianceViolation::HeaderValue {
            name: "Pragma".to_string(),
            expected: "no-cache".to_string(),
            actual: "no-cache, no-cache".to_string(),
        })
    );
}

#[test]
fn json_body_without_schema_is_annotated_not_passed_silently() {
    let planned = planned("/public", "application/json", 200, Verb::Get);
    let observed = response(200, Some("application/json"));
    let verdict =
        verdict_for(&planned, &observed, &SecurityHeaderSet::standard(), &NoBodyValidation);
    assert_eq!(verdict.outcome, CheckOutcome::Pass);
    assert_eq!(
        verdict.annotations,
        vec![Annotation::SchemaValidationNotPerformed {
            content_type: "application/json".to_string(),
        }]
    );
}

#[test]
fn non_json_exchanges_carry_no_annotation() {
    for verb in [Verb::Post, Verb::Put] {
        let planned = planned("/public", "application/json", 200, verb);
        let observed = response(405, Some("text/html"));
        let verdict =
            verdict_for(&planned, &observed, &SecurityHeaderSet::standard(), &NoBodyValidation);
        assert_eq!(verdict.outcome, CheckOutcome::Pass);
        assert!(verdict.annotations.is_empty());
    }
}

#[test]
fn schema_failures_follow_header_violations() {
    let planned = planned("/public", "application/json", 200, Verb::Get);
    let mut observed = response(200, Some("application/json"));
    observed.headers = observed
        .headers
        .iter()
        .filter(|(name, _)| *name != "Expires")
        .collect();
    let validator = FixedValidator(BodyValidation::Invalid {
        schema: "public.json".to_string(),
        detail: "\"name\" is a required property".to_string(),
    });
    let verdict = verdict_for(&planned, &observed, &SecurityHeaderSet::standard(), &validator);
    let CheckOutcome::Fail {
        violations,
    } = &verdict.outcome
    else {
        panic!("expected failure, got {:?}", verdict.outcome);
    };
    assert_eq!(violations.len(), 2);
    assert_eq!(violations[0].subject(), "Expires");
    assert_eq!(violations[1].subject(), "body");
    assert_eq!(verdict.observed_status, Some(200));
}

#[test]
fn validated_schema_is_recorded() {
    let planned = planned("/public", "application/json", 200, Verb::Get);
    let observed = response(200, Some("application/json"));
    let validator = FixedValidator(BodyValidation::Valid {
        schema: "public.json".to_string(),
    });
    let verdict = verdict_for(&planned, &observed, &SecurityHeaderSet::standard(), &validator);
    assert_eq!(verdict.outcome, CheckOutcome::Pass);
    assert_eq!(
        verdict.annotations,
        vec![Annotation::SchemaValidated {
            schema: "public.json".to_string(),
        }]
    );
}
