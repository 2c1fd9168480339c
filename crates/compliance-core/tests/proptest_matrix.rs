// crates/compliance-core/tests/proptest_matrix.rs
// ============================================================================
// Module: Compliance Matrix Property-Based Tests
// Description: Property tests over the resource x verb Cartesian product.
// Purpose: Check expected-outcome rules and header checks for arbitrary catalogs.
// ============================================================================

//! Property-based tests for compliance matrix invariants.

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

use compliance_core::ComplianceViolation;
use compliance_core::ContentTypeExpectation;
use compliance_core::DeletePolicy;
use compliance_core::MatrixPolicy;
use compliance_core::ObservedHeaders;
use compliance_core::ObservedResponse;
use compliance_core::PathClass;
use compliance_core::PathClassifier;
use compliance_core::ResourceDescriptor;
use compliance_core::SECURITY_HEADERS;
use compliance_core::SecurityHeaderSet;
use compliance_core::Verb;
use compliance_core::VerbOutcome;
use compliance_core::check;
use compliance_core::check_all;
use compliance_core::evaluate;
use compliance_core::plan;
use proptest::prelude::*;

fn verb_strategy() -> impl Strategy<Value = Verb> {
    prop::sample::select(Verb::ALL.to_vec())
}

fn valid_path_strategy() -> impl Strategy<Value = String> {
    "/[a-zA-Z0-9._~/-]{0,24}"
}

fn malformed_path_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "/[a-z]{0,8}@[a-z]{0,8}@?",
        "/[a-z]{0,8}[ \t][a-z]{0,8}",
        "[a-z]{1,12}",
        Just(String::new()),
    ]
}

fn descriptor_strategy(path: impl Strategy<Value = String>) -> impl Strategy<Value = ResourceDescriptor> {
    (
        path,
        prop::sample::select(vec!["text/html", "application/json", "text/html; charset=UTF-8"]),
        100_u16 ..= 599,
    )
        .prop_map(|(path, content_type, status)| ResourceDescriptor::new(path, content_type, status))
}

/// Builds a response carrying a case-shuffled copy of every security header.
fn compliant_response(expected: &VerbOutcome, uppercase: bool) -> ObservedResponse {
    let mut headers: ObservedHeaders = SECURITY_HEADERS
        .iter()
        .map(|header| {
            let name = if uppercase {
                header.name.to_ascii_uppercase()
            } else {
                header.name.to_ascii_lowercase()
            };
            (name, header.value.to_string())
        })
        .collect();
    if let Some(content_type) = expected.expected_content_type.as_exact() {
        headers.append("Content-Type", content_type);
    }
    ObservedResponse::new(expected.expected_status, headers, Vec::new())
}

proptest! {
    #[test]
    fn get_and_delete_on_valid_paths_use_declared_contract(
        descriptor in descriptor_strategy(valid_path_strategy()),
        delete in any::<bool>(),
    ) {
        let verb = if delete { Verb::Delete } else { Verb::Get };
        let outcome = evaluate(&descriptor, verb);
        prop_assert_eq!(outcome.expected_status, descriptor.expected_success_status);
        prop_assert_eq!(
            outcome.expected_content_type,
            ContentTypeExpectation::Exact(descriptor.expected_content_type.clone())
        );
    }

    #[test]
    fn post_and_put_on_valid_paths_are_not_allowed(
        descriptor in descriptor_strategy(valid_path_strategy()),
        put in any::<bool>(),
    ) {
        let verb = if put { Verb::Put } else { Verb::Post };
        let outcome = evaluate(&descriptor, verb);
        prop_assert_eq!(outcome.expected_status, 405);
        prop_assert_eq!(outcome.expected_content_type, ContentTypeExpectation::Unconstrained);
    }

    #[test]
    fn malformed_paths_are_not_found_for_every_verb(
        descriptor in descriptor_strategy(malformed_path_strategy()),
        verb in verb_strategy(),
        strict_delete in any::<bool>(),
    ) {
        let policy = MatrixPolicy {
            classifier: PathClassifier::default(),
            delete: if strict_delete { DeletePolicy::MethodNotAllowed } else { DeletePolicy::MirrorGet },
        };
        prop_assert_eq!(policy.classifier.classify(&descriptor.path), PathClass::Malformed);
        let outcome = policy.evaluate(&descriptor, verb);
        prop_assert_eq!(outcome.expected_status, 404);
        prop_assert_eq!(
            outcome.expected_content_type,
            ContentTypeExpectation::Exact("text/html; charset=UTF-8".to_string())
        );
    }

    #[test]
    fn compliant_responses_pass_for_every_pair(
        catalog in prop::collection::vec(
            prop_oneof![
                descriptor_strategy(valid_path_strategy()),
                descriptor_strategy(malformed_path_strategy()),
            ],
            1 .. 8,
        ),
        uppercase in any::<bool>(),
    ) {
        let headers = SecurityHeaderSet::standard();
        let checks = plan(&catalog);
        prop_assert_eq!(checks.len(), catalog.len() * Verb::ALL.len());
        for planned in &checks {
            let observed = compliant_response(&planned.expected, uppercase);
            prop_assert_eq!(check(&observed, &planned.expected, &headers), Ok(()));
        }
    }

    #[test]
    fn removing_any_security_header_is_reported(
        descriptor in descriptor_strategy(valid_path_strategy()),
        verb in verb_strategy(),
        removed in 0_usize .. 8,
    ) {
        let expected = evaluate(&descriptor, verb);
        let observed = compliant_response(&expected, false);
        let missing = SECURITY_HEADERS[removed];
        let headers: ObservedHeaders = observed
            .headers
            .iter()
            .filter(|(name, _)| !name.eq_ignore_ascii_case(missing.name))
            .collect();
        let stripped = ObservedResponse::new(observed.status, headers, Vec::new());
        let violations = check_all(&stripped, &expected, &SecurityHeaderSet::standard());
        prop_assert_eq!(
            violations,
            vec![ComplianceViolation::MissingHeader {
                name: missing.name.to_string(),
                expected: missing.value.to_string(),
            }]
        );
    }
}

#[test]
fn plan_follows_catalog_then_verb_order() {
    let catalog = ResourceDescriptor::default_catalog();
    let checks = plan(&catalog);
    let order: Vec<(String, Verb)> =
        checks.iter().map(|planned| (planned.descriptor.path.clone(), planned.verb)).collect();
    let expected: Vec<(String, Verb)> = catalog
        .iter()
        .flat_map(|descriptor| Verb::ALL.into_iter().map(|verb| (descriptor.path.clone(), verb)))
        .collect();
    assert_eq!(order, expected);
}

#[test]
fn strict_delete_policy_refuses_delete_on_valid_paths() {
    let policy = MatrixPolicy {
        classifier: PathClassifier::default(),
        delete: DeletePolicy::MethodNotAllowed,
    };
    let descriptor = ResourceDescriptor::new("/public", "application/json", 200);
    let outcome = policy.evaluate(&descriptor, Verb::Delete);
    assert_eq!(outcome.expected_status, 405);
    assert_eq!(outcome.expected_content_type, ContentTypeExpectation::Unconstrained);
    assert_eq!(policy.evaluate(&descriptor, Verb::Get).expected_status, 200);
}

#[test]
fn catch_all_not_found_resource_is_a_valid_path() {
    let descriptor = ResourceDescriptor::new("/unexistent", "text/html; charset=UTF-8", 404);
    assert_eq!(PathClassifier::default().classify(&descriptor.path), PathClass::Valid);
    assert_eq!(evaluate(&descriptor, Verb::Get).expected_status, 404);
    assert_eq!(evaluate(&descriptor, Verb::Post).expected_status, 405);
}

#[test]
fn custom_rejected_characters_extend_classification() {
    let classifier = PathClassifier::new(['@', '!', '@']);
    assert_eq!(classifier.rejected(), &['!', '@']);
    assert_eq!(classifier.classify("/a!b"), PathClass::Malformed);
    assert_eq!(classifier.classify("/a\u{7f}b"), PathClass::Malformed);
    assert_eq!(classifier.classify("/index.html"), PathClass::Valid);
}
