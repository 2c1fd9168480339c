// crates/compliance-cli/src/runner.rs
// ============================================================================
// Module: Harness Runner
// Description: Bounded concurrent matrix execution and workflow replay.
// Purpose: Dispatch independent exchanges and report verdicts in plan order.
// Dependencies: compliance-core, tokio
// ============================================================================

//! ## Overview
//! Each planned (resource, verb) pair is an independent exchange. The runner
//! spawns one task per pair, admits at most `max_concurrency` exchanges at a
//! time through a semaphore, and reassembles verdicts in plan order so
//! reports and audit output are deterministic. Transport failures, and tasks
//! that die before producing a verdict, become inconclusive verdicts.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use compliance_core::PlannedCheck;
use compliance_core::RecipientId;
use compliance_core::ScenarioVerdict;
use compliance_core::SecurityHeaderSet;
use compliance_core::TransportFailure;
use compliance_core::TransportFailureKind;
use compliance_core::Verdict;
use compliance_core::WorkflowScenario;
use compliance_core::verdict_for;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::audit::HarnessAuditSink;
use crate::audit::MatrixVerdictEvent;
use crate::audit::WorkflowScenarioEvent;
use crate::schema::SchemaRegistry;
use crate::transport::ExchangeTransport;

// ============================================================================
// SECTION: Matrix Runner
// ============================================================================

/// Executes a matrix plan against one transport.
pub struct MatrixRunner<T> {
    /// Exchange collaborator.
    transport: Arc<T>,
    /// Body validator.
    schemas: Arc<SchemaRegistry>,
    /// Header contract asserted on every response.
    headers: SecurityHeaderSet,
    /// Maximum in-flight exchanges.
    max_concurrency: usize,
    /// Audit sink receiving one event per verdict.
    audit: Arc<dyn HarnessAuditSink>,
}

impl<T> MatrixRunner<T>
where
    T: ExchangeTransport + 'static,
{
    /// Creates a runner with the standard header contract.
    #[must_use]
    pub fn new(
        transport: T,
        schemas: SchemaRegistry,
        max_concurrency: usize,
        audit: Arc<dyn HarnessAuditSink>,
    ) -> Self {
        Self {
            transport: Arc::new(transport),
            schemas: Arc::new(schemas),
            headers: SecurityHeaderSet::standard(),
            max_concurrency: max_concurrency.max(1),
            audit,
        }
    }

    /// Runs every planned check and returns verdicts in plan order.
    pub async fn run(&self, plan: &[PlannedCheck]) -> Vec<Verdict> {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let mut tasks = JoinSet::new();
        for (index, check) in plan.iter().cloned().enumerate() {
            let semaphore = Arc::clone(&semaphore);
            let transport = Arc::clone(&self.transport);
            let schemas = Arc::clone(&self.schemas);
            let headers = self.headers;
            tasks.spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    let failure =
                        TransportFailure::new(TransportFailureKind::Other, "runner shut down");
                    return (index, inconclusive(&check, failure));
                };
                let verdict = match transport.exchange(check.verb, &check.descriptor.path).await {
                    Ok(observed) => verdict_for(&check, &observed, &headers, schemas.as_ref()),
                    Err(failure) => inconclusive(&check, failure),
                };
                (index, verdict)
            });
        }

        let mut slots: Vec<Option<Verdict>> = vec![None; plan.len()];
        while let Some(joined) = tasks.join_next().await {
            if let Ok((index, verdict)) = joined
                && let Some(slot) = slots.get_mut(index)
            {
                *slot = Some(verdict);
            }
        }

        let verdicts: Vec<Verdict> = slots
            .into_iter()
            .zip(plan)
            .map(|(slot, check)| {
                slot.unwrap_or_else(|| {
                    inconclusive(
                        check,
                        TransportFailure::new(
                            TransportFailureKind::Other,
                            "exchange task ended without a verdict",
                        ),
                    )
                })
            })
            .collect();
        for verdict in &verdicts {
            self.audit.record_verdict(&MatrixVerdictEvent::new(verdict));
        }
        verdicts
    }
}

/// Builds an inconclusive verdict for a planned check.
fn inconclusive(check: &PlannedCheck, failure: TransportFailure) -> Verdict {
    Verdict::inconclusive(check.descriptor.clone(), check.verb, check.expected.clone(), failure)
}

// ============================================================================
// SECTION: Workflow Replay
// ============================================================================

/// Replays scenarios in order, each against a fresh gate.
pub fn run_scenarios(
    scenarios: &[WorkflowScenario],
    roster: &[RecipientId],
    audit: &dyn HarnessAuditSink,
) -> Vec<ScenarioVerdict> {
    scenarios
        .iter()
        .map(|scenario| {
            let verdict = scenario.run(roster);
            audit.record_scenario(&WorkflowScenarioEvent::new(&verdict));
            verdict
        })
        .collect()
}

// ============================================================================
// SECTION: Tests
// ============================================================================
