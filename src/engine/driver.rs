// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Execution driver.
//!
//! Walks the ranked candidate list one backend at a time until one returns a
//! well-formed result, the budget runs out, the caller cancels, or every
//! candidate has failed.
//!
//! ```text
//! Ranking ──empty──────────────────────────────▶ NoViableBackend
//!    │
//!    ▼
//! Attempting ◀──────── failure, more candidates ──┐
//!    │  ├── caller cancelled ───────────────────────┼──▶ Cancelled
//!    │  ├── budget exhausted before start ─────────┼──▶ BudgetExhausted
//!    │  └── invoke(effective timeout) ─────────────┤
//!    │                                             │
//!    ├── well-formed result ──▶ Succeeded          │
//!    └── failure, candidates left ─────────────────┘
//!        failure, none left ──▶ AllBackendsFailed
//! ```
//!
//! Exactly one backend invocation is in flight at a time. Each attempt runs
//! under a child of the caller's cancellation token and is bounded by
//! [`tokio::time::timeout`], so an adapter that ignores its token is dropped
//! at its deadline all the same.

use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::backends::AdapterMap;
use crate::engine::budget::{BudgetPolicy, TimeBudget};
use crate::engine::ranker::{Candidate, Ranker};
use crate::errors::{AttemptError, BackendError, OrchestrationError};
use crate::model::{Backend, RequestContext, ScrapeOutcome};
use crate::observability::messages::driver::{
    AttemptFailed, AttemptStarted, AttemptSucceeded, OrchestrationFailed, OrchestrationStarted,
};
use crate::observability::messages::StructuredLog;

/// Something the driver did, in the order it did it.
#[derive(Debug, Clone, PartialEq)]
pub enum DriverEvent {
    Ranked {
        candidates: Vec<Candidate>,
    },
    AttemptStarted {
        backend: Backend,
        attempt: usize,
        timeout: Duration,
    },
    AttemptFailed {
        backend: Backend,
        attempt: usize,
        error: BackendError,
        duration: Duration,
    },
    Succeeded {
        backend: Backend,
        attempt: usize,
        duration: Duration,
    },
    Failed {
        error: OrchestrationError,
    },
}

/// Diagnostics of one orchestration call.
///
/// Per-backend errors of a call that eventually succeeded are only visible
/// here and in the logs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionTrace {
    events: Vec<DriverEvent>,
}

impl ExecutionTrace {
    pub fn events(&self) -> &[DriverEvent] {
        &self.events
    }

    /// Backends invoked, in order. Candidates without an adapter are not included.
    pub fn attempted(&self) -> Vec<Backend> {
        self.events
            .iter()
            .filter_map(|event| match event {
                DriverEvent::AttemptStarted { backend, .. } => Some(*backend),
                _ => None,
            })
            .collect()
    }

    /// Every recorded per-backend error, in order.
    pub fn errors(&self) -> Vec<AttemptError> {
        self.events
            .iter()
            .filter_map(|event| match event {
                DriverEvent::AttemptFailed { backend, error, .. } => {
                    Some(AttemptError::new(*backend, error.clone()))
                }
                _ => None,
            })
            .collect()
    }

    /// The ranked candidate list, if ranking ran.
    pub fn candidates(&self) -> Option<&[Candidate]> {
        self.events.iter().find_map(|event| match event {
            DriverEvent::Ranked { candidates } => Some(candidates.as_slice()),
            _ => None,
        })
    }

    fn push(&mut self, event: DriverEvent) {
        self.events.push(event);
    }
}

/// Serves one scrape request by trying backends in ranked order.
///
/// Holds only immutable state, so one `Orchestrator` can serve any number of
/// concurrent requests.
#[derive(Debug, Clone)]
pub struct Orchestrator {
    ranker: Ranker,
    policy: BudgetPolicy,
    adapters: AdapterMap,
}

impl Orchestrator {
    pub fn new(ranker: Ranker, policy: BudgetPolicy, adapters: AdapterMap) -> Self {
        Self {
            ranker,
            policy,
            adapters,
        }
    }

    pub fn ranker(&self) -> &Ranker {
        &self.ranker
    }

    pub fn policy(&self) -> &BudgetPolicy {
        &self.policy
    }

    pub fn adapters(&self) -> &AdapterMap {
        &self.adapters
    }

    pub async fn execute(
        &self,
        request: &RequestContext,
        cancel: CancellationToken,
    ) -> Result<ScrapeOutcome, OrchestrationError> {
        self.execute_traced(request, cancel).await.0
    }

    /// [`Orchestrator::execute`], also returning what happened along the way.
    pub async fn execute_traced(
        &self,
        request: &RequestContext,
        cancel: CancellationToken,
    ) -> (Result<ScrapeOutcome, OrchestrationError>, ExecutionTrace) {
        let budget = self.policy.start(request);
        let mut trace = ExecutionTrace::default();

        let started = OrchestrationStarted {
            url: request.url().as_str(),
            flags: request.feature_flags(),
            budget: budget.limit(),
        };
        let span = started.span("execute");
        span.in_scope(|| started.log());

        let result = self
            .run(request, &cancel, &budget, &mut trace)
            .instrument(span.clone())
            .await;

        if let Err(error) = &result {
            span.in_scope(|| {
                OrchestrationFailed {
                    error,
                    elapsed: budget.elapsed(),
                }
                .log()
            });
            trace.push(DriverEvent::Failed {
                error: error.clone(),
            });
        }

        (result, trace)
    }

    async fn run(
        &self,
        request: &RequestContext,
        cancel: &CancellationToken,
        budget: &TimeBudget,
        trace: &mut ExecutionTrace,
    ) -> Result<ScrapeOutcome, OrchestrationError> {
        let flags = request.feature_flags();
        let candidates = self.ranker.rank(flags, request.forced_backends());
        trace.push(DriverEvent::Ranked {
            candidates: candidates.clone(),
        });

        if candidates.is_empty() {
            return Err(OrchestrationError::NoViableBackend {
                requested: flags.clone(),
            });
        }

        let candidate_count = candidates.len();
        let mut attempts: Vec<AttemptError> = Vec::new();

        for (index, candidate) in candidates.into_iter().enumerate() {
            let attempt = index + 1;
            let backend = candidate.backend;

            if cancel.is_cancelled() {
                return Err(OrchestrationError::Cancelled { attempts });
            }
            let remaining = budget.remaining();
            if remaining.is_some_and(|r| r.is_zero()) {
                return Err(OrchestrationError::BudgetExhausted { attempts });
            }

            let Some(adapter) = self.adapters.get(backend) else {
                record_failure(
                    trace,
                    &mut attempts,
                    backend,
                    attempt,
                    BackendError::NotConfigured,
                    Duration::ZERO,
                );
                continue;
            };

            let timeout = self.policy.effective_timeout(backend, request, remaining);
            AttemptStarted {
                backend,
                attempt,
                candidate_count,
                timeout,
            }
            .log();
            trace.push(DriverEvent::AttemptStarted {
                backend,
                attempt,
                timeout,
            });

            let started = Instant::now();
            let attempt_token = cancel.child_token();
            let invocation = tokio::time::timeout(
                timeout,
                adapter.scrape(request, timeout, attempt_token.clone()),
            );
            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                result = invocation => Some(result),
            };
            // anything the adapter left running sees the attempt as over
            attempt_token.cancel();
            let duration = started.elapsed();

            let result = match outcome {
                None => {
                    record_failure(
                        trace,
                        &mut attempts,
                        backend,
                        attempt,
                        BackendError::Cancelled,
                        duration,
                    );
                    return Err(OrchestrationError::Cancelled { attempts });
                }
                Some(Err(_elapsed)) => Err(BackendError::Timeout(timeout)),
                Some(Ok(result)) => result,
            };

            match result.and_then(|raw| raw.validate().map_err(BackendError::Malformed)) {
                Ok(result) => {
                    AttemptSucceeded {
                        backend,
                        attempt,
                        status_code: result.status_code,
                        duration,
                        unsupported: &candidate.unsupported_features,
                    }
                    .log();
                    trace.push(DriverEvent::Succeeded {
                        backend,
                        attempt,
                        duration,
                    });
                    return Ok(ScrapeOutcome {
                        result,
                        backend,
                        unsupported_features: candidate.unsupported_features,
                    });
                }
                Err(error) => {
                    record_failure(trace, &mut attempts, backend, attempt, error, duration);
                }
            }
        }

        Err(OrchestrationError::AllBackendsFailed { attempts })
    }
}

fn record_failure(
    trace: &mut ExecutionTrace,
    attempts: &mut Vec<AttemptError>,
    backend: Backend,
    attempt: usize,
    error: BackendError,
    duration: Duration,
) {
    AttemptFailed {
        backend,
        attempt,
        error: &error,
        duration,
    }
    .log();
    trace.push(DriverEvent::AttemptFailed {
        backend,
        attempt,
        error: error.clone(),
        duration,
    });
    attempts.push(AttemptError::new(backend, error));
}
