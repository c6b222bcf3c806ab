// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

use super::AttemptError;
use crate::model::FeatureSet;

/// The only failures an orchestration call surfaces to its caller.
///
/// Every variant that follows at least one attempt carries the ordered list of
/// per-backend errors, so operators can tell an unreachable URL apart from a
/// fleet of broken backends.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrchestrationError {
    /// Ranking produced no candidate: a capability or configuration mismatch.
    #[error("no configured backend can serve the requested features {requested}")]
    NoViableBackend { requested: FeatureSet },

    /// The time budget ran out before the next candidate could start.
    #[error("time budget exhausted after {} attempt(s): {}", .attempts.len(), AttemptError::summarize(.attempts))]
    BudgetExhausted { attempts: Vec<AttemptError> },

    /// Every candidate was attempted and failed.
    #[error("all {} candidate backend(s) failed: {}", .attempts.len(), AttemptError::summarize(.attempts))]
    AllBackendsFailed { attempts: Vec<AttemptError> },

    /// The caller cancelled the request.
    #[error("request cancelled by caller after {} attempt(s)", .attempts.len())]
    Cancelled { attempts: Vec<AttemptError> },
}

impl OrchestrationError {
    /// Per-backend errors recorded before the orchestration gave up.
    pub fn attempts(&self) -> &[AttemptError] {
        match self {
            OrchestrationError::NoViableBackend { .. } => &[],
            OrchestrationError::BudgetExhausted { attempts }
            | OrchestrationError::AllBackendsFailed { attempts }
            | OrchestrationError::Cancelled { attempts } => attempts,
        }
    }

    /// Short machine-readable name of the failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            OrchestrationError::NoViableBackend { .. } => "no_viable_backend",
            OrchestrationError::BudgetExhausted { .. } => "budget_exhausted",
            OrchestrationError::AllBackendsFailed { .. } => "all_backends_failed",
            OrchestrationError::Cancelled { .. } => "cancelled",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::BackendError;
    use crate::model::{Backend, FeatureFlag};
    use std::time::Duration;

    #[test]
    fn test_messages_list_attempts_in_order() {
        let err = OrchestrationError::AllBackendsFailed {
            attempts: vec![
                AttemptError::new(Backend::FireEngineChromeCdp, BackendError::Timeout(Duration::from_secs(45))),
                AttemptError::new(Backend::Fetch, BackendError::Transport("connection refused".into())),
            ],
        };
        assert_eq!(
            err.to_string(),
            "all 2 candidate backend(s) failed: fire-engine;chrome-cdp: timed out after 45s; fetch: transport error: connection refused"
        );
        assert_eq!(err.attempts().len(), 2);
        assert_eq!(err.kind(), "all_backends_failed");
    }

    #[test]
    fn test_no_viable_backend_names_features() {
        let err = OrchestrationError::NoViableBackend {
            requested: FeatureSet::from([FeatureFlag::PdfOutput]),
        };
        assert_eq!(
            err.to_string(),
            "no configured backend can serve the requested features {pdf-output}"
        );
        assert!(err.attempts().is_empty());
    }

    #[test]
    fn test_budget_exhausted_without_attempts() {
        let err = OrchestrationError::BudgetExhausted { attempts: vec![] };
        assert_eq!(err.to_string(), "time budget exhausted after 0 attempt(s): no attempts");
    }
}
