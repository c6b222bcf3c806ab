// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for candidate ranking.

use crate::engine::Candidate;
use crate::model::{Backend, FeatureSet};
use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Ranking finished.
///
/// # Log Level
/// `debug!` - Per-request detail
pub struct CandidatesRanked<'a> {
    pub flags: &'a FeatureSet,
    pub threshold: u32,
    pub forced: bool,
    pub candidates: &'a [Candidate],
}

impl Display for CandidatesRanked<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let order: Vec<String> = self
            .candidates
            .iter()
            .map(|c| format!("{}({})", c.backend, c.support_score))
            .collect();
        write!(
            f,
            "Ranked {} candidates for {} (threshold={}, forced={}): [{}]",
            self.candidates.len(),
            self.flags,
            self.threshold,
            self.forced,
            order.join(", ")
        )
    }
}

impl StructuredLog for CandidatesRanked<'_> {
    fn log(&self) {
        tracing::debug!(
            threshold = self.threshold,
            forced = self.forced,
            candidate_count = self.candidates.len(),
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "ranking",
            span_name = name,
            threshold = self.threshold,
            candidate_count = self.candidates.len(),
        )
    }
}

/// A forced backend is not in the registry and was dropped.
///
/// # Log Level
/// `warn!` - The caller asked for something this deployment cannot do
pub struct ForcedBackendUnavailable {
    pub backend: Backend,
}

impl Display for ForcedBackendUnavailable {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Forced backend '{}' is not configured in this deployment, skipping it",
            self.backend
        )
    }
}

impl StructuredLog for ForcedBackendUnavailable {
    fn log(&self) {
        tracing::warn!(backend = self.backend.as_str(), "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "forced_backend_unavailable",
            span_name = name,
            backend = self.backend.as_str(),
        )
    }
}
