// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Candidate ranking.
//!
//! Given the feature flags a request needs, the ranker decides which backends
//! are worth trying and in what order.
//!
//! # Rules
//!
//! 1. **Support score**: sum of the weights of the requested flags a backend supports.
//! 2. **Threshold**: a backend qualifies when its score is at least half
//!    (rounded down) of the total requested weight.
//! 3. **Dominance**: if any qualifying backend has positive quality, every
//!    non-positive-quality backend is dropped.
//! 4. **Order**: support score descending, then quality descending, then
//!    registry order.
//!
//! A forced backend list replaces the registry as the candidate source. The
//! threshold and dominance still apply, but sorting does not: survivors keep
//! the caller's order.

use std::sync::Arc;

use crate::config::{CapabilityRegistry, FeatureWeights};
use crate::model::{Backend, FeatureSet};
use crate::observability::messages::ranking::{CandidatesRanked, ForcedBackendUnavailable};
use crate::observability::messages::StructuredLog;

/// A backend considered for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub backend: Backend,
    pub support_score: u32,
    /// Requested flags this backend will silently drop.
    pub unsupported_features: FeatureSet,
}

/// Ranks backends against a request's feature flags.
///
/// Holds shared handles to the immutable tables so every ranking pass sees
/// the same data.
#[derive(Debug, Clone)]
pub struct Ranker {
    registry: Arc<CapabilityRegistry>,
    weights: Arc<FeatureWeights>,
}

impl Ranker {
    pub fn new(registry: Arc<CapabilityRegistry>, weights: Arc<FeatureWeights>) -> Self {
        Self { registry, weights }
    }

    pub fn registry(&self) -> &CapabilityRegistry {
        &self.registry
    }

    /// Minimum support score a backend needs for `flags`.
    pub fn threshold(&self, flags: &FeatureSet) -> u32 {
        self.weights.total(flags) / 2
    }

    /// Produce the ordered candidate list for `flags`.
    ///
    /// An empty result means no backend can serve the request at all; callers
    /// must treat that differently from every candidate failing.
    pub fn rank(&self, flags: &FeatureSet, forced: Option<&[Backend]>) -> Vec<Candidate> {
        let threshold = self.threshold(flags);

        // (candidate, quality) in source order
        let mut scored: Vec<(Candidate, i32)> = Vec::new();
        match forced {
            Some(list) => {
                for backend in list {
                    match self.registry.profile(*backend) {
                        Some(profile) => scored.push((self.score(profile.backend, flags), profile.quality)),
                        None => ForcedBackendUnavailable { backend: *backend }.log(),
                    }
                }
            }
            None => {
                for profile in self.registry.profiles() {
                    scored.push((self.score(profile.backend, flags), profile.quality));
                }
            }
        }

        scored.retain(|(candidate, _)| candidate.support_score >= threshold);

        if scored.iter().any(|(_, quality)| *quality > 0) {
            scored.retain(|(_, quality)| *quality > 0);
        }

        if forced.is_none() {
            // stable: registry order survives exact ties
            scored.sort_by(|(a, qa), (b, qb)| {
                b.support_score
                    .cmp(&a.support_score)
                    .then_with(|| qb.cmp(qa))
            });
        }

        let candidates: Vec<Candidate> = scored.into_iter().map(|(c, _)| c).collect();

        CandidatesRanked {
            flags,
            threshold,
            forced: forced.is_some(),
            candidates: &candidates,
        }
        .log();

        candidates
    }

    fn score(&self, backend: Backend, flags: &FeatureSet) -> Candidate {
        let mut support_score: u32 = 0;
        let mut unsupported_features = FeatureSet::new();

        let profile = self.registry.profile(backend);
        for flag in flags.iter() {
            if profile.is_some_and(|p| p.supports(flag)) {
                support_score = support_score.saturating_add(self.weights.weight(flag));
            } else {
                unsupported_features.insert(flag);
            }
        }

        Candidate {
            backend,
            support_score,
            unsupported_features,
        }
    }
}
