// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::{BTreeMap, HashMap};

use crate::config::consts::builtin_weight;
use crate::errors::ConfigError;
use crate::model::{FeatureFlag, FeatureSet};

/// Priority weight of every feature flag.
///
/// Weights only influence scoring, never correctness. The table is always
/// complete: every flag has a weight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureWeights(HashMap<FeatureFlag, u32>);

impl FeatureWeights {
    pub fn builtin() -> Self {
        Self(
            FeatureFlag::ALL
                .iter()
                .map(|flag| (*flag, builtin_weight(*flag)))
                .collect(),
        )
    }

    /// Builtin weights with `overrides` applied. Every override must be positive.
    pub fn with_overrides(overrides: &BTreeMap<FeatureFlag, u32>) -> Result<Self, ConfigError> {
        let mut weights = Self::builtin();
        for (flag, weight) in overrides {
            if *weight == 0 {
                return Err(ConfigError::NonPositiveWeight(*flag));
            }
            weights.0.insert(*flag, *weight);
        }
        Ok(weights)
    }

    pub fn weight(&self, flag: FeatureFlag) -> u32 {
        self.0.get(&flag).copied().unwrap_or_else(|| builtin_weight(flag))
    }

    /// Sum of the weights of every flag in `flags`, saturating at `u32::MAX`.
    pub fn total(&self, flags: &FeatureSet) -> u32 {
        flags
            .iter()
            .fold(0u32, |total, flag| total.saturating_add(self.weight(flag)))
    }
}

impl Default for FeatureWeights {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_sums_requested_flags() {
        let weights = FeatureWeights::builtin();
        let flags = FeatureSet::from([FeatureFlag::Screenshot, FeatureFlag::StealthProxy]);
        assert_eq!(weights.total(&flags), 30);
        assert_eq!(weights.total(&FeatureSet::new()), 0);
    }

    #[test]
    fn test_total_saturates_with_huge_overrides() {
        let overrides: BTreeMap<FeatureFlag, u32> =
            FeatureFlag::ALL.iter().map(|f| (*f, u32::MAX)).collect();
        let weights = FeatureWeights::with_overrides(&overrides).unwrap();
        let flags: FeatureSet = FeatureFlag::ALL.iter().copied().collect();
        assert_eq!(weights.total(&flags), u32::MAX);
    }

    #[test]
    fn test_overrides_replace_builtin() {
        let overrides = BTreeMap::from([(FeatureFlag::ExplicitWait, 40)]);
        let weights = FeatureWeights::with_overrides(&overrides).unwrap();
        assert_eq!(weights.weight(FeatureFlag::ExplicitWait), 40);
        assert_eq!(weights.weight(FeatureFlag::PdfOutput), 100);
    }

    #[test]
    fn test_zero_override_is_rejected() {
        let overrides = BTreeMap::from([(FeatureFlag::FastMode, 0)]);
        assert!(matches!(
            FeatureWeights::with_overrides(&overrides),
            Err(ConfigError::NonPositiveWeight(FeatureFlag::FastMode))
        ));
    }
}
