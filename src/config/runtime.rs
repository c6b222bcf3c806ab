// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use crate::backends::AdapterFactory;
use crate::config::{CapabilityRegistry, Endpoints, FeatureWeights, RouterConfig};
use crate::engine::{BudgetPolicy, Orchestrator, Ranker};
use crate::errors::ConfigError;

/// Router builder - assembles registry, weights, budget policy and adapters
/// from configuration.
///
/// Everything is built from one endpoint snapshot, so the registry and the
/// adapter map always agree on which backends exist.
///
/// # Examples
///
/// ```
/// use scrape_router::config::{Endpoints, RouterBuilder, RouterConfig};
/// use scrape_router::model::Backend;
///
/// let config = RouterConfig::default();
/// let orchestrator = RouterBuilder::from_config(&config, Endpoints::default()).unwrap();
///
/// // no endpoints configured: only the local fetch backend is available
/// assert_eq!(orchestrator.ranker().registry().backends(), vec![Backend::Fetch]);
/// assert!(orchestrator.adapters().contains(Backend::Fetch));
/// ```
pub struct RouterBuilder;

impl RouterBuilder {
    /// Build a ready-to-use [`Orchestrator`].
    ///
    /// `endpoints` usually comes from `cfg.endpoints` layered under the
    /// environment, see [`Endpoints::with_env_overrides`].
    pub fn from_config(cfg: &RouterConfig, endpoints: Endpoints) -> Result<Orchestrator, ConfigError> {
        let registry = CapabilityRegistry::from_config(cfg, &endpoints);
        let weights = FeatureWeights::with_overrides(&cfg.weights)?;
        let policy = BudgetPolicy::from_config(cfg)?;
        let adapters = AdapterFactory::from_endpoints(&endpoints, &registry)?;

        let ranker = Ranker::new(Arc::new(registry), Arc::new(weights));
        Ok(Orchestrator::new(ranker, policy, adapters))
    }
}
