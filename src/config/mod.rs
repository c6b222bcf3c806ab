// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod consts;
mod endpoints;
mod loader;
mod registry;
mod runtime;
mod weights;

#[cfg(test)]
mod integration_tests;

pub use endpoints::{
    Endpoints, DOCUMENT_SERVICE_URL_VAR, FIRE_ENGINE_URL_VAR, INDEX_URL_VAR, PLAYWRIGHT_URL_VAR,
};
pub use loader::{load_and_validate_config, load_config, RouterConfig, TimeAllowanceConfig};
pub use registry::{BackendProfile, CapabilityRegistry};
pub use runtime::RouterBuilder;
pub use weights::FeatureWeights;
