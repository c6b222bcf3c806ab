// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The capability registry: which backends exist, how good they are, and what
//! they can do.
//!
//! The registry is built once at startup and only ever read afterwards. It
//! contains only backends whose external endpoint is configured, so nothing
//! downstream needs to ask whether a backend is available.

use std::collections::{BTreeMap, HashSet};

use crate::config::consts::{builtin_quality, builtin_supports};
use crate::config::endpoints::{field_name, Endpoints};
use crate::config::loader::RouterConfig;
use crate::errors::ConfigError;
use crate::model::{Backend, FeatureFlag, FeatureSet};
use crate::observability::messages::config::{BackendUnavailable, RegistryBuilt};
use crate::observability::messages::StructuredLog;

/// Static description of one backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendProfile {
    pub backend: Backend,
    /// Positive for general-purpose backends, non-positive for specialty or
    /// last-resort ones.
    pub quality: i32,
    pub supports: FeatureSet,
}

impl BackendProfile {
    pub fn new(backend: Backend, quality: i32) -> Self {
        Self {
            backend,
            quality,
            supports: FeatureSet::new(),
        }
    }

    /// Builtin profile of `backend`.
    pub fn builtin(backend: Backend) -> Self {
        Self {
            backend,
            quality: builtin_quality(backend),
            supports: builtin_supports(backend).iter().copied().collect(),
        }
    }

    /// Add supported flags.
    pub fn supporting<I>(mut self, flags: I) -> Self
    where
        I: IntoIterator<Item = FeatureFlag>,
    {
        for flag in flags {
            self.supports.insert(flag);
        }
        self
    }

    pub fn supports(&self, flag: FeatureFlag) -> bool {
        self.supports.contains(flag)
    }
}

/// Ordered, immutable set of backend profiles.
///
/// Registry order is the final tie-break when ranking.
///
/// # Example
/// ```
/// use scrape_router::config::{BackendProfile, CapabilityRegistry};
/// use scrape_router::model::{Backend, FeatureFlag};
///
/// let registry = CapabilityRegistry::from_profiles(vec![
///     BackendProfile::new(Backend::Fetch, 5),
///     BackendProfile::new(Backend::Playwright, 20).supporting([FeatureFlag::Screenshot]),
/// ])
/// .unwrap();
///
/// assert_eq!(registry.len(), 2);
/// assert!(registry.profile(Backend::Playwright).unwrap().supports(FeatureFlag::Screenshot));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityRegistry {
    profiles: Vec<BackendProfile>,
}

impl CapabilityRegistry {
    /// Every backend with its builtin profile, regardless of endpoints.
    pub fn builtin() -> Self {
        Self {
            profiles: Backend::ALL.iter().map(|b| BackendProfile::builtin(*b)).collect(),
        }
    }

    /// Registry from explicit profiles, in the given order.
    pub fn from_profiles(profiles: Vec<BackendProfile>) -> Result<Self, ConfigError> {
        let mut seen = HashSet::new();
        for profile in &profiles {
            if !seen.insert(profile.backend) {
                return Err(ConfigError::DuplicateBackend(profile.backend));
            }
        }
        Ok(Self { profiles })
    }

    /// Registry for `cfg`, gated by `endpoints`.
    pub fn from_config(cfg: &RouterConfig, endpoints: &Endpoints) -> Self {
        Self::from_endpoints(endpoints, &cfg.qualities, &cfg.disabled_backends)
    }

    /// Builtin registry filtered by configured endpoints.
    ///
    /// Backends whose endpoint is missing, or which appear in `disabled`, are
    /// left out entirely. `qualities` replaces the builtin quality of the
    /// backends it names.
    pub fn from_endpoints(
        endpoints: &Endpoints,
        qualities: &BTreeMap<Backend, i32>,
        disabled: &[Backend],
    ) -> Self {
        let mut profiles = Vec::new();

        for backend in Backend::ALL {
            let requirement = backend.endpoint_requirement();
            if !endpoints.satisfies(requirement) {
                let reason = format!("{} is not configured", field_name(requirement));
                BackendUnavailable {
                    backend,
                    reason: &reason,
                }
                .log();
                continue;
            }
            if disabled.contains(&backend) {
                BackendUnavailable {
                    backend,
                    reason: "disabled in configuration",
                }
                .log();
                continue;
            }

            let mut profile = BackendProfile::builtin(backend);
            if let Some(quality) = qualities.get(&backend) {
                profile.quality = *quality;
            }
            profiles.push(profile);
        }

        let registry = Self { profiles };
        RegistryBuilt {
            backends: &registry.backends(),
        }
        .log();
        registry
    }

    pub fn profiles(&self) -> &[BackendProfile] {
        &self.profiles
    }

    pub fn profile(&self, backend: Backend) -> Option<&BackendProfile> {
        self.profiles.iter().find(|p| p.backend == backend)
    }

    pub fn contains(&self, backend: Backend) -> bool {
        self.profile(backend).is_some()
    }

    /// Registered backends in registry order.
    pub fn backends(&self) -> Vec<Backend> {
        self.profiles.iter().map(|p| p.backend).collect()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
