// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::config::consts::DEFAULT_FALLBACK_TIMEOUT;
use crate::config::endpoints::Endpoints;
use crate::errors::ConfigError;
use crate::model::{Backend, FeatureFlag};

/// Main configuration structure for the scrape router.
///
/// Every section is optional. An empty file yields the builtin tables with
/// only the `fetch` backend available.
///
/// # Fields
/// * `endpoints` - URLs of the external services that gate backend availability
/// * `default_timeout_ms` - Budget for requests that carry no timeout of their own
/// * `fallback_timeout_ms` - Per-attempt timeout used when a backend has no time allowance
/// * `qualities` - Override the static quality of individual backends
/// * `weights` - Override the priority weight of individual feature flags
/// * `time_allowances` - Override the time allowance of individual backends
/// * `disabled_backends` - Backends never to register, even when their endpoint is set
///
/// # Example
/// ```yaml
/// endpoints:
///   fire_engine_url: http://fire-engine:3000
///   playwright_url: http://playwright-service:3003
/// default_timeout_ms: 60000
/// qualities:
///   fetch: 15
/// weights:
///   explicit-wait: 5
/// time_allowances:
///   playwright:
///     base_ms: 20000
///     include_wait: true
/// disabled_backends:
///   - "fire-engine;tlsclient;stealth"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouterConfig {
    #[serde(default)]
    pub endpoints: Endpoints,
    #[serde(default)]
    pub default_timeout_ms: Option<u64>,
    #[serde(default)]
    pub fallback_timeout_ms: Option<u64>,
    #[serde(default)]
    pub qualities: BTreeMap<Backend, i32>,
    #[serde(default)]
    pub weights: BTreeMap<FeatureFlag, u32>,
    #[serde(default)]
    pub time_allowances: BTreeMap<Backend, TimeAllowanceConfig>,
    #[serde(default)]
    pub disabled_backends: Vec<Backend>,
}

/// Time allowance override for one backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimeAllowanceConfig {
    pub base_ms: u64,
    #[serde(default)]
    pub include_wait: bool,
    #[serde(default)]
    pub include_actions: bool,
}

impl RouterConfig {
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Budget applied to requests without their own timeout, if any.
    pub fn default_timeout(&self) -> Option<Duration> {
        self.default_timeout_ms.map(Duration::from_millis)
    }

    pub fn fallback_timeout(&self) -> Duration {
        self.fallback_timeout_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_FALLBACK_TIMEOUT)
    }

    /// Check the configuration for values the router cannot work with.
    ///
    /// All problems are reported at once, wrapped in [`ConfigError::Invalid`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        for (flag, weight) in &self.weights {
            if *weight == 0 {
                errors.push(ConfigError::NonPositiveWeight(*flag));
            }
        }

        if self.fallback_timeout_ms == Some(0) {
            errors.push(ConfigError::ZeroFallbackTimeout);
        }

        for (backend, allowance) in &self.time_allowances {
            if allowance.base_ms == 0 {
                errors.push(ConfigError::ZeroTimeAllowance(*backend));
            }
        }

        errors.extend(self.endpoints.validate());

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(errors))
        }
    }
}

/// Load a config file, choosing the format by extension (`.yaml`, `.yml` or `.toml`).
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<RouterConfig, ConfigError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    match extension.as_str() {
        "yaml" | "yml" => RouterConfig::from_yaml_str(&content),
        "toml" => RouterConfig::from_toml_str(&content),
        _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
    }
}

/// Load a config file and validate it.
pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> Result<RouterConfig, ConfigError> {
    let cfg = load_config(path)?;
    cfg.validate()?;
    Ok(cfg)
}
