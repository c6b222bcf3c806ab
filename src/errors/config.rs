// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::path::PathBuf;
use thiserror::Error;

use crate::model::{Backend, FeatureFlag};

/// Errors raised while loading configuration or building the router from it.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to parse TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("unsupported config format '{0}' (expected .yaml, .yml or .toml)")]
    UnsupportedFormat(String),

    #[error("feature weight for '{0}' must be positive")]
    NonPositiveWeight(FeatureFlag),

    #[error("time allowance for '{0}' must have a non-zero base")]
    ZeroTimeAllowance(Backend),

    #[error("fallback_timeout_ms must be greater than zero")]
    ZeroFallbackTimeout,

    #[error("backend '{0}' appears more than once in the registry")]
    DuplicateBackend(Backend),

    #[error("invalid endpoint URL for {name}: '{value}'")]
    InvalidEndpoint { name: &'static str, value: String },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),

    #[error("configuration validation failed:\n{}", join_lines(.0))]
    Invalid(Vec<ConfigError>),
}

fn join_lines(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}
