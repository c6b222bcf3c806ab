// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! External endpoints that gate backend availability.
//!
//! A backend whose endpoint is missing is never registered. Endpoints come
//! from the config file and can be overridden from the environment:
//!
//! | field                  | environment variable          |
//! |------------------------|-------------------------------|
//! | `fire_engine_url`      | `FIRE_ENGINE_URL`             |
//! | `playwright_url`       | `PLAYWRIGHT_MICROSERVICE_URL` |
//! | `index_url`            | `INDEX_SERVICE_URL`           |
//! | `document_service_url` | `DOCUMENT_SERVICE_URL`        |

use serde::Deserialize;
use url::Url;

use crate::errors::ConfigError;
use crate::model::EndpointRequirement;

pub const FIRE_ENGINE_URL_VAR: &str = "FIRE_ENGINE_URL";
pub const PLAYWRIGHT_URL_VAR: &str = "PLAYWRIGHT_MICROSERVICE_URL";
pub const INDEX_URL_VAR: &str = "INDEX_SERVICE_URL";
pub const DOCUMENT_SERVICE_URL_VAR: &str = "DOCUMENT_SERVICE_URL";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Endpoints {
    #[serde(default)]
    pub fire_engine_url: Option<String>,
    #[serde(default)]
    pub playwright_url: Option<String>,
    #[serde(default)]
    pub index_url: Option<String>,
    #[serde(default)]
    pub document_service_url: Option<String>,
}

impl Endpoints {
    /// Endpoints read from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Endpoints read through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            fire_engine_url: lookup(FIRE_ENGINE_URL_VAR),
            playwright_url: lookup(PLAYWRIGHT_URL_VAR),
            index_url: lookup(INDEX_URL_VAR),
            document_service_url: lookup(DOCUMENT_SERVICE_URL_VAR),
        }
    }

    /// `self` with every endpoint set in `overrides` replaced.
    pub fn with_overrides(self, overrides: Endpoints) -> Self {
        Self {
            fire_engine_url: non_empty(overrides.fire_engine_url).or(self.fire_engine_url),
            playwright_url: non_empty(overrides.playwright_url).or(self.playwright_url),
            index_url: non_empty(overrides.index_url).or(self.index_url),
            document_service_url: non_empty(overrides.document_service_url)
                .or(self.document_service_url),
        }
    }

    /// `self` layered under the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(Self::from_env())
    }

    /// The configured URL for `requirement`, if any. Empty strings count as unset.
    pub fn get(&self, requirement: EndpointRequirement) -> Option<&str> {
        let value = match requirement {
            EndpointRequirement::None => return None,
            EndpointRequirement::FireEngine => &self.fire_engine_url,
            EndpointRequirement::Playwright => &self.playwright_url,
            EndpointRequirement::Index => &self.index_url,
            EndpointRequirement::DocumentService => &self.document_service_url,
        };
        value.as_deref().filter(|v| !v.trim().is_empty())
    }

    /// Whether a backend with `requirement` can be registered.
    pub fn satisfies(&self, requirement: EndpointRequirement) -> bool {
        requirement == EndpointRequirement::None || self.get(requirement).is_some()
    }

    /// Parse the configured URL for `requirement`.
    pub fn parsed(&self, requirement: EndpointRequirement) -> Result<Option<Url>, ConfigError> {
        let Some(raw) = self.get(requirement) else {
            return Ok(None);
        };
        Url::parse(raw)
            .map(Some)
            .map_err(|_| ConfigError::InvalidEndpoint {
                name: field_name(requirement),
                value: raw.to_string(),
            })
    }

    /// Check every configured endpoint parses as a URL.
    pub fn validate(&self) -> Vec<ConfigError> {
        [
            EndpointRequirement::FireEngine,
            EndpointRequirement::Playwright,
            EndpointRequirement::Index,
            EndpointRequirement::DocumentService,
        ]
        .into_iter()
        .filter_map(|requirement| self.parsed(requirement).err())
        .collect()
    }
}

pub(crate) fn field_name(requirement: EndpointRequirement) -> &'static str {
    match requirement {
        EndpointRequirement::None => "none",
        EndpointRequirement::FireEngine => "fire_engine_url",
        EndpointRequirement::Playwright => "playwright_url",
        EndpointRequirement::Index => "index_url",
        EndpointRequirement::DocumentService => "document_service_url",
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
