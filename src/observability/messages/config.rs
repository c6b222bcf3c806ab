// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for registry construction and configuration defaults.

use crate::model::Backend;
use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// A backend was left out of the registry.
///
/// # Log Level
/// `debug!` - Expected whenever an optional endpoint is not configured
pub struct BackendUnavailable<'a> {
    pub backend: Backend,
    pub reason: &'a str,
}

impl Display for BackendUnavailable<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Backend '{}' not registered: {}", self.backend, self.reason)
    }
}

impl StructuredLog for BackendUnavailable<'_> {
    fn log(&self) {
        tracing::debug!(
            backend = self.backend.as_str(),
            reason = self.reason,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "backend_unavailable",
            span_name = name,
            backend = self.backend.as_str(),
        )
    }
}

/// The capability registry is ready.
///
/// # Log Level
/// `info!` - Emitted once at startup
pub struct RegistryBuilt<'a> {
    pub backends: &'a [Backend],
}

impl Display for RegistryBuilt<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let names: Vec<&str> = self.backends.iter().map(Backend::as_str).collect();
        write!(
            f,
            "Capability registry built with {} backends: [{}]",
            self.backends.len(),
            names.join(", ")
        )
    }
}

impl StructuredLog for RegistryBuilt<'_> {
    fn log(&self) {
        tracing::info!(backend_count = self.backends.len(), "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "registry_built",
            span_name = name,
            backend_count = self.backends.len(),
        )
    }
}

/// A backend has no time allowance and the fallback is used instead.
///
/// # Log Level
/// `warn!` - Configuration defect
pub struct MissingTimeAllowance {
    pub backend: Backend,
    pub fallback: Duration,
}

impl Display for MissingTimeAllowance {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "No time allowance configured for backend '{}', using fallback of {:?}",
            self.backend, self.fallback
        )
    }
}

impl StructuredLog for MissingTimeAllowance {
    fn log(&self) {
        tracing::warn!(
            backend = self.backend.as_str(),
            fallback_ms = self.fallback.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "missing_time_allowance",
            span_name = name,
            backend = self.backend.as_str(),
        )
    }
}
