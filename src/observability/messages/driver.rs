// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the execution driver.
//!
//! One orchestration emits `OrchestrationStarted`, then an `AttemptStarted`
//! per candidate followed by either `AttemptFailed` or `AttemptSucceeded`, and
//! finally `OrchestrationFailed` if no attempt succeeded.

use crate::errors::{BackendError, OrchestrationError};
use crate::model::{Backend, FeatureSet};
use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// Orchestration of one request began.
///
/// # Log Level
/// `info!` - Important operational event
pub struct OrchestrationStarted<'a> {
    pub url: &'a str,
    pub flags: &'a FeatureSet,
    pub budget: Option<Duration>,
}

impl Display for OrchestrationStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self.budget {
            Some(budget) => write!(
                f,
                "Scraping {} with features {} under a {:?} budget",
                self.url, self.flags, budget
            ),
            None => write!(
                f,
                "Scraping {} with features {} without a time budget",
                self.url, self.flags
            ),
        }
    }
}

impl StructuredLog for OrchestrationStarted<'_> {
    fn log(&self) {
        tracing::info!(
            url = self.url,
            budget_ms = self.budget.map(|b| b.as_millis() as u64),
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "orchestration",
            span_name = name,
            url = self.url,
            flags = %self.flags,
        )
    }
}

/// A backend invocation is about to start.
///
/// # Log Level
/// `debug!` - Per-attempt detail
pub struct AttemptStarted {
    pub backend: Backend,
    pub attempt: usize,
    pub candidate_count: usize,
    pub timeout: Duration,
}

impl Display for AttemptStarted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Attempt {}/{}: invoking '{}' with timeout {:?}",
            self.attempt, self.candidate_count, self.backend, self.timeout
        )
    }
}

impl StructuredLog for AttemptStarted {
    fn log(&self) {
        tracing::debug!(
            backend = self.backend.as_str(),
            attempt = self.attempt,
            timeout_ms = self.timeout.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "attempt",
            span_name = name,
            backend = self.backend.as_str(),
            attempt = self.attempt,
        )
    }
}

/// A backend invocation failed; the driver moves on.
///
/// # Log Level
/// `warn!` - Recovered locally, but worth attention
pub struct AttemptFailed<'a> {
    pub backend: Backend,
    pub attempt: usize,
    pub error: &'a BackendError,
    pub duration: Duration,
}

impl Display for AttemptFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Attempt {} with '{}' failed after {:?}: {}",
            self.attempt, self.backend, self.duration, self.error
        )
    }
}

impl StructuredLog for AttemptFailed<'_> {
    fn log(&self) {
        tracing::warn!(
            backend = self.backend.as_str(),
            attempt = self.attempt,
            duration_ms = self.duration.as_millis() as u64,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "attempt_failed",
            span_name = name,
            backend = self.backend.as_str(),
            attempt = self.attempt,
        )
    }
}

/// A backend produced a valid result.
///
/// # Log Level
/// `info!` - Important operational event
pub struct AttemptSucceeded<'a> {
    pub backend: Backend,
    pub attempt: usize,
    pub status_code: u16,
    pub duration: Duration,
    pub unsupported: &'a FeatureSet,
}

impl Display for AttemptSucceeded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Backend '{}' succeeded on attempt {} with status {} in {:?}",
            self.backend, self.attempt, self.status_code, self.duration
        )?;
        if !self.unsupported.is_empty() {
            write!(f, " (dropped features {})", self.unsupported)?;
        }
        Ok(())
    }
}

impl StructuredLog for AttemptSucceeded<'_> {
    fn log(&self) {
        tracing::info!(
            backend = self.backend.as_str(),
            attempt = self.attempt,
            status_code = self.status_code,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "attempt_succeeded",
            span_name = name,
            backend = self.backend.as_str(),
        )
    }
}

/// The orchestration ended without a result.
///
/// # Log Level
/// `error!` for real failures, `info!` for caller cancellation
pub struct OrchestrationFailed<'a> {
    pub error: &'a OrchestrationError,
    pub elapsed: Duration,
}

impl Display for OrchestrationFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Scrape failed after {:?}: {}", self.elapsed, self.error)
    }
}

impl StructuredLog for OrchestrationFailed<'_> {
    fn log(&self) {
        if matches!(self.error, OrchestrationError::Cancelled { .. }) {
            tracing::info!(kind = self.error.kind(), "{}", self);
        } else {
            tracing::error!(
                kind = self.error.kind(),
                attempts = self.error.attempts().len(),
                elapsed_ms = self.elapsed.as_millis() as u64,
                "{}", self
            );
        }
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "orchestration_failed",
            span_name = name,
            kind = self.error.kind(),
        )
    }
}
