// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Time budget policy.
//!
//! Two limits bound every attempt: the backend's own allowance for this
//! request (`max_time`) and what is left of the overall budget. The attempt
//! gets whichever is smaller.

use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;

use crate::config::consts::{builtin_allowance, DEFAULT_FALLBACK_TIMEOUT};
use crate::config::{RouterConfig, TimeAllowanceConfig};
use crate::errors::ConfigError;
use crate::model::{Backend, RequestContext};
use crate::observability::messages::config::MissingTimeAllowance;
use crate::observability::messages::StructuredLog;

/// How long a backend may take for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeAllowance {
    pub base: Duration,
    /// Add the request's explicit wait.
    pub include_wait: bool,
    /// Add the allowance of every action in the request's action sequence.
    pub include_actions: bool,
}

impl TimeAllowance {
    pub fn new(base: Duration, include_wait: bool, include_actions: bool) -> Self {
        Self {
            base,
            include_wait,
            include_actions,
        }
    }

    /// An allowance that does not grow with the request.
    pub fn fixed(base: Duration) -> Self {
        Self::new(base, false, false)
    }

    pub fn builtin(backend: Backend) -> Self {
        let (base, include_wait, include_actions) = builtin_allowance(backend);
        Self::new(base, include_wait, include_actions)
    }

    pub fn max_time(&self, request: &RequestContext) -> Duration {
        let mut total = self.base;
        if self.include_wait {
            total = total.saturating_add(request.wait_for());
        }
        if self.include_actions {
            total = total.saturating_add(request.actions_allowance());
        }
        total
    }
}

impl From<&TimeAllowanceConfig> for TimeAllowance {
    fn from(cfg: &TimeAllowanceConfig) -> Self {
        Self::new(
            Duration::from_millis(cfg.base_ms),
            cfg.include_wait,
            cfg.include_actions,
        )
    }
}

/// Per-backend allowances plus the default overall budget.
#[derive(Debug, Clone)]
pub struct BudgetPolicy {
    allowances: HashMap<Backend, TimeAllowance>,
    fallback: Duration,
    default_budget: Option<Duration>,
}

impl BudgetPolicy {
    /// Explicit allowances; backends not listed fall back to `fallback`.
    pub fn new(allowances: HashMap<Backend, TimeAllowance>, fallback: Duration) -> Self {
        Self {
            allowances,
            fallback,
            default_budget: None,
        }
    }

    /// Builtin allowance for every backend, no default budget.
    pub fn builtin() -> Self {
        Self::new(
            Backend::ALL
                .iter()
                .map(|b| (*b, TimeAllowance::builtin(*b)))
                .collect(),
            DEFAULT_FALLBACK_TIMEOUT,
        )
    }

    /// Builtin allowances with the overrides, fallback and default budget of `cfg`.
    pub fn from_config(cfg: &RouterConfig) -> Result<Self, ConfigError> {
        if cfg.fallback_timeout_ms == Some(0) {
            return Err(ConfigError::ZeroFallbackTimeout);
        }

        let mut policy = Self::builtin();
        for (backend, allowance) in &cfg.time_allowances {
            if allowance.base_ms == 0 {
                return Err(ConfigError::ZeroTimeAllowance(*backend));
            }
            policy.allowances.insert(*backend, allowance.into());
        }
        policy.fallback = cfg.fallback_timeout();
        policy.default_budget = cfg.default_timeout();
        Ok(policy)
    }

    /// Overall budget for requests that carry no timeout.
    pub fn with_default_budget(mut self, budget: Option<Duration>) -> Self {
        self.default_budget = budget;
        self
    }

    pub fn allowance(&self, backend: Backend) -> Option<&TimeAllowance> {
        self.allowances.get(&backend)
    }

    pub fn fallback(&self) -> Duration {
        self.fallback
    }

    /// Longest `backend` may take for `request`.
    pub fn max_time(&self, backend: Backend, request: &RequestContext) -> Duration {
        match self.allowances.get(&backend) {
            Some(allowance) => allowance.max_time(request),
            None => {
                MissingTimeAllowance {
                    backend,
                    fallback: self.fallback,
                }
                .log();
                self.fallback
            }
        }
    }

    /// Timeout for one attempt: `min(max_time, remaining)`.
    ///
    /// `remaining` of `None` means the overall budget is unbounded.
    pub fn effective_timeout(
        &self,
        backend: Backend,
        request: &RequestContext,
        remaining: Option<Duration>,
    ) -> Duration {
        let max_time = self.max_time(backend, request);
        match remaining {
            Some(remaining) => max_time.min(remaining),
            None => max_time,
        }
    }

    /// Start the overall budget for `request`.
    ///
    /// The request's own timeout wins over the configured default.
    pub fn start(&self, request: &RequestContext) -> TimeBudget {
        TimeBudget::start(request.timeout().or(self.default_budget))
    }
}

impl Default for BudgetPolicy {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Overall time budget of one orchestration, measured on the tokio clock.
#[derive(Debug, Clone, Copy)]
pub struct TimeBudget {
    started: Instant,
    limit: Option<Duration>,
}

impl TimeBudget {
    pub fn start(limit: Option<Duration>) -> Self {
        Self {
            started: Instant::now(),
            limit,
        }
    }

    pub fn unbounded() -> Self {
        Self::start(None)
    }

    pub fn limit(&self) -> Option<Duration> {
        self.limit
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Time left, or `None` when unbounded. Never negative.
    pub fn remaining(&self) -> Option<Duration> {
        self.limit
            .map(|limit| limit.saturating_sub(self.started.elapsed()))
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining().is_some_and(|r| r.is_zero())
    }
}
