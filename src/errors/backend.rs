// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors for a single backend invocation.
//!
//! These never reach the caller on their own. The execution driver records
//! each one against the backend that produced it and moves on to the next
//! candidate; they surface only inside an
//! [`OrchestrationError`](super::OrchestrationError).

use std::time::Duration;
use thiserror::Error;

use crate::model::Backend;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The invocation did not finish within its effective timeout.
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// The backend service could not be reached or the connection failed.
    #[error("transport error: {0}")]
    Transport(String),

    /// The backend service answered with a non-success status of its own.
    #[error("backend service rejected the job with status {status}: {message}")]
    Rejected { status: u16, message: String },

    /// The backend answered but the payload is not a usable result.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// No adapter is bound to this backend.
    #[error("no adapter configured")]
    NotConfigured,

    /// The invocation observed cancellation and stopped.
    #[error("cancelled")]
    Cancelled,

    /// The backend ran and reported a failure.
    #[error("{0}")]
    Failed(String),
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            BackendError::Malformed(err.to_string())
        } else {
            BackendError::Transport(err.to_string())
        }
    }
}

/// One failed attempt: which backend, and what went wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptError {
    pub backend: Backend,
    pub error: BackendError,
}

impl AttemptError {
    pub fn new(backend: Backend, error: BackendError) -> Self {
        Self { backend, error }
    }

    /// Render a list of attempts as `backend: error; backend: error`.
    pub fn summarize(attempts: &[AttemptError]) -> String {
        if attempts.is_empty() {
            return "no attempts".to_string();
        }
        attempts
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl std::fmt::Display for AttemptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.backend, self.error)
    }
}
