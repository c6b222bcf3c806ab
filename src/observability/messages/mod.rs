// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.

use tracing::Span;

pub mod config;
pub mod driver;
pub mod ranking;

/// A log message that knows its own level and structured fields.
pub trait StructuredLog {
    /// Emit the message at its designated level.
    fn log(&self);

    /// Open a span carrying the message's fields.
    fn span(&self, name: &str) -> Span;
}
