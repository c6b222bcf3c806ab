// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! Log output is produced from message structs rather than ad-hoc format
//! strings. Each message implements `Display` for the human-readable line and
//! [`StructuredLog`](messages::StructuredLog) to emit it through `tracing` with
//! typed fields attached.
//!
//! Messages are organized by subsystem:
//! * `messages::config` - registry construction and configuration defaults
//! * `messages::ranking` - candidate ranking results
//! * `messages::driver` - execution driver attempts and terminal states
//!
//! # Usage
//!
//! ```rust
//! use scrape_router::observability::messages::StructuredLog;
//! use scrape_router::observability::messages::driver::AttemptStarted;
//! use scrape_router::model::Backend;
//! use std::time::Duration;
//!
//! AttemptStarted {
//!     backend: Backend::Fetch,
//!     attempt: 1,
//!     candidate_count: 2,
//!     timeout: Duration::from_secs(15),
//! }
//! .log();
//! ```

pub mod messages;
