// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod backend;
mod config;
mod orchestration;
mod request;

pub use backend::{AttemptError, BackendError};
pub use config::ConfigError;
pub use orchestration::OrchestrationError;
pub use request::RequestError;
