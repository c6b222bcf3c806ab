// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod backends;   // backend adapters
pub mod config;     // config + registry
pub mod engine;     // ranking, budget, execution driver
pub mod errors;     // error handling
pub mod model;      // requests, backends, results
pub mod observability;
pub mod traits;     // adapter seam
