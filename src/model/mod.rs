// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Core data model: backends, feature flags, requests and results.

mod backend;
mod feature;
mod request;
mod response;

pub use backend::{Backend, EndpointRequirement, UnknownBackend};
pub use feature::{FeatureFlag, FeatureSet};
pub use request::{
    Action, Location, ProxyTier, RequestContext, ScrapeOptions, ScrollDirection,
    ACTION_ALLOWANCE, SELECTOR_WAIT_ALLOWANCE,
};
pub use response::{RawBackendResponse, ScrapeOutcome, ScrapeResult};
