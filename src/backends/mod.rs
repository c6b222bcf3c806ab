// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Backend adapter implementations.
//!
//! Each adapter implements [`BackendAdapter`] and talks to one external
//! service over HTTP. Adapters are bound to backend variants by
//! [`AdapterFactory`], which only creates adapters for backends that made it
//! into the capability registry.
//!
//! # Available Adapters
//!
//! - **FetchAdapter**: plain HTTP GET of the target URL from this process
//! - **RemoteAutomationAdapter**: one per fire-engine variant (chrome-cdp,
//!   playwright, tlsclient, with retry and stealth flavours)
//! - **PlaywrightAdapter**: the standalone playwright microservice
//! - **IndexAdapter**: lookup in the pre-crawled index, with or without documents
//! - **DocumentAdapter**: the PDF/DOCX extraction service
//!
//! ## Stub Adapters (Test-Only)
//! Scripted adapters with configurable delay, result and cancellation
//! behaviour, for driver tests. NOT available in production builds.
//!
//! # Architecture
//!
//! ```text
//! Endpoints + Registry → AdapterFactory → AdapterMap → Orchestrator
//! ```

pub mod document;
pub mod factory;
pub mod fetch;
mod http;
pub mod index;
pub mod playwright;
pub mod remote;
#[cfg(test)]
pub mod stub;

use std::collections::HashMap;
use std::sync::Arc;

use crate::model::Backend;
use crate::traits::BackendAdapter;

pub use document::DocumentAdapter;
pub use factory::AdapterFactory;
pub use fetch::FetchAdapter;
pub use index::IndexAdapter;
pub use playwright::PlaywrightAdapter;
pub use remote::RemoteAutomationAdapter;

/// Binding of backend variants to their adapters.
#[derive(Clone, Default)]
pub struct AdapterMap(pub HashMap<Backend, Arc<dyn BackendAdapter>>);

impl AdapterMap {
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    pub fn insert(&mut self, backend: Backend, adapter: Arc<dyn BackendAdapter>) {
        self.0.insert(backend, adapter);
    }

    /// Builder-style [`AdapterMap::insert`].
    pub fn with(mut self, backend: Backend, adapter: Arc<dyn BackendAdapter>) -> Self {
        self.insert(backend, adapter);
        self
    }

    pub fn get(&self, backend: Backend) -> Option<&Arc<dyn BackendAdapter>> {
        self.0.get(&backend)
    }

    pub fn contains(&self, backend: Backend) -> bool {
        self.0.contains_key(&backend)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Bound backends, sorted.
    pub fn backends(&self) -> Vec<Backend> {
        let mut backends: Vec<Backend> = self.0.keys().copied().collect();
        backends.sort();
        backends
    }
}

impl std::fmt::Debug for AdapterMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterMap")
            .field("adapter_count", &self.0.len())
            .field("backends", &self.backends())
            .finish()
    }
}

impl From<HashMap<Backend, Arc<dyn BackendAdapter>>> for AdapterMap {
    fn from(map: HashMap<Backend, Arc<dyn BackendAdapter>>) -> Self {
        Self(map)
    }
}
