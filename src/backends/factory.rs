// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use reqwest::Client;
use std::sync::Arc;

use crate::backends::document::DocumentKind;
use crate::backends::{
    http, AdapterMap, DocumentAdapter, FetchAdapter, IndexAdapter, PlaywrightAdapter,
    RemoteAutomationAdapter,
};
use crate::config::{CapabilityRegistry, Endpoints};
use crate::errors::ConfigError;
use crate::model::{Backend, EndpointRequirement};
use crate::traits::BackendAdapter;

/// Binds backend variants to adapter implementations.
pub struct AdapterFactory;

impl AdapterFactory {
    /// Create an adapter for every backend in `registry`.
    ///
    /// Endpoint URLs are parsed here, so a malformed URL fails at startup
    /// rather than on the first request. Service adapters share one client.
    pub fn from_endpoints(
        endpoints: &Endpoints,
        registry: &CapabilityRegistry,
    ) -> Result<AdapterMap, ConfigError> {
        let client = http::service_client()?;
        let mut adapters = AdapterMap::new();

        for backend in registry.backends() {
            if let Some(adapter) = Self::create_adapter(backend, endpoints, &client)? {
                adapters.insert(backend, adapter);
            }
        }

        Ok(adapters)
    }

    /// Adapter for one backend, or `None` if its endpoint is not configured.
    ///
    /// - `index`, `index;documents` -> IndexAdapter
    /// - `fire-engine;*` -> RemoteAutomationAdapter
    /// - `playwright` -> PlaywrightAdapter
    /// - `fetch` -> FetchAdapter
    /// - `pdf`, `docx` -> DocumentAdapter
    pub fn create_adapter(
        backend: Backend,
        endpoints: &Endpoints,
        client: &Client,
    ) -> Result<Option<Arc<dyn BackendAdapter>>, ConfigError> {
        let requirement = backend.endpoint_requirement();
        if requirement == EndpointRequirement::None {
            return Ok(Some(Arc::new(FetchAdapter::new()?)));
        }
        let Some(base) = endpoints.parsed(requirement)? else {
            return Ok(None);
        };

        let adapter: Arc<dyn BackendAdapter> = match backend {
            Backend::Index => Arc::new(IndexAdapter::new(client.clone(), &base, false)),
            Backend::IndexDocuments => Arc::new(IndexAdapter::new(client.clone(), &base, true)),
            Backend::Playwright => Arc::new(PlaywrightAdapter::new(client.clone(), &base)),
            Backend::Pdf => Arc::new(DocumentAdapter::new(client.clone(), &base, DocumentKind::Pdf)),
            Backend::Docx => {
                Arc::new(DocumentAdapter::new(client.clone(), &base, DocumentKind::Docx))
            }
            Backend::Fetch => Arc::new(FetchAdapter::new()?),
            Backend::FireEngineChromeCdp
            | Backend::FireEngineChromeCdpRetry
            | Backend::FireEngineChromeCdpStealth
            | Backend::FireEnginePlaywright
            | Backend::FireEnginePlaywrightStealth
            | Backend::FireEngineTlsClient
            | Backend::FireEngineTlsClientStealth => {
                match RemoteAutomationAdapter::new(client.clone(), &base, backend) {
                    Some(adapter) => Arc::new(adapter),
                    None => return Ok(None),
                }
            }
        };

        Ok(Some(adapter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_every_registered_backend_gets_an_adapter() {
        let endpoints = Endpoints {
            fire_engine_url: Some("http://fire-engine:3000".into()),
            playwright_url: Some("http://playwright:3003".into()),
            index_url: Some("http://index:8080".into()),
            document_service_url: Some("http://docs:8081".into()),
        };
        let registry = CapabilityRegistry::from_endpoints(&endpoints, &BTreeMap::new(), &[]);
        let adapters = AdapterFactory::from_endpoints(&endpoints, &registry).unwrap();

        assert_eq!(adapters.len(), Backend::ALL.len());
        for backend in Backend::ALL {
            let adapter = adapters.get(backend).unwrap();
            assert_eq!(adapter.name(), backend.as_str());
        }
    }

    #[test]
    fn test_only_registry_backends_are_bound() {
        let endpoints = Endpoints {
            playwright_url: Some("http://playwright:3003".into()),
            ..Default::default()
        };
        let registry =
            CapabilityRegistry::from_endpoints(&endpoints, &BTreeMap::new(), &[Backend::Fetch]);
        let adapters = AdapterFactory::from_endpoints(&endpoints, &registry).unwrap();

        assert_eq!(adapters.backends(), vec![Backend::Playwright]);
    }

    #[test]
    fn test_invalid_endpoint_fails_at_startup() {
        let endpoints = Endpoints {
            index_url: Some("::not-a-url".into()),
            ..Default::default()
        };
        let registry = CapabilityRegistry::from_endpoints(&endpoints, &BTreeMap::new(), &[]);
        let result = AdapterFactory::from_endpoints(&endpoints, &registry);

        assert!(matches!(
            result,
            Err(ConfigError::InvalidEndpoint { name: "index_url", .. })
        ));
    }
}
