// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Backend identifiers.
//!
//! A `Backend` names one concrete scraping strategy. The set is closed: new
//! strategies are added here, bound to an adapter in
//! [`AdapterFactory`](crate::backends::AdapterFactory), and given a profile in
//! the builtin [`CapabilityRegistry`](crate::config::CapabilityRegistry).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which external endpoint a backend needs before it can be registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointRequirement {
    /// Runs in-process, always available.
    None,
    /// Remote browser automation farm.
    FireEngine,
    /// Playwright microservice.
    Playwright,
    /// Pre-built content index.
    Index,
    /// PDF/DOCX extraction service.
    DocumentService,
}

/// A concrete scraping strategy.
///
/// # Example
/// ```
/// use scrape_router::model::Backend;
///
/// let backend: Backend = "fire-engine;chrome-cdp".parse().unwrap();
/// assert_eq!(backend, Backend::FireEngineChromeCdp);
/// assert_eq!(backend.to_string(), "fire-engine;chrome-cdp");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Backend {
    #[serde(rename = "index")]
    Index,
    #[serde(rename = "index;documents")]
    IndexDocuments,
    #[serde(rename = "fire-engine;chrome-cdp")]
    FireEngineChromeCdp,
    #[serde(rename = "fire-engine(retry);chrome-cdp")]
    FireEngineChromeCdpRetry,
    #[serde(rename = "fire-engine;chrome-cdp;stealth")]
    FireEngineChromeCdpStealth,
    #[serde(rename = "fire-engine;playwright")]
    FireEnginePlaywright,
    #[serde(rename = "fire-engine;playwright;stealth")]
    FireEnginePlaywrightStealth,
    #[serde(rename = "fire-engine;tlsclient")]
    FireEngineTlsClient,
    #[serde(rename = "fire-engine;tlsclient;stealth")]
    FireEngineTlsClientStealth,
    #[serde(rename = "playwright")]
    Playwright,
    #[serde(rename = "fetch")]
    Fetch,
    #[serde(rename = "pdf")]
    Pdf,
    #[serde(rename = "docx")]
    Docx,
}

impl Backend {
    /// Every backend, in default registry order.
    pub const ALL: [Backend; 13] = [
        Backend::Index,
        Backend::IndexDocuments,
        Backend::FireEngineChromeCdp,
        Backend::FireEngineChromeCdpRetry,
        Backend::FireEngineChromeCdpStealth,
        Backend::FireEnginePlaywright,
        Backend::FireEnginePlaywrightStealth,
        Backend::FireEngineTlsClient,
        Backend::FireEngineTlsClientStealth,
        Backend::Playwright,
        Backend::Fetch,
        Backend::Pdf,
        Backend::Docx,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Index => "index",
            Backend::IndexDocuments => "index;documents",
            Backend::FireEngineChromeCdp => "fire-engine;chrome-cdp",
            Backend::FireEngineChromeCdpRetry => "fire-engine(retry);chrome-cdp",
            Backend::FireEngineChromeCdpStealth => "fire-engine;chrome-cdp;stealth",
            Backend::FireEnginePlaywright => "fire-engine;playwright",
            Backend::FireEnginePlaywrightStealth => "fire-engine;playwright;stealth",
            Backend::FireEngineTlsClient => "fire-engine;tlsclient",
            Backend::FireEngineTlsClientStealth => "fire-engine;tlsclient;stealth",
            Backend::Playwright => "playwright",
            Backend::Fetch => "fetch",
            Backend::Pdf => "pdf",
            Backend::Docx => "docx",
        }
    }

    /// The external endpoint that must be configured for this backend to exist.
    pub fn endpoint_requirement(&self) -> EndpointRequirement {
        match self {
            Backend::Index | Backend::IndexDocuments => EndpointRequirement::Index,
            Backend::FireEngineChromeCdp
            | Backend::FireEngineChromeCdpRetry
            | Backend::FireEngineChromeCdpStealth
            | Backend::FireEnginePlaywright
            | Backend::FireEnginePlaywrightStealth
            | Backend::FireEngineTlsClient
            | Backend::FireEngineTlsClientStealth => EndpointRequirement::FireEngine,
            Backend::Playwright => EndpointRequirement::Playwright,
            Backend::Fetch => EndpointRequirement::None,
            Backend::Pdf | Backend::Docx => EndpointRequirement::DocumentService,
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a backend name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown backend '{0}'")]
pub struct UnknownBackend(pub String);

impl FromStr for Backend {
    type Err = UnknownBackend;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Backend::ALL
            .iter()
            .find(|backend| backend.as_str() == s)
            .copied()
            .ok_or_else(|| UnknownBackend(s.to_string()))
    }
}
