// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Remote browser automation service (fire-engine).
//!
//! One service hosts several engines. Each fire-engine backend variant gets
//! its own adapter instance that names its engine, proxy tier and retry mode
//! in the job it submits to `{fire_engine_url}/scrape`.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::backends::http;
use crate::errors::BackendError;
use crate::model::{Action, Backend, Location, ProxyTier, RawBackendResponse, RequestContext};
use crate::traits::BackendAdapter;

/// Engine hosted by the automation service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Engine {
    ChromeCdp,
    Playwright,
    #[serde(rename = "tlsclient")]
    TlsClient,
}

/// How a fire-engine backend variant drives the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineVariant {
    pub engine: Engine,
    pub proxy: ProxyTier,
    /// Ask the service for a fresh session instead of a pooled one.
    pub retry: bool,
}

impl EngineVariant {
    /// Variant for `backend`, or `None` if it is not a fire-engine backend.
    pub fn for_backend(backend: Backend) -> Option<Self> {
        let (engine, proxy, retry) = match backend {
            Backend::FireEngineChromeCdp => (Engine::ChromeCdp, ProxyTier::Basic, false),
            Backend::FireEngineChromeCdpRetry => (Engine::ChromeCdp, ProxyTier::Basic, true),
            Backend::FireEngineChromeCdpStealth => (Engine::ChromeCdp, ProxyTier::Stealth, false),
            Backend::FireEnginePlaywright => (Engine::Playwright, ProxyTier::Basic, false),
            Backend::FireEnginePlaywrightStealth => {
                (Engine::Playwright, ProxyTier::Stealth, false)
            }
            Backend::FireEngineTlsClient => (Engine::TlsClient, ProxyTier::Basic, false),
            Backend::FireEngineTlsClientStealth => (Engine::TlsClient, ProxyTier::Stealth, false),
            _ => return None,
        };
        Some(Self {
            engine,
            proxy,
            retry,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScrapeJob<'a> {
    url: &'a str,
    engine: Engine,
    proxy: ProxyTier,
    retry: bool,
    timeout_ms: u64,
    #[serde(skip_serializing_if = "no_headers")]
    headers: &'a BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    wait_ms: Option<u64>,
    #[serde(skip_serializing_if = "no_actions")]
    actions: &'a [Action],
    screenshot: bool,
    full_page_screenshot: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    geolocation: Option<&'a Location>,
    mobile: bool,
    skip_tls_verification: bool,
    block_ads: bool,
    capture_raw_response: bool,
    fast_mode: bool,
}

fn no_headers(headers: &&BTreeMap<String, String>) -> bool {
    headers.is_empty()
}

fn no_actions(actions: &&[Action]) -> bool {
    actions.is_empty()
}

pub struct RemoteAutomationAdapter {
    client: Client,
    scrape_url: Url,
    backend: Backend,
    variant: EngineVariant,
}

impl RemoteAutomationAdapter {
    /// Adapter for the fire-engine `backend` at `base`, or `None` if
    /// `backend` is not hosted by fire-engine.
    pub fn new(client: Client, base: &Url, backend: Backend) -> Option<Self> {
        let variant = EngineVariant::for_backend(backend)?;
        Some(Self {
            client,
            scrape_url: http::endpoint(base, "scrape"),
            backend,
            variant,
        })
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    pub fn variant(&self) -> EngineVariant {
        self.variant
    }

    fn job<'a>(&self, request: &'a RequestContext, timeout: Duration) -> ScrapeJob<'a> {
        let options = request.options();
        // only chrome-cdp runs action sequences
        let actions: &[Action] = if self.variant.engine == Engine::ChromeCdp {
            &options.actions
        } else {
            &[]
        };

        ScrapeJob {
            url: request.url().as_str(),
            engine: self.variant.engine,
            proxy: self.variant.proxy,
            retry: self.variant.retry,
            timeout_ms: timeout.as_millis() as u64,
            headers: &options.headers,
            wait_ms: options.wait_for_ms.filter(|ms| *ms > 0),
            actions,
            screenshot: options.screenshot || options.full_page_screenshot,
            full_page_screenshot: options.full_page_screenshot,
            geolocation: options.location.as_ref(),
            mobile: options.mobile,
            skip_tls_verification: options.skip_tls_verification,
            block_ads: options.block_ads,
            capture_raw_response: options.capture_raw_response,
            fast_mode: options.fast_mode,
        }
    }
}

#[async_trait]
impl BackendAdapter for RemoteAutomationAdapter {
    async fn scrape(
        &self,
        request: &RequestContext,
        timeout: Duration,
        cancel: CancellationToken,
    ) -> Result<RawBackendResponse, BackendError> {
        let job = self.job(request, timeout);
        let builder = self.client.post(self.scrape_url.clone()).json(&job);

        let response = http::send(builder, timeout, &cancel).await?;
        let mut raw = http::service_response(response, timeout, &cancel).await?;
        if raw.proxy_used.is_none() {
            raw.proxy_used = Some(self.variant.proxy);
        }
        Ok(raw)
    }

    fn name(&self) -> &'static str {
        self.backend.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ScrapeOptions;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn adapter(server: &MockServer, backend: Backend) -> RemoteAutomationAdapter {
        let base = Url::parse(&server.uri()).unwrap();
        RemoteAutomationAdapter::new(Client::new(), &base, backend).unwrap()
    }

    fn request() -> RequestContext {
        let mut options = ScrapeOptions::new("https://example.com/pricing");
        options.wait_for_ms = Some(500);
        options.actions = vec![Action::Click {
            selector: "#accept".into(),
        }];
        options.screenshot = true;
        RequestContext::new(options).unwrap()
    }

    #[test]
    fn test_only_fire_engine_backends_have_variants() {
        for backend in Backend::ALL {
            let is_fire_engine = backend.as_str().starts_with("fire-engine");
            assert_eq!(
                EngineVariant::for_backend(backend).is_some(),
                is_fire_engine,
                "{}",
                backend
            );
        }
        let base = Url::parse("http://fire-engine:3000").unwrap();
        assert!(RemoteAutomationAdapter::new(Client::new(), &base, Backend::Fetch).is_none());
    }

    #[tokio::test]
    async fn test_chrome_cdp_job_carries_actions() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/scrape"))
            .and(body_partial_json(json!({
                "url": "https://example.com/pricing",
                "engine": "chrome-cdp",
                "proxy": "basic",
                "retry": true,
                "waitMs": 500,
                "actions": [{"type": "click", "selector": "#accept"}],
                "screenshot": true,
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "content": "<html>pricing</html>",
                "pageStatusCode": 200,
                "contentType": "text/html",
                "screenshot": "https://cdn.example/shot.png",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let raw = adapter(&server, Backend::FireEngineChromeCdpRetry)
            .scrape(&request(), Duration::from_secs(10), CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(raw.content.as_deref(), Some("<html>pricing</html>"));
        assert_eq!(raw.status_code, Some(200));
        assert_eq!(raw.screenshot.as_deref(), Some("https://cdn.example/shot.png"));
        assert_eq!(raw.proxy_used, Some(ProxyTier::Basic));
    }

    #[tokio::test]
    async fn test_tlsclient_stealth_job_omits_actions() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/scrape"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "content": "ok",
                "pageStatusCode": 200,
            })))
            .mount(&server)
            .await;

        let adapter = adapter(&server, Backend::FireEngineTlsClientStealth);
        let request = request();
        let job = serde_json::to_value(adapter.job(&request, Duration::from_secs(15))).unwrap();
        assert_eq!(job["engine"], "tlsclient");
        assert_eq!(job["proxy"], "stealth");
        assert_eq!(job["timeoutMs"], 15000);
        assert!(job.get("actions").is_none());

        let raw = adapter
            .scrape(&request, Duration::from_secs(15), CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(raw.proxy_used, Some(ProxyTier::Stealth));
    }

    #[tokio::test]
    async fn test_service_error_is_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("engine pool exhausted"))
            .mount(&server)
            .await;

        let err = adapter(&server, Backend::FireEngineChromeCdp)
            .scrape(&request(), Duration::from_secs(10), CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(
            err,
            BackendError::Rejected {
                status: 503,
                message: "engine pool exhausted".into(),
            }
        );
    }

    #[tokio::test]
    async fn test_non_json_body_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy error</html>"))
            .mount(&server)
            .await;

        let err = adapter(&server, Backend::FireEnginePlaywright)
            .scrape(&request(), Duration::from_secs(10), CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, BackendError::Malformed(_)), "got {:?}", err);
    }
}
