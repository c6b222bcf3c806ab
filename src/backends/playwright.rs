// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::backends::http;
use crate::errors::BackendError;
use crate::model::{ProxyTier, RawBackendResponse, RequestContext};
use crate::traits::BackendAdapter;

#[derive(Debug, Serialize)]
struct PlaywrightJob<'a> {
    url: &'a str,
    wait_after_load: u64,
    timeout: u64,
    headers: &'a BTreeMap<String, String>,
    skip_tls_verification: bool,
    screenshot: bool,
    full_page_screenshot: bool,
}

/// The standalone playwright microservice.
///
/// Posts to `{playwright_url}/scrape`. The service has no proxy tiers, so
/// results always report the basic tier.
pub struct PlaywrightAdapter {
    client: Client,
    scrape_url: Url,
}

impl PlaywrightAdapter {
    pub fn new(client: Client, base: &Url) -> Self {
        Self {
            client,
            scrape_url: http::endpoint(base, "scrape"),
        }
    }
}

#[async_trait]
impl BackendAdapter for PlaywrightAdapter {
    async fn scrape(
        &self,
        request: &RequestContext,
        timeout: Duration,
        cancel: CancellationToken,
    ) -> Result<RawBackendResponse, BackendError> {
        let options = request.options();
        let job = PlaywrightJob {
            url: request.url().as_str(),
            wait_after_load: options.wait_for_ms.unwrap_or(0),
            timeout: timeout.as_millis() as u64,
            headers: &options.headers,
            skip_tls_verification: options.skip_tls_verification,
            screenshot: options.screenshot || options.full_page_screenshot,
            full_page_screenshot: options.full_page_screenshot,
        };

        let builder = self.client.post(self.scrape_url.clone()).json(&job);
        let response = http::send(builder, timeout, &cancel).await?;
        let mut raw = http::service_response(response, timeout, &cancel).await?;
        raw.proxy_used = Some(ProxyTier::Basic);
        Ok(raw)
    }

    fn name(&self) -> &'static str {
        "playwright"
    }
}
