// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{redirect, Client};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::backends::http;
use crate::errors::{BackendError, ConfigError};
use crate::model::{ProxyTier, RawBackendResponse, RequestContext};
use crate::traits::BackendAdapter;

const MAX_REDIRECTS: usize = 10;

/// Plain HTTP GET of the target URL, straight from this process.
///
/// The only backend that needs no external service. It always reports the
/// basic proxy tier.
pub struct FetchAdapter {
    client: Client,
    /// Same as `client` but skips certificate verification.
    insecure_client: Client,
}

impl FetchAdapter {
    pub fn new() -> Result<Self, ConfigError> {
        Ok(Self {
            client: build_client(false)?,
            insecure_client: build_client(true)?,
        })
    }
}

fn build_client(skip_tls_verification: bool) -> Result<Client, ConfigError> {
    Client::builder()
        .user_agent(http::USER_AGENT)
        .redirect(redirect::Policy::limited(MAX_REDIRECTS))
        .danger_accept_invalid_certs(skip_tls_verification)
        .build()
        .map_err(|e| ConfigError::HttpClient(e.to_string()))
}

#[async_trait]
impl BackendAdapter for FetchAdapter {
    async fn scrape(
        &self,
        request: &RequestContext,
        timeout: Duration,
        cancel: CancellationToken,
    ) -> Result<RawBackendResponse, BackendError> {
        let options = request.options();
        let client = if options.skip_tls_verification {
            &self.insecure_client
        } else {
            &self.client
        };

        let mut builder = client.get(request.url().clone());
        for (name, value) in &options.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = http::send(builder, timeout, &cancel).await?;
        let status_code = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let content = http::text(response, timeout, &cancel).await?;

        Ok(RawBackendResponse {
            content: Some(content),
            status_code: Some(status_code),
            content_type,
            proxy_used: Some(ProxyTier::Basic),
            ..Default::default()
        })
    }

    fn name(&self) -> &'static str {
        "fetch"
    }
}
