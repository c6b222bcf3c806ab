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
use crate::model::{RawBackendResponse, RequestContext};
use crate::traits::BackendAdapter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Pdf,
    Docx,
}

#[derive(Debug, Serialize)]
struct ExtractJob<'a> {
    url: &'a str,
    kind: DocumentKind,
    headers: &'a BTreeMap<String, String>,
    skip_tls_verification: bool,
    fast_mode: bool,
    timeout_ms: u64,
}

/// Document extraction service for PDF and DOCX URLs.
///
/// Posts to `{document_service_url}/extract`.
pub struct DocumentAdapter {
    client: Client,
    extract_url: Url,
    kind: DocumentKind,
}

impl DocumentAdapter {
    pub fn new(client: Client, base: &Url, kind: DocumentKind) -> Self {
        Self {
            client,
            extract_url: http::endpoint(base, "extract"),
            kind,
        }
    }
}

#[async_trait]
impl BackendAdapter for DocumentAdapter {
    async fn scrape(
        &self,
        request: &RequestContext,
        timeout: Duration,
        cancel: CancellationToken,
    ) -> Result<RawBackendResponse, BackendError> {
        let options = request.options();
        let job = ExtractJob {
            url: request.url().as_str(),
            kind: self.kind,
            headers: &options.headers,
            skip_tls_verification: options.skip_tls_verification,
            fast_mode: options.fast_mode,
            timeout_ms: timeout.as_millis() as u64,
        };

        let builder = self.client.post(self.extract_url.clone()).json(&job);
        let response = http::send(builder, timeout, &cancel).await?;
        http::service_response(response, timeout, &cancel).await
    }

    fn name(&self) -> &'static str {
        match self.kind {
            DocumentKind::Pdf => "pdf",
            DocumentKind::Docx => "docx",
        }
    }
}
