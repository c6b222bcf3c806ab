// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::backends::http;
use crate::errors::BackendError;
use crate::model::{RawBackendResponse, RequestContext};
use crate::traits::BackendAdapter;

/// Lookup in the pre-crawled index.
///
/// `GET {index_url}/lookup?url=..&documents=..`. A 404 means the URL is not
/// indexed, which is an ordinary backend failure: the driver moves on to a
/// live backend.
pub struct IndexAdapter {
    client: Client,
    lookup_url: Url,
    documents: bool,
}

impl IndexAdapter {
    /// `documents` selects the document-aware index (`index;documents`).
    pub fn new(client: Client, base: &Url, documents: bool) -> Self {
        Self {
            client,
            lookup_url: http::endpoint(base, "lookup"),
            documents,
        }
    }
}

#[async_trait]
impl BackendAdapter for IndexAdapter {
    async fn scrape(
        &self,
        request: &RequestContext,
        timeout: Duration,
        cancel: CancellationToken,
    ) -> Result<RawBackendResponse, BackendError> {
        let documents = if self.documents { "true" } else { "false" };
        let builder = self
            .client
            .get(self.lookup_url.clone())
            .query(&[("url", request.url().as_str()), ("documents", documents)]);

        let response = http::send(builder, timeout, &cancel).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(BackendError::Failed("url is not indexed".to_string()));
        }
        http::service_response(response, timeout, &cancel).await
    }

    fn name(&self) -> &'static str {
        if self.documents {
            "index;documents"
        } else {
            "index"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ScrapeOptions;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> RequestContext {
        RequestContext::new(ScrapeOptions::new("https://example.com/post?id=7")).unwrap()
    }

    #[tokio::test]
    async fn test_indexed_url_is_returned() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/lookup"))
            .and(query_param("url", "https://example.com/post?id=7"))
            .and(query_param("documents", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "content": "cached body",
                "statusCode": 200,
                "contentType": "text/html",
            })))
            .mount(&server)
            .await;

        let adapter = IndexAdapter::new(Client::new(), &Url::parse(&server.uri()).unwrap(), true);
        let raw = adapter
            .scrape(&request(), Duration::from_secs(2), CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(raw.content.as_deref(), Some("cached body"));
        assert_eq!(raw.status_code, Some(200));
        assert_eq!(adapter.name(), "index;documents");
    }

    #[tokio::test]
    async fn test_not_indexed_is_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/lookup"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let adapter = IndexAdapter::new(Client::new(), &Url::parse(&server.uri()).unwrap(), false);
        let err = adapter
            .scrape(&request(), Duration::from_secs(2), CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(err, BackendError::Failed("url is not indexed".into()));
    }
}
