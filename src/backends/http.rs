// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Shared HTTP plumbing for the adapters.

use reqwest::{Client, RequestBuilder, Response};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::errors::{BackendError, ConfigError};
use crate::model::RawBackendResponse;

pub(crate) const USER_AGENT: &str = concat!("scrape-router/", env!("CARGO_PKG_VERSION"));

/// Longest error body kept from a rejecting service.
const MAX_ERROR_BODY: usize = 512;

/// Client used for calls to backend services.
pub(crate) fn service_client() -> Result<Client, ConfigError> {
    Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| ConfigError::HttpClient(e.to_string()))
}

/// `base` with `segment` appended to its path.
pub(crate) fn endpoint(base: &Url, segment: &str) -> Url {
    let mut url = base.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().push(segment);
    }
    url
}

/// Send `request`, bounded by `timeout` and abandoned on `cancel`.
pub(crate) async fn send(
    request: RequestBuilder,
    timeout: Duration,
    cancel: &CancellationToken,
) -> Result<Response, BackendError> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(BackendError::Cancelled),
        result = request.timeout(timeout).send() => result.map_err(|e| map_error(e, timeout)),
    }
}

/// Body of `response` as text.
pub(crate) async fn text(
    response: Response,
    timeout: Duration,
    cancel: &CancellationToken,
) -> Result<String, BackendError> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(BackendError::Cancelled),
        result = response.text() => result.map_err(|e| map_error(e, timeout)),
    }
}

/// Decode a backend service's JSON job result.
///
/// Non-success statuses from the service itself are rejections, not page
/// results: the target page's status travels inside the JSON body.
pub(crate) async fn service_response(
    response: Response,
    timeout: Duration,
    cancel: &CancellationToken,
) -> Result<RawBackendResponse, BackendError> {
    let status = response.status();
    if !status.is_success() {
        return Err(rejected(response, timeout, cancel).await);
    }

    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(BackendError::Cancelled),
        result = response.json::<RawBackendResponse>() => result.map_err(|e| map_error(e, timeout)),
    }
}

/// A [`BackendError::Rejected`] carrying the (truncated) body of `response`.
pub(crate) async fn rejected(
    response: Response,
    timeout: Duration,
    cancel: &CancellationToken,
) -> BackendError {
    let status = response.status().as_u16();
    let mut message = text(response, timeout, cancel).await.unwrap_or_default();
    if message.len() > MAX_ERROR_BODY {
        let mut end = MAX_ERROR_BODY;
        while !message.is_char_boundary(end) {
            end -= 1;
        }
        message.truncate(end);
    }
    BackendError::Rejected { status, message }
}

fn map_error(err: reqwest::Error, timeout: Duration) -> BackendError {
    if err.is_timeout() {
        BackendError::Timeout(timeout)
    } else {
        err.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_appends_segment() {
        struct TestCase {
            base: &'static str,
            expected: &'static str,
        }

        let test_cases = vec![
            TestCase {
                base: "http://fire-engine:3000",
                expected: "http://fire-engine:3000/scrape",
            },
            TestCase {
                base: "http://fire-engine:3000/",
                expected: "http://fire-engine:3000/scrape",
            },
            TestCase {
                base: "https://gateway.internal/api/v1/",
                expected: "https://gateway.internal/api/v1/scrape",
            },
            TestCase {
                base: "https://gateway.internal/api/v1",
                expected: "https://gateway.internal/api/v1/scrape",
            },
        ];

        for tc in test_cases {
            let base = Url::parse(tc.base).unwrap();
            assert_eq!(endpoint(&base, "scrape").as_str(), tc.expected, "{}", tc.base);
        }
    }
}
