// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Backend responses and the results surfaced to callers.

use serde::{Deserialize, Serialize};

use crate::model::{Backend, FeatureSet, ProxyTier};

/// What a backend adapter hands back before validation.
///
/// Every field is optional because remote services are not trusted to return
/// well-formed payloads; [`RawBackendResponse::validate`] decides whether the
/// response counts as a success.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBackendResponse {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, alias = "pageStatusCode", alias = "status_code")]
    pub status_code: Option<u16>,
    #[serde(default, alias = "content_type")]
    pub content_type: Option<String>,
    #[serde(default, alias = "pageError")]
    pub error: Option<String>,
    #[serde(default)]
    pub screenshot: Option<String>,
    #[serde(default)]
    pub actions: Option<serde_json::Value>,
    #[serde(default, alias = "proxy_used")]
    pub proxy_used: Option<ProxyTier>,
}

impl RawBackendResponse {
    /// Convenience constructor for a successful response.
    pub fn ok(content: impl Into<String>, status_code: u16) -> Self {
        Self {
            content: Some(content.into()),
            status_code: Some(status_code),
            ..Default::default()
        }
    }

    /// Check structural well-formedness and convert into a [`ScrapeResult`].
    ///
    /// Content and status code must both be present. A status of 400 or above
    /// with no error string gets one describing the status.
    pub fn validate(self) -> Result<ScrapeResult, String> {
        let content = self
            .content
            .ok_or_else(|| "response has no content".to_string())?;
        let status_code = self
            .status_code
            .ok_or_else(|| "response has no status code".to_string())?;

        let error = match self.error {
            Some(error) => Some(error),
            None if status_code >= 400 => {
                Some(format!("page returned status code {}", status_code))
            }
            None => None,
        };

        Ok(ScrapeResult {
            content,
            status_code,
            content_type: self.content_type,
            error,
            screenshot: self.screenshot,
            actions: self.actions,
            proxy_used: self.proxy_used.unwrap_or_default(),
        })
    }
}

/// A validated backend result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapeResult {
    pub content: String,
    pub status_code: u16,
    pub content_type: Option<String>,
    /// Why the page is considered failed even though a response came back.
    pub error: Option<String>,
    pub screenshot: Option<String>,
    pub actions: Option<serde_json::Value>,
    pub proxy_used: ProxyTier,
}

/// A successful orchestration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapeOutcome {
    pub result: ScrapeResult,
    pub backend: Backend,
    /// Requested features the chosen backend silently dropped.
    pub unsupported_features: FeatureSet,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_requires_content_and_status() {
        let missing_content = RawBackendResponse {
            status_code: Some(200),
            ..Default::default()
        };
        assert_eq!(
            missing_content.validate().unwrap_err(),
            "response has no content"
        );

        let missing_status = RawBackendResponse {
            content: Some("<html></html>".into()),
            ..Default::default()
        };
        assert_eq!(
            missing_status.validate().unwrap_err(),
            "response has no status code"
        );
    }

    #[test]
    fn test_validate_describes_error_status() {
        let result = RawBackendResponse::ok("Not Found", 404).validate().unwrap();
        assert_eq!(result.error.as_deref(), Some("page returned status code 404"));

        let result = RawBackendResponse::ok("fine", 200).validate().unwrap();
        assert!(result.error.is_none());
        assert_eq!(result.proxy_used, ProxyTier::Basic);
    }

    #[test]
    fn test_remote_field_names_deserialize() {
        let raw: RawBackendResponse = serde_json::from_str(
            r#"{"content":"<p>hi</p>","pageStatusCode":200,"contentType":"text/html","proxyUsed":"stealth"}"#,
        )
        .unwrap();
        assert_eq!(raw.status_code, Some(200));
        assert_eq!(raw.content_type.as_deref(), Some("text/html"));
        assert_eq!(raw.proxy_used, Some(ProxyTier::Stealth));
    }
}
