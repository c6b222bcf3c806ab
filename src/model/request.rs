// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Incoming scrape requests and the per-request context built from them.
//!
//! [`ScrapeOptions`] is the request shape accepted from callers. Building a
//! [`RequestContext`] validates the URL and derives the [`FeatureSet`] the
//! request needs; everything else passes through to the backend untouched.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::time::Duration;
use url::Url;

use crate::errors::RequestError;
use crate::model::{Backend, FeatureFlag, FeatureSet};

/// Allowance for a selector-based wait action with no explicit duration.
pub const SELECTOR_WAIT_ALLOWANCE: Duration = Duration::from_millis(1000);
/// Allowance for any action that is not a wait.
pub const ACTION_ALLOWANCE: Duration = Duration::from_millis(250);

/// One browser action in an action sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    Wait {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        milliseconds: Option<u64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        selector: Option<String>,
    },
    Click {
        selector: String,
    },
    Write {
        text: String,
    },
    Press {
        key: String,
    },
    Scroll {
        #[serde(default)]
        direction: ScrollDirection,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        selector: Option<String>,
    },
    Screenshot {
        #[serde(default)]
        full_page: bool,
    },
    Scrape,
    ExecuteJavascript {
        script: String,
    },
}

impl Action {
    /// Time this action is expected to add to a browser session.
    pub fn allowance(&self) -> Duration {
        match self {
            Action::Wait {
                milliseconds: Some(ms),
                ..
            } => Duration::from_millis(*ms),
            Action::Wait { .. } => SELECTOR_WAIT_ALLOWANCE,
            _ => ACTION_ALLOWANCE,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollDirection {
    Up,
    #[default]
    Down,
}

/// Geolocation override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub country: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub languages: Vec<String>,
}

/// Proxy tier a request asks for, or a backend reports it used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProxyTier {
    #[default]
    Basic,
    Stealth,
}

fn default_block_ads() -> bool {
    true
}

/// A caller's scrape request.
///
/// # Example
/// ```
/// use scrape_router::model::ScrapeOptions;
///
/// let options: ScrapeOptions = serde_json::from_str(
///     r#"{ "url": "https://example.com", "screenshot": true, "wait_for_ms": 500 }"#,
/// ).unwrap();
/// assert!(options.screenshot);
/// assert!(options.block_ads);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapeOptions {
    pub url: String,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// Post-load wait requested by the caller.
    #[serde(default)]
    pub wait_for_ms: Option<u64>,
    /// Overall time budget for the whole orchestration.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    #[serde(default)]
    pub actions: Vec<Action>,
    #[serde(default)]
    pub screenshot: bool,
    #[serde(default)]
    pub full_page_screenshot: bool,
    #[serde(default)]
    pub capture_raw_response: bool,
    #[serde(default)]
    pub skip_tls_verification: bool,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub mobile: bool,
    #[serde(default)]
    pub fast_mode: bool,
    #[serde(default)]
    pub proxy: Option<ProxyTier>,
    #[serde(default = "default_block_ads")]
    pub block_ads: bool,
    /// Backends to try, in order, instead of the registry-derived list.
    #[serde(default)]
    pub force_backends: Option<Vec<Backend>>,
}

impl ScrapeOptions {
    /// Options for `url` with every optional field at its default.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: BTreeMap::new(),
            wait_for_ms: None,
            timeout_ms: None,
            actions: Vec::new(),
            screenshot: false,
            full_page_screenshot: false,
            capture_raw_response: false,
            skip_tls_verification: false,
            location: None,
            mobile: false,
            fast_mode: false,
            proxy: None,
            block_ads: true,
            force_backends: None,
        }
    }
}

/// Everything one orchestration call knows about its request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    url: Url,
    flags: FeatureSet,
    forced: Option<Vec<Backend>>,
    options: ScrapeOptions,
}

impl RequestContext {
    /// Validate `options` and derive the feature flags it needs.
    pub fn new(options: ScrapeOptions) -> Result<Self, RequestError> {
        let url = Url::parse(&options.url).map_err(|e| RequestError::InvalidUrl {
            url: options.url.clone(),
            reason: e.to_string(),
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(RequestError::UnsupportedScheme {
                url: options.url.clone(),
                scheme: url.scheme().to_string(),
            });
        }
        if url.host_str().map_or(true, str::is_empty) {
            return Err(RequestError::InvalidUrl {
                url: options.url.clone(),
                reason: "missing host".to_string(),
            });
        }

        let flags = derive_feature_flags(&url, &options);
        let forced = options.force_backends.as_ref().map(|list| dedup_in_order(list));

        Ok(Self {
            url,
            flags,
            forced,
            options,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn feature_flags(&self) -> &FeatureSet {
        &self.flags
    }

    pub fn forced_backends(&self) -> Option<&[Backend]> {
        self.forced.as_deref()
    }

    pub fn options(&self) -> &ScrapeOptions {
        &self.options
    }

    pub fn wait_for(&self) -> Duration {
        Duration::from_millis(self.options.wait_for_ms.unwrap_or(0))
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.options.timeout_ms.map(Duration::from_millis)
    }

    /// Sum of the allowances of every action in the sequence, saturating at
    /// `Duration::MAX`.
    pub fn actions_allowance(&self) -> Duration {
        self.options
            .actions
            .iter()
            .fold(Duration::ZERO, |total, action| total.saturating_add(action.allowance()))
    }
}

fn dedup_in_order(backends: &[Backend]) -> Vec<Backend> {
    let mut seen = HashSet::new();
    backends
        .iter()
        .copied()
        .filter(|backend| seen.insert(*backend))
        .collect()
}

fn derive_feature_flags(url: &Url, options: &ScrapeOptions) -> FeatureSet {
    let mut flags = FeatureSet::new();
    let path = url.path().to_ascii_lowercase();

    if !options.actions.is_empty() {
        flags.insert(FeatureFlag::ActionSequences);
    }
    if options.wait_for_ms.is_some_and(|ms| ms > 0) {
        flags.insert(FeatureFlag::ExplicitWait);
    }
    if options.screenshot {
        flags.insert(FeatureFlag::Screenshot);
    }
    if options.full_page_screenshot {
        flags.insert(FeatureFlag::Screenshot);
        flags.insert(FeatureFlag::FullPageScreenshot);
    }
    if path.ends_with(".pdf") {
        flags.insert(FeatureFlag::PdfOutput);
    }
    if path.ends_with(".docx") {
        flags.insert(FeatureFlag::DocxOutput);
    }
    if options.capture_raw_response {
        flags.insert(FeatureFlag::RawResponseCapture);
    }
    if options.location.is_some() {
        flags.insert(FeatureFlag::CustomGeolocation);
    }
    if options.mobile {
        flags.insert(FeatureFlag::MobileProxy);
    }
    if options.skip_tls_verification {
        flags.insert(FeatureFlag::SkipTlsVerification);
    }
    if options.fast_mode {
        flags.insert(FeatureFlag::FastMode);
    }
    if options.proxy == Some(ProxyTier::Stealth) {
        flags.insert(FeatureFlag::StealthProxy);
    }
    if !options.block_ads {
        flags.insert(FeatureFlag::DisableAdBlocking);
    }

    flags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_request_needs_no_features() {
        let ctx = RequestContext::new(ScrapeOptions::new("https://example.com/")).unwrap();
        assert!(ctx.feature_flags().is_empty());
        assert!(ctx.forced_backends().is_none());
    }

    #[test]
    fn test_option_to_flag_lookup() {
        struct TestCase {
            name: &'static str,
            url: &'static str,
            apply: fn(&mut ScrapeOptions),
            expected: Vec<FeatureFlag>,
        }

        let test_cases = vec![
            TestCase {
                name: "actions",
                url: "https://example.com",
                apply: |o| o.actions = vec![Action::Click { selector: "#go".into() }],
                expected: vec![FeatureFlag::ActionSequences],
            },
            TestCase {
                name: "zero wait is not a wait",
                url: "https://example.com",
                apply: |o| o.wait_for_ms = Some(0),
                expected: vec![],
            },
            TestCase {
                name: "wait",
                url: "https://example.com",
                apply: |o| o.wait_for_ms = Some(1500),
                expected: vec![FeatureFlag::ExplicitWait],
            },
            TestCase {
                name: "full page screenshot implies screenshot",
                url: "https://example.com",
                apply: |o| o.full_page_screenshot = true,
                expected: vec![FeatureFlag::Screenshot, FeatureFlag::FullPageScreenshot],
            },
            TestCase {
                name: "pdf url",
                url: "https://example.com/files/Report.PDF",
                apply: |_| {},
                expected: vec![FeatureFlag::PdfOutput],
            },
            TestCase {
                name: "docx url",
                url: "https://example.com/files/notes.docx?download=1",
                apply: |_| {},
                expected: vec![FeatureFlag::DocxOutput],
            },
            TestCase {
                name: "stealth proxy",
                url: "https://example.com",
                apply: |o| o.proxy = Some(ProxyTier::Stealth),
                expected: vec![FeatureFlag::StealthProxy],
            },
            TestCase {
                name: "basic proxy adds nothing",
                url: "https://example.com",
                apply: |o| o.proxy = Some(ProxyTier::Basic),
                expected: vec![],
            },
            TestCase {
                name: "ads allowed",
                url: "https://example.com",
                apply: |o| o.block_ads = false,
                expected: vec![FeatureFlag::DisableAdBlocking],
            },
            TestCase {
                name: "location mobile tls fast raw",
                url: "https://example.com",
                apply: |o| {
                    o.location = Some(Location {
                        country: "DE".into(),
                        languages: vec![],
                    });
                    o.mobile = true;
                    o.skip_tls_verification = true;
                    o.fast_mode = true;
                    o.capture_raw_response = true;
                },
                expected: vec![
                    FeatureFlag::RawResponseCapture,
                    FeatureFlag::CustomGeolocation,
                    FeatureFlag::MobileProxy,
                    FeatureFlag::SkipTlsVerification,
                    FeatureFlag::FastMode,
                ],
            },
        ];

        for tc in test_cases {
            let mut options = ScrapeOptions::new(tc.url);
            (tc.apply)(&mut options);
            let ctx = RequestContext::new(options).unwrap();
            let expected: FeatureSet = tc.expected.into_iter().collect();
            assert_eq!(ctx.feature_flags(), &expected, "case: {}", tc.name);
        }
    }

    #[test]
    fn test_invalid_urls_are_rejected() {
        assert!(matches!(
            RequestContext::new(ScrapeOptions::new("not a url")),
            Err(RequestError::InvalidUrl { .. })
        ));
        assert!(matches!(
            RequestContext::new(ScrapeOptions::new("/relative/path")),
            Err(RequestError::InvalidUrl { .. })
        ));
        assert!(matches!(
            RequestContext::new(ScrapeOptions::new("ftp://example.com/file")),
            Err(RequestError::UnsupportedScheme { .. })
        ));
    }

    #[test]
    fn test_forced_list_is_deduplicated_in_order() {
        let mut options = ScrapeOptions::new("https://example.com");
        options.force_backends = Some(vec![Backend::Fetch, Backend::Playwright, Backend::Fetch]);
        let ctx = RequestContext::new(options).unwrap();
        assert_eq!(
            ctx.forced_backends(),
            Some(&[Backend::Fetch, Backend::Playwright][..])
        );
    }

    #[test]
    fn test_actions_allowance() {
        let mut options = ScrapeOptions::new("https://example.com");
        options.actions = vec![
            Action::Wait {
                milliseconds: Some(2000),
                selector: None,
            },
            Action::Wait {
                milliseconds: None,
                selector: Some("#content".into()),
            },
            Action::Click {
                selector: "#more".into(),
            },
        ];
        let ctx = RequestContext::new(options).unwrap();
        assert_eq!(ctx.actions_allowance(), Duration::from_millis(3250));
    }

    #[test]
    fn test_actions_deserialize_from_tagged_json() {
        let actions: Vec<Action> = serde_json::from_str(
            r#"[{"type":"wait","milliseconds":500},{"type":"scroll"},{"type":"scrape"}]"#,
        )
        .unwrap();
        assert_eq!(actions.len(), 3);
        assert!(matches!(
            actions[1],
            Action::Scroll {
                direction: ScrollDirection::Down,
                selector: None
            }
        ));
    }
}
