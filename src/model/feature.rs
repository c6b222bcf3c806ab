// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Feature flags a scrape request may require.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A capability a request needs from whichever backend serves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeatureFlag {
    ActionSequences,
    ExplicitWait,
    Screenshot,
    FullPageScreenshot,
    PdfOutput,
    DocxOutput,
    RawResponseCapture,
    CustomGeolocation,
    MobileProxy,
    SkipTlsVerification,
    FastMode,
    StealthProxy,
    DisableAdBlocking,
}

impl FeatureFlag {
    pub const ALL: [FeatureFlag; 13] = [
        FeatureFlag::ActionSequences,
        FeatureFlag::ExplicitWait,
        FeatureFlag::Screenshot,
        FeatureFlag::FullPageScreenshot,
        FeatureFlag::PdfOutput,
        FeatureFlag::DocxOutput,
        FeatureFlag::RawResponseCapture,
        FeatureFlag::CustomGeolocation,
        FeatureFlag::MobileProxy,
        FeatureFlag::SkipTlsVerification,
        FeatureFlag::FastMode,
        FeatureFlag::StealthProxy,
        FeatureFlag::DisableAdBlocking,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureFlag::ActionSequences => "action-sequences",
            FeatureFlag::ExplicitWait => "explicit-wait",
            FeatureFlag::Screenshot => "screenshot",
            FeatureFlag::FullPageScreenshot => "full-page-screenshot",
            FeatureFlag::PdfOutput => "pdf-output",
            FeatureFlag::DocxOutput => "docx-output",
            FeatureFlag::RawResponseCapture => "raw-response-capture",
            FeatureFlag::CustomGeolocation => "custom-geolocation",
            FeatureFlag::MobileProxy => "mobile-proxy",
            FeatureFlag::SkipTlsVerification => "skip-tls-verification",
            FeatureFlag::FastMode => "fast-mode",
            FeatureFlag::StealthProxy => "stealth-proxy",
            FeatureFlag::DisableAdBlocking => "disable-ad-blocking",
        }
    }
}

impl fmt::Display for FeatureFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered set of feature flags.
///
/// Ordered so that ranking diagnostics and unsupported-feature lists come out
/// identically for identical requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureSet(pub BTreeSet<FeatureFlag>);

impl FeatureSet {
    pub fn new() -> Self {
        Self(BTreeSet::new())
    }

    pub fn insert(&mut self, flag: FeatureFlag) -> bool {
        self.0.insert(flag)
    }

    pub fn contains(&self, flag: FeatureFlag) -> bool {
        self.0.contains(&flag)
    }

    pub fn iter(&self) -> impl Iterator<Item = FeatureFlag> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<FeatureFlag> for FeatureSet {
    fn from_iter<I: IntoIterator<Item = FeatureFlag>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[FeatureFlag; N]> for FeatureSet {
    fn from(flags: [FeatureFlag; N]) -> Self {
        flags.into_iter().collect()
    }
}

impl fmt::Display for FeatureSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("{}");
        }
        let names: Vec<&str> = self.iter().map(|flag| flag.as_str()).collect();
        write!(f, "{{{}}}", names.join(", "))
    }
}
