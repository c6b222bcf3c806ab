// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Builtin product-tuning data.
//!
//! Qualities, weights and time allowances are preferences rather than
//! invariants; every value here can be overridden from configuration.

use std::time::Duration;

use crate::model::{Backend, FeatureFlag};

/// Used when a backend has no time allowance at all.
pub const DEFAULT_FALLBACK_TIMEOUT: Duration = Duration::from_secs(30);

/// Default priority weight of each feature flag.
pub fn builtin_weight(flag: FeatureFlag) -> u32 {
    match flag {
        FeatureFlag::ActionSequences => 20,
        FeatureFlag::ExplicitWait => 1,
        FeatureFlag::Screenshot => 10,
        FeatureFlag::FullPageScreenshot => 10,
        FeatureFlag::PdfOutput => 100,
        FeatureFlag::DocxOutput => 100,
        FeatureFlag::RawResponseCapture => 90,
        FeatureFlag::CustomGeolocation => 10,
        FeatureFlag::MobileProxy => 10,
        FeatureFlag::SkipTlsVerification => 10,
        FeatureFlag::FastMode => 90,
        FeatureFlag::StealthProxy => 20,
        FeatureFlag::DisableAdBlocking => 10,
    }
}

/// Default static quality of each backend.
pub fn builtin_quality(backend: Backend) -> i32 {
    match backend {
        Backend::Index => 1000,
        Backend::IndexDocuments => 1000,
        Backend::FireEngineChromeCdp => 50,
        Backend::FireEngineChromeCdpRetry => 45,
        Backend::FireEngineChromeCdpStealth => -2,
        Backend::FireEnginePlaywright => 40,
        Backend::FireEnginePlaywrightStealth => -10,
        Backend::FireEngineTlsClient => 10,
        Backend::FireEngineTlsClientStealth => -15,
        Backend::Playwright => 20,
        Backend::Fetch => 5,
        Backend::Pdf => -20,
        Backend::Docx => -20,
    }
}

/// Default support matrix row for a backend.
pub fn builtin_supports(backend: Backend) -> &'static [FeatureFlag] {
    use FeatureFlag::*;

    const CHROME_CDP: &[FeatureFlag] = &[
        ActionSequences,
        ExplicitWait,
        Screenshot,
        FullPageScreenshot,
        CustomGeolocation,
        MobileProxy,
        SkipTlsVerification,
        DisableAdBlocking,
    ];
    const CHROME_CDP_STEALTH: &[FeatureFlag] = &[
        ActionSequences,
        ExplicitWait,
        Screenshot,
        FullPageScreenshot,
        CustomGeolocation,
        MobileProxy,
        SkipTlsVerification,
        StealthProxy,
        DisableAdBlocking,
    ];
    const REMOTE_PLAYWRIGHT: &[FeatureFlag] = &[
        ExplicitWait,
        Screenshot,
        FullPageScreenshot,
        CustomGeolocation,
        SkipTlsVerification,
        DisableAdBlocking,
    ];
    const REMOTE_PLAYWRIGHT_STEALTH: &[FeatureFlag] = &[
        ExplicitWait,
        Screenshot,
        FullPageScreenshot,
        CustomGeolocation,
        SkipTlsVerification,
        StealthProxy,
        DisableAdBlocking,
    ];
    const TLS_CLIENT: &[FeatureFlag] = &[
        RawResponseCapture,
        CustomGeolocation,
        MobileProxy,
        SkipTlsVerification,
        FastMode,
    ];
    const TLS_CLIENT_STEALTH: &[FeatureFlag] = &[
        RawResponseCapture,
        CustomGeolocation,
        MobileProxy,
        SkipTlsVerification,
        FastMode,
        StealthProxy,
    ];

    match backend {
        Backend::Index => &[
            ExplicitWait,
            Screenshot,
            FullPageScreenshot,
            CustomGeolocation,
            MobileProxy,
            SkipTlsVerification,
            StealthProxy,
            DisableAdBlocking,
        ],
        Backend::IndexDocuments => &[
            ExplicitWait,
            PdfOutput,
            DocxOutput,
            CustomGeolocation,
            MobileProxy,
            SkipTlsVerification,
            StealthProxy,
            DisableAdBlocking,
        ],
        Backend::FireEngineChromeCdp | Backend::FireEngineChromeCdpRetry => CHROME_CDP,
        Backend::FireEngineChromeCdpStealth => CHROME_CDP_STEALTH,
        Backend::FireEnginePlaywright => REMOTE_PLAYWRIGHT,
        Backend::FireEnginePlaywrightStealth => REMOTE_PLAYWRIGHT_STEALTH,
        Backend::FireEngineTlsClient => TLS_CLIENT,
        Backend::FireEngineTlsClientStealth => TLS_CLIENT_STEALTH,
        Backend::Playwright => &[ExplicitWait, Screenshot, FullPageScreenshot, SkipTlsVerification],
        Backend::Fetch => &[SkipTlsVerification, FastMode],
        Backend::Pdf => &[PdfOutput, SkipTlsVerification, FastMode],
        Backend::Docx => &[DocxOutput, SkipTlsVerification, FastMode],
    }
}

/// Default `(base, include_wait, include_actions)` time allowance of a backend.
pub fn builtin_allowance(backend: Backend) -> (Duration, bool, bool) {
    match backend {
        Backend::Index => (Duration::from_secs(2), false, false),
        Backend::IndexDocuments => (Duration::from_secs(5), false, false),
        Backend::FireEngineChromeCdp
        | Backend::FireEngineChromeCdpRetry
        | Backend::FireEngineChromeCdpStealth => (Duration::from_secs(45), true, true),
        Backend::FireEnginePlaywright | Backend::FireEnginePlaywrightStealth => {
            (Duration::from_secs(30), true, false)
        }
        Backend::FireEngineTlsClient | Backend::FireEngineTlsClientStealth => {
            (Duration::from_secs(15), false, false)
        }
        Backend::Playwright => (Duration::from_secs(30), true, false),
        Backend::Fetch => (Duration::from_secs(15), false, false),
        Backend::Pdf => (Duration::from_secs(120), false, false),
        Backend::Docx => (Duration::from_secs(30), false, false),
    }
}
