// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::errors::BackendError;
use crate::model::{RawBackendResponse, RequestContext};
use crate::traits::BackendAdapter;

/// Tracks how many adapter invocations are running at once.
#[derive(Debug, Default)]
pub struct ConcurrencyProbe {
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ConcurrencyProbe {
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn enter(self: &Arc<Self>) -> ProbeGuard {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        ProbeGuard(Arc::clone(self))
    }
}

// decrements on drop, including when the driver abandons the future
struct ProbeGuard(Arc<ConcurrencyProbe>);

impl Drop for ProbeGuard {
    fn drop(&mut self) {
        self.0.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

/// An adapter with a scripted result.
///
/// Sleeps for `delay` (on the tokio clock) and then returns `result`. By
/// default it stops early with [`BackendError::Cancelled`] when its token
/// fires; [`StubAdapter::ignoring_cancellation`] makes it keep sleeping.
pub struct StubAdapter {
    result: Result<RawBackendResponse, BackendError>,
    delay: Duration,
    honors_cancellation: bool,
    calls: AtomicUsize,
    timeouts: Mutex<Vec<Duration>>,
    probe: Option<Arc<ConcurrencyProbe>>,
}

impl StubAdapter {
    pub fn new(result: Result<RawBackendResponse, BackendError>) -> Self {
        Self {
            result,
            delay: Duration::ZERO,
            honors_cancellation: true,
            calls: AtomicUsize::new(0),
            timeouts: Mutex::new(Vec::new()),
            probe: None,
        }
    }

    /// Succeeds with `content` and status 200.
    pub fn ok(content: &str) -> Self {
        Self::new(Ok(RawBackendResponse::ok(content, 200)))
    }

    pub fn failing(error: BackendError) -> Self {
        Self::new(Err(error))
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn ignoring_cancellation(mut self) -> Self {
        self.honors_cancellation = false;
        self
    }

    pub fn with_probe(mut self, probe: Arc<ConcurrencyProbe>) -> Self {
        self.probe = Some(probe);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Timeouts passed to each invocation, in order.
    pub fn timeouts(&self) -> Vec<Duration> {
        self.timeouts
            .lock()
            .map(|t| t.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl BackendAdapter for StubAdapter {
    async fn scrape(
        &self,
        _request: &RequestContext,
        timeout: Duration,
        cancel: CancellationToken,
    ) -> Result<RawBackendResponse, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut timeouts) = self.timeouts.lock() {
            timeouts.push(timeout);
        }
        let _guard = self.probe.as_ref().map(|p| p.enter());

        if self.honors_cancellation {
            tokio::select! {
                _ = cancel.cancelled() => return Err(BackendError::Cancelled),
                _ = tokio::time::sleep(self.delay) => {}
            }
        } else {
            tokio::time::sleep(self.delay).await;
        }

        self.result.clone()
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}
