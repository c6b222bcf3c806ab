// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::errors::BackendError;
use crate::model::{RawBackendResponse, RequestContext};

/// One way of turning a URL into a result.
///
/// Implementations should stop promptly once `cancel` fires and should not
/// run past `timeout`. The execution driver enforces both anyway by dropping
/// the future, so an adapter that ignores them only wastes remote work.
#[async_trait]
pub trait BackendAdapter: Send + Sync {
    async fn scrape(
        &self,
        request: &RequestContext,
        timeout: Duration,
        cancel: CancellationToken,
    ) -> Result<RawBackendResponse, BackendError>;

    fn name(&self) -> &'static str;
}
