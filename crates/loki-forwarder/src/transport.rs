// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::ClientError;
use crate::labels::LabelSet;

/// Delivers log entries to a log-aggregation backend.
///
/// Wire format, connection handling and delivery guarantees belong to the
/// implementation; [`crate::LogForwarder`] only hands it one entry at a time.
#[async_trait]
pub trait LogTransport: Send + Sync {
    /// Sends a single entry. Errors are returned to the caller as-is.
    async fn handle(
        &self,
        labels: &LabelSet,
        timestamp: DateTime<Utc>,
        line: &str,
    ) -> Result<(), ClientError>;

    /// Releases the transport's resources. Called at most once by the forwarder.
    async fn stop(&self);
}
