// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

use crate::client::{ClientConfig, LokiClient};
use crate::config::ForwarderConfig;
use crate::error::ForwarderError;
use crate::labels::LabelSet;
use crate::stream_key::StreamKey;
use crate::transport::LogTransport;

/// Forwards log lines of one function invocation to a log backend.
///
/// Every line is tagged with the configured [`LabelSet`] and the wall-clock
/// time of the [`LogForwarder::push_log`] call.
#[derive(Debug)]
pub struct LogForwarder<T: LogTransport = LokiClient> {
    transport: T,
    source_name: String,
    endpoint: String,
    stream_key: StreamKey,
    labels: LabelSet,
    shut_down: AtomicBool,
}

impl LogForwarder<LokiClient> {
    /// Builds a forwarder from `AWS_LAMBDA_FUNCTION_NAME` and `LOKI_PUSH_ENDPOINT`.
    pub fn from_env() -> Result<Self, ForwarderError> {
        Self::new(ForwarderConfig::from_env()?)
    }

    pub fn new(config: ForwarderConfig) -> Result<Self, ForwarderError> {
        let mut client_config =
            ClientConfig::new_default(&config.endpoint).map_err(ForwarderError::TransportInit)?;
        client_config.timeout = config.timeout;
        client_config.https_proxy.clone_from(&config.https_proxy);

        let client = LokiClient::new(client_config).map_err(ForwarderError::TransportInit)?;
        Ok(Self::with_transport(config, client))
    }
}

impl<T: LogTransport> LogForwarder<T> {
    pub fn with_transport(config: ForwarderConfig, transport: T) -> Self {
        let source_name = config.source_name().to_string();
        let stream_key = StreamKey::generate(&source_name, Utc::now());
        info!("Sending logs to: {}", config.endpoint);
        debug!("Stream key for this invocation: {stream_key}");

        LogForwarder {
            transport,
            source_name,
            endpoint: config.endpoint,
            stream_key,
            labels: config.labels,
            shut_down: AtomicBool::new(false),
        }
    }

    /// Sends `line` to the transport right away, stamped with the current time.
    pub async fn push_log(&self, line: &str) -> Result<(), ForwarderError> {
        self.transport
            .handle(&self.labels, Utc::now(), line)
            .await
            .map_err(ForwarderError::TransportWrite)
    }

    /// Stops the transport. Safe to call more than once; only the first call
    /// reaches the transport.
    pub async fn shutdown(&self) -> Result<(), ForwarderError> {
        if self.shut_down.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        debug!("Shutting down log forwarder for {}", self.stream_key);
        self.transport.stop().await;
        Ok(())
    }

    #[must_use]
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    #[must_use]
    pub fn stream_key(&self) -> &StreamKey {
        &self.stream_key
    }

    #[must_use]
    pub fn labels(&self) -> &LabelSet {
        &self.labels
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }
}
