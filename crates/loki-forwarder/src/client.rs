// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Minimal client for Loki's HTTP push API.
//!
//! Each call to [`LokiClient::handle`] issues one `POST` with a JSON body of
//! the form:
//!
//! ```text
//! {"streams":[{"stream":{"job":"lambda"},"values":[["<unix nanos>","<line>"]]}]}
//! ```
//!
//! The client does no batching and no retries.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Url;
use serde::Serialize;
use std::error::Error;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{debug, error};

use crate::config::DEFAULT_PUSH_TIMEOUT;
use crate::error::ClientError;
use crate::http::build_client;
use crate::labels::LabelSet;
use crate::transport::LogTransport;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub url: Url,
    pub timeout: Duration,
    pub https_proxy: Option<String>,
}

impl ClientConfig {
    /// Default client settings bound to `endpoint`.
    pub fn new_default(endpoint: &str) -> Result<Self, ClientError> {
        let invalid = |reason: String| ClientError::InvalidUrl {
            url: endpoint.to_string(),
            reason,
        };
        let url = Url::parse(endpoint).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
        }
        Ok(Self {
            url,
            timeout: DEFAULT_PUSH_TIMEOUT,
            https_proxy: None,
        })
    }
}

#[derive(Debug, Serialize)]
struct PushRequest<'a> {
    streams: [PushStream<'a>; 1],
}

#[derive(Debug, Serialize)]
struct PushStream<'a> {
    stream: &'a LabelSet,
    values: [[String; 2]; 1],
}

impl<'a> PushRequest<'a> {
    fn single(labels: &'a LabelSet, timestamp: DateTime<Utc>, line: &str) -> Self {
        // Loki wants nanoseconds since the epoch as a string. Dates past 2262 don't fit.
        let nanos = timestamp
            .timestamp_nanos_opt()
            .unwrap_or_else(|| timestamp.timestamp_millis().saturating_mul(1_000_000));
        PushRequest {
            streams: [PushStream {
                stream: labels,
                values: [[nanos.to_string(), line.to_string()]],
            }],
        }
    }
}

#[derive(Debug)]
pub struct LokiClient {
    // `None` once stopped; dropping the last clone closes pooled connections.
    client: Mutex<Option<reqwest::Client>>,
    url: Url,
}

impl LokiClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let client = build_client(&config)?;
        Ok(Self {
            client: Mutex::new(Some(client)),
            url: config.url,
        })
    }

    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.lock_client().is_none()
    }

    fn lock_client(&self) -> MutexGuard<'_, Option<reqwest::Client>> {
        self.client.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Renders `err` and each of its sources, e.g. `error sending request: connection refused`.
fn error_chain(err: &dyn Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

fn request_error(err: &reqwest::Error) -> ClientError {
    if err.is_timeout() {
        ClientError::Timeout(error_chain(err))
    } else {
        ClientError::Request(error_chain(err))
    }
}

#[async_trait]
impl LogTransport for LokiClient {
    async fn handle(
        &self,
        labels: &LabelSet,
        timestamp: DateTime<Utc>,
        line: &str,
    ) -> Result<(), ClientError> {
        // Cheap clone so the lock is not held across the request.
        let client = self.lock_client().clone();
        let Some(client) = client else {
            return Err(ClientError::Stopped);
        };

        let body = PushRequest::single(labels, timestamp, line);
        let resp = client
            .post(self.url.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| request_error(&e))?;

        let status = resp.status();
        if status.is_success() {
            debug!("LOKI | Pushed {} bytes to {}", line.len(), self.url);
            return Ok(());
        }

        let body = match resp.text().await {
            Ok(body) => body,
            Err(e) => {
                debug!("LOKI | Failed to read response body: {}", error_chain(&e));
                String::new()
            }
        };
        error!("LOKI | {status}: Failed to push to Loki: {body:?}");
        Err(ClientError::Rejected {
            status: status.as_u16(),
            body,
        })
    }

    async fn stop(&self) {
        if self.lock_client().take().is_some() {
            debug!("LOKI | Client stopped, connection pool released");
        }
    }
}
