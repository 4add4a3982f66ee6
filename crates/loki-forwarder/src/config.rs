// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::error::ForwarderError;
use crate::labels::LabelSet;
use std::env::{self, VarError};
use std::time::Duration;

pub const FUNCTION_NAME_ENV: &str = "AWS_LAMBDA_FUNCTION_NAME";
pub const PUSH_ENDPOINT_ENV: &str = "LOKI_PUSH_ENDPOINT";
pub const PUSH_TIMEOUT_ENV: &str = "LOKI_PUSH_TIMEOUT_SECS";
pub const HTTPS_PROXY_ENV: &str = "LOKI_HTTPS_PROXY";

pub const DEFAULT_PUSH_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for a [`crate::LogForwarder`]
#[derive(Debug, Clone)]
pub struct ForwarderConfig {
    /// Name of the function producing the logs, lower-cased
    pub source_name: Option<String>,
    /// Loki push URL, e.g. `http://loki:3100/loki/api/v1/push`
    pub endpoint: String,
    /// Timeout for each push request
    pub timeout: Duration,
    /// HTTPS proxy URL
    pub https_proxy: Option<String>,
    pub labels: LabelSet,
}

impl ForwarderConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            source_name: None,
            endpoint: endpoint.into(),
            timeout: DEFAULT_PUSH_TIMEOUT,
            https_proxy: None,
            labels: LabelSet::lambda(),
        }
    }

    #[must_use]
    pub fn with_source_name(mut self, source_name: impl AsRef<str>) -> Self {
        self.source_name = Some(source_name.as_ref().to_lowercase());
        self
    }

    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self, ForwarderError> {
        let endpoint = env::var(PUSH_ENDPOINT_ENV).map_err(|e| {
            ForwarderError::Configuration(match e {
                VarError::NotPresent => {
                    format!("environment variable {PUSH_ENDPOINT_ENV} is not set")
                }
                VarError::NotUnicode(_) => {
                    format!("environment variable {PUSH_ENDPOINT_ENV} is not valid unicode")
                }
            })
        })?;
        let source_name = env::var(FUNCTION_NAME_ENV)
            .ok()
            .map(|name| name.to_lowercase());
        let timeout = env::var(PUSH_TIMEOUT_ENV)
            .ok()
            .and_then(|secs| secs.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map_or(DEFAULT_PUSH_TIMEOUT, Duration::from_secs);
        let https_proxy = env::var(HTTPS_PROXY_ENV)
            .or_else(|_| env::var("HTTPS_PROXY"))
            .ok();

        Ok(Self {
            source_name,
            endpoint,
            timeout,
            https_proxy,
            labels: LabelSet::lambda(),
        })
    }

    /// Source name used in the stream key, empty when unset.
    #[must_use]
    pub fn source_name(&self) -> &str {
        self.source_name.as_deref().unwrap_or_default()
    }
}
