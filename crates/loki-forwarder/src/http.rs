// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! reqwest client construction for the Loki push path.

use crate::client::ClientConfig;
use crate::error::ClientError;
use std::time::Duration;

const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(270);
const TCP_KEEPALIVE: Duration = Duration::from_secs(120);

/// Builds a reqwest client with the timeout and proxy settings of `config`.
///
/// Unlike a background flusher, the push path has no fallback: an invalid
/// proxy fails construction so the caller learns about it immediately.
pub(crate) fn build_client(config: &ClientConfig) -> Result<reqwest::Client, ClientError> {
    let mut builder = reqwest::Client::builder()
        .timeout(config.timeout)
        .pool_idle_timeout(Some(POOL_IDLE_TIMEOUT))
        .tcp_keepalive(Some(TCP_KEEPALIVE));

    if let Some(https_uri) = &config.https_proxy {
        let proxy = reqwest::Proxy::https(https_uri.as_str())
            .map_err(|e| ClientError::Build(format!("invalid proxy '{https_uri}': {e}")))?;
        builder = builder.proxy(proxy);
    }

    builder
        .build()
        .map_err(|e| ClientError::Build(e.to_string()))
}
