// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

/// Errors returned by the transport collaborator that talks to Loki.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    #[error("invalid push endpoint '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("unable to build HTTP client: {0}")]
    Build(String),

    #[error("failed to push to Loki: {0}")]
    Request(String),

    #[error("push to Loki timed out: {0}")]
    Timeout(String),

    #[error("Loki rejected push with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("client has been stopped")]
    Stopped,
}

/// Errors surfaced by [`crate::LogForwarder`].
#[derive(Debug, thiserror::Error)]
pub enum ForwarderError {
    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("error creating loki client: {0}")]
    TransportInit(#[source] ClientError),

    #[error("error pushing log line: {0}")]
    TransportWrite(#[source] ClientError),
}
