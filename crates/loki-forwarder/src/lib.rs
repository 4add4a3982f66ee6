// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

pub mod client;
pub mod config;
pub mod error;
pub mod forwarder;
mod http;
pub mod labels;
pub mod stream_key;
pub mod transport;

pub use client::{ClientConfig, LokiClient};
pub use config::ForwarderConfig;
pub use error::{ClientError, ForwarderError};
pub use forwarder::LogForwarder;
pub use labels::LabelSet;
pub use stream_key::StreamKey;
pub use transport::LogTransport;
