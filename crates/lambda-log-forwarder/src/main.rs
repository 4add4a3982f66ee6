// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

use std::{env, process::ExitCode};
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use loki_forwarder::{LogForwarder, LogTransport};

const LOG_LEVEL_ENV: &str = "LOKI_FORWARDER_LOG_LEVEL";

#[tokio::main]
pub async fn main() -> ExitCode {
    let log_level = env::var(LOG_LEVEL_ENV)
        .map(|val| val.to_lowercase())
        .unwrap_or("info".to_string());

    let env_filter = format!("h2=off,hyper=off,hyper_util=off,reqwest=off,rustls=off,{log_level}");

    let filter = match EnvFilter::try_new(env_filter) {
        Ok(filter) => filter,
        Err(e) => {
            eprintln!("could not parse {LOG_LEVEL_ENV}: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Writes to stderr so forwarded stdin lines and our own logs never mix.
    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_level(true)
        .with_thread_names(false)
        .with_thread_ids(false)
        .with_line_number(false)
        .with_file(false)
        .with_target(true)
        .without_time()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("setting default subscriber failed: {e}");
        return ExitCode::FAILURE;
    }

    debug!("Logging subsystem enabled");

    let forwarder = match LogForwarder::from_env() {
        Ok(forwarder) => forwarder,
        Err(e) => {
            error!("Error creating log forwarder: {e}");
            return ExitCode::FAILURE;
        }
    };

    let forwarded = tokio::select! {
        count = forward_lines(&forwarder, BufReader::new(io::stdin())) => count,
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted, shutting down log forwarder");
            None
        }
    };
    if let Some(count) = forwarded {
        debug!("Reached end of input after {count} lines");
    }

    if let Err(e) = forwarder.shutdown().await {
        error!("Error shutting down log forwarder: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

/// Pushes every line of `input` until EOF. A failed push drops that line only.
///
/// Lines are split on `\n` (a trailing `\r` is trimmed) and bytes that are not
/// valid UTF-8 are replaced with U+FFFD rather than ending the stream.
///
/// Returns the number of lines read, or `None` if reading stdin failed.
async fn forward_lines<T, R>(forwarder: &LogForwarder<T>, mut input: R) -> Option<usize>
where
    T: LogTransport,
    R: io::AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    let mut count = 0;
    loop {
        buf.clear();
        match input.read_until(b'\n', &mut buf).await {
            Ok(0) => return Some(count),
            Ok(_) => {
                if buf.last() == Some(&b'\n') {
                    buf.pop();
                    if buf.last() == Some(&b'\r') {
                        buf.pop();
                    }
                }
                count += 1;
                let line = String::from_utf8_lossy(&buf);
                if let Err(e) = forwarder.push_log(&line).await {
                    error!("Dropping log line: {e}");
                }
            }
            Err(e) => {
                error!("Failed to read input: {e}");
                return None;
            }
        }
    }
}
