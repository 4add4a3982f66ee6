// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, Utc};
use std::fmt;
use uuid::Uuid;

pub const STREAM_KEY_SUFFIX: &str = ".log";

/// Per-invocation name of the form `{source}-{unix_millis}-{uuid}.log`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StreamKey(String);

impl StreamKey {
    #[must_use]
    pub fn generate(source_name: &str, created_at: DateTime<Utc>) -> Self {
        Self(format!(
            "{}-{}-{}{}",
            source_name,
            created_at.timestamp_millis(),
            Uuid::new_v4(),
            STREAM_KEY_SUFFIX
        ))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StreamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
