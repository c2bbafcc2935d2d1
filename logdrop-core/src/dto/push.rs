//! Loki push API payload
//!
//! `POST /loki/api/v1/push` takes a JSON body of the form
//! `{"streams": [{"stream": {labels}, "values": [["<unix nanos>", "<line>"], ...]}]}`.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::batch::LogBatch;

/// Path of the push endpoint, relative to the backend base URL
pub const PUSH_PATH: &str = "/loki/api/v1/push";

/// Value of the `source` label on every stream pushed by this service
pub const SOURCE_LABEL: &str = "ui-import";

/// Spacing between consecutive line timestamps, in nanoseconds (1µs)
const LINE_SPACING_NANOS: i128 = 1_000;

/// Body of a single push call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushRequest {
    pub streams: Vec<PushStream>,
}

/// One labelled stream of `(timestamp, line)` entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushStream {
    pub stream: BTreeMap<String, String>,
    pub values: Vec<(String, String)>,
}

impl PushStream {
    /// Label set attached to an imported stream
    pub fn labels_for(service_name: &str) -> BTreeMap<String, String> {
        BTreeMap::from([
            ("job".to_string(), service_name.to_string()),
            ("source".to_string(), SOURCE_LABEL.to_string()),
            ("service_name".to_string(), service_name.to_string()),
        ])
    }

    /// Assigns each line a timestamp of `reference + index µs`.
    ///
    /// Blank lines are skipped but still consume their index, so timestamps
    /// stay strictly increasing in input order.
    pub fn from_lines<S: AsRef<str>>(
        service_name: &str,
        lines: &[S],
        reference: DateTime<Utc>,
    ) -> Self {
        let base = unix_nanos(reference);

        let values = lines
            .iter()
            .enumerate()
            .filter(|(_, line)| !line.as_ref().trim().is_empty())
            .map(|(i, line)| {
                let timestamp = base + i as i128 * LINE_SPACING_NANOS;
                (timestamp.to_string(), line.as_ref().to_string())
            })
            .collect();

        Self {
            stream: Self::labels_for(service_name),
            values,
        }
    }
}

impl PushRequest {
    /// Formats a batch into a single-stream push request.
    ///
    /// Returns `None` when no line survives, in which case nothing should be sent.
    pub fn from_batch(batch: &LogBatch, reference: DateTime<Utc>) -> Option<Self> {
        let stream = PushStream::from_lines(batch.service_name(), batch.lines(), reference);
        if stream.values.is_empty() {
            return None;
        }

        Some(Self {
            streams: vec![stream],
        })
    }

    /// Total number of entries across all streams
    pub fn entry_count(&self) -> usize {
        self.streams.iter().map(|s| s.values.len()).sum()
    }
}

/// Nanoseconds since the Unix epoch, without the i64 range limit
fn unix_nanos(instant: DateTime<Utc>) -> i128 {
    instant.timestamp() as i128 * 1_000_000_000 + instant.timestamp_subsec_nanos() as i128
}
