//! Batches of label-grouped log streams.

use crate::labels::LabelSet;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

/// A single log line with its timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub timestamp: DateTime<Utc>,
    pub line: String,
}

impl Entry {
    pub fn new(timestamp: DateTime<Utc>, line: impl Into<String>) -> Self {
        Self {
            timestamp,
            line: line.into(),
        }
    }
}

/// Entries sharing one canonical label key, in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stream {
    labels: String,
    entries: Vec<Entry>,
    bytes: usize,
}

impl Stream {
    fn new(labels: String) -> Self {
        Self {
            labels,
            entries: Vec::new(),
            bytes: 0,
        }
    }

    /// Canonical label key of this stream.
    pub fn labels(&self) -> &str {
        &self.labels
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of line lengths in this stream.
    pub fn byte_size(&self) -> usize {
        self.bytes
    }
}

/// A collection of streams assembled for a single push.
///
/// Streams keep the order in which their keys were first seen. The byte
/// total always equals the sum of all line lengths, since entries can only be
/// added through [`Batch::append`].
#[derive(Debug, Clone)]
pub struct Batch {
    /// Streams in first-seen order
    streams: Vec<Stream>,
    /// Canonical key -> index into `streams`
    stream_map: HashMap<String, usize>,
    /// Sum of line lengths across all streams
    bytes: usize,
    created_at: DateTime<Utc>,
}

impl Batch {
    /// Create an empty batch.
    pub fn new(created_at: DateTime<Utc>) -> Self {
        Self::with_capacity(0, created_at)
    }

    /// Create an empty batch with room for `streams` streams.
    pub fn with_capacity(streams: usize, created_at: DateTime<Utc>) -> Self {
        Self {
            streams: Vec::with_capacity(streams),
            stream_map: HashMap::with_capacity(streams),
            bytes: 0,
            created_at,
        }
    }

    /// Create a batch from labelled entries, grouping them by label set.
    pub fn from_entries(
        created_at: DateTime<Utc>,
        entries: impl IntoIterator<Item = (LabelSet, Entry)>,
    ) -> Self {
        let mut batch = Self::new(created_at);
        for (labels, entry) in entries {
            batch.append_labels(&labels, entry);
        }
        batch
    }

    /// Append an entry to the stream with the given canonical key,
    /// creating the stream if it does not exist yet.
    pub fn append(&mut self, key: &str, entry: Entry) {
        let line_len = entry.line.len();
        let idx = match self.stream_map.get(key) {
            Some(&idx) => idx,
            None => {
                let idx = self.streams.len();
                self.streams.push(Stream::new(key.to_string()));
                self.stream_map.insert(key.to_string(), idx);
                idx
            }
        };

        let stream = &mut self.streams[idx];
        stream.entries.push(entry);
        stream.bytes += line_len;
        self.bytes += line_len;
    }

    /// Append an entry to the stream of a label set.
    pub fn append_labels(&mut self, labels: &LabelSet, entry: Entry) {
        self.append(&labels.canonical_key(), entry);
    }

    /// Current batch size in bytes (sum of line lengths).
    pub fn byte_size(&self) -> usize {
        self.bytes
    }

    /// Batch size after appending `line`.
    pub fn bytes_after(&self, line: &str) -> usize {
        self.bytes + line.len()
    }

    /// Total number of entries across all streams.
    pub fn entry_count(&self) -> usize {
        self.streams.iter().map(Stream::len).sum()
    }

    pub fn stream_count(&self) -> usize {
        self.streams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    /// Streams in first-seen order.
    pub fn streams(&self) -> &[Stream] {
        &self.streams
    }

    /// Look up a stream by canonical key.
    pub fn stream(&self, key: &str) -> Option<&Stream> {
        self.stream_map.get(key).map(|&idx| &self.streams[idx])
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Age of the batch since its creation.
    pub fn age(&self) -> Duration {
        self.age_at(Utc::now())
    }

    /// Age of the batch at a given instant.
    pub fn age_at(&self, now: DateTime<Utc>) -> Duration {
        now.signed_duration_since(self.created_at)
    }
}
