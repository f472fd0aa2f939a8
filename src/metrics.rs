//! Client-side push statistics.

use loadgen_encode::Encoding;
use serde::{Deserialize, Serialize};

/// Statistics of a single push.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchStats {
    /// Sum of line lengths in the batch
    pub uncompressed_bytes: usize,
    /// Number of log lines
    pub lines: usize,
    /// Number of distinct streams
    pub streams: usize,
    /// Size of the encoded request body
    pub payload_bytes: usize,
    pub encoding: Encoding,
}

/// Totals over all pushes of a client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientMetrics {
    pub pushes: u64,
    pub protobuf_pushes: u64,
    pub json_pushes: u64,
    pub lines: u64,
    pub streams: u64,
    pub uncompressed_bytes: u64,
    pub payload_bytes: u64,
    /// Pushes that failed to build, encode or send
    pub errors: u64,
}

impl ClientMetrics {
    pub fn record(&mut self, stats: &BatchStats) {
        self.pushes += 1;
        match stats.encoding {
            Encoding::Protobuf => self.protobuf_pushes += 1,
            Encoding::Json => self.json_pushes += 1,
        }
        self.lines += stats.lines as u64;
        self.streams += stats.streams as u64;
        self.uncompressed_bytes += stats.uncompressed_bytes as u64;
        self.payload_bytes += stats.payload_bytes as u64;
    }

    pub fn record_error(&mut self) {
        self.errors += 1;
    }

    /// Add another client's totals to these.
    pub fn merge(&mut self, other: &ClientMetrics) {
        self.pushes += other.pushes;
        self.protobuf_pushes += other.protobuf_pushes;
        self.json_pushes += other.json_pushes;
        self.lines += other.lines;
        self.streams += other.streams;
        self.uncompressed_bytes += other.uncompressed_bytes;
        self.payload_bytes += other.payload_bytes;
        self.errors += other.errors;
    }

    /// Payload size relative to uncompressed line bytes.
    pub fn compression_ratio(&self) -> Option<f64> {
        if self.uncompressed_bytes == 0 {
            None
        } else {
            Some(self.payload_bytes as f64 / self.uncompressed_bytes as f64)
        }
    }
}
