//! Error types for payload encoding.

use loadgen_core::LabelKeyError;
use thiserror::Error;

/// Errors that can occur while encoding a batch.
#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("Protobuf encoding error: {0}")]
    Protobuf(#[from] protobuf::Error),

    #[error("Snappy compression error: {0}")]
    Compression(#[from] snap::Error),

    #[error("JSON encoding error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed stream labels: {0}")]
    MalformedLabelKey(#[from] LabelKeyError),

    /// The entry timestamp does not fit in signed 64-bit nanoseconds
    #[error("Timestamp out of range: {0}")]
    TimestampOutOfRange(String),
}
