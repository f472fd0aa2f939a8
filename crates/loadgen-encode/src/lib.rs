//! Loki push request encoders for loki-loadgen.
//!
//! A finished [`Batch`] is serialized in one of two encodings:
//!
//! - [`Encoding::Protobuf`] - `PushRequest` protobuf, snappy block compressed
//! - [`Encoding::Json`] - `{"streams":[{"stream":{..},"values":[[ts, line],..]}]}`
//!
//! Both report the number of encoded entries, which always equals the
//! batch's entry count.
//!
//! # Example
//!
//! ```rust
//! use chrono::Utc;
//! use loadgen_core::{Batch, Entry};
//! use loadgen_encode::{encode, Encoding};
//!
//! let mut batch = Batch::new(Utc::now());
//! batch.append(r#"{app="api"}"#, Entry::new(Utc::now(), "hello"));
//!
//! let encoded = encode(&batch, Encoding::Json).unwrap();
//! assert_eq!(encoded.entries, 1);
//! assert_eq!(encoded.encoding.content_type(), "application/json");
//! ```

pub mod error;
pub mod json;
pub mod proto;

use loadgen_core::Batch;
use serde::{Deserialize, Serialize};
use std::fmt;

// Re-exports for convenience
pub use error::EncodeError;
pub use json::encode_json;
pub use proto::{encode_push_request, encode_snappy};

/// Wire encoding of a push request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Encoding {
    /// Protobuf with snappy compression
    Protobuf,
    /// Plain JSON
    Json,
}

impl Encoding {
    /// Value of the `Content-Type` header.
    pub fn content_type(&self) -> &'static str {
        match self {
            Encoding::Protobuf => "application/x-protobuf",
            Encoding::Json => "application/json",
        }
    }

    /// Value of the `Content-Encoding` header, if any.
    pub fn content_encoding(&self) -> Option<&'static str> {
        match self {
            Encoding::Protobuf => Some("snappy"),
            Encoding::Json => None,
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encoding::Protobuf => write!(f, "protobuf"),
            Encoding::Json => write!(f, "json"),
        }
    }
}

/// An encoded push request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedBatch {
    pub payload: Vec<u8>,
    /// Number of log entries in the payload
    pub entries: usize,
    pub encoding: Encoding,
}

/// Encode a batch.
pub fn encode(batch: &Batch, encoding: Encoding) -> Result<EncodedBatch, EncodeError> {
    let payload = match encoding {
        Encoding::Protobuf => encode_snappy(batch)?,
        Encoding::Json => encode_json(batch)?,
    };
    Ok(EncodedBatch {
        payload,
        entries: batch.entry_count(),
        encoding,
    })
}
