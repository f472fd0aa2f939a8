//! Protobuf encoder for Loki push requests.
//!
//! Messages are written field by field in proto3 wire format:
//!
//! ```text
//! PushRequest { repeated Stream streams = 1; }
//! Stream      { string labels = 1; repeated Entry entries = 2; }
//! Entry       { Timestamp timestamp = 1; string line = 2; }
//! Timestamp   { int64 seconds = 1; int32 nanos = 2; }
//! ```
//!
//! Nested messages are encoded into their own buffer and written as
//! length-delimited fields.

use crate::error::EncodeError;
use chrono::{DateTime, Utc};
use loadgen_core::{parse_label_key, Batch, Entry, Stream};
use protobuf::CodedOutputStream;

/// Result type for encoder operations.
pub type Result<T> = std::result::Result<T, EncodeError>;

/// Encode a batch as an uncompressed `PushRequest`.
pub fn encode_push_request(batch: &Batch) -> Result<Vec<u8>> {
    let mut buffer = Vec::with_capacity(batch.byte_size() + batch.entry_count() * 16);
    {
        let mut out = CodedOutputStream::vec(&mut buffer);
        for stream in batch.streams() {
            let encoded = encode_stream(stream)?;
            out.write_bytes(1, &encoded)?;
        }
        out.flush()?;
    }
    Ok(buffer)
}

/// Encode a batch as a snappy-compressed `PushRequest`.
pub fn encode_snappy(batch: &Batch) -> Result<Vec<u8>> {
    let raw = encode_push_request(batch)?;
    Ok(snap::raw::Encoder::new().compress_vec(&raw)?)
}

fn encode_stream(stream: &Stream) -> Result<Vec<u8>> {
    // Reject keys the receiving side could not parse
    parse_label_key(stream.labels())?;

    let mut buffer = Vec::with_capacity(stream.byte_size() + stream.len() * 16);
    {
        let mut out = CodedOutputStream::vec(&mut buffer);
        out.write_string(1, stream.labels())?;
        for entry in stream.entries() {
            let encoded = encode_entry(entry)?;
            out.write_bytes(2, &encoded)?;
        }
        out.flush()?;
    }
    Ok(buffer)
}

fn encode_entry(entry: &Entry) -> Result<Vec<u8>> {
    let timestamp = encode_timestamp(entry.timestamp)?;
    let mut buffer = Vec::with_capacity(entry.line.len() + timestamp.len() + 8);
    {
        let mut out = CodedOutputStream::vec(&mut buffer);
        out.write_bytes(1, &timestamp)?;
        out.write_string(2, &entry.line)?;
        out.flush()?;
    }
    Ok(buffer)
}

/// google.protobuf.Timestamp
fn encode_timestamp(dt: DateTime<Utc>) -> Result<Vec<u8>> {
    if dt.timestamp_nanos_opt().is_none() {
        return Err(EncodeError::TimestampOutOfRange(dt.to_rfc3339()));
    }

    let mut buffer = Vec::with_capacity(16);
    {
        let mut out = CodedOutputStream::vec(&mut buffer);
        out.write_int64(1, dt.timestamp())?;
        out.write_int32(2, dt.timestamp_subsec_nanos() as i32)?;
        out.flush()?;
    }
    Ok(buffer)
}
