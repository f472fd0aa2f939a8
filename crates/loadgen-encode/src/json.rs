//! JSON encoder for Loki push requests.
//!
//! ```json
//! {"streams":[{"stream":{"app":"api"},"values":[["1714557600000000000","line"]]}]}
//! ```

use crate::error::EncodeError;
use loadgen_core::{parse_label_key, Batch, Stream};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Serialize)]
struct JsonPushRequest<'a> {
    streams: Vec<JsonStream<'a>>,
}

#[derive(Debug, Serialize)]
struct JsonStream<'a> {
    stream: BTreeMap<String, String>,
    /// `[unix nanoseconds as a string, line]`
    values: Vec<(String, &'a str)>,
}

/// Encode a batch as a JSON push request.
pub fn encode_json(batch: &Batch) -> Result<Vec<u8>, EncodeError> {
    let streams = batch
        .streams()
        .iter()
        .map(json_stream)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(serde_json::to_vec(&JsonPushRequest { streams })?)
}

fn json_stream(stream: &Stream) -> Result<JsonStream<'_>, EncodeError> {
    let labels = parse_label_key(stream.labels())?;
    let values = stream
        .entries()
        .iter()
        .map(|entry| {
            let nanos = entry
                .timestamp
                .timestamp_nanos_opt()
                .ok_or_else(|| EncodeError::TimestampOutOfRange(entry.timestamp.to_rfc3339()))?;
            Ok((nanos.to_string(), entry.line.as_str()))
        })
        .collect::<Result<Vec<_>, EncodeError>>()?;

    Ok(JsonStream {
        stream: labels.into_inner(),
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use loadgen_core::Entry;
    use serde_json::{json, Value};

    #[test]
    fn test_encode_json() {
        let t = Utc.timestamp_opt(1_714_557_600, 0).unwrap();
        let mut batch = Batch::new(t);
        batch.append(r#"{app="api", format="json"}"#, Entry::new(t, "hello"));
        batch.append(
            r#"{app="api", format="json"}"#,
            Entry::new(t + Duration::nanoseconds(42), r#"{"quoted":"line"}"#),
        );

        let encoded = encode_json(&batch).unwrap();
        let value: Value = serde_json::from_slice(&encoded).unwrap();
        assert_eq!(
            value,
            json!({
                "streams": [{
                    "stream": {"app": "api", "format": "json"},
                    "values": [
                        ["1714557600000000000", "hello"],
                        ["1714557600000000042", "{\"quoted\":\"line\"}"],
                    ]
                }]
            })
        );
    }

    #[test]
    fn test_escaped_label_values() {
        let t = Utc::now();
        let mut batch = Batch::new(t);
        batch.append(r#"{msg="a \"b\", c=d\\e"}"#, Entry::new(t, "x"));

        let value: Value = serde_json::from_slice(&encode_json(&batch).unwrap()).unwrap();
        assert_eq!(value["streams"][0]["stream"]["msg"], r#"a "b", c=d\e"#);
    }

    #[test]
    fn test_empty_batch() {
        let batch = Batch::new(Utc::now());
        assert_eq!(encode_json(&batch).unwrap(), br#"{"streams":[]}"#);
    }

    #[test]
    fn test_malformed_label_key() {
        let mut batch = Batch::new(Utc::now());
        batch.append(r#"{app="unterminated}"#, Entry::new(Utc::now(), "line"));
        assert!(matches!(
            encode_json(&batch),
            Err(EncodeError::MalformedLabelKey(_))
        ));
    }
}
