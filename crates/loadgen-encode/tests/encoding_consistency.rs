//! Both encodings of a generated batch carry the same streams and entries.

use chrono::{Duration, TimeZone, Utc};
use loadgen_core::{parse_label_key, Batch, LabelPool};
use loadgen_encode::{encode, Encoding};
use loadgen_generator::{BatchGenerator, InstanceIdentity, SteppedClock};
use protobuf::CodedInputStream;
use serde_json::Value;

fn generated_batch(pool: LabelPool, streams: usize, min: usize, max: usize) -> Batch {
    let mut generator = BatchGenerator::new(pool, InstanceIdentity::new(3, "encode-test"), 12345)
        .unwrap()
        .with_clock(SteppedClock::new(
            Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 0).unwrap(),
            Duration::microseconds(17),
        ));
    generator.build_batch(streams, min, max).unwrap()
}

/// Count entries per stream in a snappy-compressed push request.
fn protobuf_stream_counts(payload: &[u8]) -> Vec<(String, usize)> {
    let raw = snap::raw::Decoder::new().decompress_vec(payload).unwrap();
    let mut input = CodedInputStream::from_bytes(&raw);
    let mut counts = Vec::new();
    while !input.eof().unwrap() {
        let tag = input.read_raw_varint32().unwrap();
        assert_eq!(tag >> 3, 1);
        let stream_bytes = input.read_bytes().unwrap();

        let mut stream = CodedInputStream::from_bytes(&stream_bytes);
        let mut labels = String::new();
        let mut entries = 0;
        while !stream.eof().unwrap() {
            let tag = stream.read_raw_varint32().unwrap();
            match tag >> 3 {
                1 => labels = stream.read_string().unwrap(),
                2 => {
                    stream.read_bytes().unwrap();
                    entries += 1;
                }
                n => panic!("unexpected field {n}"),
            }
        }
        counts.push((labels, entries));
    }
    counts
}

#[test]
fn test_entry_counts_match_across_encodings() {
    let pool = LabelPool::from_slices(&[
        ("format", &["apache_combined", "apache_error", "json", "logfmt", "rfc3164"]),
        ("app", &["api", "web", "db"]),
        ("namespace", &["prod", "dev"]),
    ])
    .unwrap();
    let batch = generated_batch(pool, 5, 50_000, 60_000);

    let protobuf = encode(&batch, Encoding::Protobuf).unwrap();
    let json = encode(&batch, Encoding::Json).unwrap();
    assert_eq!(protobuf.entries, batch.entry_count());
    assert_eq!(json.entries, batch.entry_count());

    let proto_counts = protobuf_stream_counts(&protobuf.payload);
    let proto_total: usize = proto_counts.iter().map(|(_, n)| n).sum();
    assert_eq!(proto_total, protobuf.entries);

    let value: Value = serde_json::from_slice(&json.payload).unwrap();
    let json_streams = value["streams"].as_array().unwrap();
    assert_eq!(json_streams.len(), proto_counts.len());

    for (json_stream, (key, count)) in json_streams.iter().zip(&proto_counts) {
        let labels = parse_label_key(key).unwrap();
        for (name, value) in labels.iter() {
            assert_eq!(json_stream["stream"][name], value);
        }
        assert_eq!(json_stream["values"].as_array().unwrap().len(), *count);
    }
}

#[test]
fn test_json_scenario_counts_lines() {
    let pool = LabelPool::from_slices(&[
        ("format", &["json"]),
        ("app", &["a"]),
        ("namespace", &["n"]),
        ("pod", &["p"]),
    ])
    .unwrap();
    let batch = generated_batch(pool, 1, 100, 101);

    let json = encode(&batch, Encoding::Json).unwrap();
    let value: Value = serde_json::from_slice(&json.payload).unwrap();
    let values = value["streams"][0]["values"].as_array().unwrap();
    assert_eq!(values.len(), batch.entry_count());
    assert_eq!(json.entries, batch.entry_count());

    // Every line is itself a JSON document
    for pair in values {
        let line = pair[1].as_str().unwrap();
        assert!(serde_json::from_str::<Value>(line).is_ok(), "{line}");
        assert!(pair[0].as_str().unwrap().parse::<i64>().is_ok());
    }
}

#[test]
fn test_protobuf_is_compressed() {
    let pool = LabelPool::from_slices(&[("format", &["apache_common"])]).unwrap();
    let batch = generated_batch(pool, 1, 100_000, 100_001);
    let protobuf = encode(&batch, Encoding::Protobuf).unwrap();
    assert!(protobuf.payload.len() < batch.byte_size());
}

#[test]
fn test_fixed_seed_and_clock_reproduce_payloads() {
    let pool = || {
        LabelPool::from_slices(&[
            ("format", &["apache_combined", "rfc3164", "json", "logfmt"]),
            ("app", &["a", "b", "c", "d"]),
        ])
        .unwrap()
    };
    let a = generated_batch(pool(), 4, 20_000, 30_000);
    let b = generated_batch(pool(), 4, 20_000, 30_000);

    for encoding in [Encoding::Protobuf, Encoding::Json] {
        let first = encode(&a, encoding).unwrap();
        let second = encode(&b, encoding).unwrap();
        assert_eq!(first.payload, second.payload, "{encoding} payloads differ");
    }
}
