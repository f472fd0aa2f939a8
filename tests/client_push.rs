//! End-to-end pushes through a client into a directory sink.

use chrono::{Duration, TimeZone, Utc};
use loadgen_core::{parse_label_key, ClientConfig};
use loadgen_encode::Encoding;
use loadgen_generator::{InstanceIdentity, SteppedClock};
use loki_loadgen::{worker_seed, Client, DirectorySink, DiscardSink};
use protobuf::CodedInputStream;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

fn config(protobuf_ratio: f64) -> ClientConfig {
    ClientConfig {
        protobuf_ratio,
        streams: 3,
        min_batch_size: 5_000,
        max_batch_size: 8_000,
        ..Default::default()
    }
}

fn client(config: ClientConfig, worker_id: u64) -> Client<SteppedClock> {
    Client::with_identity(config, InstanceIdentity::new(worker_id, "loadgen-test"))
        .unwrap()
        .with_clock(SteppedClock::new(
            Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
            Duration::milliseconds(1),
        ))
}

fn files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Label keys of a snappy-compressed protobuf push request.
fn protobuf_label_keys(payload: &[u8]) -> Vec<String> {
    let raw = snap::raw::Decoder::new().decompress_vec(payload).unwrap();
    let mut input = CodedInputStream::from_bytes(&raw);
    let mut keys = Vec::new();
    while !input.eof().unwrap() {
        input.read_raw_varint32().unwrap();
        let stream_bytes = input.read_bytes().unwrap();
        let mut stream = CodedInputStream::from_bytes(&stream_bytes);
        while !stream.eof().unwrap() {
            let tag = stream.read_raw_varint32().unwrap();
            if tag >> 3 == 1 {
                keys.push(stream.read_string().unwrap());
            } else {
                stream.read_bytes().unwrap();
            }
        }
    }
    keys
}

#[test]
fn test_json_only_pushes_land_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let mut sink = DirectorySink::create(dir.path()).unwrap();
    let mut client = client(config(0.0), 2);

    for _ in 0..3 {
        let stats = client.push(&mut sink).unwrap();
        assert_eq!(stats.encoding, Encoding::Json);
        assert!(stats.uncompressed_bytes >= 5_000);
    }

    let names = files(dir.path());
    assert_eq!(
        names,
        vec![
            "xk6-tenant-2-000000.json",
            "xk6-tenant-2-000001.json",
            "xk6-tenant-2-000002.json",
        ]
    );

    let body = fs::read(dir.path().join(&names[0])).unwrap();
    let value: Value = serde_json::from_slice(&body).unwrap();
    for stream in value["streams"].as_array().unwrap() {
        assert_eq!(stream["stream"]["instance"], "vu2.loadgen-test");
        assert!(stream["stream"]["format"].is_string());
    }
    assert_eq!(client.metrics().json_pushes, 3);
    assert_eq!(client.metrics().protobuf_pushes, 0);
}

#[test]
fn test_protobuf_only_pushes_decode() {
    let dir = tempfile::tempdir().unwrap();
    let mut sink = DirectorySink::create(dir.path()).unwrap();
    let mut client = client(
        ClientConfig {
            tenant_id: Some("load".to_string()),
            ..config(1.0)
        },
        0,
    );

    let stats = client.push(&mut sink).unwrap();
    assert_eq!(stats.encoding, Encoding::Protobuf);

    let body = fs::read(dir.path().join("load-000000.pb.snappy")).unwrap();
    assert_eq!(body.len(), stats.payload_bytes);

    let keys = protobuf_label_keys(&body);
    assert_eq!(keys.len(), stats.streams);
    for key in keys {
        let labels = parse_label_key(&key).unwrap();
        assert_eq!(labels.get("instance"), Some("vu0.loadgen-test"));
        assert!(labels.contains("app"));
        assert!(labels.contains("os"));
    }
}

#[test]
fn test_same_seed_same_payloads() {
    let mut a = client(config(0.5), 1);
    let mut b = client(config(0.5), 1);
    let mut sink = DiscardSink::new();

    for _ in 0..4 {
        assert_eq!(a.push(&mut sink).unwrap(), b.push(&mut sink).unwrap());
    }
    assert_eq!(a.metrics(), b.metrics());
}

#[test]
fn test_worker_seeds_diverge() {
    let mut configs = (0..2).map(|i| ClientConfig {
        rand_seed: worker_seed(12345, i),
        ..config(0.0)
    });
    let first = client(configs.next().unwrap(), 0);
    let second = client(configs.next().unwrap(), 1);
    assert_ne!(
        first.generator().pool().get("pod"),
        second.generator().pool().get("pod")
    );
}

#[test]
fn test_explicit_labels_from_yaml() {
    let yaml = r#"
labels:
  format: [logfmt, rfc5424]
  cluster: ["eu-west", "us-east"]
streams: 2
min_batch_size: 1000
max_batch_size: 2000
protobuf_ratio: 0.0
"#;
    let config = ClientConfig::from_yaml(yaml).unwrap();
    let mut client = client(config, 5);
    let mut sink = DiscardSink::new();
    client.push(&mut sink).unwrap();

    let pool = client.generator().pool();
    let expected: BTreeMap<&str, usize> = BTreeMap::from([("cluster", 2), ("format", 2)]);
    for (name, n) in expected {
        assert_eq!(pool.cardinality(name), Some(n));
    }
    assert!(pool.get("app").is_none());
}

#[test]
fn test_unknown_format_rejected_when_strict() {
    let yaml = r#"
labels:
  format: [syslog-ng]
"#;
    let config = ClientConfig::from_yaml(yaml).unwrap();
    assert!(Client::with_identity(config, InstanceIdentity::new(0, "h")).is_err());
}
