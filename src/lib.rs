//! Loki load-test client
//!
//! Generates synthetic, label-grouped log traffic and encodes it as Loki push
//! requests.
//!
//! # Crates
//!
//! - `loadgen_core` - label pools, label keys, batches and configuration
//! - `loadgen_generator` - seeded label sampling, log line synthesis and batch building
//! - `loadgen_encode` - protobuf+snappy and JSON push request encoding
//!
//! This crate ties them together into a [`Client`] that picks an encoding per
//! push and hands the payload to a [`PushSink`].
//!
//! # CLI Usage
//!
//! ```bash
//! # Four workers, ten pushes each, payloads written to disk
//! loki-loadgen run --config loadgen.yaml --workers 4 --iterations 10 --output-dir out/
//!
//! # Print one small batch
//! loki-loadgen sample --streams 2 --min-batch-size 1000 --max-batch-size 2000
//!
//! # Check a config file
//! loki-loadgen validate --config loadgen.yaml
//! ```

pub mod client;
pub mod config;
pub mod metrics;
pub mod report;
pub mod sink;

pub use client::{Client, ClientError, TENANT_PREFIX};
pub use metrics::{BatchStats, ClientMetrics};
pub use report::{RunReport, WorkerSummary};
pub use sink::{DirectorySink, DiscardSink, PushRequest, PushSink, SinkError, TENANT_HEADER};

pub use loadgen_core as core;
pub use loadgen_encode as encode;
pub use loadgen_generator as generator;

/// Seed of worker `index` derived from a base seed.
///
/// Workers sharing a base seed still draw independent label pools and batches.
pub fn worker_seed(base: u64, index: u64) -> u64 {
    base.wrapping_add(index.wrapping_mul(0x9E3779B97F4A7C15))
}
