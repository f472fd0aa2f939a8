//! Core types for the loki-loadgen log traffic generator.
//!
//! This crate provides the data model shared by the generator, the encoders
//! and the client:
//!
//! - [`LabelPool`] - Candidate values per label name
//! - [`LabelSet`] - One chosen value per label name, with its canonical key
//! - [`Batch`] - Label-grouped streams of log entries with byte accounting
//! - [`LogFormat`] / [`KnownFormats`] - The log line formats a generator accepts
//! - [`ClientConfig`] - Typed client configuration loaded from YAML
//!
//! # Architecture
//!
//! ```text
//! loadgen-core (this crate)
//!    │
//!    ├─── loadgen-generator  (samples labels, synthesizes lines, builds batches)
//!    │
//!    ├─── loadgen-encode     (protobuf+snappy and JSON push payloads)
//!    │
//!    └─── loki-loadgen       (per-worker client, sinks, CLI)
//! ```
//!
//! # Example
//!
//! ```rust
//! use chrono::Utc;
//! use loadgen_core::{Batch, Entry, LabelSet};
//!
//! let labels: LabelSet = [("app", "api"), ("format", "json")].into_iter().collect();
//! let key = labels.canonical_key();
//! assert_eq!(key, r#"{app="api", format="json"}"#);
//!
//! let mut batch = Batch::new(Utc::now());
//! batch.append(&key, Entry::new(Utc::now(), "hello"));
//! assert_eq!(batch.byte_size(), 5);
//! ```

pub mod batch;
pub mod config;
pub mod error;
pub mod format;
pub mod labels;

// Re-exports for convenience
pub use batch::{Batch, Entry, Stream};
pub use config::{BatchParams, ClientConfig, CARDINALITY_LABELS};
pub use error::ConfigError;
pub use format::{KnownFormats, LogFormat};
pub use labels::{
    is_valid_label_name, parse_label_key, LabelKeyError, LabelPool, LabelSet, FORMAT_LABEL,
    INSTANCE_LABEL,
};
