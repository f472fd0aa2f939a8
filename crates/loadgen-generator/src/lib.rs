//! Synthetic log traffic generator for loki-loadgen.
//!
//! This crate provides the `BatchGenerator`, which samples label sets from a
//! [`LabelPool`](loadgen_core::LabelPool), renders synthetic log lines in the
//! format named by each set's `format` label and packs them into a
//! [`Batch`](loadgen_core::Batch) of a randomized byte size.
//!
//! # Architecture
//!
//! ```text
//! LabelPool + KnownFormats
//!        │
//!        ▼
//! ┌──────────────────┐
//! │  BatchGenerator  │
//! │                  │
//! │  - rng (StdRng)  │
//! │  - clock         │
//! │  - identity      │
//! └────────┬─────────┘
//!          │  build_batch(streams, min, max)
//!          ▼
//!    Batch { streams: [Stream { labels, entries }], bytes }
//! ```
//!
//! # Example
//!
//! ```rust
//! use loadgen_core::LabelPool;
//! use loadgen_generator::{BatchGenerator, InstanceIdentity};
//!
//! let pool = LabelPool::from_slices(&[
//!     ("format", &["json", "logfmt"]),
//!     ("app", &["api", "web"]),
//! ])
//! .unwrap();
//!
//! let mut generator = BatchGenerator::new(pool, InstanceIdentity::new(1, "localhost"), 42).unwrap();
//! let batch = generator.build_batch(2, 4096, 8192).unwrap();
//! assert!(batch.byte_size() >= 4096);
//! ```
//!
//! # Formats
//!
//! `apache_common`, `apache_combined`, `apache_error`, `rfc3164`, `rfc5424`,
//! `common_log`, `json` and `logfmt`.

pub mod clock;
pub mod generator;
pub mod generators;

// Re-exports for convenience
pub use clock::{Clock, SteppedClock, SystemClock};
pub use generator::{BatchGenerator, GeneratorError, InstanceIdentity};
