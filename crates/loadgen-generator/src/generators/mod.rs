//! Value generators for labels and log lines.
//!
//! All generators are free functions over a caller-owned [`rand::Rng`], so a
//! single seeded RNG drives every random choice of a generator instance.

pub mod faker;
pub mod labels;
pub mod logline;

pub use labels::{generate_label_pool, sample_labels};
pub use logline::{render, render_format, render_with_extra};
