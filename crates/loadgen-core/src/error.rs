//! Configuration error type.

use thiserror::Error;

/// Errors caused by invalid configuration.
///
/// These indicate a caller or config-file defect and are reported before any
/// batch is generated.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error reading a config file
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing YAML
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A label has an empty candidate list
    #[error("Label '{0}' has no candidate values")]
    EmptyCandidates(String),

    /// A label name is not a valid Prometheus-style identifier
    #[error("Invalid label name: {0:?}")]
    InvalidLabelName(String),

    /// The pool has no `format` label to select line formats from
    #[error("Label pool has no 'format' label")]
    MissingFormatLabel,

    /// None of the pool's formats can be rendered
    #[error("Label pool has no known format")]
    NoKnownFormat,

    /// A format identifier is not in the known format set
    #[error("Unknown log format: {0}")]
    UnknownFormat(String),

    /// The batch size range is empty
    #[error("Invalid batch size range: min {min} must be below max {max}")]
    InvalidSizeRange { min: usize, max: usize },

    /// A batch was requested with no streams
    #[error("Stream count must be at least 1")]
    ZeroStreams,

    /// A cardinality was configured for a label that cannot be synthesized
    #[error("Unknown cardinality label: {0}")]
    UnknownCardinality(String),

    /// A cardinality of zero would produce an empty candidate list
    #[error("Cardinality for '{0}' must be at least 1")]
    ZeroCardinality(String),

    /// The protobuf/JSON selection ratio is not a probability
    #[error("protobuf_ratio must be within [0, 1], got {0}")]
    InvalidProtobufRatio(f64),
}
