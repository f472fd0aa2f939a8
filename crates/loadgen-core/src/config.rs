//! Client configuration.
//!
//! Configuration is an explicit, typed struct loaded from YAML. Every field
//! has a default, so an empty document is a valid configuration:
//!
//! ```yaml
//! tenant_id: load-test
//! protobuf_ratio: 0.9
//! rand_seed: 12345
//! streams: 5
//! min_batch_size: 819200
//! max_batch_size: 1048576
//! cardinalities:
//!   app: 5
//!   namespace: 10
//!   pod: 50
//! # Optional explicit pool; replaces the cardinality-derived one
//! labels:
//!   format: [logfmt]
//!   cluster: [k3d, minikube]
//! ```

use crate::error::ConfigError;
use crate::format::KnownFormats;
use crate::labels::LabelPool;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Labels whose candidate values can be synthesized from a cardinality.
pub const CARDINALITY_LABELS: [&str; 5] = ["namespace", "app", "pod", "language", "word"];

/// Default number of streams per push.
pub const DEFAULT_STREAMS: usize = 5;
/// Default lower bound of the batch size range (800 KiB).
pub const DEFAULT_MIN_BATCH_SIZE: usize = 800 * 1024;
/// Default upper bound of the batch size range (1 MiB).
pub const DEFAULT_MAX_BATCH_SIZE: usize = 1024 * 1024;
/// Default share of pushes encoded as protobuf.
pub const DEFAULT_PROTOBUF_RATIO: f64 = 0.9;
/// Default random seed.
pub const DEFAULT_RAND_SEED: u64 = 12345;

/// Configuration of a single client instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    /// Tenant sent with every push. When unset, each worker uses its own tenant.
    pub tenant_id: Option<String>,

    /// Probability of encoding a push as protobuf+snappy instead of JSON.
    pub protobuf_ratio: f64,

    /// Number of synthesized values per label (see [`CARDINALITY_LABELS`]).
    pub cardinalities: BTreeMap<String, usize>,

    /// Explicit label pool. Takes precedence over `cardinalities`.
    pub labels: Option<BTreeMap<String, Vec<String>>>,

    /// Seed of the instance random source.
    pub rand_seed: u64,

    /// Streams per push.
    pub streams: usize,

    /// Lower bound (inclusive) of the batch size in bytes.
    pub min_batch_size: usize,

    /// Upper bound (exclusive) of the batch size in bytes.
    pub max_batch_size: usize,

    /// Reject `format` label values outside the known format set.
    pub strict_formats: bool,

    /// Key/value pairs appended to every generated line.
    pub line_metadata: BTreeMap<String, String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            tenant_id: None,
            protobuf_ratio: DEFAULT_PROTOBUF_RATIO,
            cardinalities: BTreeMap::from([
                ("app".to_string(), 5),
                ("namespace".to_string(), 10),
                ("pod".to_string(), 50),
            ]),
            labels: None,
            rand_seed: DEFAULT_RAND_SEED,
            streams: DEFAULT_STREAMS,
            min_batch_size: DEFAULT_MIN_BATCH_SIZE,
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
            strict_formats: true,
            line_metadata: BTreeMap::new(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Batch parameters used by default pushes.
    pub fn batch_params(&self) -> BatchParams {
        BatchParams {
            streams: self.streams,
            min_size: self.min_batch_size,
            max_size: self.max_batch_size,
        }
    }

    /// Check every field, failing on the first invalid one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.protobuf_ratio) {
            return Err(ConfigError::InvalidProtobufRatio(self.protobuf_ratio));
        }

        self.batch_params().validate()?;

        match &self.labels {
            Some(labels) => {
                let pool = LabelPool::new(labels.clone())?;
                let formats = KnownFormats::default();
                if self.strict_formats {
                    formats.validate_pool(&pool)?;
                } else if !pool
                    .format_values()
                    .iter()
                    .any(|value| formats.lookup(value).is_some())
                {
                    return Err(ConfigError::NoKnownFormat);
                }
            }
            None => {
                for (name, &n) in &self.cardinalities {
                    if !CARDINALITY_LABELS.contains(&name.as_str()) {
                        return Err(ConfigError::UnknownCardinality(name.clone()));
                    }
                    if n == 0 {
                        return Err(ConfigError::ZeroCardinality(name.clone()));
                    }
                }
            }
        }

        Ok(())
    }
}

/// Stream count and byte range of a single batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchParams {
    pub streams: usize,
    /// Inclusive lower bound of the target size
    pub min_size: usize,
    /// Exclusive upper bound of the target size
    pub max_size: usize,
}

impl BatchParams {
    pub fn new(streams: usize, min_size: usize, max_size: usize) -> Self {
        Self {
            streams,
            min_size,
            max_size,
        }
    }

    /// Reject zero streams and empty size ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.streams == 0 {
            return Err(ConfigError::ZeroStreams);
        }
        if self.min_size >= self.max_size {
            return Err(ConfigError::InvalidSizeRange {
                min: self.min_size,
                max: self.max_size,
            });
        }
        Ok(())
    }
}

impl Default for BatchParams {
    fn default() -> Self {
        Self::new(DEFAULT_STREAMS, DEFAULT_MIN_BATCH_SIZE, DEFAULT_MAX_BATCH_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.streams, 5);
        assert_eq!(config.min_batch_size, 800 * 1024);
        assert_eq!(config.max_batch_size, 1024 * 1024);
        assert_eq!(config.protobuf_ratio, 0.9);
        assert_eq!(config.cardinalities.get("pod"), Some(&50));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let config = ClientConfig::from_yaml("{}").unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_from_yaml() {
        let config = ClientConfig::from_yaml(
            r#"
tenant_id: team-a
protobuf_ratio: 1.0
rand_seed: 7
streams: 10
min_batch_size: 1024
max_batch_size: 2048
labels:
  format: [logfmt]
  os: [linux]
  cluster: [k3d, minikube]
"#,
        )
        .unwrap();

        assert_eq!(config.tenant_id.as_deref(), Some("team-a"));
        assert_eq!(config.rand_seed, 7);
        assert_eq!(config.batch_params(), BatchParams::new(10, 1024, 2048));
        assert_eq!(config.labels.as_ref().unwrap()["cluster"].len(), 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result = ClientConfig::from_yaml("protobufRatio: 0.5\n");
        assert!(matches!(result, Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn test_validate_size_range() {
        let config = ClientConfig {
            min_batch_size: 500,
            max_batch_size: 100,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSizeRange { min: 500, max: 100 })
        ));

        let equal = BatchParams::new(1, 100, 100);
        assert!(equal.validate().is_err());
    }

    #[test]
    fn test_validate_zero_streams() {
        assert!(matches!(
            BatchParams::new(0, 1, 2).validate(),
            Err(ConfigError::ZeroStreams)
        ));
    }

    #[test]
    fn test_validate_ratio() {
        let config = ClientConfig {
            protobuf_ratio: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidProtobufRatio(_))
        ));
    }

    #[test]
    fn test_validate_cardinalities() {
        let mut config = ClientConfig::default();
        config.cardinalities.insert("container".to_string(), 3);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnknownCardinality(name)) if name == "container"
        ));

        let mut config = ClientConfig::default();
        config.cardinalities.insert("word".to_string(), 0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZeroCardinality(name)) if name == "word"
        ));
    }

    #[test]
    fn test_validate_label_formats() {
        let labels = BTreeMap::from([("format".to_string(), vec!["nginx".to_string()])]);
        let strict = ClientConfig {
            labels: Some(labels.clone()),
            ..Default::default()
        };
        assert!(matches!(
            strict.validate(),
            Err(ConfigError::UnknownFormat(_))
        ));

        let permissive = ClientConfig {
            labels: Some(labels),
            strict_formats: false,
            ..Default::default()
        };
        assert!(matches!(
            permissive.validate(),
            Err(ConfigError::NoKnownFormat)
        ));

        let mixed = ClientConfig {
            labels: Some(BTreeMap::from([(
                "format".to_string(),
                vec!["json".to_string(), "nginx".to_string()],
            )])),
            strict_formats: false,
            ..Default::default()
        };
        assert!(mixed.validate().is_ok());
    }

    #[test]
    fn test_line_metadata_from_yaml() {
        let config = ClientConfig::from_yaml("line_metadata:\n  trace_id: abc\n").unwrap();
        assert_eq!(
            config.line_metadata.get("trace_id").map(String::as_str),
            Some("abc")
        );
        assert!(ClientConfig::default().line_metadata.is_empty());
    }

    #[test]
    fn test_validate_empty_candidates() {
        let config = ClientConfig {
            labels: Some(BTreeMap::from([
                ("format".to_string(), vec!["json".to_string()]),
                ("app".to_string(), vec![]),
            ])),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyCandidates(_))
        ));
    }
}
