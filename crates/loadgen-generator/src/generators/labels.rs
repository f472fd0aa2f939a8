//! Label sampling and label pool derivation.

use super::faker;
use loadgen_core::{ConfigError, LabelPool, LabelSet, LogFormat, FORMAT_LABEL};
use rand::Rng;
use std::collections::BTreeMap;

/// Operating systems in every derived pool.
pub const OS_VALUES: [&str; 3] = ["darwin", "linux", "windows"];

/// Draw one value per label, visiting labels in name order.
pub fn sample_labels<R: Rng>(rng: &mut R, pool: &LabelPool) -> LabelSet {
    let mut labels = LabelSet::new();
    for (name, values) in pool.iter() {
        let idx = rng.gen_range(0..values.len());
        labels.insert(name, values[idx].as_str());
    }
    labels
}

/// Derive a label pool from per-label cardinalities.
///
/// The pool always carries every known `format` and the `os` label. Each
/// configured cardinality adds that many synthesized values for its label.
pub fn generate_label_pool<R: Rng>(
    rng: &mut R,
    cardinalities: &BTreeMap<String, usize>,
) -> Result<LabelPool, ConfigError> {
    let mut labels: BTreeMap<String, Vec<String>> = BTreeMap::new();
    labels.insert(
        FORMAT_LABEL.to_string(),
        LogFormat::ALL.iter().map(|f| f.as_str().to_string()).collect(),
    );
    labels.insert(
        "os".to_string(),
        OS_VALUES.iter().map(|s| s.to_string()).collect(),
    );

    for (name, &count) in cardinalities {
        if count == 0 {
            return Err(ConfigError::ZeroCardinality(name.clone()));
        }
        let values: Vec<String> = match name.as_str() {
            "namespace" | "pod" => (0..count).map(|_| faker::bs(rng)).collect(),
            "app" => (0..count).map(|_| faker::app_name(rng)).collect(),
            "language" => (0..count)
                .map(|_| faker::language_abbreviation(rng).to_string())
                .collect(),
            "word" => (0..count).map(|_| faker::noun(rng).to_string()).collect(),
            _ => return Err(ConfigError::UnknownCardinality(name.clone())),
        };
        labels.insert(name.clone(), values);
    }

    LabelPool::new(labels)
}
