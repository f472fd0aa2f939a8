//! Batch generator producing label-grouped streams of synthetic log lines.

use crate::clock::{Clock, SystemClock};
use crate::generators::{labels, logline};
use chrono::{DateTime, Utc};
use loadgen_core::{
    Batch, BatchParams, ConfigError, Entry, KnownFormats, LabelPool, LabelSet, LogFormat,
    FORMAT_LABEL, INSTANCE_LABEL,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

/// Error type for generator operations.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// Invalid pool, format set or batch parameters
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A stream's format rendered no text, so its byte budget could never be met
    #[error("Format '{0}' produced an empty log line")]
    EmptyLine(String),
}

/// Identity of the issuing client instance, rendered into the `instance` label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceIdentity {
    worker_id: u64,
    hostname: String,
}

impl InstanceIdentity {
    pub fn new(worker_id: u64, hostname: impl Into<String>) -> Self {
        Self {
            worker_id,
            hostname: hostname.into(),
        }
    }

    /// Identity for `worker_id` on the local host.
    pub fn detect(worker_id: u64) -> Self {
        let hostname = hostname::get()
            .ok()
            .and_then(|h| h.into_string().ok())
            .unwrap_or_else(|| "localhost".to_string());
        Self::new(worker_id, hostname)
    }

    pub fn worker_id(&self) -> u64 {
        self.worker_id
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// Value of the `instance` label, e.g. `vu3.loadgen-7f9c`.
    pub fn label_value(&self) -> String {
        format!("vu{}.{}", self.worker_id, self.hostname)
    }
}

/// Upper bound on streams pre-allocated per batch.
const MAX_PREALLOCATED_STREAMS: usize = 64;

/// Generator that assembles batches of label-grouped log streams.
///
/// One generator owns one seeded RNG. Label sampling, line synthesis and the
/// target size of each batch all draw from it, so the same pool, seed and
/// clock always produce the same batches.
pub struct BatchGenerator<C = SystemClock> {
    /// Candidate values per label
    pool: LabelPool,
    /// Formats this generator renders
    formats: KnownFormats,
    /// Fallback value for the `instance` label
    identity: InstanceIdentity,
    /// Key/value pairs appended to every rendered line
    line_metadata: Vec<(String, String)>,
    /// Seeded random number generator for reproducibility
    rng: StdRng,
    /// Source of entry timestamps
    clock: C,
}

impl BatchGenerator<SystemClock> {
    /// Create a generator with every known format and a seeded RNG.
    pub fn new(
        pool: LabelPool,
        identity: InstanceIdentity,
        seed: u64,
    ) -> Result<Self, GeneratorError> {
        Self::with_rng(
            pool,
            identity,
            KnownFormats::default(),
            StdRng::seed_from_u64(seed),
        )
    }

    /// Create a generator from an existing RNG, rejecting `format` label
    /// values outside `formats`.
    pub fn with_rng(
        pool: LabelPool,
        identity: InstanceIdentity,
        formats: KnownFormats,
        rng: StdRng,
    ) -> Result<Self, GeneratorError> {
        formats.validate_pool(&pool)?;
        Self::permissive(pool, identity, formats, rng)
    }

    /// Create a generator that tolerates unknown `format` label values.
    ///
    /// Label sets drawn with an unknown format are re-sampled, so at least
    /// one format of the pool must be in `formats`.
    pub fn permissive(
        pool: LabelPool,
        identity: InstanceIdentity,
        formats: KnownFormats,
        rng: StdRng,
    ) -> Result<Self, GeneratorError> {
        let mut known = 0;
        for value in pool.format_values() {
            if formats.lookup(value).is_some() {
                known += 1;
            } else {
                warn!("Label pool contains unknown format '{}'", value);
            }
        }
        if known == 0 {
            return Err(ConfigError::NoKnownFormat.into());
        }
        Ok(Self {
            pool,
            formats,
            identity,
            line_metadata: Vec::new(),
            rng,
            clock: SystemClock,
        })
    }
}

impl<C: Clock> BatchGenerator<C> {
    /// Replace the time source.
    pub fn with_clock<C2: Clock>(self, clock: C2) -> BatchGenerator<C2> {
        BatchGenerator {
            pool: self.pool,
            formats: self.formats,
            identity: self.identity,
            line_metadata: self.line_metadata,
            rng: self.rng,
            clock,
        }
    }

    /// Append these key/value pairs to every rendered line.
    pub fn with_line_metadata<K, V>(mut self, metadata: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.line_metadata = metadata
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self
    }

    /// Build a batch of up to `streams` streams whose total line bytes fall
    /// in `[min_size, max_size)` plus at most one line of overshoot per stream.
    ///
    /// The target size `T` is drawn from the range, then stream `i` is filled
    /// until the batch total reaches `T * (i + 1) / streams`. Streams whose
    /// threshold is already met get no entries and draw no labels. Streams
    /// with equal labels share one stream in the batch.
    pub fn build_batch(
        &mut self,
        streams: usize,
        min_size: usize,
        max_size: usize,
    ) -> Result<Batch, GeneratorError> {
        BatchParams::new(streams, min_size, max_size).validate()?;

        let target = self.rng.gen_range(min_size..max_size);
        let mut batch = Batch::with_capacity(
            streams.min(MAX_PREALLOCATED_STREAMS),
            self.clock.now(),
        );

        let mut next = first_open_stream(target, 0, streams);
        while let Some(i) = next {
            let threshold = cumulative_threshold(target, i, streams);
            let (labels, format) = self.sample_renderable_labels();
            let key = labels.canonical_key();
            while batch.byte_size() < threshold {
                let now = self.clock.now();
                let line = self.render_format(format, now);
                if line.is_empty() {
                    return Err(GeneratorError::EmptyLine(format.to_string()));
                }
                batch.append(&key, Entry::new(now, line));
            }
            next = first_open_stream(target, batch.byte_size(), streams);
        }

        debug!(
            "Built batch: target={} bytes={} streams={} entries={}",
            target,
            batch.byte_size(),
            batch.stream_count(),
            batch.entry_count()
        );

        Ok(batch)
    }

    /// Build a batch from [`BatchParams`].
    pub fn build(&mut self, params: BatchParams) -> Result<Batch, GeneratorError> {
        self.build_batch(params.streams, params.min_size, params.max_size)
    }

    /// Sample a label set from the pool, adding the `instance` label unless
    /// the pool supplies one.
    pub fn sample_labels(&mut self) -> LabelSet {
        let mut labels = labels::sample_labels(&mut self.rng, &self.pool);
        if !labels.contains(INSTANCE_LABEL) {
            labels.insert(INSTANCE_LABEL, self.identity.label_value());
        }
        labels
    }

    /// Sample label sets until one names a format this generator renders.
    fn sample_renderable_labels(&mut self) -> (LabelSet, LogFormat) {
        loop {
            let labels = self.sample_labels();
            let name = labels.get(FORMAT_LABEL).unwrap_or_default();
            match self.formats.lookup(name) {
                Some(format) => return (labels, format),
                None => warn!("Re-sampling labels with unknown format '{}'", name),
            }
        }
    }

    /// Render one line for a format identifier, or an empty string when the
    /// format is not in this generator's set.
    pub fn render_line(&mut self, format: &str, t: DateTime<Utc>) -> String {
        match self.formats.lookup(format) {
            Some(format) => self.render_format(format, t),
            None => String::new(),
        }
    }

    fn render_format(&mut self, format: LogFormat, t: DateTime<Utc>) -> String {
        logline::render_with_extra(&mut self.rng, format, t, &self.line_metadata)
    }

    /// The generator's RNG, for callers making further seeded choices.
    pub fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Read the generator's clock.
    pub fn now(&mut self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn pool(&self) -> &LabelPool {
        &self.pool
    }

    pub fn formats(&self) -> &KnownFormats {
        &self.formats
    }

    pub fn identity(&self) -> &InstanceIdentity {
        &self.identity
    }

    pub fn line_metadata(&self) -> &[(String, String)] {
        &self.line_metadata
    }
}

/// Byte total the batch must reach after stream `index` of `streams`.
fn cumulative_threshold(target: usize, index: usize, streams: usize) -> usize {
    (target as u128 * (index as u128 + 1) / streams as u128) as usize
}

/// Lowest stream index whose threshold exceeds `bytes`, if any.
///
/// Streams before it are already satisfied and are skipped without
/// iterating over them one by one.
fn first_open_stream(target: usize, bytes: usize, streams: usize) -> Option<usize> {
    if bytes >= target {
        return None;
    }
    // smallest i with target * (i + 1) >= (bytes + 1) * streams
    let needed = (bytes as u128 + 1) * streams as u128;
    let index = needed.div_ceil(target as u128) - 1;
    Some(index as usize)
}
