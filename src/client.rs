//! Per-worker load test client.

use crate::metrics::{BatchStats, ClientMetrics};
use crate::sink::{PushRequest, PushSink, SinkError};
use loadgen_core::{Batch, ClientConfig, ConfigError, KnownFormats, LabelPool};
use loadgen_encode::{encode, EncodeError, Encoding};
use loadgen_generator::generators::generate_label_pool;
use loadgen_generator::{BatchGenerator, Clock, GeneratorError, InstanceIdentity, SystemClock};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tracing::{debug, warn};

/// Prefix of the per-worker tenant used when no tenant is configured.
pub const TENANT_PREFIX: &str = "xk6-tenant";

/// Errors that can occur while pushing.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Generator error: {0}")]
    Generator(#[from] GeneratorError),

    #[error("Encoding error: {0}")]
    Encode(#[from] EncodeError),

    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),
}

/// A single load test client.
///
/// Owns one seeded RNG (inside its generator) from which the label pool,
/// every batch and every encoding choice are drawn.
pub struct Client<C = SystemClock> {
    config: ClientConfig,
    tenant_id: String,
    generator: BatchGenerator<C>,
    metrics: ClientMetrics,
}

impl Client<SystemClock> {
    /// Create a client for `worker_id` on the local host.
    pub fn new(config: ClientConfig, worker_id: u64) -> Result<Self, ClientError> {
        Self::with_identity(config, InstanceIdentity::detect(worker_id))
    }

    /// Create a client with an explicit instance identity.
    pub fn with_identity(
        config: ClientConfig,
        identity: InstanceIdentity,
    ) -> Result<Self, ClientError> {
        config.validate()?;

        let mut rng = StdRng::seed_from_u64(config.rand_seed);
        let pool = match &config.labels {
            Some(labels) => LabelPool::new(labels.clone())?,
            None => generate_label_pool(&mut rng, &config.cardinalities)?,
        };

        let tenant_id = match &config.tenant_id {
            Some(tenant) => tenant.clone(),
            None => {
                warn!("Running in multi-tenant mode, each worker has its own X-Scope-OrgID");
                format!("{}-{}", TENANT_PREFIX, identity.worker_id())
            }
        };

        let formats = KnownFormats::default();
        let generator = if config.strict_formats {
            BatchGenerator::with_rng(pool, identity, formats, rng)?
        } else {
            BatchGenerator::permissive(pool, identity, formats, rng)?
        }
        .with_line_metadata(config.line_metadata.clone());

        debug!(
            "Created client for tenant {} with {} labels",
            tenant_id,
            generator.pool().len()
        );

        Ok(Self {
            config,
            tenant_id,
            generator,
            metrics: ClientMetrics::default(),
        })
    }
}

impl<C: Clock> Client<C> {
    /// Replace the clock used for entry timestamps.
    pub fn with_clock<C2: Clock>(self, clock: C2) -> Client<C2> {
        Client {
            config: self.config,
            tenant_id: self.tenant_id,
            generator: self.generator.with_clock(clock),
            metrics: self.metrics,
        }
    }

    /// Push a batch built with the configured stream count and size range.
    pub fn push<S: PushSink + ?Sized>(&mut self, sink: &mut S) -> Result<BatchStats, ClientError> {
        let params = self.config.batch_params();
        self.push_parameterized(sink, params.streams, params.min_size, params.max_size)
    }

    /// Push a batch of `streams` streams sized within `[min_size, max_size)`.
    pub fn push_parameterized<S: PushSink + ?Sized>(
        &mut self,
        sink: &mut S,
        streams: usize,
        min_size: usize,
        max_size: usize,
    ) -> Result<BatchStats, ClientError> {
        let batch = match self.generator.build_batch(streams, min_size, max_size) {
            Ok(batch) => batch,
            Err(e) => {
                self.metrics.record_error();
                return Err(e.into());
            }
        };
        let encoding = self.choose_encoding();
        self.push_batch(sink, &batch, encoding)
    }

    /// Encode a finished batch and hand it to the sink.
    pub fn push_batch<S: PushSink + ?Sized>(
        &mut self,
        sink: &mut S,
        batch: &Batch,
        encoding: Encoding,
    ) -> Result<BatchStats, ClientError> {
        let result = self.send(sink, batch, encoding);
        match &result {
            Ok(stats) => self.metrics.record(stats),
            Err(e) => {
                warn!("Push failed for tenant {}: {}", self.tenant_id, e);
                self.metrics.record_error();
            }
        }
        result
    }

    fn send<S: PushSink + ?Sized>(
        &self,
        sink: &mut S,
        batch: &Batch,
        encoding: Encoding,
    ) -> Result<BatchStats, ClientError> {
        let encoded = encode(batch, encoding)?;
        let request = PushRequest {
            body: &encoded.payload,
            encoding,
            tenant_id: &self.tenant_id,
            entries: encoded.entries,
            uncompressed_bytes: batch.byte_size(),
        };
        sink.push(&request)?;

        Ok(BatchStats {
            uncompressed_bytes: batch.byte_size(),
            lines: encoded.entries,
            streams: batch.stream_count(),
            payload_bytes: encoded.payload.len(),
            encoding,
        })
    }

    /// Pick protobuf with probability `protobuf_ratio`, JSON otherwise.
    pub fn choose_encoding(&mut self) -> Encoding {
        if self.generator.rng_mut().gen::<f64>() < self.config.protobuf_ratio {
            Encoding::Protobuf
        } else {
            Encoding::Json
        }
    }

    /// Tenant sent with every push.
    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn metrics(&self) -> &ClientMetrics {
        &self.metrics
    }

    pub fn generator(&self) -> &BatchGenerator<C> {
        &self.generator
    }

    pub fn generator_mut(&mut self) -> &mut BatchGenerator<C> {
        &mut self.generator
    }
}
