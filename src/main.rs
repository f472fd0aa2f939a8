//! Command-line interface for loki-loadgen
//!
//! # Usage Examples
//!
//! ## Run
//! ```bash
//! # Four workers pushing for thirty seconds, payloads discarded
//! loki-loadgen run --config loadgen.yaml --workers 4 --duration 30s
//!
//! # Ten pushes per worker written to disk for inspection
//! loki-loadgen run --workers 2 --iterations 10 --output-dir out/ --tenant-id team-a
//! ```
//!
//! ## Sample
//! ```bash
//! loki-loadgen sample --streams 2 --min-batch-size 1000 --max-batch-size 2000 --seed 7
//! ```
//!
//! ## Validate
//! ```bash
//! loki-loadgen validate --config loadgen.yaml
//! ```

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use loadgen_core::ClientConfig;
use loadgen_encode::encode_json;
use loki_loadgen::config::parse_duration;
use loki_loadgen::{
    worker_seed, BatchStats, Client, DirectorySink, DiscardSink, PushSink, RunReport,
    WorkerSummary,
};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

#[derive(Parser)]
#[command(name = "loki-loadgen")]
#[command(about = "Generate synthetic log traffic for Loki load tests")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run workers that build, encode and push batches
    Run {
        #[command(flatten)]
        config: ConfigArgs,

        /// Number of concurrent workers
        #[arg(long, default_value = "1", env = "LOADGEN_WORKERS")]
        workers: u64,

        /// Pushes per worker (ignored when --duration is set)
        #[arg(long, default_value = "1")]
        iterations: u64,

        /// Push until this much time has passed (e.g. "30s", "5m", "1h")
        #[arg(long, value_parser = parse_duration_arg)]
        duration: Option<Duration>,

        /// Write every payload to this directory instead of discarding it
        #[arg(long, env = "LOADGEN_OUTPUT_DIR")]
        output_dir: Option<PathBuf>,
    },

    /// Build a single batch and print its lines
    Sample {
        #[command(flatten)]
        config: ConfigArgs,

        /// Print the JSON push request instead of plain lines
        #[arg(long)]
        json: bool,
    },

    /// Load and validate a config file
    Validate {
        /// Path to YAML config file
        #[arg(long, env = "LOADGEN_CONFIG")]
        config: PathBuf,
    },
}

#[derive(Args, Clone)]
struct ConfigArgs {
    /// Path to YAML config file
    #[arg(long, env = "LOADGEN_CONFIG")]
    config: Option<PathBuf>,

    /// Base random seed (overrides the config file)
    #[arg(long, env = "LOADGEN_SEED")]
    seed: Option<u64>,

    /// Tenant for every push (defaults to one tenant per worker)
    #[arg(long, env = "LOADGEN_TENANT_ID")]
    tenant_id: Option<String>,

    /// Streams per push
    #[arg(long)]
    streams: Option<usize>,

    /// Minimum batch size in bytes
    #[arg(long)]
    min_batch_size: Option<usize>,

    /// Maximum batch size in bytes (exclusive)
    #[arg(long)]
    max_batch_size: Option<usize>,

    /// Probability of protobuf encoding per push
    #[arg(long)]
    protobuf_ratio: Option<f64>,
}

impl ConfigArgs {
    fn load(&self) -> anyhow::Result<ClientConfig> {
        let mut config = match &self.config {
            Some(path) => ClientConfig::from_file(path)
                .with_context(|| format!("Failed to load config from {path:?}"))?,
            None => ClientConfig::default(),
        };
        if let Some(seed) = self.seed {
            config.rand_seed = seed;
        }
        if let Some(tenant) = &self.tenant_id {
            config.tenant_id = Some(tenant.clone());
        }
        if let Some(streams) = self.streams {
            config.streams = streams;
        }
        if let Some(min) = self.min_batch_size {
            config.min_batch_size = min;
        }
        if let Some(max) = self.max_batch_size {
            config.max_batch_size = max;
        }
        if let Some(ratio) = self.protobuf_ratio {
            config.protobuf_ratio = ratio;
        }
        config.validate().context("Invalid configuration")?;
        Ok(config)
    }
}

fn parse_duration_arg(s: &str) -> Result<Duration, String> {
    parse_duration(s).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            workers,
            iterations,
            duration,
            output_dir,
        } => {
            let config = config.load()?;
            let stop = match duration {
                Some(d) => StopCondition::Deadline(d),
                None => StopCondition::Iterations(iterations),
            };
            run_workers(config, workers, stop, output_dir).await
        }
        Commands::Sample { config, json } => {
            let config = config.load()?;
            run_sample(config, json)
        }
        Commands::Validate { config } => {
            let loaded = ClientConfig::from_file(&config)
                .with_context(|| format!("Failed to load config from {config:?}"))?;
            loaded
                .validate()
                .with_context(|| format!("Invalid configuration in {config:?}"))?;
            println!("{config:?} is valid");
            Ok(())
        }
    }
}

#[derive(Clone, Copy)]
enum StopCondition {
    Iterations(u64),
    Deadline(Duration),
}

async fn run_workers(
    config: ClientConfig,
    workers: u64,
    stop: StopCondition,
    output_dir: Option<PathBuf>,
) -> anyhow::Result<()> {
    if workers == 0 {
        anyhow::bail!("--workers must be at least 1");
    }
    tracing::info!(
        "Starting {} workers (seed={}, streams={}, batch size {}..{})",
        workers,
        config.rand_seed,
        config.streams,
        config.min_batch_size,
        config.max_batch_size
    );

    let (tx, mut rx) = mpsc::channel::<(u64, BatchStats)>(1024);
    let mut handles = Vec::new();
    for worker_id in 0..workers {
        let mut worker_config = config.clone();
        worker_config.rand_seed = worker_seed(config.rand_seed, worker_id);
        let output_dir = output_dir.clone();
        let tx = tx.clone();
        handles.push(tokio::task::spawn_blocking(move || {
            run_worker(worker_id, worker_config, stop, output_dir, tx)
        }));
    }
    drop(tx);

    let mut received = 0u64;
    while let Some((worker_id, stats)) = rx.recv().await {
        received += 1;
        tracing::debug!(
            "Worker {} pushed {} lines in {} streams ({} bytes as {})",
            worker_id,
            stats.lines,
            stats.streams,
            stats.payload_bytes,
            stats.encoding
        );
    }

    let mut summaries = Vec::with_capacity(handles.len());
    for handle in handles {
        summaries.push(handle.await.context("Worker task panicked")?);
    }
    tracing::info!("Received {} push results", received);

    let report = RunReport::from_workers(summaries);
    println!("{}", report.format_table());

    let failed = report.failed_workers();
    if failed > 0 {
        anyhow::bail!("{failed} of {workers} workers failed");
    }
    Ok(())
}

fn run_worker(
    worker_id: u64,
    config: ClientConfig,
    stop: StopCondition,
    output_dir: Option<PathBuf>,
    tx: mpsc::Sender<(u64, BatchStats)>,
) -> WorkerSummary {
    let start = Instant::now();
    let mut summary = WorkerSummary {
        worker_id,
        tenant_id: String::new(),
        metrics: Default::default(),
        duration_secs: 0.0,
        error: None,
    };

    let result = drive_worker(config, stop, output_dir.as_deref(), &tx, start, &mut summary);
    summary.duration_secs = start.elapsed().as_secs_f64();

    match result {
        Ok(()) => tracing::info!(
            "Worker {} finished {} pushes in {:.1}s",
            worker_id,
            summary.metrics.pushes,
            summary.duration_secs
        ),
        Err(e) => {
            tracing::error!("Worker {} failed: {:#}", worker_id, e);
            summary.error = Some(format!("{e:#}"));
        }
    }
    summary
}

fn drive_worker(
    config: ClientConfig,
    stop: StopCondition,
    output_dir: Option<&Path>,
    tx: &mpsc::Sender<(u64, BatchStats)>,
    start: Instant,
    summary: &mut WorkerSummary,
) -> anyhow::Result<()> {
    let worker_id = summary.worker_id;
    let mut client = Client::new(config, worker_id)
        .with_context(|| format!("Failed to create client for worker {worker_id}"))?;
    summary.tenant_id = client.tenant_id().to_string();

    let mut sink: Box<dyn PushSink> = match output_dir {
        Some(dir) => Box::new(
            DirectorySink::create(dir)
                .with_context(|| format!("Failed to create output directory {dir:?}"))?
                .with_prefix(format!("w{worker_id}-")),
        ),
        None => Box::new(DiscardSink::new()),
    };

    let mut iteration = 0u64;
    loop {
        let done = match stop {
            StopCondition::Iterations(n) => iteration >= n,
            StopCondition::Deadline(d) => start.elapsed() >= d,
        };
        if done {
            return Ok(());
        }

        let pushed = client.push(&mut sink);
        summary.metrics = client.metrics().clone();
        let stats =
            pushed.with_context(|| format!("Push {iteration} of worker {worker_id} failed"))?;
        if tx.blocking_send((worker_id, stats)).is_err() {
            // Receiver dropped, the run is shutting down
            return Ok(());
        }
        iteration += 1;
    }
}

fn run_sample(config: ClientConfig, json: bool) -> anyhow::Result<()> {
    let params = config.batch_params();
    let mut client = Client::new(config, 0).context("Failed to create client")?;
    let batch = client
        .generator_mut()
        .build(params)
        .context("Failed to build batch")?;

    if json {
        let payload = encode_json(&batch).context("Failed to encode batch")?;
        println!("{}", String::from_utf8_lossy(&payload));
        return Ok(());
    }

    for stream in batch.streams() {
        println!("{}", stream.labels());
        for entry in stream.entries() {
            println!("  {}  {}", entry.timestamp.to_rfc3339(), entry.line);
        }
    }
    tracing::info!(
        "{} lines, {} streams, {} bytes",
        batch.entry_count(),
        batch.stream_count(),
        batch.byte_size()
    );
    Ok(())
}
