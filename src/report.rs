//! Run summary across workers.

use crate::metrics::ClientMetrics;
use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};
use serde::{Deserialize, Serialize};

/// Outcome of a single worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerSummary {
    pub worker_id: u64,
    pub tenant_id: String,
    pub metrics: ClientMetrics,
    pub duration_secs: f64,
    /// Error that stopped the worker early
    pub error: Option<String>,
}

impl WorkerSummary {
    pub fn success(&self) -> bool {
        self.error.is_none()
    }

    pub fn lines_per_second(&self) -> Option<f64> {
        if self.duration_secs > 0.0 {
            Some(self.metrics.lines as f64 / self.duration_secs)
        } else {
            None
        }
    }
}

/// Aggregated totals of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub workers: Vec<WorkerSummary>,
    pub totals: ClientMetrics,
    /// Longest worker duration
    pub wall_clock_secs: f64,
}

impl RunReport {
    pub fn from_workers(mut workers: Vec<WorkerSummary>) -> Self {
        workers.sort_by_key(|w| w.worker_id);
        let mut totals = ClientMetrics::default();
        for worker in &workers {
            totals.merge(&worker.metrics);
        }
        let wall_clock_secs = workers
            .iter()
            .map(|w| w.duration_secs)
            .fold(0.0f64, |a, b| a.max(b));
        Self {
            workers,
            totals,
            wall_clock_secs,
        }
    }

    pub fn failed_workers(&self) -> usize {
        self.workers.iter().filter(|w| !w.success()).count()
    }

    /// Render the per-worker table with a totals row.
    pub fn format_table(&self) -> String {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(vec![
            "Worker",
            "Tenant",
            "Pushes",
            "Protobuf/JSON",
            "Lines",
            "Bytes",
            "Payload",
            "Duration",
            "Status",
        ]);

        for worker in &self.workers {
            let status = match &worker.error {
                None => Cell::new("OK").fg(Color::Green),
                Some(e) => Cell::new(format!("FAILED: {e}")).fg(Color::Red),
            };
            table.add_row(vec![
                Cell::new(worker.worker_id),
                Cell::new(&worker.tenant_id),
                Cell::new(format_number(worker.metrics.pushes)),
                Cell::new(format!(
                    "{}/{}",
                    worker.metrics.protobuf_pushes, worker.metrics.json_pushes
                )),
                Cell::new(format_number(worker.metrics.lines)),
                Cell::new(format_bytes(worker.metrics.uncompressed_bytes)),
                Cell::new(format_bytes(worker.metrics.payload_bytes)),
                Cell::new(format_duration(worker.duration_secs)),
                status,
            ]);
        }

        table.add_row(vec![
            Cell::new("TOTAL").fg(Color::Cyan),
            Cell::new(format!("{} workers", self.workers.len())),
            Cell::new(format_number(self.totals.pushes)),
            Cell::new(format!(
                "{}/{}",
                self.totals.protobuf_pushes, self.totals.json_pushes
            )),
            Cell::new(format_number(self.totals.lines)),
            Cell::new(format_bytes(self.totals.uncompressed_bytes)),
            Cell::new(format_bytes(self.totals.payload_bytes)),
            Cell::new(format_duration(self.wall_clock_secs)),
            Cell::new(format!(
                "{}/{}",
                self.workers.len() - self.failed_workers(),
                self.workers.len()
            )),
        ]);

        let mut output = table.to_string();
        if let Some(ratio) = self.totals.compression_ratio() {
            output.push_str(&format!("\nPayload/line bytes: {:.3}\n", ratio));
        }
        output
    }
}

fn format_duration(secs: f64) -> String {
    if secs < 60.0 {
        format!("{secs:.1}s")
    } else if secs < 3600.0 {
        let mins = (secs / 60.0).floor();
        format!("{}m {:02.0}s", mins as u64, secs - mins * 60.0)
    } else {
        let hours = (secs / 3600.0).floor();
        let mins = ((secs - hours * 3600.0) / 60.0).floor();
        format!("{}h {:02.0}m", hours as u64, mins)
    }
}

/// Format number with thousands separators.
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}

/// Format a byte count with a binary unit.
pub fn format_bytes(n: u64) -> String {
    const UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];
    if n < 1024 {
        return format!("{n} B");
    }
    let mut value = n as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}
