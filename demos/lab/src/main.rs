//! lab: runs a batch of link-failure experiments on the in-process backend.
//!
//! ```text
//! cargo run --release --bin lab -- [config.json] [output-dir]
//! ```
//!
//! Without a config file the reference defaults are used, compressed in time
//! so the whole batch finishes in seconds.  Set `RUST_LOG=info` (or `debug`)
//! to follow individual runs.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use std::{env, fs};

use anyhow::{Context, Result};
use log::info;

use nc_core::BatchConfig;
use nc_emu::LabFactory;
use nc_measure::CutEvent;
use nc_record::CsvRecordStore;
use nc_sim::{BatchBuilder, RunObserver, RunSummary, SimError};
use nc_topology::TopologyError;

// ── Constants ─────────────────────────────────────────────────────────────────

const DEFAULT_OUTPUT_DIR: &str = "output/lab";
const DEFAULT_TIME_SCALE: f64  = 10_000.0;
const DEFAULT_THREADS:    usize = 4;

// ── Observer ──────────────────────────────────────────────────────────────────

/// Tallies run events across all workers.
#[derive(Default)]
struct ProgressObserver {
    runs:         AtomicUsize,
    insufficient: AtomicUsize,
    cuts:         AtomicUsize,
    alarms:       AtomicUsize,
    failed:       AtomicUsize,
    flows:        AtomicUsize,
}

impl RunObserver for ProgressObserver {
    fn on_run_start(&self, _worker: usize, _batch: u32, _sim: u32) {
        self.runs.fetch_add(1, Ordering::Relaxed);
    }

    fn on_insufficient_topology(&self, _worker: usize, _batch: u32, _error: &TopologyError) {
        self.insufficient.fetch_add(1, Ordering::Relaxed);
    }

    fn on_link_cut(&self, worker: usize, batch: u32, event: &CutEvent) {
        info!("worker {worker} table {batch}: cut {} <-> {} at window {}", event.cut.a, event.cut.b, event.window);
        self.cuts.fetch_add(1, Ordering::Relaxed);
    }

    fn on_run_end(&self, _worker: usize, _batch: u32, summary: &RunSummary) {
        self.alarms.fetch_add(summary.alarms, Ordering::Relaxed);
        self.flows.fetch_add(summary.traffic.started as usize, Ordering::Relaxed);
    }

    fn on_run_failed(&self, _worker: usize, _batch: u32, _error: &SimError) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    fn on_table_written(&self, worker: usize, batch: u32, runs: usize) {
        println!("  table {batch} worker {worker}: {runs} runs");
    }
}

// ── Config ────────────────────────────────────────────────────────────────────

fn load_config(path: Option<&str>) -> Result<BatchConfig> {
    match path {
        Some(p) => {
            let text = fs::read_to_string(p).with_context(|| format!("reading {p}"))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {p}"))
        }
        None => Ok(BatchConfig {
            thread_count: DEFAULT_THREADS,
            time_scale: DEFAULT_TIME_SCALE,
            settle_secs: 30,
            generation_attempts: 20,
            ..BatchConfig::default()
        }),
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    pretty_env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let config = load_config(args.first().map(String::as_str))?;
    let out_dir = args.get(1).map_or(DEFAULT_OUTPUT_DIR, String::as_str);

    println!("=== lab: link-failure experiments ===");
    println!(
        "Workers: {}  |  Tables/worker: {}  |  Runs/table: {}  |  Seed: {}",
        config.thread_count, config.files, config.run.simulation_count, config.seed
    );
    println!(
        "Nodes: {}..={}  |  Windows: {} (cut at {})  |  Time scale: {}x",
        config.generator.min_nodes,
        config.generator.max_nodes,
        config.run.window_count,
        config.run.link_cut_window,
        config.time_scale
    );
    println!();

    let store = CsvRecordStore::new(out_dir)?;
    let batch = BatchBuilder::new(config, LabFactory, store).build()?;
    let observer = ProgressObserver::default();

    let t0 = Instant::now();
    let report = batch.run(&observer)?;
    let elapsed = t0.elapsed();

    println!();
    println!("Batch complete in {:.3} s", elapsed.as_secs_f64());
    println!("  runs attempted : {}", observer.runs.load(Ordering::Relaxed));
    println!("  recorded       : {}", report.completed());
    println!("  insufficient   : {}", observer.insufficient.load(Ordering::Relaxed));
    println!("  failed         : {}", observer.failed.load(Ordering::Relaxed));
    println!("  links cut      : {}", observer.cuts.load(Ordering::Relaxed));
    println!("  alarms raised  : {}", observer.alarms.load(Ordering::Relaxed));
    println!("  traffic flows  : {}", observer.flows.load(Ordering::Relaxed));
    println!("  tables in      : {}", batch.store().dir().display());
    println!();

    println!("{:<8} {:<8} {:<10} {:<14} {:<8}", "Worker", "Tables", "Recorded", "Insufficient", "Failed");
    println!("{}", "-".repeat(50));
    for w in &report.workers {
        println!("{:<8} {:<8} {:<10} {:<14} {:<8}", w.worker, w.tables, w.completed, w.insufficient, w.failed);
    }

    Ok(())
}
