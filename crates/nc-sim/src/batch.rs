//! The `Batch` runner and its worker loop.

use log::{error, info};
use rayon::prelude::*;

use nc_core::{BatchConfig, Clock, SimRng};
use nc_emu::BackendFactory;
use nc_record::{RecordStore, RecordTable};
use nc_topology::IndexAllocator;

use crate::run::{RunContext, RunOutcome};
use crate::{RunObserver, SimError, SimResult};

/// Counters of one worker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WorkerReport {
    pub worker:       usize,
    pub tables:       u32,
    pub completed:    u32,
    pub insufficient: u32,
    /// Runs aborted by a backend, measurement or structural error.
    pub failed:       u32,
}

/// Counters of a whole batch, one entry per worker in worker order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub workers: Vec<WorkerReport>,
}

impl BatchReport {
    pub fn completed(&self) -> u32 {
        self.workers.iter().map(|w| w.completed).sum()
    }

    pub fn insufficient(&self) -> u32 {
        self.workers.iter().map(|w| w.insufficient).sum()
    }

    pub fn failed(&self) -> u32 {
        self.workers.iter().map(|w| w.failed).sum()
    }

    pub fn tables(&self) -> u32 {
        self.workers.iter().map(|w| w.tables).sum()
    }
}

/// A configured batch of simulations.
///
/// `thread_count` workers run in parallel on a dedicated Rayon pool.  Each
/// worker writes `files` tables; each table collects up to
/// `run.simulation_count` runs.  All workers share one [`IndexAllocator`] so
/// device names never collide.
///
/// Create via [`BatchBuilder`][crate::BatchBuilder].
pub struct Batch<F, S> {
    pub(crate) config:    BatchConfig,
    pub(crate) factory:   F,
    pub(crate) store:     S,
    pub(crate) clock:     Box<dyn Clock>,
    pub(crate) allocator: IndexAllocator,
}

impl<F: BackendFactory, S: RecordStore> Batch<F, S> {
    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn allocator(&self) -> &IndexAllocator {
        &self.allocator
    }

    /// Run every worker to completion.
    ///
    /// A failing run is reported to the observer and skipped.  A worker stops
    /// only when its table cannot be written; the first such error is
    /// returned after every worker has finished.
    pub fn run<O: RunObserver>(&self, observer: &O) -> SimResult<BatchReport> {
        let workers = self.config.thread_count;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("worker-{i}"))
            .build()?;

        let mut root = SimRng::new(self.config.seed);
        let rngs: Vec<SimRng> = (0..workers).map(|w| root.child(w as u64)).collect();

        info!(
            "batch: {workers} workers × {} tables × {} runs",
            self.config.files, self.config.run.simulation_count
        );
        let results: Vec<SimResult<WorkerReport>> = pool.install(|| {
            rngs.into_par_iter()
                .enumerate()
                .map(|(worker, rng)| self.run_worker(worker, rng, observer))
                .collect()
        });

        let mut report = BatchReport::default();
        let mut first_error = None;
        for result in results {
            match result {
                Ok(w) => report.workers.push(w),
                Err(e) => {
                    error!("worker aborted: {e}");
                    first_error.get_or_insert(e);
                }
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => {
                info!(
                    "batch done: {} runs recorded, {} insufficient, {} failed",
                    report.completed(),
                    report.insufficient(),
                    report.failed()
                );
                Ok(report)
            }
        }
    }

    fn run_worker<O: RunObserver>(&self, worker: usize, mut rng: SimRng, observer: &O) -> SimResult<WorkerReport> {
        let controller = self.config.controller_for(worker).ok_or(SimError::NoController(worker))?;
        let ctx = RunContext {
            config:    &self.config,
            allocator: &self.allocator,
            clock:     self.clock.as_ref(),
            worker,
        };
        let mut report = WorkerReport { worker, ..WorkerReport::default() };

        for file in 0..self.config.files {
            let batch = self.config.file_start_number + file;
            let mut table = RecordTable::new(self.config.run);

            for sim in 0..self.config.run.simulation_count {
                observer.on_run_start(worker, batch, sim);
                info!("worker {worker}: simulation {sim} for table {batch}");

                let outcome = self
                    .factory
                    .connect(worker, controller)
                    .map_err(SimError::from)
                    .and_then(|backend| ctx.run_network(&backend, &mut rng));
                match outcome {
                    Ok(RunOutcome::Completed { record, summary }) => {
                        if let Some(event) = &summary.cut {
                            observer.on_link_cut(worker, batch, event);
                        }
                        observer.on_run_end(worker, batch, &summary);
                        table.push(record);
                        report.completed += 1;
                    }
                    Ok(RunOutcome::Insufficient(e)) => {
                        observer.on_insufficient_topology(worker, batch, &e);
                        report.insufficient += 1;
                    }
                    Err(e) => {
                        error!("worker {worker}: simulation {sim} aborted: {e}");
                        observer.on_run_failed(worker, batch, &e);
                        report.failed += 1;
                    }
                }
            }

            self.store.write_table(batch, worker, &table)?;
            observer.on_table_written(worker, batch, table.len());
            report.tables += 1;
        }
        Ok(report)
    }
}
