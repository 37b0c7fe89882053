//! Batch observer trait for progress reporting.

use nc_measure::CutEvent;
use nc_topology::TopologyError;

use crate::{RunSummary, SimError};

/// Callbacks invoked by [`Batch::run`][crate::Batch::run] around every run.
///
/// Workers run in parallel and share one observer, so every hook takes
/// `&self`; use atomics or a lock for mutable state.  All methods default to
/// no-ops.
///
/// `batch` is the table number (as used in file names), `sim` the run index
/// inside that table.
pub trait RunObserver: Sync {
    fn on_run_start(&self, _worker: usize, _batch: u32, _sim: u32) {}

    /// The generator produced no usable topology; the run is skipped and the
    /// table's run count shrinks by one.
    fn on_insufficient_topology(&self, _worker: usize, _batch: u32, _error: &TopologyError) {}

    /// Called after the run finished, when a link was cut during it.
    fn on_link_cut(&self, _worker: usize, _batch: u32, _event: &CutEvent) {}

    fn on_run_end(&self, _worker: usize, _batch: u32, _summary: &RunSummary) {}

    /// The run was aborted; nothing is recorded for it.
    fn on_run_failed(&self, _worker: usize, _batch: u32, _error: &SimError) {}

    fn on_table_written(&self, _worker: usize, _batch: u32, _runs: usize) {}
}

/// A [`RunObserver`] that does nothing.
pub struct NoopObserver;

impl RunObserver for NoopObserver {}
