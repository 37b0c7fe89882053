//! Fluent builder for constructing a [`Batch`].

use nc_core::{BatchConfig, Clock, ScaledClock};
use nc_emu::BackendFactory;
use nc_record::RecordStore;
use nc_topology::IndexAllocator;

use crate::{Batch, SimResult};

/// Fluent builder for [`Batch<F, S>`].
///
/// # Required inputs
///
/// - [`BatchConfig`]: run parameters, generator bounds, workers, seed
/// - `F: BackendFactory`: opens one emulated network per run
/// - `S: RecordStore`: receives one table per worker and batch file
///
/// # Optional inputs
///
/// | Method      | Default                                  |
/// |-------------|------------------------------------------|
/// | `.clock(c)` | `ScaledClock::new(config.time_scale)`    |
///
/// # Example
///
/// ```rust,ignore
/// let store = CsvRecordStore::new("./out")?;
/// let batch = BatchBuilder::new(config, LabFactory, store).build()?;
/// let report = batch.run(&NoopObserver)?;
/// ```
pub struct BatchBuilder<F, S> {
    config:  BatchConfig,
    factory: F,
    store:   S,
    clock:   Option<Box<dyn Clock>>,
}

impl<F: BackendFactory, S: RecordStore> BatchBuilder<F, S> {
    pub fn new(config: BatchConfig, factory: F, store: S) -> Self {
        Self { config, factory, store, clock: None }
    }

    /// Replace the clock derived from `config.time_scale`.
    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    /// Validate the configuration and return a ready-to-run [`Batch`].
    pub fn build(self) -> SimResult<Batch<F, S>> {
        self.config.validate()?;
        let clock = self
            .clock
            .unwrap_or_else(|| Box::new(ScaledClock::new(self.config.time_scale)));
        Ok(Batch {
            config:    self.config,
            factory:   self.factory,
            store:     self.store,
            clock,
            allocator: IndexAllocator::new(),
        })
    }
}
