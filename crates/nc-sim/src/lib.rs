//! `nc-sim` — runs batches of link-failure experiments.
//!
//! # Worker loop
//!
//! ```text
//! for worker in 0..thread_count (parallel, Rayon pool):
//!   for table in file_start_number..file_start_number + files:
//!     for sim in 0..simulation_count:
//!       connect backend → run_network → Completed | Insufficient | failed
//!     RecordStore::write_table(table, worker)
//! ```
//!
//! Insufficient topologies and failed runs leave no record, so a table's
//! stored run count can be lower than `simulation_count`.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use nc_core::BatchConfig;
//! use nc_emu::LabFactory;
//! use nc_record::CsvRecordStore;
//! use nc_sim::{BatchBuilder, NoopObserver};
//!
//! let batch = BatchBuilder::new(BatchConfig::default(), LabFactory, CsvRecordStore::new("out")?)
//!     .build()?;
//! let report = batch.run(&NoopObserver)?;
//! ```

pub mod batch;
pub mod builder;
pub mod error;
pub mod observer;
pub mod run;


pub use batch::{Batch, BatchReport, WorkerReport};
pub use builder::BatchBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, RunObserver};
pub use run::{RunContext, RunOutcome, RunSummary};
