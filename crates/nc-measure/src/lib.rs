//! `nc-measure` — the concurrent measurement engine of one network run.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                          |
//! |-------------|-------------------------------------------------------------------|
//! | [`latency`] | `WindowAccumulator` (window averaging policy), `LatencyMatrix`    |
//! | [`sampler`] | `LatencySampler`, one per destination, sharing a probe channel    |
//! | [`cut`]     | `LinkCut`, `apply_cut`, `LinkCutCoordinator`, `CutEvent`          |
//! | [`faults`]  | `detect_faults`: post-run reachability with one retry             |
//! | [`traffic`] | `TrafficGenerator`, `TrafficReport`                               |
//! | [`session`] | `run_measurement`: samplers, coordinator and traffic together     |
//! | [`error`]   | `MeasureError`, `MeasureResult<T>`                                |
//!
//! # Phases
//!
//! 1. **Sampling** (concurrent): [`run_measurement`] starts one sampler per
//!    non-central node, the coordinator and the traffic loop as scoped
//!    threads, then joins them.
//! 2. **Fault detection** (sequential): [`detect_faults`] runs afterwards so
//!    it never competes with the samplers for the probe channel.

pub mod cut;
pub mod error;
pub mod faults;
pub mod latency;
pub mod sampler;
pub mod session;
pub mod traffic;


pub use cut::{CutEvent, LinkCut, LinkCutCoordinator, apply_cut};
pub use error::{MeasureError, MeasureResult};
pub use faults::{AlarmFlags, CONNECTIVITY_TIMEOUT, detect_faults};
pub use latency::{LatencyMatrix, WindowAccumulator};
pub use sampler::{BUSY_BACKOFF, LatencySampler, PROBE_TIMEOUT};
pub use session::{MeasurementOutcome, MeasurementPlan, run_measurement};
pub use traffic::{FIRST_TRAFFIC_PORT, TrafficGenerator, TrafficReport};
