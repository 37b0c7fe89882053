//! Run and batch configuration.
//!
//! [`RunParameters`] is the small, fixed set of values every stored table
//! starts with; a decoder needs nothing else to slice the records that follow.
//! [`BatchConfig`] wraps it with the knobs that shape topology generation,
//! link attributes, traffic and worker layout.  It is plain serde data so the
//! application crate can load it from JSON.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult};

// ── RunParameters ─────────────────────────────────────────────────────────────

/// Global parameters shared by every run in one table.
///
/// Field order here is the storage order of a table's first row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunParameters {
    /// Successful runs stored in the table (insufficient topologies are not
    /// counted).
    pub simulation_count: u32,
    /// Seconds between the starts of two consecutive probes.
    pub time_between_pings: u32,
    pub pings_per_window: u32,
    pub window_count: u32,
    /// Window boundary at which the link is cut.  Equal to `window_count`
    /// means "never".
    pub link_cut_window: u32,
    /// Upper bound (seconds) for one background traffic flow.
    pub max_traffic_duration: u32,
}

impl Default for RunParameters {
    fn default() -> Self {
        Self {
            simulation_count:     1,
            time_between_pings:   30,
            pings_per_window:     4,
            window_count:         5,
            link_cut_window:      2,
            max_traffic_duration: 5,
        }
    }
}

impl RunParameters {
    /// Check the cross-field invariants.
    pub fn validate(&self) -> CoreResult<()> {
        if self.pings_per_window == 0 {
            return Err(CoreError::Config("pings_per_window must be at least 1".into()));
        }
        if self.window_count == 0 {
            return Err(CoreError::Config("window_count must be at least 1".into()));
        }
        if self.link_cut_window > self.window_count {
            return Err(CoreError::Config(format!(
                "link_cut_window {} exceeds window_count {}",
                self.link_cut_window, self.window_count
            )));
        }
        if self.max_traffic_duration == 0 {
            return Err(CoreError::Config("max_traffic_duration must be at least 1".into()));
        }
        Ok(())
    }

    /// `true` when the configured boundary lies inside the run.
    #[inline]
    pub fn schedules_cut(&self) -> bool {
        self.link_cut_window < self.window_count
    }

    #[inline]
    pub fn ping_interval(&self) -> Duration {
        Duration::from_secs(u64::from(self.time_between_pings))
    }

    /// Length of one measurement window.
    #[inline]
    pub fn window_duration(&self) -> Duration {
        self.ping_interval() * self.pings_per_window
    }

    /// Length of the whole sampling phase (all windows).
    #[inline]
    pub fn sampling_duration(&self) -> Duration {
        self.window_duration() * self.window_count
    }

    #[inline]
    pub fn windows_before_cut(&self) -> usize {
        self.link_cut_window.min(self.window_count) as usize
    }

    #[inline]
    pub fn windows_after_cut(&self) -> usize {
        self.window_count as usize - self.windows_before_cut()
    }
}

// ── GeneratorConfig ───────────────────────────────────────────────────────────

/// Size bounds for the random topology generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Lower bound is really `min_nodes + max_loop_size`.
    pub min_nodes:       u32,
    pub max_nodes:       u32,
    /// Largest ring added by one loop operation (≥ 3).
    pub max_loop_size:   u32,
    /// Upper bound of the fan-out draw of one branch operation.
    pub max_branch_size: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            min_nodes:       10,
            max_nodes:       75,
            max_loop_size:   15,
            max_branch_size: 15,
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> CoreResult<()> {
        if self.max_loop_size < 3 {
            return Err(CoreError::Config("max_loop_size must be at least 3".into()));
        }
        if self.max_branch_size == 0 {
            return Err(CoreError::Config("max_branch_size must be at least 1".into()));
        }
        let lower = self
            .min_nodes
            .checked_add(self.max_loop_size)
            .ok_or_else(|| CoreError::Config("min_nodes + max_loop_size overflows".into()))?;
        if lower > self.max_nodes {
            return Err(CoreError::Config(format!(
                "min_nodes + max_loop_size ({lower}) exceeds max_nodes ({})",
                self.max_nodes
            )));
        }
        Ok(())
    }
}

// ── LinkProfile ───────────────────────────────────────────────────────────────

/// Ranges the per-link attributes are drawn from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkProfile {
    pub max_bandwidth_mbit: u32,
    pub max_delay_ms:       u32,
    pub max_loss_percent:   u32,
    pub min_queue_size:     u32,
    /// Upper bound before the bandwidth is added on top.
    pub max_queue_size:     u32,
}

impl Default for LinkProfile {
    fn default() -> Self {
        Self {
            max_bandwidth_mbit: 1000,
            max_delay_ms:       5,
            max_loss_percent:   1,
            min_queue_size:     100,
            max_queue_size:     10_000,
        }
    }
}

impl LinkProfile {
    pub fn validate(&self) -> CoreResult<()> {
        if self.max_bandwidth_mbit == 0 || self.max_delay_ms == 0 {
            return Err(CoreError::Config("link bandwidth and delay bounds must be positive".into()));
        }
        if self.max_loss_percent > 100 {
            return Err(CoreError::Config("max_loss_percent must be within 0..=100".into()));
        }
        if self.min_queue_size > self.max_queue_size {
            return Err(CoreError::Config("min_queue_size exceeds max_queue_size".into()));
        }
        Ok(())
    }
}

// ── BatchConfig ───────────────────────────────────────────────────────────────

/// Top-level batch configuration.
///
/// Typically loaded from a JSON file by the application crate and passed to
/// the batch runner.  Missing fields take the reference defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// `simulation_count` here is the number of runs attempted per table.
    pub run:                   RunParameters,
    pub generator:             GeneratorConfig,
    pub links:                 LinkProfile,

    /// Background flows started per host per second; 0 disables traffic.
    pub traffic_level:         f64,

    /// Probability that a run keeps every link up.
    pub chance_of_no_link_cut: f64,

    /// Tables written per worker.
    pub files:                 u32,

    /// Batch index of the first table (used in file names).
    pub file_start_number:     u32,

    /// Worker count: one emulated network per worker at a time.
    pub thread_count:          usize,

    /// Seconds to let the controller converge after start, plus two seconds
    /// per worker id to stagger the workers.
    pub settle_secs:           u32,

    /// Generation attempts per run before it is counted as insufficient.
    pub generation_attempts:   u32,

    /// Master RNG seed.  The same seed always produces identical topologies.
    pub seed:                  u64,

    /// Experiment seconds per real second (1.0 = real time).
    pub time_scale:            f64,

    /// Controller endpoints, assigned round-robin by worker id.
    pub controllers:           Vec<String>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            run:                   RunParameters::default(),
            generator:             GeneratorConfig::default(),
            links:                 LinkProfile::default(),
            traffic_level:         0.05,
            chance_of_no_link_cut: 0.2,
            files:                 1,
            file_start_number:     1,
            thread_count:          8,
            settle_secs:           180,
            generation_attempts:   1,
            seed:                  42,
            time_scale:            1.0,
            controllers:           vec!["127.0.0.1:6633".to_owned()],
        }
    }
}

impl BatchConfig {
    /// Validate every nested section plus the batch-level knobs.
    pub fn validate(&self) -> CoreResult<()> {
        self.run.validate()?;
        self.generator.validate()?;
        self.links.validate()?;
        if !(0.0..=1.0).contains(&self.chance_of_no_link_cut) {
            return Err(CoreError::Config("chance_of_no_link_cut must be within [0, 1]".into()));
        }
        if !(self.traffic_level >= 0.0 && self.traffic_level.is_finite()) {
            return Err(CoreError::Config("traffic_level must be a non-negative number".into()));
        }
        if self.thread_count == 0 {
            return Err(CoreError::Config("thread_count must be at least 1".into()));
        }
        if self.generation_attempts == 0 {
            return Err(CoreError::Config("generation_attempts must be at least 1".into()));
        }
        if !(self.time_scale > 0.0) {
            return Err(CoreError::Config("time_scale must be positive".into()));
        }
        if self.controllers.is_empty() {
            return Err(CoreError::Config("at least one controller endpoint is required".into()));
        }
        Ok(())
    }

    /// Controller endpoint for `worker`; `None` only when the list is empty.
    pub fn controller_for(&self, worker: usize) -> Option<&str> {
        if self.controllers.is_empty() {
            return None;
        }
        Some(self.controllers[worker % self.controllers.len()].as_str())
    }
}
