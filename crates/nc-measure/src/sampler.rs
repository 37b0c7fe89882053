//! Per-destination latency sampler.
//!
//! One sampler runs per non-central host.  All samplers of a network share a
//! single probe channel (a `Mutex<()>`): a sampler holds it for exactly one
//! ping and drops it right after.  When either endpoint reports busy the
//! sampler releases the channel, sleeps [`BUSY_BACKOFF`] and checks again.
//! A busy host delays a probe but never fails it.
//!
//! Probes are paced from their start time, so a slow ping shortens the
//! following sleep instead of shifting every later probe.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use log::{debug, trace};

use nc_core::{Clock, HostId, RunParameters};
use nc_emu::EmulationBackend;

use crate::latency::WindowAccumulator;

/// Timeout handed to the backend for one sampling ping.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(1);

/// Wait between availability checks of a busy endpoint.
pub const BUSY_BACKOFF: Duration = Duration::from_secs(1);

/// Samples latency from `central` to `target` over every window of a run.
pub struct LatencySampler<'a, B: ?Sized, C: ?Sized> {
    backend: &'a B,
    clock:   &'a C,
    channel: &'a Mutex<()>,
    params:  RunParameters,
    central: HostId,
    target:  HostId,
}

impl<'a, B, C> LatencySampler<'a, B, C>
where
    B: EmulationBackend + ?Sized,
    C: Clock + ?Sized,
{
    pub fn new(
        backend: &'a B,
        clock:   &'a C,
        channel: &'a Mutex<()>,
        params:  RunParameters,
        central: HostId,
        target:  HostId,
    ) -> Self {
        Self { backend, clock, channel, params, central, target }
    }

    /// Run all windows; returns one average per window.
    pub fn run(&self) -> Vec<f64> {
        let interval = self.params.ping_interval();
        let mut window = WindowAccumulator::new(self.params.pings_per_window);
        let mut averages = Vec::with_capacity(self.params.window_count as usize);

        for w in 0..self.params.window_count {
            for k in 0..self.params.pings_per_window {
                let start = self.clock.now();
                let rtt = self.probe();
                window.record(k, rtt);
                self.clock.pace(start, interval);
            }
            let avg = window.finish();
            trace!("{} -> {} window {w}: {avg:.3} ms", self.central, self.target);
            averages.push(avg);
        }
        averages
    }

    /// One ping through the shared channel.  `None` when nothing came back.
    fn probe(&self) -> Option<f64> {
        loop {
            let guard = self.channel.lock().unwrap_or_else(PoisonError::into_inner);
            if self.backend.is_busy(self.central) || self.backend.is_busy(self.target) {
                drop(guard);
                trace!("{} or {} busy, waiting", self.central, self.target);
                self.clock.sleep(BUSY_BACKOFF);
                continue;
            }
            let result = self.backend.ping_pair(self.central, self.target, PROBE_TIMEOUT);
            drop(guard);

            return match result {
                Ok(stats) if stats.rtt_avg > 0.0 => Some(stats.rtt_avg),
                Ok(_) => None,
                Err(e) => {
                    debug!("ping {} -> {} failed: {e}", self.central, self.target);
                    None
                }
            };
        }
    }
}
