//! Background traffic during the sampling phase.

use std::time::Duration;

use log::{debug, info, warn};

use nc_core::{Clock, HostId, SimRng};
use nc_emu::{EmulationBackend, TrafficFlow};

/// Port counter start; every flow takes the next port, so the first flow
/// listens on 5002.
pub const FIRST_TRAFFIC_PORT: u16 = 5001;

/// Extra wait granted to a busy endpoint before its flow is dropped.
pub const TRAFFIC_BUSY_WAIT: Duration = Duration::from_secs(1);

/// Counters of one traffic loop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TrafficReport {
    pub started:   u32,
    /// Skipped because an endpoint stayed busy.
    pub cancelled: u32,
    /// Iterations that overran their pacing slot.
    pub delayed:   u32,
    /// Rejected by the backend.
    pub failed:    u32,
}

/// Launches random flows between hosts at a fixed average rate.
///
/// The rate is `traffic_level × host_count` flows per second.  Source and
/// destination are drawn independently, so a host may send to itself.
pub struct TrafficGenerator<'a, B: ?Sized, C: ?Sized> {
    backend:      &'a B,
    clock:        &'a C,
    hosts:        &'a [HostId],
    level:        f64,
    max_duration: u32,
}

impl<'a, B, C> TrafficGenerator<'a, B, C>
where
    B: EmulationBackend + ?Sized,
    C: Clock + ?Sized,
{
    pub fn new(backend: &'a B, clock: &'a C, hosts: &'a [HostId], level: f64, max_duration: u32) -> Self {
        Self { backend, clock, hosts, level, max_duration }
    }

    /// Time between two flow launches, `None` when no traffic is configured.
    pub fn launch_interval(&self) -> Option<Duration> {
        let rate = self.level * self.hosts.len() as f64;
        (rate.is_finite() && rate > 0.0).then(|| Duration::from_secs_f64(1.0 / rate))
    }

    /// Generate traffic for `duration` of experiment time.
    pub fn run(&self, rng: &mut SimRng, duration: Duration) -> TrafficReport {
        let mut report = TrafficReport::default();
        let Some(interval) = self.launch_interval() else {
            debug!("traffic disabled (level {}, {} hosts)", self.level, self.hosts.len());
            return report;
        };
        info!("traffic for {duration:?}, one flow every {interval:?}");

        let start = self.clock.now();
        let mut port = FIRST_TRAFFIC_PORT;
        while self.clock.elapsed(start) < duration {
            let loop_start = self.clock.now();
            port = port.wrapping_add(1);

            let (Some(&src), Some(&dst)) = (rng.choose(self.hosts), rng.choose(self.hosts)) else {
                break;
            };
            let flow = TrafficFlow {
                src,
                dst,
                duration: Duration::from_secs(u64::from(rng.gen_range(1..=self.max_duration.max(1)))),
                port,
            };
            self.launch(flow, &mut report);

            let spent = self.clock.elapsed(loop_start);
            if spent < interval {
                self.clock.sleep(interval - spent);
            } else {
                report.delayed += 1;
                debug!("traffic delayed by {:?}", spent - interval);
            }
        }
        report
    }

    fn launch(&self, flow: TrafficFlow, report: &mut TrafficReport) {
        if self.backend.is_busy(flow.dst) {
            self.clock.sleep(TRAFFIC_BUSY_WAIT);
        }
        if self.backend.is_busy(flow.src) {
            self.clock.sleep(TRAFFIC_BUSY_WAIT);
        }
        if self.backend.is_busy(flow.src) || self.backend.is_busy(flow.dst) {
            debug!("traffic {} -> {} cancelled", flow.src, flow.dst);
            report.cancelled += 1;
            return;
        }
        match self.backend.start_traffic(flow) {
            Ok(()) => report.started += 1,
            Err(e) => {
                warn!("traffic {} -> {} on port {} failed: {e}", flow.src, flow.dst, flow.port);
                report.failed += 1;
            }
        }
    }
}
