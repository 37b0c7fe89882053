//! Emulation backend trait and the plain data that crosses it.
//!
//! # Thread safety
//!
//! One backend instance serves a whole run: every sampler thread, the
//! link-cut coordinator and the traffic loop call into it concurrently, so
//! implementations must be `Send + Sync` and take `&self`.  Serialising the
//! probe channel is the caller's job (the samplers share one lock); the
//! backend only has to be memory-safe under concurrent calls.

use std::fmt;
use std::time::Duration;

use nc_core::{HostId, LinkProfile, SimRng, SwitchId};

use crate::EmuResult;

// ── Device ────────────────────────────────────────────────────────────────────

/// An emulated device, named `s{n}` (switch) or `hs{n}` (host).
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub enum Device {
    Switch(SwitchId),
    Host(HostId),
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Switch(s) => write!(f, "{s}"),
            Device::Host(h) => write!(f, "{h}"),
        }
    }
}

// ── LinkParams ────────────────────────────────────────────────────────────────

/// Traffic-control attributes of one emulated link.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LinkParams {
    pub bandwidth_mbit: u32,
    pub delay_ms:       u32,
    pub loss_percent:   u32,
    pub max_queue_size: u32,
    /// Hierarchical token bucket shaping instead of TBF.
    pub use_htb:        bool,
}

impl LinkParams {
    /// Draw attributes from `profile`.  The queue bound grows with the
    /// bandwidth so fast links are not starved of buffer.
    pub fn random(rng: &mut SimRng, profile: &LinkProfile) -> Self {
        let bandwidth_mbit = rng.gen_range(1..=profile.max_bandwidth_mbit);
        Self {
            bandwidth_mbit,
            delay_ms:       rng.gen_range(1..=profile.max_delay_ms),
            loss_percent:   rng.gen_range(0..=profile.max_loss_percent),
            max_queue_size: rng.gen_range(profile.min_queue_size..=profile.max_queue_size)
                + bandwidth_mbit,
            use_htb:        rng.gen_bool(0.5),
        }
    }

    /// Unshaped host access link.
    pub fn access() -> Self {
        Self {
            bandwidth_mbit: 1000,
            delay_ms:       0,
            loss_percent:   0,
            max_queue_size: 1000,
            use_htb:        false,
        }
    }
}

// ── PingStats ─────────────────────────────────────────────────────────────────

/// Summary of one ping exchange, round-trip times in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct PingStats {
    pub sent:     u32,
    pub received: u32,
    pub rtt_min:  f64,
    pub rtt_avg:  f64,
    pub rtt_max:  f64,
    pub rtt_dev:  f64,
}

impl PingStats {
    /// Every packet lost.
    pub fn lost(sent: u32) -> Self {
        Self { sent, ..Self::default() }
    }

    /// Every packet answered with the same round-trip time.
    pub fn uniform(sent: u32, rtt_ms: f64) -> Self {
        Self {
            sent,
            received: sent,
            rtt_min:  rtt_ms,
            rtt_avg:  rtt_ms,
            rtt_max:  rtt_ms,
            rtt_dev:  0.0,
        }
    }

    /// Percentage of packets lost, 100 when nothing was sent.
    pub fn loss_percent(&self) -> f64 {
        if self.sent == 0 {
            return 100.0;
        }
        100.0 * f64::from(self.sent - self.received.min(self.sent)) / f64::from(self.sent)
    }
}

// ── TrafficFlow ───────────────────────────────────────────────────────────────

/// One background TCP flow from `src` to a server on `dst:port`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrafficFlow {
    pub src:      HostId,
    pub dst:      HostId,
    pub duration: Duration,
    pub port:     u16,
}

// ── EmulationBackend ──────────────────────────────────────────────────────────

/// Capabilities the experiment core needs from a network emulator.
pub trait EmulationBackend: Send + Sync {
    fn add_switch(&self, id: SwitchId) -> EmuResult<()>;

    fn add_host(&self, id: HostId) -> EmuResult<()>;

    /// Create a link between two existing devices.
    fn add_link(&self, a: Device, b: Device, params: LinkParams) -> EmuResult<()>;

    /// Build the network and attach the controller.
    fn start(&self) -> EmuResult<()>;

    /// Bring the link between `a` and `b` down.
    fn set_link_down(&self, a: Device, b: Device) -> EmuResult<()>;

    /// Pairwise ping `src → dst`, giving up after `timeout`.
    fn ping_pair(&self, src: HostId, dst: HostId, timeout: Duration) -> EmuResult<PingStats>;

    /// Connectivity probe: percentage of packets lost `src → dst`.
    fn ping_loss(&self, src: HostId, dst: HostId, timeout: Duration) -> EmuResult<f64>;

    /// `true` while the host's shell is occupied or not yet available.
    fn is_busy(&self, host: HostId) -> bool;

    /// Hosts added so far.
    fn host_count(&self) -> usize;

    /// Launch a background flow; returns as soon as it is started.
    fn start_traffic(&self, flow: TrafficFlow) -> EmuResult<()>;

    /// Tear the whole network down.
    fn stop(&self) -> EmuResult<()>;
}

// ── BackendFactory ────────────────────────────────────────────────────────────

/// Creates one backend per emulated network.
///
/// The batch runner calls [`connect`][Self::connect] once per run on the
/// worker thread that owns the run.
pub trait BackendFactory: Send + Sync {
    type Backend: EmulationBackend;

    /// Open a fresh, empty network controlled by `controller`.
    fn connect(&self, worker: usize, controller: &str) -> EmuResult<Self::Backend>;
}
