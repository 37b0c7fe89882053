//! In-process lab emulation.
//!
//! `LabNetwork` keeps the device and link inventory in memory and answers
//! probes from the link attributes:
//!
//! - a ping follows the minimum-delay path over links that are up, and the
//!   round-trip time is twice the path delay plus a fixed per-reply overhead;
//! - an unreachable destination loses every packet;
//! - link loss is not sampled, so results depend only on topology, link
//!   delays and which links are down.
//!
//! Busy hosts can be injected with [`LabNetwork::set_busy`] to exercise the
//! callers' wait-and-retry paths.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use log::{debug, trace};

use nc_core::{HostId, SwitchId};

use crate::backend::{BackendFactory, Device, EmulationBackend, LinkParams, PingStats, TrafficFlow};
use crate::{EmuError, EmuResult};

/// Processing overhead added to every echo reply, in milliseconds.
pub const REPLY_OVERHEAD_MS: f64 = 0.1;

/// Packets sent by one pairwise ping.
const PING_PACKETS: u32 = 1;

struct LabLink {
    a:      Device,
    b:      Device,
    params: LinkParams,
    up:     bool,
}

impl LabLink {
    fn joins(&self, x: Device, y: Device) -> bool {
        (self.a == x && self.b == y) || (self.a == y && self.b == x)
    }
}

#[derive(Default)]
struct LabState {
    devices: HashSet<Device>,
    links:   Vec<LabLink>,
    started: bool,
    busy:    HashSet<HostId>,
    flows:   Vec<TrafficFlow>,
    pings:   u64,
}

impl LabState {
    fn require(&self, d: Device) -> EmuResult<()> {
        if self.devices.contains(&d) { Ok(()) } else { Err(EmuError::UnknownDevice(d)) }
    }

    fn insert(&mut self, d: Device) -> EmuResult<()> {
        if self.devices.insert(d) { Ok(()) } else { Err(EmuError::DuplicateDevice(d)) }
    }

    /// Minimum one-way delay (ms) from `from` to `to` over up links.
    fn path_delay(&self, from: Device, to: Device) -> Option<u32> {
        if from == to {
            return Some(0);
        }
        let mut adjacency: HashMap<Device, Vec<(Device, u32)>> = HashMap::new();
        for link in self.links.iter().filter(|l| l.up) {
            adjacency.entry(link.a).or_default().push((link.b, link.params.delay_ms));
            adjacency.entry(link.b).or_default().push((link.a, link.params.delay_ms));
        }

        let mut dist: HashMap<Device, u32> = HashMap::from([(from, 0)]);
        let mut heap = BinaryHeap::from([Reverse((0u32, from))]);
        while let Some(Reverse((cost, node))) = heap.pop() {
            if node == to {
                return Some(cost);
            }
            // Skip stale heap entries.
            if dist.get(&node).is_some_and(|&best| cost > best) {
                continue;
            }
            for &(next, delay) in adjacency.get(&node).map(Vec::as_slice).unwrap_or(&[]) {
                let candidate = cost.saturating_add(delay);
                if dist.get(&next).is_none_or(|&best| candidate < best) {
                    dist.insert(next, candidate);
                    heap.push(Reverse((candidate, next)));
                }
            }
        }
        None
    }
}

// ── LabNetwork ────────────────────────────────────────────────────────────────

/// Deterministic in-memory [`EmulationBackend`].
pub struct LabNetwork {
    controller: String,
    state:      Mutex<LabState>,
}

impl LabNetwork {
    pub fn new(controller: impl Into<String>) -> Self {
        Self { controller: controller.into(), state: Mutex::new(LabState::default()) }
    }

    fn state(&self) -> MutexGuard<'_, LabState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn controller(&self) -> &str {
        &self.controller
    }

    /// Mark a host busy (or free it again).
    pub fn set_busy(&self, host: HostId, busy: bool) {
        let mut s = self.state();
        if busy {
            s.busy.insert(host);
        } else {
            s.busy.remove(&host);
        }
    }

    pub fn is_started(&self) -> bool {
        self.state().started
    }

    pub fn link_count(&self) -> usize {
        self.state().links.len()
    }

    /// `Some(up)` for an existing link, `None` otherwise.
    pub fn link_state(&self, a: Device, b: Device) -> Option<bool> {
        self.state().links.iter().find(|l| l.joins(a, b)).map(|l| l.up)
    }

    pub fn link_params(&self, a: Device, b: Device) -> Option<LinkParams> {
        self.state().links.iter().find(|l| l.joins(a, b)).map(|l| l.params)
    }

    /// Links currently down.
    pub fn down_links(&self) -> Vec<(Device, Device)> {
        self.state().links.iter().filter(|l| !l.up).map(|l| (l.a, l.b)).collect()
    }

    /// Flows started so far.
    pub fn flows(&self) -> Vec<TrafficFlow> {
        self.state().flows.clone()
    }

    /// Ping exchanges answered so far (pairwise and loss probes).
    pub fn pings(&self) -> u64 {
        self.state().pings
    }

    fn probe(&self, src: HostId, dst: HostId) -> EmuResult<Option<u32>> {
        let mut s = self.state();
        if !s.started {
            return Err(EmuError::NotStarted);
        }
        s.require(Device::Host(src))?;
        s.require(Device::Host(dst))?;
        s.pings += 1;
        Ok(s.path_delay(Device::Host(src), Device::Host(dst)))
    }
}

impl EmulationBackend for LabNetwork {
    fn add_switch(&self, id: SwitchId) -> EmuResult<()> {
        self.state().insert(Device::Switch(id))
    }

    fn add_host(&self, id: HostId) -> EmuResult<()> {
        self.state().insert(Device::Host(id))
    }

    fn add_link(&self, a: Device, b: Device, params: LinkParams) -> EmuResult<()> {
        let mut s = self.state();
        s.require(a)?;
        s.require(b)?;
        trace!("lab link {a} <-> {b} {params:?}");
        s.links.push(LabLink { a, b, params, up: true });
        Ok(())
    }

    fn start(&self) -> EmuResult<()> {
        let mut s = self.state();
        s.started = true;
        debug!(
            "lab network started: {} devices, {} links, controller {}",
            s.devices.len(),
            s.links.len(),
            self.controller
        );
        Ok(())
    }

    fn set_link_down(&self, a: Device, b: Device) -> EmuResult<()> {
        let mut s = self.state();
        let link = s
            .links
            .iter_mut()
            .find(|l| l.joins(a, b))
            .ok_or(EmuError::UnknownLink(a, b))?;
        link.up = false;
        debug!("lab link {a} <-> {b} down");
        Ok(())
    }

    fn ping_pair(&self, src: HostId, dst: HostId, _timeout: Duration) -> EmuResult<PingStats> {
        Ok(match self.probe(src, dst)? {
            Some(delay) => PingStats::uniform(PING_PACKETS, 2.0 * f64::from(delay) + REPLY_OVERHEAD_MS),
            None => PingStats::lost(PING_PACKETS),
        })
    }

    fn ping_loss(&self, src: HostId, dst: HostId, _timeout: Duration) -> EmuResult<f64> {
        Ok(if self.probe(src, dst)?.is_some() { 0.0 } else { 100.0 })
    }

    fn is_busy(&self, host: HostId) -> bool {
        self.state().busy.contains(&host)
    }

    fn host_count(&self) -> usize {
        self.state().devices.iter().filter(|d| matches!(d, Device::Host(_))).count()
    }

    fn start_traffic(&self, flow: TrafficFlow) -> EmuResult<()> {
        let mut s = self.state();
        if !s.started {
            return Err(EmuError::NotStarted);
        }
        s.require(Device::Host(flow.src))?;
        s.require(Device::Host(flow.dst))?;
        s.flows.push(flow);
        Ok(())
    }

    fn stop(&self) -> EmuResult<()> {
        let mut s = self.state();
        s.started = false;
        debug!("lab network stopped after {} pings, {} flows", s.pings, s.flows.len());
        Ok(())
    }
}

// ── LabFactory ────────────────────────────────────────────────────────────────

/// Hands out a fresh [`LabNetwork`] per run.
#[derive(Clone, Copy, Debug, Default)]
pub struct LabFactory;

impl BackendFactory for LabFactory {
    type Backend = LabNetwork;

    fn connect(&self, worker: usize, controller: &str) -> EmuResult<LabNetwork> {
        debug!("worker {worker}: lab network on controller {controller}");
        Ok(LabNetwork::new(controller))
    }
}
