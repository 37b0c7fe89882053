//! The per-network run pipeline.
//!
//! ```text
//! generate topology ──► insufficient? ──► skip
//!        │
//! build switches, links (random attributes), one host per switch
//! start backend, settle
//! pick central node and link to cut
//! run_measurement (samplers + coordinator + traffic)
//! detect_faults
//! stop backend
//! encode RunRecord
//! ```
//!
//! Once the first device has been requested, the backend is stopped again
//! whatever happens while building, starting or measuring.

use std::time::Duration;

use log::{debug, info, warn};

use nc_core::{BatchConfig, Clock, HostId, NodeIndex, SimRng};
use nc_emu::{Device, EmulationBackend, LinkParams};
use nc_measure::{
    CutEvent, LinkCut, MeasurementOutcome, MeasurementPlan, TrafficReport, detect_faults, run_measurement,
};
use nc_record::RunRecord;
use nc_topology::{IndexAllocator, Topology, TopologyError, generate_with_attempts};

use crate::SimResult;

/// Extra settle time per worker id, so workers do not hit the controller at
/// the same moment.
pub const SETTLE_STAGGER: Duration = Duration::from_secs(2);

/// Shared inputs of every run on one worker.
pub struct RunContext<'a, C: ?Sized> {
    pub config:    &'a BatchConfig,
    pub allocator: &'a IndexAllocator,
    pub clock:     &'a C,
    pub worker:    usize,
}

/// What a finished run looked like.
#[derive(Clone, Debug)]
pub struct RunSummary {
    pub nodes:   usize,
    pub central: NodeIndex,
    pub cut:     Option<CutEvent>,
    /// Nodes flagged unreachable after the run.
    pub alarms:  usize,
    pub traffic: TrafficReport,
}

#[derive(Debug)]
pub enum RunOutcome {
    Completed { record: RunRecord, summary: RunSummary },
    Insufficient(TopologyError),
}

impl<'a, C> RunContext<'a, C>
where
    C: Clock + ?Sized,
{
    pub fn settle_time(&self) -> Duration {
        Duration::from_secs(u64::from(self.config.settle_secs)) + SETTLE_STAGGER * self.worker as u32
    }

    /// Run one network on a fresh `backend`.
    pub fn run_network<B>(&self, backend: &B, rng: &mut SimRng) -> SimResult<RunOutcome>
    where
        B: EmulationBackend + ?Sized,
    {
        let topology = match generate_with_attempts(
            &self.config.generator,
            self.allocator,
            rng,
            self.config.generation_attempts,
        ) {
            Ok(t) => t,
            Err(e @ TopologyError::Insufficient { .. }) => {
                info!("worker {}: {e}, skipping run", self.worker);
                return Ok(RunOutcome::Insufficient(e));
            }
            Err(e) => return Err(e.into()),
        };

        let measured = self
            .build(backend, &topology, rng)
            .and_then(|hosts| {
                backend.start()?;
                Ok(hosts)
            })
            .and_then(|hosts| self.measure(backend, &topology, &hosts, rng));
        if let Err(e) = backend.stop() {
            warn!("worker {}: backend teardown failed: {e}", self.worker);
        }
        let (central, outcome, alarms) = measured?;

        let summary = RunSummary {
            nodes:   topology.node_count(),
            central,
            cut:     outcome.cut,
            alarms:  alarms.iter().filter(|&&a| a == 1).count(),
            traffic: outcome.traffic,
        };
        let record = RunRecord::from_measurements(
            &self.config.run,
            central,
            alarms,
            &outcome.latency,
            outcome.adjacency_pre,
            outcome.adjacency_post,
        );
        Ok(RunOutcome::Completed { record, summary })
    }

    /// Create every device and link; returns the hosts in node order.
    fn build<B>(&self, backend: &B, topology: &Topology, rng: &mut SimRng) -> SimResult<Vec<HostId>>
    where
        B: EmulationBackend + ?Sized,
    {
        for &switch in &topology.switches {
            backend.add_switch(switch)?;
        }
        for &edge in &topology.edges {
            if let Some((a, b)) = topology.endpoints(edge) {
                let params = LinkParams::random(rng, &self.config.links);
                backend.add_link(Device::Switch(a), Device::Switch(b), params)?;
            }
        }

        let hosts = self.allocator.allocate_hosts(topology.node_count());
        for (&host, &switch) in hosts.iter().zip(&topology.switches) {
            backend.add_host(host)?;
            backend.add_link(Device::Host(host), Device::Switch(switch), LinkParams::access())?;
        }
        debug!(
            "worker {}: built {} switches, {} links, {} hosts",
            self.worker,
            topology.node_count(),
            topology.edges.len(),
            hosts.len()
        );
        Ok(hosts)
    }

    fn measure<B>(
        &self,
        backend:  &B,
        topology: &Topology,
        hosts:    &[HostId],
        rng:      &mut SimRng,
    ) -> SimResult<(NodeIndex, MeasurementOutcome, Vec<u8>)>
    where
        B: EmulationBackend + ?Sized,
    {
        self.clock.sleep(self.settle_time());

        let central = NodeIndex::at(rng.gen_range(0..topology.node_count()));
        let cut = if rng.gen_bool(self.config.chance_of_no_link_cut) {
            None
        } else {
            rng.choose(&topology.removable).and_then(|&e| LinkCut::from_edge(topology, e))
        };

        let plan = MeasurementPlan {
            topology,
            hosts,
            central,
            cut,
            params: self.config.run,
            traffic_level: self.config.traffic_level,
        };
        let outcome = run_measurement(backend, self.clock, &plan, rng)?;
        let alarms = detect_faults(backend, central, hosts)?;
        Ok((central, outcome, alarms))
    }
}
