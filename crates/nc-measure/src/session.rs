//! One measurement phase: samplers, link-cut coordinator and traffic together.
//!
//! Every task is a scoped thread borrowing the backend, the clock and the
//! shared state of the run.  All of them are started before any is joined.
//! Sampler results are joined in node order, never in completion order, so
//! column `i` of the latency matrix always belongs to node `i`.

use std::sync::{Mutex, PoisonError};
use std::thread::{self, ScopedJoinHandle};

use log::{debug, info};

use nc_core::{Clock, HostId, NodeIndex, RunParameters, SimRng};
use nc_emu::EmulationBackend;
use nc_topology::{AdjacencyMatrix, Topology};

use crate::cut::{CutEvent, LinkCut, LinkCutCoordinator};
use crate::latency::LatencyMatrix;
use crate::sampler::LatencySampler;
use crate::traffic::{TrafficGenerator, TrafficReport};
use crate::{MeasureError, MeasureResult};

/// Seed offset of the traffic loop's child rng.
const TRAFFIC_RNG_OFFSET: u64 = 0x7261_6666;

/// Everything a measurement phase needs to know about the run.
#[derive(Clone, Copy, Debug)]
pub struct MeasurementPlan<'a> {
    pub topology:      &'a Topology,
    /// One host per node, in node order.
    pub hosts:         &'a [HostId],
    pub central:       NodeIndex,
    pub cut:           Option<LinkCut>,
    pub params:        RunParameters,
    pub traffic_level: f64,
}

/// Result of [`run_measurement`].
#[derive(Clone, Debug)]
pub struct MeasurementOutcome {
    pub latency:        LatencyMatrix,
    pub adjacency_pre:  AdjacencyMatrix,
    pub adjacency_post: AdjacencyMatrix,
    pub cut:            Option<CutEvent>,
    pub traffic:        TrafficReport,
}

/// Run the sampling phase of one network.
///
/// Returns once every window of every sampler is done.  A cut that cannot be
/// applied (`EdgeAbsent`) or a backend refusing to drop the link fails the
/// whole phase.
pub fn run_measurement<B, C>(
    backend: &B,
    clock:   &C,
    plan:    &MeasurementPlan<'_>,
    rng:     &mut SimRng,
) -> MeasureResult<MeasurementOutcome>
where
    B: EmulationBackend + ?Sized,
    C: Clock + ?Sized,
{
    let nodes = plan.topology.node_count();
    if plan.hosts.len() != nodes {
        return Err(MeasureError::NodeOutOfRange { index: NodeIndex::at(plan.hosts.len()), nodes });
    }
    let central_host = *plan
        .hosts
        .get(plan.central.index())
        .ok_or(MeasureError::NodeOutOfRange { index: plan.central, nodes })?;

    let params = plan.params;
    let adjacency_pre = plan.topology.adjacency();
    let live = Mutex::new(adjacency_pre.clone());
    let channel = Mutex::new(());
    let mut traffic_rng = rng.child(TRAFFIC_RNG_OFFSET);

    info!(
        "measuring {nodes} nodes from {central_host}: {} windows, cut {}",
        params.window_count,
        plan.cut.map_or_else(|| "none".to_string(), |c| format!("{} <-> {} at window {}", c.a, c.b, params.link_cut_window)),
    );

    let (series, cut, traffic) = thread::scope(|s| -> MeasureResult<_> {
        let generator = TrafficGenerator::new(
            backend,
            clock,
            plan.hosts,
            plan.traffic_level,
            params.max_traffic_duration,
        );
        let traffic = thread::Builder::new()
            .name("traffic".into())
            .spawn_scoped(s, move || generator.run(&mut traffic_rng, params.sampling_duration()))?;

        let coordinator = LinkCutCoordinator::new(backend, clock, plan.topology, &live, params, plan.cut);
        let cutter = thread::Builder::new()
            .name("link-cut".into())
            .spawn_scoped(s, move || coordinator.run())?;

        let mut samplers: Vec<(NodeIndex, ScopedJoinHandle<'_, Vec<f64>>)> = Vec::with_capacity(nodes);
        for (i, &target) in plan.hosts.iter().enumerate() {
            if i == plan.central.index() {
                continue;
            }
            let sampler = LatencySampler::new(backend, clock, &channel, params, central_host, target);
            let handle = thread::Builder::new()
                .name(format!("sampler-{target}"))
                .spawn_scoped(s, move || sampler.run())?;
            samplers.push((NodeIndex::at(i), handle));
        }
        debug!("{} samplers running", samplers.len());

        let mut series = Vec::with_capacity(samplers.len());
        for (node, handle) in samplers {
            let values = handle
                .join()
                .map_err(|_| MeasureError::TaskPanicked(format!("sampler {node}")))?;
            series.push((node, values));
        }
        let cut = cutter
            .join()
            .map_err(|_| MeasureError::TaskPanicked("link-cut coordinator".into()))??;
        let traffic = traffic
            .join()
            .map_err(|_| MeasureError::TaskPanicked("traffic".into()))?;
        Ok((series, cut, traffic))
    })?;

    let adjacency_post = live.into_inner().unwrap_or_else(PoisonError::into_inner);
    let latency = LatencyMatrix::from_series(params.window_count as usize, nodes, series);

    debug!(
        "measurement done: {} flows started, {} cancelled",
        traffic.started, traffic.cancelled
    );
    Ok(MeasurementOutcome { latency, adjacency_pre, adjacency_post, cut, traffic })
}
