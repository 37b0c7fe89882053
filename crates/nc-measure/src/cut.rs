//! Link-cut coordinator.
//!
//! Started together with the samplers.  It sleeps one window at a time and,
//! when the window counter reaches `link_cut_window`, removes the chosen link
//! once: clear the pair in the live adjacency matrix, then bring the link
//! down in the backend.  Samplers are not paused for the cut, so a sampler
//! running slightly ahead or behind may see it one probe early or late.

use std::sync::{Mutex, PoisonError};

use log::info;

use nc_core::{Clock, RunParameters, SwitchId};
use nc_emu::{Device, EmulationBackend};
use nc_topology::{AdjacencyMatrix, Edge, Topology};

use crate::{MeasureError, MeasureResult};

/// The link chosen for removal, named by its switches.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LinkCut {
    pub a: SwitchId,
    pub b: SwitchId,
}

impl LinkCut {
    /// Resolve a topology edge to its switches.
    pub fn from_edge(topology: &Topology, edge: Edge) -> Option<Self> {
        topology.endpoints(edge).map(|(a, b)| Self { a, b })
    }
}

/// What the coordinator did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CutEvent {
    pub cut:    LinkCut,
    pub edge:   Edge,
    /// Window boundary the cut happened at.
    pub window: u32,
}

/// Clear `cut` in `matrix`.
///
/// Fails with [`MeasureError::EdgeAbsent`] when the pair is not set, so a
/// second application of the same cut is rejected instead of silently
/// accepted.
pub fn apply_cut(matrix: &mut AdjacencyMatrix, topology: &Topology, cut: LinkCut) -> MeasureResult<Edge> {
    let a = topology.index_of(cut.a).ok_or(MeasureError::UnknownSwitch(cut.a))?;
    let b = topology.index_of(cut.b).ok_or(MeasureError::UnknownSwitch(cut.b))?;
    if a.index() >= matrix.size() || b.index() >= matrix.size() {
        return Err(MeasureError::NodeOutOfRange {
            index: a.max(b),
            nodes: matrix.size(),
        });
    }
    if !matrix.clear_pair(a.index(), b.index()) {
        return Err(MeasureError::EdgeAbsent { a: cut.a, b: cut.b });
    }
    Ok(Edge::new(a, b))
}

/// Runs the single scheduled link removal of one network.
pub struct LinkCutCoordinator<'a, B: ?Sized, C: ?Sized> {
    backend:  &'a B,
    clock:    &'a C,
    topology: &'a Topology,
    live:     &'a Mutex<AdjacencyMatrix>,
    params:   RunParameters,
    cut:      Option<LinkCut>,
}

impl<'a, B, C> LinkCutCoordinator<'a, B, C>
where
    B: EmulationBackend + ?Sized,
    C: Clock + ?Sized,
{
    pub fn new(
        backend:  &'a B,
        clock:    &'a C,
        topology: &'a Topology,
        live:     &'a Mutex<AdjacencyMatrix>,
        params:   RunParameters,
        cut:      Option<LinkCut>,
    ) -> Self {
        Self { backend, clock, topology, live, params, cut }
    }

    /// Wait for the cut window and perform the cut.
    ///
    /// Returns `Ok(None)` without touching anything when no link was chosen
    /// or the cut window lies at or past the last window.
    pub fn run(&self) -> MeasureResult<Option<CutEvent>> {
        let Some(cut) = self.cut else {
            return Ok(None);
        };
        if !self.params.schedules_cut() {
            return Ok(None);
        }

        for window in 0..self.params.window_count {
            if window == self.params.link_cut_window {
                let edge = {
                    let mut live = self.live.lock().unwrap_or_else(PoisonError::into_inner);
                    apply_cut(&mut live, self.topology, cut)?
                };
                self.backend.set_link_down(Device::Switch(cut.a), Device::Switch(cut.b))?;
                info!("cut link {} <-> {} at window {window}", cut.a, cut.b);
                return Ok(Some(CutEvent { cut, edge, window }));
            }
            self.clock.sleep(self.params.window_duration());
        }
        Ok(None)
    }
}
