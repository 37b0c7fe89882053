//! Random branch-and-loop topology generator.
//!
//! # Growth loop
//!
//! ```text
//! root = new switch
//! target = rand(min_nodes + max_loop_size ..= max_nodes)
//! while last_index < target - max_loop_size:
//!     if coin() or last_index < 4:  branch(from = last)
//!     else:                         ring(anchor = last)
//! ```
//!
//! A branch draws `rand(1..=max_branch_size) / (grown + 1)` children, where
//! `grown` counts nodes added since the branch started, and recurses into
//! each child.  Fan-out therefore collapses quickly and recursion depth stays
//! small.  A ring allocates 3..=max_loop_size switches in one block, shuffles
//! them and closes them into a cycle through the anchor.  Rings only start
//! while there is room for the largest ring, so the node count never exceeds
//! `max_nodes`; branches stop at the same cap.

use std::collections::HashSet;

use log::{debug, trace};

use nc_core::{GeneratorConfig, NodeIndex, SimRng, SwitchId};

use crate::adjacency::AdjacencyMatrix;
use crate::allocator::IndexAllocator;
use crate::graph::{Edge, Topology};
use crate::{TopologyError, TopologyResult};

/// Smallest node count a run accepts.
pub const MIN_NODES: usize = 4;

/// Smallest number of verified cut candidates a run accepts.
pub const MIN_REMOVABLE_EDGES: usize = 4;

/// Generate one topology.
///
/// Switch ids come from the shared `allocator`, so ids consumed by an
/// insufficient attempt are simply skipped by later ones.
pub fn generate(
    config:    &GeneratorConfig,
    allocator: &IndexAllocator,
    rng:       &mut SimRng,
) -> TopologyResult<Topology> {
    config.validate()?;
    let mut builder = Builder::new(config, allocator, rng);
    builder.grow();
    builder.finish()
}

/// Call [`generate`] up to `attempts` times, returning the first sufficient
/// topology or the last `Insufficient` error.
pub fn generate_with_attempts(
    config:    &GeneratorConfig,
    allocator: &IndexAllocator,
    rng:       &mut SimRng,
    attempts:  u32,
) -> TopologyResult<Topology> {
    let mut last = None;
    for attempt in 0..attempts.max(1) {
        match generate(config, allocator, rng) {
            Ok(topology) => return Ok(topology),
            Err(e @ TopologyError::Insufficient { .. }) => {
                debug!("generation attempt {} rejected: {e}", attempt + 1);
                last = Some(e);
            }
            Err(e) => return Err(e),
        }
    }
    Err(last.unwrap_or(TopologyError::Insufficient {
        nodes:      0,
        removable:  0,
        has_cycle:  false,
        has_branch: false,
    }))
}

// ── Builder ───────────────────────────────────────────────────────────────────

struct Builder<'a> {
    config:     &'a GeneratorConfig,
    allocator:  &'a IndexAllocator,
    rng:        &'a mut SimRng,
    switches:   Vec<SwitchId>,
    edges:      Vec<Edge>,
    ring_edges: Vec<Edge>,
    seen:       HashSet<Edge>,
}

impl<'a> Builder<'a> {
    fn new(config: &'a GeneratorConfig, allocator: &'a IndexAllocator, rng: &'a mut SimRng) -> Self {
        Self {
            config,
            allocator,
            rng,
            switches:   Vec::new(),
            edges:      Vec::new(),
            ring_edges: Vec::new(),
            seen:       HashSet::new(),
        }
    }

    #[inline]
    fn max_nodes(&self) -> usize {
        self.config.max_nodes as usize
    }

    /// Index of the most recently added switch.
    #[inline]
    fn last(&self) -> usize {
        self.switches.len() - 1
    }

    fn add_switch(&mut self) -> NodeIndex {
        self.allocator.allocate_switch_into(&mut self.switches);
        NodeIndex::at(self.last())
    }

    fn link(&mut self, x: NodeIndex, y: NodeIndex, ring: bool) {
        let edge = Edge::new(x, y);
        if x == y || !self.seen.insert(edge) {
            return;
        }
        trace!("link {edge} (ring={ring})");
        self.edges.push(edge);
        if ring {
            self.ring_edges.push(edge);
        }
    }

    fn grow(&mut self) {
        self.add_switch();
        let max_loop = self.config.max_loop_size as usize;
        let lower = self.config.min_nodes as usize + max_loop;
        let target = self.rng.gen_range(lower..=self.max_nodes());

        while self.last() < target - max_loop {
            let frontier = self.last();
            if self.rng.gen_bool(0.5) || frontier < MIN_NODES {
                self.branch(NodeIndex::at(frontier), frontier);
            } else {
                self.ring(NodeIndex::at(frontier));
            }
        }
        debug!(
            "grew {} switches ({} edges, {} ring edges) toward target {target}",
            self.switches.len(),
            self.edges.len(),
            self.ring_edges.len()
        );
    }

    /// Depth-first branch from `from`; `start` is the last index when the
    /// outermost branch call began.
    fn branch(&mut self, from: NodeIndex, start: usize) {
        let grown = self.last() - start + 1;
        let fan_out = self.rng.gen_range(1..=self.config.max_branch_size as usize) / grown;
        for _ in 0..fan_out {
            if self.switches.len() >= self.max_nodes() {
                break;
            }
            let child = self.add_switch();
            self.link(from, child, false);
            self.branch(child, start);
        }
    }

    fn ring(&mut self, anchor: NodeIndex) {
        let len = self.rng.gen_range(3..=self.config.max_loop_size as usize);
        let first = self.switches.len();
        self.allocator.allocate_switches_into(len, &mut self.switches);

        let mut order: Vec<NodeIndex> = (first..first + len).map(NodeIndex::at).collect();
        self.rng.shuffle(&mut order);
        order.insert(0, anchor);

        for i in 0..order.len() {
            let next = order[(i + 1) % order.len()];
            self.link(order[i], next, true);
        }
    }

    fn finish(self) -> TopologyResult<Topology> {
        let nodes = self.switches.len();
        let matrix = crate::adjacency::encode(nodes, &self.edges);
        let removable = verified_removable(&matrix, &self.ring_edges);
        let has_cycle = matrix.has_cycle();
        let has_branch = matrix.has_branch_point();

        if nodes < MIN_NODES
            || removable.len() < MIN_REMOVABLE_EDGES
            || !has_cycle
            || !has_branch
            || !matrix.is_connected()
        {
            return Err(TopologyError::Insufficient {
                nodes,
                removable: removable.len(),
                has_cycle,
                has_branch,
            });
        }
        Ok(Topology::new(self.switches, self.edges, removable))
    }
}

/// Keep only candidates whose removal leaves the graph connected.
fn verified_removable(matrix: &AdjacencyMatrix, candidates: &[Edge]) -> Vec<Edge> {
    candidates
        .iter()
        .copied()
        .filter(|e| !matrix.is_bridge(e.a.index(), e.b.index()))
        .collect()
}
