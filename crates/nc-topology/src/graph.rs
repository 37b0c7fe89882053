//! Generated topology: switch list, edge list, and link-cut candidates.

use std::collections::HashMap;
use std::fmt;

use nc_core::{NodeIndex, SwitchId};

use crate::adjacency::{self, AdjacencyMatrix};

// ── Edge ──────────────────────────────────────────────────────────────────────

/// Unordered pair of node indices, normalised so that `a < b`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct Edge {
    pub a: NodeIndex,
    pub b: NodeIndex,
}

impl Edge {
    pub fn new(x: NodeIndex, y: NodeIndex) -> Self {
        if x <= y { Self { a: x, b: y } } else { Self { a: y, b: x } }
    }

    /// Shorthand for tests and fixtures.
    pub fn between(x: usize, y: usize) -> Self {
        Self::new(NodeIndex::at(x), NodeIndex::at(y))
    }

    pub fn touches(&self, n: NodeIndex) -> bool {
        self.a == n || self.b == n
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.a.0, self.b.0)
    }
}

// ── Topology ──────────────────────────────────────────────────────────────────

/// A generated network.
///
/// Node `i` of every matrix is the switch `switches[i]`.  `edges` holds every
/// link in creation order; `removable` is the subset eligible for the link
/// cut (ring edges that are verified non-bridges).
#[derive(Clone, Debug)]
pub struct Topology {
    pub switches:  Vec<SwitchId>,
    pub edges:     Vec<Edge>,
    pub removable: Vec<Edge>,
    index_of:      HashMap<SwitchId, NodeIndex>,
}

impl Topology {
    /// Assemble a topology, building the switch → index table.
    pub fn new(switches: Vec<SwitchId>, edges: Vec<Edge>, removable: Vec<Edge>) -> Self {
        let index_of = switches
            .iter()
            .enumerate()
            .map(|(i, &s)| (s, NodeIndex::at(i)))
            .collect();
        Self { switches, edges, removable, index_of }
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.switches.len()
    }

    /// Matrix index of a switch, if it belongs to this topology.
    pub fn index_of(&self, switch: SwitchId) -> Option<NodeIndex> {
        self.index_of.get(&switch).copied()
    }

    /// Switch at a matrix index.
    pub fn switch_at(&self, index: NodeIndex) -> Option<SwitchId> {
        self.switches.get(index.index()).copied()
    }

    /// Both endpoints of `edge` as device ids.
    pub fn endpoints(&self, edge: Edge) -> Option<(SwitchId, SwitchId)> {
        Some((self.switch_at(edge.a)?, self.switch_at(edge.b)?))
    }

    /// Adjacency matrix of the full edge list.
    pub fn adjacency(&self) -> AdjacencyMatrix {
        adjacency::encode(self.node_count(), &self.edges)
    }
}
