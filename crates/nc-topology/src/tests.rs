//! Unit tests for nc-topology.
//!
//! Generator tests sweep many seeds and check the structural invariants on
//! every sufficient result.

#[cfg(test)]
mod helpers {
    use crate::Edge;

    /// Single 5-cycle 0-1-2-3-4-0.
    pub fn five_cycle() -> Vec<Edge> {
        vec![
            Edge::between(0, 1),
            Edge::between(1, 2),
            Edge::between(2, 3),
            Edge::between(3, 4),
            Edge::between(4, 0),
        ]
    }

    /// Triangle 0-1-2 with a tail 2-3-4 (degree 3 at node 2).
    pub fn lollipop() -> Vec<Edge> {
        vec![
            Edge::between(0, 1),
            Edge::between(1, 2),
            Edge::between(2, 0),
            Edge::between(2, 3),
            Edge::between(3, 4),
        ]
    }
}

// ── Adjacency encoder ─────────────────────────────────────────────────────────

#[cfg(test)]
mod adjacency {
    use crate::{AdjacencyMatrix, Edge, encode};

    #[test]
    fn five_cycle_has_ten_ones() {
        let m = encode(5, &super::helpers::five_cycle());
        assert_eq!(m.size(), 5);
        assert_eq!(m.ones(), 10);
        assert_eq!(m.edge_count(), 5);
        assert!(m.has_zero_diagonal());
        assert!(m.is_symmetric());
    }

    #[test]
    fn encode_is_deterministic_and_order_free() {
        let mut edges = super::helpers::five_cycle();
        let a = encode(5, &edges);
        edges.reverse();
        let b = encode(5, &edges);
        assert_eq!(a, b);
    }

    #[test]
    fn duplicate_edges_do_not_double_count() {
        let m = encode(3, &[Edge::between(0, 1), Edge::between(1, 0)]);
        assert_eq!(m.ones(), 2);
    }

    #[test]
    fn rows_match_flat_layout() {
        let m = encode(3, &[Edge::between(0, 2)]);
        assert_eq!(m.to_rows(), vec![vec![0, 0, 1], vec![0, 0, 0], vec![1, 0, 0]]);
        assert_eq!(m.as_flat(), &[0, 0, 1, 0, 0, 0, 1, 0, 0]);
    }

    #[test]
    fn from_flat_checks_shape_and_values() {
        assert!(AdjacencyMatrix::from_flat(2, vec![0, 1, 1, 0]).is_some());
        assert!(AdjacencyMatrix::from_flat(2, vec![0, 1, 1]).is_none());
        assert!(AdjacencyMatrix::from_flat(2, vec![0, 2, 1, 0]).is_none());
    }

    #[test]
    fn clear_pair_reports_previous_state() {
        let mut m = encode(5, &super::helpers::five_cycle());
        assert!(m.clear_pair(1, 2));
        assert!(!m.is_set(2, 1));
        assert!(!m.clear_pair(2, 1));
        assert_eq!(m.ones(), 8);
    }

    #[test]
    fn cycle_and_branch_detection() {
        let cycle = encode(5, &super::helpers::five_cycle());
        assert!(cycle.is_connected());
        assert!(cycle.has_cycle());
        assert!(!cycle.has_branch_point());

        let lollipop = encode(5, &super::helpers::lollipop());
        assert!(lollipop.has_cycle());
        assert!(lollipop.has_branch_point());

        let path = encode(3, &[Edge::between(0, 1), Edge::between(1, 2)]);
        assert!(!path.has_cycle());
    }

    #[test]
    fn bridges() {
        let m = encode(5, &super::helpers::lollipop());
        assert!(!m.is_bridge(0, 1)); // triangle edge
        assert!(m.is_bridge(2, 3)); // tail edge
        assert!(!m.is_bridge(0, 4)); // absent edge
    }

    #[test]
    fn disconnected_components() {
        let m = encode(4, &[Edge::between(0, 1)]);
        assert_eq!(m.components(), 3);
        assert!(!m.is_connected());
        assert!(!m.reachable(0, 3));
    }
}

// ── Index allocator ───────────────────────────────────────────────────────────

#[cfg(test)]
mod allocator {
    use std::collections::HashSet;
    use std::sync::Arc;

    use crate::IndexAllocator;

    #[test]
    fn blocks_are_contiguous() {
        let alloc = IndexAllocator::new();
        let mut ids = Vec::new();
        alloc.allocate_switch_into(&mut ids);
        alloc.allocate_switches_into(3, &mut ids);
        let raw: Vec<u32> = ids.iter().map(|s| s.0).collect();
        assert_eq!(raw, vec![0, 1, 2, 3]);
        assert_eq!(alloc.switches_issued(), 4);
    }

    #[test]
    fn hosts_independent_of_switches() {
        let alloc = IndexAllocator::new();
        let mut ids = Vec::new();
        alloc.allocate_switches_into(5, &mut ids);
        let hosts = alloc.allocate_hosts(2);
        assert_eq!(hosts[0].0, 0);
        assert_eq!(hosts[1].0, 1);
        assert_eq!(alloc.hosts_issued(), 2);
    }

    #[test]
    fn concurrent_allocation_is_unique() {
        let alloc = Arc::new(IndexAllocator::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let alloc = Arc::clone(&alloc);
                std::thread::spawn(move || {
                    let mut mine = Vec::new();
                    for _ in 0..100 {
                        alloc.allocate_switches_into(3, &mut mine);
                    }
                    mine
                })
            })
            .collect();

        let mut all = HashSet::new();
        for h in handles {
            let ids = h.join().unwrap();
            // Each block of three is contiguous.
            for block in ids.chunks(3) {
                assert_eq!(block[1].0, block[0].0 + 1);
                assert_eq!(block[2].0, block[0].0 + 2);
            }
            for id in ids {
                assert!(all.insert(id), "duplicate id {id}");
            }
        }
        assert_eq!(all.len(), 8 * 100 * 3);
        assert_eq!(alloc.switches_issued(), 2400);
    }
}

// ── Generator ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod generator {
    use std::collections::HashSet;

    use nc_core::{GeneratorConfig, SimRng};

    use crate::{
        IndexAllocator, MIN_REMOVABLE_EDGES, Topology, TopologyError, generate,
        generate_with_attempts,
    };

    fn sweep(config: &GeneratorConfig, seeds: u64) -> Vec<Topology> {
        let alloc = IndexAllocator::new();
        (0..seeds)
            .filter_map(|seed| generate(config, &alloc, &mut SimRng::new(seed)).ok())
            .collect()
    }

    #[test]
    fn invariants_hold_for_every_sufficient_topology() {
        let config = GeneratorConfig::default();
        let topologies = sweep(&config, 200);
        assert!(!topologies.is_empty(), "no sufficient topology in 200 seeds");

        for t in &topologies {
            let m = t.adjacency();
            assert!(m.is_symmetric());
            assert!(m.has_zero_diagonal());
            assert!(m.is_connected());
            assert!(m.has_cycle());
            assert!(m.has_branch_point());
            assert!(t.node_count() >= 4);
            assert!(t.node_count() <= config.max_nodes as usize);
            assert!(t.removable.len() >= MIN_REMOVABLE_EDGES);
        }
    }

    #[test]
    fn removable_edges_are_safe_to_cut() {
        for t in sweep(&GeneratorConfig::default(), 100) {
            let edges: HashSet<_> = t.edges.iter().copied().collect();
            for e in &t.removable {
                assert!(edges.contains(e));
                let mut m = t.adjacency();
                assert!(m.clear_pair(e.a.index(), e.b.index()));
                assert!(m.is_connected(), "cutting {e} disconnects the graph");
            }
        }
    }

    #[test]
    fn switch_ids_unique_across_topologies() {
        let alloc = IndexAllocator::new();
        let mut seen = HashSet::new();
        for seed in 0..50 {
            if let Ok(t) = generate(&GeneratorConfig::default(), &alloc, &mut SimRng::new(seed)) {
                for s in &t.switches {
                    assert!(seen.insert(*s));
                }
                for (i, s) in t.switches.iter().enumerate() {
                    assert_eq!(t.index_of(*s).map(|n| n.index()), Some(i));
                }
            }
        }
    }

    #[test]
    fn same_seed_same_topology() {
        let config = GeneratorConfig::default();
        let a = generate(&config, &IndexAllocator::new(), &mut SimRng::new(11));
        let b = generate(&config, &IndexAllocator::new(), &mut SimRng::new(11));
        match (a, b) {
            (Ok(a), Ok(b)) => {
                assert_eq!(a.edges, b.edges);
                assert_eq!(a.removable, b.removable);
                assert_eq!(a.switches, b.switches);
            }
            (Err(_), Err(_)) => {}
            _ => panic!("same seed gave different outcomes"),
        }
    }

    #[test]
    fn small_bounds_respected() {
        let config = GeneratorConfig {
            min_nodes:       3,
            max_nodes:       12,
            max_loop_size:   4,
            max_branch_size: 3,
        };
        for t in sweep(&config, 200) {
            assert!(t.node_count() <= 12);
        }
    }

    #[test]
    fn attempts_eventually_succeed() {
        let alloc = IndexAllocator::new();
        let t = generate_with_attempts(&GeneratorConfig::default(), &alloc, &mut SimRng::new(3), 50);
        assert!(t.is_ok());
    }

    #[test]
    fn invalid_config_is_not_insufficient() {
        let config = GeneratorConfig { max_loop_size: 2, ..GeneratorConfig::default() };
        let err = generate(&config, &IndexAllocator::new(), &mut SimRng::new(0)).unwrap_err();
        assert!(matches!(err, TopologyError::Config(_)));
    }
}
