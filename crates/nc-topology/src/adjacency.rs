//! Square 0/1 adjacency matrix and the structural checks run against it.
//!
//! # Data layout
//!
//! Cells are stored row-major in one `Vec<u8>`: cell `(i, j)` lives at
//! `i * n + j`.  This is also the storage order inside a run record, so
//! flattening and rebuilding are plain slice copies.
//!
//! Matrices built through [`encode`] or mutated through
//! [`set_pair`][AdjacencyMatrix::set_pair] / [`clear_pair`][AdjacencyMatrix::clear_pair]
//! stay symmetric with a zero diagonal.

use std::collections::VecDeque;

use crate::graph::Edge;

/// Symmetric node × node adjacency matrix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdjacencyMatrix {
    n:     usize,
    cells: Vec<u8>,
}

/// Build the adjacency matrix of `edges` over `node_count` nodes.
///
/// Sets both `(i, j)` and `(j, i)` for every edge; everything else, including
/// the diagonal, is 0.  Edges touching an index `>= node_count` are ignored.
pub fn encode(node_count: usize, edges: &[Edge]) -> AdjacencyMatrix {
    let mut m = AdjacencyMatrix::new(node_count);
    for e in edges {
        let (a, b) = (e.a.index(), e.b.index());
        if a < node_count && b < node_count && a != b {
            m.set_pair(a, b);
        }
    }
    m
}

impl AdjacencyMatrix {
    /// All-zero `n × n` matrix.
    pub fn new(n: usize) -> Self {
        Self { n, cells: vec![0; n * n] }
    }

    /// Rebuild from a row-major cell vector.  Returns `None` when the length
    /// is not `n²` or a cell is not 0/1.
    pub fn from_flat(n: usize, cells: Vec<u8>) -> Option<Self> {
        if cells.len() != n * n || cells.iter().any(|&c| c > 1) {
            return None;
        }
        Some(Self { n, cells })
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> u8 {
        self.cells[i * self.n + j]
    }

    #[inline]
    pub fn is_set(&self, i: usize, j: usize) -> bool {
        self.get(i, j) == 1
    }

    /// Set `(i, j)` and `(j, i)`.  No-op on the diagonal.
    pub fn set_pair(&mut self, i: usize, j: usize) {
        if i == j {
            return;
        }
        self.cells[i * self.n + j] = 1;
        self.cells[j * self.n + i] = 1;
    }

    /// Clear `(i, j)` and `(j, i)`.  Returns whether the pair was set before.
    pub fn clear_pair(&mut self, i: usize, j: usize) -> bool {
        let was_set = self.is_set(i, j);
        self.cells[i * self.n + j] = 0;
        self.cells[j * self.n + i] = 0;
        was_set
    }

    /// Row-major cells.
    #[inline]
    pub fn as_flat(&self) -> &[u8] {
        &self.cells
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u8]> + '_ {
        // chunks(0) panics, and an empty matrix has no rows anyway.
        self.cells.chunks(self.n.max(1)).take(self.n)
    }

    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        self.rows().map(<[u8]>::to_vec).collect()
    }

    /// Total number of set cells (twice the edge count for a symmetric matrix).
    pub fn ones(&self) -> usize {
        self.cells.iter().filter(|&&c| c == 1).count()
    }

    pub fn edge_count(&self) -> usize {
        let mut count = 0;
        for i in 0..self.n {
            for j in (i + 1)..self.n {
                if self.is_set(i, j) {
                    count += 1;
                }
            }
        }
        count
    }

    pub fn degree(&self, i: usize) -> usize {
        self.cells[i * self.n..(i + 1) * self.n].iter().filter(|&&c| c == 1).count()
    }

    pub fn neighbors(&self, i: usize) -> impl Iterator<Item = usize> + '_ {
        (0..self.n).filter(move |&j| self.is_set(i, j))
    }

    // ── Structural checks ─────────────────────────────────────────────────

    pub fn is_symmetric(&self) -> bool {
        (0..self.n).all(|i| (0..self.n).all(|j| self.get(i, j) == self.get(j, i)))
    }

    pub fn has_zero_diagonal(&self) -> bool {
        (0..self.n).all(|i| self.get(i, i) == 0)
    }

    /// Number of connected components (isolated nodes count as one each).
    pub fn components(&self) -> usize {
        let mut seen = vec![false; self.n];
        let mut components = 0;
        for start in 0..self.n {
            if seen[start] {
                continue;
            }
            components += 1;
            self.flood(start, &mut seen);
        }
        components
    }

    /// `true` when every node reaches every other node.  The empty matrix is
    /// considered connected.
    pub fn is_connected(&self) -> bool {
        self.components() <= 1
    }

    /// Whether `to` is reachable from `from` over set cells.
    pub fn reachable(&self, from: usize, to: usize) -> bool {
        let mut seen = vec![false; self.n];
        self.flood(from, &mut seen);
        seen[to]
    }

    /// A forest has exactly `n - components` edges; anything more closes a
    /// cycle.
    pub fn has_cycle(&self) -> bool {
        self.edge_count() + self.components() > self.n
    }

    /// `true` when some node has degree ≥ 3.
    pub fn has_branch_point(&self) -> bool {
        (0..self.n).any(|i| self.degree(i) >= 3)
    }

    /// Whether removing the edge `(i, j)` would disconnect `i` from `j`.
    /// Returns `false` when the edge is absent.
    pub fn is_bridge(&self, i: usize, j: usize) -> bool {
        if !self.is_set(i, j) {
            return false;
        }
        let mut without = self.clone();
        without.clear_pair(i, j);
        !without.reachable(i, j)
    }

    fn flood(&self, start: usize, seen: &mut [bool]) {
        let mut queue = VecDeque::from([start]);
        seen[start] = true;
        while let Some(node) = queue.pop_front() {
            for next in self.neighbors(node) {
                if !seen[next] {
                    seen[next] = true;
                    queue.push_back(next);
                }
            }
        }
    }
}
