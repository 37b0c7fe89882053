//! `nc-topology` — random topologies and their adjacency matrices.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`allocator`] | `IndexAllocator`: batch-wide switch/host id counters       |
//! | [`adjacency`] | `AdjacencyMatrix`, `encode`, connectivity/bridge checks    |
//! | [`graph`]     | `Edge`, `Topology` (switch list, edges, removable edges)   |
//! | [`generator`] | `generate`, `generate_with_attempts`                       |
//! | [`error`]     | `TopologyError`, `TopologyResult<T>`                       |
//!
//! # Generation policy
//!
//! Topologies grow from a single root switch by alternating two operations:
//! *branches* (depth-first trees whose fan-out shrinks as the branch grows)
//! and *loops* (rings of 3..=max_loop_size fresh switches closed through an
//! anchor).  Only ring edges are offered for the link cut, and each one is
//! re-checked to be a non-bridge before it is accepted.  A result without a
//! cycle, without a branch point, or with fewer than four removable edges is
//! reported as [`TopologyError::Insufficient`], a normal outcome the caller
//! handles by retrying or skipping the run.

pub mod adjacency;
pub mod allocator;
pub mod error;
pub mod generator;
pub mod graph;

#[cfg(test)]
mod tests;

pub use adjacency::{AdjacencyMatrix, encode};
pub use allocator::IndexAllocator;
pub use error::{TopologyError, TopologyResult};
pub use generator::{MIN_NODES, MIN_REMOVABLE_EDGES, generate, generate_with_attempts};
pub use graph::{Edge, Topology};
