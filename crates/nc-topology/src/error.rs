//! Topology-subsystem error type.

use thiserror::Error;

use nc_core::CoreError;

/// Errors produced by `nc-topology`.
#[derive(Debug, Error)]
pub enum TopologyError {
    /// The generated graph is too small or offers too few safe cut
    /// candidates.  Not fatal: discard the run and retry or skip.
    #[error(
        "insufficient topology: {nodes} nodes, {removable} removable edges, \
         cycle={has_cycle}, branch point={has_branch}"
    )]
    Insufficient {
        nodes:      usize,
        removable:  usize,
        has_cycle:  bool,
        has_branch: bool,
    },

    #[error("invalid generator configuration: {0}")]
    Config(#[from] CoreError),
}

pub type TopologyResult<T> = Result<T, TopologyError>;
