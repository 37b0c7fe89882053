use thiserror::Error;

use nc_core::{NodeIndex, SwitchId};
use nc_emu::EmuError;

#[derive(Debug, Error)]
pub enum MeasureError {
    /// The link chosen for the cut is not present in the live adjacency
    /// state.  The generator and the coordinator disagree about the
    /// topology; the run must be aborted.
    #[error("link {a} <-> {b} is already absent from the live topology")]
    EdgeAbsent { a: SwitchId, b: SwitchId },

    #[error("switch {0} does not belong to this topology")]
    UnknownSwitch(SwitchId),

    #[error("node {index} is out of range for {nodes} hosts")]
    NodeOutOfRange { index: NodeIndex, nodes: usize },

    #[error("backend error: {0}")]
    Backend(#[from] EmuError),

    #[error("could not spawn measurement task: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("measurement task {0} panicked")]
    TaskPanicked(String),
}

pub type MeasureResult<T> = Result<T, MeasureError>;
