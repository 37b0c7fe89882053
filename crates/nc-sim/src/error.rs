use thiserror::Error;

use nc_core::CoreError;
use nc_emu::EmuError;
use nc_measure::MeasureError;
use nc_record::RecordError;
use nc_topology::TopologyError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("batch configuration error: {0}")]
    Config(#[from] CoreError),

    #[error("no controller configured for worker {0}")]
    NoController(usize),

    #[error("topology error: {0}")]
    Topology(#[from] TopologyError),

    #[error("backend error: {0}")]
    Backend(#[from] EmuError),

    #[error("measurement error: {0}")]
    Measure(#[from] MeasureError),

    #[error("record error: {0}")]
    Record(#[from] RecordError),

    #[error("could not build worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

pub type SimResult<T> = Result<T, SimError>;
