//! Positional row layouts.
//!
//! # Run record
//!
//! | Field              | Length                                 |
//! |--------------------|----------------------------------------|
//! | node count `n`     | 1                                      |
//! | central node index | 1                                      |
//! | alarm flags        | `n`                                    |
//! | latency before cut | `link_cut_window × n`                  |
//! | latency after cut  | `(window_count − link_cut_window) × n` |
//! | adjacency pre-cut  | `n²`, row-major                        |
//! | adjacency post-cut | `n²`, row-major                        |
//!
//! Latency blocks are window-major: row `w` holds window `w` of the block for
//! every node.  The table's first row instead holds the six
//! [`RunParameters`] fields in declaration order.

use nc_core::{NodeIndex, RunParameters};
use nc_measure::LatencyMatrix;
use nc_topology::AdjacencyMatrix;

use crate::{RecordError, RecordResult};

/// Fields in the parameter row.
pub const PARAM_FIELDS: usize = 6;

/// Header fields of a run record (node count and central index).
const RECORD_HEADER: usize = 2;

// ── Parameter row ─────────────────────────────────────────────────────────────

pub fn encode_params(params: &RunParameters) -> Vec<u64> {
    [
        params.simulation_count,
        params.time_between_pings,
        params.pings_per_window,
        params.window_count,
        params.link_cut_window,
        params.max_traffic_duration,
    ]
    .into_iter()
    .map(u64::from)
    .collect()
}

/// Decode row 0.  Exactly six fields, each fitting `u32`, and consistent
/// with [`RunParameters::validate`].
pub fn decode_params(fields: &[u64]) -> RecordResult<RunParameters> {
    if fields.len() != PARAM_FIELDS {
        return Err(RecordError::LengthMismatch { row: 0, expected: PARAM_FIELDS, got: fields.len() });
    }
    let mut values = [0u32; PARAM_FIELDS];
    for (slot, &v) in values.iter_mut().zip(fields) {
        *slot = u32::try_from(v).map_err(|_| RecordError::malformed(0, format!("parameter {v} out of range")))?;
    }
    let [simulation_count, time_between_pings, pings_per_window, window_count, link_cut_window, max_traffic_duration] =
        values;
    let params = RunParameters {
        simulation_count,
        time_between_pings,
        pings_per_window,
        window_count,
        link_cut_window,
        max_traffic_duration,
    };
    params.validate().map_err(|e| RecordError::malformed(0, e.to_string()))?;
    Ok(params)
}

// ── RunRecord ─────────────────────────────────────────────────────────────────

/// Stored result of one simulated network.
///
/// Latencies are whole milliseconds; the fraction is dropped when a record
/// is built from measurements.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunRecord {
    pub node_count:         usize,
    pub central_node_index: usize,
    /// 1 when the node was unreachable after the run.
    pub alarms:             Vec<u8>,
    /// `link_cut_window` rows of `node_count` values.
    pub latency_before:     Vec<Vec<u64>>,
    /// `window_count − link_cut_window` rows of `node_count` values.
    pub latency_after:      Vec<Vec<u64>>,
    pub adjacency_pre:      AdjacencyMatrix,
    pub adjacency_post:     AdjacencyMatrix,
}

/// Total fields of a run record over `n` nodes.  `None` on overflow.
pub fn record_len(n: usize, params: &RunParameters) -> Option<usize> {
    let windows = params.window_count as usize;
    let square = n.checked_mul(n)?;
    RECORD_HEADER
        .checked_add(n)?
        .checked_add(windows.checked_mul(n)?)?
        .checked_add(square.checked_mul(2)?)
}

impl RunRecord {
    /// Build a record from one run's outputs.
    ///
    /// The latency matrix is split at `params.link_cut_window`; fractional
    /// values are truncated toward zero.
    pub fn from_measurements(
        params:  &RunParameters,
        central: NodeIndex,
        alarms:  Vec<u8>,
        latency: &LatencyMatrix,
        pre:     AdjacencyMatrix,
        post:    AdjacencyMatrix,
    ) -> Self {
        let truncate = |w: usize| latency.window(w).iter().map(|&v| v as u64).collect::<Vec<u64>>();
        let split = params.windows_before_cut().min(latency.windows());
        Self {
            node_count: pre.size(),
            central_node_index: central.index(),
            alarms,
            latency_before: (0..split).map(truncate).collect(),
            latency_after: (split..latency.windows()).map(truncate).collect(),
            adjacency_pre: pre,
            adjacency_post: post,
        }
    }

    /// Links present before the cut and missing after it.
    pub fn links_removed(&self) -> usize {
        let pre = self.adjacency_pre.as_flat();
        let post = self.adjacency_post.as_flat();
        pre.iter().zip(post).filter(|&(&a, &b)| a == 1 && b == 0).count() / 2
    }

    /// Flatten into the stored field order.
    pub fn encode(&self) -> Vec<u64> {
        let mut out = Vec::with_capacity(
            RECORD_HEADER
                + self.alarms.len()
                + (self.latency_before.len() + self.latency_after.len()) * self.node_count
                + 2 * self.node_count * self.node_count,
        );
        out.push(self.node_count as u64);
        out.push(self.central_node_index as u64);
        out.extend(self.alarms.iter().map(|&a| u64::from(a)));
        for row in self.latency_before.iter().chain(&self.latency_after) {
            out.extend_from_slice(row);
        }
        out.extend(self.adjacency_pre.as_flat().iter().map(|&c| u64::from(c)));
        out.extend(self.adjacency_post.as_flat().iter().map(|&c| u64::from(c)));
        out
    }

    /// Rebuild table row `row` from its fields.
    ///
    /// The row length must equal exactly what its node count and `params`
    /// imply; nothing is padded or cut.
    pub fn decode(fields: &[u64], params: &RunParameters, row: usize) -> RecordResult<Self> {
        if fields.len() < RECORD_HEADER {
            return Err(RecordError::LengthMismatch { row, expected: RECORD_HEADER, got: fields.len() });
        }
        let n = usize::try_from(fields[0]).map_err(|_| RecordError::malformed(row, "node count out of range"))?;
        let central = usize::try_from(fields[1]).map_err(|_| RecordError::malformed(row, "central index out of range"))?;
        if n == 0 {
            return Err(RecordError::malformed(row, "node count is 0"));
        }
        if central >= n {
            return Err(RecordError::malformed(row, format!("central node {central} outside {n} nodes")));
        }
        let expected = record_len(n, params).ok_or_else(|| RecordError::malformed(row, "node count too large"))?;
        if fields.len() != expected {
            return Err(RecordError::LengthMismatch { row, expected, got: fields.len() });
        }

        let before = params.windows_before_cut();
        let after = params.windows_after_cut();
        let (alarm_block, rest) = fields[RECORD_HEADER..].split_at(n);
        let (before_block, rest) = rest.split_at(before * n);
        let (after_block, rest) = rest.split_at(after * n);
        let (pre_block, post_block) = rest.split_at(n * n);

        let alarms = flags(alarm_block, row, "alarm")?;
        let latency_before = before_block.chunks(n).map(<[u64]>::to_vec).collect();
        let latency_after = after_block.chunks(n).map(<[u64]>::to_vec).collect();
        let adjacency_pre = matrix(n, pre_block, row)?;
        let adjacency_post = matrix(n, post_block, row)?;

        Ok(Self {
            node_count: n,
            central_node_index: central,
            alarms,
            latency_before,
            latency_after,
            adjacency_pre,
            adjacency_post,
        })
    }
}

fn flags(values: &[u64], row: usize, what: &str) -> RecordResult<Vec<u8>> {
    values
        .iter()
        .map(|&v| match v {
            0 | 1 => Ok(v as u8),
            _ => Err(RecordError::malformed(row, format!("{what} value {v} is not 0/1"))),
        })
        .collect()
}

fn matrix(n: usize, values: &[u64], row: usize) -> RecordResult<AdjacencyMatrix> {
    let cells = flags(values, row, "adjacency")?;
    AdjacencyMatrix::from_flat(n, cells).ok_or_else(|| RecordError::malformed(row, "adjacency block has the wrong size"))
}
