//! Append-only table of run records.

use log::debug;

use nc_core::RunParameters;

use crate::row::{RunRecord, decode_params, encode_params};
use crate::{RecordError, RecordResult};

/// One worker's output for one batch file: the run parameters plus every
/// successful run, in completion order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordTable {
    params:  RunParameters,
    records: Vec<RunRecord>,
}

impl RecordTable {
    /// `params.simulation_count` is ignored; the stored count always follows
    /// the records pushed.
    pub fn new(params: RunParameters) -> Self {
        Self { params: RunParameters { simulation_count: 0, ..params }, records: Vec::new() }
    }

    /// Run parameters as stored in row 0.  `simulation_count` is the number
    /// of records actually held.
    pub fn params(&self) -> RunParameters {
        RunParameters { simulation_count: self.records.len() as u32, ..self.params }
    }

    pub fn push(&mut self, record: RunRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[RunRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Every row in stored order, parameter row first.
    pub fn rows(&self) -> Vec<Vec<u64>> {
        std::iter::once(encode_params(&self.params()))
            .chain(self.records.iter().map(RunRecord::encode))
            .collect()
    }
}

/// Decode a whole table.
///
/// Row 0 must be a parameter row whose `simulation_count` matches the number
/// of record rows that follow.  Any malformed row fails the whole table.
pub fn decode_table(rows: &[Vec<u64>]) -> RecordResult<RecordTable> {
    let (head, body) = rows
        .split_first()
        .ok_or_else(|| RecordError::malformed(0, "table has no parameter row"))?;
    let params = decode_params(head)?;
    if params.simulation_count as usize != body.len() {
        return Err(RecordError::malformed(
            0,
            format!("{} runs announced, {} stored", params.simulation_count, body.len()),
        ));
    }

    let mut table = RecordTable::new(params);
    for (i, fields) in body.iter().enumerate() {
        table.push(RunRecord::decode(fields, &params, i + 1)?);
    }
    debug!("decoded {} records", table.len());
    Ok(table)
}
