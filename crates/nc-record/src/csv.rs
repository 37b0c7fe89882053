//! CSV record store.
//!
//! One headerless CSV file per table, named `data_latency_{batch}_t{worker}.csv`.
//! Rows have different lengths, so both the writer and the reader run in
//! flexible mode.  Cells written by other tools may carry a fraction
//! (`12.0`); the reader truncates it.

use std::fs;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, WriterBuilder};
use log::info;

use crate::writer::RecordStore;
use crate::{RecordError, RecordResult, RecordTable};

/// Stores tables as CSV files inside one directory.
#[derive(Clone, Debug)]
pub struct CsvRecordStore {
    dir: PathBuf,
}

impl CsvRecordStore {
    /// Use `dir`, creating it if needed.
    pub fn new(dir: impl Into<PathBuf>) -> RecordResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn file_name(batch: u32, worker: usize) -> String {
        format!("data_latency_{batch}_t{worker}.csv")
    }

    pub fn path(&self, batch: u32, worker: usize) -> PathBuf {
        self.dir.join(Self::file_name(batch, worker))
    }
}

impl RecordStore for CsvRecordStore {
    fn write_table(&self, batch: u32, worker: usize, table: &RecordTable) -> RecordResult<()> {
        let path = self.path(batch, worker);
        let mut writer = WriterBuilder::new().has_headers(false).flexible(true).from_path(&path)?;
        for row in table.rows() {
            writer.write_record(row.iter().map(u64::to_string))?;
        }
        writer.flush()?;
        info!("wrote {} runs to {}", table.len(), path.display());
        Ok(())
    }

    fn read_rows(&self, batch: u32, worker: usize) -> RecordResult<Vec<Vec<u64>>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(self.path(batch, worker))?;
        reader
            .records()
            .enumerate()
            .map(|(row, record)| -> RecordResult<Vec<u64>> {
                record?.iter().map(|cell| parse_cell(cell, row)).collect()
            })
            .collect()
    }
}

/// Whole number, or a non-negative decimal truncated toward zero.
fn parse_cell(cell: &str, row: usize) -> RecordResult<u64> {
    let cell = cell.trim();
    if let Ok(v) = cell.parse::<u64>() {
        return Ok(v);
    }
    match cell.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(v as u64),
        _ => Err(RecordError::malformed(row, format!("cell {cell:?} is not a whole number"))),
    }
}
