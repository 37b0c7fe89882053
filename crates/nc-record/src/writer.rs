//! The `RecordStore` trait implemented by table backends.

use crate::{RecordResult, RecordTable, decode_table};

/// Persists record tables keyed by batch file number and worker index.
///
/// Every (batch, worker) pair maps to its own table, so parallel workers
/// never write to the same place.
pub trait RecordStore: Send + Sync {
    /// Write `table`, replacing any previous table under the same key.
    fn write_table(&self, batch: u32, worker: usize, table: &RecordTable) -> RecordResult<()>;

    /// Raw rows of a stored table.
    fn read_rows(&self, batch: u32, worker: usize) -> RecordResult<Vec<Vec<u64>>>;

    /// Read and decode a stored table.
    fn read_table(&self, batch: u32, worker: usize) -> RecordResult<RecordTable> {
        decode_table(&self.read_rows(batch, worker)?)
    }
}
