//! `nc-record` — run records and the tables that hold them.
//!
//! Every worker of a batch fills one [`RecordTable`] per batch file and hands
//! it to a [`RecordStore`].  A table is a parameter row followed by one
//! positional [`RunRecord`] row per successful run; see [`row`] for the
//! field layout.  Decoding needs nothing but the rows themselves.
//!
//! | Module     | Contents                                                     |
//! |------------|--------------------------------------------------------------|
//! | [`row`]    | `RunRecord`, parameter row, `record_len`                     |
//! | [`table`]  | `RecordTable`, `decode_table`                                |
//! | [`writer`] | `RecordStore` trait                                          |
//! | [`csv`]    | `CsvRecordStore`                                             |
//! | [`error`]  | `RecordError`, `RecordResult<T>`                             |

pub mod csv;
pub mod error;
pub mod row;
pub mod table;
pub mod writer;

#[cfg(test)]
mod tests;

pub use csv::CsvRecordStore;
pub use error::{RecordError, RecordResult};
pub use row::{PARAM_FIELDS, RunRecord, decode_params, encode_params, record_len};
pub use table::{RecordTable, decode_table};
pub use writer::RecordStore;
