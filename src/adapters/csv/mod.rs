//! CSV output adapter
//!
//! Writes the ranked summary and the per-item audit table as UTF-8 CSV with
//! a byte-order mark, so spreadsheet tools pick up the accented characters
//! of organism and product names.

pub mod writer;

pub use writer::{
    write_outputs, write_records, write_records_file, write_summary, write_summary_file,
    OutputPaths, RECORD_HEADERS, SUMMARY_HEADERS,
};
