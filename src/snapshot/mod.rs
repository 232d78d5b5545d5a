//! Snapshot parsing
//!
//! A snapshot is the per-file size table for one (platform, version) pair,
//! stored as CSV. This module turns raw CSV text into a [`CsvTable`], finds
//! the identity and metric columns, and canonicalizes file paths so the same
//! file can be matched across snapshots.

mod path;
mod table;

pub use path::{basename, dirname, normalize_path};
pub use table::{
    identify_filename_column, metric_columns, CsvRecord, CsvTable, IDENTITY_COLUMN_TOKENS,
};
