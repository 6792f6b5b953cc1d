//! Output module
//!
//! Turns JSON responses into terminal output.
//!
//! # Overview
//!
//! - `json`: pretty-printed, key order preserved
//! - `table`: aligned columns for listings, `key  value` rows for a record
//! - `plain`: `key: value` lines, listings separated by blank lines

mod columns;
mod format;

pub use columns::{infer_columns, COMMON_KEYS};
pub use format::{render, render_record, render_records, RecordRenderer};

#[cfg(test)]
mod tests;
