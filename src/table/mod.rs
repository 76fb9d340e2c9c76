//! # Table Module
//!
//! In-memory tabular data model for the pipeline. `RawTable` holds untyped
//! cells exactly as read from a spreadsheet; `CleanTable` holds the numeric,
//! gap-free result of group cleaning. Tables are never mutated after
//! construction; every transformation produces a fresh table.

mod cell;
mod clean;
mod raw;

pub use cell::Value;
pub use clean::CleanTable;
pub use raw::RawTable;

use thiserror::Error;

/// Errors raised while building or transforming tables.
#[derive(Error, Debug)]
pub enum TableError {
    /// A cell survived missing-value filtering but cannot become a number.
    #[error("cannot coerce value '{value}' in column '{column}' to a number")]
    TypeCoercion { column: String, value: String },

    /// Header promotion needs at least one data row.
    #[error("table has no rows to promote to column headers")]
    MissingHeaderRow,
}
