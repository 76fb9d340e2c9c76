//! # Spreadsheet Source Module
//!
//! Turns a workbook on disk into one [`RawTable`]. Only the first worksheet
//! is read, mirroring how the pipeline's inputs are produced: one sheet per
//! experiment batch, groups side by side. Header cells left blank by merged
//! regions come back as pandas-style `Unnamed: {col}` placeholders, which is
//! the convention the group splitter keys on.

mod xlsx;
pub mod xml;

pub use xlsx::read_workbook;

use crate::error::ContourGridError;
use crate::table::RawTable;
use std::ffi::OsStr;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use thiserror::Error;

/// Errors raised while locating or decoding a workbook.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("spreadsheet file '{0}' does not exist")]
    FileNotFound(String),

    #[error("unsupported spreadsheet format for '{0}'")]
    UnsupportedFormat(String),

    /// A required part of the xlsx archive is absent.
    #[error("workbook entry '{0}' is missing from the archive")]
    MissingArchiveEntry(String),

    #[error("workbook '{0}' contains no worksheets")]
    EmptyWorkbook(String),

    #[error("worksheet '{sheet}' in '{file}' contains no cells")]
    EmptySheet { file: String, sheet: String },

    /// A shared-string cell points past the shared string table.
    #[error("shared string index {index} is out of bounds at cell '{reference}'")]
    SharedStringOutOfBounds { index: usize, reference: String },
}

/// Reads the first worksheet of the workbook at `path` into a raw table.
///
/// Only Excel 2007+ formats are handled; anything else fails with
/// [`SourceError::UnsupportedFormat`]. A missing file is reported before
/// the archive is opened.
pub fn read_table(path: &Path) -> Result<RawTable, ContourGridError> {
    if !path.exists() {
        Err(SourceError::FileNotFound(path.display().to_string()))?;
    }
    let extension = path
        .extension()
        .and_then(OsStr::to_str)
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("xlsx") | Some("xlsm") => {
            let reader = BufReader::new(File::open(path)?);
            read_workbook(reader, &path.display().to_string())
        }
        _ => Err(SourceError::UnsupportedFormat(path.display().to_string()))?,
    }
}
