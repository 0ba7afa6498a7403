//! # Spreadsheet Table Module
//!
//! Streaming extraction of a header row and its body rows from one worksheet of an
//! Office Open XML workbook. The sheet is never loaded into memory: rows are pulled
//! one at a time from the worksheet part and handed to caller callbacks.
use thiserror::Error;

pub mod catalog;
pub mod cell;
pub mod extractor;
pub mod options;
pub mod reference;
pub mod row;
pub mod shared_strings;
pub mod sheet;
pub(crate) mod stream;

#[cfg(test)]
pub(crate) mod fixture;

/// Errors raised while locating, streaming or interpreting workbook data.
#[derive(Error, Debug)]
pub enum SpreadsheetError {
    /// Required configuration is missing or malformed
    #[error("Invalid read options: {0}")]
    ConfigurationError(String),

    /// Sheet data is not explicitly addressed (rows or cells without a reference)
    #[error("Unsupported format in sheet '{0}': {1}")]
    UnsupportedFormatError(String, String),

    /// Sheet selection matched no sheet, or a name matched several
    #[error("Sheet lookup failed: {0}")]
    LookupError(String),

    /// A value inside the package cannot be interpreted
    #[error("Malformed data: {0}")]
    MalformedDataError(String),

    /// A required part is missing from the package
    #[error("Missing part '{0}'")]
    FileError(String),

    /// The package is an encrypted compound file rather than a zip archive
    #[error("Spreadsheet '{0}' is password protected")]
    PasswordProtectedError(String),
}
