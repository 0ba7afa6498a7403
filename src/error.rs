use thiserror::Error;

/// Main error type for the xlstable crate.
/// Aggregates errors from the standard library, dependencies, and internal modules.
#[derive(Error, Debug)]
pub enum XlsTableError {
    // Standard library errors
    #[error("{0}")]
    IoError(#[from] std::io::Error),

    #[error("{0}")]
    ParseIntError(#[from] std::num::ParseIntError),

    // Third-party library errors
    #[error("{0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("{0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("{0}")]
    XmlEncodingError(#[from] quick_xml::encoding::EncodingError),

    #[error("{0}")]
    XmlAttributeError(#[from] quick_xml::events::attributes::AttrError),

    // Helper module errors
    #[error("{0}")]
    XmlHelperError(#[from] crate::helpers::xml::XmlError),

    // Spreadsheet module errors
    #[error("{0}")]
    SpreadsheetError(#[from] crate::spreadsheet::SpreadsheetError),
}

impl XlsTableError {
    /// Returns the spreadsheet error carried by this error, if any.
    pub fn spreadsheet_error(&self) -> Option<&crate::spreadsheet::SpreadsheetError> {
        match self {
            XlsTableError::SpreadsheetError(error) => Some(error),
            _ => None,
        }
    }

    /// True when the underlying package could not be opened or read.
    pub fn is_io_error(&self) -> bool {
        matches!(self, XlsTableError::IoError(_) | XlsTableError::ZipError(_))
    }
}
