//! # xlstable
//!
//! Streams tables out of Office Open XML (`.xlsx`) worksheets. A table is one
//! header row, found at a configurable start address, and the body rows below it.
//! Rows are pulled from the worksheet part one at a time and handed to caller
//! callbacks, so only the header and the current row are ever held in memory.
//!
//! ## Features
//!
//! - **Sheet selection**: by 1-based number, exact name, predicate or descriptor
//! - **Start address**: header row label plus an optional first column
//! - **Termination predicates**: end the body at a row, or each row at a column
//! - **Shared and inline strings**: cell values are resolved to their text
//!
//! ```no_run
//! use xlstable::{CellAddress, ReadOptions, TableExtractor};
//!
//! let options = ReadOptions::new()
//!     .start_at(CellAddress::new("A", "1"))
//!     .stop_at_empty_row()
//!     .terminate_columns_when(|header, cell| cell.column_index() > header.count());
//! let mut extractor = TableExtractor::open("report.xlsx")?.with_options(options);
//! let result = extractor.read_table(
//!     |header| println!("{:?}", header.cells().map(|cell| cell.value()).collect::<Vec<_>>()),
//!     |row| println!("{}: {} cells", row.row_index(), row.count()),
//! )?;
//! println!("{} rows", result.body_row_count());
//! # Ok::<(), xlstable::XlsTableError>(())
//! ```
mod error;
mod helpers;
pub mod spreadsheet;

pub use crate::error::XlsTableError;
pub use crate::helpers::xml::XmlError;
pub use crate::spreadsheet::cell::CellAddress;
pub use crate::spreadsheet::cell::CellContext;
pub use crate::spreadsheet::extractor::TableExtractor;
pub use crate::spreadsheet::options::ReadOptions;
pub use crate::spreadsheet::options::TableResult;
pub use crate::spreadsheet::reference::column_index;
pub use crate::spreadsheet::reference::column_reference;
pub use crate::spreadsheet::row::HeaderRowContext;
pub use crate::spreadsheet::row::RowContext;
pub use crate::spreadsheet::sheet::SheetContext;
pub use crate::spreadsheet::sheet::SheetSelector;
pub use crate::spreadsheet::SpreadsheetError;
