use crate::error::XlsTableError;
use crate::spreadsheet::cell::CellAddress;
use crate::spreadsheet::cell::CellContext;
use crate::spreadsheet::reference::column_index;
use crate::spreadsheet::row::HeaderRowContext;
use crate::spreadsheet::row::RowContext;
use crate::spreadsheet::SpreadsheetError;
use std::iter::Sum;
use std::ops::Add;
use std::ops::AddAssign;

/// Decides, for a candidate body row, whether it is the last row of the table.
pub type RowTermination = Box<dyn Fn(&HeaderRowContext, &RowContext) -> bool>;

/// Decides, for a candidate cell, whether the row ends before it.
pub type ColumnTermination = Box<dyn Fn(&HeaderRowContext, &CellContext) -> bool>;

/// Where a table starts and when its rows and columns end.
pub struct ReadOptions {
    /// Top-left cell of the header row
    start_address: CellAddress,
    /// Absent means the body runs to the end of the sheet
    row_termination: Option<RowTermination>,
    /// Absent means body rows are bounded by the header's cell count
    column_termination: Option<ColumnTermination>,
}

impl ReadOptions {
    /// Starts at A1 and never terminates on either axis.
    pub fn new() -> Self {
        Self {
            start_address: CellAddress::default(),
            row_termination: None,
            column_termination: None,
        }
    }

    pub fn start_at(mut self, start_address: CellAddress) -> Self {
        self.start_address = start_address;
        self
    }

    /// Ends the table at the first body row for which `predicate` holds. That row
    /// is still delivered unless it is empty.
    pub fn terminate_rows_when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&HeaderRowContext, &RowContext) -> bool + 'static,
    {
        self.row_termination = Some(Box::new(predicate));
        self
    }

    /// Ends each row just before the first cell for which `predicate` holds.
    pub fn terminate_columns_when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&HeaderRowContext, &CellContext) -> bool + 'static,
    {
        self.column_termination = Some(Box::new(predicate));
        self
    }

    /// Ends the table at the first empty body row.
    pub fn stop_at_empty_row(self) -> Self {
        self.terminate_rows_when(|_, row| row.is_empty())
    }

    pub fn start_address(&self) -> &CellAddress {
        &self.start_address
    }

    pub fn has_row_termination(&self) -> bool {
        self.row_termination.is_some()
    }

    pub fn has_column_termination(&self) -> bool {
        self.column_termination.is_some()
    }

    pub(crate) fn row_terminates(&self, header: &HeaderRowContext, row: &RowContext) -> bool {
        self.row_termination
            .as_ref()
            .map(|predicate| predicate(header, row))
            .unwrap_or(false)
    }

    pub(crate) fn column_terminates(&self, header: &HeaderRowContext, cell: &CellContext) -> bool {
        self.column_termination
            .as_ref()
            .map(|predicate| predicate(header, cell))
            .unwrap_or(false)
    }

    /// 1-based start column; `None` when the start address has no column letters,
    /// in which case every cell is in range.
    pub(crate) fn start_column(&self) -> Option<usize> {
        column_index(self.start_address.column())
    }

    /// Rejects start addresses that can never match a row or column.
    pub(crate) fn validate(&self) -> Result<(), XlsTableError> {
        let address = &self.start_address;
        if address.row().is_empty() {
            Err(SpreadsheetError::ConfigurationError(format!("start address '{address}' has no row")))?
        }
        if !address.column().is_empty() && self.start_column().is_none() {
            Err(SpreadsheetError::ConfigurationError(format!("start address '{address}' has an invalid column")))?
        }
        Ok(())
    }
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ReadOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadOptions")
            .field("start_address", &self.start_address)
            .field("row_termination", &self.has_row_termination())
            .field("column_termination", &self.has_column_termination())
            .finish()
    }
}

/// Aggregate outcome of one extraction pass.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TableResult {
    body_row_count: usize,
}

impl TableResult {
    pub fn new(body_row_count: usize) -> Self {
        Self { body_row_count }
    }

    /// Number of body rows delivered to the body callback.
    pub fn body_row_count(&self) -> usize {
        self.body_row_count
    }
}

impl Add for TableResult {
    type Output = TableResult;

    fn add(self, rhs: Self) -> Self::Output {
        TableResult::new(self.body_row_count + rhs.body_row_count)
    }
}

impl AddAssign for TableResult {
    fn add_assign(&mut self, rhs: Self) {
        self.body_row_count += rhs.body_row_count;
    }
}

impl Sum for TableResult {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(TableResult::default(), Add::add)
    }
}
