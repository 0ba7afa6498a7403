use crate::error::XlsTableError;
use crate::spreadsheet::reference::column_index;
use crate::spreadsheet::reference::split_reference;
use crate::spreadsheet::SpreadsheetError;
use std::fmt::Display;
use std::str::FromStr;

/// Position of a cell as written in the sheet: column letters plus row label.
///
/// Both parts are kept as raw text. The row label is compared verbatim with the
/// `r` attribute of each row, so "1" and "01" are different rows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellAddress {
    column: String,
    row: String,
}

impl CellAddress {
    pub fn new(column: impl Into<String>, row: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            row: row.into(),
        }
    }

    /// Parses a conventional reference such as "B2".
    pub fn parse(reference: &str) -> Result<Self, XlsTableError> {
        let (column, row) = split_reference(reference.trim())
            .ok_or_else(|| SpreadsheetError::ConfigurationError(format!("invalid cell address '{reference}'")))?;
        Ok(Self::new(column.to_ascii_uppercase(), row))
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn row(&self) -> &str {
        &self.row
    }

    /// 1-based index of the column letters, `None` when there are none.
    pub fn column_index(&self) -> Option<usize> {
        column_index(&self.column)
    }
}

impl Default for CellAddress {
    /// Column A, row "1".
    fn default() -> Self {
        Self::new("A", "1")
    }
}

impl Display for CellAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.column, self.row)
    }
}

impl FromStr for CellAddress {
    type Err = XlsTableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A resolved cell of a header or body row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellContext {
    value: Option<String>,
    column_reference: String,
    column_index: usize,
    is_empty: bool,
}

impl CellContext {
    pub fn new(value: Option<String>, column_reference: impl Into<String>, column_index: usize) -> Self {
        let is_empty = value.as_deref().map(str::is_empty).unwrap_or(true);
        Self {
            value,
            column_reference: column_reference.into(),
            column_index,
            is_empty,
        }
    }

    /// Resolved text of the cell; shared strings are already looked up.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Column letters only, upper case.
    pub fn column_reference(&self) -> &str {
        &self.column_reference
    }

    /// 1-based column index (A = 1).
    pub fn column_index(&self) -> usize {
        self.column_index
    }

    /// True when the value is absent or the empty string.
    pub fn is_empty(&self) -> bool {
        self.is_empty
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_defaults_to_a1() {
        let address = CellAddress::default();
        assert_eq!(address.column(), "A");
        assert_eq!(address.row(), "1");
        assert_eq!(address.to_string(), "A1");
        assert_eq!(address.column_index(), Some(1));
    }

    #[test]
    fn address_parse() {
        let address: CellAddress = "c12".parse().unwrap();
        assert_eq!(address, CellAddress::new("C", "12"));
        assert_eq!(address.column_index(), Some(3));

        let error = CellAddress::parse("12").unwrap_err();
        assert!(matches!(
            error.spreadsheet_error(),
            Some(SpreadsheetError::ConfigurationError(_))
        ));
    }

    #[test]
    fn cell_emptiness() {
        assert!(CellContext::new(None, "A", 1).is_empty());
        assert!(CellContext::new(Some(String::new()), "A", 1).is_empty());

        let cell = CellContext::new(Some("480.0".to_owned()), "C", 3);
        assert!(!cell.is_empty());
        assert_eq!(cell.value(), Some("480.0"));
        assert_eq!(cell.column_reference(), "C");
        assert_eq!(cell.column_index(), 3);
    }
}
