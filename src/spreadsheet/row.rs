use crate::spreadsheet::cell::CellContext;
use std::collections::HashMap;
use std::ops::Deref;

/// One row of the table with its in-range cells keyed by column reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowContext {
    row_index: String,
    /// Cells in document order
    cells: Vec<CellContext>,
    /// Index mapping from column reference to cells vector position
    indexes: HashMap<String, usize>,
    is_empty: bool,
}

impl RowContext {
    /// Builds a row from cells in document order. A column reference seen twice
    /// keeps the position of its first occurrence and the value of its last.
    pub fn new(row_index: impl Into<String>, cells: impl IntoIterator<Item = CellContext>) -> Self {
        let mut row = Self {
            row_index: row_index.into(),
            cells: Vec::new(),
            indexes: HashMap::new(),
            is_empty: true,
        };
        for cell in cells {
            row.push(cell);
        }
        row
    }

    pub(crate) fn push(&mut self, cell: CellContext) {
        match self.indexes.get(cell.column_reference()) {
            Some(&index) => {
                self.cells[index] = cell;
                self.is_empty = self.cells.iter().all(CellContext::is_empty);
            }
            None => {
                self.is_empty &= cell.is_empty();
                self.indexes.insert(cell.column_reference().to_owned(), self.cells.len());
                self.cells.push(cell);
            }
        }
    }

    /// Native row label of the sheet (the `r` attribute), not renumbered.
    pub fn row_index(&self) -> &str {
        &self.row_index
    }

    /// Number of cells present in the row.
    pub fn count(&self) -> usize {
        self.cells.len()
    }

    /// True iff every cell of the row is empty (also for a row without cells).
    pub fn is_empty(&self) -> bool {
        self.is_empty
    }

    /// Cells in document order.
    pub fn cells(&self) -> impl ExactSizeIterator<Item = &CellContext> {
        self.cells.iter()
    }

    pub fn try_get_cell(&self, column_reference: &str) -> Option<&CellContext> {
        self.indexes
            .get(column_reference)
            .and_then(|index| self.cells.get(*index))
    }
}

/// The header row of a table. Termination predicates always receive it next to
/// the candidate row or cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeaderRowContext(RowContext);

impl HeaderRowContext {
    pub fn new(row: RowContext) -> Self {
        Self(row)
    }

    /// Stand-in handed to column predicates while the header row itself is read.
    pub(crate) fn pending(row_index: &str) -> Self {
        Self(RowContext::new(row_index, Vec::new()))
    }

    pub fn into_row(self) -> RowContext {
        self.0
    }
}

impl Deref for HeaderRowContext {
    type Target = RowContext;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
