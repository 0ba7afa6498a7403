use crate::error::XlsTableError;
use crate::helpers::reader::UnifiedReader;
use crate::helpers::zip::ZipHelper;
use crate::spreadsheet::catalog::SheetCatalog;
use crate::spreadsheet::cell::CellContext;
use crate::spreadsheet::options::ReadOptions;
use crate::spreadsheet::options::TableResult;
use crate::spreadsheet::reference::column_index;
use crate::spreadsheet::reference::column_letters;
use crate::spreadsheet::row::HeaderRowContext;
use crate::spreadsheet::row::RowContext;
use crate::spreadsheet::shared_strings::SharedStrings;
use crate::spreadsheet::sheet::SheetContext;
use crate::spreadsheet::sheet::SheetSelector;
use crate::spreadsheet::stream::ElementStream;
use crate::spreadsheet::stream::RowStart;
use crate::spreadsheet::stream::SheetStream;
use crate::spreadsheet::SpreadsheetError;
use std::path::Path;
use zip::ZipArchive;

/// Streams a table (one header row and the body rows below it) out of a
/// worksheet of an xlsx package.
///
/// The extractor owns the opened package and is bound to one sheet at a time,
/// the first sheet right after opening (none when the workbook declares no
/// sheets). Each `read_table` call is an independent pass over the bound sheet.
///
/// # Example
/// ```no_run
/// use xlstable::{ReadOptions, TableExtractor};
///
/// let mut extractor = TableExtractor::open("employees.xlsx")?
///     .with_options(ReadOptions::new().stop_at_empty_row());
/// let result = extractor.read_sheet_table(
///     "SimpleTable",
///     |header| println!("{} columns", header.count()),
///     |row| println!("row {}", row.row_index()),
/// )?;
/// println!("{} rows", result.body_row_count());
/// # Ok::<(), xlstable::XlsTableError>(())
/// ```
pub struct TableExtractor {
    /// Path or other label of the package, used in messages
    name: String,
    zip: ZipArchive<UnifiedReader>,
    shared_strings: SharedStrings,
    catalog: SheetCatalog,
    sheet: Option<SheetContext>,
    options: ReadOptions,
}

impl TableExtractor {
    /// Opens the package at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, XlsTableError> {
        let path = path.as_ref();
        let reader = UnifiedReader::open(path)?;
        Self::from_reader(path.display().to_string(), reader)
    }

    /// Opens a package held in memory.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Self, XlsTableError> {
        Self::from_reader("<memory>".to_string(), UnifiedReader::from_bytes(bytes.into()))
    }

    fn from_reader(name: String, mut reader: UnifiedReader) -> Result<Self, XlsTableError> {
        if reader.is_compound_file()? {
            Err(SpreadsheetError::PasswordProtectedError(name.clone()))?
        }
        let mut zip = ZipArchive::new(reader)?;
        let catalog = SheetCatalog::load(&mut zip)?;
        let shared_strings = SharedStrings::load(&mut zip)?;
        let sheet = catalog.sheets().first().cloned();
        tracing::debug!(
            "Opened '{}': {} sheets, {} shared strings",
            name,
            catalog.len(),
            shared_strings.len()
        );
        Ok(Self {
            name,
            zip,
            shared_strings,
            catalog,
            sheet,
            options: ReadOptions::default(),
        })
    }

    pub fn with_options(mut self, options: ReadOptions) -> Self {
        self.options = options;
        self
    }

    pub fn set_options(&mut self, options: ReadOptions) {
        self.options = options;
    }

    pub fn options(&self) -> &ReadOptions {
        &self.options
    }

    /// The sheet the next `read_table` call reads.
    pub fn sheet(&self) -> Option<&SheetContext> {
        self.sheet.as_ref()
    }

    /// All sheets of the workbook in declaration order.
    pub fn sheets(&self) -> &[SheetContext] {
        self.catalog.sheets()
    }

    /// Binds the extractor to the sheet picked by `selector`. On failure the
    /// previous binding is kept.
    pub fn bind<'s>(&mut self, selector: impl Into<SheetSelector<'s>>) -> Result<&SheetContext, XlsTableError> {
        let selector = selector.into();
        let sheet = self.catalog.select(&selector)?.clone();
        tracing::debug!("Bound sheet {} '{}' of '{}'", sheet.number(), sheet.name(), self.name);
        Ok(&*self.sheet.insert(sheet))
    }

    /// Reads the table of the bound sheet.
    ///
    /// `on_header` is called once with the row whose label equals the start
    /// address row, then `on_body` once per body row in sheet order. Rows without
    /// a matching header are never delivered: when the header row is missing the
    /// pass ends with a count of 0.
    pub fn read_table<H, B>(&mut self, on_header: H, on_body: B) -> Result<TableResult, XlsTableError>
    where
        H: FnMut(&HeaderRowContext),
        B: FnMut(&RowContext),
    {
        self.options.validate()?;
        let sheet = self.sheet
            .as_ref()
            .ok_or_else(|| SpreadsheetError::LookupError(format!("workbook '{}' has no sheets", self.name)))?;
        let path = self.catalog.path(sheet)?.to_owned();
        let reader = self.zip.xml_reader(&path)?
            .ok_or_else(|| SpreadsheetError::FileError(path.clone()))?;
        let mut stream = SheetStream::new(reader);

        let pass = TablePass {
            sheet,
            options: &self.options,
            shared_strings: &self.shared_strings,
            start_column: self.options.start_column(),
        };
        let result = pass.run(&mut stream, on_header, on_body)?;
        tracing::debug!(
            "Read {} body rows from sheet '{}' of '{}'",
            result.body_row_count(),
            sheet.name(),
            self.name
        );
        Ok(result)
    }

    /// Binds the sheet picked by `selector`, then reads its table.
    pub fn read_sheet_table<'s, H, B>(
        &mut self,
        selector: impl Into<SheetSelector<'s>>,
        on_header: H,
        on_body: B,
    ) -> Result<TableResult, XlsTableError>
    where
        H: FnMut(&HeaderRowContext),
        B: FnMut(&RowContext),
    {
        self.bind(selector)?;
        self.read_table(on_header, on_body)
    }

    /// Reads the table of every sheet accepted by `predicate`, in declaration
    /// order, with the same options and callbacks. Each sheet is an independent
    /// pass; the body row counts are summed. The bound sheet is left unchanged.
    pub fn read_tables<P, H, B>(
        &mut self,
        predicate: P,
        mut on_header: H,
        mut on_body: B,
    ) -> Result<TableResult, XlsTableError>
    where
        P: Fn(&SheetContext) -> bool,
        H: FnMut(&HeaderRowContext),
        B: FnMut(&RowContext),
    {
        let bound = self.sheet.clone();
        let mut total = TableResult::default();
        for sheet in self.catalog.matching(predicate) {
            self.sheet = Some(sheet);
            match self.read_table(&mut on_header, &mut on_body) {
                Ok(result) => total += result,
                Err(error) => {
                    self.sheet = bound;
                    return Err(error);
                }
            }
        }
        self.sheet = bound;
        Ok(total)
    }
}

/// State of one `read_table` call.
struct TablePass<'a> {
    sheet: &'a SheetContext,
    options: &'a ReadOptions,
    shared_strings: &'a SharedStrings,
    start_column: Option<usize>,
}

impl TablePass<'_> {
    fn run<S, H, B>(&self, stream: &mut S, mut on_header: H, mut on_body: B) -> Result<TableResult, XlsTableError>
    where
        S: ElementStream,
        H: FnMut(&HeaderRowContext),
        B: FnMut(&RowContext),
    {
        let start_row = self.options.start_address().row();
        let header = loop {
            let row_index = match stream.next_row()? {
                Some(row) => self.row_label(row)?,
                None => {
                    tracing::warn!(
                        "Header row {} not found in sheet '{}'",
                        self.options.start_address(),
                        self.sheet.name()
                    );
                    return Ok(TableResult::default());
                }
            };
            if row_index != start_row {
                tracing::trace!("Skipping row {} before the header", row_index);
                stream.skip_row()?;
                continue;
            }
            let pending = HeaderRowContext::pending(&row_index);
            break HeaderRowContext::new(self.read_row(stream, row_index, &pending, None)?);
        };
        tracing::debug!(
            "Captured header row {} of sheet '{}' with {} cells",
            header.row_index(),
            self.sheet.name(),
            header.count()
        );
        on_header(&header);

        let cell_limit = if self.options.has_column_termination() {
            None
        } else {
            Some(header.count())
        };
        let mut body_row_count = 0;
        while let Some(row) = stream.next_row()? {
            let row_index = self.row_label(row)?;
            let row = self.read_row(stream, row_index, &header, cell_limit)?;
            if self.options.row_terminates(&header, &row) {
                if !row.is_empty() {
                    body_row_count += 1;
                    on_body(&row);
                }
                tracing::trace!("Row {} terminates the table", row.row_index());
                break;
            }
            body_row_count += 1;
            tracing::trace!("Delivering row {} with {} cells", row.row_index(), row.count());
            on_body(&row);
        }
        Ok(TableResult::new(body_row_count))
    }

    fn row_label(&self, row: RowStart) -> Result<String, XlsTableError> {
        let label = row.reference.ok_or_else(|| {
            SpreadsheetError::UnsupportedFormatError(
                self.sheet.name().to_string(),
                "row without a row reference".to_string(),
            )
        })?;
        Ok(label)
    }

    /// Reads the in-range cells of the current row, stopping once the row holds
    /// `cell_limit` distinct column references or before the first cell the
    /// column predicate rejects.
    fn read_row<S: ElementStream>(
        &self,
        stream: &mut S,
        row_index: String,
        header: &HeaderRowContext,
        cell_limit: Option<usize>,
    ) -> Result<RowContext, XlsTableError> {
        let mut row = RowContext::new(row_index, Vec::new());
        let mut in_range = self.start_column.is_none();
        loop {
            if cell_limit.is_some_and(|limit| row.count() >= limit) {
                stream.skip_row()?;
                break;
            }
            let cell = match stream.next_cell()? {
                Some(cell) => cell,
                None => break,
            };
            let reference = cell.reference.ok_or_else(|| {
                SpreadsheetError::UnsupportedFormatError(
                    self.sheet.name().to_string(),
                    format!("cell without a cell reference in row {}", row.row_index()),
                )
            })?;
            let column_reference = column_letters(&reference);
            let index = column_index(&column_reference).ok_or_else(|| {
                SpreadsheetError::UnsupportedFormatError(
                    self.sheet.name().to_string(),
                    format!("invalid cell reference '{reference}' in row {}", row.row_index()),
                )
            })?;
            if !in_range {
                match self.start_column {
                    Some(start) if index >= start => in_range = true,
                    _ => continue,
                }
            }

            let raw = stream.read_cell_value()?;
            let value = self.shared_strings.resolve(cell.kind, raw.as_deref())?;
            let cell = CellContext::new(value, column_reference, index);
            if self.options.column_terminates(header, &cell) {
                stream.skip_row()?;
                break;
            }
            row.push(cell);
        }
        Ok(row)
    }
}
