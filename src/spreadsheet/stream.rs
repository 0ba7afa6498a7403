//! Forward-only cursor over the rows and cells of a worksheet part.
use crate::error::XlsTableError;
use crate::helpers::xml::XmlNodeHelper;
use crate::helpers::xml::XmlReader;
use crate::spreadsheet::shared_strings::read_string_value;
use crate::spreadsheet::shared_strings::RawValueKind;
use quick_xml::events::Event;
use std::borrow::Cow;
use std::io::BufRead;

// XML tag names (local names) of the worksheet part
const TAG_SHEET_DATA: &[u8] = b"sheetData";  // Container of all rows
const TAG_ROW: &[u8] = b"row";               // Row element
const TAG_CELL: &[u8] = b"c";                // Cell element
const TAG_VALUE: &[u8] = b"v";               // Raw cell value
const TAG_INLINE_STRING: &[u8] = b"is";      // Rich text of an inline string cell

/// Attributes of a row element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct RowStart {
    /// The `r` attribute, the row's native label
    pub(crate) reference: Option<String>,
}

/// Attributes of a cell element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct CellStart {
    /// The `r` attribute, e.g. "C7"
    pub(crate) reference: Option<String>,
    pub(crate) kind: RawValueKind,
}

/// Cursor over the row and cell elements of one sheet.
///
/// The cursor only moves forward. Moving to the next row abandons whatever is
/// left of the current one, and moving to the next cell abandons the current
/// cell's content if it was not read.
pub(crate) trait ElementStream {
    /// Advances to the next row element; `None` once the sheet has no more rows.
    fn next_row(&mut self) -> Result<Option<RowStart>, XlsTableError>;

    /// Advances to the next cell of the current row; `None` at the end of the row.
    fn next_cell(&mut self) -> Result<Option<CellStart>, XlsTableError>;

    /// Reads the raw content of the current cell: the `<v>` text or the text of
    /// an inline string. `None` when the cell has neither.
    fn read_cell_value(&mut self) -> Result<Option<String>, XlsTableError>;

    /// Advances past the rest of the current row without reading its cells.
    fn skip_row(&mut self) -> Result<(), XlsTableError>;
}

/// What to do with an event once its borrow of the reader has ended.
enum Step {
    Continue,
    Skip(Vec<u8>),
    Value,
    InlineString,
}

/// `ElementStream` over a worksheet part parsed with quick-xml.
pub(crate) struct SheetStream<R: BufRead> {
    reader: XmlReader<R>,
    /// Qualified name of the current row element, prefix included
    row_name: Vec<u8>,
    /// Qualified name of the current cell element, prefix included
    cell_name: Vec<u8>,
    in_row: bool,
    in_cell: bool,
}

impl<R: BufRead> SheetStream<R> {
    pub(crate) fn new(reader: XmlReader<R>) -> Self {
        Self {
            reader,
            row_name: TAG_ROW.to_vec(),
            cell_name: TAG_CELL.to_vec(),
            in_row: false,
            in_cell: false,
        }
    }
}

impl<R: BufRead> ElementStream for SheetStream<R> {
    fn next_row(&mut self) -> Result<Option<RowStart>, XlsTableError> {
        self.skip_row()?;
        loop {
            let row = match self.reader.next()? {
                None => return Ok(None),
                Some(Event::Start(event)) if event.local_name().as_ref() == TAG_ROW => {
                    self.row_name = event.name().as_ref().to_vec();
                    let reference = event.get_attribute_value("r")?.map(Cow::into_owned);
                    Some(RowStart { reference })
                }
                Some(Event::End(event)) if event.local_name().as_ref() == TAG_SHEET_DATA => return Ok(None),
                Some(_) => None,
            };
            if let Some(row) = row {
                self.in_row = true;
                return Ok(Some(row));
            }
        }
    }

    fn next_cell(&mut self) -> Result<Option<CellStart>, XlsTableError> {
        if !self.in_row {
            return Ok(None);
        }
        if self.in_cell {
            self.reader.skip_element(&self.cell_name)?;
            self.in_cell = false;
        }
        loop {
            let step = match self.reader.next()? {
                None => {
                    self.in_row = false;
                    return Ok(None);
                }
                Some(Event::Start(event)) if event.local_name().as_ref() == TAG_CELL => {
                    self.cell_name = event.name().as_ref().to_vec();
                    let reference = event.get_attribute_value("r")?.map(Cow::into_owned);
                    let kind = match event.get_attribute_value("t")?.as_deref() {
                        Some("s") => RawValueKind::SharedString,
                        _ => RawValueKind::Verbatim,
                    };
                    self.in_cell = true;
                    return Ok(Some(CellStart { reference, kind }));
                }
                Some(Event::Start(event)) => Step::Skip(event.name().as_ref().to_vec()),
                Some(Event::End(event)) if event.local_name().as_ref() == TAG_ROW => {
                    self.in_row = false;
                    return Ok(None);
                }
                Some(_) => Step::Continue,
            };
            if let Step::Skip(name) = step {
                self.reader.skip_element(&name)?;
            }
        }
    }

    fn read_cell_value(&mut self) -> Result<Option<String>, XlsTableError> {
        if !self.in_cell {
            return Ok(None);
        }
        self.in_cell = false;
        let mut value = None;
        loop {
            let step = match self.reader.next()? {
                None => break,
                Some(Event::End(event)) if event.local_name().as_ref() == TAG_CELL => break,
                Some(Event::Start(event)) => match event.local_name().as_ref() {
                    TAG_VALUE => Step::Value,
                    TAG_INLINE_STRING => Step::InlineString,
                    _ => Step::Skip(event.name().as_ref().to_vec()),
                },
                Some(_) => Step::Continue,
            };
            match step {
                Step::Value => value = Some(read_string_value(&mut self.reader, TAG_VALUE, true)?),
                Step::InlineString => value = Some(read_string_value(&mut self.reader, TAG_INLINE_STRING, false)?),
                Step::Skip(name) => self.reader.skip_element(&name)?,
                Step::Continue => (),
            }
        }
        Ok(value)
    }

    fn skip_row(&mut self) -> Result<(), XlsTableError> {
        if self.in_row {
            self.reader.skip_element(&self.row_name)?;
            self.in_row = false;
            self.in_cell = false;
        }
        Ok(())
    }
}
