use crate::error::XlsTableError;
use crate::helpers::xml::XmlReader;
use crate::helpers::xml::XmlTextContextHelper;
use crate::helpers::zip::ZipHelper;
use crate::match_xml_events;
use crate::spreadsheet::SpreadsheetError;
use quick_xml::events::Event;
use std::io::BufRead;
use std::io::Read;
use std::io::Seek;
use zip::ZipArchive;

const PART_SHARED_STRINGS: &str = "xl/sharedStrings.xml";

// XML tag names (local names) of the shared string part
const TAG_SHARED_STRING_ITEM: &[u8] = b"si";   // Shared string table item
const TAG_PHONETIC_TEXT: &[u8] = b"rPh";       // Phonetic text for Asian languages
const TAG_TEXT: &[u8] = b"t";                  // Text content within strings

/// How a cell's raw content is to be interpreted.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RawValueKind {
    /// Raw content is an index into the shared string table (`t="s"`)
    SharedString,
    /// Raw content is the value itself
    Verbatim,
}

/// Ordered table of the workbook's interned strings, indexed from 0.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SharedStrings {
    strings: Vec<String>,
}

impl SharedStrings {
    pub fn new(strings: Vec<String>) -> Self {
        Self { strings }
    }

    /// Loads the shared string part of a package; an absent part gives an empty table.
    pub(crate) fn load<RS: Read + Seek>(zip: &mut ZipArchive<RS>) -> Result<Self, XlsTableError> {
        let mut strings = Vec::<String>::new();
        let mut reader = match zip.xml_reader(PART_SHARED_STRINGS)? {
            Some(reader) => reader,
            None => return Ok(Self::default()),
        };

        match_xml_events!(reader => {
            Event::Start(event) if event.local_name().as_ref() == TAG_SHARED_STRING_ITEM => {
                let string = read_string_value(&mut reader, TAG_SHARED_STRING_ITEM, false)?;
                strings.push(string);
            }
        });
        Ok(Self { strings })
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.strings.get(index).map(String::as_str)
    }

    /// Resolves the raw content of a cell to its text.
    ///
    /// Shared string references must hold a non-negative integer within the
    /// table; anything else is malformed data. Other content is returned verbatim,
    /// and a cell without content resolves to `None`.
    pub fn resolve(&self, kind: RawValueKind, raw: Option<&str>) -> Result<Option<String>, XlsTableError> {
        match (kind, raw) {
            (RawValueKind::SharedString, Some(raw)) => {
                let index = raw.trim().parse::<usize>().map_err(|_| {
                    SpreadsheetError::MalformedDataError(format!("shared string index '{raw}' is not a number"))
                })?;
                let string = self.get(index).ok_or_else(|| {
                    SpreadsheetError::MalformedDataError(format!(
                        "shared string index {index} out of range (table has {} entries)",
                        self.len()
                    ))
                })?;
                Ok(Some(string.to_owned()))
            }
            (_, raw) => Ok(raw.map(str::to_owned)),
        }
    }
}

/// Reads string value from XML content, handling text and CDATA sections
///
/// Extracts string content from XML elements, skipping phonetic text annotations.
/// Rich text runs are concatenated in order.
///
/// # Arguments
/// * `reader` - XML reader positioned just after the start tag of the string content
/// * `end_tag` - local name of the element that closes the string content
/// * `is_text_content` - Whether to treat the content as text by default
pub(crate) fn read_string_value<R: BufRead>(
    reader: &mut XmlReader<R>,
    end_tag: &[u8],
    is_text_content: bool,
) -> Result<String, XlsTableError> {
    let mut is_phonetic_text = false;
    let mut is_text = is_text_content;
    let mut text = String::new();
    match_xml_events!(reader => {
        Event::End(event) if event.local_name().as_ref() == end_tag => break,
        Event::Start(event) if event.local_name().as_ref() == TAG_PHONETIC_TEXT => is_phonetic_text = true,
        Event::End(event) if event.local_name().as_ref() == TAG_PHONETIC_TEXT => is_phonetic_text = false,
        Event::Start(event) if !is_phonetic_text && event.local_name().as_ref() == TAG_TEXT => is_text = true,
        Event::End(event) if is_text && event.local_name().as_ref() == TAG_TEXT => is_text = is_text_content,
        Event::Text(event) if is_text => text.push_bytes_text(&event)?,
        Event::CData(event) if is_text => text.push_str(&event.xml_content()?),
        Event::GeneralRef(event) if is_text => text.push_bytes_ref(&event)?,
    });
    Ok(text)
}
