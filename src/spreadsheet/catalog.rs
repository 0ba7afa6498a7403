use crate::error::XlsTableError;
use crate::helpers::xml::XmlAttributeHelper;
use crate::helpers::xml::XmlNodeHelper;
use crate::helpers::zip::ZipHelper;
use crate::match_xml_events;
use crate::spreadsheet::sheet::SheetContext;
use crate::spreadsheet::sheet::SheetSelector;
use crate::spreadsheet::SpreadsheetError;
use quick_xml::events::Event;
use std::borrow::Cow;
use std::collections::HashMap;
use std::io::Read;
use std::io::Seek;
use zip::ZipArchive;

const PART_WORKBOOK: &str = "xl/workbook.xml";
const PART_WORKBOOK_RELATIONSHIPS: &str = "xl/_rels/workbook.xml.rels";

// XML tag names (local names) of the workbook and relationship parts
const TAG_SHEET: &[u8] = b"sheet";
const TAG_RELATIONSHIP: &[u8] = b"Relationship";

/// Ordered list of the sheets a workbook declares, with the package path of
/// each worksheet part.
#[derive(Clone, Debug, Default)]
pub struct SheetCatalog {
    sheets: Vec<SheetContext>,
    /// Relationship id to zip path; sheets without a worksheet part have no entry
    paths: HashMap<String, String>,
}

impl SheetCatalog {
    /// Reads the sheet declarations of the workbook part. Every declared sheet
    /// is numbered by its position, including chart and dialog sheets, which
    /// have no worksheet part to read a table from.
    pub(crate) fn load<RS: Read + Seek>(zip: &mut ZipArchive<RS>) -> Result<Self, XlsTableError> {
        let relationships = load_relationships(zip, PART_WORKBOOK_RELATIONSHIPS)?;
        let mut reader = zip.xml_reader(PART_WORKBOOK)?
            .ok_or_else(|| SpreadsheetError::FileError(PART_WORKBOOK.to_string()))?;

        let mut catalog = SheetCatalog::default();
        match_xml_events!(reader => {
            Event::Start(event) if event.local_name().as_ref() == TAG_SHEET => {
                let mut name = None::<Cow<str>>;
                let mut id = None::<Cow<str>>;
                for result in event.attributes() {
                    let attribute = result?;
                    let key = attribute.key.local_name();
                    if key.as_ref() == b"name" {
                        name = Some(attribute.get_value()?);
                    } else if key.as_ref() == b"id" {
                        id = Some(attribute.get_value()?);
                    }
                }
                let id = id.unwrap_or_default();
                if let Some(path) = relationships.get(&*id) {
                    catalog.paths.insert(id.to_string(), path.to_owned());
                }
                let number = catalog.sheets.len() + 1;
                catalog.sheets.push(SheetContext::new(id, number, name.unwrap_or_default()));
            }
        });
        Ok(catalog)
    }

    /// Sheets in declaration order.
    pub fn sheets(&self) -> &[SheetContext] {
        &self.sheets
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    pub fn by_number(&self, number: usize) -> Result<&SheetContext, XlsTableError> {
        let sheet = number
            .checked_sub(1)
            .and_then(|index| self.sheets.get(index))
            .ok_or_else(|| SpreadsheetError::LookupError(format!(
                "sheet number {number} out of range (workbook has {} sheets)",
                self.sheets.len()
            )))?;
        Ok(sheet)
    }

    /// Exact, case-sensitive name match. A name declared more than once is ambiguous.
    pub fn by_name(&self, name: &str) -> Result<&SheetContext, XlsTableError> {
        let mut matches = self.sheets.iter().filter(|sheet| sheet.name() == name);
        let sheet = matches
            .next()
            .ok_or_else(|| SpreadsheetError::LookupError(format!("no sheet named '{name}'")))?;
        if matches.next().is_some() {
            Err(SpreadsheetError::LookupError(format!("sheet name '{name}' is ambiguous")))?
        }
        Ok(sheet)
    }

    /// First sheet in declaration order accepted by `predicate`.
    pub fn find<F>(&self, predicate: F) -> Result<&SheetContext, XlsTableError>
    where
        F: Fn(&SheetContext) -> bool,
    {
        let sheet = self.sheets
            .iter()
            .find(|sheet| predicate(*sheet))
            .ok_or_else(|| SpreadsheetError::LookupError("no sheet matches the predicate".to_string()))?;
        Ok(sheet)
    }

    /// Looks a descriptor up again by its relationship id.
    pub fn by_descriptor(&self, descriptor: &SheetContext) -> Result<&SheetContext, XlsTableError> {
        let sheet = self.sheets
            .iter()
            .find(|sheet| sheet.id() == descriptor.id() && sheet.number() == descriptor.number())
            .ok_or_else(|| SpreadsheetError::LookupError(format!(
                "sheet '{}' does not belong to this workbook",
                descriptor.name()
            )))?;
        Ok(sheet)
    }

    pub fn select(&self, selector: &SheetSelector<'_>) -> Result<&SheetContext, XlsTableError> {
        match selector {
            SheetSelector::Number(number) => self.by_number(*number),
            SheetSelector::Name(name) => self.by_name(name),
            SheetSelector::Predicate(predicate) => self.find(predicate),
            SheetSelector::Descriptor(descriptor) => self.by_descriptor(descriptor),
        }
    }

    /// Every sheet accepted by `predicate`, in declaration order. May be empty.
    pub fn matching<F>(&self, predicate: F) -> Vec<SheetContext>
    where
        F: Fn(&SheetContext) -> bool,
    {
        self.sheets
            .iter()
            .filter(|sheet| predicate(*sheet))
            .cloned()
            .collect()
    }

    /// Package path of the worksheet part behind `sheet`.
    pub(crate) fn path(&self, sheet: &SheetContext) -> Result<&str, XlsTableError> {
        let path = self.paths.get(sheet.id()).ok_or_else(|| {
            SpreadsheetError::UnsupportedFormatError(
                sheet.name().to_string(),
                "sheet has no worksheet part".to_string(),
            )
        })?;
        Ok(path)
    }
}

/// Loads worksheet relationships from a relationships part
///
/// # Returns
/// Map of relationship id to the zip path of the worksheet part
fn load_relationships<RS: Read + Seek>(
    zip: &mut ZipArchive<RS>,
    path: &str,
) -> Result<HashMap<String, String>, XlsTableError> {
    let mut reader = zip.xml_reader(path)?
        .ok_or_else(|| SpreadsheetError::FileError(path.to_string()))?;
    let mut relationships: HashMap<String, String> = HashMap::new();
    match_xml_events!(reader => {
        Event::Start(event) if event.local_name().as_ref() == TAG_RELATIONSHIP => {
            let id = event.get_attribute_value("Id")?;
            let kind = event.get_attribute_value("Type")?;
            let target = event.get_attribute_value("Target")?;
            // Only process worksheet relationships
            if kind.map(|it| it.ends_with("/worksheet")).unwrap_or(true) {
                if let Some((id, target)) = id.zip(target) {
                    relationships.insert(id.to_string(), to_zip_path(target));
                }
            }
        }
    });
    Ok(relationships)
}

/// Resolves a relationship target to a path inside the package
fn to_zip_path(path: Cow<'_, str>) -> String {
    if let Some(absolute) = path.strip_prefix('/') {
        absolute.to_string()
    } else if path.starts_with("xl/") {
        path.to_string()
    } else {
        format!("xl/{path}")
    }
}
