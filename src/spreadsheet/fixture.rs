//! In-memory xlsx packages for tests.
use std::io::Cursor;
use std::io::Write;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const NAMESPACE_MAIN: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const NAMESPACE_RELATIONSHIPS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NAMESPACE_PACKAGE_RELATIONSHIPS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const TYPE_WORKSHEET: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet";
const TYPE_CHARTSHEET: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/chartsheet";
const TYPE_SHARED_STRINGS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings";

pub(crate) struct WorkbookFixture {
    /// Sheet name and inner worksheet XML; `None` declares a chart sheet
    sheets: Vec<(String, Option<String>)>,
    shared_strings: Option<String>,
}

impl WorkbookFixture {
    pub(crate) fn new() -> Self {
        Self {
            sheets: Vec::new(),
            shared_strings: None,
        }
    }

    /// Adds a worksheet whose `<worksheet>` element wraps `content`.
    pub(crate) fn sheet(mut self, name: &str, content: &str) -> Self {
        self.sheets.push((name.to_owned(), Some(content.to_owned())));
        self
    }

    /// Adds a chart sheet, which has no worksheet part.
    pub(crate) fn chart_sheet(mut self, name: &str) -> Self {
        self.sheets.push((name.to_owned(), None));
        self
    }

    pub(crate) fn shared_strings(self, strings: &[&str]) -> Self {
        let items: String = strings
            .iter()
            .map(|string| format!("<si><t>{}</t></si>", escape(string)))
            .collect();
        let xml = format!(
            r#"<sst xmlns="{NAMESPACE_MAIN}" count="{0}" uniqueCount="{0}">{items}</sst>"#,
            strings.len()
        );
        self.raw_shared_strings(&xml)
    }

    pub(crate) fn raw_shared_strings(mut self, xml: &str) -> Self {
        self.shared_strings = Some(xml.to_owned());
        self
    }

    pub(crate) fn build(&self) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let mut part = |name: &str, content: &str| {
            writer.start_file(name, SimpleFileOptions::default()).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        };

        let mut sheets = String::new();
        let mut relationships = String::new();
        for (index, (name, content)) in self.sheets.iter().enumerate() {
            let number = index + 1;
            sheets.push_str(&format!(r#"<sheet name="{}" sheetId="{number}" r:id="rId{number}"/>"#, escape(name)));
            let (kind, target) = match content {
                Some(_) => (TYPE_WORKSHEET, format!("worksheets/sheet{number}.xml")),
                None => (TYPE_CHARTSHEET, format!("chartsheets/sheet{number}.xml")),
            };
            relationships.push_str(&format!(r#"<Relationship Id="rId{number}" Type="{kind}" Target="{target}"/>"#));
        }
        if self.shared_strings.is_some() {
            relationships.push_str(&format!(
                r#"<Relationship Id="rIdStrings" Type="{TYPE_SHARED_STRINGS}" Target="sharedStrings.xml"/>"#
            ));
        }

        part(
            "xl/workbook.xml",
            &format!(r#"<workbook xmlns="{NAMESPACE_MAIN}" xmlns:r="{NAMESPACE_RELATIONSHIPS}"><sheets>{sheets}</sheets></workbook>"#),
        );
        part(
            "xl/_rels/workbook.xml.rels",
            &format!(r#"<Relationships xmlns="{NAMESPACE_PACKAGE_RELATIONSHIPS}">{relationships}</Relationships>"#),
        );
        if let Some(xml) = &self.shared_strings {
            part("xl/sharedStrings.xml", xml);
        }
        for (index, (_, content)) in self.sheets.iter().enumerate() {
            match content {
                Some(content) => part(
                    &format!("xl/worksheets/sheet{}.xml", index + 1),
                    &format!(r#"<worksheet xmlns="{NAMESPACE_MAIN}">{content}</worksheet>"#),
                ),
                None => part(
                    &format!("xl/chartsheets/sheet{}.xml", index + 1),
                    &format!(r#"<chartsheet xmlns="{NAMESPACE_MAIN}"/>"#),
                ),
            }
        }

        writer.finish().unwrap().into_inner()
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;").replace('"', "&quot;")
}

/// A `<row>` element with the given label and cells.
pub(crate) fn row(label: &str, cells: &[String]) -> String {
    format!(r#"<row r="{label}">{}</row>"#, cells.concat())
}

/// Cell holding a shared string reference.
pub(crate) fn shared(reference: &str, index: usize) -> String {
    format!(r#"<c r="{reference}" t="s"><v>{index}</v></c>"#)
}

/// Cell holding a number or other verbatim value.
pub(crate) fn value(reference: &str, value: &str) -> String {
    format!(r#"<c r="{reference}"><v>{value}</v></c>"#)
}

/// Cell without content.
pub(crate) fn blank(reference: &str) -> String {
    format!(r#"<c r="{reference}"/>"#)
}

pub(crate) const SIMPLE_TABLE_HEADER: [&str; 5] =
    ["EmployeeCode", "EmployeeName", "Salary", "DateOfJoining", "NoOfLeaves"];

pub(crate) const SIMPLE_TABLE_SALARIES: [&str; 6] =
    ["1500.5", "2400.75", "2000.67", "480.0", "1000.99", "1767.987"];

const SIMPLE_TABLE_NAMES: [&str; 6] = ["Ann", "Ben", "Cid", "Dee", "Eve", "Fay"];

/// Header at A1 and six employee rows labelled 2 to 7, all strings shared.
pub(crate) fn simple_table() -> WorkbookFixture {
    let mut strings: Vec<&str> = SIMPLE_TABLE_HEADER.to_vec();
    strings.extend(SIMPLE_TABLE_NAMES);

    let mut rows = vec![row("1", &[
        shared("A1", 0),
        shared("B1", 1),
        shared("C1", 2),
        shared("D1", 3),
        shared("E1", 4),
    ])];
    for (index, salary) in SIMPLE_TABLE_SALARIES.iter().enumerate() {
        let label = (index + 2).to_string();
        rows.push(row(&label, &[
            value(&format!("A{label}"), &format!("E{:03}", index + 1)),
            shared(&format!("B{label}"), SIMPLE_TABLE_HEADER.len() + index),
            value(&format!("C{label}"), salary),
            value(&format!("D{label}"), &(44927 + index).to_string()),
            value(&format!("E{label}"), &index.to_string()),
        ]));
    }

    WorkbookFixture::new()
        .shared_strings(&strings)
        .sheet("SimpleTable", &format!("<sheetData>{}</sheetData>", rows.concat()))
}
