/// Addressable descriptor of one worksheet in a workbook.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SheetContext {
    id: String,
    number: usize,
    name: String,
}

impl SheetContext {
    pub(crate) fn new(id: impl Into<String>, number: usize, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            number,
            name: name.into(),
        }
    }

    /// Opaque relationship id used to re-open the sheet's part. Not meant for display.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// 1-based position in declaration order.
    pub fn number(&self) -> usize {
        self.number
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// The ways a caller can pick the sheet to extract from.
pub enum SheetSelector<'a> {
    /// 1-based sheet number
    Number(usize),
    /// Exact sheet name; must be unique in the workbook
    Name(String),
    /// First sheet in declaration order accepted by the predicate
    Predicate(Box<dyn Fn(&SheetContext) -> bool + 'a>),
    /// A descriptor previously obtained from the same workbook
    Descriptor(SheetContext),
}

impl<'a> SheetSelector<'a> {
    pub fn predicate<F>(predicate: F) -> Self
    where
        F: Fn(&SheetContext) -> bool + 'a,
    {
        SheetSelector::Predicate(Box::new(predicate))
    }
}

impl std::fmt::Debug for SheetSelector<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SheetSelector::Number(number) => f.debug_tuple("Number").field(number).finish(),
            SheetSelector::Name(name) => f.debug_tuple("Name").field(name).finish(),
            SheetSelector::Predicate(_) => f.write_str("Predicate(..)"),
            SheetSelector::Descriptor(sheet) => f.debug_tuple("Descriptor").field(sheet).finish(),
        }
    }
}

impl From<usize> for SheetSelector<'_> {
    fn from(number: usize) -> Self {
        SheetSelector::Number(number)
    }
}

impl From<&str> for SheetSelector<'_> {
    fn from(name: &str) -> Self {
        SheetSelector::Name(name.to_owned())
    }
}

impl From<String> for SheetSelector<'_> {
    fn from(name: String) -> Self {
        SheetSelector::Name(name)
    }
}

impl From<SheetContext> for SheetSelector<'_> {
    fn from(sheet: SheetContext) -> Self {
        SheetSelector::Descriptor(sheet)
    }
}

impl From<&SheetContext> for SheetSelector<'_> {
    fn from(sheet: &SheetContext) -> Self {
        SheetSelector::Descriptor(sheet.clone())
    }
}
